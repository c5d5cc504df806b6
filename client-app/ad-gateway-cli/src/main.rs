use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use ad_gateway_core::{DirectoryAccountGateway, ElevatedCredentials};
use ad_gateway_infrastructure::LdapDirectoryClient;
use ad_gateway_shared::config::AppConfig;

#[derive(Parser)]
#[command(name = "ad-gateway-cli")]
#[command(about = "Query and manage Active Directory accounts through the account gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "AD_GATEWAY_LOG", default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the account state as JSON (`null` when no query was made)
    Details { username: String },
    /// Validate a credential pair and print the authentication result
    Status {
        username: String,
        #[arg(long, env = "AD_GATEWAY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Change a password, providing the current one
    ChangePassword {
        username: String,
        #[arg(long, env = "AD_GATEWAY_CURRENT_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "AD_GATEWAY_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize telemetry
    ad_gateway_shared::telemetry::init_telemetry(&cli.log);

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!("Using directory {} ({})", config.directory.url, config.app.env);

    let client = Arc::new(LdapDirectoryClient::new(&config.directory));
    let credentials = ElevatedCredentials::new(
        config.directory.bind_dn.clone(),
        config.directory.bind_password.clone(),
    );
    let gateway = DirectoryAccountGateway::new(client, credentials);

    match cli.command {
        Commands::Details { username } => {
            let details = gateway.get_user_details(&username).await;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Commands::Status { username, password } => {
            let status = gateway.get_user_status(&username, &password).await;
            println!("{}", status);
            if !status.is_authenticated() {
                std::process::exit(1);
            }
        }
        Commands::ChangePassword { username, current, new } => {
            let result = gateway.change_password(&username, &current, &new).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
