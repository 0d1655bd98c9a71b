mod keycloak_setup;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use user_api::keycloak::{KeycloakClient, KeycloakConfig};
use user_lib::user_service::UserService;

use crate::keycloak_setup::KeycloakSetup;

#[derive(Parser)]
#[command(name = "backcli", about = "Operator utility for the user API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the API's confidential service client and the moderator role
    KeycloakSetup {
        #[arg(long)]
        client_id: String,
        #[arg(long, default_value = "MODERATOR")]
        moderator_role: String,
    },
    /// Delete a user by exact username, if present
    RemoveUser {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::KeycloakSetup {
            client_id,
            moderator_role,
        } => {
            let setup = KeycloakSetup::from_env()?;
            let outcome = setup.setup(&client_id, &moderator_role).await?;

            println!("Realm:          {}", setup.realm());
            println!(
                "Client:         {} ({})",
                outcome.client_id,
                if outcome.created_client { "created" } else { "existing" }
            );
            println!(
                "Moderator role: {} ({})",
                outcome.moderator_role,
                if outcome.created_role { "created" } else { "existing" }
            );
            println!();
            println!("export KEYCLOAK_CLIENT_ID={}", outcome.client_id);
            println!(
                "export KEYCLOAK_CLIENT_SECRET={}",
                outcome.client_secret.expose_secret()
            );
        }
        Commands::RemoveUser { username } => {
            let client = KeycloakClient::new(KeycloakConfig::from_env())
                .context("failed to build keycloak client")?;
            let service = UserService::new(Arc::new(client));

            if service
                .remove_user_if_exists(&username)
                .await
                .with_context(|| format!("failed to remove user {username}"))?
            {
                println!("Removed user {username}");
            } else {
                println!("No user named {username}");
            }
        }
    }
    Ok(())
}
