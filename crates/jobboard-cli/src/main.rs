//! Job board operator CLI
//!
//! Usage:
//!   jobboard create-admin --name <name> --email <email>
//!   jobboard init-schema
//!
//! Admin accounts have no HTTP signup; this is the only way to create one.
//!
//! Author: hephaex@gmail.com

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use jobboard_api::auth::{JwtConfig, PasswordConfig, TokenService};
use jobboard_api::services::AccountService;
use jobboard_core::{AppConfig, StoreBackend};
use jobboard_store::SurrealDbStore;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board operator CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file; environment variables override it
    #[arg(long, global = true, env = "JOBBOARD_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Admin name, used together with the email at login
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Read from the environment so it stays out of shell history
        #[arg(long, env = "JOBBOARD_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Define tables and indexes in SurrealDB
    InitSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobboard_store=info,jobboard_api=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => {
            if config.database.backend == StoreBackend::Memory {
                bail!("create-admin needs a persistent store; STORE_BACKEND is set to memory");
            }

            let store = jobboard_store::connect(&config.database)
                .await
                .context("failed to open the document store")?;
            let tokens = TokenService::new(JwtConfig::from(&config.auth));
            let passwords = PasswordConfig::default();

            let admin = AccountService::new(store.as_ref(), &tokens, &passwords)
                .provision_admin(&name, &email, &password)
                .await?;

            println!("{}", serde_json::to_string_pretty(&admin)?);
        }
        Commands::InitSchema => {
            if config.database.backend == StoreBackend::Memory {
                println!("In-memory store has no schema; nothing to do");
                return Ok(());
            }

            let store = SurrealDbStore::new(&config.database).await?;
            store.init_schema().await?;
            println!(
                "Schema ready in {}/{}",
                config.database.surrealdb_namespace, config.database.surrealdb_database
            );
        }
    }

    Ok(())
}
