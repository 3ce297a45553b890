//! Bazaar command-line client
//!
//! Browse and manage marketplace listings from the terminal. The session is
//! kept in the local storage directory between invocations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bazaar_client::adapters::HttpAuthService;
use bazaar_client::domain::ports::AuthService;
use bazaar_client::{keys, Config, Container, SessionEvent};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{ProductsCommand, ProfileCommand};

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(about = "Bazaar - buy and sell locally", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Marketplace API base URL
    #[arg(long, global = true, env = "BAZAAR_API_URL")]
    api_url: Option<String>,

    /// Directory for the local session store
    #[arg(long, global = true, env = "BAZAAR_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// At least 8 characters
        #[arg(long, env = "BAZAAR_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Sign in with email and password
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "BAZAAR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored session
    Signout,

    /// Show the signed-in user
    Whoami {
        /// Fetch the profile from the server instead of the local cache
        #[arg(long)]
        refresh: bool,
    },

    /// Browse and manage listings
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },

    /// Edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout is reserved for command output
    let default_filter = if cli.verbose {
        "info,bazaar_client=debug"
    } else {
        "warn,bazaar_client=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(dir) = cli.storage_dir {
        config = config.with_storage_dir(dir);
    }
    tracing::debug!(
        api = %config.api_base_url,
        storage = %config.storage_dir.display(),
        "Starting"
    );

    let container = Container::bootstrap(&config);
    let auth = container
        .resolve::<HttpAuthService>(keys::AUTH_SERVICE)
        .context("Failed to initialize the client")?;
    let mut events = auth.subscribe();

    let result = run(&container, cli.command).await;

    // Anything that happened to the session while the command ran
    while let Ok(event) = events.try_recv() {
        if event == SessionEvent::Expired {
            output::session_expired();
        }
    }

    result
}

async fn run(container: &Container, command: Commands) -> Result<()> {
    match command {
        Commands::Signup {
            name,
            email,
            password,
            phone,
        } => commands::auth::sign_up(container, name, email, password, phone).await,
        Commands::Signin { email, password } => {
            commands::auth::sign_in(container, &email, &password).await
        }
        Commands::Signout => commands::auth::sign_out(container).await,
        Commands::Whoami { refresh } => commands::auth::whoami(container, refresh).await,
        Commands::Products { command } => commands::products::run(container, command).await,
        Commands::Profile { command } => commands::profile::run(container, command).await,
    }
}
