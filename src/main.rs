//! CLI entry point for paperboy

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "paperboy")]
#[command(version)]
#[command(about = "A content-driven blog server with an admin API and newsletter delivery", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Scaffold a new local post
    New {
        /// Title of the new post
        title: String,

        /// Slug override (defaults to a slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List posts from the active content source
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may live in a .env file during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "paperboy=debug,tower_http=debug,info"
    } else {
        "paperboy=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Serve { port, ip } => {
            let app = paperboy::Paperboy::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            paperboy::server::start(&app, &ip, port).await?;
        }

        Commands::New { title, slug } => {
            let app = paperboy::Paperboy::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            paperboy::commands::new::create_post(&app, &title, slug.as_deref())?;
        }

        Commands::List => {
            let app = paperboy::Paperboy::new(&base_dir)?;
            paperboy::commands::list::run(&app).await?;
        }

        Commands::Version => {
            println!("paperboy version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
