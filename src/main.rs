//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Blog and project content for a personal website", long_about = None)]
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
    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (posts, projects, tags, categories)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Only projects in this category (work, academic, personal)
        #[arg(long)]
        category: Option<String>,

        /// Group projects by category
        #[arg(long)]
        grouped: bool,
    },

    /// Print a post or project by slug
    Show {
        /// Type of content (post, project)
        r#type: String,

        /// Slug derived from the file name
        slug: String,

        /// Print the body rendered to HTML instead of JSON
        #[arg(long)]
        html: bool,
    },

    /// Parse all content and report problems
    Check,

    /// Start the API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the config value)
        #[arg(short, long)]
        ip: Option<String>,

        /// Cache listings and clear them when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            r#type,
            category,
            grouped,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type, category.as_deref(), grouped)?;
        }

        Commands::Show { r#type, slug, html } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &r#type, &slug, html)?;
        }

        Commands::Check => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Checking content in {:?}", base_dir);
            folio_rs::commands::check::run(&folio)?;
        }

        Commands::Server { port, ip, watch } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());
            let port = port.unwrap_or(folio.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port, watch).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
