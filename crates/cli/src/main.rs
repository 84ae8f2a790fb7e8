//! Cinegraph CLI
//!
//! A command-line interface for asking natural-language questions about a
//! movie catalog stored in a graph database.

use anyhow::{Context, Result};
use cinegraph_agents::{
    CatalogLoader, ChatClient, EmbeddingClient, EmbeddingIndexer, GraphQa, RetrievalQa,
    RoutingAgent, DEFAULT_CATALOG_URL,
};
use cinegraph_db::{connect_remote, init_memory, init_persistent, Repository, StoreConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cinegraph - movie questions answered from a graph store
#[derive(Parser)]
#[command(name = "cinegraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database path for the embedded store (defaults to ~/.cinegraph/data)
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    /// Use in-memory database (for testing)
    #[arg(long)]
    memory: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog, build the index, and answer a question
    Ask {
        /// The question to answer
        question: String,

        /// Catalog URL (defaults to the built-in movie catalog)
        #[arg(long)]
        catalog_url: Option<String>,

        /// Skip the load and index phases (reuse an already-populated store)
        #[arg(long)]
        skip_setup: bool,
    },

    /// Load the movie catalog into the store
    Load {
        /// Catalog URL (defaults to the built-in movie catalog)
        #[arg(long)]
        catalog_url: Option<String>,
    },

    /// Build the vector index over stored movies
    Index,

    /// Show entity and relation counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize the store: remote when SURREAL_URL is set, embedded otherwise
    let store = StoreConfig::from_env();
    let db = if let Some(url) = &store.url {
        info!("Connecting to graph store at {}", url);
        connect_remote(&store)
            .await
            .context("Failed to connect to the graph store")?
    } else if cli.memory {
        info!("Using in-memory database");
        init_memory().await?
    } else {
        let db_path = cli.db_path.clone().unwrap_or_else(|| {
            let mut path = dirs::home_dir().expect("Could not find home directory");
            path.push(".cinegraph");
            path.push("data");
            path
        });

        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Using database at: {}", db_path.display());
        init_persistent(&db_path).await?
    };

    let repo = Repository::new(db);

    match cli.command {
        Commands::Ask {
            question,
            catalog_url,
            skip_setup,
        } => {
            cmd_ask(repo, question, catalog_url, skip_setup).await?;
        }
        Commands::Load { catalog_url } => {
            cmd_load(repo, catalog_url).await?;
        }
        Commands::Index => {
            cmd_index(repo).await?;
        }
        Commands::Stats => {
            cmd_stats(repo).await?;
        }
    }

    Ok(())
}

/// Catalog source: CLI flag, then CATALOG_URL, then the built-in default
fn resolve_catalog_url(cli_value: Option<String>) -> String {
    cli_value
        .or_else(|| std::env::var("CATALOG_URL").ok())
        .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string())
}

async fn cmd_ask(
    repo: Repository,
    question: String,
    catalog_url: Option<String>,
    skip_setup: bool,
) -> Result<()> {
    let llm = ChatClient::from_env()?;
    let embeddings = EmbeddingClient::from_env()?;

    if skip_setup {
        info!("Skipping catalog load and index build");
    } else {
        // The pipeline is strictly linear: a failing load aborts the run
        // before indexing, and a failing index build aborts before the agent.
        let url = resolve_catalog_url(catalog_url);
        let loader = CatalogLoader::new(repo.clone());
        loader.load(&url).await?;

        let indexer = EmbeddingIndexer::new(repo.clone(), embeddings.clone());
        indexer.build_index().await?;
    }

    let retrieval = RetrievalQa::new(repo.clone(), embeddings, llm.clone());
    let graph = GraphQa::new(repo.clone(), llm.clone());
    let agent = RoutingAgent::new(llm, retrieval, graph, repo);

    let answer = agent.run(&question).await?;
    println!("{}", answer);

    Ok(())
}

async fn cmd_load(repo: Repository, catalog_url: Option<String>) -> Result<()> {
    let url = resolve_catalog_url(catalog_url);
    let loader = CatalogLoader::new(repo);
    let report = loader.load(&url).await?;

    println!(
        "✓ Loaded {} movies, {} people, {} genres",
        report.movies, report.people, report.genres
    );

    Ok(())
}

async fn cmd_index(repo: Repository) -> Result<()> {
    let embeddings = EmbeddingClient::from_env()?;
    let indexer = EmbeddingIndexer::new(repo, embeddings);
    let indexed = indexer.build_index().await?;

    println!("✓ Indexed {} movies", indexed);

    Ok(())
}

async fn cmd_stats(repo: Repository) -> Result<()> {
    let stats = repo.get_stats().await?;

    println!("Store statistics:");
    println!("  • Movies: {}", stats.movie_count);
    println!("  • People: {}", stats.person_count);
    println!("  • Genres: {}", stats.genre_count);
    println!("  • Directed: {}", stats.directed_count);
    println!("  • Acted in: {}", stats.acted_in_count);
    println!("  • In genre: {}", stats.in_genre_count);
    println!("  • Relations total: {}", stats.relation_count());

    Ok(())
}
