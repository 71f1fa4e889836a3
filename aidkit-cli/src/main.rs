//! Command-line launcher for the aidkit first-aid assistant.
//!
//! Two entry points, both thin shells over the core:
//!
//! - `aidkit index` builds or refreshes the persisted first-aid index
//! - `aidkit chat` starts the interactive assistant console
//!
//! Requires `GOOGLE_API_KEY` or `GEMINI_API_KEY` (a `.env` file is honored).

mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aidkit_agent::{Coordinator, FirstAidExpert};
use aidkit_model::GeminiModel;
use aidkit_rag::{
    GeminiEmbeddingProvider, IndexManager, IndexSettings, LocalVectorStore, RagConfig,
    RecursiveChunker, Retriever,
};

#[derive(Parser)]
#[command(name = "aidkit", version, about = "Grounded first-aid assistant with triage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct IndexArgs {
    /// Directory of first-aid reference manuals (.txt, .md, .pdf)
    #[arg(long, default_value = "./manuals")]
    corpus: PathBuf,

    /// Directory the persisted index lives under
    #[arg(long, default_value = "./index")]
    store: PathBuf,

    /// Name of the persisted collection
    #[arg(long, default_value = IndexSettings::DEFAULT_COLLECTION)]
    collection: String,
}

#[derive(Subcommand)]
enum Command {
    /// Build or refresh the first-aid index offline
    Index {
        #[command(flatten)]
        args: IndexArgs,

        /// Discard any existing collection and rebuild from scratch
        #[arg(long)]
        rebuild: bool,
    },
    /// Start the interactive assistant console
    Chat {
        #[command(flatten)]
        args: IndexArgs,
    },
}

fn build_manager(args: &IndexArgs) -> anyhow::Result<Arc<IndexManager>> {
    let embedder = GeminiEmbeddingProvider::from_env()
        .context("embedding provider could not be initialized")?;

    let config = RagConfig::default();
    let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap);

    Ok(Arc::new(IndexManager::new(
        IndexSettings::new(&args.corpus).with_collection(args.collection.as_str()),
        config,
        Arc::new(embedder),
        Arc::new(LocalVectorStore::new(&args.store)),
        Arc::new(chunker),
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Index { args, rebuild } => {
            let manager = build_manager(&args)?;
            let handle = if rebuild {
                manager.rebuild().await.context("index rebuild failed")?
            } else {
                manager.ensure_ready().await.context("index build failed")?
            };
            println!(
                "Index '{}' ready: {} passages (embedding model: {})",
                handle.collection(),
                handle.entries(),
                handle.embedding_model()
            );
        }
        Command::Chat { args } => {
            let manager = build_manager(&args)?;
            let retriever = Arc::new(Retriever::new(manager));

            let llm: Arc<dyn aidkit_model::Llm> =
                Arc::new(GeminiModel::from_env().context("language model could not be initialized")?);
            let expert = Arc::new(FirstAidExpert::new(retriever, llm.clone()));
            let coordinator = Coordinator::new(llm, expert);

            console::run(&coordinator).await?;
        }
    }

    Ok(())
}
