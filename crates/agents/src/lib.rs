//! Orchestration layer for Cinegraph
//!
//! This crate contains the OpenAI clients and the pipeline components:
//! - Loader: merges the remote movie catalog into the graph store
//! - Indexer: embeds movies for similarity search
//! - Retrieval/Graph QA: the two question-answering pipelines
//! - Router: the agent loop that picks a pipeline per question

pub mod embeddings;
pub mod error;
pub mod graph_qa;
pub mod indexer;
pub mod llm;
pub mod loader;
pub mod retrieval;
pub mod router;

pub use embeddings::EmbeddingClient;
pub use error::{AgentError, Result};
pub use graph_qa::GraphQa;
pub use indexer::EmbeddingIndexer;
pub use llm::{ChatClient, ChatMessage};
pub use loader::{CatalogLoader, LoadReport, DEFAULT_CATALOG_URL};
pub use retrieval::RetrievalQa;
pub use router::RoutingAgent;
