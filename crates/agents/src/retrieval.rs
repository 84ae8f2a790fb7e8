//! Retrieval QA pipeline - similarity search plus answer synthesis

use crate::{ChatClient, ChatMessage, EmbeddingClient, Result};
use cinegraph_db::Repository;
use tracing::{debug, info, instrument};

const DEFAULT_TOP_K: usize = 4;

/// Answers questions from nearest-neighbor movie context.
///
/// The question is embedded, the closest movies are fetched, and the chat
/// model synthesizes an answer from that context alone.
pub struct RetrievalQa {
    repo: Repository,
    embeddings: EmbeddingClient,
    llm: ChatClient,
    top_k: usize,
}

impl RetrievalQa {
    /// Create a new retrieval pipeline
    pub fn new(repo: Repository, embeddings: EmbeddingClient, llm: ChatClient) -> Self {
        Self {
            repo,
            embeddings,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set how many neighbors feed the answer
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a question from retrieved movie context
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<String> {
        info!("Retrieval QA: {}", question);

        debug!("Generating query embedding...");
        let embedding = self.embeddings.embed(question).await?;

        let hits = self.repo.vector_search(embedding, self.top_k).await?;
        debug!("Retrieved {} movies", hits.len());

        // An empty hit set still goes to the model; whatever it produces
        // (including "I don't know") is the answer.
        let context = hits
            .iter()
            .map(|hit| hit.context_line())
            .collect::<Vec<_>>()
            .join("\n");

        let system = format!(
            "Use the following movie records to answer the question at the end. \
             If the records do not contain the answer, just say that you don't know; \
             do not make up an answer.\n\nMovie records:\n{}",
            context
        );

        self.llm
            .chat(&[ChatMessage::system(system), ChatMessage::user(question)])
            .await
    }
}
