//! Embedding indexer - builds the vector index over stored movies

use crate::{AgentError, EmbeddingClient, Result};
use cinegraph_db::Repository;
use tracing::{info, instrument};

/// Builds the similarity index: every movie's textual fields are embedded
/// and the vector persisted on the record.
///
/// The build is one-shot and non-incremental: every run re-embeds every
/// movie, including those that already carry a vector.
pub struct EmbeddingIndexer {
    repo: Repository,
    embeddings: EmbeddingClient,
}

impl EmbeddingIndexer {
    /// Create a new indexer
    pub fn new(repo: Repository, embeddings: EmbeddingClient) -> Self {
        Self { repo, embeddings }
    }

    /// Embed every stored movie and persist the vectors.
    ///
    /// Returns the number of movies indexed.
    #[instrument(skip(self))]
    pub async fn build_index(&self) -> Result<usize> {
        let movies = self.repo.list_movies().await?;

        if movies.is_empty() {
            info!("No movies in the store; nothing to index");
            return Ok(0);
        }

        info!("Embedding {} movies", movies.len());

        let texts: Vec<String> = movies.iter().map(|m| m.embedding_text()).collect();
        let vectors = self.embeddings.embed_batch(&texts).await?;

        if vectors.len() != movies.len() {
            return Err(AgentError::Processing(format!(
                "Embedding count mismatch: {} texts, {} vectors",
                movies.len(),
                vectors.len()
            )));
        }

        for (movie, vector) in movies.into_iter().zip(vectors) {
            let id = movie.id.ok_or_else(|| {
                AgentError::Processing(format!(
                    "movie {} is missing its record id",
                    movie.movie_id
                ))
            })?;
            self.repo.update_movie_embedding(&id, vector).await?;
        }

        info!("Vector index build complete");

        Ok(texts.len())
    }
}
