//! OpenAI embeddings client

use crate::{AgentError, Result};
use cinegraph_db::schema::EMBEDDING_DIMENSION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Maximum number of inputs per embeddings API call
const MAX_BATCH: usize = 256;

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn validate_embedding_dim(len: usize) -> Result<()> {
    if len != EMBEDDING_DIMENSION {
        return Err(AgentError::Processing(format!(
            "Embedding dimension {} does not match expected {}. Choose a {}-dim model or update the schema.",
            len, EMBEDDING_DIMENSION, EMBEDDING_DIMENSION
        )));
    }
    Ok(())
}

/// Client for the embeddings endpoint
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a client from the environment.
    ///
    /// Fails before any network call when `OPENAI_API_KEY` is missing.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::Config("OPENAI_API_KEY is not set".into()))?;
        let model = env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);
        let base_url = env_or_default("OPENAI_API_BASE", DEFAULT_API_BASE);

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        })
    }

    /// Override the API base URL (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate an embedding for a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_chunk(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| AgentError::Processing("No embedding returned".into()))
    }

    /// Generate embeddings for many texts, chunking the requests
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH) {
            let embeddings = self.embed_chunk(chunk).await?;
            results.extend(embeddings);
        }
        Ok(results)
    }

    async fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        debug!("Requesting embeddings for {} texts", texts.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbedResponse = response.json().await?;
        let embeddings: Vec<Vec<f32>> = body
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect();

        if let Some(first) = embeddings.first() {
            validate_embedding_dim(first.len())?;
        }

        Ok(embeddings)
    }
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
}
