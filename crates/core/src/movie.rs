//! Movie records - the primary catalog entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A movie from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Unique identifier (maps to SurrealDB record ID)
    pub id: Option<RecordId>,

    /// Catalog identifier from the source CSV
    pub movie_id: String,

    /// Display title
    pub title: String,

    /// Release date (stored as an ISO date string)
    pub released: NaiveDate,

    /// IMDB rating; absent when the source column was empty or malformed
    pub imdb_rating: Option<f32>,

    /// Vector embedding (1536 dimensions for text-embedding-3-small)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl Movie {
    /// Create a new movie record
    pub fn new(
        movie_id: impl Into<String>,
        title: impl Into<String>,
        released: NaiveDate,
        imdb_rating: Option<f32>,
    ) -> Self {
        Self {
            id: None,
            movie_id: movie_id.into(),
            title: title.into(),
            released,
            imdb_rating,
            embedding: Vec::new(),
        }
    }

    /// Builder pattern: set embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Check if the movie has an embedding
    pub fn has_embedding(&self) -> bool {
        !self.embedding.is_empty()
    }

    /// The text that gets embedded for similarity search: one line per
    /// indexed field, in a fixed order.
    pub fn embedding_text(&self) -> String {
        let rating = self
            .imdb_rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".into());
        format!(
            "title: {}\nreleased: {}\nrating: {}",
            self.title, self.released, rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Movie {
        Movie::new(
            "1",
            "Toy Story",
            NaiveDate::from_ymd_opt(1995, 11, 22).unwrap(),
            Some(8.3),
        )
    }

    #[test]
    fn test_movie_creation() {
        let movie = sample();

        assert_eq!(movie.movie_id, "1");
        assert_eq!(movie.title, "Toy Story");
        assert_eq!(movie.imdb_rating, Some(8.3));
        assert!(!movie.has_embedding());
    }

    #[test]
    fn test_embedding_text_format() {
        let movie = sample();

        assert_eq!(
            movie.embedding_text(),
            "title: Toy Story\nreleased: 1995-11-22\nrating: 8.3"
        );
    }

    #[test]
    fn test_embedding_text_without_rating() {
        let movie = Movie::new(
            "2",
            "Obscure Film",
            NaiveDate::from_ymd_opt(2001, 3, 9).unwrap(),
            None,
        );

        assert!(movie.embedding_text().ends_with("rating: unknown"));
    }

    #[test]
    fn test_movie_with_embedding() {
        let embedding = vec![0.1, 0.2, 0.3];
        let movie = sample().with_embedding(embedding.clone());

        assert!(movie.has_embedding());
        assert_eq!(movie.embedding, embedding);
    }
}
