//! SurrealDB schema definitions

use crate::{DbConnection, Result};
use tracing::info;

/// Embedding dimension (OpenAI text-embedding-3-small: 1536)
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Initialize the database schema
pub async fn initialize_schema(db: &DbConnection) -> Result<()> {
    info!("Initializing database schema...");

    db.query(SCHEMA_DEFINITION).await?;

    info!("Schema initialized successfully");
    Ok(())
}

const SCHEMA_DEFINITION: &str = r#"
-- ============================================
-- TABLES
-- ============================================

-- Movies table
DEFINE TABLE movie SCHEMAFULL;
DEFINE FIELD movie_id ON movie TYPE string;
DEFINE FIELD title ON movie TYPE string;
DEFINE FIELD released ON movie TYPE string;
DEFINE FIELD imdb_rating ON movie TYPE option<float>;
DEFINE FIELD embedding ON movie TYPE option<array<float>>;

-- People table (directors and actors)
DEFINE TABLE person SCHEMAFULL;
DEFINE FIELD name ON person TYPE string;

-- Genres table
DEFINE TABLE genre SCHEMAFULL;
DEFINE FIELD name ON genre TYPE string;

-- Question log
DEFINE TABLE question SCHEMAFULL;
DEFINE FIELD uuid ON question TYPE string;
DEFINE FIELD question ON question TYPE string;
DEFINE FIELD answer ON question TYPE string;
DEFINE FIELD created_at ON question TYPE datetime DEFAULT time::now();

-- ============================================
-- GRAPH RELATION TABLES
-- ============================================

DEFINE TABLE directed SCHEMAFULL;
DEFINE FIELD in ON directed TYPE record<person>;
DEFINE FIELD out ON directed TYPE record<movie>;

DEFINE TABLE acted_in SCHEMAFULL;
DEFINE FIELD in ON acted_in TYPE record<person>;
DEFINE FIELD out ON acted_in TYPE record<movie>;

DEFINE TABLE in_genre SCHEMAFULL;
DEFINE FIELD in ON in_genre TYPE record<movie>;
DEFINE FIELD out ON in_genre TYPE record<genre>;

-- ============================================
-- INDEXES
-- ============================================

-- Merge keys: re-loading the catalog must reuse existing records
DEFINE INDEX idx_movie_id ON movie FIELDS movie_id UNIQUE;
DEFINE INDEX idx_person_name ON person FIELDS name UNIQUE;
DEFINE INDEX idx_genre_name ON genre FIELDS name UNIQUE;

-- One relation record per (in, out) pair
DEFINE INDEX idx_directed_pair ON directed FIELDS in, out UNIQUE;
DEFINE INDEX idx_acted_in_pair ON acted_in FIELDS in, out UNIQUE;
DEFINE INDEX idx_in_genre_pair ON in_genre FIELDS in, out UNIQUE;

-- Vector index for similarity search (HNSW for performance)
DEFINE INDEX idx_movie_embedding ON movie FIELDS embedding
    HNSW DIMENSION 1536 DIST COSINE;
"#;

#[cfg(test)]
mod tests {
    use crate::init_memory;

    #[tokio::test]
    async fn test_schema_initialization() {
        let db = init_memory().await.expect("Failed to init db");

        // Verify tables exist by selecting from them
        let movies: Vec<serde_json::Value> = db.select("movie").await.unwrap();
        assert!(movies.is_empty());

        let people: Vec<serde_json::Value> = db.select("person").await.unwrap();
        assert!(people.is_empty());

        let genres: Vec<serde_json::Value> = db.select("genre").await.unwrap();
        assert!(genres.is_empty());
    }
}
