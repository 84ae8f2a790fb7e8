//! Repository pattern for database operations

use crate::{DbConnection, DbError, Result};
use cinegraph_core::{Genre, Movie, Person, RelationKind};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use tracing::instrument;

/// Repository for all database operations
#[derive(Clone)]
pub struct Repository {
    db: DbConnection,
}

impl Repository {
    /// Create a new repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    // ==========================================
    // CATALOG MERGE OPERATIONS
    // ==========================================

    /// Create or update a movie, keyed by its catalog `movie_id`.
    ///
    /// Re-running the merge updates the scalar fields and leaves any
    /// existing embedding in place.
    #[instrument(skip(self, movie))]
    pub async fn upsert_movie(&self, movie: &Movie) -> Result<Movie> {
        let result: Option<Movie> = self
            .db
            .query(
                r#"
                INSERT INTO movie (movie_id, title, released, imdb_rating)
                VALUES ($movie_id, $title, $released, $imdb_rating)
                ON DUPLICATE KEY UPDATE
                    title = $title,
                    released = $released,
                    imdb_rating = $imdb_rating
            "#,
            )
            .bind(("movie_id", movie.movie_id.clone()))
            .bind(("title", movie.title.clone()))
            .bind(("released", movie.released.to_string()))
            .bind(("imdb_rating", movie.imdb_rating))
            .await?
            .take(0)?;

        result.ok_or_else(|| DbError::CreateFailed("movie".into()))
    }

    /// Create or get an existing person by name
    #[instrument(skip(self))]
    pub async fn upsert_person(&self, name: &str) -> Result<Person> {
        let result: Option<Person> = self
            .db
            .query(
                r#"
                INSERT INTO person (name)
                VALUES ($name)
                ON DUPLICATE KEY UPDATE name = $name
            "#,
            )
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;

        result.ok_or_else(|| DbError::CreateFailed("person".into()))
    }

    /// Create or get an existing genre by name
    #[instrument(skip(self))]
    pub async fn upsert_genre(&self, name: &str) -> Result<Genre> {
        let result: Option<Genre> = self
            .db
            .query(
                r#"
                INSERT INTO genre (name)
                VALUES ($name)
                ON DUPLICATE KEY UPDATE name = $name
            "#,
            )
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;

        result.ok_or_else(|| DbError::CreateFailed("genre".into()))
    }

    /// Merge a relation between two records.
    ///
    /// The relation tables carry a unique (in, out) index, so repeating the
    /// merge reuses the existing edge instead of adding a duplicate.
    /// Table names must be literal in the statement, hence one query per kind.
    #[instrument(skip(self))]
    pub async fn relate(
        &self,
        from: &RecordId,
        kind: RelationKind,
        to: &RecordId,
    ) -> Result<()> {
        let statement = match kind {
            RelationKind::Directed => {
                "INSERT RELATION INTO directed { in: $from, out: $to } \
                 ON DUPLICATE KEY UPDATE out = $to"
            }
            RelationKind::ActedIn => {
                "INSERT RELATION INTO acted_in { in: $from, out: $to } \
                 ON DUPLICATE KEY UPDATE out = $to"
            }
            RelationKind::InGenre => {
                "INSERT RELATION INTO in_genre { in: $from, out: $to } \
                 ON DUPLICATE KEY UPDATE out = $to"
            }
        };

        self.db
            .query(statement)
            .bind(("from", from.clone()))
            .bind(("to", to.clone()))
            .await?;

        Ok(())
    }

    // ==========================================
    // MOVIE OPERATIONS
    // ==========================================

    /// Get a movie by its catalog id
    #[instrument(skip(self))]
    pub async fn get_movie(&self, movie_id: &str) -> Result<Option<Movie>> {
        let movie: Option<Movie> = self
            .db
            .query("SELECT * FROM movie WHERE movie_id = $movie_id")
            .bind(("movie_id", movie_id.to_string()))
            .await?
            .take(0)?;

        Ok(movie)
    }

    /// List every movie in the store (for index building)
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let movies: Vec<Movie> = self.db.query("SELECT * FROM movie").await?.take(0)?;
        Ok(movies)
    }

    /// Persist a movie's embedding vector
    #[instrument(skip(self, embedding))]
    pub async fn update_movie_embedding(
        &self,
        id: &RecordId,
        embedding: Vec<f32>,
    ) -> Result<()> {
        self.db
            .query("UPDATE movie SET embedding = $embedding WHERE id = $id")
            .bind(("id", id.clone()))
            .bind(("embedding", embedding))
            .await?;

        Ok(())
    }

    // ==========================================
    // SEARCH OPERATIONS
    // ==========================================

    /// Nearest-neighbor search over movie embeddings
    #[instrument(skip(self, embedding))]
    pub async fn vector_search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<MovieHit>> {
        let results: Vec<MovieHit> = self
            .db
            .query(
                r#"
                SELECT
                    id,
                    movie_id,
                    title,
                    released,
                    imdb_rating,
                    vector::distance::knn() AS distance
                FROM movie
                WHERE embedding <|16,COSINE|> $embedding
                ORDER BY distance ASC
                LIMIT $limit
            "#,
            )
            .bind(("embedding", embedding))
            .bind(("limit", limit))
            .await?
            .take(0)?;

        Ok(results)
    }

    // ==========================================
    // GENERATED QUERY EXECUTION
    // ==========================================

    /// Execute a generated SELECT statement and return its rows as JSON.
    ///
    /// The statement text comes from the query-generation pipeline; malformed
    /// statements surface the store's error unmodified.
    #[instrument(skip(self, statement))]
    pub async fn run_select(&self, statement: &str) -> Result<serde_json::Value> {
        let mut response = self.db.query(statement.to_string()).await?;
        let value: surrealdb::Value = response.take(0)?;
        Ok(serde_json::to_value(&value)?)
    }

    // ==========================================
    // QUESTION LOG
    // ==========================================

    /// Record an answered question
    #[instrument(skip(self, question, answer))]
    pub async fn record_question(&self, question: &str, answer: &str) -> Result<()> {
        let entry = QuestionRecord {
            uuid: uuid::Uuid::new_v4().to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        };

        self.db
            .query("CREATE question CONTENT $entry")
            .bind(("entry", entry))
            .await?;

        Ok(())
    }

    // ==========================================
    // STATS
    // ==========================================

    /// Get entity and relation counts
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<StoreStats> {
        let stats: Vec<StoreStats> = self
            .db
            .query(
                r#"
                RETURN {
                    movie_count: (SELECT count() FROM movie GROUP ALL)[0].count,
                    person_count: (SELECT count() FROM person GROUP ALL)[0].count,
                    genre_count: (SELECT count() FROM genre GROUP ALL)[0].count,
                    directed_count: (SELECT count() FROM directed GROUP ALL)[0].count,
                    acted_in_count: (SELECT count() FROM acted_in GROUP ALL)[0].count,
                    in_genre_count: (SELECT count() FROM in_genre GROUP ALL)[0].count
                }
            "#,
            )
            .await?
            .take(0)?;

        stats
            .into_iter()
            .next()
            .ok_or_else(|| DbError::QueryFailed("stats".into()))
    }
}

// ==========================================
// RESULT TYPES
// ==========================================

#[derive(Debug, Serialize)]
struct QuestionRecord {
    uuid: String,
    question: String,
    answer: String,
}

/// One row of a vector search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieHit {
    pub id: RecordId,
    pub movie_id: String,
    pub title: String,
    pub released: String,
    pub imdb_rating: Option<f32>,
    #[serde(default)]
    pub distance: Option<f32>,
}

impl MovieHit {
    /// Render the hit as a context line for answer synthesis
    pub fn context_line(&self) -> String {
        let rating = self
            .imdb_rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".into());
        format!(
            "title: {} | released: {} | rating: {}",
            self.title, self.released, rating
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreStats {
    #[serde(default)]
    pub movie_count: i64,
    #[serde(default)]
    pub person_count: i64,
    #[serde(default)]
    pub genre_count: i64,
    #[serde(default)]
    pub directed_count: i64,
    #[serde(default)]
    pub acted_in_count: i64,
    #[serde(default)]
    pub in_genre_count: i64,
}

impl StoreStats {
    /// Total relation count across the three relation tables
    pub fn relation_count(&self) -> i64 {
        self.directed_count + self.acted_in_count + self.in_genre_count
    }
}
