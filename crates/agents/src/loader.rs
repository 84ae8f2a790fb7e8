//! Catalog loader - merges the remote movie CSV into the graph store

use crate::{AgentError, Result};
use cinegraph_core::{parse_catalog, CatalogRow, RelationKind};
use cinegraph_db::Repository;
use std::collections::HashSet;
use surrealdb::RecordId;
use tracing::{debug, info, instrument};

/// The catalog this tool was built around
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/tomasonjo/blog-datasets/main/movies/movies_small.csv";

/// Counts of distinct records processed by a load run
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub movies: usize,
    pub people: usize,
    pub genres: usize,
}

/// The loader merges catalog rows into the store.
///
/// Every operation is a merge: re-running the load against the same store
/// reuses existing records and never duplicates entities or relations.
pub struct CatalogLoader {
    repo: Repository,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a new loader
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the catalog CSV and merge every row into the store
    #[instrument(skip(self))]
    pub async fn load(&self, url: &str) -> Result<LoadReport> {
        info!("Fetching movie catalog from {}", url);

        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let rows = parse_catalog(&text)?;
        info!("Parsed {} catalog rows", rows.len());

        self.load_rows(&rows).await
    }

    /// Merge already-parsed catalog rows into the store
    #[instrument(skip(self, rows))]
    pub async fn load_rows(&self, rows: &[CatalogRow]) -> Result<LoadReport> {
        let mut people = HashSet::new();
        let mut genres = HashSet::new();

        for row in rows {
            let movie = row.to_movie()?;
            let stored = self.repo.upsert_movie(&movie).await?;
            let movie_ref = record_ref(stored.id, "movie")?;

            debug!("Merged movie {} ({})", stored.title, stored.movie_id);

            for name in row.directors() {
                let person = self.repo.upsert_person(name).await?;
                let person_ref = record_ref(person.id, "person")?;
                self.repo
                    .relate(&person_ref, RelationKind::Directed, &movie_ref)
                    .await?;
                people.insert(person.name);
            }

            for name in row.actors() {
                let person = self.repo.upsert_person(name).await?;
                let person_ref = record_ref(person.id, "person")?;
                self.repo
                    .relate(&person_ref, RelationKind::ActedIn, &movie_ref)
                    .await?;
                people.insert(person.name);
            }

            for name in row.genres() {
                let genre = self.repo.upsert_genre(name).await?;
                let genre_ref = record_ref(genre.id, "genre")?;
                self.repo
                    .relate(&movie_ref, RelationKind::InGenre, &genre_ref)
                    .await?;
                genres.insert(genre.name);
            }
        }

        let report = LoadReport {
            movies: rows.len(),
            people: people.len(),
            genres: genres.len(),
        };

        info!(
            "Catalog load complete: {} movies, {} people, {} genres",
            report.movies, report.people, report.genres
        );

        Ok(report)
    }
}

fn record_ref(id: Option<RecordId>, table: &str) -> Result<RecordId> {
    id.ok_or_else(|| AgentError::Processing(format!("{} record is missing its id", table)))
}
