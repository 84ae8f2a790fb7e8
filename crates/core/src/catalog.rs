//! Catalog file format - the remote movie CSV
//!
//! Columns: `movieId, released, title, imdbRating, director, actors, genres`.
//! The `director`, `actors` and `genres` columns hold pipe-delimited lists.

use crate::error::{CoreError, Result};
use crate::movie::Movie;
use serde::Deserialize;

/// One row of the movie catalog CSV, as written in the source file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "movieId")]
    pub movie_id: String,
    pub released: String,
    pub title: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    pub director: String,
    pub actors: String,
    pub genres: String,
}

impl CatalogRow {
    /// Directors credited on this movie
    pub fn directors(&self) -> Vec<&str> {
        split_multi(&self.director)
    }

    /// Actors credited on this movie
    pub fn actors(&self) -> Vec<&str> {
        split_multi(&self.actors)
    }

    /// Genres this movie belongs to
    pub fn genres(&self) -> Vec<&str> {
        split_multi(&self.genres)
    }

    /// Convert the row into a [`Movie`].
    ///
    /// The release date must be a valid ISO date; the rating is parsed
    /// leniently and becomes `None` when empty or malformed.
    pub fn to_movie(&self) -> Result<Movie> {
        let released = self.released.trim().parse().map_err(|_| {
            CoreError::InvalidReleaseDate {
                movie_id: self.movie_id.clone(),
                value: self.released.clone(),
            }
        })?;
        let rating = self.imdb_rating.trim().parse::<f32>().ok();

        Ok(Movie::new(
            self.movie_id.trim(),
            self.title.trim(),
            released,
            rating,
        ))
    }
}

/// Split a pipe-delimited multi-value field, dropping empty segments.
fn split_multi(field: &str) -> Vec<&str> {
    field
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse the full catalog CSV text into rows.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogRow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CatalogRow = record?;
        rows.push(row);
    }
    Ok(rows)
}
