//! Genre records

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A movie genre, merged idempotently by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    /// Unique identifier
    pub id: Option<RecordId>,

    /// Genre name, as it appears in the catalog (trimmed)
    pub name: String,
}

impl Genre {
    /// Create a new genre
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_creation() {
        let genre = Genre::new(" Adventure");

        assert_eq!(genre.name, "Adventure");
    }
}
