//! Core domain types for Cinegraph
//!
//! This crate defines the fundamental data structures used throughout
//! the application: movies, people, genres, their relations, and the
//! catalog file format they are loaded from.

pub mod catalog;
pub mod error;
pub mod genre;
pub mod movie;
pub mod person;
pub mod relation;

pub use catalog::{parse_catalog, CatalogRow};
pub use error::{CoreError, Result};
pub use genre::Genre;
pub use movie::Movie;
pub use person::Person;
pub use relation::RelationKind;
