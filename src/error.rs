//! Error types for the store and the controller. Validation problems are kept
//! apart from storage failures so the UI can show a blocking message for the
//! former and a distinct failure notice for the latter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{ContactId, Field};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{context}")]
    Sqlite {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create data directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Contact {0} not found.")]
    NotFound(ContactId),
    #[error("contact store is closed")]
    Closed,
}

/// Attach a short description to a raw SQLite error, in the spirit of
/// `anyhow::Context`.
pub(crate) trait SqlContext<T> {
    fn sql_context(self, context: &'static str) -> StoreResult<T>;
}

impl<T> SqlContext<T> for Result<T, rusqlite::Error> {
    fn sql_context(self, context: &'static str) -> StoreResult<T> {
        self.map_err(|source| StoreError::Sqlite { context, source })
    }
}

/// User-input problems. None of them leave a partial write behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    EmptyField(Field),
    #[error("Name may only contain letters and spaces.")]
    InvalidName,
    #[error("Email address is not valid.")]
    InvalidEmail,
    #[error("Age must be a number between 0 and 99.")]
    InvalidAge,
    #[error("National ID must be up to 10 digits.")]
    InvalidNationalId,
    #[error("Phone must be up to 10 digits.")]
    InvalidPhone,
    #[error("A contact named '{0}' already exists.")]
    DuplicateContact(String),
    #[error("No contact selected.")]
    NoSelection,
}

/// Everything the controller can report back to the presentation layer.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Contact {0} not found.")]
    NotFound(String),
    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for ContactError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ContactError::NotFound(id.to_string()),
            other => ContactError::Storage(other),
        }
    }
}
