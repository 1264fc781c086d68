//! Core library surface for the Contact Book TUI application.
//!
//! The store and controller carry all the data rules; the exporters and the
//! terminal UI are thin consumers of the controller so the `bin` target as
//! well as tests can reuse the same pieces.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod validation;

pub use config::AppConfig;
pub use controller::ContactController;
pub use db::ContactStore;
pub use error::{ContactError, StoreError, ValidationError};
pub use export::{export_contacts, ExportFormat};
pub use logging::init_logging;
pub use models::{ContactDraft, ContactId, ContactRecord, Field};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
