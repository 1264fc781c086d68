//! Ratatui front-end for the contact book: a table of contacts, modal forms
//! for add/edit, a delete confirmation, incremental search and export keys.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
