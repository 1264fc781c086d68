//! Persistence module split across logical submodules.

mod connection;
mod contacts;
mod store;

pub use store::ContactStore;
