use std::fs;
use std::path::Path;

use log::info;
use rusqlite::Connection;

use crate::error::{SqlContext, StoreError, StoreResult};

/// Ensure the database file exists, create the contacts table if needed, and
/// return a live connection.
pub fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path).sql_context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    info!(
        "event=store_open module=db status=ok path={}",
        path.display()
    );
    Ok(conn)
}

/// Same schema on a throwaway in-memory database.
pub fn open_in_memory_connection() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory().sql_context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the single contacts table. Column names are the Spanish field
/// names (`NOMBRE`, `EDAD`, `CI`, ...) the data was first captured under.
fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NOMBRE TEXT NOT NULL,
            EDAD INTEGER NOT NULL,
            CI TEXT NOT NULL,
            CORREO TEXT NOT NULL,
            TELEFONO TEXT NOT NULL
        )",
        [],
    )
    .sql_context("failed to create contacts table")?;

    Ok(())
}
