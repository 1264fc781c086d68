use std::path::Path;

use log::{info, warn};
use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};
use crate::models::{ContactId, ContactRecord, NewContact};

use super::connection::{open_connection, open_in_memory_connection};
use super::contacts::{
    delete_contacts_by_name, fetch_contact, fetch_contacts, insert_contact, update_contact,
};

/// Owning handle around the SQLite connection. Whoever owns the store is the
/// only writer; the connection is acquired once and released once.
pub struct ContactStore {
    conn: Option<Connection>,
}

impl ContactStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            conn: Some(open_connection(path)?),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Some(open_in_memory_connection()?),
        })
    }

    pub(crate) fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    pub fn insert(&self, contact: &NewContact) -> StoreResult<ContactRecord> {
        insert_contact(self.conn()?, contact)
    }

    pub fn list_all(&self) -> StoreResult<Vec<ContactRecord>> {
        fetch_contacts(self.conn()?)
    }

    pub fn fetch(&self, id: ContactId) -> StoreResult<Option<ContactRecord>> {
        fetch_contact(self.conn()?, id)
    }

    pub fn delete_by_name(&self, name: &str) -> StoreResult<usize> {
        delete_contacts_by_name(self.conn()?, name)
    }

    pub fn update_by_id(&self, id: ContactId, contact: &NewContact) -> StoreResult<()> {
        update_contact(self.conn()?, id, contact)
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> StoreResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=store_close module=db status=ok");
                Ok(())
            }
            Err((_conn, source)) => {
                warn!("event=store_close module=db status=error err={source}");
                Err(StoreError::Sqlite {
                    context: "failed to close SQLite database",
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            age: 30,
            national_id: "0102030405".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0991234567".to_string(),
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = ContactStore::open_in_memory().unwrap();
        let first = store.insert(&contact("Ana")).unwrap();
        store.delete_by_name("Ana").unwrap();
        let second = store.insert(&contact("Ana")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn fetch_returns_none_for_unknown_id() {
        let store = ContactStore::open_in_memory().unwrap();
        assert_eq!(store.fetch(ContactId(42)).unwrap(), None);
    }

    #[test]
    fn operations_fail_after_close() {
        let mut store = ContactStore::open_in_memory().unwrap();
        store.close().unwrap();
        store.close().unwrap();

        assert!(store.is_closed());
        assert!(matches!(store.list_all(), Err(StoreError::Closed)));
    }
}
