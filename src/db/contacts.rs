use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{SqlContext, StoreError, StoreResult};
use crate::models::{ContactId, ContactRecord, NewContact};

const SELECT_COLUMNS: &str = "SELECT ID, NOMBRE, EDAD, CI, CORREO, TELEFONO FROM contacts";

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
    Ok(ContactRecord {
        id: ContactId(row.get(0)?),
        name: row.get(1)?,
        age: row.get(2)?,
        national_id: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
    })
}

/// Retrieve every contact in storage order. Callers must not rely on the
/// order for identity; the id is the identity.
pub fn fetch_contacts(conn: &Connection) -> StoreResult<Vec<ContactRecord>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY ID"))
        .sql_context("failed to prepare contact query")?;

    let contacts = stmt
        .query_map([], contact_from_row)
        .sql_context("failed to load contacts")?
        .collect::<Result<Vec<_>, _>>()
        .sql_context("failed to collect contacts")?;

    Ok(contacts)
}

/// Look up a single contact by id.
pub fn fetch_contact(conn: &Connection, id: ContactId) -> StoreResult<Option<ContactRecord>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE ID = ?1"),
        params![id.0],
        contact_from_row,
    )
    .optional()
    .sql_context("failed to load contact")
}

/// Insert a new contact, returning the hydrated record so the caller can use
/// the assigned id straight away. No uniqueness check happens here.
pub fn insert_contact(conn: &Connection, contact: &NewContact) -> StoreResult<ContactRecord> {
    conn.execute(
        "INSERT INTO contacts (NOMBRE, EDAD, CI, CORREO, TELEFONO) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            contact.name,
            contact.age,
            contact.national_id,
            contact.email,
            contact.phone
        ],
    )
    .sql_context("failed to insert contact")?;

    let id = ContactId(conn.last_insert_rowid());
    info!("event=contact_insert module=db status=ok id={id}");
    Ok(ContactRecord {
        id,
        name: contact.name.clone(),
        age: contact.age,
        national_id: contact.national_id.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
    })
}

/// Remove every contact whose name matches exactly. Returns the number of rows
/// removed; zero is not an error so repeated calls stay harmless.
pub fn delete_contacts_by_name(conn: &Connection, name: &str) -> StoreResult<usize> {
    let deleted = conn
        .execute("DELETE FROM contacts WHERE NOMBRE = ?1", params![name])
        .sql_context("failed to delete contact")?;

    debug!("event=contact_delete module=db status=ok rows={deleted}");
    Ok(deleted)
}

/// Overwrite all editable fields of a contact. Touching zero rows surfaces an
/// explicit `NotFound` instead of silently continuing.
pub fn update_contact(conn: &Connection, id: ContactId, contact: &NewContact) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE contacts SET NOMBRE = ?1, EDAD = ?2, CI = ?3, CORREO = ?4, TELEFONO = ?5
             WHERE ID = ?6",
            params![
                contact.name,
                contact.age,
                contact.national_id,
                contact.email,
                contact.phone,
                id.0
            ],
        )
        .sql_context("failed to update contact")?;

    if updated == 0 {
        Err(StoreError::NotFound(id))
    } else {
        info!("event=contact_update module=db status=ok id={id}");
        Ok(())
    }
}
