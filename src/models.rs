//! Domain models that mirror the SQLite schema and get passed between the
//! store, the controller and the TUI. They stay light-weight data holders so
//! the other layers can focus on persistence and validation.

use std::fmt;

/// Primary key of a contact row. Assigned by SQLite on insert and never
/// reused thanks to `AUTOINCREMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A stored contact. Field order matches the export column order.
pub struct ContactRecord {
    /// Primary key from the database. Edit and delete flows bubble it back to
    /// the persistence layer.
    pub id: ContactId,
    /// Display name, unique across live contacts.
    pub name: String,
    /// Age in years, always within `0..=99`.
    pub age: u8,
    /// National identity number. Kept as text so leading zeros survive.
    pub national_id: String,
    pub email: String,
    /// Phone number as digits only.
    pub phone: String,
}

impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The five user-facing fields of a contact, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    NationalId,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Age,
        Field::NationalId,
        Field::Email,
        Field::Phone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::NationalId => "National ID",
            Field::Email => "Email",
            Field::Phone => "Phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw text for a contact exactly as the user typed it. The controller turns a
/// draft into typed values once validation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub age: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
}

impl ContactDraft {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        national_id: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            national_id: national_id.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Pre-fill a draft from a stored record, used when entering edit mode.
    pub fn from_record(record: &ContactRecord) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.to_string(),
            national_id: record.national_id.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::NationalId => &self.national_id,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Age => &mut self.age,
            Field::NationalId => &mut self.national_id,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        }
    }
}

/// Validated, typed field values ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub age: u8,
    pub national_id: String,
    pub email: String,
    pub phone: String,
}
