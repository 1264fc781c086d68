//! Business rules on top of the contact store.
//!
//! The controller keeps a cached listing that mirrors the store after every
//! mutation, remembers which contact is selected (by id, never by copy), and
//! runs all validation before anything touches the database.

use log::{debug, info, warn};

use crate::db::ContactStore;
use crate::error::{ContactError, ValidationError};
use crate::models::{ContactDraft, ContactId, ContactRecord, NewContact};
use crate::validation::validate_draft;

pub type ContactResult<T> = Result<T, ContactError>;

pub struct ContactController {
    store: ContactStore,
    contacts: Vec<ContactRecord>,
    selected: Option<ContactId>,
}

impl ContactController {
    /// Wrap a store and load the initial listing.
    pub fn new(store: ContactStore) -> ContactResult<Self> {
        let contacts = store.list_all()?;
        Ok(Self {
            store,
            contacts,
            selected: None,
        })
    }

    /// Cached full listing, refreshed after every mutation.
    pub fn contacts(&self) -> &[ContactRecord] {
        &self.contacts
    }

    /// Fresh read straight from the store, for exporters.
    pub fn snapshot(&self) -> ContactResult<Vec<ContactRecord>> {
        Ok(self.store.list_all()?)
    }

    /// Reload the listing. A selection whose record disappeared is dropped.
    pub fn refresh(&mut self) -> ContactResult<()> {
        self.contacts = self.store.list_all()?;
        if let Some(id) = self.selected {
            if self.find(id).is_none() {
                debug!("event=selection_dropped module=controller id={id}");
                self.selected = None;
            }
        }
        Ok(())
    }

    pub fn add(&mut self, draft: &ContactDraft) -> ContactResult<ContactRecord> {
        let contact = self.validated(draft, None)?;

        let record = self.store.insert(&contact)?;
        self.selected = None;
        self.refresh()?;
        info!(
            "event=contact_add module=controller status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Overwrite the selected contact with the draft. The draft goes through
    /// the same checks as `add`; the duplicate check ignores the contact itself.
    pub fn update(&mut self, draft: &ContactDraft) -> ContactResult<ContactRecord> {
        let id = self.selected.ok_or(ValidationError::NoSelection)?;
        let contact = self.validated(draft, Some(id))?;

        if let Err(err) = self.store.update_by_id(id, &contact) {
            warn!("event=contact_update module=controller status=error id={id} err={err}");
            self.refresh()?;
            return Err(err.into());
        }

        self.selected = None;
        self.refresh()?;
        info!("event=contact_update module=controller status=ok id={id}");
        Ok(ContactRecord {
            id,
            name: contact.name,
            age: contact.age,
            national_id: contact.national_id,
            email: contact.email,
            phone: contact.phone,
        })
    }

    /// Delete every contact named `name`. A selection is required even though
    /// the row is addressed by name.
    pub fn delete(&mut self, name: &str) -> ContactResult<usize> {
        if self.selected.is_none() {
            return Err(ValidationError::NoSelection.into());
        }

        let removed = self.store.delete_by_name(name)?;
        if removed == 0 {
            self.refresh()?;
            return Err(ContactError::NotFound(name.to_string()));
        }

        self.selected = None;
        self.refresh()?;
        info!("event=contact_delete module=controller status=ok rows={removed}");
        Ok(removed)
    }

    /// Case-insensitive substring match on the name. A blank query returns
    /// the whole listing; otherwise spaces in the query count.
    pub fn search(&self, query: &str) -> Vec<ContactRecord> {
        if query.trim().is_empty() {
            return self.contacts.clone();
        }
        let needle = query.to_lowercase();

        self.contacts
            .iter()
            .filter(|contact| contact.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Toggle the selection. Returns `true` when `id` ends up selected and
    /// `false` when the call deselected it.
    pub fn select(&mut self, id: ContactId) -> ContactResult<bool> {
        if self.find(id).is_none() {
            return Err(ContactError::NotFound(id.to_string()));
        }

        if self.selected == Some(id) {
            self.selected = None;
            Ok(false)
        } else {
            self.selected = Some(id);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<ContactId> {
        self.selected
    }

    /// The selected record, looked up by id in the current listing.
    pub fn selected(&self) -> Option<&ContactRecord> {
        self.selected.and_then(|id| self.find(id))
    }

    /// Read the selected contact straight from the store, so an edit starts
    /// from what is on disk. A selection whose row is gone is dropped and the
    /// listing reloaded.
    pub fn reload_selected(&mut self) -> ContactResult<Option<ContactRecord>> {
        let Some(id) = self.selected else {
            return Ok(None);
        };

        match self.store.fetch(id)? {
            Some(record) => {
                if let Some(cached) = self.contacts.iter_mut().find(|c| c.id == id) {
                    *cached = record.clone();
                }
                Ok(Some(record))
            }
            None => {
                self.refresh()?;
                Err(ContactError::NotFound(id.to_string()))
            }
        }
    }

    pub fn close(&mut self) -> ContactResult<()> {
        self.selected = None;
        self.contacts.clear();
        Ok(self.store.close()?)
    }

    fn find(&self, id: ContactId) -> Option<&ContactRecord> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    fn validated(
        &self,
        draft: &ContactDraft,
        updating: Option<ContactId>,
    ) -> ContactResult<NewContact> {
        let contact = validate_draft(draft).map_err(|err| {
            debug!("event=validation_failed module=controller reason={err:?}");
            err
        })?;

        let duplicate = self
            .store
            .list_all()?
            .into_iter()
            .any(|existing| existing.name == contact.name && Some(existing.id) != updating);
        if duplicate {
            return Err(ValidationError::DuplicateContact(contact.name).into());
        }

        Ok(contact)
    }
}
