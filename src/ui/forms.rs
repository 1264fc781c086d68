use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{ContactDraft, ContactId, ContactRecord, Field};
use crate::validation::{MAX_AGE_DIGITS, MAX_NATIONAL_ID_DIGITS, MAX_PHONE_DIGITS};

/// Internal representation of the contact form used for both add and edit.
#[derive(Clone)]
pub(crate) struct ContactForm {
    pub(crate) draft: ContactDraft,
    pub(crate) active: Field,
    pub(crate) error: Option<String>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            draft: ContactDraft::default(),
            active: Field::Name,
            error: None,
        }
    }
}

impl ContactForm {
    /// Populate the form from an existing contact when editing.
    pub(crate) fn from_record(record: &ContactRecord) -> Self {
        Self {
            draft: ContactDraft::from_record(record),
            ..Self::default()
        }
    }

    /// Move focus forward or backward through the fields, wrapping around.
    pub(crate) fn cycle_field(&mut self, forward: bool) {
        let idx = Field::ALL
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0);
        let len = Field::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.active = Field::ALL[next];
    }

    /// Append a character to the active field. Numeric fields only take digits
    /// up to their maximum length.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let limit = match self.active {
            Field::Age => Some(MAX_AGE_DIGITS),
            Field::NationalId => Some(MAX_NATIONAL_ID_DIGITS),
            Field::Phone => Some(MAX_PHONE_DIGITS),
            Field::Name | Field::Email => None,
        };

        let value = self.draft.value_mut(self.active);
        match limit {
            Some(max) => {
                if ch.is_ascii_digit() && value.len() < max {
                    value.push(ch);
                    true
                } else {
                    false
                }
            }
            None => {
                if !ch.is_control() {
                    value.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.draft.value_mut(self.active).pop();
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: Field) -> Line<'static> {
        let value = self.draft.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: Field) -> usize {
        self.draft.value(field).chars().count()
    }
}

/// Pending deletion awaiting a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: ContactId,
    pub(crate) name: String,
}

impl From<&ContactRecord> for ConfirmDelete {
    fn from(record: &ContactRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}
