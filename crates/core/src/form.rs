use crate::participant::{Field, Participant};
use crate::secret::Secret;

/// Whether the draft is a new record or a change to an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    /// Editing the record whose serial was `original_serial` when edit mode
    /// was entered. `secret` is the password that unlocked the edit and is
    /// re-sent with the update.
    Edit {
        original_serial: String,
        secret: Secret,
    },
}

/// The single draft record being composed or edited.
#[derive(Debug, Clone, Default)]
pub struct FormBuffer {
    draft: Participant,
    mode: FormMode,
}

impl FormBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Participant {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// True when every field is empty and the buffer is in create mode.
    pub fn is_empty(&self) -> bool {
        !self.is_editing() && self.draft == Participant::default()
    }

    pub fn original_serial(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit {
                original_serial, ..
            } => Some(original_serial),
            FormMode::Create => None,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        self.draft.field(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    /// Replace the whole draft, keeping the current mode.
    pub fn fill(&mut self, record: Participant) {
        self.draft = record;
    }

    /// Copy `record` into the buffer and switch to edit mode.
    pub(crate) fn begin_edit(&mut self, record: Participant, secret: Secret) {
        self.mode = FormMode::Edit {
            original_serial: record.serial_number.clone(),
            secret,
        };
        self.draft = record;
    }

    /// The record that a submit would send.
    ///
    /// In edit mode the serial number is pinned to the one captured when
    /// editing began, whatever the draft currently holds.
    pub fn submission(&self) -> Participant {
        let mut record = self.draft.clone();
        if let FormMode::Edit {
            original_serial, ..
        } = &self.mode
        {
            record.serial_number = original_serial.clone();
        }
        record
    }

    /// Back to an empty create-mode buffer.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
