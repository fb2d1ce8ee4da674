//! Headless item editor
//!
//! Holds the text a user typed for one item, tracks whether anything was
//! touched since the last load/save, and turns save/delete requests into
//! provider calls with user-facing outcomes.

use crate::contract::{
    self, COLUMN_AMOUNT, COLUMN_BRAND, COLUMN_NAME, COLUMN_PRICE, PriceTier,
};
use crate::cursor::Cursor;
use crate::provider::ItemProvider;
use crate::uri::ItemUri;
use crate::values::ContentValues;
use crate::{Error, Result};

/// Whether the editor is creating a row or editing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Existing(ItemUri),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Fields mirror what was last loaded or saved
    Viewing,
    /// A field has focus; `dirty` once anything was touched
    Editing { dirty: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New item with nothing entered; nothing written
    Skipped,
    Inserted(ItemUri),
    InsertFailed,
    Updated(usize),
    UpdateFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    NothingToDelete,
    Deleted(usize),
    DeleteFailed,
}

/// Answer to a request to leave the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Close,
    ConfirmDiscard,
}

#[derive(Debug, Clone)]
pub struct Editor {
    mode: EditorMode,
    state: EditorState,
    name: String,
    brand: String,
    amount: String,
    price: PriceTier,
}

impl Editor {
    pub fn new_item() -> Self {
        Self::with_mode(EditorMode::New)
    }

    pub fn existing(uri: ItemUri) -> Self {
        Self::with_mode(EditorMode::Existing(uri))
    }

    fn with_mode(mode: EditorMode) -> Self {
        Self {
            mode,
            state: EditorState::Viewing,
            name: String::new(),
            brand: String::new(),
            amount: String::new(),
            price: PriceTier::Low,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn price(&self) -> PriceTier {
        self.price
    }

    /// Only rows that exist can be deleted
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, EditorMode::Existing(_))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        matches!(self.state, EditorState::Editing { dirty: true })
    }

    /// Focus a field without changing anything
    pub fn begin_edit(&mut self) {
        if self.state == EditorState::Viewing {
            self.state = EditorState::Editing { dirty: false };
        }
    }

    /// Any user contact with a field marks the form dirty
    pub fn touch(&mut self) {
        self.state = EditorState::Editing { dirty: true };
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.touch();
    }

    pub fn set_brand(&mut self, brand: &str) {
        self.brand = brand.to_string();
        self.touch();
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
        self.touch();
    }

    pub fn set_price(&mut self, price: PriceTier) {
        self.price = price;
        self.touch();
    }

    /// Throw away unsaved edits
    pub fn discard(&mut self) {
        self.state = EditorState::Viewing;
    }

    pub fn request_close(&self) -> CloseDecision {
        if self.has_unsaved_changes() {
            CloseDecision::ConfirmDiscard
        } else {
            CloseDecision::Close
        }
    }

    /// Fill the fields from the first row of `cursor`; an empty cursor
    /// leaves the fields alone
    pub fn load(&mut self, mut cursor: Cursor) {
        let Some(row) = cursor.next() else {
            return;
        };
        self.name = row.get_text(COLUMN_NAME).unwrap_or_default();
        self.brand = row.get_text(COLUMN_BRAND).unwrap_or_default();
        self.amount = row.get_integer(COLUMN_AMOUNT).unwrap_or(0).to_string();
        self.price = row
            .get_integer(COLUMN_PRICE)
            .and_then(PriceTier::from_code)
            .unwrap_or_default();
        self.state = EditorState::Viewing;
    }

    /// Load the current row of an existing item from the provider
    pub fn load_from(&mut self, provider: &ItemProvider) -> Result<()> {
        if let EditorMode::Existing(uri) = &self.mode {
            let cursor = provider.query(uri, contract::ALL_COLUMNS, None, &[], None)?;
            self.load(cursor);
        }
        Ok(())
    }

    /// Clear every field back to its blank state
    pub fn reset(&mut self) {
        self.name.clear();
        self.brand.clear();
        self.amount.clear();
        self.price = PriceTier::Low;
    }

    /// Values the form would write, with text trimmed and a blank amount as 0
    pub fn to_values(&self) -> Result<ContentValues> {
        let amount_text = self.amount.trim();
        let amount: i64 = if amount_text.is_empty() {
            0
        } else {
            amount_text.parse().map_err(|_| Error::InvalidValue {
                column: COLUMN_AMOUNT,
                reason: format!("{:?} is not a whole number", amount_text),
            })?
        };

        Ok(ContentValues::new()
            .with(COLUMN_NAME, self.name.trim())
            .with(COLUMN_BRAND, self.brand.trim())
            .with(COLUMN_PRICE, self.price.code())
            .with(COLUMN_AMOUNT, amount))
    }

    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.brand.trim().is_empty()
            && self.amount.trim().is_empty()
            && self.price == PriceTier::Low
    }

    /// Write the form through the provider
    pub fn save(&mut self, provider: &ItemProvider) -> Result<SaveOutcome> {
        if self.mode == EditorMode::New && self.is_blank() {
            return Ok(SaveOutcome::Skipped);
        }

        let values = self.to_values()?;
        let outcome = match self.mode.clone() {
            EditorMode::New => match provider.insert(&provider.content_uri(), &values)? {
                Some(uri) => {
                    self.mode = EditorMode::Existing(uri.clone());
                    SaveOutcome::Inserted(uri)
                }
                None => SaveOutcome::InsertFailed,
            },
            EditorMode::Existing(uri) => match provider.update(&uri, &values, None, &[])? {
                0 => SaveOutcome::UpdateFailed,
                n => SaveOutcome::Updated(n),
            },
        };

        if !matches!(outcome, SaveOutcome::InsertFailed | SaveOutcome::UpdateFailed) {
            self.state = EditorState::Viewing;
        }
        Ok(outcome)
    }

    /// Delete the edited row. Call only after the user confirmed.
    pub fn delete(&mut self, provider: &ItemProvider) -> Result<DeleteOutcome> {
        let EditorMode::Existing(uri) = &self.mode else {
            return Ok(DeleteOutcome::NothingToDelete);
        };
        let outcome = match provider.delete(uri, None, &[])? {
            0 => DeleteOutcome::DeleteFailed,
            n => DeleteOutcome::Deleted(n),
        };
        self.state = EditorState::Viewing;
        Ok(outcome)
    }
}
