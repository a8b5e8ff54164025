//! Checklist state — the items and the cursor.
//!
//! A [`Checklist`] is built once from the lines of a text file and then only
//! ever changes in two ways: the cursor moves (wrapping at both ends) or an
//! item's selected flag flips. Items are never added, removed, or reordered,
//! so an index that was valid at load time stays valid for the whole session.
//!
//! The list is never empty. Loading a file with no usable lines is an error,
//! which is what lets the cursor invariant `0 <= active < len` hold without
//! special cases.

use std::fs;
use std::path::Path;

use crate::error::Error;

// ---------------------------------------------------------------------------
// ChecklistItem
// ---------------------------------------------------------------------------

/// One line of the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// The trimmed line text, placeholders and all.
    pub text: String,
    /// Whether the item will be written on commit.
    pub selected: bool,
}

impl ChecklistItem {
    /// An unselected item.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selected: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// Ordered items plus the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
    active: usize,
}

impl Checklist {
    // -- Construction -------------------------------------------------------

    /// Build a checklist from file contents.
    ///
    /// Each line is trimmed; blank lines are skipped. Returns `None` if
    /// nothing is left.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let items: Vec<ChecklistItem> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ChecklistItem::new)
            .collect();

        if items.is_empty() {
            return None;
        }
        Some(Self { items, active: 0 })
    }

    /// Load a checklist from a UTF-8 text file.
    ///
    /// # Errors
    ///
    /// [`Error::Load`] if the file can't be read (including invalid UTF-8),
    /// [`Error::Empty`] if it has no non-blank lines.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let checklist = Self::parse(&text).ok_or_else(|| Error::Empty {
            path: path.to_path_buf(),
        })?;

        tracing::info!(path = %path.display(), items = checklist.len(), "checklist loaded");
        Ok(checklist)
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of items. Always at least one.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Index of the item under the cursor.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> usize {
        self.active
    }

    /// Text of the selected items, in display order.
    #[must_use]
    pub fn selected_texts(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.text.clone())
            .collect()
    }

    // -- Cursor -------------------------------------------------------------

    /// Move the cursor up one row, wrapping from the top to the bottom.
    pub fn move_up(&mut self) {
        let n = self.items.len();
        self.active = (self.active + n - 1) % n;
    }

    /// Move the cursor down one row, wrapping from the bottom to the top.
    pub fn move_down(&mut self) {
        self.active = (self.active + 1) % self.items.len();
    }

    // -- Selection ----------------------------------------------------------

    /// Flip the item under the cursor.
    pub fn toggle_active(&mut self) {
        self.items[self.active].selected ^= true;
    }

    /// Flip the item at `index`. Returns `false` (and changes nothing) if
    /// there is no such item.
    pub fn toggle_at(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.selected ^= true;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
