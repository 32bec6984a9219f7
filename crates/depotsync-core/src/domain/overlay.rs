//! Edit overlay - persisted manual overrides
//!
//! The overlay stores user-authored overrides keyed purely by [`StableId`],
//! never by candidate reference, so entries stay valid across full candidate
//! graph regeneration (for example when the operator switches dependency
//! mode). The candidate builder re-applies overlay entries to freshly built
//! candidates before status resolution runs.
//!
//! Field overrides are a tagged variant per edit kind, validated at
//! construction, instead of a stringly-typed override dictionary.
//!
//! The overlay is mutated only by the host/UI thread; the engines read it
//! synchronously while building a plan.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::candidate::UploadCandidate;
use super::errors::DomainError;
use super::ids::StableId;

// ============================================================================
// FieldEdit
// ============================================================================

/// Kind discriminant for [`FieldEdit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Name,
    Description,
    Tags,
    Metadata,
}

/// A single validated field override
///
/// Each variant carries the replacement value for one candidate field.
/// Use the checked constructors; they reject values that would produce an
/// unusable candidate (blank name, blank tag entries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Replacement display name
    Name(String),
    /// Replacement description
    Description(String),
    /// Replacement tag list
    Tags(Vec<String>),
    /// Replacement custom metadata map
    Metadata(BTreeMap<String, String>),
}

impl FieldEdit {
    /// Creates a name edit
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEdit` for a blank name.
    pub fn name(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEdit(
                "name cannot be blank".to_string(),
            ));
        }
        Ok(Self::Name(name))
    }

    /// Creates a description edit
    pub fn description(description: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self::Description(description.into()))
    }

    /// Creates a tags edit
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEdit` if any tag entry is blank.
    pub fn tags(tags: Vec<String>) -> Result<Self, DomainError> {
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err(DomainError::InvalidEdit(
                "tags cannot contain blank entries".to_string(),
            ));
        }
        Ok(Self::Tags(tags))
    }

    /// Creates a custom metadata edit
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEdit` if any key is blank.
    pub fn metadata(metadata: BTreeMap<String, String>) -> Result<Self, DomainError> {
        if metadata.keys().any(|k| k.trim().is_empty()) {
            return Err(DomainError::InvalidEdit(
                "metadata keys cannot be blank".to_string(),
            ));
        }
        Ok(Self::Metadata(metadata))
    }

    /// Returns the kind discriminant of this edit
    pub fn kind(&self) -> EditKind {
        match self {
            FieldEdit::Name(_) => EditKind::Name,
            FieldEdit::Description(_) => EditKind::Description,
            FieldEdit::Tags(_) => EditKind::Tags,
            FieldEdit::Metadata(_) => EditKind::Metadata,
        }
    }
}

// ============================================================================
// OverlayEntry
// ============================================================================

/// All overrides recorded for one stable identity
///
/// At most one edit per [`EditKind`] is kept; setting a second edit of the
/// same kind replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    /// Manual ignore flag (dependencies only at upload time)
    pub ignored: bool,
    /// Whether the item is part of the operator's selection
    pub selected: bool,
    /// Whether auxiliary files should be included in the dataset
    pub include_auxiliary: bool,
    /// Field overrides, one per kind
    edits: Vec<FieldEdit>,
}

impl OverlayEntry {
    /// Stores an edit, replacing any previous edit of the same kind
    pub fn set_edit(&mut self, edit: FieldEdit) {
        self.edits.retain(|e| e.kind() != edit.kind());
        self.edits.push(edit);
    }

    /// Looks up the edit of the given kind
    pub fn get_edit(&self, kind: EditKind) -> Option<&FieldEdit> {
        self.edits.iter().find(|e| e.kind() == kind)
    }

    /// Removes all field edits, keeping the flags
    pub fn clear_edits(&mut self) {
        self.edits.clear();
    }

    /// Returns true if the entry records nothing at all
    pub fn is_empty(&self) -> bool {
        !self.ignored && !self.selected && !self.include_auxiliary && self.edits.is_empty()
    }
}

// ============================================================================
// EditOverlay
// ============================================================================

/// Persisted map of manual overrides, keyed by stable identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOverlay {
    entries: HashMap<StableId, OverlayEntry>,
}

impl EditOverlay {
    /// Creates an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities with recorded overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no overrides are recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores a field edit for an identity
    pub fn set_edit(&mut self, id: StableId, edit: FieldEdit) {
        self.entries.entry(id).or_default().set_edit(edit);
    }

    /// Looks up a field edit by identity and kind
    pub fn try_get(&self, id: &StableId, kind: EditKind) -> Option<&FieldEdit> {
        self.entries.get(id).and_then(|e| e.get_edit(kind))
    }

    /// Removes all field edits for an identity, keeping flags
    ///
    /// Entries left with nothing recorded are dropped entirely.
    pub fn clear_edits(&mut self, id: &StableId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.clear_edits();
            if entry.is_empty() {
                self.entries.remove(id);
            }
        }
    }

    /// Sets the manual ignore flag for an identity
    pub fn set_ignored(&mut self, id: StableId, ignored: bool) {
        let entry = self.entries.entry(id).or_default();
        entry.ignored = ignored;
        if entry.is_empty() {
            self.entries.remove(&id);
        }
    }

    /// Returns the manual ignore flag for an identity
    pub fn is_ignored(&self, id: &StableId) -> bool {
        self.entries.get(id).map(|e| e.ignored).unwrap_or(false)
    }

    /// Marks an identity as part of the operator's selection
    pub fn set_selected(&mut self, id: StableId, selected: bool) {
        if selected {
            self.entries.entry(id).or_default().selected = true;
        } else {
            self.deselect(&id);
        }
    }

    /// Returns whether an identity is marked selected
    pub fn is_selected(&self, id: &StableId) -> bool {
        self.entries.get(id).map(|e| e.selected).unwrap_or(false)
    }

    /// Removes the entry for a deselected identity
    ///
    /// Deselection discards every override recorded for the item, matching
    /// the overlay lifecycle: created on first edit, removed on deselect.
    pub fn deselect(&mut self, id: &StableId) {
        self.entries.remove(id);
    }

    /// Sets the include-auxiliary-files flag for an identity
    pub fn set_include_auxiliary(&mut self, id: StableId, include: bool) {
        let entry = self.entries.entry(id).or_default();
        entry.include_auxiliary = include;
        if entry.is_empty() {
            self.entries.remove(&id);
        }
    }

    /// Returns the include-auxiliary-files flag for an identity
    pub fn include_auxiliary(&self, id: &StableId) -> bool {
        self.entries
            .get(id)
            .map(|e| e.include_auxiliary)
            .unwrap_or(false)
    }

    /// Iterates over all selected identities
    pub fn selected_ids(&self) -> impl Iterator<Item = &StableId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.selected)
            .map(|(id, _)| id)
    }

    /// Iterates over all ignored identities
    pub fn ignored_ids(&self) -> impl Iterator<Item = &StableId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.ignored)
            .map(|(id, _)| id)
    }

    /// Iterates over all identities with the include-auxiliary flag set
    pub fn include_auxiliary_ids(&self) -> impl Iterator<Item = &StableId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.include_auxiliary)
            .map(|(id, _)| id)
    }

    /// Re-applies the recorded overrides to a freshly built candidate
    ///
    /// Called by the candidate builder after each regeneration, before
    /// status resolution runs.
    pub fn apply_to(&self, candidate: &mut UploadCandidate) {
        let Some(entry) = self.entries.get(candidate.id()) else {
            return;
        };

        candidate.set_ignored(entry.ignored);
        candidate.set_include_auxiliary(entry.include_auxiliary);

        for edit in &entry.edits {
            match edit {
                FieldEdit::Name(name) => candidate.set_name(name.clone()),
                FieldEdit::Description(d) => candidate.set_description(Some(d.clone())),
                FieldEdit::Tags(tags) => candidate.set_tags(tags.clone()),
                FieldEdit::Metadata(m) => candidate.set_custom_metadata(m.clone()),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
