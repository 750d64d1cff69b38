use thiserror::Error;
use uuid::Uuid;

pub const MAX_ROWS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSetError {
    #[error("You can only add up to {} assignments.", MAX_ROWS)]
    CapacityExceeded,
    #[error("The first assignment cannot be deleted.")]
    ProtectedRow,
    #[error("row index {index} out of range (rows: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl RowSetError {
    pub fn code(&self) -> &'static str {
        match self {
            RowSetError::CapacityExceeded => "capacity_exceeded",
            RowSetError::ProtectedRow => "protected_row",
            RowSetError::IndexOutOfRange { .. } => "bad_params",
        }
    }
}

/// One assignment row as the user typed it.
///
/// `score` and `weight` keep the raw field text; `None` or an empty string
/// means the field was left blank. Parsing happens in `calc::evaluate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEntry {
    pub id: Uuid,
    pub label: String,
    pub score: Option<String>,
    pub weight: Option<String>,
}

impl AssignmentEntry {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            label: String::new(),
            score: None,
            weight: None,
        }
    }

    #[cfg(test)]
    pub fn with_values(score: &str, weight: &str) -> Self {
        Self {
            score: Some(score.to_string()),
            weight: Some(weight.to_string()),
            ..Self::empty()
        }
    }
}

/// Field edits for a single row. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub label: Option<String>,
    pub score: Option<Option<String>>,
    pub weight: Option<Option<String>>,
}

/// Ordered, bounded list of assignment rows.
///
/// Always holds between 1 and `MAX_ROWS` entries; index 0 is never removed.
#[derive(Debug, Clone)]
pub struct RowSet {
    entries: Vec<AssignmentEntry>,
}

impl Default for RowSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSet {
    pub fn new() -> Self {
        Self {
            entries: vec![AssignmentEntry::empty()],
        }
    }

    pub fn entries(&self) -> &[AssignmentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn add_entry(&mut self) -> Result<&AssignmentEntry, RowSetError> {
        if self.entries.len() >= MAX_ROWS {
            return Err(RowSetError::CapacityExceeded);
        }
        self.entries.push(AssignmentEntry::empty());
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<AssignmentEntry, RowSetError> {
        if index == 0 {
            return Err(RowSetError::ProtectedRow);
        }
        if index >= self.entries.len() {
            return Err(RowSetError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn update_entry(&mut self, index: usize, edit: EntryEdit) -> Result<&AssignmentEntry, RowSetError> {
        let len = self.entries.len();
        let Some(entry) = self.entries.get_mut(index) else {
            return Err(RowSetError::IndexOutOfRange { index, len });
        };
        if let Some(label) = edit.label {
            entry.label = label;
        }
        if let Some(score) = edit.score {
            entry.score = score;
        }
        if let Some(weight) = edit.weight {
            entry.weight = weight;
        }
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.push(AssignmentEntry::empty());
    }
}

pub fn placeholder_label(index: usize) -> String {
    format!("Assignment {} (Optional)", index + 1)
}
