use std::collections::HashSet;

use super::{Record, RecordId};

/// The outcome of toggling a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The record was added to the selection.
    Selected,
    /// The record was removed from the selection.
    Deselected,
}

/// The selected records of one catalog, keyed by id.
///
/// Membership is tracked by id. Records are kept in the order they were
/// selected, which is the order used when displaying them.
#[derive(Debug, Clone)]
pub struct Selection<'a, R> {
    order: Vec<&'a R>,
    ids: HashSet<RecordId>,
}

impl<R> Default for Selection<'_, R> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            ids: HashSet::new(),
        }
    }
}

impl<'a, R: Record> Selection<'a, R> {
    /// Removes the record if a record with the same id is selected, otherwise
    /// appends it.
    pub fn toggle(&mut self, record: &'a R) -> Toggle {
        let id = record.id();
        if self.ids.remove(&id) {
            self.order.retain(|selected| selected.id() != id);
            Toggle::Deselected
        } else {
            self.ids.insert(id);
            self.order.push(record);
            Toggle::Selected
        }
    }

    /// Whether a record with the given id is selected.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// The selected records, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.order.iter().copied()
    }

    /// The names of the selected records, in selection order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().map(|&record| record.name())
    }

    /// The names of the selected records joined with `delimiter`.
    ///
    /// Returns an empty string when nothing is selected.
    #[must_use]
    pub fn join_names(&self, delimiter: &str) -> String {
        self.names().collect::<Vec<_>>().join(delimiter)
    }

    /// The number of selected records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
