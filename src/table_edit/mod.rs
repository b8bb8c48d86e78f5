//! Table edit model: a server snapshot plus a pending-edit overlay.
//!
//! The overlay holds one replacement column per column the user touched
//! since the last save or reset; rendering and the save payload both read
//! the effective view - the overlay entry where present, the base column
//! otherwise. The table-level sync flag is not part of the overlay: it is
//! flipped in place on the snapshot, eagerly, and the save orchestration
//! decides when it reaches the backend.
//!
//! The snapshot is only ever replaced wholesale: with the table the backend
//! confirmed, or with the effective view the save payload was computed from
//! when the backend confirms nothing.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{SyncError, SyncResult};
use crate::types::{Column, SaveColumn, SaveRequest, Table, TableUpdate};

/// Read-only merge of snapshot and overlay, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveView {
    pub name: String,
    pub is_synced: bool,
    /// Columns in snapshot order, pending edits applied.
    pub columns: Vec<Column>,
    /// True when every column in `columns` is marked synced.
    pub all_selected: bool,
}

/// What a column toggle did, for the caller's notification logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    /// True when toggling the column on also switched the table-level flag
    /// on. The caller is expected to tell the user.
    pub table_auto_enabled: bool,
}

/// What a select-all did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAllOutcome {
    /// True when the bulk action selected every column, false when it
    /// deselected them.
    pub selected: bool,
    /// True when selecting also switched the table-level flag on.
    pub table_auto_enabled: bool,
}

/// Editing state for a single table: the last known server state plus the
/// user's unsaved column edits.
///
/// Invariant: overlay keys are always a subset of the snapshot's column
/// names.
#[derive(Debug, Clone)]
pub struct TableEditor {
    snapshot: Table,
    overlay: HashMap<String, Column>,
}

impl TableEditor {
    /// Start editing over a table snapshot fetched by the list view.
    pub fn new(snapshot: Table) -> Self {
        Self {
            snapshot,
            overlay: HashMap::new(),
        }
    }

    /// The last known server state, without pending edits.
    pub fn snapshot(&self) -> &Table {
        &self.snapshot
    }

    /// True while unsaved column edits exist.
    pub fn is_dirty(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// All columns in snapshot order, overlay applied.
    pub fn effective_columns(&self) -> Vec<Column> {
        self.snapshot
            .columns
            .iter()
            .map(|column| self.overlay.get(&column.name).unwrap_or(column).clone())
            .collect()
    }

    /// True when every column in the effective view is marked synced.
    /// Vacuously true for a table with no columns.
    pub fn all_selected(&self) -> bool {
        self.snapshot
            .columns
            .iter()
            .all(|column| self.overlay.get(&column.name).unwrap_or(column).is_synced)
    }

    /// Snapshot, overlay and the select-all flag merged for rendering.
    pub fn view(&self) -> EffectiveView {
        EffectiveView {
            name: self.snapshot.name.clone(),
            is_synced: self.snapshot.is_synced,
            columns: self.effective_columns(),
            all_selected: self.all_selected(),
        }
    }

    /// Stage a sync flag change for one column.
    ///
    /// The overlay entry is the column as the user currently sees it with
    /// the new flag. Toggling a column on while the table-level flag is off
    /// also switches the table flag on; the outcome reports it.
    pub fn toggle_column(&mut self, name: &str, checked: bool) -> SyncResult<ToggleOutcome> {
        let current = self
            .overlay
            .get(name)
            .or_else(|| self.snapshot.columns.iter().find(|c| c.name == name))
            .cloned()
            .ok_or_else(|| SyncError::UnknownColumn(name.to_string()))?;

        self.overlay.insert(
            name.to_string(),
            Column {
                is_synced: checked,
                ..current
            },
        );

        let table_auto_enabled = checked && !self.snapshot.is_synced;
        if table_auto_enabled {
            self.snapshot.is_synced = true;
        }
        Ok(ToggleOutcome { table_auto_enabled })
    }

    /// Flip the table-level sync flag in place and return the new value.
    ///
    /// Unlike column edits this is not staged in the overlay. Column states
    /// are untouched.
    pub fn toggle_table(&mut self) -> bool {
        self.snapshot.is_synced = !self.snapshot.is_synced;
        self.snapshot.is_synced
    }

    /// Select every column, or deselect every column when all of them are
    /// already selected.
    ///
    /// The direction is decided once from the current effective view, then
    /// the whole overlay is replaced in one step, so applying the entries
    /// cannot flip the decision midway. Selecting on an unsynced table
    /// auto-enables the table flag, same as `toggle_column`.
    pub fn select_all(&mut self) -> SelectAllOutcome {
        let selected = !self.all_selected();

        self.overlay = self
            .snapshot
            .columns
            .iter()
            .map(|column| {
                (
                    column.name.clone(),
                    Column {
                        is_synced: selected,
                        ..column.clone()
                    },
                )
            })
            .collect();

        let table_auto_enabled = selected && !self.snapshot.is_synced;
        if table_auto_enabled {
            self.snapshot.is_synced = true;
        }
        SelectAllOutcome {
            selected,
            table_auto_enabled,
        }
    }

    /// Drop all pending column edits. The snapshot is left alone.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.overlay.clear();
    }

    /// Build the save body: every column in snapshot order, overlay
    /// applied, configuration errors stripped.
    ///
    /// An empty overlay is a validation error, not a silent no-op: the
    /// caller shows it to the user and no request is made.
    pub fn save_payload(&self) -> SyncResult<SaveRequest> {
        if self.overlay.is_empty() {
            return Err(SyncError::NoChanges);
        }
        Ok(SaveRequest::single(TableUpdate {
            name: self.snapshot.name.clone(),
            columns: self.effective_columns().iter().map(SaveColumn::from).collect(),
            is_synced: self.snapshot.is_synced,
        }))
    }

    /// The snapshot as a wire update entry, pending column edits excluded.
    /// Used by the toggle-and-persist flow, which sends the flag change
    /// without flushing staged edits.
    pub(crate) fn snapshot_update(&self) -> TableUpdate {
        TableUpdate {
            name: self.snapshot.name.clone(),
            columns: self.snapshot.columns.iter().map(SaveColumn::from).collect(),
            is_synced: self.snapshot.is_synced,
        }
    }

    /// Reconcile after a successful save.
    ///
    /// With a server-confirmed table the snapshot is replaced by it; with
    /// `None` the effective view the payload was computed from becomes the
    /// new snapshot. Both paths clear the overlay.
    pub fn apply_saved(&mut self, confirmed: Option<Table>) {
        match confirmed {
            Some(table) => self.snapshot = table,
            None => self.snapshot.columns = self.effective_columns(),
        }
        self.overlay.clear();
    }
}
