//! Save orchestration for a single table editing session.
//!
//! `EditSession` is the one value the presentation layer owns: it wraps the
//! edit model, the selected store, and the in-flight guard, and turns every
//! user action into an `Ok` outcome or a tagged error the caller renders as
//! a notification. Dropping the session (navigating away) discards the
//! overlay and any unsaved flag flip; that is the intended cancellation
//! path.

use std::sync::Arc;

use crate::error::{SyncError, SyncResult};
use crate::table_edit::{EffectiveView, SelectAllOutcome, TableEditor, ToggleOutcome};
use crate::transport::TableStore;
use crate::types::{SaveRequest, Table};

/// Result of a successful `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// True when the new snapshot is the table the backend returned, false
    /// when the backend confirmed nothing and the locally computed state
    /// was kept.
    pub confirmed_by_server: bool,
}

/// Result of a successful `toggle_table_and_save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSyncOutcome {
    /// The persisted value of the table-level flag.
    pub is_synced: bool,
}

/// Orchestrates edits and saves for one table against the selected store.
pub struct EditSession {
    editor: TableEditor,
    store: Arc<dyn TableStore>,
    in_flight: bool,
}

impl EditSession {
    /// Open a session over a table snapshot handed over by the list view.
    pub fn new(snapshot: Table, store: Arc<dyn TableStore>) -> Self {
        Self {
            editor: TableEditor::new(snapshot),
            store,
            in_flight: false,
        }
    }

    /// True while a save request is outstanding. The presentation layer is
    /// expected to disable the save actions while this holds; a save issued
    /// anyway is rejected with `SaveInFlight`.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Snapshot, overlay and the select-all flag merged for rendering.
    pub fn view(&self) -> EffectiveView {
        self.editor.view()
    }

    pub fn editor(&self) -> &TableEditor {
        &self.editor
    }

    /// Stage a sync flag change for one column. See `TableEditor::toggle_column`.
    pub fn toggle_column(&mut self, name: &str, checked: bool) -> SyncResult<ToggleOutcome> {
        self.editor.toggle_column(name, checked)
    }

    /// Flip the table-level flag in memory only; persisted on the next save.
    pub fn toggle_table(&mut self) -> bool {
        self.editor.toggle_table()
    }

    /// Select or deselect every column in one step.
    pub fn select_all(&mut self) -> SelectAllOutcome {
        self.editor.select_all()
    }

    /// Drop all pending column edits.
    pub fn reset(&mut self) {
        self.editor.reset()
    }

    /// Persist the pending column edits.
    ///
    /// Validation failures (`NoChanges`, `SaveInFlight`) never reach the
    /// store. On transport failure the snapshot and overlay are left
    /// exactly as they were; the user re-triggers the save.
    pub async fn save(&mut self) -> SyncResult<SaveOutcome> {
        if self.in_flight {
            return Err(SyncError::SaveInFlight);
        }
        let payload = self.editor.save_payload()?;

        self.in_flight = true;
        let result = self.store.save_table(&payload).await;
        self.in_flight = false;

        match result {
            Ok(confirmed) => {
                let confirmed_by_server = confirmed.is_some();
                self.editor.apply_saved(confirmed);
                tracing::info!(
                    table = %self.editor.snapshot().name,
                    confirmed_by_server,
                    "table saved"
                );
                Ok(SaveOutcome {
                    confirmed_by_server,
                })
            }
            Err(err) => {
                tracing::warn!(
                    table = %self.editor.snapshot().name,
                    error = %err,
                    "save failed, local state kept"
                );
                Err(err)
            }
        }
    }

    /// Flip the table-level flag and persist it immediately.
    ///
    /// The payload carries the snapshot columns only; staged column edits
    /// are neither sent nor dropped. Because the flip is applied eagerly,
    /// a failed request rolls the flag back to its pre-toggle value.
    pub async fn toggle_table_and_save(&mut self) -> SyncResult<TableSyncOutcome> {
        if self.in_flight {
            return Err(SyncError::SaveInFlight);
        }
        let is_synced = self.editor.toggle_table();
        let payload = SaveRequest::single(self.editor.snapshot_update());

        self.in_flight = true;
        let result = self.store.save_table(&payload).await;
        self.in_flight = false;

        match result {
            Ok(_) => {
                tracing::info!(
                    table = %self.editor.snapshot().name,
                    is_synced,
                    "table sync flag persisted"
                );
                Ok(TableSyncOutcome { is_synced })
            }
            Err(err) => {
                self.editor.toggle_table();
                tracing::warn!(
                    table = %self.editor.snapshot().name,
                    error = %err,
                    "table sync toggle failed, flag rolled back"
                );
                Err(err)
            }
        }
    }
}
