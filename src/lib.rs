//! Table Sync Core Library
//!
//! Client-side core for the table synchronization admin console:
//! - **table_edit**: snapshot + pending-edit overlay for the table being
//!   edited, with the toggle/select-all/reset rules
//! - **session**: save orchestration against the selected backend,
//!   including the eager table-flag toggle with rollback on failure
//! - **transport**: the two interchangeable backends - the live sync API
//!   and the local json item store - behind one `TableStore` contract
//!
//! The presentation layer renders the effective view exposed here and calls
//! back into the model on every user action; each platform handles its own
//! chrome and links this crate natively or, in the browser, through the
//! `wasm` feature.
//!
//! # Example (conceptual)
//! ```ignore
//! let store = new_store(&StoreConfig::from_env());
//! let tables = store.fetch_tables().await?;
//!
//! let mut session = EditSession::new(tables[0].clone(), store);
//! session.toggle_column("Email", true)?;
//! session.save().await?;
//! ```

pub mod config;
pub mod error;
pub mod table_edit;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod transport;

pub use config::{BackendKind, StoreConfig};
pub use error::{SyncError, SyncResult};
pub use table_edit::{EffectiveView, SelectAllOutcome, TableEditor, ToggleOutcome};
pub use types::{Column, SaveColumn, SaveRequest, Table, TableUpdate};

#[cfg(not(target_arch = "wasm32"))]
pub use session::{EditSession, SaveOutcome, TableSyncOutcome};
#[cfg(not(target_arch = "wasm32"))]
pub use transport::{new_store, JsonStore, LiveStore, TableStore};

// WASM bindings
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::*;
