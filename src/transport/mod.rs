//! Transport adapters for the two table sync backends.
//!
//! Both backends normalize to the same `TableStore` contract so the edit
//! model and the save orchestration never see which one is active. The live
//! sync API confirms a save by returning the persisted table; the local
//! json item store does not confirm at all, and the caller keeps its
//! locally computed state instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{BackendKind, StoreConfig};
use crate::error::{SyncError, SyncResult};
use crate::types::{SaveRequest, Table, TableUpdate};

/// Backend contract used by the session layer.
///
/// One round trip per call and no retries; a failed call reports a
/// `Transport` error and the caller decides what to tell the user.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// List all synchronizable tables.
    async fn fetch_tables(&self) -> SyncResult<Vec<Table>>;

    /// Persist a save request.
    ///
    /// Returns the table as the backend persisted it when the backend
    /// confirms saves, `None` when it does not.
    async fn save_table(&self, request: &SaveRequest) -> SyncResult<Option<Table>>;
}

/// Build the store selected by the configuration.
pub fn new_store(config: &StoreConfig) -> Arc<dyn TableStore> {
    match config.backend {
        BackendKind::Live => Arc::new(LiveStore::new(&config.base_url)),
        BackendKind::Json => Arc::new(JsonStore::new(&config.base_url)),
    }
}

const LIST_PATH: &str = "/api/Sync/GetSynchronizableTables";
const SAVE_PATH: &str = "/api/Sync/SaveSynchronizableTables";

/// Client for the real sync API.
pub struct LiveStore {
    base_url: String,
    client: reqwest::Client,
}

impl LiveStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }
}

#[async_trait]
impl TableStore for LiveStore {
    async fn fetch_tables(&self) -> SyncResult<Vec<Table>> {
        let url = format!("{}{}", self.base_url, LIST_PATH);
        tracing::debug!(%url, "fetching synchronizable tables");

        let response = check_status(self.client.get(&url).send().await?).await?;
        let tables: Vec<Table> = response.json().await?;
        tracing::debug!(count = tables.len(), "fetched table list");
        Ok(tables)
    }

    async fn save_table(&self, request: &SaveRequest) -> SyncResult<Option<Table>> {
        let url = format!("{}{}", self.base_url, SAVE_PATH);
        tracing::debug!(%url, tables = request.items_to_save.len(), "posting save request");

        let response = check_status(self.client.post(&url).json(request).send().await?).await?;
        let table: Table = response.json().await?;
        tracing::info!(table = %table.name, "save confirmed by sync API");
        Ok(Some(table))
    }
}

/// Name of the item collection holding the table records.
const ITEMS_COLLECTION: &str = "itemsToSave";

/// Client for the local json item store used during development.
///
/// The store is a generic keyed collection, so saving means finding the
/// item whose `name` matches the update, merging the update into it, and
/// PUTting the merged item back under its opaque id.
pub struct JsonStore {
    base_url: String,
    client: reqwest::Client,
}

impl JsonStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, ITEMS_COLLECTION)
    }

    async fn fetch_items(&self) -> SyncResult<Vec<serde_json::Value>> {
        let response = check_status(self.client.get(self.collection_url()).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TableStore for JsonStore {
    async fn fetch_tables(&self) -> SyncResult<Vec<Table>> {
        let url = self.collection_url();
        tracing::debug!(%url, "fetching item collection");

        let response = check_status(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn save_table(&self, request: &SaveRequest) -> SyncResult<Option<Table>> {
        let update = request.items_to_save.first().ok_or(SyncError::NoChanges)?;

        let items = self.fetch_items().await?;
        let (stored, id) = locate_item(&items, &update.name)?;

        let url = format!("{}/{}", self.collection_url(), id);
        tracing::debug!(%url, table = %update.name, "putting merged item");
        check_status(
            self.client
                .put(&url)
                .json(&merge_item(stored, update))
                .send()
                .await?,
        )
        .await?;

        tracing::info!(table = %update.name, "item store updated");
        // The store echoes the raw item, not an authoritative table.
        Ok(None)
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}

/// Map a non-2xx response to a transport error carrying the body as the
/// message.
async fn check_status(response: reqwest::Response) -> SyncResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Transport {
        status: Some(status.as_u16()),
        message: if body.is_empty() {
            status.to_string()
        } else {
            body
        },
    })
}

/// Find the stored item backing an update, along with its opaque id.
///
/// A save against an item the store does not know, or knows without an id,
/// fails here - before any PUT goes out.
fn locate_item<'a>(
    items: &'a [serde_json::Value],
    name: &str,
) -> SyncResult<(&'a serde_json::Value, String)> {
    let stored = items
        .iter()
        .find(|item| item_name(item) == Some(name))
        .ok_or_else(|| SyncError::MissingIdentifier(name.to_string()))?;
    let id = item_id(stored).ok_or_else(|| SyncError::MissingIdentifier(name.to_string()))?;
    Ok((stored, id))
}

/// The stored item's display name.
fn item_name(item: &serde_json::Value) -> Option<&str> {
    item.get("name").and_then(|v| v.as_str())
}

/// The store's opaque id, which may arrive as a string or a number.
fn item_id(item: &serde_json::Value) -> Option<String> {
    match item.get("id")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Overwrite the synchronization fields of a stored item with an update,
/// leaving unknown fields - the id included - as the store has them.
fn merge_item(stored: &serde_json::Value, update: &TableUpdate) -> serde_json::Value {
    let mut merged = stored.clone();
    if let serde_json::Value::Object(fields) = &mut merged {
        fields.insert("name".to_string(), serde_json::json!(update.name));
        fields.insert("columns".to_string(), serde_json::json!(update.columns));
        fields.insert("isSynced".to_string(), serde_json::json!(update.is_synced));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaveColumn;

    fn update() -> TableUpdate {
        TableUpdate {
            name: "Customers".to_string(),
            columns: vec![SaveColumn {
                name: "Email".to_string(),
                column_type: "string".to_string(),
                is_synced: true,
            }],
            is_synced: true,
        }
    }

    #[test]
    fn item_id_handles_both_wire_forms() {
        assert_eq!(
            item_id(&serde_json::json!({"id": "a1b2"})).as_deref(),
            Some("a1b2")
        );
        assert_eq!(item_id(&serde_json::json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(item_id(&serde_json::json!({"name": "x"})), None);
    }

    #[test]
    fn locate_item_requires_a_stored_id() {
        let items = vec![serde_json::json!({"name": "Customers", "columns": []})];

        let err = locate_item(&items, "Customers").unwrap_err();
        assert_eq!(err, SyncError::MissingIdentifier("Customers".to_string()));
    }

    #[test]
    fn locate_item_requires_a_matching_item() {
        let items = vec![serde_json::json!({"id": 1, "name": "Orders"})];

        let err = locate_item(&items, "Customers").unwrap_err();
        assert_eq!(err, SyncError::MissingIdentifier("Customers".to_string()));
    }

    #[test]
    fn merge_item_keeps_unknown_fields_and_id() {
        let stored = serde_json::json!({
            "id": "a1b2",
            "name": "Customers",
            "isSynced": false,
            "columns": [],
            "rowsCount": 42
        });

        let merged = merge_item(&stored, &update());

        assert_eq!(merged["id"], "a1b2");
        assert_eq!(merged["rowsCount"], 42);
        assert_eq!(merged["isSynced"], true);
        assert_eq!(
            merged["columns"],
            serde_json::json!([{"name": "Email", "type": "string", "isSynced": true}])
        );
    }

    #[test]
    fn store_factory_honors_the_backend_kind() {
        // Smoke check that both arms construct; behavior is covered by the
        // session tests against a scripted store.
        let live = new_store(&StoreConfig::new(BackendKind::Live, "http://localhost:3001"));
        let json = new_store(&StoreConfig::new(BackendKind::Json, "http://localhost:3001/"));
        let _ = (live, json);
    }
}
