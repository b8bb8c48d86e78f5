//! Shared table and column records plus the save wire shapes.
//!
//! Everything here maps 1:1 onto the JSON the two backends speak: camelCase
//! field names, optional flags defaulting to off, and a save body that is
//! batch-shaped on the wire even though this client only ever sends one
//! table per save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field of a table, with its synchronization flag and the
/// configuration error the sync service reported for it, if any.
///
/// Identity is the `name`, unique within its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_error: Option<String>,
}

/// A named dataset as reported by the sync service.
///
/// The table-level `is_synced` is stored independently of the per-column
/// flags, never derived from them; a table marked synced with zero synced
/// columns is a valid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub is_synced: bool,
    /// Row count shown in the list view. Not every backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Opaque identifier assigned by the json item store. Absent on the
    /// live backend.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opaque_id"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_error: Option<String>,
}

/// Item-store ids arrive as strings or numbers; both are kept as opaque
/// strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A column as it goes over the save wire: the configuration error is
/// read-only service output and is stripped before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub is_synced: bool,
}

impl From<&Column> for SaveColumn {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            column_type: column.column_type.clone(),
            is_synced: column.is_synced,
        }
    }
}

/// One table entry in a save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    pub name: String,
    pub columns: Vec<SaveColumn>,
    #[serde(default)]
    pub is_synced: bool,
}

/// Body of the save call, `{"itemsToSave": [...]}` on the wire.
///
/// The wire shape allows a batch; this client always sends exactly one
/// entry per save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub items_to_save: Vec<TableUpdate>,
}

impl SaveRequest {
    /// Wrap a single table update in the batch wire shape.
    pub fn single(update: TableUpdate) -> Self {
        Self {
            items_to_save: vec![update],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_deserializes_with_minimal_fields() {
        let table: Table = serde_json::from_str(
            r#"{"name": "Customers", "columns": [{"name": "Id", "type": "int"}]}"#,
        )
        .unwrap();

        assert_eq!(table.name, "Customers");
        assert!(!table.is_synced);
        assert!(!table.columns[0].is_synced);
        assert_eq!(table.columns[0].configuration_error, None);
        assert_eq!(table.rows_count, None);
        assert_eq!(table.id, None);
    }

    #[test]
    fn table_deserializes_list_metadata() {
        let table: Table = serde_json::from_str(
            r#"{
                "name": "Customers",
                "columns": [],
                "isSynced": true,
                "rowsCount": 1200,
                "lastUpdateDateTime": "2024-03-01T12:00:00Z",
                "version": "1.4.2"
            }"#,
        )
        .unwrap();

        assert!(table.is_synced);
        assert_eq!(table.rows_count, Some(1200));
        assert_eq!(table.version.as_deref(), Some("1.4.2"));
        assert!(table.last_update_date_time.is_some());
    }

    #[test]
    fn item_store_id_accepts_strings_and_numbers() {
        let by_string: Table =
            serde_json::from_str(r#"{"name": "A", "columns": [], "id": "a1b2"}"#).unwrap();
        let by_number: Table =
            serde_json::from_str(r#"{"name": "B", "columns": [], "id": 7}"#).unwrap();

        assert_eq!(by_string.id.as_deref(), Some("a1b2"));
        assert_eq!(by_number.id.as_deref(), Some("7"));
    }

    #[test]
    fn save_request_wire_shape() {
        let request = SaveRequest::single(TableUpdate {
            name: "Customers".to_string(),
            columns: vec![SaveColumn {
                name: "Email".to_string(),
                column_type: "string".to_string(),
                is_synced: true,
            }],
            is_synced: true,
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "itemsToSave": [{
                    "name": "Customers",
                    "columns": [{"name": "Email", "type": "string", "isSynced": true}],
                    "isSynced": true
                }]
            })
        );
    }

    #[test]
    fn save_column_drops_configuration_error() {
        let column = Column {
            name: "Email".to_string(),
            column_type: "string".to_string(),
            is_synced: false,
            configuration_error: Some("field removed upstream".to_string()),
        };

        let wire = serde_json::to_value(SaveColumn::from(&column)).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"name": "Email", "type": "string", "isSynced": false})
        );
    }
}
