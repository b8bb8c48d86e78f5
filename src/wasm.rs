//! WASM bindings for the browser frontend.
//!
//! The browser owns its own fetch layer, so only the edit model crosses
//! this boundary: the frontend drives an `EditorHandle`, performs the save
//! call the payload describes itself, and feeds the response back through
//! `applySaved`. That keeps the reconciliation rules in one place for
//! every platform.

use wasm_bindgen::prelude::*;

use crate::table_edit::TableEditor;
use crate::types::Table;

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editing state for a single table, held behind a JS handle.
#[wasm_bindgen]
pub struct EditorHandle {
    inner: TableEditor,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Open an editor over a fetched table object.
    #[wasm_bindgen(constructor)]
    pub fn new(table: JsValue) -> Result<EditorHandle, JsValue> {
        let table: Table = serde_wasm_bindgen::from_value(table)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse table: {}", e)))?;
        Ok(Self {
            inner: TableEditor::new(table),
        })
    }

    /// Snapshot, overlay and the select-all flag merged for rendering.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.view())
    }

    /// Stage a sync flag change for one column; returns the toggle outcome.
    #[wasm_bindgen(js_name = toggleColumn)]
    pub fn toggle_column(&mut self, name: &str, checked: bool) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .toggle_column(name, checked)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&outcome)
    }

    /// Flip the table-level sync flag; returns the new value.
    #[wasm_bindgen(js_name = toggleTable)]
    pub fn toggle_table(&mut self) -> bool {
        self.inner.toggle_table()
    }

    /// Select or deselect every column in one step; returns the outcome.
    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.select_all())
    }

    /// Drop all pending column edits.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// True while unsaved column edits exist.
    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    /// Build the save request body, or fail when there is nothing to save.
    #[wasm_bindgen(js_name = savePayload)]
    pub fn save_payload(&self) -> Result<JsValue, JsValue> {
        let payload = self
            .inner
            .save_payload()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&payload)
    }

    /// Reconcile after the frontend performed the save call itself.
    ///
    /// Pass the table the backend returned, or `null`/`undefined` for the
    /// backend variant that confirms nothing.
    #[wasm_bindgen(js_name = applySaved)]
    pub fn apply_saved(&mut self, confirmed: JsValue) -> Result<(), JsValue> {
        let confirmed: Option<Table> = if confirmed.is_null() || confirmed.is_undefined() {
            None
        } else {
            Some(
                serde_wasm_bindgen::from_value(confirmed)
                    .map_err(|e| JsValue::from_str(&format!("Failed to parse table: {}", e)))?,
            )
        };
        self.inner.apply_saved(confirmed);
        Ok(())
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize output: {}", e)))
}
