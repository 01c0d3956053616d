//! Grid preference snapshot persisted in a client-local key-value store.
//!
//! The blob is versioned JSON:
//! `{columnState[], sortModel[], filterModel, pageSize, version, savedAt}`.
//! Writes are fire-and-forget; concurrent tabs writing the same grid id race
//! and the last write wins.

use super::columns::{ColumnDef, SortModelItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Bump when the snapshot layout changes; older blobs are discarded.
pub const GRID_STATE_VERSION: u32 = 1;

/// Column id -> filter text.
pub type FilterModel = BTreeMap<String, String>;

/// Minimal key-value storage (browser localStorage in the app).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// Position in `column_state` is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub col_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub hide: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStateSnapshot {
    pub column_state: Vec<ColumnState>,
    pub sort_model: Vec<SortModelItem>,
    pub filter_model: FilterModel,
    pub page_size: usize,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
}

impl GridStateSnapshot {
    /// Snapshot reflecting the column defaults.
    pub fn from_columns(columns: &[ColumnDef], page_size: usize) -> Self {
        Self {
            column_state: columns
                .iter()
                .map(|c| ColumnState {
                    col_id: c.id.clone(),
                    width: c.width,
                    hide: c.hidden,
                })
                .collect(),
            sort_model: Vec::new(),
            filter_model: FilterModel::new(),
            page_size,
            version: GRID_STATE_VERSION,
            saved_at: Utc::now(),
        }
    }

    /// Drops references to unknown columns and appends columns the snapshot
    /// has never seen, with their defaults.
    pub fn reconcile(&mut self, columns: &[ColumnDef]) {
        let known: HashSet<&str> = columns.iter().map(|c| c.id.as_str()).collect();
        let sortable: HashSet<&str> = columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.id.as_str())
            .collect();
        let filterable: HashSet<&str> = columns
            .iter()
            .filter(|c| c.filterable)
            .map(|c| c.id.as_str())
            .collect();
        self.column_state.retain(|c| known.contains(c.col_id.as_str()));

        let mut sorted: HashSet<String> = HashSet::new();
        self.sort_model.retain(|s| {
            sortable.contains(s.col_id.as_str()) && sorted.insert(s.col_id.clone())
        });
        self.filter_model.retain(|col_id, value| {
            filterable.contains(col_id.as_str()) && !value.trim().is_empty()
        });

        let mut seen: HashSet<String> = HashSet::new();
        self.column_state.retain(|c| seen.insert(c.col_id.clone()));

        for column in columns {
            if !seen.contains(&column.id) {
                self.column_state.push(ColumnState {
                    col_id: column.id.clone(),
                    width: column.width,
                    hide: column.hidden,
                });
            }
        }
    }

    pub fn column(&self, col_id: &str) -> Option<&ColumnState> {
        self.column_state.iter().find(|c| c.col_id == col_id)
    }

    pub fn column_mut(&mut self, col_id: &str) -> Option<&mut ColumnState> {
        self.column_state.iter_mut().find(|c| c.col_id == col_id)
    }
}

pub fn storage_key(grid_id: &str) -> String {
    format!("grid-state:{}", grid_id)
}

/// Writes the snapshot under the grid's key. Never fails from the caller's
/// point of view: an encoding error is logged and nothing is written.
/// Returns whether the blob was handed to the store.
pub fn save_state(
    store: &impl KeyValueStore,
    grid_id: &str,
    snapshot: &GridStateSnapshot,
) -> bool {
    match serde_json::to_string(snapshot) {
        Ok(json) => {
            store.set(&storage_key(grid_id), &json);
            true
        }
        Err(e) => {
            log::warn!("Grid state of '{}' not saved: {}", grid_id, e);
            false
        }
    }
}

/// Reads the snapshot back for the current column set.
///
/// `None` for a missing key, an unreadable blob or a blob of another
/// version (which is also removed). Entries for columns that no longer exist
/// are dropped.
pub fn load_state(
    store: &impl KeyValueStore,
    grid_id: &str,
    columns: &[ColumnDef],
) -> Option<GridStateSnapshot> {
    let key = storage_key(grid_id);
    let raw = store.get(&key)?;
    let value: serde_json::Value = serde_json::from_str(&raw).ok()?;

    let version = value.get("version").and_then(|v| v.as_u64());
    if version != Some(GRID_STATE_VERSION as u64) {
        store.remove(&key);
        return None;
    }

    let mut snapshot: GridStateSnapshot = serde_json::from_value(value).ok()?;
    if snapshot.page_size == 0 {
        return None;
    }
    let known: HashSet<&str> = columns.iter().map(|c| c.id.as_str()).collect();
    snapshot.column_state.retain(|c| known.contains(c.col_id.as_str()));
    snapshot.sort_model.retain(|s| known.contains(s.col_id.as_str()));
    snapshot
        .filter_model
        .retain(|col_id, _| known.contains(col_id.as_str()));
    Some(snapshot)
}

pub fn clear_state(store: &impl KeyValueStore, grid_id: &str) {
    store.remove(&storage_key(grid_id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::grid::columns::SortDirection;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("invoice_number", "Номер").width(140),
            ColumnDef::new("customer_name", "Покупатель"),
            ColumnDef::new("status", "Статус"),
            ColumnDef::new("total", "Сумма").hidden(true),
        ]
    }

    fn sample_snapshot() -> GridStateSnapshot {
        let mut snapshot = GridStateSnapshot::from_columns(&columns(), 50);
        snapshot.column_state.swap(0, 2);
        snapshot.column_state[1].width = Some(320);
        snapshot.column_state[3].hide = false;
        snapshot.sort_model = vec![SortModelItem {
            col_id: "customer_name".into(),
            sort: SortDirection::Asc,
        }];
        snapshot
            .filter_model
            .insert("status".into(), "paid".into());
        snapshot
    }

    #[test]
    fn test_round_trip() {
        let store = MemoryStore::new();
        let snapshot = sample_snapshot();
        save_state(&store, "invoices", &snapshot);
        let loaded = load_state(&store, "invoices", &columns());
        assert_eq!(loaded, Some(snapshot));
    }

    #[test]
    fn test_never_saved_is_none() {
        let store = MemoryStore::new();
        save_state(&store, "invoices", &sample_snapshot());
        assert_eq!(load_state(&store, "customers", &columns()), None);
    }

    #[test]
    fn test_unknown_columns_dropped() {
        let store = MemoryStore::new();
        save_state(&store, "invoices", &sample_snapshot());

        // "status" column removed from the grid
        let current: Vec<ColumnDef> = columns()
            .into_iter()
            .filter(|c| c.id != "status")
            .collect();
        let loaded = load_state(&store, "invoices", &current).unwrap();

        assert!(loaded.column("status").is_none());
        assert!(loaded.filter_model.is_empty());
        assert_eq!(loaded.sort_model.len(), 1);
        assert_eq!(loaded.column_state.len(), 3);
    }

    #[test]
    fn test_version_mismatch_discards_blob() {
        let store = MemoryStore::new();
        let mut snapshot = sample_snapshot();
        snapshot.version = GRID_STATE_VERSION + 1;
        save_state(&store, "invoices", &snapshot);

        assert_eq!(load_state(&store, "invoices", &columns()), None);
        assert!(store.get(&storage_key("invoices")).is_none());
    }

    #[test]
    fn test_corrupt_blob_is_none() {
        let store = MemoryStore::new();
        store.set(&storage_key("invoices"), "{not json");
        assert_eq!(load_state(&store, "invoices", &columns()), None);

        store.set(&storage_key("invoices"), r#"{"version": 1, "pageSize": "x"}"#);
        assert_eq!(load_state(&store, "invoices", &columns()), None);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        for field in ["columnState", "sortModel", "filterModel", "pageSize", "version", "savedAt"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(json["columnState"][0]["colId"], "status");
    }

    #[test]
    fn test_reconcile_appends_new_columns() {
        let mut snapshot = sample_snapshot();
        let mut current = columns();
        current.push(ColumnDef::new("due_date", "Срок оплаты").hidden(true));
        snapshot.reconcile(&current);

        let last = snapshot.column_state.last().unwrap();
        assert_eq!(last.col_id, "due_date");
        assert!(last.hide);
        assert_eq!(snapshot.column_state.len(), 5);
    }

    #[test]
    fn test_reconcile_drops_capabilities_the_columns_lost() {
        let mut snapshot = sample_snapshot();
        snapshot.sort_model.push(SortModelItem {
            col_id: "status".into(),
            sort: SortDirection::Desc,
        });
        snapshot.sort_model.push(SortModelItem {
            col_id: "customer_name".into(),
            sort: SortDirection::Desc,
        });
        snapshot
            .filter_model
            .insert("customer_name".into(), "   ".into());

        let current: Vec<ColumnDef> = columns()
            .into_iter()
            .map(|c| match c.id.as_str() {
                "status" => c.sortable(false).filterable(false),
                _ => c,
            })
            .collect();
        snapshot.reconcile(&current);

        assert_eq!(
            snapshot.sort_model,
            vec![SortModelItem {
                col_id: "customer_name".into(),
                sort: SortDirection::Asc,
            }]
        );
        assert!(snapshot.filter_model.is_empty());
        assert_eq!(snapshot.column_state.len(), 4);
    }

    #[test]
    fn test_save_reports_write() {
        let store = MemoryStore::new();
        assert!(save_state(&store, "invoices", &sample_snapshot()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_state() {
        let store = MemoryStore::new();
        save_state(&store, "invoices", &sample_snapshot());
        clear_state(&store, "invoices");
        assert!(store.is_empty());
    }
}
