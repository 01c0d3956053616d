//! Grid wrapper: pagination, debounced quick filter and persisted column
//! state around an injected [`GridWidget`].
//!
//! The controller owns the preference snapshot and the current page. The
//! widget owns the rows, matching, sorting and slicing. Every user-visible
//! change is persisted (when enabled) and reported to [`GridCallbacks`].

use super::columns::{ColumnDef, GridEvent, GridRow, GridWidget, SortModelItem};
use super::pagination::{compute_pagination, PageRequest, PaginationError, PaginationState};
use super::persistence::{load_state, save_state, FilterModel, GridStateSnapshot, KeyValueStore};
use super::search::{DebouncedSearch, SearchInputOutcome, DEFAULT_DEBOUNCE_MS};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFeatures {
    pub sorting: bool,
    pub filtering: bool,
    pub selection: bool,
    pub editing: bool,
    pub pagination: bool,
    pub persist_state: bool,
}

impl Default for GridFeatures {
    fn default() -> Self {
        Self {
            sorting: true,
            filtering: true,
            selection: true,
            editing: false,
            pagination: true,
            persist_state: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    /// Key for persisted preferences
    pub grid_id: String,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub max_buttons: usize,
    pub debounce_ms: u64,
    pub features: GridFeatures,
}

impl GridOptions {
    pub fn new(grid_id: impl Into<String>) -> Self {
        Self {
            grid_id: grid_id.into(),
            page_size: 20,
            page_size_options: vec![10, 20, 50, 100],
            max_buttons: 7,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            features: GridFeatures::default(),
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_buttons(mut self, max_buttons: usize) -> Self {
        self.max_buttons = max_buttons;
        self
    }

    pub fn debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn features(mut self, features: GridFeatures) -> Self {
        self.features = features;
        self
    }
}

/// Caller-supplied event handlers; unset handlers are skipped.
#[derive(Default)]
pub struct GridCallbacks {
    pub on_sort_changed: Option<Box<dyn FnMut(&[SortModelItem])>>,
    pub on_filter_changed: Option<Box<dyn FnMut(&FilterModel)>>,
    pub on_selection_changed: Option<Box<dyn FnMut(&[String])>>,
    /// `(row_id, col_id, value)`
    pub on_cell_edited: Option<Box<dyn FnMut(&str, &str, &Value)>>,
    /// `(page, page_size)`
    pub on_pagination_changed: Option<Box<dyn FnMut(usize, usize)>>,
    pub on_quick_filter: Option<Box<dyn FnMut(&str)>>,
}

pub struct GridController<W, S> {
    options: GridOptions,
    columns: Vec<ColumnDef>,
    snapshot: GridStateSnapshot,
    current_page: usize,
    selection: Vec<String>,
    search: DebouncedSearch,
    widget: W,
    store: S,
    callbacks: GridCallbacks,
}

impl<W: GridWidget, S: KeyValueStore> GridController<W, S> {
    pub fn new(
        mut options: GridOptions,
        columns: Vec<ColumnDef>,
        widget: W,
        store: S,
        callbacks: GridCallbacks,
    ) -> Self {
        options.page_size = options.page_size.max(1);
        options.max_buttons = options.max_buttons.max(3);

        let restored = if options.features.persist_state {
            load_state(&store, &options.grid_id, &columns)
        } else {
            None
        };
        let mut snapshot = restored
            .unwrap_or_else(|| GridStateSnapshot::from_columns(&columns, options.page_size));
        snapshot.reconcile(&columns);
        if !options.features.sorting {
            snapshot.sort_model.clear();
        }
        if !options.features.filtering {
            snapshot.filter_model.clear();
        }

        let mut controller = Self {
            search: DebouncedSearch::new(options.debounce_ms),
            options,
            columns,
            snapshot,
            current_page: 0,
            selection: Vec::new(),
            widget,
            store,
            callbacks,
        };
        controller.widget.supply_columns(controller.visible_columns());
        controller.widget.set_sort_model(&controller.snapshot.sort_model);
        controller
            .widget
            .set_filter_model(&controller.snapshot.filter_model);
        controller.apply_range();
        controller
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &GridStateSnapshot {
        &self.snapshot
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.snapshot.page_size
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn search_text(&self) -> &str {
        self.search.text()
    }

    pub fn next_search_deadline(&self) -> Option<u64> {
        self.search.next_deadline()
    }

    pub fn pagination(&self) -> Result<PaginationState, PaginationError> {
        compute_pagination(
            self.current_page,
            self.snapshot.page_size,
            self.widget.displayed_row_count(),
            self.options.max_buttons,
        )
    }

    /// Visible columns in display order, with user widths applied.
    pub fn visible_columns(&self) -> Vec<ColumnDef> {
        self.ordered_columns()
            .into_iter()
            .filter_map(|(column, visible)| visible.then_some(column))
            .collect()
    }

    /// All columns in display order with their visibility, for the column menu.
    pub fn ordered_columns(&self) -> Vec<(ColumnDef, bool)> {
        self.snapshot
            .column_state
            .iter()
            .filter_map(|state| {
                let def = self.columns.iter().find(|c| c.id == state.col_id)?;
                let mut column = def.clone();
                if state.width.is_some() {
                    column.width = state.width;
                }
                Some((column, !state.hide))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Hands rows to the widget. The current page is kept even when it no
    /// longer exists; navigation brings the user back.
    pub fn set_rows(&mut self, rows: Vec<GridRow>) {
        let ids: HashSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let before = self.selection.len();
        self.selection.retain(|id| ids.contains(id.as_str()));
        let selection_changed = self.selection.len() != before;

        self.widget.supply_rows(rows);
        self.apply_range();

        if selection_changed {
            if let Some(cb) = self.callbacks.on_selection_changed.as_mut() {
                cb(&self.selection);
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Moves to the requested page. Out-of-range requests are ignored.
    pub fn go_to(&mut self, request: PageRequest) -> Option<usize> {
        if !self.options.features.pagination {
            return None;
        }
        let target = self.pagination().ok()?.navigate(request)?;
        self.current_page = target;
        self.apply_range();
        if let Some(cb) = self.callbacks.on_pagination_changed.as_mut() {
            cb(target, self.snapshot.page_size);
        }
        Some(target)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 || page_size == self.snapshot.page_size {
            return false;
        }
        self.snapshot.page_size = page_size;
        self.current_page = 0;
        self.apply_range();
        self.persist();
        if let Some(cb) = self.callbacks.on_pagination_changed.as_mut() {
            cb(0, page_size);
        }
        true
    }

    // ------------------------------------------------------------------
    // Widget events
    // ------------------------------------------------------------------

    /// Applies an event reported by the widget. Returns `false` when the
    /// event was ignored (feature disabled, nothing changed, unknown column).
    pub fn on_event(&mut self, event: GridEvent) -> bool {
        let features = self.options.features;
        match event {
            GridEvent::SortChanged(model) => {
                if !features.sorting {
                    return false;
                }
                self.apply_sort(model);
                true
            }
            GridEvent::FilterChanged(model) => {
                if !features.filtering {
                    return false;
                }
                self.apply_filter(model);
                true
            }
            GridEvent::SelectionChanged(ids) => {
                if !features.selection {
                    return false;
                }
                self.selection = ids;
                if let Some(cb) = self.callbacks.on_selection_changed.as_mut() {
                    cb(&self.selection);
                }
                true
            }
            GridEvent::CellEdited {
                row_id,
                col_id,
                value,
            } => {
                if !features.editing || !self.columns.iter().any(|c| c.id == col_id) {
                    return false;
                }
                if let Some(cb) = self.callbacks.on_cell_edited.as_mut() {
                    cb(&row_id, &col_id, &value);
                }
                true
            }
            GridEvent::PaginationChanged { page, page_size } => {
                let mut handled = false;
                if page_size != self.snapshot.page_size {
                    handled |= self.set_page_size(page_size);
                }
                if page != self.current_page {
                    handled |= self.go_to(PageRequest::Page(page)).is_some();
                }
                handled
            }
            GridEvent::ColumnResized { col_id, width } => self.resize_column(&col_id, width),
            GridEvent::ColumnMoved { col_id, to_index } => self.move_column(&col_id, to_index),
            GridEvent::ColumnVisibilityChanged { col_id, visible } => {
                self.set_column_visible(&col_id, visible)
            }
        }
    }

    fn apply_sort(&mut self, model: Vec<SortModelItem>) {
        let mut seen = HashSet::new();
        let model: Vec<SortModelItem> = model
            .into_iter()
            .filter(|item| {
                self.columns
                    .iter()
                    .any(|c| c.id == item.col_id && c.sortable)
            })
            .filter(|item| seen.insert(item.col_id.clone()))
            .collect();

        self.snapshot.sort_model = model;
        self.widget.set_sort_model(&self.snapshot.sort_model);
        self.current_page = 0;
        self.apply_range();
        self.persist();
        if let Some(cb) = self.callbacks.on_sort_changed.as_mut() {
            cb(&self.snapshot.sort_model);
        }
    }

    fn apply_filter(&mut self, mut model: FilterModel) {
        model.retain(|col_id, value| {
            !value.trim().is_empty()
                && self
                    .columns
                    .iter()
                    .any(|c| &c.id == col_id && c.filterable)
        });

        self.snapshot.filter_model = model;
        self.widget.set_filter_model(&self.snapshot.filter_model);
        self.current_page = 0;
        self.apply_range();
        self.persist();
        if let Some(cb) = self.callbacks.on_filter_changed.as_mut() {
            cb(&self.snapshot.filter_model);
        }
    }

    // ------------------------------------------------------------------
    // Column bookkeeping
    // ------------------------------------------------------------------

    pub fn set_column_visible(&mut self, col_id: &str, visible: bool) -> bool {
        let visible_count = self.snapshot.column_state.iter().filter(|c| !c.hide).count();
        let Some(state) = self.snapshot.column_mut(col_id) else {
            return false;
        };
        if state.hide == !visible {
            return false;
        }
        // at least one column stays on screen
        if !visible && visible_count <= 1 {
            return false;
        }
        state.hide = !visible;
        self.columns_changed();
        true
    }

    pub fn resize_column(&mut self, col_id: &str, width: u32) -> bool {
        let Some(min_width) = self
            .columns
            .iter()
            .find(|c| c.id == col_id)
            .map(|c| c.min_width)
        else {
            return false;
        };
        let width = width.max(min_width);
        let Some(state) = self.snapshot.column_mut(col_id) else {
            return false;
        };
        if state.width == Some(width) {
            return false;
        }
        state.width = Some(width);
        self.columns_changed();
        true
    }

    pub fn move_column(&mut self, col_id: &str, to_index: usize) -> bool {
        let Some(from) = self
            .snapshot
            .column_state
            .iter()
            .position(|c| c.col_id == col_id)
        else {
            return false;
        };
        let to = to_index.min(self.snapshot.column_state.len() - 1);
        if from == to {
            return false;
        }
        let state = self.snapshot.column_state.remove(from);
        self.snapshot.column_state.insert(to, state);
        self.columns_changed();
        true
    }

    /// Back to column defaults, default sort and filters. Removes the saved blob.
    pub fn reset_state(&mut self) {
        self.snapshot = GridStateSnapshot::from_columns(&self.columns, self.options.page_size);
        self.current_page = 0;
        self.widget.supply_columns(self.visible_columns());
        self.widget.set_sort_model(&self.snapshot.sort_model);
        self.widget.set_filter_model(&self.snapshot.filter_model);
        self.apply_range();
        if self.options.features.persist_state {
            super::persistence::clear_state(&self.store, &self.options.grid_id);
        }
    }

    fn columns_changed(&mut self) {
        self.widget.supply_columns(self.visible_columns());
        self.persist();
    }

    // ------------------------------------------------------------------
    // Quick filter
    // ------------------------------------------------------------------

    /// Keystroke in the search box; `now` in milliseconds.
    pub fn search_input(&mut self, text: impl Into<String>, now: u64) -> SearchInputOutcome {
        let mut forwarded: Option<String> = None;
        let outcome = {
            let mut sink = |t: &str| forwarded = Some(t.to_string());
            self.search.on_input(text, now, &mut sink)
        };
        if let Some(text) = forwarded {
            self.apply_quick_filter(&text);
        }
        outcome
    }

    /// Timer tick; forwards the settled text once the debounce window passed.
    pub fn search_poll(&mut self, now: u64) -> Option<String> {
        let mut ignore = |_: &str| {};
        let text = self.search.poll(now, &mut ignore)?;
        self.apply_quick_filter(&text);
        Some(text)
    }

    pub fn search_clear(&mut self) {
        let mut ignore = |_: &str| {};
        self.search.clear(&mut ignore);
        self.apply_quick_filter("");
    }

    fn apply_quick_filter(&mut self, text: &str) {
        self.widget.set_quick_filter(text);
        self.current_page = 0;
        self.apply_range();
        if let Some(cb) = self.callbacks.on_quick_filter.as_mut() {
            cb(text);
        }
    }

    // ------------------------------------------------------------------

    fn apply_range(&mut self) {
        if !self.options.features.pagination {
            let count = self.widget.displayed_row_count();
            self.widget.set_visible_range(0, count);
            return;
        }
        if let Ok(state) = self.pagination() {
            self.widget.set_visible_range(state.start_row, state.end_row);
        }
    }

    fn persist(&mut self) {
        if !self.options.features.persist_state {
            return;
        }
        self.snapshot.saved_at = Utc::now();
        save_state(&self.store, &self.options.grid_id, &self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::grid::columns::SortDirection;
    use crate::shared::grid::persistence::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeWidget {
        rows: Vec<GridRow>,
        columns: Vec<String>,
        quick_filter: String,
        quick_filter_calls: Vec<String>,
        sort_model: Vec<SortModelItem>,
        filter_model: FilterModel,
        range: (usize, usize),
    }

    impl GridWidget for FakeWidget {
        fn supply_rows(&mut self, rows: Vec<GridRow>) {
            self.rows = rows;
        }

        fn supply_columns(&mut self, columns: Vec<ColumnDef>) {
            self.columns = columns.into_iter().map(|c| c.id).collect();
        }

        fn set_quick_filter(&mut self, text: &str) {
            self.quick_filter = text.to_string();
            self.quick_filter_calls.push(text.to_string());
        }

        fn set_sort_model(&mut self, model: &[SortModelItem]) {
            self.sort_model = model.to_vec();
        }

        fn set_filter_model(&mut self, model: &FilterModel) {
            self.filter_model = model.clone();
        }

        fn set_visible_range(&mut self, start: usize, end: usize) {
            self.range = (start, end);
        }

        fn displayed_row_count(&self) -> usize {
            self.rows
                .iter()
                .filter(|row| {
                    self.quick_filter.is_empty()
                        || row.id.contains(self.quick_filter.as_str())
                })
                .count()
        }
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("invoice_number", "Номер"),
            ColumnDef::new("customer_name", "Покупатель"),
            ColumnDef::new("status", "Статус").sortable(false),
            ColumnDef::new("notes", "Примечание").hidden(true).filterable(false),
        ]
    }

    fn rows(n: usize) -> Vec<GridRow> {
        (0..n)
            .map(|i| GridRow::new(format!("row-{}", i)).with("invoice_number", format!("INV-{}", i)))
            .collect()
    }

    fn controller(store: &MemoryStore) -> GridController<FakeWidget, &MemoryStore> {
        GridController::new(
            GridOptions::new("invoices").page_size(20),
            columns(),
            FakeWidget::default(),
            store,
            GridCallbacks::default(),
        )
    }

    #[test]
    fn test_initial_columns_skip_hidden() {
        let store = MemoryStore::new();
        let ctl = controller(&store);
        assert_eq!(
            ctl.widget().columns,
            vec!["invoice_number", "customer_name", "status"]
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_rows_and_navigation() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.set_rows(rows(95));
        assert_eq!(ctl.widget().range, (0, 20));

        assert_eq!(ctl.go_to(PageRequest::Page(2)), Some(2));
        assert_eq!(ctl.widget().range, (40, 60));
        let p = ctl.pagination().unwrap();
        assert_eq!(p.total_pages, 5);
        assert!(p.has_previous && p.has_next);

        assert_eq!(ctl.go_to(PageRequest::Page(9)), None);
        assert_eq!(ctl.current_page(), 2);
        assert_eq!(ctl.go_to(PageRequest::Last), Some(4));
        assert_eq!(ctl.widget().range, (80, 95));
    }

    #[test]
    fn test_shrinking_rows_keeps_page() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.set_rows(rows(95));
        ctl.go_to(PageRequest::Last);
        ctl.set_rows(rows(30));

        assert_eq!(ctl.current_page(), 4);
        assert!(!ctl.pagination().unwrap().is_in_range());
        assert_eq!(ctl.widget().range, (30, 30));
        assert_eq!(ctl.go_to(PageRequest::Next), None);
        assert_eq!(ctl.go_to(PageRequest::First), Some(0));
        assert_eq!(ctl.widget().range, (0, 20));
    }

    #[test]
    fn test_page_size_change_persists_and_resets_page() {
        let store = MemoryStore::new();
        let pages: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
        let recorded = pages.clone();
        let mut ctl = GridController::new(
            GridOptions::new("invoices"),
            columns(),
            FakeWidget::default(),
            &store,
            GridCallbacks {
                on_pagination_changed: Some(Box::new(move |page: usize, size: usize| {
                    recorded.borrow_mut().push((page, size))
                })),
                ..Default::default()
            },
        );
        ctl.set_rows(rows(95));
        ctl.go_to(PageRequest::Next);
        assert!(ctl.on_event(GridEvent::PaginationChanged {
            page: 1,
            page_size: 50
        }));

        assert_eq!(ctl.page_size(), 50);
        assert_eq!(ctl.current_page(), 1);
        assert_eq!(*pages.borrow(), vec![(1, 20), (0, 50), (1, 50)]);
        assert!(!ctl.set_page_size(0));
    }

    #[test]
    fn test_sort_event_filters_columns_and_forwards() {
        let store = MemoryStore::new();
        let sorts: Rc<RefCell<Vec<Vec<SortModelItem>>>> = Rc::default();
        let recorded = sorts.clone();
        let mut ctl = GridController::new(
            GridOptions::new("invoices"),
            columns(),
            FakeWidget::default(),
            &store,
            GridCallbacks {
                on_sort_changed: Some(Box::new(move |model: &[SortModelItem]| {
                    recorded.borrow_mut().push(model.to_vec())
                })),
                ..Default::default()
            },
        );
        ctl.set_rows(rows(95));
        ctl.go_to(PageRequest::Page(3));

        let model = vec![
            SortModelItem {
                col_id: "customer_name".into(),
                sort: SortDirection::Desc,
            },
            SortModelItem {
                col_id: "status".into(),
                sort: SortDirection::Asc,
            },
            SortModelItem {
                col_id: "gone".into(),
                sort: SortDirection::Asc,
            },
        ];
        assert!(ctl.on_event(GridEvent::SortChanged(model)));

        let expected = vec![SortModelItem {
            col_id: "customer_name".into(),
            sort: SortDirection::Desc,
        }];
        assert_eq!(ctl.widget().sort_model, expected);
        assert_eq!(*sorts.borrow(), vec![expected.clone()]);
        assert_eq!(ctl.current_page(), 0);
        assert_eq!(ctl.snapshot().sort_model, expected);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_disabled_features_ignore_events() {
        let store = MemoryStore::new();
        let features = GridFeatures {
            sorting: false,
            selection: false,
            persist_state: false,
            ..GridFeatures::default()
        };
        let mut ctl = GridController::new(
            GridOptions::new("invoices").features(features),
            columns(),
            FakeWidget::default(),
            &store,
            GridCallbacks::default(),
        );
        assert!(!ctl.on_event(GridEvent::SortChanged(vec![SortModelItem {
            col_id: "customer_name".into(),
            sort: SortDirection::Asc,
        }])));
        assert!(!ctl.on_event(GridEvent::SelectionChanged(vec!["row-1".into()])));
        assert!(!ctl.on_event(GridEvent::CellEdited {
            row_id: "row-1".into(),
            col_id: "customer_name".into(),
            value: Value::from("x"),
        }));
        assert!(ctl.on_event(GridEvent::ColumnResized {
            col_id: "customer_name".into(),
            width: 300,
        }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_filter_event_drops_unfilterable_and_empty() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        let mut model = FilterModel::new();
        model.insert("status".into(), "paid".into());
        model.insert("notes".into(), "vip".into());
        model.insert("customer_name".into(), "  ".into());
        assert!(ctl.on_event(GridEvent::FilterChanged(model)));

        assert_eq!(ctl.widget().filter_model.len(), 1);
        assert_eq!(ctl.widget().filter_model.get("status").map(String::as_str), Some("paid"));
    }

    #[test]
    fn test_state_restored_on_next_mount() {
        let store = MemoryStore::new();
        {
            let mut ctl = controller(&store);
            ctl.on_event(GridEvent::SortChanged(vec![SortModelItem {
                col_id: "invoice_number".into(),
                sort: SortDirection::Asc,
            }]));
            ctl.resize_column("customer_name", 10);
            ctl.move_column("status", 0);
            ctl.set_column_visible("notes", true);
            ctl.set_page_size(50);
        }

        let ctl = controller(&store);
        assert_eq!(ctl.page_size(), 50);
        assert_eq!(ctl.widget().sort_model.len(), 1);
        assert_eq!(
            ctl.widget().columns,
            vec!["status", "invoice_number", "customer_name", "notes"]
        );
        // clamped to min_width
        let customer = ctl
            .visible_columns()
            .into_iter()
            .find(|c| c.id == "customer_name")
            .unwrap();
        assert_eq!(customer.width, Some(60));
    }

    #[test]
    fn test_restored_sort_and_filter_respect_column_flags() {
        let store = MemoryStore::new();
        let mut saved = GridStateSnapshot::from_columns(&columns(), 20);
        saved.sort_model = vec![
            SortModelItem {
                col_id: "status".into(),
                sort: SortDirection::Asc,
            },
            SortModelItem {
                col_id: "invoice_number".into(),
                sort: SortDirection::Desc,
            },
        ];
        saved.filter_model.insert("notes".into(), "срочно".into());
        saved.filter_model.insert("customer_name".into(), "ромашка".into());
        assert!(save_state(&store, "invoices", &saved));

        let ctl = controller(&store);
        assert_eq!(
            ctl.widget().sort_model,
            vec![SortModelItem {
                col_id: "invoice_number".into(),
                sort: SortDirection::Desc,
            }]
        );
        assert_eq!(ctl.widget().filter_model.len(), 1);
        assert!(ctl.widget().filter_model.contains_key("customer_name"));
        assert_eq!(ctl.snapshot().sort_model, ctl.widget().sort_model);
    }

    #[test]
    fn test_last_visible_column_stays() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        assert!(ctl.set_column_visible("invoice_number", false));
        assert!(ctl.set_column_visible("customer_name", false));
        assert!(!ctl.set_column_visible("status", false));
        assert_eq!(ctl.widget().columns, vec!["status"]);
        assert!(!ctl.set_column_visible("unknown", true));
    }

    #[test]
    fn test_search_debounce_through_controller() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.set_rows(rows(95));
        ctl.go_to(PageRequest::Page(2));

        ctl.search_input("row-1", 0);
        ctl.search_input("row-12", 50);
        assert_eq!(ctl.search_poll(200), None);
        assert_eq!(ctl.search_poll(350), Some("row-12".to_string()));
        assert_eq!(ctl.widget().quick_filter_calls, vec!["row-12"]);
        assert_eq!(ctl.current_page(), 0);
        assert_eq!(ctl.widget().range, (0, 1));

        ctl.search_input("row-9", 400);
        ctl.search_input("", 420);
        assert_eq!(ctl.widget().quick_filter_calls, vec!["row-12", ""]);
        assert_eq!(ctl.search_poll(1000), None);
        assert_eq!(ctl.widget().range, (0, 20));
    }

    #[test]
    fn test_selection_pruned_when_rows_change() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.set_rows(rows(5));
        ctl.on_event(GridEvent::SelectionChanged(vec!["row-1".into(), "row-4".into()]));
        ctl.set_rows(rows(3));
        assert_eq!(ctl.selection(), ["row-1".to_string()]);
    }

    #[test]
    fn test_reset_state_clears_blob() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.set_page_size(100);
        assert!(!store.is_empty());
        ctl.reset_state();
        assert!(store.is_empty());
        assert_eq!(ctl.page_size(), 20);
    }
}
