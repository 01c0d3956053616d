//! Data grid wrapper logic, independent of any rendering layer.
//!
//! - `theme`: design tokens -> grid CSS variables
//! - `pagination`: page counts, visible row range, page-button window
//! - `search`: debounced quick-filter input
//! - `persistence`: versioned column/sort/filter snapshot in a key-value store
//! - `columns`: column definitions, row shape, grid events, widget capability
//! - `controller`: composes all of the above around an injected widget

pub mod columns;
pub mod controller;
pub mod pagination;
pub mod persistence;
pub mod search;
pub mod theme;

pub use columns::{
    CellRenderer, ColumnDef, GridEvent, GridRow, GridWidget, SortDirection, SortModelItem,
    ValueFormatter,
};
pub use controller::{GridCallbacks, GridController, GridFeatures, GridOptions};
pub use pagination::{compute_pagination, PageButton, PageRequest, PaginationError, PaginationState};
pub use persistence::{
    clear_state, load_state, save_state, ColumnState, FilterModel, GridStateSnapshot,
    KeyValueStore, MemoryStore, GRID_STATE_VERSION,
};
pub use search::{DebouncedSearch, QuickFilterSink, SearchInputOutcome, DEFAULT_DEBOUNCE_MS};
pub use theme::{bridge, DesignTokens, GridThemeVariables};
