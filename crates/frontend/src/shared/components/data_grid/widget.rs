use super::model::GridModel;
use contracts::shared::grid::{ColumnDef, FilterModel, GridRow, GridWidget, SortModelItem};
use leptos::prelude::*;

/// Встроенный виджет таблицы: [`GridModel`] в сигнале.
///
/// Every mutation goes through `update`, so the rendered table follows the
/// controller without extra wiring.
#[derive(Clone, Copy)]
pub struct SignalGridWidget {
    model: RwSignal<GridModel>,
}

impl SignalGridWidget {
    pub fn new(model: RwSignal<GridModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> RwSignal<GridModel> {
        self.model
    }
}

impl GridWidget for SignalGridWidget {
    fn supply_rows(&mut self, rows: Vec<GridRow>) {
        self.model.update(|m| m.supply_rows(rows));
    }

    fn supply_columns(&mut self, columns: Vec<ColumnDef>) {
        self.model.update(|m| m.supply_columns(columns));
    }

    fn set_quick_filter(&mut self, text: &str) {
        self.model.update(|m| m.set_quick_filter(text));
    }

    fn set_sort_model(&mut self, model: &[SortModelItem]) {
        self.model.update(|m| m.set_sort_model(model));
    }

    fn set_filter_model(&mut self, model: &FilterModel) {
        self.model.update(|m| m.set_filter_model(model));
    }

    fn set_visible_range(&mut self, start: usize, end: usize) {
        self.model.update(|m| m.set_visible_range(start, end));
    }

    fn displayed_row_count(&self) -> usize {
        self.model.with_untracked(|m| m.displayed_row_count())
    }
}
