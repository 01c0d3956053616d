//! Табличная модель встроенного виджета: quick filter, фильтры колонок,
//! многоколоночная сортировка и срез видимой страницы.
//!
//! Чистые данные без реактивности; `widget.rs` держит модель в сигнале.

use contracts::shared::grid::columns::plain_text;
use contracts::shared::grid::{
    ColumnDef, FilterModel, GridRow, GridWidget, SortDirection, SortModelItem,
};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridModel {
    rows: Vec<GridRow>,
    columns: Vec<ColumnDef>,
    quick_filter: String,
    filter_model: FilterModel,
    sort_model: Vec<SortModelItem>,
    range: (usize, usize),
    /// Indices into `rows` after filtering and sorting.
    displayed: Vec<usize>,
}

impl GridModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn quick_filter(&self) -> &str {
        &self.quick_filter
    }

    pub fn sort_model(&self) -> &[SortModelItem] {
        &self.sort_model
    }

    pub fn filter_text(&self, col_id: &str) -> Option<&str> {
        self.filter_model.get(col_id).map(String::as_str)
    }

    /// Direction and 1-based priority when the column takes part in sorting.
    pub fn sort_of(&self, col_id: &str) -> Option<(SortDirection, usize)> {
        self.sort_model
            .iter()
            .position(|item| item.col_id == col_id)
            .map(|pos| (self.sort_model[pos].sort, pos + 1))
    }

    pub fn range(&self) -> (usize, usize) {
        self.range
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<GridRow> {
        let end = self.range.1.min(self.displayed.len());
        let start = self.range.0.min(end);
        self.displayed[start..end]
            .iter()
            .map(|&i| self.rows[i].clone())
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    fn refresh(&mut self) {
        let needle = self.quick_filter.trim().to_lowercase();
        let mut displayed: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                let row = &self.rows[i];
                matches_quick_filter(row, &self.columns, &needle)
                    && matches_filters(row, &self.columns, &self.filter_model)
            })
            .collect();

        if !self.sort_model.is_empty() {
            // sort_by is stable: ties keep supply order
            displayed.sort_by(|&a, &b| {
                compare_rows(&self.rows[a], &self.rows[b], &self.sort_model)
            });
        }
        self.displayed = displayed;
    }
}

impl GridWidget for GridModel {
    fn supply_rows(&mut self, rows: Vec<GridRow>) {
        self.rows = rows;
        self.refresh();
    }

    fn supply_columns(&mut self, columns: Vec<ColumnDef>) {
        self.columns = columns;
        self.refresh();
    }

    fn set_quick_filter(&mut self, text: &str) {
        self.quick_filter = text.to_string();
        self.refresh();
    }

    fn set_sort_model(&mut self, model: &[SortModelItem]) {
        self.sort_model = model.to_vec();
        self.refresh();
    }

    fn set_filter_model(&mut self, model: &FilterModel) {
        self.filter_model = model.clone();
        self.refresh();
    }

    fn set_visible_range(&mut self, start: usize, end: usize) {
        self.range = (start, end);
    }

    fn displayed_row_count(&self) -> usize {
        self.displayed.len()
    }
}

/// Case-insensitive substring over the displayed text of visible columns.
fn matches_quick_filter(row: &GridRow, columns: &[ColumnDef], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .any(|col| col.display(row.value(&col.id)).to_lowercase().contains(needle))
}

fn matches_filters(row: &GridRow, columns: &[ColumnDef], filters: &FilterModel) -> bool {
    filters.iter().all(|(col_id, text)| {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        // Hidden columns still filter, by their raw text
        let cell = match columns.iter().find(|c| &c.id == col_id) {
            Some(col) => col.display(row.value(col_id)),
            None => row.value(col_id).map(plain_text).unwrap_or_default(),
        };
        cell.to_lowercase().contains(&needle)
    })
}

fn compare_rows(a: &GridRow, b: &GridRow, sort_model: &[SortModelItem]) -> Ordering {
    for item in sort_model {
        let ord = compare_values(a.value(&item.col_id), b.value(&item.col_id));
        let ord = match item.sort {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Missing and null values sort first; numbers numerically; the rest as
/// lowercase text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => plain_text(x).to_lowercase().cmp(&plain_text(y).to_lowercase()),
        },
    }
}

/// Header click: none -> asc -> desc -> none.
///
/// A plain click replaces the whole model; with `additive` (shift-click) the
/// column is cycled in place and other keys are kept.
pub fn next_sort_model(
    current: &[SortModelItem],
    col_id: &str,
    additive: bool,
) -> Vec<SortModelItem> {
    let existing = current.iter().find(|item| item.col_id == col_id);
    let next = match existing.map(|item| item.sort) {
        None => Some(SortDirection::Asc),
        Some(SortDirection::Asc) => Some(SortDirection::Desc),
        Some(SortDirection::Desc) => None,
    };

    if !additive {
        return next
            .map(|sort| {
                vec![SortModelItem {
                    col_id: col_id.to_string(),
                    sort,
                }]
            })
            .unwrap_or_default();
    }

    let mut model: Vec<SortModelItem> = current.to_vec();
    match (model.iter().position(|item| item.col_id == col_id), next) {
        (Some(pos), Some(sort)) => model[pos].sort = sort,
        (Some(pos), None) => {
            model.remove(pos);
        }
        (None, Some(sort)) => model.push(SortModelItem {
            col_id: col_id.to_string(),
            sort,
        }),
        (None, None) => {}
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::grid::ValueFormatter;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("invoice_number", "Номер"),
            ColumnDef::new("customer_name", "Покупатель"),
            ColumnDef::new("total", "Сумма").formatter(ValueFormatter::Money),
        ]
    }

    fn rows() -> Vec<GridRow> {
        vec![
            GridRow::new("a")
                .with("invoice_number", "INV-3")
                .with("customer_name", "Acme")
                .with("total", 1500.0)
                .with("notes", "urgent"),
            GridRow::new("b")
                .with("invoice_number", "INV-1")
                .with("customer_name", "borealis")
                .with("total", 200.0),
            GridRow::new("c")
                .with("invoice_number", "INV-2")
                .with("customer_name", "Acme Labs")
                .with("total", 1500.0),
        ]
    }

    fn model() -> GridModel {
        let mut m = GridModel::new();
        m.supply_columns(columns());
        m.supply_rows(rows());
        m.set_visible_range(0, 20);
        m
    }

    fn ids(m: &GridModel) -> Vec<String> {
        m.page_rows().into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_quick_filter_is_case_insensitive_over_visible_columns() {
        let mut m = model();
        m.set_quick_filter("ACME");
        assert_eq!(ids(&m), vec!["a", "c"]);
        assert_eq!(m.displayed_row_count(), 2);

        // formatted text is searched, hidden columns are not
        m.set_quick_filter("1 500.00");
        assert_eq!(m.displayed_row_count(), 2);
        m.set_quick_filter("urgent");
        assert_eq!(m.displayed_row_count(), 0);

        m.set_quick_filter("");
        assert_eq!(m.displayed_row_count(), 3);
    }

    #[test]
    fn test_column_filter_and_hidden_column_filter() {
        let mut m = model();
        let mut filters = FilterModel::new();
        filters.insert("customer_name".into(), "labs".into());
        m.set_filter_model(&filters);
        assert_eq!(ids(&m), vec!["c"]);

        filters.clear();
        filters.insert("notes".into(), "URG".into());
        m.set_filter_model(&filters);
        assert_eq!(ids(&m), vec!["a"]);
    }

    #[test]
    fn test_multi_column_sort_is_stable() {
        let mut m = model();
        m.set_sort_model(&[
            SortModelItem {
                col_id: "total".into(),
                sort: SortDirection::Desc,
            },
            SortModelItem {
                col_id: "invoice_number".into(),
                sort: SortDirection::Asc,
            },
        ]);
        assert_eq!(ids(&m), vec!["c", "a", "b"]);

        m.set_sort_model(&[SortModelItem {
            col_id: "total".into(),
            sort: SortDirection::Desc,
        }]);
        assert_eq!(ids(&m), vec!["a", "c", "b"]);
        assert_eq!(m.sort_of("total"), Some((SortDirection::Desc, 1)));
        assert_eq!(m.sort_of("customer_name"), None);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let mut m = model();
        m.set_sort_model(&[SortModelItem {
            col_id: "customer_name".into(),
            sort: SortDirection::Asc,
        }]);
        assert_eq!(ids(&m), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_page_rows_clamps_range() {
        let mut m = model();
        m.set_visible_range(2, 4);
        assert_eq!(ids(&m), vec!["c"]);
        m.set_visible_range(5, 8);
        assert!(m.page_rows().is_empty());
    }

    #[test]
    fn test_next_sort_model_cycles() {
        let asc = next_sort_model(&[], "total", false);
        assert_eq!(asc.len(), 1);
        assert_eq!(asc[0].sort, SortDirection::Asc);

        let desc = next_sort_model(&asc, "total", false);
        assert_eq!(desc[0].sort, SortDirection::Desc);

        assert!(next_sort_model(&desc, "total", false).is_empty());

        // plain click on another column replaces the model
        let other = next_sort_model(&desc, "customer_name", false);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].col_id, "customer_name");
    }

    #[test]
    fn test_next_sort_model_additive() {
        let first = next_sort_model(&[], "total", true);
        let both = next_sort_model(&first, "customer_name", true);
        assert_eq!(
            both.iter().map(|i| i.col_id.as_str()).collect::<Vec<_>>(),
            vec!["total", "customer_name"]
        );

        let flipped = next_sort_model(&both, "total", true);
        assert_eq!(flipped[0].sort, SortDirection::Desc);
        assert_eq!(flipped.len(), 2);

        let removed = next_sort_model(&flipped, "total", true);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].col_id, "customer_name");
    }
}
