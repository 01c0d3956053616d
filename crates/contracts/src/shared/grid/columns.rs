//! Column definitions, row shape and the grid widget capability.

use super::persistence::FilterModel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named cell renderer; the rendering layer maps each name to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRenderer {
    /// Clickable text that opens the row
    Link,
    /// Colored status badge
    Badge,
    /// Right-aligned amount
    Money,
    Date,
}

/// Value formatter applied before display and quick-filter matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormatter {
    /// `1234.5` -> `1 234.50`
    Money,
    /// `2025-03-01` -> `01.03.2025`
    Date,
    /// `1234` -> `1 234`
    Integer,
    Text,
}

impl ValueFormatter {
    pub fn format(&self, value: &Value) -> String {
        match self {
            ValueFormatter::Money => value
                .as_f64()
                .map(|v| group_thousands(&format!("{:.2}", v)))
                .unwrap_or_else(|| plain_text(value)),
            ValueFormatter::Integer => value
                .as_f64()
                .map(|v| group_thousands(&format!("{:.0}", v)))
                .unwrap_or_else(|| plain_text(value)),
            ValueFormatter::Date => {
                let text = plain_text(value);
                let date_part = text.split('T').next().unwrap_or_default();
                let mut parts = date_part.splitn(3, '-');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(y), Some(m), Some(d)) if y.len() == 4 => format!("{}.{}.{}", d, m, y),
                    _ => text,
                }
            }
            ValueFormatter::Text => plain_text(value),
        }
    }
}

/// Text of a JSON value without quotes; `null` becomes empty.
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Описание колонки таблицы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub label: String,
    /// Default width in px; `None` lets the table decide
    pub width: Option<u32>,
    pub min_width: u32,
    pub sortable: bool,
    pub filterable: bool,
    /// Hidden by default (user can show it)
    pub hidden: bool,
    pub renderer: Option<CellRenderer>,
    pub formatter: Option<ValueFormatter>,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width: None,
            min_width: 60,
            sortable: true,
            filterable: true,
            hidden: false,
            renderer: None,
            formatter: None,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Display text of `value` in this column.
    pub fn display(&self, value: Option<&Value>) -> String {
        match value {
            None => String::new(),
            Some(v) => self
                .formatter
                .unwrap_or(ValueFormatter::Text)
                .format(v),
        }
    }
}

/// Row in the shape the grid widget consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub id: String,
    pub values: BTreeMap<String, Value>,
}

impl GridRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, col_id: &str, value: impl Into<Value>) -> Self {
        self.values.insert(col_id.to_string(), value.into());
        self
    }

    pub fn value(&self, col_id: &str) -> Option<&Value> {
        self.values.get(col_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModelItem {
    pub col_id: String,
    pub sort: SortDirection,
}

/// Events the widget emits; the controller forwards them to callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    SortChanged(Vec<SortModelItem>),
    FilterChanged(FilterModel),
    SelectionChanged(Vec<String>),
    CellEdited {
        row_id: String,
        col_id: String,
        value: Value,
    },
    PaginationChanged {
        page: usize,
        page_size: usize,
    },
    ColumnResized {
        col_id: String,
        width: u32,
    },
    ColumnMoved {
        col_id: String,
        to_index: usize,
    },
    ColumnVisibilityChanged {
        col_id: String,
        visible: bool,
    },
}

/// Table widget capability consumed by the grid controller.
///
/// Matching, sorting and slicing are the widget's business; the controller
/// only hands over data and tells it which model to apply.
pub trait GridWidget {
    fn supply_rows(&mut self, rows: Vec<GridRow>);
    /// Visible columns in display order
    fn supply_columns(&mut self, columns: Vec<ColumnDef>);
    fn set_quick_filter(&mut self, text: &str);
    fn set_sort_model(&mut self, model: &[SortModelItem]);
    fn set_filter_model(&mut self, model: &FilterModel);
    /// Rows `start..end` of the filtered and sorted set are displayed.
    fn set_visible_range(&mut self, start: usize, end: usize);
    /// Row count after quick filter and column filters.
    fn displayed_row_count(&self) -> usize;
}
