use super::aggregate::{Invoice, InvoiceStatus};
use serde::{Deserialize, Serialize};

/// Query параметры списка счетов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_desc")]
    pub sort_desc: bool,
    #[serde(default)]
    pub page: usize,
    /// `0` means "all rows" (the grid paginates client-side).
    #[serde(default)]
    pub page_size: usize,
}

fn default_sort_by() -> String {
    "issue_date".to_string()
}

fn default_sort_desc() -> bool {
    true
}

impl Default for InvoiceListQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sort_by: default_sort_by(),
            sort_desc: default_sort_desc(),
            page: 0,
            page_size: 0,
        }
    }
}

/// Ответ списка с пагинацией
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub items: Vec<Invoice>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Cache revision of a page key; bumps after every successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRevision {
    pub revision: u64,
}

/// Page key the invoice actions invalidate.
pub const INVOICES_PAGE_KEY: &str = "a001_invoice";
