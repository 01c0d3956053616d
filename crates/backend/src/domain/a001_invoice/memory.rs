use async_trait::async_trait;
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceDto, InvoiceId};
use contracts::domain::a001_invoice::api::InvoiceListQuery;
use std::cmp::Ordering;
use tokio::sync::RwLock;

use super::repository::{
    search_key, search_text, InvoicePage, InvoiceStore, PageWindow, SortField, StoreError,
};

/// In-process store with the same tenant scoping as the database one.
#[derive(Debug, Default)]
pub struct MemoryInvoiceStore {
    rows: RwLock<Vec<Invoice>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_listed(invoice: &Invoice, tenant_id: &str, query: &InvoiceListQuery) -> bool {
    if invoice.tenant_id != tenant_id {
        return false;
    }
    if let Some(status) = query.status {
        if invoice.status != status {
            return false;
        }
    }
    match search_text(query) {
        Some(needle) => {
            search_key(&invoice.invoice_number, &invoice.customer_name).contains(&needle)
        }
        None => true,
    }
}

fn compare(a: &Invoice, b: &Invoice, field: SortField) -> Ordering {
    match field {
        SortField::InvoiceNumber => a.invoice_number.cmp(&b.invoice_number),
        SortField::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortField::IssueDate => a.issue_date.cmp(&b.issue_date),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn list(
        &self,
        tenant_id: &str,
        query: &InvoiceListQuery,
    ) -> Result<InvoicePage, StoreError> {
        let rows = self.rows.read().await;
        let mut items: Vec<Invoice> = rows
            .iter()
            .filter(|inv| is_listed(inv, tenant_id, query))
            .cloned()
            .collect();

        let field = SortField::parse(&query.sort_by);
        items.sort_by(|a, b| {
            let ord = compare(a, b, field);
            let ord = if query.sort_desc { ord.reverse() } else { ord };
            ord.then_with(|| a.to_string_id().cmp(&b.to_string_id()))
        });

        let total = items.len();
        let items = match PageWindow::of(query) {
            PageWindow::All => items,
            PageWindow::Rows { offset, limit } => {
                items.into_iter().skip(offset).take(limit).collect()
            }
            PageWindow::PastEnd => Vec::new(),
        };
        Ok(InvoicePage { items, total })
    }

    async fn get(&self, tenant_id: &str, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|inv| inv.id == *id && inv.tenant_id == tenant_id)
            .cloned())
    }

    async fn insert(&self, tenant_id: &str, invoice: &Invoice) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|inv| inv.id == invoice.id) {
            return Err(StoreError::Corrupt {
                id: invoice.to_string_id(),
                reason: "duplicate primary key".into(),
            });
        }
        let mut stored = invoice.clone();
        stored.tenant_id = tenant_id.to_string();
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        tenant_id: &str,
        id: &InvoiceId,
        patch: &InvoiceDto,
    ) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.write().await;
        let invoice = rows
            .iter_mut()
            .find(|inv| inv.id == *id && inv.tenant_id == tenant_id)
            .ok_or(StoreError::NotFound)?;
        invoice.update(patch);
        invoice.before_write();
        Ok(invoice.clone())
    }

    async fn delete(&self, tenant_id: &str, id: &InvoiceId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|inv| !(inv.id == *id && inv.tenant_id == tenant_id));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
