use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a001_invoice::aggregate::{
    Invoice, InvoiceDto, InvoiceId, InvoiceLineItem, InvoiceStatus,
};
use contracts::domain::a001_invoice::api::InvoiceListQuery;
use contracts::domain::common::AggregateId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{Order, PaginatorTrait, QueryOrder, QuerySelect, Select, Set};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invoice not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt invoice row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// One page of a tenant's invoices plus the count of all matches.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePage {
    pub items: Vec<Invoice>,
    pub total: usize,
}

/// Invoice storage. Every method is scoped to `tenant_id`: rows of another
/// tenant are never read, changed or counted, and look exactly like missing rows.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn list(&self, tenant_id: &str, query: &InvoiceListQuery)
        -> Result<InvoicePage, StoreError>;

    async fn get(&self, tenant_id: &str, id: &InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Stores `invoice` under `tenant_id`, whatever tenant the value carries.
    async fn insert(&self, tenant_id: &str, invoice: &Invoice) -> Result<Invoice, StoreError>;

    /// Applies the form data to an existing invoice. `NotFound` if absent.
    async fn update(
        &self,
        tenant_id: &str,
        id: &InvoiceId,
        patch: &InvoiceDto,
    ) -> Result<Invoice, StoreError>;

    /// Hard delete. `NotFound` if absent.
    async fn delete(&self, tenant_id: &str, id: &InvoiceId) -> Result<(), StoreError>;
}

/// Server-side sort keys of the list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    InvoiceNumber,
    CustomerName,
    IssueDate,
    DueDate,
    Status,
    CreatedAt,
}

impl SortField {
    /// Unknown names sort by issue date.
    pub fn parse(name: &str) -> Self {
        match name {
            "invoice_number" => SortField::InvoiceNumber,
            "customer_name" => SortField::CustomerName,
            "due_date" => SortField::DueDate,
            "status" => SortField::Status,
            "created_at" => SortField::CreatedAt,
            _ => SortField::IssueDate,
        }
    }

    fn column(self) -> Column {
        match self {
            SortField::InvoiceNumber => Column::InvoiceNumber,
            SortField::CustomerName => Column::CustomerName,
            SortField::IssueDate => Column::IssueDate,
            SortField::DueDate => Column::DueDate,
            SortField::Status => Column::Status,
            SortField::CreatedAt => Column::CreatedAt,
        }
    }
}

/// Trimmed, lowercased, non-empty search text of the query.
pub fn search_text(query: &InvoiceListQuery) -> Option<String> {
    query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Text the search matches against: number and customer, lowercased with
/// Unicode rules so both stores agree on non-ASCII names.
pub fn search_key(invoice_number: &str, customer_name: &str) -> String {
    format!("{}\n{}", invoice_number, customer_name).to_lowercase()
}

/// Escapes LIKE wildcards so the needle matches literally (escape char `\`).
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Rows a list query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    /// `page_size == 0`
    All,
    Rows { offset: usize, limit: usize },
    /// The offset is not representable, so no row can be on this page.
    PastEnd,
}

impl PageWindow {
    /// SQLite takes LIMIT/OFFSET as i64, so both stay within `i64::MAX`.
    pub fn of(query: &InvoiceListQuery) -> Self {
        if query.page_size == 0 {
            return PageWindow::All;
        }
        let max = usize::try_from(i64::MAX).unwrap_or(usize::MAX);
        match query.page.checked_mul(query.page_size) {
            Some(offset) if offset <= max => PageWindow::Rows {
                offset,
                limit: query.page_size.min(max),
            },
            _ => PageWindow::PastEnd,
        }
    }
}

// ============================================================================
// SQLite (sea-orm)
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_invoice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub currency: String,
    pub notes: Option<String>,
    /// Line items as a JSON array
    pub lines_json: String,
    /// Lowercased number and customer, see [`search_key`]
    pub search_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Invoice {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id).map_err(|e| StoreError::Corrupt {
            id: m.id.clone(),
            reason: e.to_string(),
        })?;
        let status = InvoiceStatus::parse(&m.status).ok_or_else(|| StoreError::Corrupt {
            id: m.id.clone(),
            reason: format!("unknown status '{}'", m.status),
        })?;
        let line_items: Vec<InvoiceLineItem> = serde_json::from_str(&m.lines_json)?;

        Ok(Invoice {
            id: InvoiceId(uuid),
            tenant_id: m.tenant_id,
            user_id: m.user_id,
            invoice_number: m.invoice_number,
            customer_name: m.customer_name,
            customer_email: m.customer_email,
            issue_date: m.issue_date,
            due_date: m.due_date,
            status,
            currency: m.currency,
            notes: m.notes,
            line_items,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

fn to_active(tenant_id: &str, invoice: &Invoice) -> Result<ActiveModel, StoreError> {
    Ok(ActiveModel {
        id: Set(invoice.to_string_id()),
        tenant_id: Set(tenant_id.to_string()),
        user_id: Set(invoice.user_id.clone()),
        invoice_number: Set(invoice.invoice_number.clone()),
        customer_name: Set(invoice.customer_name.clone()),
        customer_email: Set(invoice.customer_email.clone()),
        issue_date: Set(invoice.issue_date),
        due_date: Set(invoice.due_date),
        status: Set(invoice.status.as_str().to_string()),
        currency: Set(invoice.currency.clone()),
        notes: Set(invoice.notes.clone()),
        lines_json: Set(serde_json::to_string(&invoice.line_items)?),
        search_key: Set(search_key(&invoice.invoice_number, &invoice.customer_name)),
        created_at: Set(invoice.created_at),
        updated_at: Set(invoice.updated_at),
    })
}

pub struct SeaOrmInvoiceStore {
    conn: DatabaseConnection,
}

impl SeaOrmInvoiceStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn scoped(tenant_id: &str) -> Select<Entity> {
        Entity::find().filter(Column::TenantId.eq(tenant_id))
    }
}

#[async_trait]
impl InvoiceStore for SeaOrmInvoiceStore {
    async fn list(
        &self,
        tenant_id: &str,
        query: &InvoiceListQuery,
    ) -> Result<InvoicePage, StoreError> {
        let mut select = Self::scoped(tenant_id);
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(needle) = search_text(query) {
            let pattern = format!("%{}%", escape_like(&needle));
            select = select.filter(Expr::col((Entity, Column::SearchKey)).like(LikeExpr::new(pattern).escape('\\')));
        }

        let total = select.clone().count(&self.conn).await? as usize;

        let order = if query.sort_desc {
            Order::Desc
        } else {
            Order::Asc
        };
        select = select
            .order_by(SortField::parse(&query.sort_by).column(), order)
            .order_by(Column::Id, Order::Asc);
        match PageWindow::of(query) {
            PageWindow::All => {}
            PageWindow::Rows { offset, limit } => {
                select = select.offset(offset as u64).limit(limit as u64);
            }
            PageWindow::PastEnd => {
                return Ok(InvoicePage {
                    items: Vec::new(),
                    total,
                })
            }
        }

        let items = select
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InvoicePage { items, total })
    }

    async fn get(&self, tenant_id: &str, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        Self::scoped(tenant_id)
            .filter(Column::Id.eq(id.as_string()))
            .one(&self.conn)
            .await?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn insert(&self, tenant_id: &str, invoice: &Invoice) -> Result<Invoice, StoreError> {
        let active = to_active(tenant_id, invoice)?;
        let model = active.insert(&self.conn).await?;
        Invoice::try_from(model)
    }

    async fn update(
        &self,
        tenant_id: &str,
        id: &InvoiceId,
        patch: &InvoiceDto,
    ) -> Result<Invoice, StoreError> {
        let mut invoice = self.get(tenant_id, id).await?.ok_or(StoreError::NotFound)?;
        invoice.update(patch);
        invoice.before_write();

        let result = Entity::update_many()
            .set(to_active(tenant_id, &invoice)?)
            .filter(Column::Id.eq(id.as_string()))
            .filter(Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(invoice)
    }

    async fn delete(&self, tenant_id: &str, id: &InvoiceId) -> Result<(), StoreError> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(id.as_string()))
            .filter(Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
