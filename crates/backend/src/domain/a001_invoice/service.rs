//! Invoice server actions.
//!
//! Every action takes the caller's session explicitly, validates its input
//! before touching storage, makes one tenant-scoped store call and, after a
//! successful write, invalidates the invoice list page. Failures come back as
//! `ActionResult::failure`; nothing is retried.

use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceDto, InvoiceId};
use contracts::domain::a001_invoice::api::{
    InvoiceListQuery, InvoiceListResponse, INVOICES_PAGE_KEY,
};
use contracts::domain::common::{ActionResult, AggregateId};
use contracts::system::auth::SessionInfo;

use super::number::generate_invoice_number;
use super::repository::{InvoiceStore, StoreError};
use crate::shared::cache::CacheInvalidator;

const MSG_NO_SESSION: &str = "Сессия не найдена, войдите заново";
const MSG_NOT_FOUND: &str = "Счёт не найден";
const MSG_STORAGE: &str = "Не удалось выполнить операцию, попробуйте позже";

fn check_session(session: &SessionInfo) -> Result<(), String> {
    if session.tenant_id.trim().is_empty() || session.user_id.trim().is_empty() {
        return Err(MSG_NO_SESSION.to_string());
    }
    Ok(())
}

fn store_failure<T>(action: &str, session: &SessionInfo, err: StoreError) -> ActionResult<T> {
    match err {
        StoreError::NotFound => ActionResult::failure(MSG_NOT_FOUND),
        other => {
            tracing::error!(
                "a001_invoice {} failed for tenant {}: {}",
                action,
                session.tenant_id,
                other
            );
            ActionResult::failure(MSG_STORAGE)
        }
    }
}

/// Список счетов тенанта
pub async fn list(
    store: &dyn InvoiceStore,
    session: &SessionInfo,
    query: InvoiceListQuery,
) -> ActionResult<InvoiceListResponse> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }

    match store.list(&session.tenant_id, &query).await {
        Ok(page) => {
            let total_pages = if query.page_size == 0 {
                usize::from(page.total > 0)
            } else {
                page.total.div_ceil(query.page_size)
            };
            ActionResult::ok(InvoiceListResponse {
                items: page.items,
                total: page.total,
                page: query.page,
                page_size: query.page_size,
                total_pages,
            })
        }
        Err(e) => store_failure("list", session, e),
    }
}

pub async fn get(
    store: &dyn InvoiceStore,
    session: &SessionInfo,
    id: InvoiceId,
) -> ActionResult<Invoice> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }

    match store.get(&session.tenant_id, &id).await {
        Ok(Some(invoice)) => ActionResult::ok(invoice),
        Ok(None) => ActionResult::failure(MSG_NOT_FOUND),
        Err(e) => store_failure("get", session, e),
    }
}

/// Создание нового счёта
pub async fn create(
    store: &dyn InvoiceStore,
    cache: &dyn CacheInvalidator,
    session: &SessionInfo,
    dto: InvoiceDto,
) -> ActionResult<Invoice> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }
    if let Err(errors) = dto.validate() {
        return ActionResult::invalid(errors);
    }

    let mut invoice = Invoice::new_for_insert(
        session.tenant_id.clone(),
        session.user_id.clone(),
        generate_invoice_number(),
        &dto,
    );
    invoice.before_write();

    match store.insert(&session.tenant_id, &invoice).await {
        Ok(stored) => {
            tracing::info!(
                "Invoice {} created for tenant {}",
                stored.invoice_number,
                session.tenant_id
            );
            cache.invalidate(&session.tenant_id, INVOICES_PAGE_KEY);
            ActionResult::ok(stored)
        }
        Err(e) => store_failure("create", session, e),
    }
}

/// Обновление счёта; номер, тенант и автор не меняются
pub async fn update(
    store: &dyn InvoiceStore,
    cache: &dyn CacheInvalidator,
    session: &SessionInfo,
    id: InvoiceId,
    dto: InvoiceDto,
) -> ActionResult<Invoice> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }
    if let Err(errors) = dto.validate() {
        return ActionResult::invalid(errors);
    }

    match store.update(&session.tenant_id, &id, &dto).await {
        Ok(invoice) => {
            cache.invalidate(&session.tenant_id, INVOICES_PAGE_KEY);
            ActionResult::ok(invoice)
        }
        Err(e) => store_failure("update", session, e),
    }
}

/// Удаление счёта (физическое). Returns the deleted id.
pub async fn delete(
    store: &dyn InvoiceStore,
    cache: &dyn CacheInvalidator,
    session: &SessionInfo,
    id: InvoiceId,
) -> ActionResult<String> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }

    match store.delete(&session.tenant_id, &id).await {
        Ok(()) => {
            tracing::info!("Invoice {} deleted for tenant {}", id.as_string(), session.tenant_id);
            cache.invalidate(&session.tenant_id, INVOICES_PAGE_KEY);
            ActionResult::ok(id.as_string())
        }
        Err(e) => store_failure("delete", session, e),
    }
}

/// Копия счёта с новым номером и статусом `pending`; автором становится текущий пользователь
pub async fn duplicate(
    store: &dyn InvoiceStore,
    cache: &dyn CacheInvalidator,
    session: &SessionInfo,
    id: InvoiceId,
) -> ActionResult<Invoice> {
    if let Err(msg) = check_session(session) {
        return ActionResult::failure(msg);
    }

    let original = match store.get(&session.tenant_id, &id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => return ActionResult::failure(MSG_NOT_FOUND),
        Err(e) => return store_failure("duplicate", session, e),
    };

    let copy = original.duplicate_as(session.user_id.clone(), generate_invoice_number());
    match store.insert(&session.tenant_id, &copy).await {
        Ok(stored) => {
            tracing::info!(
                "Invoice {} duplicated as {}",
                original.invoice_number,
                stored.invoice_number
            );
            cache.invalidate(&session.tenant_id, INVOICES_PAGE_KEY);
            ActionResult::ok(stored)
        }
        Err(e) => store_failure("duplicate", session, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_invoice::memory::MemoryInvoiceStore;
    use crate::shared::cache::RevisionRegistry;
    use chrono::NaiveDate;
    use contracts::domain::a001_invoice::aggregate::{InvoiceLineItem, InvoiceStatus};

    fn session(tenant: &str, user: &str) -> SessionInfo {
        SessionInfo {
            tenant_id: tenant.into(),
            user_id: user.into(),
        }
    }

    fn dto() -> InvoiceDto {
        InvoiceDto {
            id: None,
            customer_name: "ООО Ромашка".into(),
            customer_email: Some("billing@romashka.ru".into()),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            status: InvoiceStatus::Paid,
            currency: "rub".into(),
            notes: Some("Оплата по договору 12".into()),
            line_items: vec![
                InvoiceLineItem {
                    description: "Разработка".into(),
                    quantity: 10.0,
                    unit_price: 2500.0,
                },
                InvoiceLineItem {
                    description: "Хостинг".into(),
                    quantity: 1.0,
                    unit_price: 990.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_create_then_duplicate() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let alice = session("tenant-a", "alice");
        let bob = session("tenant-a", "bob");

        let original = create(&store, &cache, &alice, dto()).await.into_result().unwrap();
        let copy = duplicate(&store, &cache, &bob, original.id)
            .await
            .into_result()
            .unwrap();

        assert_ne!(copy.id, original.id);
        assert_ne!(copy.invoice_number, original.invoice_number);
        assert_eq!(copy.status, InvoiceStatus::Pending);
        assert_eq!(copy.user_id, "bob");
        assert_eq!(copy.tenant_id, original.tenant_id);
        assert_eq!(copy.customer_name, original.customer_name);
        assert_eq!(copy.customer_email, original.customer_email);
        assert_eq!(copy.issue_date, original.issue_date);
        assert_eq!(copy.due_date, original.due_date);
        assert_eq!(copy.currency, "RUB");
        assert_eq!(copy.notes, original.notes);
        assert_eq!(copy.line_items, original.line_items);

        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 2);
        let listed = list(&store, &alice, InvoiceListQuery::default())
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.total_pages, 1);
    }

    #[tokio::test]
    async fn test_validation_blocks_store_call() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let mut bad = dto();
        bad.customer_name = "  ".into();
        bad.line_items.clear();

        let result = create(&store, &cache, &session("tenant-a", "alice"), bad).await;
        assert!(!result.success);
        let errors = result.field_errors.unwrap();
        assert!(errors.get("customer_name").is_some());
        assert!(errors.get("line_items").is_some());
        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 0);

        let listed = list(&store, &session("tenant-a", "alice"), InvoiceListQuery::default())
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed.total, 0);
    }

    #[tokio::test]
    async fn test_tenants_are_isolated() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let a = session("tenant-a", "alice");
        let b = session("tenant-b", "mallory");

        let invoice = create(&store, &cache, &a, dto()).await.into_result().unwrap();

        assert_eq!(
            get(&store, &b, invoice.id).await.error.as_deref(),
            Some(MSG_NOT_FOUND)
        );
        assert!(!update(&store, &cache, &b, invoice.id, dto()).await.success);
        assert!(!delete(&store, &cache, &b, invoice.id).await.success);
        assert!(!duplicate(&store, &cache, &b, invoice.id).await.success);
        let listed = list(&store, &b, InvoiceListQuery::default())
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed.total, 0);
        assert_eq!(listed.total_pages, 0);

        assert!(get(&store, &a, invoice.id).await.success);
        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 1);
    }

    #[tokio::test]
    async fn test_write_bumps_only_own_tenant_revision() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let a = session("tenant-a", "alice");
        let b = session("tenant-b", "mallory");

        create(&store, &cache, &a, dto()).await.into_result().unwrap();
        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 1);
        assert_eq!(cache.revision("tenant-b", INVOICES_PAGE_KEY), 0);

        create(&store, &cache, &b, dto()).await.into_result().unwrap();
        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 1);
        assert_eq!(cache.revision("tenant-b", INVOICES_PAGE_KEY), 1);
    }

    #[tokio::test]
    async fn test_list_far_page_is_empty() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let a = session("tenant-a", "alice");
        create(&store, &cache, &a, dto()).await.into_result().unwrap();

        let query = InvoiceListQuery {
            page: usize::MAX / 2,
            page_size: 3,
            ..InvoiceListQuery::default()
        };
        let page = list(&store, &a, query).await.into_result().unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let a = session("tenant-a", "alice");
        let invoice = create(&store, &cache, &a, dto()).await.into_result().unwrap();

        let mut changed = invoice.to_dto();
        changed.status = InvoiceStatus::Cancelled;
        changed.customer_name = "ООО Лютик".into();
        let updated = update(&store, &cache, &a, invoice.id, changed)
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.status, InvoiceStatus::Cancelled);
        assert_eq!(updated.invoice_number, invoice.invoice_number);
        assert_eq!(updated.user_id, "alice");

        let deleted = delete(&store, &cache, &a, invoice.id).await.into_result().unwrap();
        assert_eq!(deleted, invoice.id.as_string());
        assert_eq!(
            get(&store, &a, invoice.id).await.error.as_deref(),
            Some(MSG_NOT_FOUND)
        );
        assert_eq!(cache.revision("tenant-a", INVOICES_PAGE_KEY), 3);
    }

    #[tokio::test]
    async fn test_missing_session_fails() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let result = create(&store, &cache, &session("", "alice"), dto()).await;
        assert_eq!(result.error.as_deref(), Some(MSG_NO_SESSION));
        assert!(result.field_errors.is_none());
    }

    #[tokio::test]
    async fn test_list_total_pages() {
        let store = MemoryInvoiceStore::new();
        let cache = RevisionRegistry::new();
        let a = session("tenant-a", "alice");
        for _ in 0..5 {
            create(&store, &cache, &a, dto()).await.into_result().unwrap();
        }
        let query = InvoiceListQuery {
            page: 2,
            page_size: 2,
            ..InvoiceListQuery::default()
        };
        let page = list(&store, &a, query).await.into_result().unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);
    }
}
