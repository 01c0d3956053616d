use crate::domain::common::{AggregateId, ValidationErrors};
use crate::shared::grid::GridRow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор счёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub Uuid);

impl InvoiceId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for InvoiceId {
    fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    fn uuid(&self) -> Uuid {
        self.0
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Ожидает оплаты",
            InvoiceStatus::Paid => "Оплачен",
            InvoiceStatus::Overdue => "Просрочен",
            InvoiceStatus::Cancelled => "Отменён",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }

    pub fn all() -> [InvoiceStatus; 4] {
        [
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ]
    }
}

// ============================================================================
// Line items
// ============================================================================

/// Строка счёта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl InvoiceLineItem {
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Счёт, принадлежащий ровно одному тенанту и созданный ровно одним пользователем
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: String,
    pub user_id: String,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub currency: String,
    pub notes: Option<String>,
    pub line_items: Vec<InvoiceLineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Создать новый счёт для вставки в хранилище
    pub fn new_for_insert(
        tenant_id: String,
        user_id: String,
        invoice_number: String,
        dto: &InvoiceDto,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new_v4(),
            tenant_id,
            user_id,
            invoice_number,
            customer_name: dto.customer_name.trim().to_string(),
            customer_email: normalize_optional(&dto.customer_email),
            issue_date: dto.issue_date,
            due_date: dto.due_date,
            status: dto.status,
            currency: dto.currency.trim().to_uppercase(),
            notes: normalize_optional(&dto.notes),
            line_items: dto.line_items.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this invoice as a new record: fresh identity, number and
    /// timestamps, status reset to `Pending`, stamped with `user_id`.
    /// Every other field is carried over unchanged.
    pub fn duplicate_as(&self, user_id: String, invoice_number: String) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new_v4(),
            user_id,
            invoice_number,
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Обновить данные из DTO (идентичность и тенант не меняются)
    pub fn update(&mut self, dto: &InvoiceDto) {
        self.customer_name = dto.customer_name.trim().to_string();
        self.customer_email = normalize_optional(&dto.customer_email);
        self.issue_date = dto.issue_date;
        self.due_date = dto.due_date;
        self.status = dto.status;
        self.currency = dto.currency.trim().to_uppercase();
        self.notes = normalize_optional(&dto.notes);
        self.line_items = dto.line_items.clone();
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn subtotal(&self) -> f64 {
        self.line_items.iter().map(InvoiceLineItem::line_total).sum()
    }

    pub fn total(&self) -> f64 {
        // Налоги и скидки не моделируются
        self.subtotal()
    }

    /// Row in the shape the data grid consumes.
    pub fn to_grid_row(&self) -> GridRow {
        GridRow::new(self.to_string_id())
            .with("invoice_number", self.invoice_number.clone())
            .with("customer_name", self.customer_name.clone())
            .with(
                "customer_email",
                self.customer_email.clone().unwrap_or_default(),
            )
            .with("issue_date", self.issue_date.format("%Y-%m-%d").to_string())
            .with("due_date", self.due_date.format("%Y-%m-%d").to_string())
            .with("status", self.status.as_str())
            .with("currency", self.currency.clone())
            .with("line_count", self.line_items.len() as u64)
            .with("total", self.total())
    }

    pub fn to_dto(&self) -> InvoiceDto {
        InvoiceDto {
            id: Some(self.to_string_id()),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            issue_date: self.issue_date,
            due_date: self.due_date,
            status: self.status,
            currency: self.currency.clone(),
            notes: self.notes.clone(),
            line_items: self.line_items.clone(),
        }
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления счёта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDto {
    pub id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub currency: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<InvoiceLineItem>,
}

impl Default for InvoiceDto {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: None,
            customer_name: String::new(),
            customer_email: None,
            issue_date: today,
            due_date: today + chrono::Duration::days(14),
            status: InvoiceStatus::Pending,
            currency: "RUB".to_string(),
            notes: None,
            line_items: vec![InvoiceLineItem {
                description: String::new(),
                quantity: 1.0,
                unit_price: 0.0,
            }],
        }
    }
}

impl InvoiceDto {
    /// Валидация данных формы, по полям.
    ///
    /// Line-item messages are keyed as `line_items[i].field`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.customer_name.trim().is_empty() {
            errors.add("customer_name", "Укажите покупателя");
        } else if self.customer_name.trim().chars().count() > 200 {
            errors.add("customer_name", "Не более 200 символов");
        }

        if let Some(email) = self.customer_email.as_deref().map(str::trim) {
            if !email.is_empty() && !looks_like_email(email) {
                errors.add("customer_email", "Некорректный email");
            }
        }

        if self.due_date < self.issue_date {
            errors.add("due_date", "Срок оплаты раньше даты выставления");
        }

        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("currency", "Код валюты из трёх латинских букв");
        }

        if self.line_items.is_empty() {
            errors.add("line_items", "Добавьте хотя бы одну строку");
        }
        for (idx, line) in self.line_items.iter().enumerate() {
            if line.description.trim().is_empty() {
                errors.add(
                    format!("line_items[{}].description", idx),
                    "Укажите описание",
                );
            }
            if !line.quantity.is_finite() || line.quantity <= 0.0 {
                errors.add(
                    format!("line_items[{}].quantity", idx),
                    "Количество должно быть больше нуля",
                );
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                errors.add(
                    format!("line_items[{}].unit_price", idx),
                    "Цена не может быть отрицательной",
                );
            }
        }

        errors.into_result()
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> InvoiceDto {
        InvoiceDto {
            id: None,
            customer_name: "ООО \"Ромашка\"".into(),
            customer_email: Some("billing@romashka.ru".into()),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            status: InvoiceStatus::Paid,
            currency: "rub".into(),
            notes: Some("  ".into()),
            line_items: vec![
                InvoiceLineItem {
                    description: "Консультация".into(),
                    quantity: 2.0,
                    unit_price: 1500.0,
                },
                InvoiceLineItem {
                    description: "Выезд".into(),
                    quantity: 1.0,
                    unit_price: 700.0,
                },
            ],
        }
    }

    #[test]
    fn test_valid_dto_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_validation_reports_each_field() {
        let mut dto = valid_dto();
        dto.customer_name = " ".into();
        dto.customer_email = Some("not-an-email".into());
        dto.due_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        dto.currency = "RU".into();
        dto.line_items[1].quantity = 0.0;
        dto.line_items[0].unit_price = -1.0;

        let errors = dto.validate().unwrap_err();
        assert!(errors.get("customer_name").is_some());
        assert!(errors.get("customer_email").is_some());
        assert!(errors.get("due_date").is_some());
        assert!(errors.get("currency").is_some());
        assert!(errors.get("line_items[1].quantity").is_some());
        assert!(errors.get("line_items[0].unit_price").is_some());
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_empty_line_items_rejected() {
        let mut dto = valid_dto();
        dto.line_items.clear();
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("line_items").is_some());
    }

    #[test]
    fn test_new_for_insert_normalizes_fields() {
        let invoice = Invoice::new_for_insert(
            "org_1".into(),
            "user_1".into(),
            "INV-1".into(),
            &valid_dto(),
        );
        assert_eq!(invoice.currency, "RUB");
        assert_eq!(invoice.notes, None);
        assert_eq!(invoice.total(), 3700.0);
        assert_eq!(invoice.tenant_id, "org_1");
    }

    #[test]
    fn test_duplicate_resets_identity_and_status() {
        let original = Invoice::new_for_insert(
            "org_1".into(),
            "user_1".into(),
            "INV-1".into(),
            &valid_dto(),
        );
        let copy = original.duplicate_as("user_2".into(), "INV-2".into());

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.invoice_number, "INV-2");
        assert_eq!(copy.status, InvoiceStatus::Pending);
        assert_eq!(copy.user_id, "user_2");
        assert_eq!(copy.tenant_id, original.tenant_id);
        assert_eq!(copy.customer_name, original.customer_name);
        assert_eq!(copy.line_items, original.line_items);
        assert_eq!(copy.due_date, original.due_date);
    }

    #[test]
    fn test_grid_row_carries_status_and_total() {
        let invoice = Invoice::new_for_insert(
            "org_1".into(),
            "user_1".into(),
            "INV-1".into(),
            &valid_dto(),
        );
        let row = invoice.to_grid_row();
        assert_eq!(row.id, invoice.to_string_id());
        assert_eq!(row.value("status"), Some(&serde_json::json!("paid")));
        assert_eq!(row.value("total"), Some(&serde_json::json!(3700.0)));
    }
}
