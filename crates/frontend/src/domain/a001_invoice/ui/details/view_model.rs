use super::model;
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceDto, InvoiceLineItem};
use contracts::domain::common::ValidationErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Trims text fields, turns blank optional fields into `None` and validates.
///
/// Runs before any request: an invalid form never reaches the server.
pub fn prepare_for_submit(mut dto: InvoiceDto) -> Result<InvoiceDto, ValidationErrors> {
    dto.customer_name = dto.customer_name.trim().to_string();
    dto.currency = dto.currency.trim().to_uppercase();
    dto.customer_email = blank_to_none(dto.customer_email);
    dto.notes = blank_to_none(dto.notes);
    for line in dto.line_items.iter_mut() {
        line.description = line.description.trim().to_string();
    }
    dto.validate()?;
    Ok(dto)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lenient number input: comma as decimal separator, spaces ignored.
/// Unparsable text becomes NaN so validation reports the field.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse().unwrap_or(f64::NAN)
}

/// ViewModel for the invoice form
#[derive(Clone, Copy)]
pub struct InvoiceDetailsViewModel {
    pub form: RwSignal<InvoiceDto>,
    pub field_errors: RwSignal<ValidationErrors>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
}

impl InvoiceDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(InvoiceDto::default()),
            field_errors: RwSignal::new(ValidationErrors::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.field_errors.with(|e| e.get(field).map(str::to_string))
    }

    pub fn total(&self) -> f64 {
        self.form
            .with(|f| f.line_items.iter().map(InvoiceLineItem::line_total).sum())
    }

    /// Load form data from server if ID is provided
    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(existing_id) = id else {
            return;
        };
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match model::fetch_by_id(&existing_id).await {
                Ok(invoice) => vm.form.set(invoice.to_dto()),
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
            vm.loading.set(false);
        });
    }

    pub fn add_line(&self) {
        self.form.update(|f| {
            f.line_items.push(InvoiceLineItem {
                description: String::new(),
                quantity: 1.0,
                unit_price: 0.0,
            })
        });
    }

    pub fn remove_line(&self, index: usize) {
        self.form.update(|f| {
            if index < f.line_items.len() {
                f.line_items.remove(index);
            }
        });
        // indices shifted, old per-line messages no longer apply
        self.field_errors.set(ValidationErrors::new());
    }

    pub fn update_line(&self, index: usize, change: impl FnOnce(&mut InvoiceLineItem)) {
        self.form.update(|f| {
            if let Some(line) = f.line_items.get_mut(index) {
                change(line);
            }
        });
    }

    /// Validate, then create or update on the server
    pub fn save_command(&self, on_saved: Callback<Invoice>) {
        let dto = match prepare_for_submit(self.form.get_untracked()) {
            Ok(dto) => dto,
            Err(errors) => {
                log::debug!("Invoice form invalid: {}", errors);
                self.error
                    .set(Some("Проверьте правильность заполнения формы".to_string()));
                self.field_errors.set(errors);
                return;
            }
        };

        let vm = *self;
        vm.error.set(None);
        vm.field_errors.set(ValidationErrors::new());
        vm.saving.set(true);
        spawn_local(async move {
            match model::save_form(&dto).await {
                Ok(result) if result.success => match result.into_result() {
                    Ok(invoice) => on_saved.run(invoice),
                    Err(e) => vm.error.set(Some(e)),
                },
                Ok(result) => {
                    if let Some(errors) = result.field_errors {
                        vm.field_errors.set(errors);
                    }
                    vm.error.set(
                        result
                            .error
                            .or_else(|| Some("Не удалось сохранить счёт".to_string())),
                    );
                }
                Err(e) => vm.error.set(Some(e)),
            }
            vm.saving.set(false);
        });
    }
}

impl Default for InvoiceDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> InvoiceDto {
        InvoiceDto {
            customer_name: "  Acme  ".to_string(),
            customer_email: Some("   ".to_string()),
            currency: " rub ".to_string(),
            notes: Some(" paid by card ".to_string()),
            line_items: vec![InvoiceLineItem {
                description: " Консультация ".to_string(),
                quantity: 2.0,
                unit_price: 1500.0,
            }],
            ..InvoiceDto::default()
        }
    }

    #[test]
    fn test_prepare_normalizes_fields() {
        let dto = prepare_for_submit(valid_dto()).unwrap();
        assert_eq!(dto.customer_name, "Acme");
        assert_eq!(dto.currency, "RUB");
        assert_eq!(dto.customer_email, None);
        assert_eq!(dto.notes.as_deref(), Some("paid by card"));
        assert_eq!(dto.line_items[0].description, "Консультация");
    }

    #[test]
    fn test_prepare_reports_field_errors() {
        let mut dto = valid_dto();
        dto.customer_name = "   ".to_string();
        dto.line_items[0].quantity = parse_number("abc");

        let errors = prepare_for_submit(dto).unwrap_err();
        assert_eq!(errors.get("customer_name"), Some("Укажите покупателя"));
        assert!(errors.get("line_items[0].quantity").is_some());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parse_number_is_lenient() {
        assert_eq!(parse_number("1 500,50"), 1500.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("12"), 12.0);
        assert!(parse_number("1,2,3").is_nan());
    }
}
