use super::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Result envelope returned by every server action.
///
/// Failures are values, not errors: the caller always receives a body and
/// decides how to present it. `field_errors` is only set for validation
/// failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<ValidationErrors>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field_errors: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            field_errors: None,
        }
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Проверьте правильность заполнения формы".to_string()),
            field_errors: Some(errors),
        }
    }

    /// Converts into a plain `Result`, keeping only the message on failure.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .unwrap_or_else(|| "Неизвестная ошибка".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serializes_without_data() {
        let result: ActionResult<u32> = ActionResult::failure("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_invalid_carries_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("customer_name", "required");
        let result: ActionResult<()> = ActionResult::invalid(errors);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["field_errors"]["customer_name"], "required");
        assert!(result.into_result().is_err());
    }
}
