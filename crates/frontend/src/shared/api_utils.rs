//! API utilities for frontend-backend communication
//!
//! URL construction plus the bearer header every protected call carries.

use crate::system::auth::storage;
use contracts::domain::common::ActionResult;
use gloo_net::http::Response;
use serde::de::DeserializeOwned;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/a001/invoices");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// `Authorization` header value, `Err` when nobody is signed in
pub fn auth_header() -> Result<String, String> {
    storage::get_access_token()
        .map(|token| format!("Bearer {}", token))
        .ok_or_else(|| "Не выполнен вход".to_string())
}

/// Appends `key=value` pairs, skipping empty values.
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    let query = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Reads an `ActionResult` body.
///
/// Actions answer 200 for handled failures too, so only transport-level
/// statuses become `Err` here; 401 asks the user to sign in again.
pub async fn read_action<T: DeserializeOwned>(response: Response) -> Result<ActionResult<T>, String> {
    match response.status() {
        401 => return Err("Сессия истекла, войдите снова".to_string()),
        400 => return Err("Некорректный запрос".to_string()),
        s if !(200..300).contains(&s) => return Err(format!("HTTP {}", s)),
        _ => {}
    }
    response
        .json::<ActionResult<T>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_and_skips_empty() {
        let url = with_query(
            "/api/a001/invoices",
            &[
                ("search", "ООО Ромашка & Co".to_string()),
                ("status", String::new()),
                ("sort_by", "issue_date".to_string()),
            ],
        );
        assert_eq!(
            url,
            "/api/a001/invoices?search=%D0%9E%D0%9E%D0%9E%20%D0%A0%D0%BE%D0%BC%D0%B0%D1%88%D0%BA%D0%B0%20%26%20Co&sort_by=issue_date"
        );
        assert_eq!(with_query("/x", &[("a", String::new())]), "/x");
    }
}
