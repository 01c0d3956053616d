use crate::shared::api_utils::{api_url, auth_header, read_action};
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceDto};
use contracts::domain::common::ActionResult;
use gloo_net::http::Request;

pub async fn fetch_by_id(id: &str) -> Result<Invoice, String> {
    let response = Request::get(&api_url(&format!("/api/a001/invoices/{}", id)))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    read_action::<Invoice>(response).await?.into_result()
}

/// Create when `dto.id` is empty, update otherwise.
///
/// The whole `ActionResult` is returned so the form can show field errors.
pub async fn save_form(dto: &InvoiceDto) -> Result<ActionResult<Invoice>, String> {
    let auth = auth_header()?;
    let request = match dto.id.as_deref() {
        Some(id) => Request::put(&api_url(&format!("/api/a001/invoices/{}", id))),
        None => Request::post(&api_url("/api/a001/invoices")),
    };
    let response = request
        .header("Authorization", &auth)
        .json(dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    read_action::<Invoice>(response).await
}
