use contracts::system::auth::{DevTokenRequest, DevTokenResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Issue a token for `tenant_id`/`user_id` (dev mode only on the server)
pub async fn dev_token(tenant_id: String, user_id: String) -> Result<DevTokenResponse, String> {
    let request = DevTokenRequest { tenant_id, user_id };

    let response = Request::post(&api_url("/api/system/auth/dev-token"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    match response.status() {
        404 => return Err("Dev-вход отключён на сервере".to_string()),
        s if !(200..300).contains(&s) => return Err(format!("Login failed: {}", s)),
        _ => {}
    }

    response
        .json::<DevTokenResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
