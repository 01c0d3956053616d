use contracts::system::auth::SessionInfo;
use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "auth_access_token";
const SESSION_KEY: &str = "auth_session";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save access token to localStorage
pub fn save_access_token(token: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
    }
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?.get_item(ACCESS_TOKEN_KEY).ok()?
}

pub fn save_session(session: &SessionInfo) {
    if let (Some(storage), Ok(json)) = (get_local_storage(), serde_json::to_string(session)) {
        let _ = storage.set_item(SESSION_KEY, &json);
    }
}

/// Unreadable entries count as "no session"
pub fn get_session() -> Option<SessionInfo> {
    let json = get_local_storage()?.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

/// Clear all authentication data
pub fn clear_tokens() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(SESSION_KEY);
    }
}
