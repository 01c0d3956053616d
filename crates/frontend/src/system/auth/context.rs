use contracts::system::auth::SessionInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub session: Option<SessionInfo>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.session.is_some()
    }
}

/// Auth context provider component
///
/// Session is restored from localStorage as is; an expired token surfaces as
/// an error on the first API call and the user signs in again.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let restored = match (storage::get_access_token(), storage::get_session()) {
        (Some(token), Some(session)) => AuthState {
            access_token: Some(token),
            session: Some(session),
        },
        _ => AuthState::default(),
    };
    let auth_state = RwSignal::new(restored);
    provide_context(auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> RwSignal<AuthState> {
    use_context::<RwSignal<AuthState>>().expect("AuthProvider not found in component tree")
}

pub async fn do_dev_login(
    auth_state: RwSignal<AuthState>,
    tenant_id: String,
    user_id: String,
) -> Result<(), String> {
    let response = api::dev_token(tenant_id, user_id).await?;

    storage::save_access_token(&response.access_token);
    storage::save_session(&response.session);

    log::info!(
        "Signed in as {} @ {}",
        response.session.user_id,
        response.session.tenant_id
    );
    auth_state.set(AuthState {
        access_token: Some(response.access_token),
        session: Some(response.session),
    });
    Ok(())
}

pub fn do_logout(auth_state: RwSignal<AuthState>) {
    storage::clear_tokens();
    auth_state.set(AuthState::default());
}

/// Вход разработчика: организация + пользователь без пароля.
#[component]
pub fn DevLogin() -> impl IntoView {
    let auth_state = use_auth();
    let tenant_id = RwSignal::new("org_demo".to_string());
    let user_id = RwSignal::new("user_demo".to_string());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let submit = move |_| {
        let tenant = tenant_id.get_untracked().trim().to_string();
        let user = user_id.get_untracked().trim().to_string();
        if tenant.is_empty() || user.is_empty() {
            set_error.set(Some("Укажите организацию и пользователя".to_string()));
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            if let Err(e) = do_dev_login(auth_state, tenant, user).await {
                set_error.set(Some(e));
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <Card attr:style="width: 420px; margin: 64px auto;">
                <h2>"Вход"</h2>
                <div class="form-group">
                    <label for="tenant_id">"Организация"</label>
                    <Input value=tenant_id placeholder="ID организации" attr:id="tenant_id" />
                </div>
                <div class="form-group">
                    <label for="user_id">"Пользователь"</label>
                    <Input value=user_id placeholder="ID пользователя" attr:id="user_id" />
                </div>
                {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=busy
                >
                    {move || if busy.get() { "Вход..." } else { "Войти" }}
                </Button>
            </Card>
        </div>
    }
}
