//! Корень приложения: тема, авторизация и страница счетов.

use crate::domain::a001_invoice::ui::list::InvoiceList;
use crate::shared::icons::icon;
use crate::shared::theme::{ThemeProvider, ThemeSelector};
use crate::system::auth::context::do_logout;
use crate::system::auth::{use_auth, AuthProvider, DevLogin};
use leptos::prelude::*;
use thaw::*;

/// Шапка: название, выбор темы, текущая сессия и выход.
#[component]
fn AppHeader() -> impl IntoView {
    let auth_state = use_auth();

    let session_label = move || {
        auth_state.with(|state| {
            state
                .session
                .as_ref()
                .map(|s| format!("{} @ {}", s.user_id, s.tenant_id))
                .unwrap_or_default()
        })
    };

    view! {
        <header class="app-header">
            <div class="app-header__brand">"Счета"</div>
            <div class="app-header__actions">
                <ThemeSelector />
                <Show when=move || auth_state.with(|s| s.is_authenticated())>
                    <span class="app-header__session">{session_label}</span>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| do_logout(auth_state)
                    >
                        {icon("log-out")}
                        "Выйти"
                    </Button>
                </Show>
            </div>
        </header>
    }
}

/// Auth gate: форма входа или список счетов организации.
#[component]
fn AppBody() -> impl IntoView {
    let auth_state = use_auth();

    view! {
        <main class="app-main">
            <Show
                when=move || auth_state.with(|s| s.is_authenticated())
                fallback=|| view! { <DevLogin /> }
            >
                <InvoiceList />
            </Show>
        </main>
    }
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ThemeProvider>
            <AuthProvider>
                <AppHeader />
                <AppBody />
            </AuthProvider>
        </ThemeProvider>
    }
}
