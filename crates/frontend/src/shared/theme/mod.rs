//! Theme management module for the application.
//!
//! Dark, light and forest themes. The choice is persisted in localStorage;
//! each theme maps to [`DesignTokens`], which the data grid turns into its
//! own CSS variables.

use contracts::shared::grid::{bridge, DesignTokens};
use leptos::prelude::*;
use thaw::*;
use web_sys::window;

/// Available themes in the application.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Forest,
}

impl Theme {
    /// Returns the theme name as a string (used for data-theme and localStorage).
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Forest => "forest",
        }
    }

    /// Returns the display name for the UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Dark => "Тёмная",
            Theme::Light => "Светлая",
            Theme::Forest => "Лесная",
        }
    }

    /// Unknown names fall back to the default theme.
    pub fn parse(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "forest" => Theme::Forest,
            _ => Theme::Dark,
        }
    }

    pub fn all() -> [Theme; 3] {
        [Theme::Dark, Theme::Light, Theme::Forest]
    }

    pub fn tokens(&self) -> DesignTokens {
        match self {
            Theme::Dark => DesignTokens::dark(),
            Theme::Light => DesignTokens::light(),
            Theme::Forest => DesignTokens::forest(),
        }
    }

    /// Page-level variables; the grid gets its own set from [`bridge`].
    pub fn page_style(&self) -> String {
        let t = self.tokens();
        format!(
            "--color-background: {}; --color-text: {}; --color-primary: {}; --color-border: {}; \
             --color-surface: {}; --font-family: {}; --font-size: {}px; \
             background: var(--color-background); color: var(--color-text); \
             font-family: var(--font-family); font-size: var(--font-size);",
            t.background,
            t.foreground,
            t.accent,
            t.border,
            t.muted_background,
            t.font_family,
            t.font_size_px
        )
    }

    /// `style` attribute value for the grid container.
    pub fn grid_style(&self) -> String {
        bridge(&self.tokens()).to_style()
    }
}

const THEME_STORAGE_KEY: &str = "app-theme";

fn load_theme_from_storage() -> Theme {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten())
        .map(|s| Theme::parse(&s))
        .unwrap_or_default()
}

fn save_theme_to_storage(theme: Theme) {
    if let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(THEME_STORAGE_KEY, theme.as_str());
    }
}

/// Sets `data-theme` and the page variables on `<body>`.
fn apply_theme(theme: Theme) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let _ = body.set_attribute("data-theme", theme.as_str());
    let _ = body.set_attribute("style", &theme.page_style());
}

/// Theme context type.
#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
}

impl ThemeContext {
    /// Set the theme and persist to storage.
    pub fn set_theme(&self, theme: Theme) {
        self.theme.set(theme);
        save_theme_to_storage(theme);
        apply_theme(theme);
    }
}

/// Provides theme context to children components.
#[component]
pub fn ThemeProvider(children: Children) -> impl IntoView {
    let initial_theme = load_theme_from_storage();
    apply_theme(initial_theme);

    provide_context(ThemeContext {
        theme: RwSignal::new(initial_theme),
    });

    children()
}

/// Hook to use the theme context.
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>()
        .expect("ThemeContext not found. Wrap your app with ThemeProvider.")
}

/// Theme selector dropdown component.
#[component]
pub fn ThemeSelector() -> impl IntoView {
    let ctx = use_theme();
    let selected = RwSignal::new(ctx.theme.get_untracked().as_str().to_string());

    Effect::new(move |_| {
        let theme = Theme::parse(&selected.get());
        if theme != ctx.theme.get_untracked() {
            ctx.set_theme(theme);
        }
    });

    view! {
        <div class="theme-selector" title="Выбор темы">
            <Select value=selected size=SelectSize::Small>
                {Theme::all()
                    .into_iter()
                    .map(|theme| view! { <option value=theme.as_str()>{theme.display_name()}</option> })
                    .collect_view()}
            </Select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_falls_back_to_dark() {
        for theme in Theme::all() {
            assert_eq!(Theme::parse(theme.as_str()), theme);
        }
        assert_eq!(Theme::parse("solarized"), Theme::Dark);
    }

    #[test]
    fn test_grid_style_follows_theme_tokens() {
        let light = Theme::Light.grid_style();
        let dark = Theme::Dark.grid_style();
        assert_ne!(light, dark);
        assert!(light.contains(&DesignTokens::light().background));
    }
}
