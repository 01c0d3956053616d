//! Bridge from application design tokens to the grid's CSS variables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokens {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub border: String,
    pub muted_background: String,
    pub spacing_px: u32,
    pub radius_px: u32,
    pub font_family: String,
    pub font_size_px: u32,
}

impl DesignTokens {
    pub fn dark() -> Self {
        Self {
            background: "#1e1f22".into(),
            foreground: "#e6e6e6".into(),
            accent: "#4c8dff".into(),
            border: "#3a3c42".into(),
            muted_background: "#26282c".into(),
            spacing_px: 8,
            radius_px: 6,
            font_family: "Inter, system-ui, sans-serif".into(),
            font_size_px: 14,
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".into(),
            foreground: "#1f2328".into(),
            accent: "#0969da".into(),
            border: "#d0d7de".into(),
            muted_background: "#f6f8fa".into(),
            spacing_px: 8,
            radius_px: 6,
            font_family: "Inter, system-ui, sans-serif".into(),
            font_size_px: 14,
        }
    }

    pub fn forest() -> Self {
        Self {
            background: "#17201b".into(),
            foreground: "#dfe9e1".into(),
            accent: "#5fb37a".into(),
            border: "#2e3d33".into(),
            muted_background: "#1d2a22".into(),
            spacing_px: 8,
            radius_px: 4,
            font_family: "Inter, system-ui, sans-serif".into(),
            font_size_px: 14,
        }
    }
}

/// CSS custom properties in the grid namespace, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridThemeVariables(pub Vec<(&'static str, String)>);

impl GridThemeVariables {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `--grid-x: v; --grid-y: w;` for an inline `style` attribute.
    pub fn to_style(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn bridge(tokens: &DesignTokens) -> GridThemeVariables {
    GridThemeVariables(vec![
        ("--grid-background-color", tokens.background.clone()),
        ("--grid-foreground-color", tokens.foreground.clone()),
        ("--grid-accent-color", tokens.accent.clone()),
        ("--grid-border-color", tokens.border.clone()),
        ("--grid-header-background-color", tokens.muted_background.clone()),
        ("--grid-odd-row-background-color", tokens.muted_background.clone()),
        (
            "--grid-row-hover-color",
            format!("color-mix(in srgb, {} 12%, transparent)", tokens.accent),
        ),
        (
            "--grid-selected-row-background-color",
            format!("color-mix(in srgb, {} 22%, transparent)", tokens.accent),
        ),
        ("--grid-spacing", format!("{}px", tokens.spacing_px)),
        ("--grid-cell-horizontal-padding", format!("{}px", tokens.spacing_px * 2)),
        ("--grid-border-radius", format!("{}px", tokens.radius_px)),
        ("--grid-font-family", tokens.font_family.clone()),
        ("--grid-font-size", format!("{}px", tokens.font_size_px)),
    ])
}
