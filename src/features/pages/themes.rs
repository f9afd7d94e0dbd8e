//! Built-in storefront themes.
//!
//! A theme is a set of CSS variable overrides plus a style preset. Applying a
//! theme merges its overrides over [`DEFAULT_VARIABLES`], so every applied
//! map carries the full variable set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ButtonShape {
    Rounded,
    Pill,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StylePreset {
    pub button_shape: ButtonShape,
    pub show_borders: bool,
}

impl Default for StylePreset {
    fn default() -> Self {
        Self {
            button_shape: ButtonShape::Rounded,
            show_borders: true,
        }
    }
}

#[derive(Debug)]
pub struct ThemeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub variables: &'static [(&'static str, &'static str)],
    pub preset: StylePreset,
}

pub const DEFAULT_VARIABLES: &[(&str, &str)] = &[
    ("--color-primary", "#2481cc"),
    ("--color-primary-text", "#ffffff"),
    ("--color-background", "#ffffff"),
    ("--color-surface", "#f4f4f5"),
    ("--color-text", "#1c1c1e"),
    ("--color-muted", "#8e8e93"),
    ("--color-accent", "#ff9500"),
    ("--color-border", "#e5e5ea"),
    ("--radius", "12px"),
    ("--font-family", "system-ui, -apple-system, sans-serif"),
];

pub const THEMES: &[ThemeTemplate] = &[
    ThemeTemplate {
        id: "classic",
        name: "Classic",
        variables: &[],
        preset: StylePreset {
            button_shape: ButtonShape::Rounded,
            show_borders: true,
        },
    },
    ThemeTemplate {
        id: "dark",
        name: "Dark",
        variables: &[
            ("--color-primary", "#5ea8ff"),
            ("--color-primary-text", "#0b0b0f"),
            ("--color-background", "#0b0b0f"),
            ("--color-surface", "#1c1c22"),
            ("--color-text", "#f2f2f7"),
            ("--color-muted", "#8e8e93"),
            ("--color-border", "#2c2c34"),
        ],
        preset: StylePreset {
            button_shape: ButtonShape::Rounded,
            show_borders: false,
        },
    },
    ThemeTemplate {
        id: "ocean",
        name: "Ocean",
        variables: &[
            ("--color-primary", "#0077b6"),
            ("--color-background", "#f0f8ff"),
            ("--color-surface", "#caf0f8"),
            ("--color-text", "#03045e"),
            ("--color-accent", "#00b4d8"),
            ("--color-border", "#90e0ef"),
        ],
        preset: StylePreset {
            button_shape: ButtonShape::Pill,
            show_borders: true,
        },
    },
    ThemeTemplate {
        id: "sunset",
        name: "Sunset",
        variables: &[
            ("--color-primary", "#e76f51"),
            ("--color-background", "#fff8f0"),
            ("--color-surface", "#ffe8d6"),
            ("--color-text", "#3d2c29"),
            ("--color-accent", "#f4a261"),
            ("--color-border", "#f6c9a8"),
            ("--radius", "16px"),
        ],
        preset: StylePreset {
            button_shape: ButtonShape::Pill,
            show_borders: false,
        },
    },
    ThemeTemplate {
        id: "forest",
        name: "Forest",
        variables: &[
            ("--color-primary", "#2d6a4f"),
            ("--color-background", "#f6fbf4"),
            ("--color-surface", "#d8f3dc"),
            ("--color-text", "#1b4332"),
            ("--color-accent", "#95d5b2"),
            ("--color-border", "#b7e4c7"),
            ("--radius", "8px"),
        ],
        preset: StylePreset {
            button_shape: ButtonShape::Rounded,
            show_borders: true,
        },
    },
    ThemeTemplate {
        id: "minimal",
        name: "Minimal",
        variables: &[
            ("--color-primary", "#111111"),
            ("--color-surface", "#ffffff"),
            ("--color-accent", "#111111"),
            ("--color-border", "#dddddd"),
            ("--radius", "0px"),
        ],
        preset: StylePreset {
            button_shape: ButtonShape::Square,
            show_borders: true,
        },
    },
];

pub fn find(id: &str) -> Option<&'static ThemeTemplate> {
    THEMES.iter().find(|t| t.id == id)
}

pub fn default_variables() -> BTreeMap<String, String> {
    DEFAULT_VARIABLES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Template overrides merged over the defaults
pub fn merged_variables(theme: &ThemeTemplate) -> BTreeMap<String, String> {
    let mut variables = default_variables();
    for (k, v) in theme.variables {
        variables.insert(k.to_string(), v.to_string());
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids() {
        let ids: Vec<&str> = THEMES.iter().map(|t| t.id).collect();
        assert_eq!(ids, ["classic", "dark", "ocean", "sunset", "forest", "minimal"]);

        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_applying_twice_is_identical() {
        let theme = find("ocean").unwrap();
        assert_eq!(merged_variables(theme), merged_variables(theme));
    }

    #[test]
    fn test_merge_keeps_every_default_key() {
        for theme in THEMES {
            let merged = merged_variables(theme);
            for (key, _) in DEFAULT_VARIABLES {
                assert!(merged.contains_key(*key), "{} lacks {}", theme.id, key);
            }
            assert_eq!(merged.len(), DEFAULT_VARIABLES.len(), "{} adds unknown keys", theme.id);
        }
    }

    #[test]
    fn test_override_wins() {
        let dark = merged_variables(find("dark").unwrap());
        assert_eq!(dark["--color-background"], "#0b0b0f");
        assert_eq!(dark["--radius"], "12px");
    }

    #[test]
    fn test_classic_is_defaults() {
        assert_eq!(merged_variables(find("classic").unwrap()), default_variables());
    }

    #[test]
    fn test_unknown_theme() {
        assert!(find("neon").is_none());
    }

    #[test]
    fn test_preset_serialization() {
        let json = serde_json::to_value(find("minimal").unwrap().preset).unwrap();
        assert_eq!(json, serde_json::json!({"button_shape": "square", "show_borders": true}));
    }
}
