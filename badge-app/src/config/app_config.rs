//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

use badge_compositor::BackgroundStyle;
use image::Rgba;

use super::validation::{parse_hex_color, validate_setting};

/// How the tinted band is filled when a badge asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKind {
    Flat,
    Gradient,
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub overlay_dir: PathBuf,
    pub output_dir: PathBuf,
    pub fonts_dir: PathBuf,
    /// Explicit font file; when unset the first font in `fonts_dir` is used.
    pub font_path: Option<PathBuf>,
    pub tint_color: [u8; 3],
    pub tint_alpha: u8,
    pub background_kind: BackgroundKind,
    pub gradient_end: [u8; 3],
}

impl AppConfig {
    /// Configuration with every setting at its default.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            overlay_dir: data_dir.join("overlays"),
            output_dir: data_dir.join("output"),
            fonts_dir: data_dir.join("fonts"),
            data_dir,
            font_path: None,
            tint_color: [0, 0, 0],
            tint_alpha: 128,
            background_kind: BackgroundKind::Flat,
            gradient_end: [255, 255, 255],
        }
    }

    /// Load configuration from process environment variables.
    pub fn load(data_dir: PathBuf) -> Self {
        Self::load_with(data_dir, |key| std::env::var(key).ok())
    }

    /// Load configuration through a key lookup.
    ///
    /// Values that fail validation are logged and replaced by the default.
    pub fn load_with(data_dir: PathBuf, get: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            let value = get(key)?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    tracing::warn!(key, value = %value, "Ignoring invalid setting: {e}");
                    None
                }
            }
        };

        let mut config = Self::with_data_dir(data_dir);

        if let Some(v) = g("BADGE_OVERLAY_DIR") {
            config.overlay_dir = PathBuf::from(v);
        }
        if let Some(v) = g("BADGE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(v);
        }
        config.font_path = g("BADGE_FONT_PATH").map(PathBuf::from);
        if let Some(c) = g("BADGE_TINT_COLOR").as_deref().and_then(parse_hex_color) {
            config.tint_color = c;
        }
        if let Some(a) = g("BADGE_TINT_ALPHA").and_then(|v| v.parse().ok()) {
            config.tint_alpha = a;
        }
        if let Some(v) = g("BADGE_BACKGROUND_STYLE") {
            config.background_kind = if v == "gradient" {
                BackgroundKind::Gradient
            } else {
                BackgroundKind::Flat
            };
        }
        if let Some(c) = g("BADGE_GRADIENT_END").as_deref().and_then(parse_hex_color) {
            config.gradient_end = c;
        }

        config
    }

    /// Band style for the given kind, using the configured colors.
    pub fn background_style(&self, kind: BackgroundKind) -> BackgroundStyle {
        let [r, g, b] = self.tint_color;
        let start = Rgba([r, g, b, self.tint_alpha]);
        match kind {
            BackgroundKind::Flat => BackgroundStyle::Flat(start),
            BackgroundKind::Gradient => {
                let [r, g, b] = self.gradient_end;
                BackgroundStyle::Gradient {
                    start,
                    end: Rgba([r, g, b, self.tint_alpha]),
                    opacity: 1.0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load_with(PathBuf::from("/data"), |k| env.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.overlay_dir, PathBuf::from("/data/overlays"));
        assert_eq!(config.output_dir, PathBuf::from("/data/output"));
        assert_eq!(config.font_path, None);
        assert_eq!(config.tint_alpha, 128);
        assert_eq!(config.background_kind, BackgroundKind::Flat);
        assert_eq!(
            config.background_style(config.background_kind),
            BackgroundStyle::Flat(Rgba([0, 0, 0, 128]))
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BADGE_OVERLAY_DIR", "/srv/overlays"),
            ("BADGE_TINT_COLOR", "#102030"),
            ("BADGE_TINT_ALPHA", "200"),
            ("BADGE_BACKGROUND_STYLE", "gradient"),
            ("BADGE_GRADIENT_END", "ff0000"),
            ("BADGE_FONT_PATH", "/fonts/Inter.ttf"),
        ]);
        assert_eq!(config.overlay_dir, PathBuf::from("/srv/overlays"));
        assert_eq!(config.font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
        assert_eq!(config.background_kind, BackgroundKind::Gradient);
        assert_eq!(
            config.background_style(BackgroundKind::Gradient),
            BackgroundStyle::Gradient {
                start: Rgba([16, 32, 48, 200]),
                end: Rgba([255, 0, 0, 200]),
                opacity: 1.0,
            }
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = load(&[
            ("BADGE_TINT_COLOR", "blue"),
            ("BADGE_TINT_ALPHA", "999"),
            ("BADGE_BACKGROUND_STYLE", "radial"),
        ]);
        assert_eq!(config.tint_color, [0, 0, 0]);
        assert_eq!(config.tint_alpha, 128);
        assert_eq!(config.background_kind, BackgroundKind::Flat);
    }
}
