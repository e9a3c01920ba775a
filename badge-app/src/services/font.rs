//! Custom font discovery for synthesized badge numbers.

use std::path::{Path, PathBuf};

const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Invalid font format (only TTF/OTF supported)")]
    InvalidFormat,
    #[error("No custom font configured")]
    NoCustomFont,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Locates the font used for numbers that have no overlay asset.
#[derive(Clone)]
pub struct FontService {
    fonts_dir: PathBuf,
    explicit: Option<PathBuf>,
}

impl FontService {
    pub fn new(fonts_dir: PathBuf, explicit: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            explicit,
        }
    }

    /// The explicit font if configured, else the first TTF/OTF in the fonts directory.
    pub fn find_current_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit {
            return Some(path.clone());
        }
        let entries = std::fs::read_dir(&self.fonts_dir).ok()?;
        let mut fonts: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_font_extension(p))
            .collect();
        fonts.sort();
        fonts.into_iter().next()
    }

    pub fn get_font_data(&self) -> Result<Vec<u8>, FontError> {
        let path = self.find_current_font().ok_or(FontError::NoCustomFont)?;
        if !has_font_extension(&path) {
            return Err(FontError::InvalidFormat);
        }
        Ok(std::fs::read(path)?)
    }

    /// Font bytes if a usable font file exists; `None` means "use the built-in digits".
    pub fn load_optional(&self) -> Option<Vec<u8>> {
        match self.get_font_data() {
            Ok(data) => Some(data),
            Err(FontError::NoCustomFont) => {
                tracing::debug!("No custom font, using built-in bitmap digits");
                None
            }
            Err(e) => {
                tracing::warn!("Custom font unavailable: {e}");
                None
            }
        }
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}
