pub mod config;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use badge_compositor::{
    CompositeRequest, Compositor, DirectoryStore, OverlayResolver, renderer_from_font_bytes,
};
use serde::Serialize;

use config::{AppConfig, BackgroundKind};
use services::font::FontService;

/// Determine the data directory for the application.
/// Priority: BADGE_DATA_DIR env var > ~/.badge-maker
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BADGE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".badge-maker")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env, resolve the data directory and read the configuration.
pub fn init_config() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load(data_dir());
    std::fs::create_dir_all(&config.overlay_dir)
        .with_context(|| format!("creating {}", config.overlay_dir.display()))?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    tracing::info!(
        overlays = %config.overlay_dir.display(),
        output = %config.output_dir.display(),
        "Settings loaded"
    );
    Ok(config)
}

/// Wire the directory asset store, font and band style into a compositor.
pub fn build_compositor(config: &AppConfig) -> Compositor {
    let fonts = FontService::new(config.fonts_dir.clone(), config.font_path.clone());
    let glyphs = renderer_from_font_bytes(fonts.load_optional());
    tracing::debug!(renderer = glyphs.name(), "Glyph renderer ready");

    let store = DirectoryStore::new(&config.overlay_dir);
    let resolver = OverlayResolver::new(Arc::new(store), Arc::from(glyphs));
    Compositor::new(resolver).with_background(config.background_style(config.background_kind))
}

/// One badge to produce from the command line.
#[derive(Debug, Clone)]
pub struct BadgeJob {
    pub input: PathBuf,
    /// Already validated to lie in 1..=999.
    pub number: u32,
    pub circular: bool,
    pub tinted: bool,
    /// Use the gradient band for this job regardless of the configured style.
    pub gradient: bool,
    pub output: Option<PathBuf>,
}

/// What was written, for the caller to report.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Decode the input photo, compose the badge and write the PNG.
pub fn make_badge(
    compositor: &Compositor,
    config: &AppConfig,
    job: &BadgeJob,
) -> Result<BadgeSummary, anyhow::Error> {
    let data = std::fs::read(&job.input)
        .with_context(|| format!("reading {}", job.input.display()))?;
    let source = badge_compositor::decode(&data)
        .with_context(|| format!("decoding {}", job.input.display()))?;

    let compositor = if job.gradient {
        compositor
            .clone()
            .with_background(config.background_style(BackgroundKind::Gradient))
    } else {
        compositor.clone()
    };

    let result = compositor.process(CompositeRequest {
        source,
        identifier: job.number,
        circular: job.circular,
        tinted_background: job.tinted,
    })?;

    let path = match &job.output {
        Some(path) => path.clone(),
        None => default_output_path(&config.output_dir, job.number),
    };
    std::fs::write(&path, &result.png).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "Badge saved");

    Ok(BadgeSummary {
        path,
        width: result.width(),
        height: result.height(),
        bytes: result.png.len(),
    })
}

fn default_output_path(dir: &Path, number: u32) -> PathBuf {
    dir.join(format!("badge-{number}-{}.png", uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("badge-app-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn job(input: PathBuf, number: u32) -> BadgeJob {
        BadgeJob {
            input,
            number,
            circular: true,
            tinted: true,
            gradient: false,
            output: None,
        }
    }

    #[test]
    fn make_badge_writes_png_to_output_dir() {
        let dir = scratch_dir("make");
        let config = AppConfig::with_data_dir(dir.clone());
        std::fs::create_dir_all(&config.output_dir).unwrap();
        let input = dir.join("photo.png");
        RgbaImage::from_pixel(80, 60, Rgba([10, 120, 200, 255]))
            .save(&input)
            .unwrap();

        let compositor = build_compositor(&config);
        let summary = make_badge(&compositor, &config, &job(input, 42)).unwrap();

        assert_eq!((summary.width, summary.height), (60, 60));
        assert!(summary.path.starts_with(&config.output_dir));
        let written = std::fs::read(&summary.path).unwrap();
        assert_eq!(written.len(), summary.bytes);
        let decoded = badge_compositor::decode(&written).unwrap();
        assert_eq!(decoded.dimensions(), (60, 60));
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn make_badge_uses_stored_overlay_and_explicit_output() {
        let dir = scratch_dir("overlay");
        let config = AppConfig::with_data_dir(dir.clone());
        std::fs::create_dir_all(&config.overlay_dir).unwrap();
        RgbaImage::from_pixel(20, 10, Rgba([0, 255, 0, 255]))
            .save(config.overlay_dir.join("12.png"))
            .unwrap();
        let input = dir.join("photo.png");
        RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]))
            .save(&input)
            .unwrap();
        let output = dir.join("out.png");

        let compositor = build_compositor(&config);
        let mut job = job(input, 12);
        job.circular = false;
        job.tinted = false;
        job.output = Some(output.clone());
        let summary = make_badge(&compositor, &config, &job).unwrap();

        assert_eq!(summary.path, output);
        let decoded = badge_compositor::decode(&std::fs::read(&output).unwrap()).unwrap();
        // 20x10 asset at band 30 -> 60x30 at (20, 70).
        assert_eq!(*decoded.get_pixel(50, 85), Rgba([0, 255, 0, 255]));
        assert_eq!(*decoded.get_pixel(10, 85), Rgba([255, 255, 255, 255]));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn make_badge_rejects_undecodable_input() {
        let dir = scratch_dir("garbage");
        let config = AppConfig::with_data_dir(dir.clone());
        let input = dir.join("photo.png");
        std::fs::write(&input, b"not a photo").unwrap();

        let compositor = build_compositor(&config);
        let err = make_badge(&compositor, &config, &job(input, 1)).unwrap_err();
        assert!(err.downcast_ref::<badge_compositor::CompositeError>().is_some());
        assert!(std::fs::read_dir(&dir).unwrap().count() == 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
