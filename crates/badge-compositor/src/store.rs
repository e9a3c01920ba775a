//! Overlay asset stores keyed by numeric identifier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::{CompositeError, Result};

/// Read-only lookup of overlay graphics by identifier.
///
/// "Not found" is reported by [`has`](OverlayStore::has) returning `false`;
/// [`load`](OverlayStore::load) errors are real I/O or decode failures.
pub trait OverlayStore: Send + Sync {
    fn has(&self, identifier: u32) -> bool;

    fn load(&self, identifier: u32) -> Result<RgbaImage>;
}

/// Assets stored as `<dir>/<identifier>.png`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn asset_path(&self, identifier: u32) -> PathBuf {
        self.dir.join(format!("{identifier}.png"))
    }
}

impl OverlayStore for DirectoryStore {
    /// Only a missing file counts as absent. Any other metadata error reports
    /// the asset as present so that [`load`](OverlayStore::load) surfaces it.
    fn has(&self, identifier: u32) -> bool {
        let path = self.asset_path(identifier);
        match std::fs::metadata(&path) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), "Cannot stat overlay asset: {e}");
                true
            }
        }
    }

    fn load(&self, identifier: u32) -> Result<RgbaImage> {
        let path = self.asset_path(identifier);
        debug!(path = %path.display(), "Loading overlay asset");
        let data = std::fs::read(&path).map_err(|e| CompositeError::asset(identifier, e))?;
        let img = image::load_from_memory(&data).map_err(|e| CompositeError::asset(identifier, e))?;
        Ok(img.to_rgba8())
    }
}

/// In-memory store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    assets: HashMap<u32, RgbaImage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace the asset for `identifier`.
    pub fn with_asset(mut self, identifier: u32, asset: RgbaImage) -> Self {
        self.insert(identifier, asset);
        self
    }

    pub fn insert(&mut self, identifier: u32, asset: RgbaImage) {
        self.assets.insert(identifier, asset);
    }
}

impl OverlayStore for MemoryStore {
    fn has(&self, identifier: u32) -> bool {
        self.assets.contains_key(&identifier)
    }

    fn load(&self, identifier: u32) -> Result<RgbaImage> {
        self.assets
            .get(&identifier)
            .cloned()
            .ok_or_else(|| CompositeError::asset(identifier, "not present in memory store"))
    }
}
