//! Scene archives loaded from directories of ESRI ASCII grids.

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use verdin_core::error::{Result, VerdinError};
use verdin_core::formats::asciigrid;
use verdin_core::models::Raster;

/// One dated scene in an archive
#[derive(Debug, Clone)]
pub struct Scene {
    /// Acquisition date
    pub date: NaiveDate,

    /// Scene cells
    pub raster: Raster,
}

/// A named, date-ordered collection of scenes held in memory
#[derive(Debug, Clone, Default)]
pub struct SceneArchive {
    name: String,
    scenes: Vec<Scene>,
}

impl SceneArchive {
    /// Create an empty archive
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), scenes: Vec::new() }
    }

    /// Archive identifier, matched against composite requests
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of scenes in the archive
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Add a scene, keeping the archive ordered by date
    pub fn push(&mut self, scene: Scene) {
        let at = self.scenes.partition_point(|s| s.date <= scene.date);
        self.scenes.insert(at, scene);
    }

    /// Load every `.asc` scene in a directory.
    ///
    /// The acquisition date comes from the file name, which must end in
    /// `_YYYYMMDD` or `_YYYY-MM-DD` before the extension. Files with other
    /// extensions are skipped.
    pub fn load_dir(name: impl Into<String>, dir: &Path) -> Result<Self> {
        let mut archive = Self::new(name);

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("asc") {
                continue;
            }

            let date = date_from_path(&path)?;
            let raster = asciigrid::read_grid(&path)?;
            archive.push(Scene { date, raster });
        }

        tracing::debug!(archive = archive.name.as_str(), scenes = archive.len(), "Loaded archive");
        Ok(archive)
    }

    /// Scenes dated within `[start, end)`, optionally restricted to one
    /// calendar month
    pub fn select(&self, start: NaiveDate, end: NaiveDate, month: Option<u32>) -> Vec<&Scene> {
        self.scenes
            .iter()
            .filter(|s| s.date >= start && s.date < end)
            .filter(|s| month.map_or(true, |m| s.date.month() == m))
            .collect()
    }
}

/// Extract the acquisition date from a scene file name
fn date_from_path(path: &Path) -> Result<NaiveDate> {
    let stem =
        path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| VerdinError::FormatInvalid {
            format: "scene".to_string(),
            reason: format!("{}: not a valid file name", path.display()),
        })?;

    let tail = match stem.rsplit_once('_') {
        Some((_, tail)) => tail,
        None => stem,
    };

    NaiveDate::parse_from_str(tail, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(tail, "%Y-%m-%d"))
        .map_err(|_| VerdinError::FormatInvalid {
            format: "scene".to_string(),
            reason: format!("{}: no date in file name, expected _YYYYMMDD", path.display()),
        })
}
