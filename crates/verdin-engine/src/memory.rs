//! In-memory compute engine over scene archives.
//!
//! Composites are evaluated eagerly on a geographic grid derived from the
//! request: the cell size in degrees is the requested scale divided by the
//! meters spanned by one degree at the equator. Requests whose grid exceeds
//! the engine's cell budget fail instead of exhausting memory.

use geo::algorithm::contains::Contains;
use geo::Point;
use rayon::prelude::*;
use verdin_core::error::{Result, VerdinError};
use verdin_core::models::{Layer, Raster};
use verdin_core::ports::{CoarsenRequest, CompositeRequest, EviEngine, SampleRequest};

use crate::archive::{Scene, SceneArchive};

/// Meters spanned by one degree of longitude at the equator
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default bound on the number of cells a composite grid may hold
const DEFAULT_MAX_CELLS: usize = 16_777_216;

/// Compute engine that composites and samples archives held in memory
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    archive: SceneArchive,
    max_cells: usize,
}

impl MemoryEngine {
    /// Create an engine over an archive
    pub fn new(archive: SceneArchive) -> Self {
        Self { archive, max_cells: DEFAULT_MAX_CELLS }
    }

    /// Override the composite grid cell budget
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// The archive this engine serves
    pub fn archive(&self) -> &SceneArchive {
        &self.archive
    }

    fn composite_grid(
        &self,
        request: &CompositeRequest<'_>,
        scenes: &[&Scene],
    ) -> Result<Raster> {
        let bounds = request.region.bounding_rect().ok_or_else(|| {
            VerdinError::Engine("region has no bounding rectangle".to_string())
        })?;

        let cell_deg = request.scale / METERS_PER_DEGREE;
        let west = bounds.min().x;
        let north = bounds.max().y;
        let width = (((bounds.max().x - west) / cell_deg).ceil() as usize).max(1);
        let height = (((north - bounds.min().y) / cell_deg).ceil() as usize).max(1);

        let cells = width.checked_mul(height).unwrap_or(usize::MAX);
        if cells > self.max_cells {
            return Err(VerdinError::Engine(format!(
                "composite grid of {}x{} cells at {} m exceeds the {} cell budget",
                width, height, request.scale, self.max_cells
            )));
        }

        let polygon = request.region.to_polygon();
        let mut raster = Raster::nodata(west, north, cell_deg, width, height);

        raster.values.par_chunks_mut(width).enumerate().for_each(|(row, row_cells)| {
            let lat = north - (row as f64 + 0.5) * cell_deg;
            for (col, cell) in row_cells.iter_mut().enumerate() {
                let lng = west + (col as f64 + 0.5) * cell_deg;
                if !polygon.contains(&Point::new(lng, lat)) {
                    continue;
                }
                *cell = scene_mean(scenes, lng, lat);
            }
        });

        Ok(raster)
    }
}

impl EviEngine for MemoryEngine {
    fn composite(&self, request: &CompositeRequest<'_>) -> Result<Layer> {
        if request.archive != self.archive.name() {
            return Err(VerdinError::Engine(format!(
                "unknown archive '{}', this engine serves '{}'",
                request.archive,
                self.archive.name()
            )));
        }

        let scenes = self.archive.select(request.start, request.end, request.month);
        if scenes.is_empty() {
            return Err(VerdinError::ArchiveEmpty { archive: request.archive.to_string() });
        }

        let raster = self.composite_grid(request, &scenes)?;
        tracing::debug!(
            scenes = scenes.len(),
            month = ?request.month,
            coverage = raster.coverage(),
            "Composited scenes"
        );

        Ok(Layer {
            band: format!("{}_mean", request.band),
            month: request.month,
            scale: request.scale,
            raster,
        })
    }

    fn coarsen(&self, layer: &Layer, request: &CoarsenRequest) -> Result<Layer> {
        let ratio = request.scale / layer.scale;
        let factor = ratio.round();
        if !factor.is_finite() || factor < 1.0 {
            return Err(VerdinError::Engine(format!(
                "cannot coarsen a {} m layer to {} m",
                layer.scale, request.scale
            )));
        }

        let factor = factor as usize;
        let block_cells = (factor as u64).checked_mul(factor as u64).unwrap_or(u64::MAX);
        if block_cells > u64::from(request.max_pixels) {
            return Err(VerdinError::Engine(format!(
                "coarsening block of {}x{} cells exceeds max_pixels {}",
                factor, factor, request.max_pixels
            )));
        }

        let source = &layer.raster;
        let out_width = source.width.div_ceil(factor);
        let out_height = source.height.div_ceil(factor);
        let cell_deg = source.cell_deg * factor as f64;

        let mut raster = Raster::nodata(source.west, source.north, cell_deg, out_width, out_height);

        raster.values.par_chunks_mut(out_width).enumerate().for_each(|(out_row, row_cells)| {
            for (out_col, cell) in row_cells.iter_mut().enumerate() {
                *cell = block_mean(source, out_col * factor, out_row * factor, factor);
            }
        });

        Ok(Layer {
            band: layer.band.clone(),
            month: layer.month,
            scale: request.scale,
            raster,
        })
    }

    fn sample(&self, layer: &Layer, request: &SampleRequest) -> Result<Option<f64>> {
        // The layer grid is already fixed at its nominal scale, and reads are
        // local, so the tile_scale hint has nothing to tune here.
        Ok(layer.raster.value_at(request.lng, request.lat).map(f64::from))
    }
}

/// Mean of the scene values covering a point, ignoring scenes with no data
/// there
fn scene_mean(scenes: &[&Scene], lng: f64, lat: f64) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for scene in scenes {
        if let Some(value) = scene.raster.value_at(lng, lat) {
            sum += f64::from(value);
            count += 1;
        }
    }

    if count == 0 {
        f32::NAN
    } else {
        (sum / count as f64) as f32
    }
}

/// Mean of one `factor` x `factor` block, clipped to the source bounds
fn block_mean(source: &Raster, col0: usize, row0: usize, factor: usize) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for row in row0..(row0 + factor).min(source.height) {
        for col in col0..(col0 + factor).min(source.width) {
            let value = source.get(col, row);
            if value.is_nan() {
                continue;
            }
            sum += f64::from(value);
            count += 1;
        }
    }

    if count == 0 {
        f32::NAN
    } else {
        (sum / count as f64) as f32
    }
}
