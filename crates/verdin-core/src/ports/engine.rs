use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Layer, Region};

/// Request for a temporally-averaged composite.
#[derive(Debug, Clone)]
pub struct CompositeRequest<'a> {
    /// Archive identifier to composite from
    pub archive: &'a str,

    /// Band to aggregate
    pub band: &'a str,

    /// Window start (inclusive)
    pub start: NaiveDate,

    /// Window end (exclusive)
    pub end: NaiveDate,

    /// Restrict to images from this calendar month (1..=12)
    pub month: Option<u32>,

    /// Clip boundary for the output
    pub region: &'a Region,

    /// Output scale in meters
    pub scale: f64,
}

/// Request to aggregate a layer onto a coarser grid.
#[derive(Debug, Clone, Copy)]
pub struct CoarsenRequest {
    /// Target scale in meters
    pub scale: f64,

    /// Upper bound on input cells aggregated per output cell
    pub max_pixels: u32,
}

/// Request to sample a layer at one point.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest {
    /// Point longitude in degrees
    pub lng: f64,

    /// Point latitude in degrees
    pub lat: f64,

    /// Sampling scale in meters; callers pass the layer's nominal scale
    pub scale: f64,

    /// Engine parallelism hint, forwarded as-is
    pub tile_scale: u32,
}

/// Port to the raster compute engine
pub trait EviEngine {
    /// Mean-composite the archive over the request window, clipped to the
    /// region, on a grid fixed at the requested scale.
    ///
    /// The mean reducer labels the output band `{band}_mean`; callers restore
    /// the band name they want. An empty image selection is an `ArchiveEmpty`
    /// error.
    fn composite(&self, request: &CompositeRequest<'_>) -> Result<Layer>;

    /// Aggregate a layer onto a coarser grid by block mean.
    ///
    /// The block size is the rounded ratio of target to source scale, and a
    /// block's cell count must stay within `max_pixels`.
    fn coarsen(&self, layer: &Layer, request: &CoarsenRequest) -> Result<Layer>;

    /// Read the layer's value at a point.
    ///
    /// Out-of-coverage points and nodata cells yield `Ok(None)`, never an
    /// error.
    fn sample(&self, layer: &Layer, request: &SampleRequest) -> Result<Option<f64>>;
}
