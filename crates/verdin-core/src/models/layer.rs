//! Derived raster layers and the per-run layer set.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, VerdinError};
use crate::models::Raster;

/// One temporally-aggregated raster together with the metadata sampling
/// relies on.
///
/// Layers are constructed once during layer build and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Name of the band the raster carries
    pub band: String,

    /// Calendar month tag (1..=12) for monthly composites
    pub month: Option<u32>,

    /// Nominal scale in meters; sampling is calibrated to this
    pub scale: f64,

    /// The composited cells
    pub raster: Raster,
}

impl Layer {
    /// Return the layer with its band renamed
    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = band.into();
        self
    }
}

/// The layers built for one run, keyed the way sampling resolves them.
///
/// Exactly one variant exists per run, selected by the temporal mode.
#[derive(Debug, Clone)]
pub enum LayerSet {
    /// One layer per calendar month, keys 1..=12
    Monthly(BTreeMap<u32, Layer>),
    /// A single composite over the whole window
    Overall(Layer),
}

impl LayerSet {
    /// Resolve the layer for a record date.
    ///
    /// Monthly sets are keyed by calendar month alone, so dates outside the
    /// aggregation window still resolve to their month's layer.
    pub fn layer_for(&self, date: NaiveDate) -> Result<&Layer> {
        match self {
            LayerSet::Monthly(layers) => {
                let month = date.month();
                layers.get(&month).ok_or(VerdinError::LayerMissing { month })
            }
            LayerSet::Overall(layer) => Ok(layer),
        }
    }

    /// Number of layers in the set
    pub fn len(&self) -> usize {
        match self {
            LayerSet::Monthly(layers) => layers.len(),
            LayerSet::Overall(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the layers in month order, or the single overall layer
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Layer> + '_> {
        match self {
            LayerSet::Monthly(layers) => Box::new(layers.values()),
            LayerSet::Overall(layer) => Box::new(std::iter::once(layer)),
        }
    }
}
