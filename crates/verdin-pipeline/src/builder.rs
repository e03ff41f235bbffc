use std::collections::BTreeMap;

use verdin_core::config::{PipelineConfig, SpatialMode, TemporalMode};
use verdin_core::models::{Layer, LayerSet, Region};
use verdin_core::ports::{CoarsenRequest, CompositeRequest, EviEngine};
use verdin_core::Result;

/// Build the layer set described by the configuration.
///
/// Every combination of temporal and spatial mode composites at the native
/// scale first; coarse layers are block-aggregated from the native composite,
/// never composited directly at the coarse scale. The configured band name is
/// restored on every layer before the set is returned.
pub fn build_layer_set<E: EviEngine>(
    engine: &E,
    config: &PipelineConfig,
    region: &Region,
) -> Result<LayerSet> {
    match (config.temporal, config.spatial) {
        (TemporalMode::Monthly, SpatialMode::Native) => {
            let mut layers = BTreeMap::new();
            for (month, layer) in monthly_composites(engine, config, region)? {
                layers.insert(month, layer.with_band(&config.band));
            }
            Ok(LayerSet::Monthly(layers))
        }
        (TemporalMode::Monthly, SpatialMode::Coarse) => {
            let request = coarsen_request(config);
            let mut layers = BTreeMap::new();
            for (month, layer) in monthly_composites(engine, config, region)? {
                let coarse = engine.coarsen(&layer, &request)?;
                layers.insert(month, coarse.with_band(&config.band));
            }
            Ok(LayerSet::Monthly(layers))
        }
        (TemporalMode::Overall, SpatialMode::Native) => {
            let layer = overall_composite(engine, config, region)?;
            Ok(LayerSet::Overall(layer.with_band(&config.band)))
        }
        (TemporalMode::Overall, SpatialMode::Coarse) => {
            let layer = overall_composite(engine, config, region)?;
            let coarse = engine.coarsen(&layer, &coarsen_request(config))?;
            Ok(LayerSet::Overall(coarse.with_band(&config.band)))
        }
    }
}

/// Composite each calendar month over the window at the native scale
fn monthly_composites<E: EviEngine>(
    engine: &E,
    config: &PipelineConfig,
    region: &Region,
) -> Result<BTreeMap<u32, Layer>> {
    let mut layers = BTreeMap::new();

    for month in 1..=12 {
        let request = CompositeRequest {
            archive: &config.archive,
            band: &config.band,
            start: config.start_date,
            end: config.end_date,
            month: Some(month),
            region,
            scale: config.native_scale,
        };

        let layer = engine.composite(&request)?;
        tracing::debug!(month, scale = config.native_scale, "Built monthly composite");
        layers.insert(month, layer);
    }

    Ok(layers)
}

fn overall_composite<E: EviEngine>(
    engine: &E,
    config: &PipelineConfig,
    region: &Region,
) -> Result<Layer> {
    let request = CompositeRequest {
        archive: &config.archive,
        band: &config.band,
        start: config.start_date,
        end: config.end_date,
        month: None,
        region,
        scale: config.native_scale,
    };

    let layer = engine.composite(&request)?;
    tracing::debug!(scale = config.native_scale, "Built overall composite");
    Ok(layer)
}

fn coarsen_request(config: &PipelineConfig) -> CoarsenRequest {
    CoarsenRequest { scale: config.coarse_scale, max_pixels: config.max_pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use verdin_core::config::LayeredConfig;
    use verdin_core::models::Raster;
    use verdin_core::ports::SampleRequest;
    use verdin_core::VerdinError;

    /// Engine stub that records the calls made against it
    struct StubEngine {
        calls: RefCell<Vec<String>>,
        fail_month: Option<u32>,
    }

    impl StubEngine {
        fn new() -> Self {
            Self { calls: RefCell::new(Vec::new()), fail_month: None }
        }

        fn failing_on(month: u32) -> Self {
            Self { calls: RefCell::new(Vec::new()), fail_month: Some(month) }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl EviEngine for StubEngine {
        fn composite(&self, request: &CompositeRequest<'_>) -> Result<Layer> {
            self.calls
                .borrow_mut()
                .push(format!("composite month={:?} scale={}", request.month, request.scale));

            if self.fail_month.is_some() && request.month == self.fail_month {
                return Err(VerdinError::ArchiveEmpty { archive: request.archive.to_string() });
            }

            Ok(Layer {
                band: format!("{}_mean", request.band),
                month: request.month,
                scale: request.scale,
                raster: Raster::filled(0.0, 1.0, 0.5, 2, 2, 0.4),
            })
        }

        fn coarsen(&self, layer: &Layer, request: &CoarsenRequest) -> Result<Layer> {
            self.calls.borrow_mut().push(format!("coarsen scale={}", request.scale));

            Ok(Layer {
                band: layer.band.clone(),
                month: layer.month,
                scale: request.scale,
                raster: Raster::filled(0.0, 1.0, 1.0, 1, 1, 0.4),
            })
        }

        fn sample(&self, _layer: &Layer, _request: &SampleRequest) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    fn config(temporal: TemporalMode, spatial: SpatialMode) -> PipelineConfig {
        let mut layered = LayeredConfig::with_defaults();
        layered.temporal.value = temporal;
        layered.spatial.value = spatial;
        layered.build().unwrap()
    }

    #[test]
    fn test_monthly_native_builds_twelve_layers() {
        let engine = StubEngine::new();
        let config = config(TemporalMode::Monthly, SpatialMode::Native);

        let set = build_layer_set(&engine, &config, &config.region).unwrap();

        assert_eq!(set.len(), 12);
        let months: Vec<Option<u32>> = set.iter().map(|l| l.month).collect();
        assert_eq!(months, (1..=12).map(Some).collect::<Vec<_>>());
        for layer in set.iter() {
            assert_eq!(layer.scale, 30.0);
        }
    }

    #[test]
    fn test_monthly_coarse_composites_native_then_coarsens() {
        let engine = StubEngine::new();
        let config = config(TemporalMode::Monthly, SpatialMode::Coarse);

        let set = build_layer_set(&engine, &config, &config.region).unwrap();

        assert_eq!(set.len(), 12);
        for layer in set.iter() {
            assert_eq!(layer.scale, 1000.0);
        }

        // Composites run at the native scale before any coarsening
        let calls = engine.calls();
        assert_eq!(calls.len(), 24);
        assert!(calls.iter().filter(|c| c.starts_with("composite")).all(|c| c.contains("scale=30")));
        assert!(calls.iter().filter(|c| c.starts_with("coarsen")).all(|c| c.contains("scale=1000")));
    }

    #[test]
    fn test_overall_native_single_layer() {
        let engine = StubEngine::new();
        let config = config(TemporalMode::Overall, SpatialMode::Native);

        let set = build_layer_set(&engine, &config, &config.region).unwrap();

        assert_eq!(set.len(), 1);
        let layer = set.iter().next().unwrap();
        assert_eq!(layer.month, None);
        assert_eq!(layer.scale, 30.0);
        assert_eq!(engine.calls(), vec!["composite month=None scale=30"]);
    }

    #[test]
    fn test_overall_coarse_ordering() {
        let engine = StubEngine::new();
        let config = config(TemporalMode::Overall, SpatialMode::Coarse);

        let set = build_layer_set(&engine, &config, &config.region).unwrap();

        let layer = set.iter().next().unwrap();
        assert_eq!(layer.scale, 1000.0);
        assert_eq!(engine.calls(), vec!["composite month=None scale=30", "coarsen scale=1000"]);
    }

    #[test]
    fn test_band_restored_in_every_mode() {
        let modes = [
            (TemporalMode::Monthly, SpatialMode::Native),
            (TemporalMode::Monthly, SpatialMode::Coarse),
            (TemporalMode::Overall, SpatialMode::Native),
            (TemporalMode::Overall, SpatialMode::Coarse),
        ];

        for (temporal, spatial) in modes {
            let engine = StubEngine::new();
            let config = config(temporal, spatial);
            let set = build_layer_set(&engine, &config, &config.region).unwrap();

            // The reducer's `_mean` suffix never leaks out of the builder
            for layer in set.iter() {
                assert_eq!(layer.band, "EVI", "band leaked for {:?}/{:?}", temporal, spatial);
            }
        }
    }

    #[test]
    fn test_composite_error_propagates() {
        let engine = StubEngine::failing_on(7);
        let config = config(TemporalMode::Monthly, SpatialMode::Native);

        let result = build_layer_set(&engine, &config, &config.region);
        assert!(matches!(result, Err(VerdinError::ArchiveEmpty { .. })));
    }
}
