use verdin_core::models::{Annotation, LayerSet, Record};
use verdin_core::ports::{EviEngine, SampleRequest};
use verdin_core::Result;

/// Sample the layer resolved for a record's date at the record's point.
///
/// The request is issued at the resolved layer's nominal scale, so the value
/// read matches the resolution the layer was built at. A point outside the
/// layer's coverage yields `None`.
pub fn sample_record<E: EviEngine>(
    engine: &E,
    layers: &LayerSet,
    record: &Record,
    tile_scale: u32,
) -> Result<Option<f64>> {
    let layer = layers.layer_for(record.date)?;

    let request =
        SampleRequest { lng: record.lng, lat: record.lat, scale: layer.scale, tile_scale };

    engine.sample(layer, &request)
}

/// Annotate a batch of records, one output row per input record in input order
pub fn annotate_records<E: EviEngine>(
    engine: &E,
    layers: &LayerSet,
    records: &[Record],
    tile_scale: u32,
) -> Result<Vec<Annotation>> {
    records
        .iter()
        .map(|record| {
            let value = sample_record(engine, layers, record, tile_scale)?;
            Ok(Annotation::for_record(record, value))
        })
        .collect()
}
