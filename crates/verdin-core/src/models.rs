pub mod layer;
pub mod raster;
pub mod record;
pub mod region;

pub use layer::{Layer, LayerSet};
pub use raster::Raster;
pub use record::{Annotation, Record};
pub use region::Region;
