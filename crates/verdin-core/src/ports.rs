pub mod engine;
pub mod sink;

pub use engine::{CoarsenRequest, CompositeRequest, EviEngine, SampleRequest};
pub use sink::AnnotationSink;
