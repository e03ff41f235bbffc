use crate::error::Result;
use crate::models::Annotation;

/// Port for exporting the annotated output table
pub trait AnnotationSink {
    /// Persist the rows to the sink's destination
    ///
    /// # Returns
    /// The number of rows written
    fn export(&self, rows: &[Annotation]) -> Result<usize>;
}
