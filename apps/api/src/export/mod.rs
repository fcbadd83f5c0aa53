// Export Pipeline: Render Surface → bitmap → paginated PDF.
//
// The surface's SVG is rasterized at a fixed pixel width, cut into
// A4-proportioned strips and wrapped in a minimal PDF, one image per page.

pub mod filename;
pub mod handlers;
pub mod pdf;
pub mod pipeline;
pub mod raster;

pub use pipeline::{ExportError, ExportGate, ExportPipeline, ExportedFile};
