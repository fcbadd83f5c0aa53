// Render Surface: the current template's output for one session, painted as
// SVG. Preview reads it directly; export rasterizes it.

pub mod font_metrics;
pub mod handlers;
pub mod surface;
pub mod svg;

pub use surface::{RenderSurface, RenderedView};
