use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::export::pipeline::ExportError;

/// Converts SVG markup into a bitmap with resvg.
pub struct Rasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Rasterizer {
    /// Loads system fonts, plus every font file under `font_dir` when given.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        if let Some(dir) = font_dir {
            fontdb.load_fonts_dir(dir);
        }

        if fontdb.is_empty() {
            warn!("No fonts found, exported text will be missing");
        } else {
            info!("Rasterizer loaded {} font faces", fontdb.len());
        }

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Renders `svg` scaled to exactly `width_px` pixels wide. Height follows
    /// the SVG's aspect ratio. Transparent areas come out white.
    pub fn rasterize(&self, svg: &str, width_px: u32) -> Result<tiny_skia::Pixmap, ExportError> {
        let tree = {
            let mut opts = usvg::Options::default();
            opts.fontdb = Arc::clone(&self.fontdb);
            usvg::Tree::from_str(svg, &opts)
                .map_err(|e| ExportError::Rasterize(format!("SVG parsing failed: {e}")))?
        };

        let size = tree.size();
        if width_px == 0 || size.width() <= 0.0 {
            return Err(ExportError::Rasterize("Page has zero width".to_string()));
        }
        let scale = width_px as f32 / size.width();
        let height_px = (size.height() * scale).ceil().max(1.0) as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or_else(|| {
            ExportError::Rasterize(format!(
                "Failed to create pixmap ({width_px}x{height_px})"
            ))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}
