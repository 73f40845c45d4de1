//! SVG to PNG rasterization.
//!
//! Uses usvg to parse, resvg to render into a tiny-skia pixmap, and the
//! pixmap's PNG encoder. System fonts are loaded once per process and shared
//! by every render.

use std::sync::{Arc, OnceLock};

use equity_common::{EquityError, EquityResult};
use tracing::debug;

/// Default scale factor; 2x keeps badge text crisp on high-DPI screens.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Largest output edge in pixels.
const MAX_DIMENSION: u32 = 4096;

static FONT_DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

fn font_db() -> Arc<usvg::fontdb::Database> {
    FONT_DB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "Loaded system fonts for rasterization");
            Arc::new(db)
        })
        .clone()
}

/// Rasterize SVG markup to PNG bytes at the given scale.
pub fn svg_to_png(svg: &str, scale: f32) -> EquityResult<Vec<u8>> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(EquityError::RenderError(format!("invalid scale {}", scale)));
    }

    let mut opt = usvg::Options::default();
    opt.fontdb = font_db();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| EquityError::RenderError(format!("failed to parse SVG: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EquityError::RenderError(format!(
            "output size {}x{} out of range",
            width, height
        )));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        EquityError::RenderError(format!("failed to allocate {}x{} pixmap", width, height))
    })?;

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| EquityError::RenderError(format!("PNG encoding failed: {}", e)))
}
