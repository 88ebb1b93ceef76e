//! SVG rasterization via `resvg`.

use crate::image::RasterImage;
use crate::util::{IconMatchError, IconMatchResult};
use resvg::{tiny_skia, usvg};

const SNIFF_LEN: usize = 1024;

/// Returns true when the leading bytes contain an `<svg` tag.
pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    head.windows(4).any(|w| w.eq_ignore_ascii_case(b"<svg"))
}

/// Renders SVG markup to an RGBA raster.
///
/// With `size == None` the document's intrinsic size is used; otherwise the
/// drawing is stretched independently along x and y to fill `size`.
pub(crate) fn render(bytes: &[u8], size: Option<(u32, u32)>) -> IconMatchResult<RasterImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(IconMatchError::decode)?;
    let doc = tree.size();
    let (width, height) = size.unwrap_or_else(|| {
        (
            doc.width().ceil().max(1.0) as u32,
            doc.height().ceil().max(1.0) as u32,
        )
    });
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(IconMatchError::InvalidDimensions { width, height })?;
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / doc.width(),
        height as f32 / doc.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha.
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RasterImage::new(data, width, height)
}
