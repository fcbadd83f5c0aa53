//! Minimal PDF writer: one full-width image per A4 page.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::export::pipeline::ExportError;

pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// A horizontal slice of the rasterized page, as packed RGB rows.
#[derive(Debug)]
pub struct PageStrip {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

const PAGE_SLACK_DIVISOR: u32 = 50;

/// Pixel height of one A4 page at `width_px`.
pub fn page_height_px(width_px: u32) -> u32 {
    ((width_px as f32) * A4_HEIGHT_PT / A4_WIDTH_PT).round().max(1.0) as u32
}

/// Cuts the bitmap into A4-proportioned strips from the top. The last strip
/// may be shorter than a full page. A remainder within the slack (a sliver of
/// bottom margin left by rounding) stays on the page above it.
pub fn paginate(pixmap: &tiny_skia::Pixmap) -> Vec<PageStrip> {
    let width = pixmap.width();
    let total = pixmap.height();
    let per_page = page_height_px(width);
    let slack = per_page / PAGE_SLACK_DIVISOR;
    let row_bytes = width as usize * 4;
    let data = pixmap.data();

    let mut strips = Vec::new();
    let mut top = 0u32;
    while top < total {
        let remaining = total - top;
        let height = if remaining <= per_page + slack {
            remaining
        } else {
            per_page
        };
        let start = top as usize * row_bytes;
        let end = (top + height) as usize * row_bytes;
        // Background is opaque white, so premultiplied RGBA equals plain RGB.
        let rgb = data[start..end]
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        strips.push(PageStrip { width, height, rgb });
        top += height;
    }
    strips
}

/// Assembles a PDF with one page per strip. Each strip is scaled to the page
/// width and anchored at the top of its page.
pub fn build_pdf(strips: &[PageStrip], title: &str) -> Result<Vec<u8>, ExportError> {
    if strips.is_empty() {
        return Err(ExportError::Assemble("Nothing to export".to_string()));
    }

    // 1 catalog, 2 page tree, then page/content/image per strip, then info.
    let page_ids: Vec<usize> = (0..strips.len()).map(|i| 3 + i * 3).collect();
    let info_id = 3 + strips.len() * 3;

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(info_id);
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            strips.len()
        )
        .into_bytes(),
    );

    for (strip, page_id) in strips.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        let image_id = page_id + 2;

        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {A4_WIDTH_PT} {A4_HEIGHT_PT}] \
                 /Resources << /XObject << /Im0 {image_id} 0 R >> >> /Contents {content_id} 0 R >>"
            )
            .into_bytes(),
        );

        let draw_h = strip.height as f32 * A4_WIDTH_PT / strip.width as f32;
        let content = format!(
            "q {A4_WIDTH_PT:.2} 0 0 {draw_h:.2} 0 {:.2} cm /Im0 Do Q",
            A4_HEIGHT_PT - draw_h
        );
        objects.push(stream_object("", content.as_bytes()));

        let compressed = flate_compress(&strip.rgb)?;
        let dict = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 /Filter /FlateDecode ",
            strip.width, strip.height
        );
        objects.push(stream_object(&dict, &compressed));
    }

    objects.push(
        format!(
            "<< /Title {} /Producer (vitae) >>",
            utf16_hex_string(title)
        )
        .into_bytes(),
    );

    Ok(write_document(&objects, info_id))
}

fn stream_object(dict: &str, data: &[u8]) -> Vec<u8> {
    let mut out = format!("<< {dict}/Length {} >>\nstream\n", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.extend_from_slice(b"\nendstream");
    out
}

fn write_document(objects: &[Vec<u8>], info_id: usize) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(obj);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| ExportError::Assemble(format!("Image compression failed: {e}")))
}

/// PDF text string as big-endian UTF-16 with BOM, hex encoded.
fn utf16_hex_string(s: &str) -> String {
    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        hex.push_str(&format!("{unit:04X}"));
    }
    hex.push('>');
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> tiny_skia::Pixmap {
        let mut pixmap = tiny_skia::Pixmap::new(width, height).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle.as_bytes())
            .count()
    }

    #[test]
    fn test_page_height_is_a4_ratio() {
        assert_eq!(page_height_px(1240), 1754);
        assert_eq!(page_height_px(595), 841);
    }

    #[test]
    fn test_short_bitmap_is_one_strip() {
        let strips = paginate(&white(100, 50));
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].height, 50);
        assert_eq!(strips[0].rgb.len(), 100 * 50 * 3);
        assert!(strips[0].rgb.iter().all(|b| *b == 255));
    }

    #[test]
    fn test_tall_bitmap_splits_into_pages() {
        let per_page = page_height_px(100);
        let strips = paginate(&white(100, per_page * 2 + 10));
        assert_eq!(strips.len(), 3);
        assert_eq!(strips[0].height, per_page);
        assert_eq!(strips[1].height, per_page);
        assert_eq!(strips[2].height, 10);
    }

    #[test]
    fn test_rounding_sliver_stays_on_last_page() {
        // An 842pt page at 300px is one pixel taller than an A4 strip.
        let per_page = page_height_px(300);
        let strips = paginate(&white(300, per_page + 1));
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].height, per_page + 1);
    }

    #[test]
    fn test_pdf_structure() {
        let strips = paginate(&white(100, page_height_px(100) + 10));
        let pdf = build_pdf(&strips, "Ada Lovelace").unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF"));
        assert_eq!(count(&pdf, "/Type /Page "), 2);
        assert_eq!(count(&pdf, "/Subtype /Image"), 2);
        assert_eq!(count(&pdf, "/Count 2"), 1);
        assert_eq!(count(&pdf, "/Filter /FlateDecode"), 2);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = build_pdf(&paginate(&white(10, 10)), "x").unwrap();
        let marker = b"startxref\n";
        let pos = pdf
            .windows(marker.len())
            .rposition(|w| w == marker)
            .unwrap();
        let tail = std::str::from_utf8(&pdf[pos + marker.len()..]).unwrap();
        let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(pdf[xref_at..].starts_with(b"xref"));

        let xref = std::str::from_utf8(&pdf[xref_at..]).unwrap();
        let first_entry = xref.lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(pdf[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(build_pdf(&[], "x"), Err(ExportError::Assemble(_))));
    }

    #[test]
    fn test_title_is_utf16_hex() {
        assert_eq!(utf16_hex_string("Aé"), "<FEFF004100E9>");
    }
}
