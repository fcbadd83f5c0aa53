//! Paints a `RenderedDocument` as a single SVG page in points.
//!
//! The page is 595pt wide (A4) and grows vertically with content; the export
//! pipeline slices it into A4 pages after rasterization. Layout is a simple
//! top-down flow per column using the static font metrics for wrapping.

use quick_xml::escape::escape;

use crate::render::font_metrics::FontFamily;
use crate::templates::catalog::{HeaderStyle, SidebarStyle, TemplateStyle};
use crate::templates::document::{HeaderBlock, Placement, Section, SectionItem, SectionKind};
use crate::templates::{resolve, RenderedDocument};

pub const PAGE_WIDTH_PT: f32 = 595.0;
pub const MIN_PAGE_HEIGHT_PT: f32 = 842.0;

const MARGIN: f32 = 40.0;
const GUTTER: f32 = 24.0;
const SIDEBAR_PAD: f32 = 18.0;
const LINE_HEIGHT: f32 = 1.35;
const SECTION_GAP: f32 = 14.0;
const ITEM_GAP: f32 = 8.0;
const CHIP_HEIGHT: f32 = 16.0;
const TIMELINE_INDENT: f32 = 16.0;

/// One painted page. `width` and `height` are in points and match the
/// SVG viewBox.
#[derive(Debug, Clone)]
pub struct SvgPage {
    pub svg: String,
    pub width: f32,
    pub height: f32,
}

pub fn paint(document: &RenderedDocument) -> SvgPage {
    let style = &resolve(document.template).style;
    let mut painter = Painter {
        style,
        out: String::new(),
    };

    let (main_x, main_width) = match style.sidebar {
        Some(sb) => (sb.width_pt + GUTTER, PAGE_WIDTH_PT - sb.width_pt - GUTTER - MARGIN),
        None => (MARGIN, PAGE_WIDTH_PT - 2.0 * MARGIN),
    };
    let mut main = Column {
        x: main_x,
        width: main_width,
        y: MARGIN,
        palette: Palette::main(style),
        in_sidebar: false,
    };

    painter.header(&document.header, &mut main, style.sidebar.is_none());
    for section in document.placed(Placement::Main) {
        painter.section(section, &mut main);
    }

    let mut bottom = main.y;
    if let Some(sb) = style.sidebar {
        let mut side = Column {
            x: SIDEBAR_PAD,
            width: sb.width_pt - 2.0 * SIDEBAR_PAD,
            y: MARGIN,
            palette: Palette::sidebar(&sb),
            in_sidebar: true,
        };
        painter.contact_block(&document.header, &mut side);
        for section in document.placed(Placement::Sidebar) {
            painter.section(section, &mut side);
        }
        bottom = bottom.max(side.y);
    }

    let height = (bottom + MARGIN).max(MIN_PAGE_HEIGHT_PT).ceil();

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = PAGE_WIDTH_PT,
        h = height
    );
    svg.push_str(&format!(
        r##"<rect x="0" y="0" width="{PAGE_WIDTH_PT}" height="{height}" fill="#ffffff"/>"##
    ));
    if let Some(sb) = style.sidebar {
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{height}" fill="{}"/>"#,
            sb.width_pt, sb.background
        ));
    }
    svg.push_str(&painter.out);
    svg.push_str("</svg>");

    SvgPage {
        svg,
        width: PAGE_WIDTH_PT,
        height,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Palette {
    heading: &'static str,
    body: &'static str,
    muted: &'static str,
    chip_fill: &'static str,
    chip_text: &'static str,
}

impl Palette {
    fn main(style: &TemplateStyle) -> Self {
        Palette {
            heading: style.accent,
            body: "#1f2937",
            muted: style.muted,
            chip_fill: "#e5e7eb",
            chip_text: "#111827",
        }
    }

    fn sidebar(sidebar: &SidebarStyle) -> Self {
        Palette {
            heading: sidebar.text,
            body: sidebar.text,
            muted: "#d1d5db",
            chip_fill: "#374151",
            chip_text: sidebar.text,
        }
    }
}

struct Column {
    x: f32,
    width: f32,
    /// Top of the next free line.
    y: f32,
    palette: Palette,
    in_sidebar: bool,
}

#[derive(Debug, Clone, Copy)]
struct Font {
    family: FontFamily,
    size: f32,
    bold: bool,
    italic: bool,
    fill: &'static str,
}

impl Font {
    fn new(family: FontFamily, size: f32, fill: &'static str) -> Self {
        Font {
            family,
            size,
            bold: false,
            italic: false,
            fill,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn width(&self, text: &str) -> f32 {
        let w = self.family.metrics().measure(text, self.size);
        // Bold glyphs run about 6% wider.
        if self.bold {
            w * 1.06
        } else {
            w
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

struct Painter<'a> {
    style: &'a TemplateStyle,
    out: String,
}

impl Painter<'_> {
    fn text(&mut self, x: f32, baseline: f32, font: Font, anchor: Anchor, content: &str) {
        let clean: String = content.chars().filter(|c| !c.is_control()).collect();
        if clean.trim().is_empty() {
            return;
        }
        self.out.push_str(&format!(
            r#"<text x="{x:.2}" y="{baseline:.2}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="{}" text-anchor="{}" xml:space="preserve">{}</text>"#,
            font.family.css_family(),
            font.size,
            if font.bold { "bold" } else { "normal" },
            if font.italic { "italic" } else { "normal" },
            font.fill,
            anchor.as_str(),
            escape(clean.as_str()),
        ));
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32, rx: f32, fill: &str) -> String {
        format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" rx="{rx}" fill="{fill}"/>"#
        )
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, width: f32) {
        self.out.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-width="{width}"/>"#
        ));
    }

    /// Wraps `text` into `width` and advances `y` past it.
    fn block(&mut self, x: f32, width: f32, y: &mut f32, font: Font, anchor: Anchor, text: &str) {
        let metrics = font.family.metrics();
        // Wrap against a slightly narrower box to leave room for bold glyphs.
        let wrap_width = if font.bold { width / 1.06 } else { width };
        for line in metrics.wrap_lines(text, wrap_width, font.size) {
            self.text(x, *y + font.size, font, anchor, &line);
            *y += font.size * LINE_HEIGHT;
        }
    }

    /// Lays labels out as rounded chips, wrapping to new rows. Advances `y`.
    fn chips(&mut self, x: f32, width: f32, y: &mut f32, labels: &[String], palette: Palette) {
        let font = Font::new(self.style.body_font, 9.0, palette.chip_text);
        let mut cx = x;
        let mut row_y = *y;
        let mut drew_any = false;
        for label in labels.iter().filter(|l| !l.trim().is_empty()) {
            let chip_w = (font.width(label) + 12.0).min(width);
            if cx > x && cx + chip_w > x + width {
                cx = x;
                row_y += CHIP_HEIGHT + 4.0;
            }
            let rect = self.rect(cx, row_y, chip_w, CHIP_HEIGHT, 3.0, palette.chip_fill);
            self.out.push_str(&rect);
            self.text(cx + 6.0, row_y + 11.5, font, Anchor::Start, label);
            cx += chip_w + 5.0;
            drew_any = true;
        }
        if drew_any {
            *y = row_y + CHIP_HEIGHT + 4.0;
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Header
    // ────────────────────────────────────────────────────────────────────

    fn header(&mut self, header: &HeaderBlock, col: &mut Column, with_contact: bool) {
        let style = self.style;
        match style.header {
            HeaderStyle::Centered => {
                let center = col.x + col.width / 2.0;
                let name = Font::new(style.heading_font, 24.0, style.accent).bold();
                self.block(center, col.width, &mut col.y, name, Anchor::Middle, &header.name);
                let title = Font::new(style.body_font, 12.0, style.muted);
                self.block(center, col.width, &mut col.y, title, Anchor::Middle, &header.title);
                if with_contact {
                    self.contact_lines(header, center, col.width, &mut col.y, Anchor::Middle, style.muted);
                }
                col.y += 4.0;
                self.line(col.x, col.y, col.x + col.width, col.y, style.accent, 1.2);
                col.y += 4.0;
            }
            HeaderStyle::Left => {
                let name = Font::new(style.heading_font, 26.0, style.accent).bold();
                self.block(col.x, col.width, &mut col.y, name, Anchor::Start, &header.name);
                let title = Font::new(style.body_font, 13.0, style.muted);
                self.block(col.x, col.width, &mut col.y, title, Anchor::Start, &header.title);
                if with_contact {
                    self.contact_lines(header, col.x, col.width, &mut col.y, Anchor::Start, style.muted);
                }
                col.y += 4.0;
                self.line(col.x, col.y, col.x + 48.0, col.y, style.accent, 2.0);
                col.y += 4.0;
            }
            HeaderStyle::Band => {
                let band_start = self.out.len();
                let top = col.y;
                col.y += MARGIN / 2.0;
                let name = Font::new(style.heading_font, 30.0, "#ffffff").bold();
                let upper = header.name.to_uppercase();
                self.block(col.x, col.width, &mut col.y, name, Anchor::Start, &upper);
                let title = Font::new(style.body_font, 13.0, "#e5e7eb");
                self.block(col.x, col.width, &mut col.y, title, Anchor::Start, &header.title);
                if with_contact {
                    self.contact_lines(header, col.x, col.width, &mut col.y, Anchor::Start, "#d1d5db");
                }
                col.y += MARGIN / 2.0;
                let band = self.rect(0.0, 0.0, PAGE_WIDTH_PT, col.y, 0.0, style.accent);
                self.out.insert_str(band_start, &band);
                if col.y < top + MARGIN {
                    col.y = top + MARGIN;
                }
            }
        }
    }

    fn contact_lines(
        &mut self,
        header: &HeaderBlock,
        x: f32,
        width: f32,
        y: &mut f32,
        anchor: Anchor,
        fill: &'static str,
    ) {
        let font = Font::new(self.style.body_font, 9.5, fill);
        *y += 2.0;
        for group in [&header.contact, &header.links] {
            if !group.is_empty() {
                self.block(x, width, y, font, anchor, &group.join("  |  "));
            }
        }
    }

    /// Contact and links in the sidebar of two-column layouts.
    fn contact_block(&mut self, header: &HeaderBlock, col: &mut Column) {
        if header.contact.is_empty() && header.links.is_empty() {
            return;
        }
        self.heading("Contact", col);
        let font = Font::new(self.style.body_font, 9.0, col.palette.body);
        for entry in header.contact.iter().chain(&header.links) {
            self.block(col.x, col.width, &mut col.y, font, Anchor::Start, entry);
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Sections
    // ────────────────────────────────────────────────────────────────────

    fn heading(&mut self, text: &str, col: &mut Column) {
        let style = self.style;
        col.y += SECTION_GAP;
        let font = Font::new(style.heading_font, 12.5, col.palette.heading).bold();
        let label = if style.uppercase_headings {
            text.to_uppercase()
        } else {
            text.to_string()
        };

        let mut x = col.x;
        if style.heading_marker {
            let marker = self.rect(col.x, col.y + 1.0, 4.0, font.size, 0.0, col.palette.heading);
            self.out.push_str(&marker);
            x += 10.0;
        }
        self.block(x, col.width - (x - col.x), &mut col.y, font, Anchor::Start, &label);

        if style.heading_rule {
            self.line(col.x, col.y, col.x + col.width, col.y, col.palette.muted, 0.6);
            col.y += 6.0;
        } else {
            col.y += 3.0;
        }
    }

    fn section(&mut self, section: &Section, col: &mut Column) {
        self.heading(&section.heading, col);

        if section.kind == SectionKind::Skills {
            let names: Vec<String> = section.items.iter().map(|i| i.title.clone()).collect();
            if self.style.skills_as_chips {
                self.chips(col.x, col.width, &mut col.y, &names, col.palette);
            } else if col.in_sidebar {
                let font = Font::new(self.style.body_font, 9.5, col.palette.body);
                for name in &names {
                    self.block(col.x, col.width, &mut col.y, font, Anchor::Start, name);
                }
            } else {
                let font = Font::new(self.style.body_font, 10.0, col.palette.body);
                self.block(col.x, col.width, &mut col.y, font, Anchor::Start, &names.join("  •  "));
            }
            return;
        }

        let timeline = self.style.timeline
            && !col.in_sidebar
            && matches!(
                section.kind,
                SectionKind::Experience | SectionKind::Education | SectionKind::Projects
            );

        if !timeline {
            for item in &section.items {
                self.item(item, col, 0.0);
            }
            return;
        }

        let line_start = self.out.len();
        let dot_x = col.x + 4.0;
        let mut first_dot = None;
        let mut last_dot = 0.0;
        for item in &section.items {
            let dot_y = col.y + 6.5;
            self.out.push_str(&format!(
                r#"<circle cx="{dot_x:.2}" cy="{dot_y:.2}" r="3" fill="{}"/>"#,
                col.palette.heading
            ));
            first_dot.get_or_insert(dot_y);
            last_dot = dot_y;
            self.item(item, col, TIMELINE_INDENT);
        }
        if let Some(first) = first_dot {
            if last_dot > first {
                let muted = col.palette.muted;
                let end = self.out.split_off(line_start);
                self.line(dot_x, first, dot_x, last_dot, muted, 1.0);
                self.out.push_str(&end);
            }
        }
    }

    fn item(&mut self, item: &SectionItem, col: &mut Column, indent: f32) {
        let style = self.style;
        let palette = col.palette;
        let x = col.x + indent;
        let width = col.width - indent;

        let title_font = Font::new(style.body_font, 11.0, palette.body).bold();
        let meta_font = Font::new(style.body_font, 9.5, palette.muted);
        let has_title = !item.title.trim().is_empty();

        let meta_w = item.meta.as_deref().map(|m| meta_font.width(m)).unwrap_or(0.0);
        let inline_meta = has_title && meta_w > 0.0 && !col.in_sidebar && meta_w < width * 0.4;

        if has_title {
            let first_baseline = col.y + title_font.size;
            let title_width = if inline_meta { width - meta_w - 10.0 } else { width };
            self.block(x, title_width, &mut col.y, title_font, Anchor::Start, &item.title);
            if inline_meta {
                if let Some(meta) = &item.meta {
                    self.text(x + width, first_baseline, meta_font, Anchor::End, meta);
                }
            }
        }
        if !inline_meta {
            if let Some(meta) = &item.meta {
                self.block(x, width, &mut col.y, meta_font, Anchor::Start, meta);
            }
        }
        if let Some(subtitle) = &item.subtitle {
            let font = Font::new(style.body_font, 10.0, palette.muted).italic();
            self.block(x, width, &mut col.y, font, Anchor::Start, subtitle);
        }
        if let Some(body) = &item.body {
            col.y += 1.5;
            let font = Font::new(style.body_font, 10.0, palette.body);
            self.block(x, width, &mut col.y, font, Anchor::Start, body);
        }
        for detail in &item.details {
            let font = Font::new(style.body_font, 9.5, palette.muted);
            self.block(x, width, &mut col.y, font, Anchor::Start, detail);
        }
        if !item.tags.is_empty() {
            col.y += 2.0;
            if style.skills_as_chips {
                self.chips(x, width, &mut col.y, &item.tags, palette);
            } else {
                let font = Font::new(style.body_font, 9.5, palette.muted).italic();
                self.block(x, width, &mut col.y, font, Anchor::Start, &item.tags.join(", "));
            }
        }
        col.y += ITEM_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::model::{Experience, Profile, Skill};
    use crate::templates::{render, TemplateId};

    fn engineer_profile() -> Profile {
        let mut p = Profile::default();
        p.basic_info.name = "Ada Lovelace".to_string();
        p.basic_info.email = "ada@example.com".to_string();
        p.experience.push(Experience {
            role: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2020".to_string(),
            current: true,
            ..Default::default()
        });
        p.skills.push(Skill {
            name: "Rust".to_string(),
            ..Default::default()
        });
        p
    }

    #[test]
    fn test_every_template_paints_experience_text() {
        let profile = engineer_profile();
        for id in TemplateId::ALL {
            let page = paint(&render(id, &profile));
            assert!(page.svg.starts_with("<svg"), "{id}");
            assert!(page.svg.ends_with("</svg>"), "{id}");
            assert!(page.svg.contains(">Engineer<"), "{id} missing role");
            assert!(page.svg.contains("Acme"), "{id} missing company");
            assert!(page.svg.contains("2020 - Present"), "{id} missing dates");
        }
    }

    #[test]
    fn test_empty_profile_is_one_blank_page() {
        for id in TemplateId::ALL {
            let page = paint(&render(id, &Profile::default()));
            assert_eq!(page.width, PAGE_WIDTH_PT);
            assert_eq!(page.height, MIN_PAGE_HEIGHT_PT);
            assert!(!page.svg.contains("<text"), "{id} painted text for an empty profile");
        }
    }

    #[test]
    fn test_markup_in_content_is_escaped() {
        let mut profile = Profile::default();
        profile.summary = "R&D <lead>".to_string();
        let page = paint(&render(TemplateId::Classic, &profile));
        assert!(page.svg.contains("R&amp;D &lt;lead&gt;"));
        assert!(!page.svg.contains("<lead>"));
    }

    #[test]
    fn test_long_profile_grows_page() {
        let mut profile = engineer_profile();
        for i in 0..40 {
            profile.experience.push(Experience {
                role: format!("Role {i}"),
                company: "Acme".to_string(),
                description: "Shipped features and fixed bugs across the stack.".repeat(3),
                ..Default::default()
            });
        }
        let page = paint(&render(TemplateId::Modern, &profile));
        assert!(page.height > MIN_PAGE_HEIGHT_PT);
        assert!(page.svg.contains(&format!("height=\"{}\"", page.height)));
    }

    #[test]
    fn test_two_column_paints_sidebar_background() {
        let page = paint(&render(TemplateId::TwoColumn, &engineer_profile()));
        assert!(page.svg.contains(r##"width="190" height="842" fill="#1f2937""##));
        assert!(page.svg.contains(">Contact<"));
    }

    #[test]
    fn test_creative_uses_band_header() {
        let page = paint(&render(TemplateId::Creative, &engineer_profile()));
        assert!(page.svg.contains("ADA LOVELACE"));
        assert!(page.svg.contains(r##"fill="#ffffff" text-anchor"##));
    }
}
