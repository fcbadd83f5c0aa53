//! Static font-metric tables used to lay out text before rasterization.
//!
//! SVG has no text flow, so the painter wraps lines itself. Widths are in em
//! units relative to the font size and approximate the fonts the painter
//! requests; the real glyphs resolved by the rasterizer may differ slightly,
//! which the column padding absorbs.
//! The table covers ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Classic template: traditional serif.
    Serif,
    /// Humanist sans-serif used for body text by most templates.
    Sans,
    /// Heavy condensed display face for bold headings.
    Display,
}

impl FontFamily {
    /// CSS font-family list written into the SVG. The rasterizer resolves it
    /// against the loaded font database.
    pub fn css_family(&self) -> &'static str {
        match self {
            FontFamily::Serif => "Georgia, 'Times New Roman', 'DejaVu Serif', serif",
            FontFamily::Sans => "Inter, Helvetica, Arial, 'DejaVu Sans', sans-serif",
            FontFamily::Display => "Oswald, Impact, 'Arial Narrow', 'DejaVu Sans Condensed', sans-serif",
        }
    }

    pub fn metrics(&self) -> &'static FontMetricTable {
        match self {
            FontFamily::Serif => &SERIF_TABLE,
            FontFamily::Sans => &SANS_TABLE,
            FontFamily::Display => &DISPLAY_TABLE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// `widths[i]` is the width of ASCII character `(i + 32)` at 1em. Families
/// share the base sans widths and differ by `scale`.
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: &'static [f32; 95],
    scale: f32,
    /// Fallback width for non-ASCII characters, before scaling.
    average_char_width: f32,
}

impl FontMetricTable {
    /// Width of `c` in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        let base = if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        };
        base * self.scale
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn measure(&self, s: &str, size_pt: f32) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum::<f32>() * size_pt
    }

    /// Greedy word-wrap of `text` into lines no wider than `max_width_pt`.
    ///
    /// Explicit newlines always break. A single word wider than the line is
    /// split at character boundaries. Blank input yields no lines.
    pub fn wrap_lines(&self, text: &str, max_width_pt: f32, size_pt: f32) -> Vec<String> {
        let space_w = self.measure(" ", size_pt);
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            let mut current_w = 0.0_f32;

            for word in paragraph.split_whitespace() {
                let word_w = self.measure(word, size_pt);

                if word_w > max_width_pt {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    let mut pieces = self.split_word(word, max_width_pt, size_pt);
                    let last = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                    current_w = self.measure(&last, size_pt);
                    current = last;
                    continue;
                }

                if current.is_empty() {
                    current.push_str(word);
                    current_w = word_w;
                } else if current_w + space_w + word_w > max_width_pt {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                    current_w = word_w;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_w += space_w + word_w;
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    fn split_word(&self, word: &str, max_width_pt: f32, size_pt: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut piece_w = 0.0_f32;
        for c in word.chars() {
            let w = self.char_width(c) * size_pt;
            if !piece.is_empty() && piece_w + w > max_width_pt {
                pieces.push(std::mem::take(&mut piece));
                piece_w = 0.0;
            }
            piece.push(c);
            piece_w += w;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
static BASE_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0     1     2     3     4     5     6     7     8     9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A     B     C     D     E     F     G     H     I     J     K     L     M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a     b     c     d     e     f     g     h     i     j     k     l     m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n     o     p     q     r     s     t     u     v     w     x     y     z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

static SANS_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Sans,
    widths: &BASE_WIDTHS,
    scale: 1.0,
    average_char_width: 0.52,
};

/// Georgia-like serif runs slightly wider than the sans base.
static SERIF_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Serif,
    widths: &BASE_WIDTHS,
    scale: 1.05,
    average_char_width: 0.52,
};

static DISPLAY_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Display,
    widths: &BASE_WIDTHS,
    scale: 0.72,
    average_char_width: 0.52,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(FontFamily::Sans.metrics().measure("", 10.0), 0.0);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let m = FontFamily::Sans.metrics();
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00em
        assert!((m.measure("Rust", 10.0) - 20.0).abs() < 1e-3);
        assert!((m.measure("Rust", 5.0) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let m = FontFamily::Sans.metrics();
        assert!((m.char_width('é') - 0.52).abs() < 1e-4);
    }

    #[test]
    fn test_display_narrower_than_serif() {
        let text = "Professional Experience";
        assert!(
            FontFamily::Display.metrics().measure(text, 12.0)
                < FontFamily::Serif.metrics().measure(text, 12.0)
        );
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = FontFamily::Sans.metrics().wrap_lines("Engineer at Acme", 400.0, 10.0);
        assert_eq!(lines, vec!["Engineer at Acme".to_string()]);
    }

    #[test]
    fn test_wrap_blank_text_yields_nothing() {
        assert!(FontFamily::Sans.metrics().wrap_lines("  \n ", 400.0, 10.0).is_empty());
    }

    #[test]
    fn test_wrap_respects_width() {
        let m = FontFamily::Sans.metrics();
        let text = "Architected a distributed caching layer reducing p99 latency by forty percent under peak load";
        let lines = m.wrap_lines(text, 150.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(m.measure(line, 10.0) <= 150.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_honours_explicit_newlines() {
        let lines = FontFamily::Sans.metrics().wrap_lines("first\nsecond", 400.0, 10.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let m = FontFamily::Sans.metrics();
        let url = "https://example.com/a/very/long/path/that/cannot/fit/on/one/line";
        let lines = m.wrap_lines(url, 60.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
        for line in &lines {
            assert!(m.measure(line, 10.0) <= 60.0);
        }
    }
}
