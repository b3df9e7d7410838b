//! Deterministic label-text measurement.
//!
//! Overlay labels need a measured size so renderers can size the text
//! background box before drawing. There is no ambient font system here, so
//! measurement uses a fixed glyph-class model: every glyph advances by a
//! fraction of the font size chosen by its width class. Same string and
//! font size always measure the same on every platform.

use crate::geometry::Size;

const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Text measurement for a single font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    font_size: f32,
}

impl TextMetrics {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Measure a single-line string.
    pub fn measure(&self, text: &str) -> Size {
        let width: f32 = text.chars().map(|ch| self.advance(ch)).sum();
        Size::new(width, self.font_size * LINE_HEIGHT_FACTOR)
    }

    fn advance(&self, ch: char) -> f32 {
        let fraction = match ch {
            'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | '!' | '|' => 0.30,
            'f' | 't' | 'r' | 's' | ' ' | '(' | ')' | '[' | ']' | '-' => 0.40,
            'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.85,
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.66,
            _ => 0.55,
        };
        self.font_size * fraction
    }
}
