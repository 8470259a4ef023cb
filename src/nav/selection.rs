//! Logical chart selection: variant, line, and single-glyph cursor.
//!
//! Line changes made by the size keys always leave single-glyph mode and
//! rewind to glyph 0. Glyph stepping sweeps across line boundaries: stepping
//! forward off the end of a line lands on glyph 0 of the next line, stepping
//! back off glyph 0 lands on the last glyph of the previous line, and both are
//! no-ops at the absolute ends of the chart.

use crate::charts::{ChartLine, ChartVariant};

/// A (line, glyph) position inside a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphPos {
    pub line: usize,
    pub glyph: usize,
}

/// Next position in reading order, or `None` at the absolute end.
#[must_use]
pub fn step_forward(lines: &[ChartLine], pos: GlyphPos) -> Option<GlyphPos> {
    let line = lines.get(pos.line)?;
    if pos.glyph + 1 < line.glyphs.len() {
        return Some(GlyphPos {
            line: pos.line,
            glyph: pos.glyph + 1,
        });
    }
    if pos.line + 1 < lines.len() {
        return Some(GlyphPos {
            line: pos.line + 1,
            glyph: 0,
        });
    }
    None
}

/// Previous position in reading order, or `None` at the absolute start.
#[must_use]
pub fn step_backward(lines: &[ChartLine], pos: GlyphPos) -> Option<GlyphPos> {
    if lines.get(pos.line).is_none() {
        return None;
    }
    if pos.glyph > 0 {
        return Some(GlyphPos {
            line: pos.line,
            glyph: pos.glyph - 1,
        });
    }
    if pos.line > 0 {
        let line = pos.line - 1;
        return Some(GlyphPos {
            line,
            glyph: lines[line].last_index(),
        });
    }
    None
}

/// True when no backward step exists.
#[must_use]
pub fn is_absolute_start(lines: &[ChartLine], pos: GlyphPos) -> bool {
    step_backward(lines, pos).is_none()
}

/// True when no forward step exists.
#[must_use]
pub fn is_absolute_end(lines: &[ChartLine], pos: GlyphPos) -> bool {
    step_forward(lines, pos).is_none()
}

/// Direction of a line change. Larger optotypes sit at lower indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStep {
    /// Previous line (bigger optotypes).
    Larger,
    /// Next line (smaller optotypes).
    Smaller,
}

/// The chart the user is looking at and where inside it.
///
/// Invariants: `line_index < lines.len()`; `glyph_index <= last_index` of the
/// current line; `glyph_index == 0` whenever single-glyph mode is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub variant: ChartVariant,
    pub line_index: usize,
    pub single_glyph: bool,
    pub glyph_index: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(ChartVariant::default())
    }
}

impl Selection {
    #[must_use]
    pub const fn new(variant: ChartVariant) -> Self {
        Self {
            variant,
            line_index: 0,
            single_glyph: false,
            glyph_index: 0,
        }
    }

    #[must_use]
    pub const fn lines(&self) -> &'static [ChartLine] {
        self.variant.lines()
    }

    #[must_use]
    pub fn current_line(&self) -> Option<&'static ChartLine> {
        self.lines().get(self.line_index)
    }

    /// Glyph under the single-glyph cursor; `None` on an empty line.
    #[must_use]
    pub fn current_glyph(&self) -> Option<&'static str> {
        self.current_line()?.glyph(self.glyph_index)
    }

    /// Glyphs the rendering surface must draw, tagged with their index in the
    /// line: the whole line, or exactly the one under the cursor.
    #[must_use]
    pub fn visible_glyphs(&self) -> Vec<(usize, &'static str)> {
        let Some(line) = self.current_line() else {
            return Vec::new();
        };
        if self.single_glyph {
            line.glyph(self.glyph_index)
                .map(|glyph| vec![(self.glyph_index, glyph)])
                .unwrap_or_default()
        } else {
            line.glyphs.iter().copied().enumerate().collect()
        }
    }

    #[must_use]
    pub const fn position(&self) -> GlyphPos {
        GlyphPos {
            line: self.line_index,
            glyph: self.glyph_index,
        }
    }

    /// Switch chart family. Always a full reset.
    pub fn select_variant(&mut self, variant: ChartVariant) {
        *self = Self::new(variant);
    }

    /// Back to the first line of the current chart, full-line mode.
    pub fn reset(&mut self) {
        *self = Self::new(self.variant);
    }

    #[must_use]
    pub fn is_first_line(&self) -> bool {
        self.line_index == 0
    }

    #[must_use]
    pub fn is_last_line(&self) -> bool {
        self.line_index + 1 >= self.lines().len()
    }

    /// Move one line, clamped at both ends. Leaves single-glyph mode and
    /// rewinds the glyph cursor even when the line does not change.
    /// Returns `true` when the line index moved.
    pub fn step_line(&mut self, step: LineStep) -> bool {
        let before = self.line_index;
        self.line_index = match step {
            LineStep::Larger => self.line_index.saturating_sub(1),
            LineStep::Smaller => {
                let last = self.lines().len().saturating_sub(1);
                (self.line_index + 1).min(last)
            }
        };
        self.single_glyph = false;
        self.glyph_index = 0;
        before != self.line_index
    }

    /// Flip single-glyph mode. The cursor rewinds to glyph 0 both ways.
    pub fn toggle_single_glyph(&mut self) {
        self.single_glyph = !self.single_glyph;
        self.glyph_index = 0;
    }

    /// Enter single-glyph mode on the first glyph of the line.
    pub fn enter_single_glyph_at_start(&mut self) {
        self.single_glyph = true;
        self.glyph_index = 0;
    }

    /// Enter single-glyph mode on the last glyph of the line.
    pub fn enter_single_glyph_at_end(&mut self) {
        self.single_glyph = true;
        self.glyph_index = self.current_line().map_or(0, ChartLine::last_index);
    }

    /// One glyph forward across line boundaries. Returns `true` if it moved.
    pub fn step_glyph_forward(&mut self) -> bool {
        self.apply_step(step_forward(self.lines(), self.position()))
    }

    /// One glyph backward across line boundaries. Returns `true` if it moved.
    pub fn step_glyph_backward(&mut self) -> bool {
        self.apply_step(step_backward(self.lines(), self.position()))
    }

    #[must_use]
    pub fn at_absolute_start(&self) -> bool {
        is_absolute_start(self.lines(), self.position())
    }

    #[must_use]
    pub fn at_absolute_end(&self) -> bool {
        is_absolute_end(self.lines(), self.position())
    }

    /// Re-establish the index invariants after an external edit.
    pub fn clamp(&mut self) {
        let last_line = self.lines().len().saturating_sub(1);
        self.line_index = self.line_index.min(last_line);
        let last_glyph = self.current_line().map_or(0, ChartLine::last_index);
        self.glyph_index = if self.single_glyph {
            self.glyph_index.min(last_glyph)
        } else {
            0
        };
    }

    fn apply_step(&mut self, next: Option<GlyphPos>) -> bool {
        match next {
            Some(pos) => {
                self.line_index = pos.line;
                self.glyph_index = pos.glyph;
                true
            }
            None => false,
        }
    }
}
