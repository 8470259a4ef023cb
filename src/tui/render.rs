//! Frame drawing with crossterm.
//!
//! Rendering reads the model and a precomputed [`SurfaceLayout`]; it never
//! mutates navigation state. Landolt C orientations are the only state the
//! renderer owns: they are re-rolled whenever the chart or line changes so
//! that a reader cannot memorise the gaps.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::charts::ChartVariant;
use crate::nav::input::legend;
use crate::nav::model::{NavModel, View};
use crate::nav::targets::Target;
use crate::nav::VirtualCursor;

use super::layout::{ButtonPlacement, CellRect, SurfaceLayout};

// ──────────────────── landolt orientation ────────────────────

/// Direction the Landolt C gap faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDirection {
    Right,
    Down,
    Left,
    Up,
}

impl GapDirection {
    pub const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// Terminal stand-in for the rotated ring.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Right => "C",
            Self::Down => "∩",
            Self::Left => "Ɔ",
            Self::Up => "U",
        }
    }
}

/// Per-line random orientations, stable while the line is shown.
#[derive(Debug)]
pub struct Orientations {
    rng: StdRng,
    key: Option<(ChartVariant, usize)>,
    gaps: Vec<GapDirection>,
}

impl Orientations {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            key: None,
            gaps: Vec::new(),
        }
    }

    /// Orientations for the model's current line. Re-rolls on a chart or
    /// line change; empty for charts that do not rotate.
    pub fn for_model(&mut self, model: &NavModel) -> &[GapDirection] {
        let variant = model.selection.variant;
        if !variant.is_rotatable() {
            self.key = None;
            self.gaps.clear();
            return &self.gaps;
        }
        let key = (variant, model.selection.line_index);
        if self.key != Some(key) {
            let count = model.selection.current_line().map_or(0, |l| l.glyphs.len());
            self.gaps = (0..count)
                .map(|_| GapDirection::ALL[self.rng.random_range(0..GapDirection::ALL.len())])
                .collect();
            self.key = Some(key);
        }
        &self.gaps
    }
}

// ──────────────────── frame ────────────────────

/// Everything a single frame needs.
pub struct Frame<'a> {
    pub model: &'a NavModel,
    pub layout: &'a SurfaceLayout,
    pub focused: Option<Target>,
    pub cursor: &'a VirtualCursor,
    /// Transient one-line message (e.g. a rejected fullscreen request).
    pub status: Option<&'a str>,
}

/// Draw one frame and flush.
pub fn draw<W: Write>(out: &mut W, frame: &Frame<'_>, orientations: &mut Orientations) -> io::Result<()> {
    let layout = frame.layout;
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    if layout.too_small {
        queue!(
            out,
            MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Terminal too small ({}x{}); enlarge the window.",
                layout.cols, layout.rows
            )),
            SetAttribute(Attribute::Reset),
        )?;
        return out.flush();
    }

    match frame.model.view {
        View::Landing => draw_landing(out, frame)?,
        View::Calibration => draw_calibration(out, frame)?,
        View::ChartDisplay => draw_chart(out, frame, orientations)?,
    }

    for button in &layout.buttons {
        draw_button(out, button, frame.focused == Some(button.target))?;
    }

    if layout.chrome {
        draw_legend(out, frame)?;
    }
    if let Some(status) = frame.status {
        queue!(
            out,
            MoveTo(0, 1),
            SetForegroundColor(Color::Yellow),
            Print(truncate(status, usize::from(layout.cols))),
            SetAttribute(Attribute::Reset),
        )?;
    }
    if frame.cursor.enabled {
        draw_cursor(out, frame)?;
    }
    out.flush()
}

fn draw_landing<W: Write>(out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
    let cols = frame.layout.cols;
    let title = "Visual Acuity Chart";
    queue!(
        out,
        MoveTo(centered_col(cols, title), 1),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(title),
        SetAttribute(Attribute::Reset),
    )?;
    let hint = "Choose a chart, or calibrate the screen first";
    queue!(
        out,
        MoveTo(centered_col(cols, hint), 3),
        SetForegroundColor(Color::DarkGrey),
        Print(hint),
        SetAttribute(Attribute::Reset),
    )?;

    // Card bodies: preview glyph above the button row the layout placed.
    for button in &frame.layout.buttons {
        let preview = match button.target {
            Target::ChartCard(variant) => variant.preview_glyph(),
            Target::Calibrate => "▭",
            _ => continue,
        };
        let (col, _) = button.rect.center();
        queue!(
            out,
            MoveTo(col, button.rect.row + 1),
            SetAttribute(Attribute::Bold),
            Print(preview),
            SetAttribute(Attribute::Reset),
        )?;
    }
    Ok(())
}

fn draw_calibration<W: Write>(out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
    let model = frame.model;
    let cols = frame.layout.cols;
    let title = "Calibrate: match the box to a bank card";
    queue!(
        out,
        MoveTo(centered_col(cols, title), 1),
        SetForegroundColor(Color::Cyan),
        Print(title),
        SetAttribute(Attribute::Reset),
    )?;
    if let Some(rect) = frame.layout.calibration_box {
        draw_frame(out, rect, Color::White)?;
        let info = format!(
            "{} px wide  ({:.2} px/mm)",
            model.calibration_width_px,
            crate::calibration::pixels_per_mm_from_width(model.calibration_width_px)
        );
        queue!(
            out,
            MoveTo(centered_col(cols, &info), rect.row + rect.height + 1),
            SetForegroundColor(Color::DarkGrey),
            Print(info),
            SetAttribute(Attribute::Reset),
        )?;
    }
    Ok(())
}

fn draw_chart<W: Write>(out: &mut W, frame: &Frame<'_>, orientations: &mut Orientations) -> io::Result<()> {
    let model = frame.model;
    let layout = frame.layout;

    if layout.chrome
        && let Some(line) = model.selection.current_line()
    {
        let label = format!(
            "{}  ·  {}  ·  line {}/{}",
            model.selection.variant.title(),
            line.acuity,
            model.selection.line_index + 1,
            model.selection.lines().len()
        );
        queue!(
            out,
            MoveTo(centered_col(layout.cols, &label), 0),
            SetForegroundColor(Color::Cyan),
            Print(label),
            SetAttribute(Attribute::Reset),
        )?;
    }

    let gaps = orientations.for_model(model);
    let single = model.selection.single_glyph;
    for placed in &layout.glyphs {
        let text = gaps.get(placed.index).map_or(placed.glyph, |g| g.glyph());
        if placed.rect.width > 2 && placed.rect.height > 2 {
            let color = if single { Color::Yellow } else { Color::DarkGrey };
            draw_frame(out, placed.rect, color)?;
        }
        let (col, row) = placed.rect.center();
        queue!(
            out,
            MoveTo(col, row),
            SetForegroundColor(Color::White),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
        )?;
    }
    Ok(())
}

fn draw_button<W: Write>(out: &mut W, button: &ButtonPlacement, focused: bool) -> io::Result<()> {
    let rect = button.rect;
    let label = button.target.label();
    let color = match (button.enabled, focused) {
        (false, _) => Color::DarkGrey,
        (true, true) => Color::Black,
        (true, false) => Color::White,
    };
    if rect.height > 2 {
        draw_frame(out, rect, if focused { Color::Yellow } else { color })?;
        let row = rect.row + rect.height - 2;
        queue!(out, MoveTo(rect.col + 2, row))?;
    } else {
        queue!(out, MoveTo(rect.col, rect.row))?;
    }
    if focused {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    let text = if rect.height > 2 {
        label.to_string()
    } else {
        format!("[ {label} ]")
    };
    queue!(
        out,
        SetForegroundColor(color),
        Print(text),
        SetAttribute(Attribute::Reset),
    )
}

fn draw_legend<W: Write>(out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
    let line = legend(frame.model.view)
        .iter()
        .map(|b| format!("{} {}", b.keys, b.description))
        .collect::<Vec<_>>()
        .join("   ");
    let row = frame.layout.rows.saturating_sub(1);
    queue!(
        out,
        MoveTo(0, row),
        SetForegroundColor(Color::DarkGrey),
        Print(truncate(&line, usize::from(frame.layout.cols))),
        SetAttribute(Attribute::Reset),
    )
}

fn draw_cursor<W: Write>(out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
    let (col, row) = frame.layout.cell_at_px(frame.cursor.x, frame.cursor.y);
    let col = col.min(frame.layout.cols.saturating_sub(1));
    let row = row.min(frame.layout.rows.saturating_sub(1));
    queue!(
        out,
        MoveTo(col, row),
        SetForegroundColor(Color::Magenta),
        SetAttribute(Attribute::Bold),
        Print("✛"),
        SetAttribute(Attribute::Reset),
    )
}

fn draw_frame<W: Write>(out: &mut W, rect: CellRect, color: Color) -> io::Result<()> {
    if rect.width < 2 || rect.height < 2 {
        return Ok(());
    }
    let inner = usize::from(rect.width - 2);
    let bottom = rect.row + rect.height - 1;
    queue!(
        out,
        SetForegroundColor(color),
        MoveTo(rect.col, rect.row),
        Print(format!("┌{}┐", "─".repeat(inner))),
        MoveTo(rect.col, bottom),
        Print(format!("└{}┘", "─".repeat(inner))),
    )?;
    for row in rect.row + 1..bottom {
        queue!(
            out,
            MoveTo(rect.col, row),
            Print("│"),
            MoveTo(rect.col + rect.width - 1, row),
            Print("│"),
        )?;
    }
    queue!(out, SetAttribute(Attribute::Reset))
}

fn centered_col(cols: u16, text: &str) -> u16 {
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    cols.saturating_sub(width) / 2
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
