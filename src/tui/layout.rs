//! Cell-grid layout for the terminal surface.
//!
//! Every terminal cell is assigned a pixel size, so the pixel-domain contract
//! of the navigation core (virtual cursor coordinates, optotype font sizes,
//! hit testing) maps onto the grid. [`build_layout`] is pure: the same model
//! and terminal size always produce the same placements, and the resulting
//! [`SurfaceLayout`] doubles as the hit map for the virtual cursor.

#![allow(missing_docs)]

use crate::calibration::card_height_px;
use crate::core::config::DisplayConfig;
use crate::nav::model::{NavModel, View};
use crate::nav::targets::Target;
use crate::nav::{HitTest, Viewport};

/// Below this the surface shows a "too small" notice and nothing clickable.
pub const MIN_USABLE_COLS: u16 = 40;
pub const MIN_USABLE_ROWS: u16 = 12;

const BUTTON_GAP: u16 = 1;
const CARD_HEIGHT: u16 = 5;

#[must_use]
pub const fn is_terminal_too_small(cols: u16, rows: u16) -> bool {
    cols < MIN_USABLE_COLS || rows < MIN_USABLE_ROWS
}

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for CellSize {
    fn from(cfg: &DisplayConfig) -> Self {
        Self {
            width_px: cfg.cell_width_px.max(1),
            height_px: cfg.cell_height_px.max(1),
        }
    }
}

impl CellSize {
    /// Whole cells needed to cover `px` horizontally (at least one).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cols_for(self, px: f64) -> u16 {
        let cells = (px / f64::from(self.width_px)).round();
        if cells.is_finite() && cells >= 1.0 {
            cells.min(f64::from(u16::MAX)) as u16
        } else {
            1
        }
    }

    /// Whole cells needed to cover `px` vertically (at least one).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rows_for(self, px: f64) -> u16 {
        let cells = (px / f64::from(self.height_px)).round();
        if cells.is_finite() && cells >= 1.0 {
            cells.min(f64::from(u16::MAX)) as u16
        } else {
            1
        }
    }
}

/// Rectangle in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    #[must_use]
    pub const fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn contains(self, col: u16, row: u16) -> bool {
        col >= self.col
            && row >= self.row
            && (col as u32) < self.col as u32 + self.width as u32
            && (row as u32) < self.row as u32 + self.height as u32
    }

    /// Centre cell.
    #[must_use]
    pub const fn center(self) -> (u16, u16) {
        (self.col + self.width / 2, self.row + self.height / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPlacement {
    pub target: Target,
    pub rect: CellRect,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    /// Index of the glyph inside its line.
    pub index: usize,
    pub glyph: &'static str,
    pub rect: CellRect,
}

/// Everything the renderer draws and the virtual cursor can hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayout {
    pub cols: u16,
    pub rows: u16,
    pub cell: CellSize,
    pub too_small: bool,
    /// Title, acuity label and legend rows are drawn.
    pub chrome: bool,
    pub buttons: Vec<ButtonPlacement>,
    pub glyphs: Vec<GlyphPlacement>,
    pub calibration_box: Option<CellRect>,
    /// Optotype font size for the current line, in pixels.
    pub font_px: Option<f64>,
}

impl SurfaceLayout {
    /// Surface size in pixels.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            u32::from(self.cols) * self.cell.width_px,
            u32::from(self.rows) * self.cell.height_px,
        )
    }

    #[must_use]
    pub fn button(&self, target: Target) -> Option<&ButtonPlacement> {
        self.buttons.iter().find(|b| b.target == target)
    }

    /// Whether `target` has an element on the surface right now.
    #[must_use]
    pub fn is_mounted(&self, target: Target) -> bool {
        self.button(target).is_some()
    }

    /// Pixel position of a cell's top-left corner.
    #[must_use]
    pub fn cell_origin_px(&self, col: u16, row: u16) -> (u32, u32) {
        (
            u32::from(col) * self.cell.width_px,
            u32::from(row) * self.cell.height_px,
        )
    }

    /// Cell containing a pixel coordinate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at_px(&self, x: u32, y: u32) -> (u16, u16) {
        let col = (x / self.cell.width_px).min(u32::from(u16::MAX)) as u16;
        let row = (y / self.cell.height_px).min(u32::from(u16::MAX)) as u16;
        (col, row)
    }
}

impl HitTest for SurfaceLayout {
    fn hit(&self, x: u32, y: u32) -> Option<Target> {
        let (col, row) = self.cell_at_px(x, y);
        self.buttons
            .iter()
            .find(|b| b.rect.contains(col, row))
            .map(|b| b.target)
    }
}

/// Lay out the current view.
#[must_use]
pub fn build_layout(model: &NavModel, cols: u16, rows: u16, cell: CellSize) -> SurfaceLayout {
    let mut layout = SurfaceLayout {
        cols,
        rows,
        cell,
        too_small: is_terminal_too_small(cols, rows),
        chrome: !(model.view == View::ChartDisplay && model.fullscreen),
        buttons: Vec::new(),
        glyphs: Vec::new(),
        calibration_box: None,
        font_px: None,
    };
    if layout.too_small {
        return layout;
    }
    match model.view {
        View::Landing => layout_landing(model, &mut layout),
        View::Calibration => layout_calibration(model, &mut layout),
        View::ChartDisplay => layout_chart(model, &mut layout),
    }
    layout
}

fn label_width(target: Target) -> u16 {
    u16::try_from(target.label().chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
}

/// Flow fixed-size items left to right, centred, wrapping into extra rows.
/// Returns one rect per item, in order.
fn flow(widths: &[u16], height: u16, top: u16, cols: u16) -> Vec<CellRect> {
    let mut rows: Vec<Vec<u16>> = vec![Vec::new()];
    let mut used = 0u16;
    for &width in widths {
        let needed = if used == 0 { width } else { used + BUTTON_GAP + width };
        if needed > cols && used > 0 {
            rows.push(Vec::new());
            used = width;
        } else {
            used = needed;
        }
        if let Some(row) = rows.last_mut() {
            row.push(width);
        }
    }

    let mut rects = Vec::with_capacity(widths.len());
    for (line, row) in rows.iter().enumerate() {
        let total: u16 = row.iter().sum::<u16>()
            + BUTTON_GAP * u16::try_from(row.len().saturating_sub(1)).unwrap_or(0);
        let mut col = cols.saturating_sub(total) / 2;
        let top = top + u16::try_from(line).unwrap_or(0) * (height + 1);
        for &width in row {
            rects.push(CellRect::new(col, top, width.min(cols), height));
            col = col.saturating_add(width + BUTTON_GAP);
        }
    }
    rects
}

/// Rows a flowed block of buttons occupies.
fn flow_rows(widths: &[u16], cols: u16) -> u16 {
    let rects = flow(widths, 1, 0, cols);
    rects.last().map_or(0, |r| r.row / 2 + 1)
}

fn place_buttons(model: &NavModel, layout: &mut SurfaceLayout, targets: &[Target], widths: &[u16], height: u16, top: u16) {
    let rects = flow(widths, height, top, layout.cols);
    layout.buttons.extend(targets.iter().zip(rects).map(|(&target, rect)| ButtonPlacement {
        target,
        rect,
        enabled: target.is_enabled(&model.selection),
    }));
}

fn layout_landing(model: &NavModel, layout: &mut SurfaceLayout) {
    let targets = model.targets();
    let card_width = targets.iter().copied().map(label_width).max().unwrap_or(8);
    let widths = vec![card_width; targets.len()];
    let top = (layout.rows / 2).saturating_sub(CARD_HEIGHT / 2);
    place_buttons(model, layout, &targets, &widths, CARD_HEIGHT, top);
}

fn layout_calibration(model: &NavModel, layout: &mut SurfaceLayout) {
    let cell = layout.cell;
    let width_px = f64::from(model.calibration_width_px);
    let box_cols = cell.cols_for(width_px).min(layout.cols.saturating_sub(2));
    let box_rows = cell
        .rows_for(card_height_px(model.calibration_width_px))
        .min(layout.rows.saturating_sub(8));
    let box_rect = CellRect::new(
        layout.cols.saturating_sub(box_cols) / 2,
        3,
        box_cols,
        box_rows.max(1),
    );
    layout.calibration_box = Some(box_rect);

    let targets = model.targets();
    let widths: Vec<u16> = targets.iter().copied().map(label_width).collect();
    let top = box_rect.row + box_rect.height + 2;
    place_buttons(model, layout, &targets, &widths, 1, top);
}

fn layout_chart(model: &NavModel, layout: &mut SurfaceLayout) {
    let cell = layout.cell;
    let cols = layout.cols;

    // Chrome: acuity label on row 0, control bar above the legend row.
    let (area_top, area_bottom) = if layout.chrome {
        let targets = model.targets();
        let widths: Vec<u16> = targets.iter().copied().map(label_width).collect();
        let bar_rows = flow_rows(&widths, cols);
        let bar_top = layout.rows.saturating_sub(1 + bar_rows * 2);
        place_buttons(model, layout, &targets, &widths, 1, bar_top);
        (2, bar_top.saturating_sub(1))
    } else {
        (0, layout.rows)
    };

    let Some(font_px) = model.current_font_px() else {
        return;
    };
    layout.font_px = Some(font_px);

    let visible = model.selection.visible_glyphs();
    if visible.is_empty() {
        return;
    }
    let area_height = area_bottom.saturating_sub(area_top).max(1);
    let glyph_rows = cell.rows_for(font_px).min(area_height);
    let glyph_cols = cell.cols_for(font_px).min(cols);
    let count = u16::try_from(visible.len()).unwrap_or(u16::MAX);
    let gap = (glyph_cols / 2).max(1);
    let total = glyph_cols
        .saturating_mul(count)
        .saturating_add(gap.saturating_mul(count - 1));
    let mut col = cols.saturating_sub(total) / 2;
    let row = area_top + area_height.saturating_sub(glyph_rows) / 2;
    for (index, glyph) in visible {
        layout.glyphs.push(GlyphPlacement {
            index,
            glyph,
            rect: CellRect::new(col, row, glyph_cols, glyph_rows),
        });
        col = col.saturating_add(glyph_cols).saturating_add(gap);
    }
}
