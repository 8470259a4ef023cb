//! Scenario drills: multi-step remote-control workflows driven through the
//! controller exactly as the terminal host drives it.

use super::controller::Controller;
use super::cursor::{HitTest, NoSurface, Viewport};
use super::focus::{self, FocusPlan};
use super::input::NavKey;
use super::model::{ChartSubMode, Effect, NavModel, NavMsg, View};
use super::selection::{GlyphPos, is_absolute_end, step_forward};
use super::targets::Target;
use crate::charts::{ChartLine, ChartVariant, LineSpacing};

const VIEWPORT: Viewport = Viewport::new(800, 480);

fn press_all(ctl: &mut Controller, keys: &[NavKey]) {
    for &key in keys {
        ctl.handle_key(key, &NoSurface);
    }
}

/// Surface with a single clickable rectangle.
struct OneButton {
    target: Target,
    x: std::ops::Range<u32>,
    y: std::ops::Range<u32>,
}

impl HitTest for OneButton {
    fn hit(&self, x: u32, y: u32) -> Option<Target> {
        (self.x.contains(&x) && self.y.contains(&y)).then_some(self.target)
    }
}

// ──────────────────── glyph sweep ────────────────────

const fn stair(glyphs: &'static [&'static str]) -> ChartLine {
    ChartLine {
        acuity: "6/6",
        glyphs,
        height_mm: 10.0,
        spacing: LineSpacing::Tight,
    }
}

#[test]
fn staircase_chart_sweeps_in_twenty_seven_presses() {
    const LINES: &[ChartLine] = &[
        stair(&["1"]),
        stair(&["1", "2"]),
        stair(&["1", "2", "3"]),
        stair(&["1", "2", "3", "4"]),
        stair(&["1", "2", "3", "4", "5"]),
        stair(&["1", "2", "3", "4", "5", "6"]),
        stair(&["1", "2", "3", "4", "5", "6", "7"]),
    ];
    let mut pos = GlyphPos::default();
    for _ in 0..27 {
        pos = step_forward(LINES, pos).unwrap();
    }
    assert_eq!(pos, GlyphPos { line: 6, glyph: 6 });
    assert!(is_absolute_end(LINES, pos));
    // 28th press.
    assert_eq!(step_forward(LINES, pos), None);
}

#[test]
fn snellen_sweep_through_controller_stops_at_last_glyph() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::Snellen), VIEWPORT);
    ctl.handle_key(NavKey::Right, &NoSurface); // enter single-glyph mode
    let total = ChartVariant::Snellen.glyph_count();
    for _ in 0..total - 1 {
        ctl.handle_key(NavKey::Right, &NoSurface);
    }
    let end = ctl.model().selection;
    assert_eq!(end.line_index, 7);
    assert_eq!(end.glyph_index, 7);
    assert!(end.single_glyph);

    let t = ctl.handle_key(NavKey::Right, &NoSurface);
    assert!(t.consumed);
    assert_eq!(ctl.model().selection, end);
}

// ──────────────────── virtual cursor ────────────────────

#[test]
fn virtual_cursor_suppresses_navigation_then_resumes() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::Hindi), VIEWPORT);
    press_all(&mut ctl, &[NavKey::Down, NavKey::Down, NavKey::Right, NavKey::Right]);
    let before = ctl.model().clone();

    ctl.handle_key(NavKey::ToggleMouse, &NoSurface);
    for key in [
        NavKey::Up,
        NavKey::Left,
        NavKey::Escape,
        NavKey::Enter,
        NavKey::ToggleFullscreen,
    ] {
        let t = ctl.handle_key(key, &NoSurface);
        assert!(t.consumed, "{key:?} leaked");
        assert!(
            !t.effects
                .iter()
                .any(|e| matches!(e, Effect::EnterFullscreen | Effect::Activate(_))),
            "{key:?} produced navigation effects"
        );
    }
    assert_eq!(ctl.model(), &before);
    assert_eq!((ctl.cursor().x, ctl.cursor().y), (380, 220));

    ctl.handle_key(NavKey::ToggleMouse, &NoSurface);
    assert!(!ctl.cursor().enabled);
    assert_eq!(ctl.model(), &before);

    ctl.handle_key(NavKey::Right, &NoSurface);
    assert_eq!(ctl.model().selection.glyph_index, 2);
}

#[test]
fn virtual_cursor_walks_to_button_and_clicks() {
    let mut ctl = Controller::new(NavModel::default(), VIEWPORT);
    let calibrate = OneButton {
        target: Target::Calibrate,
        x: 440..520,
        y: 200..260,
    };
    ctl.handle_key(NavKey::ToggleMouse, &calibrate);
    // 400 → 440 and the click lands inside.
    press_all(&mut ctl, &[NavKey::Right, NavKey::Right]);
    let t = ctl.handle_key(NavKey::Enter, &calibrate);
    assert_eq!(t.effects[0], Effect::Activate(Target::Calibrate));
    assert_eq!(ctl.model().view, View::Calibration);
    // A pointer press leaves the keyboard focus cursor alone.
    assert_eq!(ctl.model().calibration_focus, 0);
}

// ──────────────────── focus list shrink ────────────────────

#[test]
fn control_bar_shrink_reclamps_without_focusing_removed_control() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::Snellen), VIEWPORT);
    press_all(&mut ctl, &[NavKey::Down, NavKey::Enter]); // single-glyph on
    press_all(&mut ctl, &[NavKey::Escape]);
    assert_eq!(ctl.model().targets().len(), 11);

    // Walk to GlyphNext (index 8).
    for _ in 0..8 {
        ctl.handle_key(NavKey::Right, &NoSurface);
    }
    assert_eq!(focus::resolve_activation(ctl.model()), Some(Target::GlyphNext));
    let t = ctl.handle_key(NavKey::Enter, &NoSurface);
    assert_eq!(t.effects.last(), Some(&Effect::Focus(Target::GlyphNext)));
    assert_eq!(ctl.model().selection.glyph_index, 1);

    // Drop to the last control and leave single-glyph mode via a variant pick.
    for _ in 0..2 {
        ctl.handle_key(NavKey::Right, &NoSurface);
    }
    assert_eq!(ctl.model().controls_focus, 10);
    let t = ctl.dispatch(NavMsg::Press(Target::Variant(ChartVariant::Snellen)));
    assert_eq!(ctl.model().targets().len(), 9);
    assert_eq!(ctl.model().controls_focus, 8);
    assert_eq!(t.effects.last(), Some(&Effect::Focus(Target::Fullscreen)));
    assert!(matches!(
        focus::plan(ctl.model()),
        FocusPlan::Grant { index: 8, target: Target::Fullscreen }
    ));
}

// ──────────────────── full sessions ────────────────────

#[test]
fn calibrate_then_read_chart() {
    let mut ctl = Controller::new(NavModel::default(), VIEWPORT);

    // Landing: Left wraps to Calibrate.
    ctl.handle_key(NavKey::Left, &NoSurface);
    ctl.handle_key(NavKey::Enter, &NoSurface);
    assert_eq!(ctl.model().view, View::Calibration);
    assert_eq!(ctl.model().calibration_width_px, 231);

    for _ in 0..17 {
        ctl.handle_key(NavKey::Down, &NoSurface);
    }
    assert_eq!(ctl.model().calibration_width_px, 214);
    ctl.handle_key(NavKey::Left, &NoSurface); // Save
    let t = ctl.handle_key(NavKey::Enter, &NoSurface);
    let persisted: Vec<f64> = t
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::PersistCalibration(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(persisted.len(), 1);
    assert!((persisted[0] - 2.5).abs() < 1e-9);
    assert_eq!(ctl.model().view, View::Landing);
    // Landing focus was left on Calibrate.
    assert_eq!(t.effects.last(), Some(&Effect::Focus(Target::Calibrate)));

    // Open the numeric chart and read down two lines.
    ctl.handle_key(NavKey::Right, &NoSurface); // wraps to Snellen card
    ctl.handle_key(NavKey::Right, &NoSurface);
    ctl.handle_key(NavKey::Right, &NoSurface);
    ctl.handle_key(NavKey::Enter, &NoSurface);
    assert_eq!(ctl.model().selection.variant, ChartVariant::Numeric);
    press_all(&mut ctl, &[NavKey::Down, NavKey::Down]);
    let px = ctl.model().current_font_px().unwrap();
    assert!((px - 35.5 * 2.5 * 1.4).abs() < 1e-9);
}

#[test]
fn fullscreen_round_trip_with_host_notifications() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::LandoltC), VIEWPORT);
    let t = ctl.handle_key(NavKey::ToggleFullscreen, &NoSurface);
    assert_eq!(t.effects[0], Effect::EnterFullscreen);
    ctl.dispatch(NavMsg::FullscreenChanged(true));

    // Escape while fullscreen asks the host to leave, without opening controls.
    let t = ctl.handle_key(NavKey::Escape, &NoSurface);
    assert_eq!(t.effects[0], Effect::ExitFullscreen);
    assert_eq!(ctl.model().sub_mode, ChartSubMode::Display);
    ctl.dispatch(NavMsg::FullscreenChanged(false));

    ctl.handle_key(NavKey::Escape, &NoSurface);
    assert_eq!(ctl.model().sub_mode, ChartSubMode::ControlBar);
}

#[test]
fn rejected_fullscreen_leaves_state_alone() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::Snellen), VIEWPORT);
    let before = ctl.model().clone();
    ctl.handle_key(NavKey::ToggleFullscreen, &NoSurface);
    // The host never confirms; nothing changes.
    assert_eq!(ctl.model(), &before);
    assert!(!ctl.model().fullscreen);
}

#[test]
fn home_then_quit() {
    let mut ctl = Controller::new(NavModel::default().open_chart(ChartVariant::Snellen), VIEWPORT);
    press_all(&mut ctl, &[NavKey::Escape, NavKey::Enter]);
    assert_eq!(ctl.model().view, View::Landing);
    let t = ctl.handle_key(NavKey::Quit, &NoSurface);
    assert!(t.effects.contains(&Effect::Quit));
}
