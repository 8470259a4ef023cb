//! Pure reducer for the navigation core.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a [`Transition`] describing whether the event was consumed and
//! which side effects the host should execute.
//!
//! **Design invariant:** this module performs zero I/O. The virtual cursor
//! lives one level up in [`super::controller`]; by the time a key reaches
//! this function it is meant for view navigation.

use crate::calibration::pixels_per_mm_from_width;

use super::focus;
use super::input::NavKey;
use super::model::{ChartSubMode, Effect, NavModel, NavMsg, Transition, View};
use super::selection::LineStep;
use super::targets::Target;

/// Apply a message to the model.
///
/// Every state change goes through here. The current view's focus cursor is
/// re-clamped before returning, so it is always a valid index into the
/// current focusable list.
pub fn update(model: &mut NavModel, msg: NavMsg) -> Transition {
    let transition = match msg {
        NavMsg::Key(key) => handle_key(model, key),
        NavMsg::Press(target) => press(model, target),
        NavMsg::FullscreenChanged(active) => {
            model.fullscreen = active;
            if active {
                model.sub_mode = ChartSubMode::Display;
            }
            Transition::consumed()
        }
    };
    focus::reclamp(model);
    transition
}

fn handle_key(model: &mut NavModel, key: NavKey) -> Transition {
    match model.view {
        View::Landing => landing_key(model, key),
        View::Calibration => calibration_key(model, key),
        View::ChartDisplay => match model.sub_mode {
            ChartSubMode::Display => display_key(model, key),
            ChartSubMode::ControlBar => control_bar_key(model, key),
        },
    }
}

// ──────────────────── per-view key handling ────────────────────

fn landing_key(model: &mut NavModel, key: NavKey) -> Transition {
    match key {
        NavKey::Left | NavKey::Right => traverse(model, key),
        NavKey::Enter | NavKey::Space => activate_focused(model),
        NavKey::Quit => Transition::with(vec![Effect::Quit]),
        _ => Transition::ignored(),
    }
}

fn calibration_key(model: &mut NavModel, key: NavKey) -> Transition {
    match key {
        NavKey::Left | NavKey::Right => traverse(model, key),
        NavKey::Up => {
            adjust_width(model, 1);
            Transition::consumed()
        }
        NavKey::Down => {
            adjust_width(model, -1);
            Transition::consumed()
        }
        NavKey::Enter | NavKey::Space => activate_focused(model),
        _ => Transition::ignored(),
    }
}

fn display_key(model: &mut NavModel, key: NavKey) -> Transition {
    let selection = &mut model.selection;
    match key {
        NavKey::Up => {
            selection.step_line(LineStep::Larger);
            Transition::consumed()
        }
        NavKey::Down => {
            selection.step_line(LineStep::Smaller);
            Transition::consumed()
        }
        NavKey::Right => {
            if selection.single_glyph {
                selection.step_glyph_forward();
            } else {
                selection.enter_single_glyph_at_start();
            }
            Transition::consumed()
        }
        NavKey::Left => {
            if selection.single_glyph {
                selection.step_glyph_backward();
            } else {
                selection.enter_single_glyph_at_end();
            }
            Transition::consumed()
        }
        NavKey::Enter | NavKey::Space => {
            selection.toggle_single_glyph();
            Transition::consumed()
        }
        NavKey::ToggleFullscreen => Transition::with(vec![fullscreen_toggle(model)]),
        NavKey::Escape if model.fullscreen => Transition::with(vec![Effect::ExitFullscreen]),
        NavKey::Escape => {
            model.sub_mode = ChartSubMode::ControlBar;
            model.controls_focus = 0;
            Transition::consumed()
        }
        NavKey::Quit | NavKey::ToggleMouse => Transition::ignored(),
    }
}

fn control_bar_key(model: &mut NavModel, key: NavKey) -> Transition {
    match key {
        NavKey::Left | NavKey::Right => traverse(model, key),
        NavKey::Enter | NavKey::Space => activate_focused(model),
        NavKey::Escape => {
            model.sub_mode = ChartSubMode::Display;
            Transition::consumed()
        }
        _ => Transition::ignored(),
    }
}

// ──────────────────── shared helpers ────────────────────

/// Move the current view's focus cursor one step with wraparound.
fn traverse(model: &mut NavModel, key: NavKey) -> Transition {
    let len = model.targets().len();
    if len == 0 {
        return Transition::consumed();
    }
    let cursor = model.focus_cursor_mut();
    let current = focus::clamp_index(*cursor, len);
    *cursor = match key {
        NavKey::Left => (current + len - 1) % len,
        _ => (current + 1) % len,
    };
    Transition::consumed()
}

/// Activate whatever the focus layer would grant focus to right now.
fn activate_focused(model: &mut NavModel) -> Transition {
    let Some(target) = focus::resolve_activation(model) else {
        return Transition::consumed();
    };
    let mut effects = vec![Effect::Activate(target)];
    effects.extend(apply_target(model, target));
    Transition::with(effects)
}

/// A pointer press. Ignored unless `target` is currently focusable, so a
/// stale hit map cannot trigger a control that is no longer on screen.
fn press(model: &mut NavModel, target: Target) -> Transition {
    if !model.targets().contains(&target) {
        return Transition::ignored();
    }
    let mut effects = vec![Effect::Activate(target)];
    effects.extend(apply_target(model, target));
    Transition::with(effects)
}

fn adjust_width(model: &mut NavModel, delta: i64) {
    let next = i64::from(model.calibration_width_px) + delta;
    let floor = i64::from(model.settings.min_width_px);
    model.calibration_width_px = u32::try_from(next.max(floor)).unwrap_or(u32::MAX);
}

fn fullscreen_toggle(model: &NavModel) -> Effect {
    if model.fullscreen {
        Effect::ExitFullscreen
    } else {
        Effect::EnterFullscreen
    }
}

/// Run a target's primary action. Disabled targets do nothing.
fn apply_target(model: &mut NavModel, target: Target) -> Vec<Effect> {
    if !target.is_enabled(&model.selection) {
        return Vec::new();
    }
    match target {
        Target::ChartCard(variant) => {
            model.selection.select_variant(variant);
            model.view = View::ChartDisplay;
            model.sub_mode = ChartSubMode::Display;
            model.controls_focus = 0;
        }
        Target::Calibrate => {
            model.view = View::Calibration;
            model.calibration_focus = 0;
            model.calibration_width_px =
                crate::calibration::width_px_for(model.pixels_per_mm, model.settings.min_width_px);
        }
        Target::CalibrationBack => model.view = View::Landing,
        Target::WidthDecrease => adjust_width(model, -1),
        Target::WidthIncrease => adjust_width(model, 1),
        Target::CalibrationSave => {
            let pixels_per_mm = pixels_per_mm_from_width(model.calibration_width_px);
            model.pixels_per_mm = pixels_per_mm;
            model.view = View::Landing;
            return vec![Effect::PersistCalibration(pixels_per_mm)];
        }
        Target::Home => {
            model.view = View::Landing;
            model.sub_mode = ChartSubMode::Display;
        }
        Target::Variant(variant) => model.selection.select_variant(variant),
        Target::SizeLarger => {
            model.selection.step_line(LineStep::Larger);
        }
        Target::SizeSmaller => {
            model.selection.step_line(LineStep::Smaller);
        }
        Target::GlyphPrev => {
            model.selection.step_glyph_backward();
        }
        Target::GlyphNext => {
            model.selection.step_glyph_forward();
        }
        Target::Reset => model.selection.reset(),
        Target::Fullscreen => return vec![fullscreen_toggle(model)],
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartVariant;
    use crate::nav::model::NavSettings;
    use crate::nav::selection::Selection;

    fn key(model: &mut NavModel, key: NavKey) -> Transition {
        update(model, NavMsg::Key(key))
    }

    fn chart(variant: ChartVariant) -> NavModel {
        NavModel::default().open_chart(variant)
    }

    // ── landing ──

    #[test]
    fn landing_wraps_both_ways() {
        let mut model = NavModel::default();
        key(&mut model, NavKey::Left);
        assert_eq!(model.landing_focus, 4);
        key(&mut model, NavKey::Right);
        assert_eq!(model.landing_focus, 0);
    }

    #[test]
    fn landing_card_opens_chart_with_fresh_selection() {
        let mut model = NavModel::default();
        model.selection.step_line(LineStep::Smaller);
        key(&mut model, NavKey::Right);
        let t = key(&mut model, NavKey::Enter);
        assert!(t.consumed);
        assert_eq!(
            t.effects,
            vec![Effect::Activate(Target::ChartCard(ChartVariant::Hindi))]
        );
        assert_eq!(model.view, View::ChartDisplay);
        assert_eq!(model.sub_mode, ChartSubMode::Display);
        assert_eq!(model.selection, Selection::new(ChartVariant::Hindi));
    }

    #[test]
    fn landing_quit_and_unhandled_keys() {
        let mut model = NavModel::default();
        assert_eq!(key(&mut model, NavKey::Quit).effects, vec![Effect::Quit]);
        assert!(!key(&mut model, NavKey::Up).consumed);
        assert!(!key(&mut model, NavKey::Escape).consumed);
    }

    // ── calibration ──

    #[test]
    fn calibration_entry_seeds_width_from_scalar() {
        let mut model = NavModel::new(2.5, NavSettings::default());
        update(&mut model, NavMsg::Press(Target::Calibrate));
        assert_eq!(model.view, View::Calibration);
        assert_eq!(model.calibration_width_px, 214);
        assert_eq!(model.calibration_focus, 0);
    }

    #[test]
    fn calibration_width_adjusts_and_floors() {
        let mut model = NavModel::default();
        update(&mut model, NavMsg::Press(Target::Calibrate));
        model.calibration_width_px = 51;
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Down);
        assert_eq!(model.calibration_width_px, 50);
        key(&mut model, NavKey::Up);
        assert_eq!(model.calibration_width_px, 51);
    }

    #[test]
    fn calibration_save_persists_and_returns_home() {
        let mut model = NavModel::default();
        update(&mut model, NavMsg::Press(Target::Calibrate));
        model.calibration_width_px = 214;
        key(&mut model, NavKey::Left); // wraps to Save
        let t = key(&mut model, NavKey::Enter);
        assert_eq!(model.view, View::Landing);
        assert!((model.pixels_per_mm - 2.5).abs() < 1e-9);
        assert_eq!(t.effects.len(), 2);
        assert_eq!(t.effects[0], Effect::Activate(Target::CalibrationSave));
        let Effect::PersistCalibration(saved) = t.effects[1] else {
            panic!("expected persist effect, got {:?}", t.effects[1]);
        };
        assert!((saved - 2.5).abs() < 1e-9);
    }

    #[test]
    fn calibration_buttons_adjust_width() {
        let mut model = NavModel::default();
        update(&mut model, NavMsg::Press(Target::Calibrate));
        let start = model.calibration_width_px;
        key(&mut model, NavKey::Right);
        key(&mut model, NavKey::Enter);
        assert_eq!(model.calibration_width_px, start - 1);
        key(&mut model, NavKey::Right);
        key(&mut model, NavKey::Space);
        key(&mut model, NavKey::Space);
        assert_eq!(model.calibration_width_px, start + 1);
    }

    #[test]
    fn calibration_back_keeps_scalar() {
        let mut model = NavModel::default();
        update(&mut model, NavMsg::Press(Target::Calibrate));
        key(&mut model, NavKey::Up);
        let t = key(&mut model, NavKey::Enter);
        assert_eq!(model.view, View::Landing);
        assert!((model.pixels_per_mm - 2.7).abs() < 1e-12);
        assert_eq!(t.effects, vec![Effect::Activate(Target::CalibrationBack)]);
    }

    // ── chart display ──

    #[test]
    fn up_down_change_line_and_leave_single_glyph() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Right);
        key(&mut model, NavKey::Right);
        assert!(model.selection.single_glyph);
        assert_eq!(model.selection.glyph_index, 1);
        key(&mut model, NavKey::Up);
        assert_eq!(model.selection.line_index, 1);
        assert!(!model.selection.single_glyph);
        assert_eq!(model.selection.glyph_index, 0);
    }

    #[test]
    fn up_at_first_line_is_consumed_noop() {
        let mut model = chart(ChartVariant::Snellen);
        let t = key(&mut model, NavKey::Up);
        assert!(t.consumed);
        assert_eq!(model.selection.line_index, 0);
    }

    #[test]
    fn left_enters_single_glyph_at_line_end() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Left);
        assert!(model.selection.single_glyph);
        assert_eq!(model.selection.glyph_index, 2);
    }

    #[test]
    fn activation_toggles_single_glyph() {
        let mut model = chart(ChartVariant::Numeric);
        key(&mut model, NavKey::Enter);
        assert!(model.selection.single_glyph);
        key(&mut model, NavKey::Space);
        assert!(!model.selection.single_glyph);
        assert_eq!(model.selection.glyph_index, 0);
    }

    #[test]
    fn fullscreen_key_requests_but_does_not_flip_flag() {
        let mut model = chart(ChartVariant::Snellen);
        let t = key(&mut model, NavKey::ToggleFullscreen);
        assert_eq!(t.effects, vec![Effect::EnterFullscreen]);
        assert!(!model.fullscreen);

        update(&mut model, NavMsg::FullscreenChanged(true));
        let t = key(&mut model, NavKey::ToggleFullscreen);
        assert_eq!(t.effects, vec![Effect::ExitFullscreen]);
    }

    #[test]
    fn escape_enters_control_bar_unless_fullscreen() {
        let mut model = chart(ChartVariant::Snellen);
        update(&mut model, NavMsg::FullscreenChanged(true));
        let t = key(&mut model, NavKey::Escape);
        assert_eq!(t.effects, vec![Effect::ExitFullscreen]);
        assert_eq!(model.sub_mode, ChartSubMode::Display);

        update(&mut model, NavMsg::FullscreenChanged(false));
        model.controls_focus = 5;
        key(&mut model, NavKey::Escape);
        assert_eq!(model.sub_mode, ChartSubMode::ControlBar);
        assert_eq!(model.controls_focus, 0);
    }

    #[test]
    fn entering_fullscreen_leaves_control_bar() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Escape);
        key(&mut model, NavKey::Left);
        assert_eq!(focus::resolve_activation(&model), Some(Target::Fullscreen));

        update(&mut model, NavMsg::FullscreenChanged(true));
        assert_eq!(model.sub_mode, ChartSubMode::Display);
        assert_eq!(model.controls_focus, 0);
        assert_eq!(focus::resolve_activation(&model), None);
    }

    #[test]
    fn fullscreen_chart_ignores_hidden_controls() {
        let mut model = chart(ChartVariant::Snellen);
        update(&mut model, NavMsg::FullscreenChanged(true));
        let before = model.clone();
        let t = update(&mut model, NavMsg::Press(Target::Variant(ChartVariant::Hindi)));
        assert!(!t.consumed);
        assert_eq!(model, before);
    }

    // ── control bar ──

    #[test]
    fn control_bar_escape_returns_without_touching_selection() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Right);
        let before = model.selection;
        key(&mut model, NavKey::Escape);
        key(&mut model, NavKey::Right);
        key(&mut model, NavKey::Escape);
        assert_eq!(model.sub_mode, ChartSubMode::Display);
        assert_eq!(model.selection, before);
    }

    #[test]
    fn control_bar_wraps_over_current_list() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Escape);
        key(&mut model, NavKey::Left);
        assert_eq!(model.controls_focus, 8);
        assert_eq!(focus::resolve_activation(&model), Some(Target::Fullscreen));
    }

    #[test]
    fn control_bar_home_returns_to_landing() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Escape);
        let t = key(&mut model, NavKey::Enter);
        assert_eq!(t.effects, vec![Effect::Activate(Target::Home)]);
        assert_eq!(model.view, View::Landing);
        assert_eq!(model.sub_mode, ChartSubMode::Display);
    }

    #[test]
    fn disabled_control_is_consumed_noop() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Escape);
        for _ in 0..5 {
            key(&mut model, NavKey::Right);
        }
        assert_eq!(focus::resolve_activation(&model), Some(Target::SizeLarger));
        let before = model.clone();
        let t = key(&mut model, NavKey::Enter);
        assert!(t.consumed);
        assert_eq!(t.effects, vec![Effect::Activate(Target::SizeLarger)]);
        assert_eq!(model, before);
    }

    #[test]
    fn size_smaller_control_moves_line() {
        let mut model = chart(ChartVariant::Hindi);
        key(&mut model, NavKey::Escape);
        model.controls_focus = 6;
        key(&mut model, NavKey::Enter);
        assert_eq!(model.selection.line_index, 1);
        assert_eq!(model.sub_mode, ChartSubMode::ControlBar);
    }

    #[test]
    fn variant_button_resets_and_reclamps_focus() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Right); // single-glyph on, list grows to 11
        key(&mut model, NavKey::Escape);
        model.controls_focus = 10;
        update(&mut model, NavMsg::Press(Target::Variant(ChartVariant::LandoltC)));
        assert_eq!(model.selection, Selection::new(ChartVariant::LandoltC));
        assert_eq!(model.controls_focus, 8);
    }

    #[test]
    fn press_on_absent_target_is_ignored() {
        let mut model = chart(ChartVariant::Snellen);
        let before = model.clone();
        let t = update(&mut model, NavMsg::Press(Target::GlyphNext));
        assert!(!t.consumed);
        assert_eq!(model, before);
        let t = update(&mut model, NavMsg::Press(Target::Calibrate));
        assert!(!t.consumed);
    }

    #[test]
    fn press_does_not_move_focus_cursor() {
        let mut model = chart(ChartVariant::Snellen);
        key(&mut model, NavKey::Escape);
        update(&mut model, NavMsg::Press(Target::SizeSmaller));
        assert_eq!(model.controls_focus, 0);
        assert_eq!(model.selection.line_index, 1);
    }

    #[test]
    fn fullscreen_button_toggles_via_effect() {
        let mut model = chart(ChartVariant::Snellen);
        let t = update(&mut model, NavMsg::Press(Target::Fullscreen));
        assert_eq!(
            t.effects,
            vec![Effect::Activate(Target::Fullscreen), Effect::EnterFullscreen]
        );
    }

    #[test]
    fn reset_button_rewinds_selection() {
        let mut model = chart(ChartVariant::Numeric);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Down);
        key(&mut model, NavKey::Right);
        update(&mut model, NavMsg::Press(Target::Reset));
        assert_eq!(model.selection, Selection::new(ChartVariant::Numeric));
    }
}
