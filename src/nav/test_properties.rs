//! Property-based tests for navigation reducer invariants.
//!
//! Uses `proptest` to drive arbitrary key and press sequences through the
//! controller and check that selection indices stay in range, focus cursors
//! stay valid, and the chart-level laws hold for every variant.

use proptest::prelude::*;

use super::controller::Controller;
use super::cursor::{NoSurface, Viewport};
use super::focus::{self, FocusPlan};
use super::input::NavKey;
use super::model::{ChartSubMode, Effect, NavModel, NavMsg, View};
use super::selection::{GlyphPos, Selection, is_absolute_end, step_backward, step_forward};
use super::targets::{Target, focusable_targets};
use crate::charts::ChartVariant;

const VIEWPORT: Viewport = Viewport::new(800, 480);

// ──────────────────── strategies ────────────────────

fn arb_variant() -> impl Strategy<Value = ChartVariant> {
    (0usize..ChartVariant::ALL.len()).prop_map(|i| ChartVariant::ALL[i])
}

fn arb_key() -> impl Strategy<Value = NavKey> {
    prop_oneof![
        Just(NavKey::Up),
        Just(NavKey::Down),
        Just(NavKey::Left),
        Just(NavKey::Right),
        Just(NavKey::Enter),
        Just(NavKey::Space),
        Just(NavKey::Escape),
        Just(NavKey::ToggleFullscreen),
        Just(NavKey::Quit),
    ]
}

fn arb_target() -> impl Strategy<Value = Target> {
    prop_oneof![
        arb_variant().prop_map(Target::ChartCard),
        arb_variant().prop_map(Target::Variant),
        Just(Target::Calibrate),
        Just(Target::CalibrationBack),
        Just(Target::WidthDecrease),
        Just(Target::WidthIncrease),
        Just(Target::CalibrationSave),
        Just(Target::Home),
        Just(Target::SizeLarger),
        Just(Target::SizeSmaller),
        Just(Target::GlyphPrev),
        Just(Target::GlyphNext),
        Just(Target::Reset),
        Just(Target::Fullscreen),
    ]
}

fn arb_msg() -> impl Strategy<Value = NavMsg> {
    prop_oneof![
        6 => arb_key().prop_map(NavMsg::Key),
        2 => arb_target().prop_map(NavMsg::Press),
        1 => any::<bool>().prop_map(NavMsg::FullscreenChanged),
    ]
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    (arb_variant(), 0usize..16, any::<bool>(), 0usize..16).prop_map(
        |(variant, line_index, single_glyph, glyph_index)| {
            let mut selection = Selection {
                variant,
                line_index,
                single_glyph,
                glyph_index,
            };
            selection.clamp();
            selection
        },
    )
}

// ──────────────────── invariant checks ────────────────────

fn assert_model_invariants(model: &NavModel) {
    let selection = &model.selection;
    let lines = selection.lines();
    assert!(selection.line_index < lines.len(), "line out of range");
    let line = &lines[selection.line_index];
    assert!(selection.glyph_index <= line.last_index(), "glyph out of range");
    if !selection.single_glyph {
        assert_eq!(selection.glyph_index, 0, "glyph index set outside single-glyph mode");
    }

    let targets = model.targets();
    let cursor = model.focus_cursor();
    assert!(
        cursor < targets.len() || targets.is_empty(),
        "focus cursor {cursor} outside list of {}",
        targets.len()
    );

    if model.fullscreen && model.view == View::ChartDisplay {
        assert_eq!(model.sub_mode, ChartSubMode::Display, "control bar open while fullscreen");
    }

    assert!(model.calibration_width_px >= model.settings.min_width_px);
    assert!(model.pixels_per_mm.is_finite() && model.pixels_per_mm > 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reducer_preserves_invariants(
        start in arb_variant(),
        msgs in prop::collection::vec(arb_msg(), 0..120),
    ) {
        let mut ctl = Controller::new(NavModel::default().open_chart(start), VIEWPORT);
        for msg in msgs {
            match msg {
                NavMsg::Key(key) => { ctl.handle_key(key, &NoSurface); }
                other => { ctl.dispatch(other); }
            }
            assert_model_invariants(ctl.model());
        }
    }

    #[test]
    fn focus_effect_never_names_an_absent_target(
        msgs in prop::collection::vec(arb_msg(), 1..80),
    ) {
        let mut ctl = Controller::new(NavModel::default(), VIEWPORT);
        for msg in msgs {
            let transition = match msg {
                NavMsg::Key(key) => ctl.handle_key(key, &NoSurface),
                other => ctl.dispatch(other),
            };
            let targets = ctl.model().targets();
            for effect in &transition.effects {
                if let Effect::Focus(target) = effect {
                    prop_assert!(targets.contains(target), "{target} not in {targets:?}");
                }
            }
        }
    }

    #[test]
    fn forward_sweep_covers_every_glyph(variant in arb_variant()) {
        let lines = variant.lines();
        let mut pos = GlyphPos::default();
        for _ in 0..variant.glyph_count() - 1 {
            pos = step_forward(lines, pos).expect("sweep ended early");
        }
        let last_line = lines.len() - 1;
        prop_assert_eq!(pos, GlyphPos { line: last_line, glyph: lines[last_line].last_index() });
        prop_assert!(is_absolute_end(lines, pos));
        prop_assert_eq!(step_forward(lines, pos), None);
    }

    #[test]
    fn backward_undoes_forward(selection in arb_selection()) {
        let lines = selection.lines();
        let pos = selection.position();
        if let Some(next) = step_forward(lines, pos) {
            prop_assert_eq!(step_backward(lines, next), Some(pos));
        }
    }

    #[test]
    fn variant_switch_always_resets(mut selection in arb_selection(), variant in arb_variant()) {
        selection.select_variant(variant);
        prop_assert_eq!(selection.line_index, 0);
        prop_assert_eq!(selection.glyph_index, 0);
        prop_assert!(!selection.single_glyph);
    }

    #[test]
    fn double_toggle_restores_mode_and_rewinds(mut selection in arb_selection()) {
        let original = selection.single_glyph;
        selection.toggle_single_glyph();
        selection.toggle_single_glyph();
        prop_assert_eq!(selection.single_glyph, original);
        prop_assert_eq!(selection.glyph_index, 0);
    }

    #[test]
    fn control_bar_reclamps_when_list_shrinks(
        variant in arb_variant(),
        cursor in 0usize..11,
    ) {
        let mut model = NavModel::default().open_chart(variant);
        model.selection.enter_single_glyph_at_start();
        model.sub_mode = ChartSubMode::ControlBar;
        model.controls_focus = cursor;

        // Leaving single-glyph mode removes the two glyph buttons.
        super::update::update(&mut model, NavMsg::Press(Target::Variant(variant)));
        let targets = focusable_targets(View::ChartDisplay, &model.selection);
        prop_assert_eq!(targets.len(), 9);
        prop_assert!(model.controls_focus < targets.len());
        match focus::plan(&model) {
            FocusPlan::Grant { target, .. } => {
                prop_assert!(target != Target::GlyphPrev && target != Target::GlyphNext);
            }
            other => prop_assert!(false, "unexpected plan {other:?}"),
        }
    }

    #[test]
    fn random_keys_never_panic_from_any_view(
        keys in prop::collection::vec(arb_key(), 0..200),
        view_pick in 0u8..3,
    ) {
        let mut model = NavModel::default();
        model.view = match view_pick {
            0 => View::Landing,
            1 => View::Calibration,
            _ => View::ChartDisplay,
        };
        let mut ctl = Controller::new(model, VIEWPORT);
        for key in keys {
            let _ = ctl.handle_key(key, &NoSurface);
        }
        assert_model_invariants(ctl.model());
    }
}
