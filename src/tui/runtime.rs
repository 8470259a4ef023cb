//! Kiosk runtime: terminal setup, the event loop and the headless session
//! core it drives.
//!
//! Every state change flows through [`Session::apply`]: the controller
//! produces a transition, the layout is rebuilt, the focus host learns what is
//! mounted, then effects execute in order. Host notifications produced by
//! effects (fullscreen changes) are fed back FIFO before the next key.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event};

use crate::calibration::{CalibrationStore, FileSlot, KeyValueSlot, LoadOutcome};
use crate::charts::ChartVariant;
use crate::core::config::Config;
use crate::core::errors::{AcuityError, Result};
use crate::logger::{EventType, JsonlWriter, LogEntry, Severity};
use crate::nav::focus::{self, FocusHost};
use crate::nav::model::{Effect, NavModel, NavSettings, Transition, View};
use crate::nav::{Controller, NavKey};
use crate::platform::{FullscreenCapability, TerminalFullscreen};

use super::effects::{EffectExecutor, TerminalFocus};
use super::input::{KeyBindings, KeyRoute, route_key};
use super::layout::{CellSize, SurfaceLayout, build_layout};
use super::render::{self, Frame, Orientations};
use super::signals::ShutdownSignal;
use super::terminal_guard::TerminalGuard;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    Interrupted,
    Signal,
}

impl StopReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Interrupted => "interrupted",
            Self::Signal => "signal",
        }
    }
}

// ──────────────────── session ────────────────────

/// Everything the kiosk owns between key presses.
pub struct Session<S, F> {
    controller: Controller,
    focus: TerminalFocus,
    executor: EffectExecutor<S, F>,
    layout: SurfaceLayout,
    cell: CellSize,
    bindings: KeyBindings,
    status: Option<String>,
    dirty: bool,
}

impl<S: KeyValueSlot, F: FullscreenCapability> Session<S, F> {
    /// Load calibration, build the initial model and grant initial focus.
    pub fn start(
        config: &Config,
        store: CalibrationStore<S>,
        fullscreen: F,
        mut log: JsonlWriter,
        (cols, rows): (u16, u16),
        start_chart: Option<ChartVariant>,
    ) -> Self {
        log.write_entry(&LogEntry::info(EventType::SessionStart));

        let default_ppm = config.calibration.default_pixels_per_mm;
        let outcome = store.load_outcome();
        log.write_entry(&calibration_entry(&outcome, default_ppm));
        let pixels_per_mm = outcome.value_or(default_ppm);

        let settings = NavSettings {
            min_width_px: config.calibration.min_width_px,
        };
        let mut model = NavModel::new(pixels_per_mm, settings);
        if let Some(variant) = start_chart {
            model = model.open_chart(variant);
            log.write_entry(&LogEntry::info(EventType::ChartSelected).chart(variant));
        }

        let cell = CellSize::from(&config.display);
        let layout = build_layout(&model, cols, rows, cell);
        let controller =
            Controller::new(model, layout.viewport()).with_cursor_step(config.input.cursor_step_px);

        let mut session = Self {
            controller,
            focus: TerminalFocus::new(),
            executor: EffectExecutor::new(store, fullscreen, log),
            layout,
            cell,
            bindings: KeyBindings::from(&config.input),
            status: None,
            dirty: true,
        };
        session.focus.remount(&session.layout);
        let initial: Vec<Effect> = focus::plan(session.controller.model())
            .effect()
            .into_iter()
            .collect();
        session.process(Transition::with(initial), None);
        session
    }

    /// Route one logical key. Returns true when the session should end.
    ///
    /// While the terminal is too small nothing is drawn or focusable, so only
    /// `Quit` reaches the controller.
    pub fn apply(&mut self, key: NavKey) -> bool {
        if self.layout.too_small && key != NavKey::Quit {
            return false;
        }
        let before = snapshot(self.controller.model());
        let transition = self.controller.handle_key(key, &self.layout);
        if !transition.consumed {
            return false;
        }
        self.process(transition, Some(before))
    }

    /// Track a terminal resize.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.relayout(cols, rows);
        self.controller.set_viewport(self.layout.viewport());
        self.dirty = true;
    }

    fn relayout(&mut self, cols: u16, rows: u16) {
        self.layout = build_layout(self.controller.model(), cols, rows, self.cell);
        self.focus.remount(&self.layout);
    }

    fn process(&mut self, first: Transition, mut before: Option<(View, ChartVariant)>) -> bool {
        let (cols, rows) = (self.layout.cols, self.layout.rows);
        let mut pending = VecDeque::from([first]);
        let mut quit = false;

        while let Some(transition) = pending.pop_front() {
            self.relayout(cols, rows);
            if let Some(prev) = before.take() {
                self.log_chart_change(prev);
            }
            let executed = self.executor.execute(&transition.effects, &mut self.focus);
            quit |= executed.quit;
            for msg in executed.follow_ups {
                pending.push_back(self.controller.dispatch(msg));
            }
        }

        if let Some(status) = self.executor.take_status() {
            self.status = Some(status);
        }
        self.dirty = true;
        quit
    }

    fn log_chart_change(&mut self, (prev_view, prev_variant): (View, ChartVariant)) {
        let (view, variant) = snapshot(self.controller.model());
        if view == View::ChartDisplay && (prev_view != View::ChartDisplay || prev_variant != variant) {
            self.executor
                .log()
                .write_entry(&LogEntry::info(EventType::ChartSelected).chart(variant));
        }
    }

    /// Draw the current frame if anything changed since the last draw.
    pub fn draw<W: Write>(&mut self, out: &mut W, orientations: &mut Orientations) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let frame = Frame {
            model: self.controller.model(),
            layout: &self.layout,
            focused: self.focus.focused(),
            cursor: self.controller.cursor(),
            status: self.status.as_deref(),
        };
        render::draw(out, &frame, orientations)?;
        self.status = None;
        self.dirty = false;
        Ok(())
    }

    /// Log the stop event and flush the session log.
    pub fn finish(&mut self, reason: StopReason) {
        let log = self.executor.log();
        log.write_entry(&LogEntry::info(EventType::SessionStop).details(reason.as_str()));
        log.flush();
    }

    #[must_use]
    pub const fn controller(&self) -> &Controller {
        &self.controller
    }

    #[must_use]
    pub const fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    #[must_use]
    pub fn focused(&self) -> Option<crate::nav::Target> {
        self.focus.focused()
    }

    #[must_use]
    pub const fn bindings(&self) -> KeyBindings {
        self.bindings
    }

    #[must_use]
    pub const fn executor(&self) -> &EffectExecutor<S, F> {
        &self.executor
    }
}

fn snapshot(model: &NavModel) -> (View, ChartVariant) {
    (model.view, model.selection.variant)
}

fn calibration_entry(outcome: &LoadOutcome, default_ppm: f64) -> LogEntry {
    match outcome {
        LoadOutcome::Loaded(value) => LogEntry::info(EventType::CalibrationLoaded).pixels_per_mm(*value),
        LoadOutcome::Missing => LogEntry::info(EventType::CalibrationDefaulted)
            .pixels_per_mm(default_ppm)
            .details("no stored calibration"),
        LoadOutcome::Invalid { raw, details } => {
            LogEntry::new(EventType::CalibrationDefaulted, Severity::Warning)
                .pixels_per_mm(default_ppm)
                .details(format!("ignored stored value {raw:?}: {details}"))
        }
        LoadOutcome::Unreadable { details } => {
            LogEntry::new(EventType::CalibrationDefaulted, Severity::Warning)
                .pixels_per_mm(default_ppm)
                .details(format!("calibration slot unreadable: {details}"))
        }
    }
}

// ──────────────────── terminal loop ────────────────────

/// Run the kiosk on the controlling terminal until quit, Ctrl-C or a signal.
///
/// # Errors
/// Terminal setup or I/O failures. Host capability failures inside the
/// session are logged and never end it.
pub fn run_kiosk(config: &Config, start_chart: Option<ChartVariant>) -> Result<()> {
    let signal = ShutdownSignal::register();
    // Opened before raw mode; stderr stays off while the kiosk owns the screen.
    let mut log = JsonlWriter::from_config(&config.logging);
    log.set_stderr_sink(false);
    let guard = TerminalGuard::new().map_err(|source| AcuityError::Terminal { source })?;

    let mut session = Session::start(
        config,
        CalibrationStore::new(FileSlot::new(&config.calibration.file)),
        TerminalFullscreen::new(config.display.allow_fullscreen),
        log,
        TerminalGuard::terminal_size(),
        start_chart.or(config.display.start_chart),
    );
    let mut orientations = Orientations::from_entropy();
    let mut stdout = io::stdout();

    let outcome = event_loop(&mut session, &mut stdout, &mut orientations, &signal);
    let reason = outcome.as_ref().map_or(StopReason::Interrupted, |reason| *reason);
    session.finish(reason);
    drop(guard);
    outcome.map(|_| ()).map_err(|source| AcuityError::Terminal { source })
}

fn event_loop<S: KeyValueSlot, F: FullscreenCapability, W: Write>(
    session: &mut Session<S, F>,
    out: &mut W,
    orientations: &mut Orientations,
    signal: &ShutdownSignal,
) -> io::Result<StopReason> {
    loop {
        if signal.requested() {
            return Ok(StopReason::Signal);
        }
        session.draw(out, orientations)?;
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match route_key(&key, session.bindings()) {
                KeyRoute::Interrupt => return Ok(StopReason::Interrupted),
                KeyRoute::Nav(nav_key) => {
                    if session.apply(nav_key) {
                        return Ok(StopReason::Quit);
                    }
                }
                KeyRoute::Unmapped => {}
            },
            Event::Resize(cols, rows) => session.resize(cols, rows),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::MemorySlot;
    use crate::logger::JsonlConfig;
    use crate::nav::Target;
    use crate::nav::model::ChartSubMode;

    type TestSession = Session<MemorySlot, TerminalFullscreen>;

    fn session_with(slot: MemorySlot, start: Option<ChartVariant>, allow_fullscreen: bool) -> TestSession {
        Session::start(
            &Config::default(),
            CalibrationStore::new(slot),
            TerminalFullscreen::new(allow_fullscreen),
            JsonlWriter::disabled(),
            (120, 40),
            start,
        )
    }

    fn press_all(session: &mut TestSession, keys: &[NavKey]) {
        for &key in keys {
            assert!(!session.apply(key), "{key:?} ended the session");
        }
    }

    #[test]
    fn landing_starts_with_first_card_focused() {
        let session = session_with(MemorySlot::new(), None, true);
        assert_eq!(session.focused(), Some(Target::ChartCard(ChartVariant::Snellen)));
    }

    #[test]
    fn stored_calibration_seeds_model() {
        let mut store = CalibrationStore::new(MemorySlot::new());
        store.save(3.1).unwrap();
        let session = Session::start(
            &Config::default(),
            store,
            TerminalFullscreen::new(true),
            JsonlWriter::disabled(),
            (120, 40),
            None,
        );
        assert!((session.controller().model().pixels_per_mm - 3.1).abs() < 1e-9);
    }

    #[test]
    fn opening_a_chart_clears_focus() {
        let mut session = session_with(MemorySlot::new(), None, true);
        press_all(&mut session, &[NavKey::Right, NavKey::Enter]);
        let model = session.controller().model();
        assert_eq!(model.view, View::ChartDisplay);
        assert_eq!(model.selection.variant, ChartVariant::Hindi);
        assert_eq!(session.focused(), None);
    }

    #[test]
    fn control_bar_focus_follows_cursor() {
        let mut session = session_with(MemorySlot::new(), Some(ChartVariant::Snellen), true);
        press_all(&mut session, &[NavKey::Escape, NavKey::Right, NavKey::Right]);
        assert_eq!(session.controller().model().sub_mode, ChartSubMode::ControlBar);
        assert_eq!(session.focused(), Some(Target::Variant(ChartVariant::Hindi)));
    }

    #[test]
    fn fullscreen_round_trip_hides_and_restores_controls() {
        let mut session = session_with(MemorySlot::new(), Some(ChartVariant::Numeric), true);
        press_all(&mut session, &[NavKey::ToggleFullscreen]);
        assert!(session.controller().model().fullscreen);
        assert!(session.layout().buttons.is_empty());
        press_all(&mut session, &[NavKey::Escape]);
        assert!(!session.controller().model().fullscreen);
        assert!(session.layout().is_mounted(Target::Home));
    }

    #[test]
    fn fullscreen_button_leaves_nothing_activatable() {
        let mut session = session_with(MemorySlot::new(), Some(ChartVariant::Snellen), true);
        // Control bar, wrap left to the Fullscreen button, press it.
        press_all(&mut session, &[NavKey::Escape, NavKey::Left]);
        assert_eq!(session.focused(), Some(Target::Fullscreen));
        press_all(&mut session, &[NavKey::Enter]);

        let model = session.controller().model();
        assert!(model.fullscreen);
        assert_eq!(model.sub_mode, ChartSubMode::Display);
        assert!(session.layout().buttons.is_empty());
        assert_eq!(session.focused(), None);

        // Arrows and Enter now drive the chart, never a hidden control.
        press_all(
            &mut session,
            &[NavKey::Right, NavKey::Right, NavKey::Right, NavKey::Enter],
        );
        let model = session.controller().model();
        assert_eq!(model.selection.variant, ChartVariant::Snellen);
        assert!(model.fullscreen);
        assert!(!model.selection.single_glyph);
        assert_eq!(session.focused(), None);
    }

    #[test]
    fn too_small_terminal_swallows_navigation() {
        let mut session = session_with(MemorySlot::new(), Some(ChartVariant::Snellen), true);
        session.resize(30, 10);
        assert!(session.layout().too_small);
        let before = session.controller().model().clone();
        press_all(&mut session, &[NavKey::Escape, NavKey::Enter, NavKey::Down]);
        assert_eq!(session.controller().model(), &before);

        session.resize(120, 40);
        press_all(&mut session, &[NavKey::Down]);
        assert_eq!(session.controller().model().selection.line_index, 1);
    }

    #[test]
    fn rejected_fullscreen_keeps_state() {
        let mut session = session_with(MemorySlot::new(), Some(ChartVariant::Numeric), false);
        press_all(&mut session, &[NavKey::ToggleFullscreen]);
        assert!(!session.controller().model().fullscreen);
        assert!(session.layout().is_mounted(Target::Fullscreen));
    }

    #[test]
    fn calibration_save_persists_through_executor() {
        let mut session = session_with(MemorySlot::new(), None, true);
        // Landing: walk to Calibrate (index 4), open it.
        press_all(&mut session, &[NavKey::Left, NavKey::Enter]);
        assert_eq!(session.controller().model().view, View::Calibration);
        // Back, −, +, Save: focus Save and activate.
        press_all(&mut session, &[NavKey::Left, NavKey::Enter]);
        let stored = session.executor().store().load().unwrap();
        assert!((stored - session.controller().model().pixels_per_mm).abs() < 1e-9);
        assert_eq!(session.controller().model().view, View::Landing);
    }

    #[test]
    fn quit_ends_session() {
        let mut session = session_with(MemorySlot::new(), None, true);
        assert!(session.apply(NavKey::Quit));
    }

    #[test]
    fn resize_updates_viewport_and_layout() {
        let mut session = session_with(MemorySlot::new(), None, true);
        session.resize(60, 20);
        assert_eq!(session.controller().viewport(), session.layout().viewport());
        assert_eq!(session.layout().cols, 60);
    }

    #[test]
    fn draw_only_when_dirty() {
        let mut session = session_with(MemorySlot::new(), None, true);
        let mut orientations = Orientations::seeded(5);
        let mut first = Vec::new();
        session.draw(&mut first, &mut orientations).unwrap();
        assert!(!first.is_empty());
        let mut second = Vec::new();
        session.draw(&mut second, &mut orientations).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn session_log_records_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let log = JsonlWriter::open(JsonlConfig {
            path: path.clone(),
            fallback_path: None,
            max_size_bytes: 1 << 20,
            max_rotated_files: 1,
        });
        let mut session = Session::start(
            &Config::default(),
            CalibrationStore::new(MemorySlot::new()),
            TerminalFullscreen::new(true),
            log,
            (120, 40),
            None,
        );
        // Open English, then switch to Hindi from the control bar.
        press_all(
            &mut session,
            &[NavKey::Enter, NavKey::Escape, NavKey::Right, NavKey::Right, NavKey::Enter],
        );
        session.finish(StopReason::Quit);

        let events: Vec<String> = std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["event"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            events,
            vec![
                "session_start",
                "calibration_defaulted",
                "chart_selected",
                "chart_selected",
                "session_stop",
            ]
        );
    }
}
