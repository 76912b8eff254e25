//! Moves the frontmost window to another Mission Control space.
//!
//! All OS access goes through the four capability traits below, so every
//! decision this module makes can be exercised against fakes. `Actual` wires
//! the traits to the real window server.

pub mod gesture;
pub mod plan;

use accessibility_sys::pid_t;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use self::gesture::InputDriver;
use self::gesture::Gesture;
pub use self::plan::{DragPlan, SpaceIndex, WindowChrome};
use crate::common::config::Config;
use crate::sys::event::EventError;
use crate::sys::window_server::{NORMAL_WINDOW_LAYER, WindowServerInfo};

/// On-screen window list, front to back.
pub trait WindowServer {
    fn list_windows(&self) -> Vec<WindowServerInfo>;
}

/// Accessibility-tree probes; `None` answers mean the probe itself failed.
pub trait ChromeProbe {
    fn is_fullscreen(&self, pid: pid_t) -> Option<bool>;
    fn has_close_button(&self, pid: pid_t) -> Option<bool>;
}

/// 1-based number of the space currently on screen. The production reading
/// goes through private window-server calls, so `None` (unknown) is a normal
/// answer, not an error.
pub trait CurrentSpaceProvider {
    fn current_space(&self) -> Option<u32>;
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("space number must be between 1 and 9 (got {0})")]
    SpaceOutOfRange(u8),
    #[error("no on-screen window at the normal window level")]
    NoWindowFound,
    #[error("{owner} is fullscreen; fullscreen windows cannot be dragged to another space")]
    Fullscreen { owner: String },
    #[error("no desktop-switch keycode for space {0}")]
    UnresolvedKeycode(u8),
    #[error("failed to post synthetic input: {0}")]
    Input(#[from] EventError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The window is already on the target space; nothing was synthesized.
    AlreadyThere,
    Moved { owner: String },
}

/// Everything resolved before any input is synthesized.
pub struct Preparation {
    pub window: WindowServerInfo,
    pub chrome: WindowChrome,
    pub plan: DragPlan,
}

pub struct Mover<'a> {
    windows: &'a dyn WindowServer,
    probe: &'a dyn ChromeProbe,
    spaces: &'a dyn CurrentSpaceProvider,
    input: &'a dyn InputDriver,
    config: &'a Config,
}

impl<'a> Mover<'a> {
    pub fn new(
        windows: &'a dyn WindowServer,
        probe: &'a dyn ChromeProbe,
        spaces: &'a dyn CurrentSpaceProvider,
        input: &'a dyn InputDriver,
        config: &'a Config,
    ) -> Self {
        Mover {
            windows,
            probe,
            spaces,
            input,
            config,
        }
    }

    /// Select the frontmost normal window, rule out fullscreen, classify its
    /// chrome, and compute the drag plan. Posts no input.
    pub fn prepare(&self) -> Result<Preparation, MoveError> {
        let window = self
            .windows
            .list_windows()
            .into_iter()
            .find(|w| w.layer == NORMAL_WINDOW_LAYER)
            .ok_or(MoveError::NoWindowFound)?;
        info!(
            owner = %window.owner_name,
            pid = window.pid,
            x = window.frame.origin.x,
            y = window.frame.origin.y,
            width = window.frame.size.width,
            height = window.frame.size.height,
            "found window"
        );

        match self.probe.is_fullscreen(window.pid) {
            Some(true) => {
                return Err(MoveError::Fullscreen {
                    owner: window.owner_name,
                });
            }
            Some(false) => {}
            None => debug!("fullscreen probe inconclusive; assuming not fullscreen"),
        }

        let chrome = self.classify(&window);
        let plan = plan::drag_plan(&window.frame, chrome);
        info!(chrome = ?chrome, x = plan.anchor.x, y = plan.anchor.y, "drag anchor");

        Ok(Preparation { window, chrome, plan })
    }

    fn classify(&self, window: &WindowServerInfo) -> WindowChrome {
        match self.probe.has_close_button(window.pid) {
            Some(true) => WindowChrome::Titled,
            Some(false) => WindowChrome::Borderless,
            None => {
                let owner = window.owner_name.to_lowercase();
                let listed = self
                    .config
                    .settings
                    .borderless_apps
                    .iter()
                    .any(|app| owner.contains(&app.to_lowercase()));
                if listed {
                    debug!(owner = %window.owner_name, "probe failed; owner is on the borderless list");
                    WindowChrome::Borderless
                } else {
                    debug!("probe failed; assuming a standard title bar");
                    WindowChrome::Titled
                }
            }
        }
    }

    pub fn move_to_space(&self, target: SpaceIndex) -> Result<Outcome, MoveError> {
        let prep = self.prepare()?;

        match self.spaces.current_space() {
            Some(current) if current == u32::from(target.get()) => {
                info!(%target, "already on the target space");
                return Ok(Outcome::AlreadyThere);
            }
            Some(current) => debug!(current, "current space"),
            None => warn!("could not determine the current space; moving anyway"),
        }

        info!(%target, "switching space mid-drag; do not touch the mouse");
        Gesture::new(self.input, &self.config.timings).perform(&prep.plan, target.get())?;

        Ok(Outcome::Moved {
            owner: prep.window.owner_name,
        })
    }
}

/// Production backend: the live window server.
pub struct Actual;

impl WindowServer for Actual {
    fn list_windows(&self) -> Vec<WindowServerInfo> { crate::sys::window_server::on_screen_windows() }
}

impl ChromeProbe for Actual {
    fn is_fullscreen(&self, pid: pid_t) -> Option<bool> { crate::sys::ax::is_fullscreen(pid) }

    fn has_close_button(&self, pid: pid_t) -> Option<bool> { crate::sys::ax::has_close_button(pid) }
}

impl CurrentSpaceProvider for Actual {
    fn current_space(&self) -> Option<u32> { crate::sys::space::active_space_ordinal() }
}

impl InputDriver for Actual {
    fn pointer_location(&self) -> Option<core_graphics::geometry::CGPoint> {
        crate::sys::event::mouse_location()
    }

    fn warp(&self, point: core_graphics::geometry::CGPoint) -> Result<(), EventError> {
        crate::sys::event::warp_mouse(point)
    }

    fn left_down(&self, point: core_graphics::geometry::CGPoint) -> Result<(), EventError> {
        crate::sys::event::post_mouse(core_graphics::event::CGEventType::LeftMouseDown, point)
    }

    fn left_drag(&self, point: core_graphics::geometry::CGPoint) -> Result<(), EventError> {
        crate::sys::event::post_mouse(core_graphics::event::CGEventType::LeftMouseDragged, point)
    }

    fn left_up(&self, point: core_graphics::geometry::CGPoint) -> Result<(), EventError> {
        crate::sys::event::post_mouse(core_graphics::event::CGEventType::LeftMouseUp, point)
    }

    fn key_down(
        &self,
        code: core_graphics::event::CGKeyCode,
        flags: core_graphics::event::CGEventFlags,
    ) -> Result<(), EventError> {
        crate::sys::event::post_key(code, true, flags)
    }

    fn key_up(
        &self,
        code: core_graphics::event::CGKeyCode,
        flags: core_graphics::event::CGEventFlags,
    ) -> Result<(), EventError> {
        crate::sys::event::post_key(code, false, flags)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use core_graphics::event::{CGEventFlags, CGKeyCode};
    use core_graphics::geometry::{CGPoint, CGRect, CGSize};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::window_server::WindowServerId;

    fn window(pid: pid_t, layer: i32, owner: &str, x: f64, y: f64, w: f64, h: f64) -> WindowServerInfo {
        WindowServerInfo {
            id: WindowServerId(1),
            pid,
            layer,
            frame: CGRect::new(&CGPoint::new(x, y), &CGSize::new(w, h)),
            owner_name: owner.to_string(),
        }
    }

    struct FakeWindows(Vec<WindowServerInfo>);

    impl WindowServer for FakeWindows {
        fn list_windows(&self) -> Vec<WindowServerInfo> { self.0.clone() }
    }

    struct FakeProbe {
        fullscreen: Option<bool>,
        close_button: Option<bool>,
    }

    impl FakeProbe {
        fn titled() -> Self {
            FakeProbe {
                fullscreen: Some(false),
                close_button: Some(true),
            }
        }
    }

    impl ChromeProbe for FakeProbe {
        fn is_fullscreen(&self, _pid: pid_t) -> Option<bool> { self.fullscreen }

        fn has_close_button(&self, _pid: pid_t) -> Option<bool> { self.close_button }
    }

    struct FakeSpaces(Option<u32>);

    impl CurrentSpaceProvider for FakeSpaces {
        fn current_space(&self) -> Option<u32> { self.0 }
    }

    #[derive(Debug, PartialEq, Clone, Copy)]
    enum Rec {
        Warp(f64, f64),
        Down(f64, f64),
        Drag(f64, f64),
        KeyDown(CGKeyCode),
        KeyUp(CGKeyCode),
        Up(f64, f64),
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Rec>>);

    impl Recorder {
        fn push(&self, rec: Rec) -> Result<(), EventError> {
            self.0.borrow_mut().push(rec);
            Ok(())
        }

        fn is_empty(&self) -> bool { self.0.borrow().is_empty() }
    }

    impl InputDriver for Recorder {
        fn pointer_location(&self) -> Option<CGPoint> { Some(CGPoint::new(640.0, 400.0)) }

        fn warp(&self, p: CGPoint) -> Result<(), EventError> { self.push(Rec::Warp(p.x, p.y)) }

        fn left_down(&self, p: CGPoint) -> Result<(), EventError> { self.push(Rec::Down(p.x, p.y)) }

        fn left_drag(&self, p: CGPoint) -> Result<(), EventError> { self.push(Rec::Drag(p.x, p.y)) }

        fn left_up(&self, p: CGPoint) -> Result<(), EventError> { self.push(Rec::Up(p.x, p.y)) }

        fn key_down(&self, code: CGKeyCode, _flags: CGEventFlags) -> Result<(), EventError> {
            self.push(Rec::KeyDown(code))
        }

        fn key_up(&self, code: CGKeyCode, _flags: CGEventFlags) -> Result<(), EventError> {
            self.push(Rec::KeyUp(code))
        }
    }

    struct Fixture {
        windows: FakeWindows,
        probe: FakeProbe,
        spaces: FakeSpaces,
        input: Recorder,
        config: Config,
    }

    impl Fixture {
        fn new(windows: Vec<WindowServerInfo>) -> Self {
            Fixture {
                windows: FakeWindows(windows),
                probe: FakeProbe::titled(),
                spaces: FakeSpaces(None),
                input: Recorder::default(),
                config: Config {
                    timings: crate::common::config::Timings::instant(),
                    ..Config::default()
                },
            }
        }

        fn mover(&self) -> Mover<'_> {
            Mover::new(&self.windows, &self.probe, &self.spaces, &self.input, &self.config)
        }
    }

    #[test_log::test]
    fn empty_window_list_posts_nothing() {
        let fx = Fixture::new(vec![]);
        let err = fx.mover().move_to_space(SpaceIndex::new(2).unwrap()).unwrap_err();
        assert!(matches!(err, MoveError::NoWindowFound));
        assert!(fx.input.is_empty());
    }

    #[test]
    fn non_normal_layers_are_not_candidates() {
        let fx = Fixture::new(vec![
            window(10, 25, "Notification Center", 0.0, 0.0, 400.0, 200.0),
            window(11, 3, "Dock", 0.0, 800.0, 1440.0, 80.0),
        ]);
        let err = fx.mover().move_to_space(SpaceIndex::new(2).unwrap()).unwrap_err();
        assert!(matches!(err, MoveError::NoWindowFound));
        assert!(fx.input.is_empty());
    }

    #[test]
    fn fullscreen_windows_are_rejected_before_any_input() {
        let mut fx = Fixture::new(vec![window(42, 0, "Safari", 0.0, 0.0, 1440.0, 900.0)]);
        fx.probe.fullscreen = Some(true);
        let err = fx.mover().move_to_space(SpaceIndex::new(4).unwrap()).unwrap_err();
        assert!(matches!(err, MoveError::Fullscreen { owner } if owner == "Safari"));
        assert!(fx.input.is_empty());
    }

    #[test]
    fn already_on_target_space_is_a_no_op() {
        let mut fx = Fixture::new(vec![window(42, 0, "Safari", 0.0, 0.0, 800.0, 600.0)]);
        fx.spaces = FakeSpaces(Some(3));
        let outcome = fx.mover().move_to_space(SpaceIndex::new(3).unwrap()).unwrap();
        assert_eq!(outcome, Outcome::AlreadyThere);
        assert!(fx.input.is_empty());
    }

    #[test_log::test]
    fn moves_the_first_normal_window() {
        let fx = Fixture::new(vec![
            window(10, 25, "Notification Center", 0.0, 0.0, 400.0, 200.0),
            window(42, 0, "Safari", 100.0, 50.0, 800.0, 600.0),
            window(43, 0, "Mail", 0.0, 0.0, 600.0, 400.0),
        ]);
        let outcome = fx.mover().move_to_space(SpaceIndex::new(3).unwrap()).unwrap();
        assert_eq!(outcome, Outcome::Moved { owner: "Safari".to_string() });
        assert_eq!(
            *fx.input.0.borrow(),
            vec![
                Rec::Warp(200.0, 52.0),
                Rec::Down(200.0, 52.0),
                Rec::Drag(210.0, 57.0),
                Rec::KeyDown(0x14),
                Rec::KeyUp(0x14),
                Rec::Up(210.0, 57.0),
                Rec::Warp(640.0, 400.0),
            ]
        );
    }

    #[test]
    fn close_button_absence_means_borderless() {
        let mut fx = Fixture::new(vec![window(7, 0, "SomeApp", 0.0, 0.0, 1000.0, 700.0)]);
        fx.probe.close_button = Some(false);
        let prep = fx.mover().prepare().unwrap();
        assert_eq!(prep.chrome, WindowChrome::Borderless);
        assert_eq!((prep.plan.anchor.x, prep.plan.anchor.y), (500.0, 2.0));
    }

    #[test]
    fn failed_probe_falls_back_to_the_borderless_list() {
        let mut fx = Fixture::new(vec![window(7, 0, "kitty", 0.0, 0.0, 1000.0, 700.0)]);
        fx.probe.close_button = None;
        let prep = fx.mover().prepare().unwrap();
        assert_eq!(prep.chrome, WindowChrome::Borderless);
        assert_eq!((prep.plan.anchor.x, prep.plan.anchor.y), (500.0, 2.0));
    }

    #[test]
    fn failed_probe_defaults_to_titled_for_unlisted_apps() {
        let mut fx = Fixture::new(vec![window(7, 0, "Safari", 100.0, 50.0, 800.0, 600.0)]);
        fx.probe.close_button = None;
        let prep = fx.mover().prepare().unwrap();
        assert_eq!(prep.chrome, WindowChrome::Titled);
        assert_eq!((prep.plan.anchor.x, prep.plan.anchor.y), (200.0, 52.0));
    }

    #[test]
    fn unknown_current_space_still_moves() {
        let fx = Fixture::new(vec![window(42, 0, "Safari", 0.0, 0.0, 800.0, 600.0)]);
        let outcome = fx.mover().move_to_space(SpaceIndex::new(5).unwrap()).unwrap();
        assert!(matches!(outcome, Outcome::Moved { .. }));
        assert!(!fx.input.is_empty());
    }

    #[test]
    fn different_current_space_moves() {
        let mut fx = Fixture::new(vec![window(42, 0, "Safari", 0.0, 0.0, 800.0, 600.0)]);
        fx.spaces = FakeSpaces(Some(1));
        let outcome = fx.mover().move_to_space(SpaceIndex::new(2).unwrap()).unwrap();
        assert!(matches!(outcome, Outcome::Moved { .. }));
        assert!(!fx.input.is_empty());
    }

    #[test]
    fn inconclusive_fullscreen_probe_proceeds() {
        let mut fx = Fixture::new(vec![window(42, 0, "Safari", 0.0, 0.0, 800.0, 600.0)]);
        fx.probe.fullscreen = None;
        assert!(fx.mover().prepare().is_ok());
    }
}
