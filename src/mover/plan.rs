use std::fmt;

use core_graphics::event::CGKeyCode;
use core_graphics::geometry::{CGPoint, CGRect};

use super::MoveError;

/// 1-based Mission Control desktop number. The supported range is pinned by
/// the keycode table below: there are only nine number keys to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceIndex(u8);

impl SpaceIndex {
    pub const MAX: u8 = 9;
    pub const MIN: u8 = 1;

    pub fn new(n: u8) -> Result<SpaceIndex, MoveError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(SpaceIndex(n))
        } else {
            Err(MoveError::SpaceOutOfRange(n))
        }
    }

    #[inline]
    pub fn get(self) -> u8 { self.0 }
}

impl fmt::Display for SpaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChrome {
    /// Ordinary window with a title bar and traffic-light controls.
    Titled,
    /// No chrome at all; terminal emulators mostly.
    Borderless,
}

/// The two screen points that make up the synthetic drag: where to grab the
/// window, and the nearby point the pointer moves to so the window manager
/// commits to treating the press as a drag.
pub struct DragPlan {
    pub anchor: CGPoint,
    pub confirm: CGPoint,
}

// Titled windows are grabbed to the right of the traffic lights; borderless
// ones have nothing there to avoid, so the top center is the safest strip.
const TITLE_BAR_GRAB_X: f64 = 100.0;
const TOP_EDGE_GRAB_Y: f64 = 2.0;
const CONFIRM_DX: f64 = 10.0;
const CONFIRM_DY: f64 = 5.0;

pub fn drag_plan(frame: &CGRect, chrome: WindowChrome) -> DragPlan {
    let anchor = match chrome {
        WindowChrome::Titled => CGPoint::new(
            frame.origin.x + TITLE_BAR_GRAB_X,
            frame.origin.y + TOP_EDGE_GRAB_Y,
        ),
        WindowChrome::Borderless => CGPoint::new(
            frame.origin.x + frame.size.width / 2.0,
            frame.origin.y + TOP_EDGE_GRAB_Y,
        ),
    };
    DragPlan {
        confirm: CGPoint::new(anchor.x + CONFIRM_DX, anchor.y + CONFIRM_DY),
        anchor,
    }
}

/// ANSI virtual keycode for the number-row key of a desktop-switch shortcut.
/// The row is not laid out sequentially in keycode space.
pub fn switch_keycode(space: u8) -> Option<CGKeyCode> {
    let code = match space {
        1 => 0x12,
        2 => 0x13,
        3 => 0x14,
        4 => 0x15,
        5 => 0x17,
        6 => 0x16,
        7 => 0x1A,
        8 => 0x1C,
        9 => 0x19,
        _ => return None,
    };
    Some(code)
}
