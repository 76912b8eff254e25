//! The synthetic drag-while-switching choreography.
//!
//! The window manager has no API for moving a window to another space; the
//! only mechanism it exposes is its own drag heuristic. This module plays
//! that gesture back as a fixed table of (action, settle) steps: the settles
//! keep each phase inside the gesture-recognition window, and there is no way
//! to observe whether a phase registered, so the durations are trusted.

use std::thread;
use std::time::Duration;

use core_graphics::event::{CGEventFlags, CGKeyCode};
use core_graphics::geometry::CGPoint;
use tracing::{debug, warn};

use super::MoveError;
use super::plan::{DragPlan, switch_keycode};
use crate::common::config::Timings;
use crate::sys::event::EventError;

/// Synthetic-input sink. The production implementation posts real HID events;
/// tests record the calls instead.
pub trait InputDriver {
    fn pointer_location(&self) -> Option<CGPoint>;
    fn warp(&self, point: CGPoint) -> Result<(), EventError>;
    fn left_down(&self, point: CGPoint) -> Result<(), EventError>;
    fn left_drag(&self, point: CGPoint) -> Result<(), EventError>;
    fn left_up(&self, point: CGPoint) -> Result<(), EventError>;
    fn key_down(&self, code: CGKeyCode, flags: CGEventFlags) -> Result<(), EventError>;
    fn key_up(&self, code: CGKeyCode, flags: CGEventFlags) -> Result<(), EventError>;
}

/// Modifier set the desktop-switch shortcuts must be bound under.
pub fn switch_flags() -> CGEventFlags {
    CGEventFlags::CGEventFlagCommand
        | CGEventFlags::CGEventFlagShift
        | CGEventFlags::CGEventFlagControl
        | CGEventFlags::CGEventFlagAlternate
}

enum Act {
    Warp(CGPoint),
    Press(CGPoint),
    Drag(CGPoint),
    KeyDown(CGKeyCode),
    KeyUp(CGKeyCode),
    Release(CGPoint),
}

pub struct Gesture<'a> {
    driver: &'a dyn InputDriver,
    timings: &'a Timings,
}

impl<'a> Gesture<'a> {
    pub fn new(driver: &'a dyn InputDriver, timings: &'a Timings) -> Self {
        Gesture { driver, timings }
    }

    /// Run the full sequence. Whatever goes wrong after the press, the
    /// primary button is released before returning; a button left logically
    /// down would swallow all input until the user clicks.
    pub fn perform(&self, plan: &DragPlan, space: u8) -> Result<(), MoveError> {
        let home = self.driver.pointer_location();
        if home.is_none() {
            warn!("could not read the pointer position; it will not be restored");
        }
        self.settle(self.timings.grace());

        self.run(&[
            (Act::Warp(plan.anchor), self.timings.warp()),
            (Act::Press(plan.anchor), self.timings.press()),
            (Act::Drag(plan.confirm), self.timings.drag()),
        ])
        .map_err(|e| self.abort(plan, e.into()))?;

        let Some(code) = switch_keycode(space) else {
            return Err(self.abort(plan, MoveError::UnresolvedKeycode(space)));
        };
        debug!(space, code, "switching space mid-drag");

        self.run(&[
            (Act::KeyDown(code), self.timings.switch_tap()),
            (Act::KeyUp(code), self.timings.switch()),
            (Act::Release(plan.confirm), self.timings.release()),
        ])
        .map_err(|e| self.abort(plan, e.into()))?;

        if let Some(home) = home {
            if let Err(e) = self.driver.warp(home) {
                warn!("failed to restore the pointer: {e}");
            }
        }
        Ok(())
    }

    fn abort(&self, plan: &DragPlan, err: MoveError) -> MoveError {
        if let Err(e) = self.driver.left_up(plan.confirm) {
            warn!("button release during abort failed: {e}");
        }
        err
    }

    fn run(&self, steps: &[(Act, Duration)]) -> Result<(), EventError> {
        for (act, settle) in steps {
            self.apply(act)?;
            self.settle(*settle);
        }
        Ok(())
    }

    fn apply(&self, act: &Act) -> Result<(), EventError> {
        match *act {
            Act::Warp(point) => self.driver.warp(point),
            Act::Press(point) => self.driver.left_down(point),
            Act::Drag(point) => self.driver.left_drag(point),
            Act::KeyDown(code) => self.driver.key_down(code, switch_flags()),
            Act::KeyUp(code) => self.driver.key_up(code, CGEventFlags::CGEventFlagNull),
            Act::Release(point) => self.driver.left_up(point),
        }
    }

    fn settle(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
