use core_graphics::base::CGError;
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTapLocation, CGEventType, CGKeyCode, CGMouseButton,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use thiserror::Error;

use super::skylight::CGWarpMouseCursorPosition;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    #[error("could not create an event source")]
    Source,
    #[error("could not create a {0} event")]
    Create(&'static str),
    #[error("pointer warp failed (CGError {0})")]
    Warp(CGError),
}

fn hid_source() -> Result<CGEventSource, EventError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState).map_err(|()| EventError::Source)
}

/// Current pointer position in global display coordinates.
pub fn mouse_location() -> Option<CGPoint> {
    let event = CGEvent::new(hid_source().ok()?).ok()?;
    Some(event.location())
}

pub fn warp_mouse(point: CGPoint) -> Result<(), EventError> {
    let err = unsafe { CGWarpMouseCursorPosition(point) };
    if err == 0 { Ok(()) } else { Err(EventError::Warp(err)) }
}

/// Post a left-button mouse event at `point` to the HID event tap.
pub fn post_mouse(kind: CGEventType, point: CGPoint) -> Result<(), EventError> {
    let label = match kind {
        CGEventType::LeftMouseDown => "mouse-down",
        CGEventType::LeftMouseDragged => "mouse-drag",
        CGEventType::LeftMouseUp => "mouse-up",
        _ => "mouse",
    };
    let event = CGEvent::new_mouse_event(hid_source()?, kind, point, CGMouseButton::Left)
        .map_err(|()| EventError::Create(label))?;
    event.post(CGEventTapLocation::HID);
    Ok(())
}

/// Post a keyboard event, with `flags` applied so the window manager sees the
/// modifiers held together with the key.
pub fn post_key(code: CGKeyCode, down: bool, flags: CGEventFlags) -> Result<(), EventError> {
    let label = if down { "key-down" } else { "key-up" };
    let event = CGEvent::new_keyboard_event(hid_source()?, code, down)
        .map_err(|()| EventError::Create(label))?;
    if flags != CGEventFlags::CGEventFlagNull {
        event.set_flags(flags);
    }
    event.post(CGEventTapLocation::HID);
    Ok(())
}
