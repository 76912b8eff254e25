//! Accessibility-tree probes for the focused window of a process.
//!
//! All probes answer `Option<bool>`: `None` means the tree could not be
//! queried at all (no permission, unresponsive app, no focused window), which
//! callers treat as "unknown" rather than as either answer.

use std::ptr;

use accessibility_sys::{
    AXUIElementCopyAttributeValue, AXUIElementCreateApplication, AXUIElementRef,
    AXUIElementSetMessagingTimeout, kAXCloseButtonAttribute, kAXErrorAttributeUnsupported,
    kAXErrorNoValue, kAXErrorSuccess, kAXFocusedWindowAttribute, pid_t,
};
use core_foundation::base::{CFRelease, CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::string::CFString;
use tracing::debug;

// Unresponsive apps otherwise stall AX calls for several seconds each.
const AX_MESSAGING_TIMEOUT: f32 = 1.0;

// Not in the public headers, but reported by every window since 10.7.
const AX_FULLSCREEN_ATTRIBUTE: &str = "AXFullScreen";

/// Owned AXUIElementRef, released on drop (Create/Copy Rule).
struct AxElement(AXUIElementRef);

impl Drop for AxElement {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { CFRelease(self.0 as CFTypeRef) };
        }
    }
}

fn focused_window(pid: pid_t) -> Option<AxElement> {
    let app = unsafe { AXUIElementCreateApplication(pid) };
    if app.is_null() {
        return None;
    }
    let app = AxElement(app);
    unsafe { AXUIElementSetMessagingTimeout(app.0, AX_MESSAGING_TIMEOUT) };

    let attr = CFString::from_static_string(kAXFocusedWindowAttribute);
    let mut value: CFTypeRef = ptr::null();
    let err =
        unsafe { AXUIElementCopyAttributeValue(app.0, attr.as_concrete_TypeRef(), &mut value) };
    if err != kAXErrorSuccess || value.is_null() {
        debug!(pid, err, "no focused window via accessibility");
        return None;
    }
    Some(AxElement(value as AXUIElementRef))
}

/// Whether the focused window of `pid` is in native fullscreen.
pub fn is_fullscreen(pid: pid_t) -> Option<bool> {
    let window = focused_window(pid)?;
    let attr = CFString::new(AX_FULLSCREEN_ATTRIBUTE);
    let mut value: CFTypeRef = ptr::null();
    let err =
        unsafe { AXUIElementCopyAttributeValue(window.0, attr.as_concrete_TypeRef(), &mut value) };
    match err {
        kAXErrorSuccess if !value.is_null() => {
            let flag: CFType = unsafe { TCFType::wrap_under_create_rule(value) };
            flag.downcast::<CFBoolean>().map(bool::from)
        }
        e if e == kAXErrorNoValue || e == kAXErrorAttributeUnsupported => Some(false),
        e => {
            debug!(pid, err = e, "fullscreen probe failed");
            None
        }
    }
}

/// Whether the focused window of `pid` exposes the standard close button.
/// Windows with ordinary chrome do; borderless windows report no value.
pub fn has_close_button(pid: pid_t) -> Option<bool> {
    let window = focused_window(pid)?;
    let attr = CFString::from_static_string(kAXCloseButtonAttribute);
    let mut value: CFTypeRef = ptr::null();
    let err =
        unsafe { AXUIElementCopyAttributeValue(window.0, attr.as_concrete_TypeRef(), &mut value) };
    match err {
        kAXErrorSuccess if !value.is_null() => {
            unsafe { CFRelease(value) };
            Some(true)
        }
        e if e == kAXErrorNoValue || e == kAXErrorAttributeUnsupported => Some(false),
        e => {
            debug!(pid, err = e, "close-button probe failed");
            None
        }
    }
}
