use accessibility_sys::pid_t;
use core_foundation::array::CFArray;
use core_foundation::base::{CFType, ItemRef, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::display::{
    CGWindowID, CGWindowListCopyWindowInfo, kCGNullWindowID, kCGWindowListOptionOnScreenOnly,
};
use core_graphics::geometry::CGRect;
use core_graphics::window::{
    kCGWindowBounds, kCGWindowLayer, kCGWindowListExcludeDesktopElements, kCGWindowNumber,
    kCGWindowOwnerName, kCGWindowOwnerPID,
};

/// Stacking layer of ordinary application windows. Overlays, panels, and the
/// desktop itself report other layers.
pub const NORMAL_WINDOW_LAYER: i32 = 0;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct WindowServerId(pub CGWindowID);

impl WindowServerId {
    #[inline]
    pub fn as_u32(self) -> u32 { self.0 }
}

#[derive(Clone)]
pub struct WindowServerInfo {
    pub id: WindowServerId,
    pub pid: pid_t,
    pub layer: i32,
    pub frame: CGRect,
    pub owner_name: String,
}

/// Snapshot of the on-screen window list, front to back, desktop elements
/// excluded.
pub fn on_screen_windows() -> Vec<WindowServerInfo> {
    let raw = unsafe {
        CGWindowListCopyWindowInfo(
            kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements,
            kCGNullWindowID,
        )
    };
    if raw.is_null() {
        return Vec::new();
    }
    let windows: CFArray<CFDictionary<CFString, CFType>> =
        unsafe { CFArray::wrap_under_create_rule(raw) };
    windows.iter().filter_map(make_info).collect()
}

fn make_info(win: ItemRef<CFDictionary<CFString, CFType>>) -> Option<WindowServerInfo> {
    let id = get_num(&win, unsafe { kCGWindowNumber })?;
    let pid = get_num(&win, unsafe { kCGWindowOwnerPID })?;
    let layer = get_num(&win, unsafe { kCGWindowLayer })?.try_into().ok()?;
    let dict: CFDictionary = win.find(unsafe { kCGWindowBounds })?.downcast()?;
    let frame = CGRect::from_dict_representation(&dict)?;
    let owner_name =
        get_string(&win, unsafe { kCGWindowOwnerName }).unwrap_or_else(|| "unknown".to_string());

    Some(WindowServerInfo {
        id: WindowServerId(id.try_into().ok()?),
        pid: pid.try_into().ok()?,
        layer,
        frame,
        owner_name,
    })
}

fn get_num(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<i64> {
    let item: CFNumber = dict.find(key)?.downcast()?;
    item.to_i64()
}

fn get_string(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<String> {
    let item: CFString = dict.find(key)?.downcast()?;
    Some(item.to_string())
}
