// credits
// https://github.com/asmagill/hs._asm.undocumented.spaces/blob/master/CGSSpace.h.
// https://github.com/koekeishiya/yabai/blob/d55a647913ab72d8d8b348bee2d3e59e52ce4a5d/src/misc/extern.h.

use std::ffi::c_int;

use core_foundation::array::CFArrayRef;
use core_graphics::base::CGError;
use core_graphics::geometry::CGPoint;
use once_cell::sync::Lazy;

pub static G_CONNECTION: Lazy<cid_t> = Lazy::new(|| unsafe { SLSMainConnectionID() });

#[allow(non_camel_case_types)]
pub type cid_t = i32;

unsafe extern "C" {
    pub fn SLSMainConnectionID() -> cid_t;

    pub fn CGSGetActiveSpace(cid: c_int) -> u64;
    pub fn CGSCopyManagedDisplaySpaces(cid: c_int) -> CFArrayRef;

    pub fn CGWarpMouseCursorPosition(point: CGPoint) -> CGError;
}
