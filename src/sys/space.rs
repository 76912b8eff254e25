use std::num::NonZeroU64;

use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use tracing::debug;

use super::skylight::{CGSCopyManagedDisplaySpaces, CGSGetActiveSpace, G_CONNECTION};

/// Window-server space identifier. Opaque; not the number shown in Mission
/// Control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SpaceId(NonZeroU64);

impl SpaceId {
    pub fn get(self) -> u64 { self.0.get() }
}

pub fn active_space() -> Option<SpaceId> {
    let id = unsafe { CGSGetActiveSpace(*G_CONNECTION) };
    NonZeroU64::new(id).map(SpaceId)
}

// Space dictionaries carry a `type` field; 0 marks a user space. Fullscreen
// and system spaces have other types and no Mission Control number.
const USER_SPACE_TYPE: i64 = 0;

/// 1-based position of the active space among user spaces, counted across
/// displays in management order. This is the number the "Switch to Desktop N"
/// shortcuts use. `None` when the window server cannot be queried or the
/// active space is not a numbered user space.
pub fn active_space_ordinal() -> Option<u32> {
    let active = active_space()?;
    let displays = copy_managed_display_spaces()?;

    let spaces_key = CFString::from_static_string("Spaces");
    let id_key = CFString::from_static_string("id64");
    let type_key = CFString::from_static_string("type");

    let mut ordinal = 0u32;
    for display in displays.iter() {
        let Some(spaces) = display.find(&spaces_key) else {
            continue;
        };
        let spaces: CFArray<CFDictionary<CFString, CFType>> =
            unsafe { CFArray::wrap_under_get_rule(spaces.as_CFTypeRef() as CFArrayRef) };
        for space in spaces.iter() {
            let Some(ty) = get_i64(&space, &type_key) else {
                continue;
            };
            if ty != USER_SPACE_TYPE {
                continue;
            }
            ordinal += 1;
            if get_i64(&space, &id_key) == Some(active.get() as i64) {
                debug!(ordinal, id = active.get(), "resolved active space");
                return Some(ordinal);
            }
        }
    }
    debug!(id = active.get(), "active space not found among user spaces");
    None
}

fn copy_managed_display_spaces() -> Option<CFArray<CFDictionary<CFString, CFType>>> {
    let raw = unsafe { CGSCopyManagedDisplaySpaces(*G_CONNECTION) };
    if raw.is_null() {
        return None;
    }
    Some(unsafe { CFArray::wrap_under_create_rule(raw) })
}

fn get_i64(dict: &CFDictionary<CFString, CFType>, key: &CFString) -> Option<i64> {
    let item: CFNumber = dict.find(key)?.downcast()?;
    item.to_i64()
}
