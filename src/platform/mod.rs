//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (milliseconds)

use crate::Millis;

/// Current wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> Millis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> Millis {
    js_sys::Date::now() as Millis
}
