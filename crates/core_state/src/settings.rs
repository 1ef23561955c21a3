//! Process-wide border configuration.

use crate::registry::Registry;

/// How a border is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStyle {
    /// A single ARGB color.
    Solid(u32),
    /// A two-stop gradient between ARGB colors.
    Gradient { from: u32, to: u32 },
}

/// Corner geometry of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerStyle {
    Round,
    Square,
}

/// Stacking-order sentinel: borders sit just below their window.
pub const ORDER_BELOW: i32 = -1;
/// Stacking-order sentinel: borders sit above their window.
pub const ORDER_ABOVE: i32 = 1;

/// Bucket count for the application-name filter registries.
pub const FILTER_CAPACITY: usize = 64;

/// The authoritative configuration snapshot.
///
/// Exactly one `Settings` exists per process, owned by the run loop.
/// All mutation funnels through directive application; readers are the
/// update dispatcher's redraw paths and the window-registry bootstrap.
#[derive(Debug, Clone)]
pub struct Settings {
    pub active_style: ColorStyle,
    pub inactive_style: ColorStyle,
    pub border_width: f32,
    pub corner_style: CornerStyle,
    pub hidpi: bool,
    pub border_order: i32,
    pub blacklist: Registry<String, ()>,
    pub whitelist: Registry<String, ()>,
    pub blacklist_enabled: bool,
    pub whitelist_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_style: ColorStyle::Solid(0xffe1e3e4),
            inactive_style: ColorStyle::Solid(0x00000000),
            border_width: 4.0,
            corner_style: CornerStyle::Round,
            hidpi: false,
            border_order: ORDER_BELOW,
            blacklist: Registry::with_capacity(FILTER_CAPACITY),
            whitelist: Registry::with_capacity(FILTER_CAPACITY),
            blacklist_enabled: false,
            whitelist_enabled: false,
        }
    }
}

impl Settings {
    /// Filter policy for window tracking.
    ///
    /// Whitelist mode wins when both are enabled: only listed applications
    /// are tracked and the blacklist is not consulted. With neither mode
    /// enabled every window is tracked.
    pub fn should_track(&self, app_name: &str) -> bool {
        if self.whitelist_enabled {
            self.whitelist.contains_str(app_name)
        } else if self.blacklist_enabled {
            !self.blacklist.contains_str(app_name)
        } else {
            true
        }
    }
}
