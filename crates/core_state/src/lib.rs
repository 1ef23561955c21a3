//! brim Core State
//!
//! Platform-agnostic control-plane state for the border daemon:
//! - The keyed registry used for window tracking and filter lists
//! - The process-wide settings store
//! - The directive parser through which all settings mutation flows
//! - The update-mask machinery that selects the minimal redraw action

mod directive;
mod registry;
mod settings;
mod update;

pub use directive::{parse_directive, DirectiveError};
pub use registry::{Registry, RegistryKey, WindowId};
pub use settings::{
    ColorStyle, CornerStyle, Settings, FILTER_CAPACITY, ORDER_ABOVE, ORDER_BELOW,
};
pub use update::{Scope, UpdateMask};
