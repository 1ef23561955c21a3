//! brim Platform Boundary
//!
//! The seam between the daemon's control plane and its two external
//! collaborators:
//! - The window system, which enumerates windows and delivers lifecycle
//!   events (creation, destruction, focus changes)
//! - The border renderer, which owns the per-window border objects and
//!   performs the actual compositing
//!
//! Compositor backends implement [`WindowSystem`] and [`BorderRenderer`];
//! the [`headless`] backend keeps the same state in memory and is what the
//! daemon runs against until a compositor backend is linked in. The test
//! suite drives it directly.

use std::sync::mpsc::Receiver;

use brim_core_state::{ColorStyle, Settings, WindowId};
use thiserror::Error;

pub mod headless;

/// Errors that can occur at the platform boundary.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to enumerate windows: {0}")]
    EnumerationFailed(String),

    #[error("failed to subscribe to window events: {0}")]
    SubscribeFailed(String),

    #[error("renderer failed for window {0}: {1}")]
    RenderFailed(WindowId, String),
}

/// Information about an on-screen window.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    /// The window identifier.
    pub id: WindowId,
    /// Name of the owning application, as matched by the filter lists.
    pub app_name: String,
}

/// Window lifecycle events the daemon reacts to.
#[derive(Debug, Clone)]
pub enum WindowEvent {
    /// A new window appeared.
    Created(WindowId),
    /// A window went away.
    Destroyed(WindowId),
    /// A window received focus.
    Focused(WindowId),
}

/// Per-window border state.
///
/// Owned by the renderer, indexed by the daemon's window registry. The
/// fields mirror what is currently composited on screen for the window.
#[derive(Debug, Clone)]
pub struct Border {
    /// The decorated window.
    pub window: WindowInfo,
    /// Whether the border is styled as the focused window.
    pub focused: bool,
    /// The border width currently applied.
    pub width: f32,
    /// The fill currently applied.
    pub fill: ColorStyle,
}

/// The window-system collaborator.
pub trait WindowSystem {
    /// Enumerate the windows that currently exist.
    fn list_windows(&self) -> Result<Vec<WindowInfo>, PlatformError>;

    /// Look up one window's info, if the window still exists.
    fn window_info(&self, id: WindowId) -> Option<WindowInfo>;

    /// The currently focused window, if any.
    fn focused_window(&self) -> Option<WindowId>;

    /// Subscribe to window lifecycle events.
    ///
    /// Returns the receiving end of the event stream. A window system
    /// supports one subscriber; a second call fails.
    fn subscribe(&mut self) -> Result<Receiver<WindowEvent>, PlatformError>;
}

/// The border-renderer collaborator.
///
/// Border objects are created when a window enters the registry, destroyed
/// when it leaves, and restyled in place when only their appearance
/// changes. Structural changes (corner geometry, HiDPI backing) require a
/// destroy-and-recreate cycle instead of a restyle.
pub trait BorderRenderer {
    /// Create a border object for a newly tracked window.
    fn create_border(
        &mut self,
        window: &WindowInfo,
        settings: &Settings,
        focused: bool,
    ) -> Result<Border, PlatformError>;

    /// Tear down the border object of a window leaving the registry.
    fn destroy_border(&mut self, border: Border);

    /// Recompute a border's appearance in place.
    fn restyle_border(
        &mut self,
        border: &mut Border,
        settings: &Settings,
        focused: bool,
    ) -> Result<(), PlatformError>;
}
