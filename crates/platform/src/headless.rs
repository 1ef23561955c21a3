//! In-memory platform backend.
//!
//! Keeps the window list and border state in memory instead of talking to
//! a compositor. The daemon runs against this backend when no compositor
//! backend is linked in, and the test suite uses it to drive lifecycle
//! events deterministically.

use std::sync::mpsc::{channel, Receiver, Sender};

use brim_core_state::{ColorStyle, Settings, WindowId};
use tracing::debug;

use crate::{Border, BorderRenderer, PlatformError, WindowEvent, WindowInfo, WindowSystem};

fn fill_for(settings: &Settings, focused: bool) -> ColorStyle {
    if focused {
        settings.active_style
    } else {
        settings.inactive_style
    }
}

/// A scriptable window system held entirely in memory.
///
/// Windows added or removed after [`WindowSystem::subscribe`] emit the
/// corresponding lifecycle events, so a test can play out the same
/// sequences a compositor would deliver.
#[derive(Default)]
pub struct HeadlessWindowSystem {
    windows: Vec<WindowInfo>,
    focused: Option<WindowId>,
    event_tx: Option<Sender<WindowEvent>>,
}

impl HeadlessWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window, emitting `Created` if a subscriber is attached.
    pub fn add_window(&mut self, id: WindowId, app_name: &str) {
        self.windows.push(WindowInfo {
            id,
            app_name: app_name.to_string(),
        });
        self.emit(WindowEvent::Created(id));
    }

    /// Remove a window, emitting `Destroyed` if a subscriber is attached.
    pub fn close_window(&mut self, id: WindowId) {
        self.windows.retain(|window| window.id != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.emit(WindowEvent::Destroyed(id));
    }

    /// Move focus, emitting `Focused` if a subscriber is attached.
    pub fn focus_window(&mut self, id: WindowId) {
        self.focused = Some(id);
        self.emit(WindowEvent::Focused(id));
    }

    fn emit(&self, event: WindowEvent) {
        if let Some(tx) = &self.event_tx {
            // A dropped receiver just means the loop is gone.
            let _ = tx.send(event);
        }
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn list_windows(&self) -> Result<Vec<WindowInfo>, PlatformError> {
        Ok(self.windows.clone())
    }

    fn window_info(&self, id: WindowId) -> Option<WindowInfo> {
        self.windows.iter().find(|window| window.id == id).cloned()
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    fn subscribe(&mut self) -> Result<Receiver<WindowEvent>, PlatformError> {
        if self.event_tx.is_some() {
            return Err(PlatformError::SubscribeFailed(
                "already subscribed".to_string(),
            ));
        }
        let (tx, rx) = channel();
        self.event_tx = Some(tx);
        Ok(rx)
    }
}

/// A renderer that records border state without compositing.
///
/// Counts create/destroy/restyle calls so tests can verify exactly which
/// redraw action the dispatcher performed.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    created: u64,
    destroyed: u64,
    restyled: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total border objects created so far.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total border objects destroyed so far.
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Total in-place restyles so far.
    pub fn restyled(&self) -> u64 {
        self.restyled
    }
}

impl BorderRenderer for HeadlessRenderer {
    fn create_border(
        &mut self,
        window: &WindowInfo,
        settings: &Settings,
        focused: bool,
    ) -> Result<Border, PlatformError> {
        self.created += 1;
        debug!(window = %window.id, app = %window.app_name, focused, "creating border");
        Ok(Border {
            window: window.clone(),
            focused,
            width: settings.border_width,
            fill: fill_for(settings, focused),
        })
    }

    fn destroy_border(&mut self, border: Border) {
        self.destroyed += 1;
        debug!(window = %border.window.id, "destroying border");
    }

    fn restyle_border(
        &mut self,
        border: &mut Border,
        settings: &Settings,
        focused: bool,
    ) -> Result<(), PlatformError> {
        self.restyled += 1;
        border.focused = focused;
        border.width = settings.border_width;
        border.fill = fill_for(settings, focused);
        Ok(())
    }
}
