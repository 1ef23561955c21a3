//! Window tracking and redraw dispatch.
//!
//! The window manager owns the registry of tracked windows and the
//! renderer collaborator, and turns consumed update masks into the single
//! redraw action their highest-precedence bit calls for.

use brim_core_state::{Registry, Scope, Settings, UpdateMask, WindowId};
use brim_platform::{Border, BorderRenderer, PlatformError, WindowEvent, WindowSystem};
use tracing::{debug, warn};

/// Bucket count for the window registry. Never grows; sized well above
/// realistic per-session window counts.
const WINDOW_REGISTRY_CAPACITY: usize = 1024;

pub struct WindowManager<R: BorderRenderer> {
    windows: Registry<WindowId, Border>,
    renderer: R,
    focused: Option<WindowId>,
}

impl<R: BorderRenderer> WindowManager<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            windows: Registry::with_capacity(WINDOW_REGISTRY_CAPACITY),
            renderer,
            focused: None,
        }
    }

    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    pub fn is_tracked(&self, id: WindowId) -> bool {
        self.windows.contains(&id)
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn border(&self, id: WindowId) -> Option<&Border> {
        self.windows.get(&id)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Enumerate pre-existing windows into the registry, applying the
    /// filter policy. Fails when the window system cannot enumerate;
    /// individual border failures are logged and skipped.
    pub fn bootstrap(
        &mut self,
        system: &dyn WindowSystem,
        settings: &Settings,
    ) -> Result<usize, PlatformError> {
        self.focused = system.focused_window();
        let mut added = 0;
        for window in system.list_windows()? {
            if !settings.should_track(&window.app_name) {
                debug!(window = %window.id, app = %window.app_name, "filtered out");
                continue;
            }
            let focused = self.focused == Some(window.id);
            match self.renderer.create_border(&window, settings, focused) {
                Ok(border) => {
                    self.windows.insert(window.id, border);
                    added += 1;
                }
                Err(err) => warn!("failed to create border for window {}: {}", window.id, err),
            }
        }
        Ok(added)
    }

    /// Apply one window lifecycle event.
    pub fn handle_event(
        &mut self,
        event: WindowEvent,
        system: &dyn WindowSystem,
        settings: &Settings,
    ) {
        match event {
            WindowEvent::Created(id) => {
                if self.windows.contains(&id) {
                    return;
                }
                let Some(window) = system.window_info(id) else {
                    debug!(window = %id, "create event for a window that is already gone");
                    return;
                };
                if !settings.should_track(&window.app_name) {
                    debug!(window = %id, app = %window.app_name, "filtered out");
                    return;
                }
                let focused = self.focused == Some(id);
                match self.renderer.create_border(&window, settings, focused) {
                    Ok(border) => {
                        self.windows.insert(id, border);
                    }
                    Err(err) => warn!("failed to create border for window {}: {}", id, err),
                }
            }
            WindowEvent::Destroyed(id) => {
                if let Some(border) = self.windows.remove(&id) {
                    self.renderer.destroy_border(border);
                }
                if self.focused == Some(id) {
                    self.focused = None;
                }
            }
            WindowEvent::Focused(id) => {
                let previous = self.focused;
                // Focus moving to an untracked window clears the marker.
                self.focused = if self.windows.contains(&id) {
                    Some(id)
                } else {
                    None
                };
                if let Some(prev) = previous {
                    if prev != id {
                        self.restyle_one(prev, settings, false);
                    }
                }
                if self.focused.is_some() {
                    self.restyle_one(id, settings, true);
                }
            }
        }
    }

    /// Perform the single redraw action for a consumed update mask.
    pub fn dispatch(&mut self, mask: UpdateMask, settings: &Settings) {
        match mask.highest() {
            Some(Scope::RecreateAll) => self.recreate_all(settings),
            Some(Scope::All) => self.update_all(settings),
            Some(Scope::Active) => self.update_active(settings),
            Some(Scope::Inactive) => self.update_inactive(settings),
            None => {}
        }
    }

    /// Destroy and recreate every tracked border. Re-applies the filter
    /// policy, so windows excluded by a replaced filter list drop out of
    /// the registry here.
    fn recreate_all(&mut self, settings: &Settings) {
        let ids: Vec<WindowId> = self.windows.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let Some(border) = self.windows.remove(&id) else {
                continue;
            };
            let window = border.window.clone();
            self.renderer.destroy_border(border);
            if !settings.should_track(&window.app_name) {
                debug!(window = %id, app = %window.app_name, "no longer tracked");
                continue;
            }
            let focused = self.focused == Some(id);
            match self.renderer.create_border(&window, settings, focused) {
                Ok(border) => {
                    self.windows.insert(id, border);
                }
                Err(err) => warn!("failed to recreate border for window {}: {}", id, err),
            }
        }
        if let Some(id) = self.focused {
            if !self.windows.contains(&id) {
                self.focused = None;
            }
        }
    }

    /// Restyle every tracked border in place.
    fn update_all(&mut self, settings: &Settings) {
        let focused = self.focused;
        for (id, border) in self.windows.iter_mut() {
            let is_focused = focused == Some(*id);
            if let Err(err) = self.renderer.restyle_border(border, settings, is_focused) {
                warn!("failed to restyle window {}: {}", id, err);
            }
        }
    }

    /// Restyle only the focused window's border.
    fn update_active(&mut self, settings: &Settings) {
        if let Some(id) = self.focused {
            self.restyle_one(id, settings, true);
        }
    }

    /// Restyle only non-focused windows' borders.
    fn update_inactive(&mut self, settings: &Settings) {
        let focused = self.focused;
        for (id, border) in self.windows.iter_mut() {
            if focused == Some(*id) {
                continue;
            }
            if let Err(err) = self.renderer.restyle_border(border, settings, false) {
                warn!("failed to restyle window {}: {}", id, err);
            }
        }
    }

    fn restyle_one(&mut self, id: WindowId, settings: &Settings, focused: bool) {
        if let Some(border) = self.windows.get_mut(&id) {
            if let Err(err) = self.renderer.restyle_border(border, settings, focused) {
                warn!("failed to restyle window {}: {}", id, err);
            }
        }
    }
}
