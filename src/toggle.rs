/// On/off state for link scanning, owned by the host.
///
/// The cursor lookup ignores this flag entirely: opening the path under the
/// cursor keeps working while links are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkToggle {
    /// Whether link scanning is active.
    enabled: bool,
}

impl LinkToggle {
    /// Turn link scanning off.
    pub const fn disable(&mut self) {
        self.enabled = false;
    }

    /// Turn link scanning on.
    pub const fn enable(&mut self) {
        self.enabled = true;
    }

    /// Whether link scanning is active.
    pub const fn is_enabled(&self) -> bool {
        return self.enabled;
    }

    /// Start in the given state.
    pub const fn new(enabled: bool) -> Self {
        return Self { enabled };
    }

    /// Short status line for the user.
    pub const fn status_label(&self) -> &'static str {
        if self.enabled {
            return "File path links: ON";
        }
        return "File path links: OFF (open still works)";
    }

    /// Flip the state and return the new value.
    pub const fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        return self.enabled;
    }
}

impl Default for LinkToggle {
    fn default() -> Self {
        return Self::new(true);
    }
}
