//! Player settings with clamping and change events.

use sunset_events::EventSink;
use sunset_types::{GameEvent, RejectionKind, Setting, Settings};
use tracing::{info, warn};

/// Reasons a settings change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The value is NaN or infinite.
    #[error("{setting:?} must be a finite number")]
    NotFinite {
        /// The setting being changed.
        setting: Setting,
    },
}

impl SettingsError {
    /// Classify the rejection.
    pub const fn kind(&self) -> RejectionKind {
        RejectionKind::InvalidArgument
    }
}

/// Current settings plus the defaults they reset to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsState {
    current: Settings,
    defaults: Settings,
}

impl SettingsState {
    /// Start at `defaults`.
    pub const fn new(defaults: Settings) -> Self {
        Self {
            current: defaults,
            defaults,
        }
    }

    /// The current values.
    pub const fn current(&self) -> Settings {
        self.current
    }

    /// The configured defaults.
    pub const fn defaults(&self) -> Settings {
        self.defaults
    }

    /// One current value.
    pub const fn get(&self, setting: Setting) -> f32 {
        self.current.get(setting)
    }

    /// Change one setting, clamped to `[0, 1]`. Returns the stored value.
    ///
    /// [`GameEvent::SettingChanged`] is emitted even if the value did not
    /// change, so listeners can re-apply it.
    pub fn set(&mut self, setting: Setting, value: f32, sink: &mut impl EventSink) -> Result<f32, SettingsError> {
        if !value.is_finite() {
            warn!(setting = setting.key(), value, "Rejected non-finite setting");
            return Err(SettingsError::NotFinite { setting });
        }
        let value = value.clamp(0.0, 1.0);
        self.current.set(setting, value);
        info!(setting = setting.key(), value, "Setting changed");
        sink.emit(GameEvent::SettingChanged { setting, value });
        Ok(value)
    }

    /// Restore every setting to its default, emitting one change per setting.
    pub fn reset(&mut self, sink: &mut impl EventSink) {
        self.current = self.defaults;
        for setting in Setting::ALL {
            sink.emit(GameEvent::SettingChanged {
                setting,
                value: self.current.get(setting),
            });
        }
        info!("Settings reset to defaults");
    }

    /// Replace the current values without events. Used when loading.
    pub const fn replace(&mut self, settings: Settings) {
        self.current = settings;
    }
}
