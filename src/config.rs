//! Game timing configuration.

/// Default time the LED stays lit.
pub const DEFAULT_ON_DURATION_MS: u64 = 500;
/// Default shortest dark period.
pub const DEFAULT_OFF_MIN_MS: u64 = 200;
/// Default width of the random part of the dark period.
pub const DEFAULT_OFF_SPAN_MS: u64 = 2300;
/// Default time a result tone sounds before it is stopped.
pub const DEFAULT_TONE_HOLD_MS: u64 = 50;
/// Default service interval while a continuous animation (the chime) runs.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 10;

/// Start-up chime: a repeated linear frequency sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChimeConfig {
    /// Delay after start before the speaker is used.
    pub ready_delay_ms: u64,
    pub from_hz: u32,
    pub to_hz: u32,
    /// Length of a single sweep.
    pub sweep_ms: u64,
    /// Number of sweeps played.
    pub sweeps: u32,
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            ready_delay_ms: 300,
            from_hz: 440,
            to_hz: 440 * 4,
            sweep_ms: 50,
            sweeps: 5,
        }
    }
}

/// Validated game timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    on_duration_ms: u64,
    off_min_ms: u64,
    off_span_ms: u64,
    tone_hold_ms: u64,
    frame_interval_ms: u64,
    chime: Option<ChimeConfig>,
}

impl GameConfig {
    /// Creates a configuration builder preloaded with the defaults.
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::new()
    }

    pub fn on_duration_ms(&self) -> u64 {
        self.on_duration_ms
    }

    pub fn off_min_ms(&self) -> u64 {
        self.off_min_ms
    }

    pub fn off_span_ms(&self) -> u64 {
        self.off_span_ms
    }

    pub fn tone_hold_ms(&self) -> u64 {
        self.tone_hold_ms
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    pub fn chime(&self) -> Option<ChimeConfig> {
        self.chime
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            on_duration_ms: DEFAULT_ON_DURATION_MS,
            off_min_ms: DEFAULT_OFF_MIN_MS,
            off_span_ms: DEFAULT_OFF_SPAN_MS,
            tone_hold_ms: DEFAULT_TONE_HOLD_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            chime: Some(ChimeConfig::default()),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The LED would never be lit.
    ZeroOnDuration,

    /// The dark period would not be random.
    ZeroOffSpan,

    /// `off_min_ms + off_span_ms` does not fit in a `u64`.
    OffRangeOverflow,

    /// Result tones would stop before they start.
    ZeroToneHold,

    /// Continuous servicing would spin.
    ZeroFrameInterval,

    /// Chime with zero sweep length or zero sweeps.
    EmptyChime,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroOnDuration => write!(f, "LED on duration must be non-zero"),
            ConfigError::ZeroOffSpan => write!(f, "random off span must be non-zero"),
            ConfigError::OffRangeOverflow => write!(f, "off range end overflows u64 milliseconds"),
            ConfigError::ZeroToneHold => write!(f, "tone hold time must be non-zero"),
            ConfigError::ZeroFrameInterval => write!(f, "frame interval must be non-zero"),
            ConfigError::EmptyChime => {
                write!(f, "chime must have at least one sweep of non-zero length")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for [`GameConfig`].
#[derive(Debug)]
pub struct GameConfigBuilder {
    config: GameConfig,
}

impl GameConfigBuilder {
    /// Creates a builder with default timing.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
        }
    }

    /// Sets how long the LED stays lit.
    pub fn on_duration_ms(mut self, millis: u64) -> Self {
        self.config.on_duration_ms = millis;
        self
    }

    /// Sets the dark period as `min + uniform[0, span)`.
    pub fn off_range_ms(mut self, min: u64, span: u64) -> Self {
        self.config.off_min_ms = min;
        self.config.off_span_ms = span;
        self
    }

    /// Sets how long a result tone sounds.
    pub fn tone_hold_ms(mut self, millis: u64) -> Self {
        self.config.tone_hold_ms = millis;
        self
    }

    pub fn frame_interval_ms(mut self, millis: u64) -> Self {
        self.config.frame_interval_ms = millis;
        self
    }

    /// Replaces the start-up chime. `None` disables it.
    pub fn chime(mut self, chime: Option<ChimeConfig>) -> Self {
        self.config.chime = chime;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroOnDuration` - LED on duration is zero
    /// * `ZeroOffSpan` - random off span is zero
    /// * `OffRangeOverflow` - off minimum plus span overflows
    /// * `ZeroToneHold` - tone hold is zero
    /// * `ZeroFrameInterval` - frame interval is zero
    /// * `EmptyChime` - chime has no sweeps or zero-length sweeps
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        let config = self.config;

        if config.on_duration_ms == 0 {
            return Err(ConfigError::ZeroOnDuration);
        }
        if config.off_span_ms == 0 {
            return Err(ConfigError::ZeroOffSpan);
        }
        if config.off_min_ms.checked_add(config.off_span_ms).is_none() {
            return Err(ConfigError::OffRangeOverflow);
        }
        if config.tone_hold_ms == 0 {
            return Err(ConfigError::ZeroToneHold);
        }
        if config.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if let Some(chime) = config.chime {
            if chime.sweep_ms == 0 || chime.sweeps == 0 {
                return Err(ConfigError::EmptyChime);
            }
        }

        Ok(config)
    }
}

impl Default for GameConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
