use std::env;
use tracing::warn;

/// Runtime configuration for the agenda core.
///
/// Values come from the environment with practice defaults, in the same
/// warn-and-fall-back style the rest of the platform loads its settings.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// First hour of the agenda day window (inclusive).
    pub day_start_hour: u32,
    /// Last hour of the agenda day window (exclusive).
    pub day_end_hour: u32,
    /// Width of one agenda slot in minutes.
    pub slot_minutes: i32,
    /// Smallest duration an interactive resize may produce, in slots.
    pub min_duration_slots: i32,
    /// Durations the booking form offers, in minutes.
    pub accepted_durations: Vec<i32>,
    /// Inclusive bounds on the session count of a recurring series.
    pub min_series_sessions: i32,
    pub max_series_sessions: i32,
}

impl SchedulingConfig {
    pub fn from_env() -> Self {
        let config = Self {
            day_start_hour: read_env_u32("AGENDA_DAY_START_HOUR", 8),
            day_end_hour: read_env_u32("AGENDA_DAY_END_HOUR", 19),
            slot_minutes: read_env_i32("AGENDA_SLOT_MINUTES", 15),
            min_duration_slots: read_env_i32("AGENDA_MIN_DURATION_SLOTS", 2),
            accepted_durations: vec![30, 45, 60, 90],
            min_series_sessions: 2,
            max_series_sessions: 52,
        };

        if !config.is_valid() {
            warn!("Agenda configuration is inconsistent - falling back to defaults");
            return Self::default();
        }

        config
    }

    /// The day window must be non-empty and divide evenly into slots.
    pub fn is_valid(&self) -> bool {
        self.day_start_hour < self.day_end_hour
            && self.day_end_hour <= 24
            && self.slot_minutes > 0
            && 60 % self.slot_minutes == 0
            && self.min_duration_slots >= 1
    }

    /// Total number of slots in one agenda day.
    pub fn total_slots(&self) -> i32 {
        let window_minutes = (self.day_end_hour - self.day_start_hour) as i32 * 60;
        window_minutes / self.slot_minutes
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 8,
            day_end_hour: 19,
            slot_minutes: 15,
            min_duration_slots: 2,
            accepted_durations: vec![30, 45, 60, 90],
            min_series_sessions: 2,
            max_series_sessions: 52,
        }
    }
}

fn read_env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a number, using default {}", key, default);
            default
        }),
        Err(_) => default,
    }
}

fn read_env_i32(key: &str, default: i32) -> i32 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a number, using default {}", key, default);
            default
        }),
        Err(_) => default,
    }
}
