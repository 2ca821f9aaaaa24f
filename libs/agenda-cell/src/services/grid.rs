// libs/agenda-cell/src/services/grid.rs
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::debug;

use shared_config::SchedulingConfig;
use shared_models::Appointment;

use crate::models::GridPlacement;

/// Bidirectional mapping between wall-clock time and the agenda's discrete
/// slot grid (default 08:00-19:00 in 15-minute slots).
#[derive(Debug, Clone)]
pub struct SlotGrid {
    day_start_minutes: i32,
    slot_minutes: i32,
    total_slots: i32,
    min_duration_slots: i32,
}

impl SlotGrid {
    pub fn new(config: &SchedulingConfig) -> Self {
        debug!(
            "Agenda grid: {}:00-{}:00 in {} minute slots",
            config.day_start_hour, config.day_end_hour, config.slot_minutes
        );
        Self {
            day_start_minutes: config.day_start_hour as i32 * 60,
            slot_minutes: config.slot_minutes,
            total_slots: config.total_slots(),
            min_duration_slots: config.min_duration_slots,
        }
    }

    pub fn total_slots(&self) -> i32 {
        self.total_slots
    }

    pub fn slot_minutes(&self) -> i32 {
        self.slot_minutes
    }

    pub fn min_duration_slots(&self) -> i32 {
        self.min_duration_slots
    }

    /// Slot index containing the given instant, or None outside the day
    /// window.
    pub fn time_to_slot(&self, time: DateTime<Utc>) -> Option<i32> {
        let minute_of_day = (time.hour() * 60 + time.minute()) as i32;
        let offset = minute_of_day - self.day_start_minutes;
        if offset < 0 {
            return None;
        }
        let slot = offset / self.slot_minutes;
        if slot >= self.total_slots {
            return None;
        }
        Some(slot)
    }

    pub fn slot_to_time(&self, slot: i32, day: NaiveDate) -> DateTime<Utc> {
        let minute_of_day = self.day_start_minutes + slot * self.slot_minutes;
        let time = NaiveTime::from_hms_opt(
            (minute_of_day / 60) as u32,
            (minute_of_day % 60) as u32,
            0,
        )
        .expect("slot index within the day window");
        Utc.from_utc_datetime(&day.and_time(time))
    }

    /// Slots needed to cover a duration; partial slots round up.
    pub fn duration_slots(&self, duration_minutes: i32) -> i32 {
        (duration_minutes + self.slot_minutes - 1) / self.slot_minutes
    }

    pub fn slots_to_minutes(&self, slots: i32) -> i32 {
        slots * self.slot_minutes
    }

    /// Grid placement of a stored appointment, or None when it starts
    /// outside the visible day window.
    pub fn placement_for(&self, appointment: &Appointment) -> Option<GridPlacement> {
        let start_slot = self.time_to_slot(appointment.start_time)?;
        Some(GridPlacement {
            provider_id: appointment.provider_id,
            day: appointment.start_time.date_naive(),
            start_slot,
            duration_slots: self.duration_slots(appointment.duration_minutes),
        })
    }

    /// Wall-clock schedule for a placement: (start time, duration minutes).
    pub fn schedule_for(&self, placement: &GridPlacement) -> (DateTime<Utc>, i32) {
        (
            self.slot_to_time(placement.start_slot, placement.day),
            self.slots_to_minutes(placement.duration_slots),
        )
    }

    /// Largest start slot that keeps the given duration inside the window.
    pub fn max_start_slot(&self, duration_slots: i32) -> i32 {
        (self.total_slots - duration_slots).max(0)
    }
}

/// Round a pixel delta to the nearest whole number of slots.
pub fn pixels_to_slot_delta(delta_y: f32, slot_height: f32) -> i32 {
    (delta_y / slot_height).round() as i32
}
