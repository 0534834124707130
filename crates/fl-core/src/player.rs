//! Timelapse playback state machine

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use fl_data::{DataStore, PlayerSettings, WildfireEvent};

use crate::PlayerError;

/// Playback states. The player starts `Playing` and auto-pauses when the
/// cursor clamps at the last date of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// Time-driven cursor over the wildfire event span.
///
/// The cursor advances in logical steps of `day_increment` days, paced by
/// `base_interval_ms / speed` of accumulated wall-clock time per step.
/// A single `tick` may take several steps when the caller's frame delta
/// spans multiple intervals, so playback never silently lags a slow frame
/// rate.
pub struct TimelapsePlayer {
    store: Arc<DataStore>,
    cursor: NaiveDate,
    first_date: NaiveDate,
    last_date: NaiveDate,
    day_increment: i64,
    window_length_days: i64,
    base_interval_ms: f64,
    speed: f64,
    elapsed_ms: f64,
    state: PlaybackState,
}

impl TimelapsePlayer {
    /// Create a player over `store`, initially `Playing` with the cursor
    /// on the earliest event date.
    pub fn new(store: Arc<DataStore>, settings: &PlayerSettings) -> Result<Self, PlayerError> {
        if settings.day_increment <= 0 {
            return Err(PlayerError::Validation(format!(
                "day increment must be positive, got {}",
                settings.day_increment
            )));
        }
        if settings.window_length_days <= 0 {
            return Err(PlayerError::Validation(format!(
                "window length must be positive, got {}",
                settings.window_length_days
            )));
        }
        if !(settings.base_interval_ms > 0.0) {
            return Err(PlayerError::Validation(format!(
                "base interval must be positive, got {}",
                settings.base_interval_ms
            )));
        }
        if !(settings.speed > 0.0) {
            return Err(PlayerError::Validation(format!(
                "speed multiplier must be positive, got {}",
                settings.speed
            )));
        }

        let first_date = store.earliest_date()?;
        let last_date = store.latest_date()?;

        Ok(Self {
            store,
            cursor: first_date,
            first_date,
            last_date,
            day_increment: settings.day_increment,
            window_length_days: settings.window_length_days,
            base_interval_ms: settings.base_interval_ms,
            speed: settings.speed,
            elapsed_ms: 0.0,
            state: PlaybackState::Playing,
        })
    }

    /// Advance playback by a measured frame delta in milliseconds.
    ///
    /// Returns whether the cursor moved. Accumulated time below one
    /// interval is carried to the next call; time spanning several
    /// intervals advances the cursor by that many steps at once. When the
    /// cursor would pass the last event date it clamps there and the
    /// player auto-pauses, which is the designed end of a timelapse, not
    /// an error.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        if self.state == PlaybackState::Paused {
            return false;
        }

        self.elapsed_ms += delta_ms;
        let interval_ms = self.base_interval_ms / self.speed;
        if self.elapsed_ms < interval_ms {
            return false;
        }

        let steps = (self.elapsed_ms / interval_ms).floor();
        self.elapsed_ms -= steps * interval_ms;
        self.cursor = self.cursor + Duration::days(self.day_increment * steps as i64);

        if self.cursor > self.last_date {
            self.cursor = self.last_date;
            self.state = PlaybackState::Paused;
            debug!(cursor = %self.cursor, "reached end of data, pausing");
        }
        true
    }

    /// Events inside the trailing visibility window
    /// `[max(first, cursor - window_length_days + 1), cursor]`.
    pub fn current_window(&self) -> Vec<&WildfireEvent> {
        let start = (self.cursor - Duration::days(self.window_length_days - 1)).max(self.first_date);
        self.store.events_in_range(start, self.cursor)
    }

    /// Human-readable cursor date, `YYYY-MM-DD`.
    pub fn current_date_label(&self) -> String {
        self.cursor.to_string()
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        };
    }

    /// Rewind to the earliest date and pause, whatever the prior state.
    pub fn restart(&mut self) {
        self.cursor = self.first_date;
        self.elapsed_ms = 0.0;
        self.state = PlaybackState::Paused;
    }

    /// Change the speed multiplier. Takes effect on the next tick without
    /// resetting accumulated time. Non-positive (or NaN) multipliers are
    /// rejected and the player is left unchanged.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PlayerError> {
        if !(multiplier > 0.0) {
            return Err(PlayerError::Validation(format!(
                "speed multiplier must be positive, got {}",
                multiplier
            )));
        }
        self.speed = multiplier;
        Ok(())
    }

    pub fn cursor_date(&self) -> NaiveDate {
        self.cursor
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_data::DataStoreBuilder;
    use std::io::Cursor;

    const CANADA: &str = "\
YEAR,MONTH,DAY,LATITUDE,LONGITUDE
2000,1,1,49.5,-123.1
2000,1,2,50.0,-120.0
2000,1,5,51.0,-119.0
2000,1,20,52.0,-118.0
";

    fn sample_store() -> Arc<DataStore> {
        let mut builder = DataStoreBuilder::new();
        builder
            .ingest_canada_wildfires(Cursor::new(CANADA), "canada.csv")
            .unwrap();
        Arc::new(builder.finish().unwrap())
    }

    fn settings() -> PlayerSettings {
        PlayerSettings {
            day_increment: 1,
            window_length_days: 3,
            base_interval_ms: 10.0,
            speed: 1.0,
        }
    }

    fn player() -> TimelapsePlayer {
        TimelapsePlayer::new(sample_store(), &settings()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_starts_playing_at_earliest_date() {
        let player = player();
        assert!(player.is_playing());
        assert_eq!(player.cursor_date(), date(2000, 1, 1));
        assert_eq!(player.current_date_label(), "2000-01-01");
    }

    #[test]
    fn test_n_ticks_advance_n_increments() {
        let mut player = player();
        for _ in 0..5 {
            assert!(player.tick(10.0));
        }
        assert_eq!(player.cursor_date(), date(2000, 1, 6));
    }

    #[test]
    fn test_sub_interval_deltas_accumulate() {
        let mut player = player();
        assert!(!player.tick(4.0));
        assert!(!player.tick(4.0));
        assert!(player.tick(4.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 2));
        // 2ms carried over
        assert!(player.tick(8.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 3));
    }

    #[test]
    fn test_catch_up_stepping_after_stall() {
        let mut player = player();
        assert!(player.tick(35.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 4));
    }

    #[test]
    fn test_double_speed_doubles_steps() {
        let mut player = player();
        player.set_speed(2.0).unwrap();
        assert!(player.tick(30.0));
        // 30ms at a 5ms effective interval is 6 steps
        assert_eq!(player.cursor_date(), date(2000, 1, 7));
    }

    #[test]
    fn test_clamps_at_latest_date_and_pauses() {
        let mut player = player();
        assert!(player.tick(10_000.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 20));
        assert!(!player.is_playing());
        // A further tick does nothing
        assert!(!player.tick(100.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 20));
    }

    #[test]
    fn test_tick_while_paused_is_a_no_op() {
        let mut player = player();
        player.pause();
        assert!(!player.tick(1_000.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 1));
    }

    #[test]
    fn test_window_is_trailing_and_clipped() {
        let mut player = player();
        // Window of the initial frame covers just the first date
        assert_eq!(player.current_window().len(), 1);

        for _ in 0..4 {
            player.tick(10.0);
        }
        assert_eq!(player.cursor_date(), date(2000, 1, 5));
        // Window [Jan 3, Jan 5] holds only the Jan 5 event
        let window = player.current_window();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].date, date(2000, 1, 5));

        player.restart();
        player.play();
        player.tick(10.0);
        // Window [Dec 31, Jan 2] holds Jan 1 and Jan 2 events
        let window = player.current_window();
        assert_eq!(window.len(), 2);
        for event in window {
            assert!(event.date >= date(2000, 1, 1));
            assert!(event.date <= date(2000, 1, 2));
        }
    }

    #[test]
    fn test_restart_pauses_at_earliest_regardless_of_state() {
        let mut player = player();
        player.tick(10_000.0);
        player.restart();
        assert!(!player.is_playing());
        assert_eq!(player.cursor_date(), date(2000, 1, 1));

        player.play();
        player.tick(10.0);
        player.restart();
        assert!(!player.is_playing());
        assert_eq!(player.cursor_date(), date(2000, 1, 1));
    }

    #[test]
    fn test_set_speed_rejects_non_positive() {
        let mut player = player();
        assert!(matches!(
            player.set_speed(0.0),
            Err(PlayerError::Validation(_))
        ));
        assert!(matches!(
            player.set_speed(-1.5),
            Err(PlayerError::Validation(_))
        ));
        assert!(matches!(
            player.set_speed(f64::NAN),
            Err(PlayerError::Validation(_))
        ));
        assert_eq!(player.speed(), 1.0);
    }

    #[test]
    fn test_speed_change_keeps_accumulated_time() {
        let mut player = player();
        assert!(!player.tick(4.0));
        player.set_speed(2.0).unwrap();
        // 4ms carried + 1ms = 5ms, exactly one step at the halved interval
        assert!(player.tick(1.0));
        assert_eq!(player.cursor_date(), date(2000, 1, 2));
    }

    #[test]
    fn test_play_pause_idempotent() {
        let mut player = player();
        player.play();
        player.play();
        assert!(player.is_playing());
        player.pause();
        player.pause();
        assert!(!player.is_playing());
        player.toggle();
        assert!(player.is_playing());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let store = sample_store();
        let mut bad = settings();
        bad.day_increment = 0;
        assert!(TimelapsePlayer::new(store.clone(), &bad).is_err());
        let mut bad = settings();
        bad.base_interval_ms = -1.0;
        assert!(TimelapsePlayer::new(store, &bad).is_err());
    }
}
