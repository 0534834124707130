//! Timelapse playback core
//!
//! This crate owns the playback state machine that drives a cursor date
//! over the wildfire dataset. It has no clock or thread of its own: the
//! presentation layer measures frame deltas and feeds them to
//! [`TimelapsePlayer::tick`] once per frame.

pub mod command;
pub mod player;

use thiserror::Error;

// Re-export commonly used types
pub use command::PlayerCommand;
pub use player::{PlaybackState, TimelapsePlayer};

/// Errors that can occur in player operations
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Rejected parameter; the operation leaves the player unchanged.
    #[error("invalid player parameter: {0}")]
    Validation(String),

    #[error(transparent)]
    Data(#[from] fl_data::DataError),
}
