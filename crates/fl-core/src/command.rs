//! Typed command surface for the presentation layer
//!
//! UI controls map onto this fixed set of named operations instead of
//! binding arbitrary closures to the player, so the core only ever exposes
//! typed operations.

use crate::player::TimelapsePlayer;
use crate::PlayerError;

/// The operations a control surface may invoke on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Toggle,
    Restart,
    SetSpeed(f64),
}

impl TimelapsePlayer {
    /// Apply one command. Only `SetSpeed` can fail; a rejected command
    /// leaves the player unchanged.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        match command {
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Toggle => self.toggle(),
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::SetSpeed(multiplier) => self.set_speed(multiplier)?,
        }
        Ok(())
    }
}
