//! Configuration for a game.

use crate::constants::{Color, VALID_BOARD_SIZES, VALID_TURN_DURATIONS};
use crate::error::{Error, Result};
use crate::legality::Variant;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Which Top seat the creator of a four-player game takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayAs {
    White,
    Black,
    Random,
}

impl PlayAs {
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Color {
        match self {
            PlayAs::White => Color::White,
            PlayAs::Black => Color::Black,
            PlayAs::Random => *[Color::White, Color::Black]
                .choose(rng)
                .unwrap_or(&Color::White),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board_size: usize,
    /// Seconds players get to submit moves before the turn is resolved.
    pub turn_duration: u32,
    pub player_count: u8,
    pub play_as: PlayAs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: 8,
            turn_duration: 15,
            player_count: 4,
            play_as: PlayAs::Random,
        }
    }
}

impl Config {
    /// Checks every field and returns the variant implied by the player count.
    pub fn validate(&self) -> Result<Variant> {
        if !VALID_BOARD_SIZES.contains(&self.board_size) {
            return Err(Error::UnsupportedBoardSize(self.board_size));
        }
        if !VALID_TURN_DURATIONS.contains(&self.turn_duration) {
            return Err(Error::UnsupportedTurnDuration(self.turn_duration));
        }
        Variant::from_player_count(self.player_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(Variant::FourPlayer));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let bad_size = Config {
            board_size: 9,
            ..Config::default()
        };
        assert_eq!(bad_size.validate(), Err(Error::UnsupportedBoardSize(9)));

        let bad_duration = Config {
            turn_duration: 7,
            ..Config::default()
        };
        assert_eq!(bad_duration.validate(), Err(Error::UnsupportedTurnDuration(7)));

        let bad_count = Config {
            player_count: 3,
            ..Config::default()
        };
        assert_eq!(bad_count.validate(), Err(Error::UnsupportedPlayerCount(3)));
    }

    #[test]
    fn reads_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"board_size": 12, "player_count": 2}"#).unwrap();
        assert_eq!(config.board_size, 12);
        assert_eq!(config.turn_duration, 15);
        assert_eq!(config.validate(), Ok(Variant::TwoPlayer));
    }

    #[test]
    fn random_play_as_draws_both_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        let picks: Vec<Color> = (0..64).map(|_| PlayAs::Random.pick(&mut rng)).collect();
        assert!(picks.contains(&Color::White));
        assert!(picks.contains(&Color::Black));
        assert_eq!(PlayAs::Black.pick(&mut rng), Color::Black);
    }
}
