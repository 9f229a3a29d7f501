//! Mini-games: difficulty tables and result processing.
//!
//! Game rewards come from missions; the difficulty table only drives what the
//! game screen advertises and the tic-tac-toe loss penalty.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::triggers;
use crate::error::{GameError, Result};
use crate::ledger::Ledger;
use crate::rewards::{evaluate_achievements, evaluate_level, process_action};

/// A playable mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Game {
    /// Card-matching memory game.
    #[serde(rename = "memoria")]
    Memory,
    /// Tic-tac-toe against a bot or a friend.
    #[serde(rename = "tictactoe")]
    TicTacToe,
}

impl Game {
    /// Every game, in menu order.
    pub const ALL: [Self; 2] = [Self::Memory, Self::TicTacToe];

    /// Menu title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Memory => "Memoria",
            Self::TicTacToe => "Tic Tac Toe",
        }
    }

    /// Menu icon.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Memory => "🧠",
            Self::TicTacToe => "❌⭕",
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memoria",
            Self::TicTacToe => "tictactoe",
        }
    }

    /// Difficulty settings for this game.
    #[must_use]
    pub const fn config(self, difficulty: Difficulty) -> DifficultyConfig {
        match (self, difficulty) {
            (Self::Memory, Difficulty::Easy) => DifficultyConfig::new(10, 5, 0),
            (Self::Memory, Difficulty::Normal) => DifficultyConfig::new(20, 10, 0),
            (Self::Memory, Difficulty::Hard) => DifficultyConfig::new(35, 20, 10),
            (Self::TicTacToe, Difficulty::Easy) => DifficultyConfig::new(8, 4, 0),
            (Self::TicTacToe, Difficulty::Normal) => DifficultyConfig::new(15, 8, 0),
            (Self::TicTacToe, Difficulty::Hard) => DifficultyConfig::new(25, 18, 7),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memoria" => Ok(Self::Memory),
            "tictactoe" => Ok(Self::TicTacToe),
            other => Err(GameError::Validation(format!("unknown game: {other}"))),
        }
    }
}

/// Game difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Easy.
    #[serde(rename = "facil")]
    Easy,
    /// Normal.
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// Hard.
    #[serde(rename = "dificil")]
    Hard,
}

impl Difficulty {
    /// Parse a difficulty, falling back to [`Difficulty::Normal`] for missing
    /// or unknown values.
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("facil") => Self::Easy,
            Some("dificil") => Self::Hard,
            _ => Self::Normal,
        }
    }

    /// Every difficulty, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];
}

/// Per-difficulty numbers shown on a game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyConfig {
    /// Points advertised for a win.
    pub puntos_ganar: i64,
    /// Experience advertised for a win.
    pub xp_ganar: i64,
    /// Points removed on a tic-tac-toe loss.
    pub penalizacion: i64,
}

impl DifficultyConfig {
    const fn new(puntos_ganar: i64, xp_ganar: i64, penalizacion: i64) -> Self {
        Self {
            puntos_ganar,
            xp_ganar,
            penalizacion,
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The student won.
    #[serde(rename = "ganado")]
    Won,
    /// The student lost.
    #[serde(rename = "perdido")]
    Lost,
    /// Played without a winner being reported.
    #[serde(rename = "jugado")]
    Played,
    /// Draw.
    #[serde(rename = "empatado")]
    Draw,
}

impl FromStr for GameOutcome {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ganado" => Ok(Self::Won),
            "perdido" => Ok(Self::Lost),
            "jugado" => Ok(Self::Played),
            "empatado" => Ok(Self::Draw),
            other => Err(GameError::Validation(format!("unknown game result: {other}"))),
        }
    }
}

/// Apply a finished game to the ledger's student.
///
/// Every game fires its "played" trigger and, on a win, its "won" trigger. A
/// tic-tac-toe loss removes the difficulty penalty, never below zero points.
/// Level and achievements are re-evaluated afterwards.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub fn record_game_result<L: Ledger + ?Sized>(
    ledger: &mut L,
    game: Game,
    outcome: GameOutcome,
    difficulty: Difficulty,
) -> Result<()> {
    tracing::debug!(
        student_id = %ledger.student().id,
        game = %game,
        ?outcome,
        ?difficulty,
        "Recording game result"
    );

    match game {
        Game::Memory => {
            process_action(ledger, triggers::PLAY_MEMORY, 1)?;
            if outcome == GameOutcome::Won {
                process_action(ledger, triggers::WIN_MEMORY, 1)?;
            }
        }
        Game::TicTacToe => {
            process_action(ledger, triggers::PLAY_TICTACTOE, 1)?;
            match outcome {
                GameOutcome::Won => process_action(ledger, triggers::WIN_TICTACTOE, 1)?,
                GameOutcome::Lost => {
                    let penalty = game.config(difficulty).penalizacion;
                    let student = ledger.student_mut();
                    student.points = (student.points - penalty).max(0);
                    student.updated_at = Utc::now();
                }
                GameOutcome::Played | GameOutcome::Draw => {}
            }
        }
    }

    evaluate_level(ledger)?;
    evaluate_achievements(ledger)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MissionId;
    use crate::testing::MemoryLedger;

    #[test]
    fn difficulty_falls_back_to_normal() {
        assert_eq!(Difficulty::parse_or_default(None), Difficulty::Normal);
        assert_eq!(Difficulty::parse_or_default(Some("imposible")), Difficulty::Normal);
        assert_eq!(Difficulty::parse_or_default(Some("dificil")), Difficulty::Hard);
    }

    #[test]
    fn config_table_matches_screens() {
        assert_eq!(Game::Memory.config(Difficulty::Hard).penalizacion, 10);
        assert_eq!(Game::TicTacToe.config(Difficulty::Easy).puntos_ganar, 8);
        assert_eq!(Game::TicTacToe.config(Difficulty::Hard).xp_ganar, 18);
    }

    #[test]
    fn memory_win_fires_play_and_win_triggers() {
        let mut ledger = MemoryLedger::seeded();

        record_game_result(&mut ledger, Game::Memory, GameOutcome::Won, Difficulty::Normal).unwrap();

        assert!(ledger.progress_of(MissionId::new(1)).unwrap().completed);
        assert!(ledger.progress_of(MissionId::new(3)).unwrap().completed);
        assert_eq!(ledger.student.points, 40);
        assert_eq!(ledger.student.xp, 20);
    }

    #[test]
    fn tictactoe_loss_applies_penalty_floored_at_zero() {
        let mut ledger = MemoryLedger::seeded();

        // Playing pays 10 points, then the hard penalty removes 7.
        record_game_result(&mut ledger, Game::TicTacToe, GameOutcome::Lost, Difficulty::Hard).unwrap();
        assert_eq!(ledger.student.points, 3);

        record_game_result(&mut ledger, Game::TicTacToe, GameOutcome::Lost, Difficulty::Hard).unwrap();
        assert_eq!(ledger.student.points, 0);
    }

    #[test]
    fn memory_loss_has_no_penalty() {
        let mut ledger = MemoryLedger::seeded();
        ledger.student.points = 50;
        ledger.save_completed(MissionId::new(1));

        record_game_result(&mut ledger, Game::Memory, GameOutcome::Lost, Difficulty::Hard).unwrap();

        assert_eq!(ledger.student.points, 50);
    }

    #[test]
    fn menu_lists_every_game_once() {
        let names: Vec<_> = Game::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(names, ["memoria", "tictactoe"]);
        assert_eq!(Game::TicTacToe.title(), "Tic Tac Toe");
        assert!(Game::ALL.iter().all(|g| !g.emoji().is_empty()));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("ajedrez".parse::<Game>().is_err());
        assert!("abandonado".parse::<GameOutcome>().is_err());
        assert_eq!("empatado".parse::<GameOutcome>().unwrap(), GameOutcome::Draw);
    }
}
