//! Game setup: board size, seats, rounds and goal kind.
//!
//! Every field has a default, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! max_depth = 3
//! rounds = 5
//! random_players = 1
//! smart_players = [2, 5]
//! goal = "perimeter"
//! seed = 42
//! ```

use crate::error::ConfigError;
use crate::goal::GoalKind;
use crate::players::human::DEFAULT_MAX_SMASHES;
use crate::players::smart::DEFAULT_DIFFICULTY_BUDGETS;
use crate::random::DEFAULT_SEED;
use crate::tree::BlockTree;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

fn d_board_width() -> u32 {
    512
}
fn d_max_depth() -> u8 {
    4
}
fn d_rounds() -> u32 {
    10
}
fn d_max_smashes() -> u32 {
    DEFAULT_MAX_SMASHES
}
fn d_difficulty_budgets() -> Vec<u32> {
    DEFAULT_DIFFICULTY_BUDGETS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Side length of the board in pixels.
    #[serde(default = "d_board_width")]
    pub board_width: u32,
    #[serde(default = "d_max_depth")]
    pub max_depth: u8,
    /// Every player moves once per round.
    #[serde(default = "d_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub human_players: usize,
    #[serde(default)]
    pub random_players: usize,
    /// One entry per smart player, holding its difficulty.
    #[serde(default)]
    pub smart_players: Vec<u8>,
    /// Goal kind shared by every player. Picked at random when absent.
    #[serde(default)]
    pub goal: Option<GoalKind>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "d_max_smashes")]
    pub max_smashes: u32,
    /// Search budget per smart difficulty. Higher difficulties use the last entry.
    #[serde(default = "d_difficulty_budgets")]
    pub difficulty_budgets: Vec<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: d_board_width(),
            max_depth: d_max_depth(),
            rounds: d_rounds(),
            human_players: 0,
            random_players: 0,
            smart_players: Vec::new(),
            goal: None,
            seed: None,
            max_smashes: d_max_smashes(),
            difficulty_budgets: d_difficulty_budgets(),
        }
    }
}

impl GameConfig {
    /// Two smart players of difficulty 1 and 6 playing ten rounds.
    pub fn auto_game() -> Self {
        Self {
            smart_players: vec![1, 6],
            seed: Some(DEFAULT_SEED),
            ..Self::default()
        }
    }

    /// Two humans on a depth-3 board for five rounds.
    pub fn two_player_game() -> Self {
        Self {
            max_depth: 3,
            rounds: 5,
            human_players: 2,
            seed: Some(507),
            ..Self::default()
        }
    }

    /// A single human playing thirty rounds.
    pub fn solitaire_game() -> Self {
        Self {
            rounds: 30,
            human_players: 1,
            seed: Some(507),
            ..Self::default()
        }
    }

    /// One seat of each kind.
    pub fn sample_game() -> Self {
        Self {
            rounds: 3,
            human_players: 1,
            random_players: 1,
            smart_players: vec![6],
            ..Self::default()
        }
    }

    /// Number of seats of every kind.
    pub fn player_count(&self) -> usize {
        self.human_players + self.random_players + self.smart_players.len()
    }

    /// Total number of turns in a game that is not quit early.
    pub fn total_turns(&self) -> usize {
        self.rounds as usize * self.player_count()
    }

    /// Checks board dimensions, seats, rounds and budgets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        BlockTree::check_dimensions(self.board_width, self.max_depth)?;
        if self.player_count() == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.difficulty_budgets.is_empty() {
            return Err(ConfigError::NoDifficultyBudgets);
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading game config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::error::ConfigError;
    use crate::goal::GoalKind;

    #[test]
    fn test1_empty_document_uses_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();

        assert_eq!(config, GameConfig::default());
        assert_eq!(config.board_width, 512);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.difficulty_budgets, vec![5, 10, 25, 50, 100, 150]);
        // no seats
        assert!(matches!(config.validate(), Err(ConfigError::NoPlayers)));
    }

    #[test]
    fn test2_parse_full_document() {
        let content = r#"
            board_width = 256
            max_depth = 3
            rounds = 2
            human_players = 1
            random_players = 1
            smart_players = [0, 4]
            goal = "perimeter"
            seed = 42
            max_smashes = 2
        "#;

        let config = GameConfig::from_toml_str(content).unwrap();

        assert_eq!(config.board_width, 256);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.goal, Some(GoalKind::Perimeter));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_smashes, 2);
        assert_eq!(config.player_count(), 4);
        assert_eq!(config.total_turns(), 8);
    }

    #[test]
    fn test3_invalid_values_are_rejected() {
        let too_deep = GameConfig::from_toml_str("max_depth = 6\nrandom_players = 1");
        let uneven = GameConfig::from_toml_str("board_width = 100\nrandom_players = 1");
        let no_rounds = GameConfig::from_toml_str("rounds = 0\nrandom_players = 1");
        let no_budgets = GameConfig::from_toml_str("difficulty_budgets = []\nsmart_players = [1]");
        let bad_goal = GameConfig::from_toml_str("goal = \"diagonal\"\nrandom_players = 1");

        assert!(matches!(too_deep, Err(ConfigError::InvalidMaxDepth { got: 6, .. })));
        assert!(matches!(uneven, Err(ConfigError::InvalidBoardWidth { width: 100, .. })));
        assert!(matches!(no_rounds, Err(ConfigError::NoRounds)));
        assert!(matches!(no_budgets, Err(ConfigError::NoDifficultyBudgets)));
        assert!(matches!(bad_goal, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test4_presets_are_valid() {
        for config in [
            GameConfig::auto_game(),
            GameConfig::two_player_game(),
            GameConfig::solitaire_game(),
            GameConfig::sample_game(),
        ] {
            config.validate().unwrap();
        }
        assert_eq!(GameConfig::auto_game().seed, Some(1001));
        assert_eq!(GameConfig::solitaire_game().total_turns(), 30);
    }

    #[test]
    fn test5_missing_file_is_an_io_error() {
        let result = GameConfig::load_from_path("does/not/exist.toml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
