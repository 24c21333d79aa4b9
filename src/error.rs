use thiserror::Error;

/// A move that was declined. The tree is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the root block cannot be smashed")]
    SmashAtRoot,

    #[error("cannot smash a block at the maximum depth {max_depth}")]
    SmashAtMaxDepth { max_depth: u8 },

    #[error("no smashes left (limit is {limit})")]
    SmashLimitReached { limit: u32 },

    #[error("block is not part of the board")]
    UnknownBlock,
}

/// Invalid game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_depth must be between 1 and {max}, got {got}")]
    InvalidMaxDepth { got: u8, max: u8 },

    #[error("board width {width} cannot be split into {cells} equal unit cells")]
    InvalidBoardWidth { width: u32, cells: u32 },

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("rounds must be at least 1")]
    NoRounds,

    #[error("difficulty_budgets must not be empty")]
    NoDifficultyBudgets,

    #[error("board layout is deeper than max_depth {max_depth}")]
    LayoutTooDeep { max_depth: u8 },

    #[error(
        "board of width {board_width} and depth {max_depth} does not match the configured \
         width {expected_width} and depth {expected_depth}"
    )]
    TreeMismatch {
        board_width: u32,
        max_depth: u8,
        expected_width: u32,
        expected_depth: u8,
    },

    #[error("expected {expected} goals, got {got}")]
    GoalCount { expected: usize, got: usize },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A broken structural invariant of the block tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("root must cover the whole board of width {board_width}")]
    RootGeometry { board_width: u32 },

    #[error("block at level {level} has {count} children")]
    ChildCount { level: u8, count: usize },

    #[error("block at level {level} is deeper than max depth {max_depth}")]
    TooDeep { level: u8, max_depth: u8 },

    #[error("children of the block at level {level} do not tile it")]
    ChildGeometry { level: u8 },

    #[error("leaf at level {level} has no colour")]
    MissingColour { level: u8 },

    #[error("inner block at level {level} stores a colour")]
    InnerColour { level: u8 },

    #[error("child of the block at level {level} does not link back to it")]
    ParentLink { level: u8 },
}

/// Misuse of the turn orchestrator.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("player {player} is not a human player")]
    NotHumanTurn { player: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
