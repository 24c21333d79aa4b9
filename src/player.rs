use crate::goal::Goal;
use crate::moves::Move;
use crate::players::human::HumanPlayer;
use crate::players::random_player::RandomPlayer;
use crate::players::smart::SmartPlayer;
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use ego_tree::NodeId;

/// The contract every kind of player implements: pick a move for the current board and apply it.
///
/// Implementations mutate the tree at most once per call. A player that needs outside input
/// answers `MoveOutcome::AwaitingInput` instead of blocking.
pub trait MoveStrategy {
    fn choose_and_apply_move<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        goal: &Goal,
        rng: &mut K,
    ) -> MoveOutcome;
}

/// A move that was applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub block: NodeId,
    /// Level of the block when the move was applied.
    pub level: u8,
    pub mv: Move,
}

/// Result of asking a player for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The board was changed by exactly one move.
    Moved(AppliedMove),
    /// The player completed the turn without touching the board.
    Passed,
    /// Nothing happened yet; the player waits for input events.
    AwaitingInput,
    /// The player asked to end the game.
    Quit,
}

/// How a player chooses moves. Fixed per player for the whole game.
#[derive(Debug, Clone)]
pub enum Strategy {
    Human(HumanPlayer),
    Random(RandomPlayer),
    Smart(SmartPlayer),
}

impl Strategy {
    /// Short name of the strategy kind, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Human(_) => "human",
            Strategy::Random(_) => "random",
            Strategy::Smart(_) => "smart",
        }
    }
}

impl MoveStrategy for Strategy {
    fn choose_and_apply_move<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        goal: &Goal,
        rng: &mut K,
    ) -> MoveOutcome {
        match self {
            Strategy::Human(human) => human.choose_and_apply_move(tree, goal, rng),
            Strategy::Random(random) => random.choose_and_apply_move(tree, goal, rng),
            Strategy::Smart(smart) => smart.choose_and_apply_move(tree, goal, rng),
        }
    }
}

/// A seat at the table: an id, a goal and a strategy.
#[derive(Debug, Clone)]
pub struct Player {
    id: usize,
    goal: Goal,
    strategy: Strategy,
}

impl Player {
    /// Creates a seat.
    pub fn new(id: usize, goal: Goal, strategy: Strategy) -> Self {
        Self { id, goal, strategy }
    }

    /// Seat index, starting at 0.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The player's private goal.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// How the player chooses moves.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Whether the player is driven by input events.
    pub fn is_human(&self) -> bool {
        matches!(self.strategy, Strategy::Human(_))
    }

    /// The human strategy, if this is a human seat.
    pub fn human_mut(&mut self) -> Option<&mut HumanPlayer> {
        match &mut self.strategy {
            Strategy::Human(human) => Some(human),
            _ => None,
        }
    }

    /// Asks the strategy for this turn's move.
    pub fn make_move<K: RandomGenerator>(&mut self, tree: &mut BlockTree, rng: &mut K) -> MoveOutcome {
        self.strategy.choose_and_apply_move(tree, &self.goal, rng)
    }

    /// Current score of the player on `tree`.
    pub fn score(&self, tree: &BlockTree) -> u32 {
        self.goal.score(tree)
    }
}
