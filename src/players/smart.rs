use crate::goal::Goal;
use crate::moves::Move;
use crate::player::{AppliedMove, MoveOutcome, MoveStrategy};
use crate::players::random_block;
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use ego_tree::NodeId;
use tracing::{debug, warn};

/// Number of sampled moves per difficulty level, starting at difficulty 0.
/// Difficulties past the end of the table use the last entry.
pub const DEFAULT_DIFFICULTY_BUDGETS: [u32; 6] = [5, 10, 25, 50, 100, 150];

/// Looks up the search budget of a difficulty.
pub fn budget_for_difficulty(difficulty: u8, budgets: &[u32]) -> u32 {
    budgets
        .get(usize::from(difficulty))
        .or(budgets.last())
        .copied()
        .unwrap_or(0)
}

/// A sampled move and the score the board had while it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub block: NodeId,
    pub level: u8,
    pub mv: Move,
    pub score: u32,
}

/// What one search pass found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Score of the untouched board.
    pub baseline: u32,
    /// The first sample reaching the highest score strictly above the baseline.
    pub best: Option<Candidate>,
    /// The first sample that kept the baseline score.
    pub fallback: Option<Candidate>,
}

impl SearchResult {
    /// The move to play: the best improvement, otherwise a move that changes nothing score-wise.
    /// `None` means every sample made things worse and the player passes.
    pub fn chosen(&self) -> Option<Candidate> {
        self.best.or(self.fallback)
    }
}

/// Random-restart local search over swaps and rotations.
///
/// Each sample applies a move, scores the board for the player's goal and undoes the move
/// immediately, so the board is unchanged until the chosen move is played. Smash is never
/// sampled because it cannot be undone cheaply.
#[derive(Debug, Clone)]
pub struct SmartPlayer {
    difficulty: u8,
    budget: u32,
}

impl SmartPlayer {
    /// Creates a smart player using the default budget table.
    pub fn new(difficulty: u8) -> Self {
        Self::with_budgets(difficulty, &DEFAULT_DIFFICULTY_BUDGETS)
    }

    /// Creates a smart player using a custom budget table.
    pub fn with_budgets(difficulty: u8, budgets: &[u32]) -> Self {
        Self {
            difficulty,
            budget: budget_for_difficulty(difficulty, budgets),
        }
    }

    /// Creates a smart player with an explicit budget.
    pub fn with_budget(budget: u32) -> Self {
        Self { difficulty: 0, budget }
    }

    /// Configured difficulty.
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Number of moves sampled per turn.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Samples `budget` reversible moves and reports the best one. Leaves the board as it was.
    pub fn evaluate_moves<K: RandomGenerator>(
        &self,
        tree: &mut BlockTree,
        goal: &Goal,
        rng: &mut K,
    ) -> SearchResult {
        let baseline = goal.score(tree);
        let mut result = SearchResult {
            baseline,
            best: None,
            fallback: None,
        };
        let mut best_score = baseline;

        for _ in 0..self.budget {
            let block = random_block(tree, rng);
            let level = tree.depth(block);
            let mv = *rng.get_random_from_slice(&Move::REVERSIBLE);
            if let Err(err) = tree.apply(block, mv, rng) {
                warn!(%err, %mv, "sampled move was declined");
                continue;
            }
            let score = goal.score(tree);
            if let Some(inverse) = mv.inverse() {
                let undone = tree.apply(block, inverse, rng);
                debug_assert!(undone.is_ok(), "undoing {mv} failed");
            }

            let candidate = Candidate {
                block,
                level,
                mv,
                score,
            };
            if score > best_score {
                debug!(score, %mv, block_level = level, "new best candidate");
                best_score = score;
                result.best = Some(candidate);
            } else if score == baseline && result.fallback.is_none() {
                result.fallback = Some(candidate);
            }
        }
        result
    }
}

impl MoveStrategy for SmartPlayer {
    fn choose_and_apply_move<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        goal: &Goal,
        rng: &mut K,
    ) -> MoveOutcome {
        let result = self.evaluate_moves(tree, goal, rng);
        let Some(candidate) = result.chosen() else {
            debug!(baseline = result.baseline, "every sampled move lowered the score, passing");
            return MoveOutcome::Passed;
        };
        match tree.apply(candidate.block, candidate.mv, rng) {
            Ok(()) => MoveOutcome::Moved(AppliedMove {
                block: candidate.block,
                level: candidate.level,
                mv: candidate.mv,
            }),
            Err(err) => {
                warn!(%err, mv = %candidate.mv, "chosen move was declined, passing");
                MoveOutcome::Passed
            }
        }
    }
}
