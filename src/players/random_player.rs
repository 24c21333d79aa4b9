use crate::goal::Goal;
use crate::moves::{Axis, Move, Rotation};
use crate::player::{AppliedMove, MoveOutcome, MoveStrategy};
use crate::players::random_block;
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use tracing::debug;

/// Chooses a random block and a random move among swap, rotate and smash, with unlimited smashes.
#[derive(Debug, Clone, Default)]
pub struct RandomPlayer;

impl RandomPlayer {
    /// Creates a random player.
    pub fn new() -> Self {
        RandomPlayer
    }

    fn random_move<K: RandomGenerator>(rng: &mut K) -> Move {
        match rng.next_range(0, 3) {
            0 => Move::Swap(if rng.next_bool() { Axis::Horizontal } else { Axis::Vertical }),
            1 => Move::Rotate(if rng.next_bool() {
                Rotation::Clockwise
            } else {
                Rotation::CounterClockwise
            }),
            _ => Move::Smash,
        }
    }
}

impl MoveStrategy for RandomPlayer {
    /// Samples until a legal combination comes up. Swaps and rotations are always legal,
    /// so only a smash at an illegal level is retried.
    fn choose_and_apply_move<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        _goal: &Goal,
        rng: &mut K,
    ) -> MoveOutcome {
        loop {
            let block = random_block(tree, rng);
            let level = tree.depth(block);
            let mv = Self::random_move(rng);
            match tree.apply(block, mv, rng) {
                Ok(()) => return MoveOutcome::Moved(AppliedMove { block, level, mv }),
                Err(err) => debug!(%err, block_level = level, "random move declined, sampling again"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::block::Colour;
    use crate::goal::{Goal, GoalKind};
    use crate::player::{MoveOutcome, MoveStrategy};
    use crate::players::random_player::RandomPlayer;
    use crate::random::SeededRandomGenerator;
    use crate::tree::BlockTree;

    #[test]
    fn test1_always_applies_a_legal_move() {
        // arrange
        let mut rng = SeededRandomGenerator::new(17);
        let mut tree = BlockTree::random(64, 3, &mut rng).unwrap();
        let goal = Goal::new(GoalKind::Blob, Colour::RealRed);
        let mut player = RandomPlayer::new();

        for _ in 0..50 {
            // act
            let outcome = player.choose_and_apply_move(&mut tree, &goal, &mut rng);

            // assert
            let MoveOutcome::Moved(applied) = outcome else {
                panic!("random player must always move, got {outcome:?}");
            };
            assert!(applied.level <= tree.max_depth());
            tree.validate().unwrap();
        }
    }

    #[test]
    fn test2_same_seed_same_moves() {
        let goal = Goal::new(GoalKind::Perimeter, Colour::OldOlive);
        let play = |seed: u64| {
            let mut rng = SeededRandomGenerator::new(seed);
            let mut tree = BlockTree::random(64, 3, &mut rng).unwrap();
            let mut player = RandomPlayer::new();
            let moves: Vec<_> = (0..10)
                .map(|_| match player.choose_and_apply_move(&mut tree, &goal, &mut rng) {
                    MoveOutcome::Moved(applied) => Some((applied.level, applied.mv)),
                    _ => None,
                })
                .collect();
            (moves, tree.flatten())
        };

        assert_eq!(play(99), play(99));
    }
}
