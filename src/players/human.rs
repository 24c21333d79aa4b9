use crate::block::Point;
use crate::error::MoveError;
use crate::goal::Goal;
use crate::moves::{Axis, Move, Rotation};
use crate::player::{AppliedMove, MoveOutcome, MoveStrategy};
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use ego_tree::NodeId;
use tracing::{debug, warn};

pub const DEFAULT_MAX_SMASHES: u32 = 1;

/// One input from whoever drives a human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The pointer now hovers over this board position.
    PointerMove(Point),
    /// Select the enclosing block, one level closer to the root.
    LevelUp,
    /// Select one level deeper below the pointer.
    LevelDown,
    Rotate(Rotation),
    Swap(Axis),
    Smash,
    Quit,
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The selection changed (or was refreshed); the turn goes on.
    Selected { block: NodeId, level: u8 },
    /// A move was applied and the turn is over.
    Moved(AppliedMove),
    /// The move was declined and the board is untouched. The player may try again.
    Rejected(MoveError),
    Quit,
}

/// A player steered by input events.
///
/// The player keeps a pointer position and a selection level. The selected block is the one
/// under the pointer at that level, and the level snaps back when the tree is shallower there.
/// Smashes are limited per game.
#[derive(Debug, Clone)]
pub struct HumanPlayer {
    max_smashes: u32,
    smashes_used: u32,
    level: u8,
    pointer: Point,
    selected: Option<NodeId>,
}

impl Default for HumanPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SMASHES)
    }
}

impl HumanPlayer {
    /// Creates a human allowed `max_smashes` smashes per game.
    pub fn new(max_smashes: u32) -> Self {
        Self {
            max_smashes,
            smashes_used: 0,
            level: 0,
            pointer: Point::new(0, 0),
            selected: None,
        }
    }

    /// Smashes still allowed in this game.
    pub fn smashes_left(&self) -> u32 {
        self.max_smashes.saturating_sub(self.smashes_used)
    }

    /// Level of the current selection.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Last pointer position, clamped to the board.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// The selected block, `None` between turns.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Handles one event. Only `Moved` ends the turn.
    pub fn process_event<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        event: InputEvent,
        rng: &mut K,
    ) -> InputOutcome {
        match event {
            InputEvent::PointerMove(point) => {
                let width = tree.board_width();
                self.pointer = Point::new(point.x.min(width - 1), point.y.min(width - 1));
                self.reselect(tree)
            }
            InputEvent::LevelUp => {
                self.level = self.level.saturating_sub(1);
                self.reselect(tree)
            }
            InputEvent::LevelDown => {
                self.level = (self.level + 1).min(tree.max_depth());
                self.reselect(tree)
            }
            InputEvent::Rotate(rotation) => self.try_move(tree, Move::Rotate(rotation), rng),
            InputEvent::Swap(axis) => self.try_move(tree, Move::Swap(axis), rng),
            InputEvent::Smash => {
                if self.smashes_used >= self.max_smashes {
                    let err = MoveError::SmashLimitReached {
                        limit: self.max_smashes,
                    };
                    warn!(%err, "smash declined");
                    return InputOutcome::Rejected(err);
                }
                let outcome = self.try_move(tree, Move::Smash, rng);
                if matches!(outcome, InputOutcome::Moved(_)) {
                    self.smashes_used += 1;
                }
                outcome
            }
            InputEvent::Quit => {
                tree.clear_highlight();
                self.selected = None;
                InputOutcome::Quit
            }
        }
    }

    fn reselect(&mut self, tree: &mut BlockTree) -> InputOutcome {
        let block = tree.locate(self.pointer, self.level);
        if self.selected != Some(block) {
            if let Some(previous) = self.selected.filter(|id| tree.contains(*id)) {
                tree.set_highlighted(previous, false);
            }
            tree.set_highlighted(block, true);
            self.selected = Some(block);
        }
        self.level = tree.depth(block);
        debug!(block_level = self.level, x = self.pointer.x, y = self.pointer.y, "selection changed");
        InputOutcome::Selected {
            block,
            level: self.level,
        }
    }

    fn try_move<K: RandomGenerator>(&mut self, tree: &mut BlockTree, mv: Move, rng: &mut K) -> InputOutcome {
        let block = match self.selected.filter(|id| tree.contains(*id)) {
            Some(block) => block,
            None => tree.locate(self.pointer, self.level),
        };
        let level = tree.depth(block);
        match tree.apply(block, mv, rng) {
            Ok(()) => {
                tree.clear_highlight();
                self.selected = None;
                InputOutcome::Moved(AppliedMove { block, level, mv })
            }
            Err(err) => {
                warn!(%err, %mv, block_level = level, "move declined");
                InputOutcome::Rejected(err)
            }
        }
    }
}

impl MoveStrategy for HumanPlayer {
    /// Starts the turn with the root selected. Moves arrive later through `process_event`.
    fn choose_and_apply_move<K: RandomGenerator>(
        &mut self,
        tree: &mut BlockTree,
        _goal: &Goal,
        _rng: &mut K,
    ) -> MoveOutcome {
        self.level = 0;
        self.selected = None;
        tree.clear_highlight();
        self.reselect(tree);
        MoveOutcome::AwaitingInput
    }
}

#[cfg(test)]
mod tests {
    use crate::block::{Colour, Point};
    use crate::error::MoveError;
    use crate::goal::{Goal, GoalKind};
    use crate::moves::{Move, Rotation};
    use crate::player::{MoveOutcome, MoveStrategy};
    use crate::players::human::{HumanPlayer, InputEvent, InputOutcome};
    use crate::random::SeededRandomGenerator;
    use crate::tree::{BlockTree, Layout};

    use Colour::{DaffodilDelight as D, OldOlive as O, PacificPoint as P, RealRed as R};

    fn two_level_board() -> BlockTree {
        let layout = Layout::split([
            Layout::split([
                Layout::Leaf(R),
                Layout::Leaf(P),
                Layout::Leaf(O),
                Layout::Leaf(D),
            ]),
            Layout::Leaf(P),
            Layout::Leaf(O),
            Layout::Leaf(D),
        ]);
        BlockTree::from_layout(16, 2, &layout).unwrap()
    }

    fn goal() -> Goal {
        Goal::new(GoalKind::Blob, R)
    }

    fn selected_level(outcome: InputOutcome) -> u8 {
        match outcome {
            InputOutcome::Selected { level, .. } => level,
            other => panic!("expected a selection, got {other:?}"),
        }
    }

    #[test]
    fn test1_turn_starts_with_root_selected() {
        // arrange
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();

        // act
        let outcome = human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        // assert
        assert_eq!(outcome, MoveOutcome::AwaitingInput);
        assert_eq!(human.selected(), Some(tree.root()));
        assert_eq!(tree.highlighted(), Some(tree.root()));
    }

    #[test]
    fn test2_level_navigation_snaps_to_located_block() {
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::PointerMove(Point::new(13, 1)), &mut rng)), 0);
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::LevelDown, &mut rng)), 1);
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::LevelDown, &mut rng)), 2);
        // the NE corner cell
        assert_eq!(tree.block(human.selected().unwrap()).colour, Some(R));
        // the NW quadrant is a single leaf
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::PointerMove(Point::new(2, 2)), &mut rng)), 1);
        assert_eq!(human.level(), 1);
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::LevelDown, &mut rng)), 1);
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::LevelUp, &mut rng)), 0);
        assert_eq!(selected_level(human.process_event(&mut tree, InputEvent::LevelUp, &mut rng)), 0);
        assert_eq!(tree.highlighted(), Some(tree.root()));
    }

    #[test]
    fn test3_rotate_applies_to_selection_and_ends_turn() {
        // arrange
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);
        human.process_event(&mut tree, InputEvent::PointerMove(Point::new(12, 4)), &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);
        let selected = human.selected().unwrap();

        // act
        let outcome = human.process_event(&mut tree, InputEvent::Rotate(Rotation::Clockwise), &mut rng);

        // assert
        let InputOutcome::Moved(applied) = outcome else {
            panic!("expected a move, got {outcome:?}");
        };
        assert_eq!(applied.block, selected);
        assert_eq!(applied.level, 1);
        assert_eq!(applied.mv, Move::Rotate(Rotation::Clockwise));
        assert_eq!(tree.highlighted(), None);
        assert_eq!(human.selected(), None);
        // NE quadrant rows were [P R] / [O D], clockwise gives [O P] / [D R]
        let grid = tree.flatten();
        assert_eq!((grid.get(2, 0), grid.get(3, 0)), (O, P));
        assert_eq!((grid.get(2, 1), grid.get(3, 1)), (D, R));
    }

    #[test]
    fn test4_smash_is_limited() {
        // arrange
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(3);
        let mut human = HumanPlayer::new(1);
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);
        human.process_event(&mut tree, InputEvent::PointerMove(Point::new(2, 2)), &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);

        // act
        let first = human.process_event(&mut tree, InputEvent::Smash, &mut rng);
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);
        let before = tree.flatten();
        let second = human.process_event(&mut tree, InputEvent::Smash, &mut rng);

        // assert
        assert!(matches!(first, InputOutcome::Moved(_)));
        assert_eq!(second, InputOutcome::Rejected(MoveError::SmashLimitReached { limit: 1 }));
        assert_eq!(tree.flatten(), before);
        assert_eq!(human.smashes_left(), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test5_rejected_smash_does_not_use_the_allowance() {
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(3);
        let mut human = HumanPlayer::new(1);
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        let outcome = human.process_event(&mut tree, InputEvent::Smash, &mut rng);

        assert_eq!(outcome, InputOutcome::Rejected(MoveError::SmashAtRoot));
        assert_eq!(human.smashes_left(), 1);
        assert_eq!(human.selected(), Some(tree.root()));
    }

    #[test]
    fn test6_pointer_outside_board_is_clamped() {
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        human.process_event(&mut tree, InputEvent::PointerMove(Point::new(400, 90)), &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);

        assert_eq!(human.pointer(), Point::new(15, 15));
        assert_eq!(tree.block(human.selected().unwrap()).colour, Some(D));
    }

    #[test]
    fn test7_next_turn_starts_at_the_root_again() {
        // arrange: finish a turn with a level-2 block selected
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);
        human.process_event(&mut tree, InputEvent::PointerMove(Point::new(12, 4)), &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);
        human.process_event(&mut tree, InputEvent::LevelDown, &mut rng);
        assert_eq!(human.level(), 2);
        let moved = human.process_event(&mut tree, InputEvent::Rotate(Rotation::Clockwise), &mut rng);
        assert!(matches!(moved, InputOutcome::Moved(applied) if applied.level == 2));

        // act
        let outcome = human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        // assert
        assert_eq!(outcome, MoveOutcome::AwaitingInput);
        assert_eq!(human.level(), 0);
        assert_eq!(human.selected(), Some(tree.root()));
        assert_eq!(tree.highlighted(), Some(tree.root()));
    }

    #[test]
    fn test8_quit_clears_the_selection() {
        let mut tree = two_level_board();
        let mut rng = SeededRandomGenerator::new(1);
        let mut human = HumanPlayer::default();
        human.choose_and_apply_move(&mut tree, &goal(), &mut rng);

        let outcome = human.process_event(&mut tree, InputEvent::Quit, &mut rng);

        assert_eq!(outcome, InputOutcome::Quit);
        assert_eq!(tree.highlighted(), None);
    }
}
