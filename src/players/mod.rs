//! Implementations of `MoveStrategy` for the three kinds of players.

/// A human driven by input events, with a limited number of smashes.
pub mod human;
/// A player that picks uniformly random moves, smashes included.
pub mod random_player;
/// The search player that samples reversible moves and keeps the best one.
pub mod smart;

use crate::block::Point;
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use ego_tree::NodeId;

/// Picks a uniformly random point and level and returns the block found there.
pub(crate) fn random_block<K: RandomGenerator>(tree: &BlockTree, rng: &mut K) -> NodeId {
    let width = tree.board_width();
    let point = Point::new(rng.next_range(0, width), rng.next_range(0, width));
    let level = rng.next_range(0, u32::from(tree.max_depth()) + 1) as u8;
    tree.locate(point, level)
}
