use crate::block::Colour;
use crate::error::MoveError;
use crate::random::RandomGenerator;
use crate::tree::BlockTree;
use ego_tree::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// The opposite direction.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }
}

/// Axis of symmetry for a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Exchanges the top pair of children with the bottom pair.
    Horizontal,
    /// Exchanges the left pair of children with the right pair.
    Vertical,
}

/// An operation a player can apply to one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Rotate(Rotation),
    Swap(Axis),
    /// Replaces the block's content with a freshly generated random subtree.
    Smash,
}

impl Move {
    /// Moves that can be undone by applying their inverse.
    pub const REVERSIBLE: [Move; 4] = [
        Move::Swap(Axis::Horizontal),
        Move::Swap(Axis::Vertical),
        Move::Rotate(Rotation::Clockwise),
        Move::Rotate(Rotation::CounterClockwise),
    ];

    /// The move that undoes this one. Smash has no inverse.
    pub fn inverse(self) -> Option<Move> {
        match self {
            Move::Rotate(rotation) => Some(Move::Rotate(rotation.inverse())),
            Move::Swap(axis) => Some(Move::Swap(axis)),
            Move::Smash => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rotate(Rotation::Clockwise) => f.write_str("rotate clockwise"),
            Move::Rotate(Rotation::CounterClockwise) => f.write_str("rotate counter-clockwise"),
            Move::Swap(Axis::Horizontal) => f.write_str("swap horizontally"),
            Move::Swap(Axis::Vertical) => f.write_str("swap vertically"),
            Move::Smash => f.write_str("smash"),
        }
    }
}

/// What a smash replaced, so the previous subtree can be put back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmashUndo {
    block: NodeId,
    children: Vec<NodeId>,
    colour: Option<Colour>,
}

impl BlockTree {
    /// Cycles the children of `id` one quadrant in the given direction. A leaf is left as is.
    pub fn rotate(&mut self, id: NodeId, rotation: Rotation) -> Result<(), MoveError> {
        self.permute_children(id, |[ne, nw, sw, se]| match rotation {
            Rotation::Clockwise => [nw, sw, se, ne],
            Rotation::CounterClockwise => [se, ne, nw, sw],
        })
    }

    /// Mirrors the children of `id` across `axis`. A leaf is left as is.
    pub fn swap(&mut self, id: NodeId, axis: Axis) -> Result<(), MoveError> {
        self.permute_children(id, |[ne, nw, sw, se]| match axis {
            Axis::Horizontal => [se, sw, nw, ne],
            Axis::Vertical => [nw, ne, se, sw],
        })
    }

    fn permute_children(
        &mut self,
        id: NodeId,
        permute: impl FnOnce([NodeId; 4]) -> [NodeId; 4],
    ) -> Result<(), MoveError> {
        if !self.contains(id) {
            return Err(MoveError::UnknownBlock);
        }
        if let Some(children) = self.children(id) {
            self.reorder_children(id, permute(children));
            let (position, size) = self.region(id);
            self.update_locations(id, position, size);
        }
        Ok(())
    }

    /// Replaces the subtree at `id` with fresh random content at the same position, size and
    /// level. Legal only strictly between the root and `max_depth`.
    pub fn smash<K: RandomGenerator>(&mut self, id: NodeId, rng: &mut K) -> Result<SmashUndo, MoveError> {
        if !self.contains(id) {
            return Err(MoveError::UnknownBlock);
        }
        let level = self.depth(id);
        if level == 0 {
            return Err(MoveError::SmashAtRoot);
        }
        if level >= self.max_depth() {
            return Err(MoveError::SmashAtMaxDepth {
                max_depth: self.max_depth(),
            });
        }

        let colour = self.block(id).colour;
        let children = self.detach_children(id);
        self.set_colour(id, None);
        self.populate(id, rng);
        tracing::debug!(block_level = level, "smashed block regenerated");
        Ok(SmashUndo {
            block: id,
            children,
            colour,
        })
    }

    /// Puts back the subtree a smash replaced. Only valid right after that smash.
    pub fn undo_smash(&mut self, undo: SmashUndo) {
        self.detach_children(undo.block);
        self.attach_children(undo.block, &undo.children);
        self.set_colour(undo.block, undo.colour);
    }

    /// Applies any move to `id`.
    pub fn apply<K: RandomGenerator>(&mut self, id: NodeId, mv: Move, rng: &mut K) -> Result<(), MoveError> {
        match mv {
            Move::Rotate(rotation) => self.rotate(id, rotation),
            Move::Swap(axis) => self.swap(id, axis),
            Move::Smash => self.smash(id, rng).map(|_| ()),
        }
    }
}
