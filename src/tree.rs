use crate::block::{Block, Colour, Point, Quadrant};
use crate::error::{ConfigError, StructureError};
use crate::random::RandomGenerator;
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};

/// Deepest subdivision the engine supports. A depth-5 board flattens to 32x32 unit cells.
pub const MAX_DEPTH_LIMIT: u8 = 5;

/// How fast the chance to subdivide decays with depth: `exp(-DECAY * level)`.
const SUBDIVIDE_DECAY: f64 = 0.25;

/// The recursive board: a quadtree of blocks stored in an arena.
///
/// Children are owned through arena links, parents are plain back links, so a block can
/// walk upwards without any ownership cycle. The children of an inner block are always
/// stored in `Quadrant::ALL` order.
///
/// A smash detaches the replaced subtree but leaves its nodes in the arena, so the arena
/// grows by at most one generated subtree per smash. `compacted` copies only the reachable
/// blocks into a fresh arena. A derived clone copies detached nodes too.
#[derive(Debug, Clone)]
pub struct BlockTree {
    tree: Tree<Block>,
    max_depth: u8,
}

/// Fixed description of a board, used to build reproducible trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Leaf(Colour),
    /// Children in `Quadrant::ALL` order.
    Split(Box<[Layout; 4]>),
}

impl Layout {
    /// Inner block with the given children.
    pub fn split(children: [Layout; 4]) -> Self {
        Layout::Split(Box::new(children))
    }

    fn depth(&self) -> u8 {
        match self {
            Layout::Leaf(_) => 0,
            Layout::Split(children) => 1 + children.iter().map(Layout::depth).max().unwrap_or(0),
        }
    }
}

impl BlockTree {
    /// Checks that `board_width` splits into `2^max_depth` equal integer cells.
    pub fn check_dimensions(board_width: u32, max_depth: u8) -> Result<(), ConfigError> {
        if max_depth == 0 || max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidMaxDepth {
                got: max_depth,
                max: MAX_DEPTH_LIMIT,
            });
        }
        let cells = 1u32 << max_depth;
        if board_width == 0 || board_width % cells != 0 {
            return Err(ConfigError::InvalidBoardWidth {
                width: board_width,
                cells,
            });
        }
        Ok(())
    }

    /// Generates a random board. The root always subdivides; deeper blocks subdivide with
    /// decaying probability until `max_depth`, where every block is a leaf.
    pub fn random<K: RandomGenerator>(
        board_width: u32,
        max_depth: u8,
        rng: &mut K,
    ) -> Result<Self, ConfigError> {
        Self::check_dimensions(board_width, max_depth)?;
        let mut board = Self {
            tree: Tree::new(Block::new_inner(Point::default(), board_width, 0)),
            max_depth,
        };
        let root = board.root();
        board.populate(root, rng);
        Ok(board)
    }

    /// Builds a board from a fixed layout.
    pub fn from_layout(board_width: u32, max_depth: u8, layout: &Layout) -> Result<Self, ConfigError> {
        Self::check_dimensions(board_width, max_depth)?;
        if layout.depth() > max_depth {
            return Err(ConfigError::LayoutTooDeep { max_depth });
        }
        let mut board = Self {
            tree: Tree::new(Block::new_inner(Point::default(), board_width, 0)),
            max_depth,
        };
        let root = board.root();
        board.build_layout(root, layout);
        Ok(board)
    }

    fn build_layout(&mut self, id: NodeId, layout: &Layout) {
        match layout {
            Layout::Leaf(colour) => self.node_mut(id).value().colour = Some(*colour),
            Layout::Split(children) => {
                for (child_id, child_layout) in self.append_children(id).into_iter().zip(children.iter()) {
                    self.build_layout(child_id, child_layout);
                }
            }
        }
    }

    /// Fills a childless block with random content. Used for the initial board and by smash.
    pub(crate) fn populate<K: RandomGenerator>(&mut self, id: NodeId, rng: &mut K) {
        let level = self.block(id).level;
        let subdivide =
            level < self.max_depth && rng.next_f64() < (-SUBDIVIDE_DECAY * f64::from(level)).exp();
        if subdivide {
            for child in self.append_children(id) {
                self.populate(child, rng);
            }
        } else {
            let colour = *rng.get_random_from_slice(&Colour::ALL);
            self.node_mut(id).value().colour = Some(colour);
        }
    }

    /// Appends four colourless children in quadrant order and clears the parent's colour.
    fn append_children(&mut self, id: NodeId) -> [NodeId; 4] {
        let parent = self.block(id).clone();
        let half = parent.size / 2;
        let mut node = self.node_mut(id);
        node.value().colour = None;
        Quadrant::ALL.map(|quadrant| {
            node.append(Block::new_inner(
                quadrant.origin(parent.position, half),
                half,
                parent.level + 1,
            ))
            .id()
        })
    }

    /// Id of the block covering the whole board.
    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    /// Deepest level a block may have.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Side length of the whole board.
    pub fn board_width(&self) -> u32 {
        self.tree.root().value().size
    }

    /// Side length of one cell of the flattened grid.
    pub fn unit_size(&self) -> u32 {
        self.board_width() >> self.max_depth
    }

    /// Returns the block if `id` is currently part of the board.
    pub fn get(&self, id: NodeId) -> Option<&Block> {
        if self.contains(id) {
            self.tree.get(id).map(|node| node.value())
        } else {
            None
        }
    }

    /// Returns the block behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    pub fn block(&self, id: NodeId) -> &Block {
        self.node(id).value()
    }

    /// Whether `id` belongs to this tree and is still reachable from the root.
    /// Blocks replaced by a smash are detached and no longer count.
    pub fn contains(&self, id: NodeId) -> bool {
        let root = self.root();
        match self.tree.get(id) {
            Some(node) => node.id() == root || node.ancestors().any(|ancestor| ancestor.id() == root),
            None => false,
        }
    }

    /// Whether the block has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        !self.node(id).has_children()
    }

    /// Level of the block, 0 for the root.
    pub fn depth(&self, id: NodeId) -> u8 {
        self.block(id).level
    }

    /// Top-left corner and side length of the block.
    pub fn region(&self, id: NodeId) -> (Point, u32) {
        let block = self.block(id);
        (block.position, block.size)
    }

    /// Enclosing block, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent().map(|parent| parent.id())
    }

    /// Children in quadrant order, or `None` for a leaf.
    pub fn children(&self, id: NodeId) -> Option<[NodeId; 4]> {
        let ids: Vec<NodeId> = self.node(id).children().map(|child| child.id()).collect();
        ids.try_into().ok()
    }

    /// Number of blocks reachable from the root.
    pub fn block_count(&self) -> usize {
        self.tree.root().descendants().count()
    }

    /// Number of nodes held by the arena, detached ones included.
    pub fn arena_len(&self) -> usize {
        self.tree.nodes().count()
    }

    /// Copies the reachable blocks into a fresh arena, dropping subtrees detached by smashes.
    /// Block ids of the copy may differ from the original.
    pub fn compacted(&self) -> BlockTree {
        let root = self.tree.root();
        let mut tree = Tree::new(root.value().clone());
        copy_children(tree.root_mut(), root);
        BlockTree {
            tree,
            max_depth: self.max_depth,
        }
    }

    /// Iterates over the leaves in depth-first quadrant order.
    pub fn leaves(&self) -> impl Iterator<Item = &Block> + '_ {
        self.tree
            .root()
            .descendants()
            .filter(|node| !node.has_children())
            .map(|node| node.value())
    }

    /// Finds the block containing `point` at `target_level`, or the leaf that contains it
    /// if the tree ends before that level. Callers must read the level of the result.
    ///
    /// # Panics
    /// Panics if `point` lies outside the board.
    pub fn locate(&self, point: Point, target_level: u8) -> NodeId {
        let mut node = self.tree.root();
        assert!(
            node.value().contains(point),
            "point {point:?} is outside the board of width {}",
            node.value().size
        );
        while node.value().level < target_level {
            let block = node.value();
            let quadrant = Quadrant::containing(block.position, block.size / 2, point);
            match node.children().nth(quadrant.index()) {
                Some(child) => node = child,
                None => break,
            }
        }
        node.id()
    }

    /// Expands the board into a `2^max_depth` square grid of unit-cell colours.
    pub fn flatten(&self) -> ColourGrid {
        let side = 1usize << self.max_depth;
        let unit = self.unit_size();
        let mut grid = ColourGrid::filled(side, Colour::ALL[0]);
        for node in self.tree.root().descendants() {
            let block = node.value();
            if let Some(colour) = block.colour {
                let x0 = (block.position.x / unit) as usize;
                let y0 = (block.position.y / unit) as usize;
                let span = (block.size / unit) as usize;
                for y in y0..y0 + span {
                    for x in x0..x0 + span {
                        grid.set(x, y, colour);
                    }
                }
            }
        }
        grid
    }

    /// Marks or unmarks a block as selected.
    pub fn set_highlighted(&mut self, id: NodeId, highlighted: bool) {
        self.node_mut(id).value().highlighted = highlighted;
    }

    /// The currently highlighted block, if any.
    pub fn highlighted(&self) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|node| node.value().highlighted)
            .map(|node| node.id())
    }

    /// Removes every highlight.
    pub fn clear_highlight(&mut self) {
        let ids: Vec<NodeId> = self
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().highlighted)
            .map(|node| node.id())
            .collect();
        for id in ids {
            self.set_highlighted(id, false);
        }
    }

    /// Checks every structural invariant of the board.
    pub fn validate(&self) -> Result<(), StructureError> {
        let root = self.tree.root();
        let block = root.value();
        if block.level != 0 || block.position != Point::default() || block.size == 0 {
            return Err(StructureError::RootGeometry {
                board_width: block.size,
            });
        }
        self.validate_node(root)
    }

    fn validate_node(&self, node: NodeRef<'_, Block>) -> Result<(), StructureError> {
        let block = node.value();
        if block.level > self.max_depth {
            return Err(StructureError::TooDeep {
                level: block.level,
                max_depth: self.max_depth,
            });
        }
        let children: Vec<NodeRef<'_, Block>> = node.children().collect();
        match children.len() {
            0 => {
                if block.colour.is_none() {
                    return Err(StructureError::MissingColour { level: block.level });
                }
                Ok(())
            }
            4 => {
                if block.colour.is_some() {
                    return Err(StructureError::InnerColour { level: block.level });
                }
                if block.level == self.max_depth {
                    return Err(StructureError::TooDeep {
                        level: block.level + 1,
                        max_depth: self.max_depth,
                    });
                }
                let half = block.size / 2;
                for (child, quadrant) in children.iter().zip(Quadrant::ALL) {
                    let value = child.value();
                    if value.size * 2 != block.size
                        || value.level != block.level + 1
                        || value.position != quadrant.origin(block.position, half)
                    {
                        return Err(StructureError::ChildGeometry { level: block.level });
                    }
                    if child.parent().map(|parent| parent.id()) != Some(node.id()) {
                        return Err(StructureError::ParentLink { level: block.level });
                    }
                    self.validate_node(*child)?;
                }
                Ok(())
            }
            count => Err(StructureError::ChildCount {
                level: block.level,
                count,
            }),
        }
    }

    /// Recomputes position and size of a block and its whole subtree.
    pub(crate) fn update_locations(&mut self, id: NodeId, position: Point, size: u32) {
        {
            let mut node = self.node_mut(id);
            let block = node.value();
            block.position = position;
            block.size = size;
        }
        if let Some(children) = self.children(id) {
            let half = size / 2;
            for (child, quadrant) in children.into_iter().zip(Quadrant::ALL) {
                self.update_locations(child, quadrant.origin(position, half), half);
            }
        }
    }

    /// Re-links the children of `id` in the given order.
    pub(crate) fn reorder_children(&mut self, id: NodeId, order: [NodeId; 4]) {
        let mut node = self.node_mut(id);
        for child in order {
            node.append_id(child);
        }
    }

    /// Detaches all children of `id`, leaving it a colourless block.
    pub(crate) fn detach_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.node(id).children().map(|child| child.id()).collect();
        for child in &children {
            self.node_mut(*child).detach();
        }
        children
    }

    /// Re-attaches previously detached children to a childless block.
    pub(crate) fn attach_children(&mut self, id: NodeId, children: &[NodeId]) {
        let mut node = self.node_mut(id);
        for child in children {
            node.append_id(*child);
        }
    }

    pub(crate) fn set_colour(&mut self, id: NodeId, colour: Option<Colour>) {
        self.node_mut(id).value().colour = colour;
    }

    fn node(&self, id: NodeId) -> NodeRef<'_, Block> {
        self.tree.get(id).expect("block id does not belong to this tree")
    }

    fn node_mut(&mut self, id: NodeId) -> NodeMut<'_, Block> {
        self.tree.get_mut(id).expect("block id does not belong to this tree")
    }
}

fn copy_children(mut target: NodeMut<'_, Block>, source: NodeRef<'_, Block>) {
    for child in source.children() {
        copy_children(target.append(child.value().clone()), child);
    }
}

/// Unit-cell colours of a flattened board, indexed by `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourGrid {
    side: usize,
    cells: Vec<Colour>,
}

impl ColourGrid {
    /// A `side` by `side` grid of one colour.
    pub fn filled(side: usize, colour: Colour) -> Self {
        Self {
            side,
            cells: vec![colour; side * side],
        }
    }

    /// Builds a grid from rows, top row first.
    ///
    /// # Panics
    /// Panics if the rows do not form a square.
    pub fn from_rows(rows: &[Vec<Colour>]) -> Self {
        let side = rows.len();
        assert!(rows.iter().all(|row| row.len() == side), "grid must be square");
        Self {
            side,
            cells: rows.concat(),
        }
    }

    /// Number of cells per row and per column.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Colour of the cell at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Colour {
        self.cells[y * self.side + x]
    }

    /// Paints one cell.
    pub fn set(&mut self, x: usize, y: usize, colour: Colour) {
        self.cells[y * self.side + x] = colour;
    }

    /// Iterates over rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Colour]> + '_ {
        self.cells.chunks(self.side.max(1))
    }
}
