use crate::block::Colour;
use crate::tree::{BlockTree, ColourGrid};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;

/// How a goal turns the board into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Largest 4-connected region of the target colour.
    Blob,
    /// Target-coloured cells on the outer border, corners counted twice.
    Perimeter,
}

impl GoalKind {
    /// Both goal kinds.
    pub const ALL: [GoalKind; 2] = [GoalKind::Blob, GoalKind::Perimeter];
}

/// A player's objective: a scoring rule and the colour it rewards. Fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Goal {
    kind: GoalKind,
    colour: Colour,
}

impl Goal {
    /// Creates a goal rewarding `colour` under `kind`.
    pub const fn new(kind: GoalKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// The scoring rule.
    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    /// The colour this goal rewards.
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Scores the board for this goal.
    pub fn score(&self, tree: &BlockTree) -> u32 {
        self.score_grid(&tree.flatten())
    }

    /// Scores an already flattened board.
    pub fn score_grid(&self, grid: &ColourGrid) -> u32 {
        match self.kind {
            GoalKind::Blob => blob_score(grid, self.colour),
            GoalKind::Perimeter => perimeter_score(grid, self.colour),
        }
    }

    /// Explains the goal to a player.
    pub fn description(&self) -> String {
        match self.kind {
            GoalKind::Blob => format!(
                "Create the largest connected blob of {}. Only up, down, left and right neighbours connect.",
                self.colour
            ),
            GoalKind::Perimeter => format!(
                "Put as much {} as possible on the outer edge of the board. Corner cells count twice.",
                self.colour
            ),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            GoalKind::Blob => "blob",
            GoalKind::Perimeter => "perimeter",
        };
        write!(f, "{kind} of {}", self.colour)
    }
}

/// Size of the largest 4-connected region of `colour`.
pub fn blob_score(grid: &ColourGrid, colour: Colour) -> u32 {
    let side = grid.side();
    let mut visited = vec![false; side * side];
    let mut best = 0;
    for y in 0..side {
        for x in 0..side {
            if !visited[y * side + x] && grid.get(x, y) == colour {
                best = best.max(region_size(grid, colour, (x, y), &mut visited));
            }
        }
    }
    best
}

fn region_size(grid: &ColourGrid, colour: Colour, start: (usize, usize), visited: &mut [bool]) -> u32 {
    let side = grid.side();
    let mut queue = VecDeque::new();
    visited[start.1 * side + start.0] = true;
    queue.push_back(start);

    let mut size = 0;
    while let Some((x, y)) = queue.pop_front() {
        size += 1;
        let neighbours = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbours {
            if nx < side && ny < side && !visited[ny * side + nx] && grid.get(nx, ny) == colour {
                visited[ny * side + nx] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    size
}

/// Border cells of `colour`. Each cell counts once per board edge it touches.
pub fn perimeter_score(grid: &ColourGrid, colour: Colour) -> u32 {
    let last = grid.side().saturating_sub(1);
    let mut score = 0;
    for i in 0..grid.side() {
        for (x, y) in [(i, 0), (i, last), (0, i), (last, i)] {
            if grid.get(x, y) == colour {
                score += 1;
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use crate::block::Colour;
    use crate::goal::{Goal, GoalKind, blob_score, perimeter_score};
    use crate::random::SeededRandomGenerator;
    use crate::tree::{BlockTree, ColourGrid, Layout};
    use proptest::prelude::*;

    use Colour::{DaffodilDelight as D, OldOlive as O, PacificPoint as P, RealRed as R};

    /// Repeated relabelling until nothing changes; slow but obviously correct.
    fn blob_oracle(grid: &ColourGrid, colour: Colour) -> u32 {
        let side = grid.side();
        let mut label: Vec<Option<usize>> = (0..side * side)
            .map(|i| (grid.get(i % side, i / side) == colour).then_some(i))
            .collect();
        let mut changed = true;
        while changed {
            changed = false;
            for y in 0..side {
                for x in 0..side {
                    let Some(mine) = label[y * side + x] else { continue };
                    let mut neighbours = vec![];
                    if x > 0 {
                        neighbours.push(y * side + x - 1);
                    }
                    if x + 1 < side {
                        neighbours.push(y * side + x + 1);
                    }
                    if y > 0 {
                        neighbours.push((y - 1) * side + x);
                    }
                    if y + 1 < side {
                        neighbours.push((y + 1) * side + x);
                    }
                    for n in neighbours {
                        if let Some(theirs) = label[n] {
                            if theirs < mine {
                                label[y * side + x] = Some(theirs);
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        let mut counts = std::collections::HashMap::new();
        for l in label.into_iter().flatten() {
            *counts.entry(l).or_insert(0u32) += 1;
        }
        counts.into_values().max().unwrap_or(0)
    }

    #[test]
    fn test1_perimeter_counts_corners_twice() {
        let uniform4 = ColourGrid::filled(4, R);
        let uniform2 = ColourGrid::filled(2, R);

        assert_eq!(perimeter_score(&uniform4, R), 16);
        assert_eq!(perimeter_score(&uniform2, R), 8);
        assert_eq!(perimeter_score(&uniform4, P), 0);
    }

    #[test]
    fn test2_perimeter_ignores_interior() {
        let grid = ColourGrid::from_rows(&[
            vec![R, P, P, O],
            vec![P, R, R, P],
            vec![P, R, R, P],
            vec![D, P, P, R],
        ]);

        // two corners (2 each)
        assert_eq!(perimeter_score(&grid, R), 4);
        // eight edge cells
        assert_eq!(perimeter_score(&grid, P), 8);
        assert_eq!(perimeter_score(&grid, O), 2);
    }

    #[test]
    fn test3_blob_uses_four_connectivity() {
        let grid = ColourGrid::from_rows(&[
            vec![R, P, P, P],
            vec![P, R, P, R],
            vec![P, P, R, R],
            vec![O, O, P, R],
        ]);

        // the diagonal reds do not connect
        assert_eq!(blob_score(&grid, R), 4);
        assert_eq!(blob_score(&grid, P), 4);
        assert_eq!(blob_score(&grid, O), 2);
        assert_eq!(blob_score(&grid, D), 0);
    }

    #[test]
    fn test4_goal_scores_the_flattened_board() {
        // arrange
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
        let tree = BlockTree::from_layout(16, 2, &layout).unwrap();

        // act
        let blob = Goal::new(GoalKind::Blob, P).score(&tree);
        let perimeter = Goal::new(GoalKind::Perimeter, D).score(&tree);

        // assert
        assert_eq!(blob, 5);
        assert_eq!(perimeter, 5);
    }

    #[test]
    fn test5_description_names_the_colour() {
        let goal = Goal::new(GoalKind::Perimeter, Colour::OldOlive);
        assert!(goal.description().contains("Old Olive"));
        assert_eq!(goal.to_string(), "perimeter of Old Olive");
    }

    proptest! {
        #[test]
        fn blob_matches_oracle(seed in any::<u64>(), colour_index in 0usize..4) {
            let mut rng = SeededRandomGenerator::new(seed);
            let tree = BlockTree::random(64, 4, &mut rng).unwrap();
            let grid = tree.flatten();
            let colour = Colour::ALL[colour_index];

            prop_assert_eq!(blob_score(&grid, colour), blob_oracle(&grid, colour));
        }

        #[test]
        fn perimeter_is_bounded(seed in any::<u64>(), colour_index in 0usize..4) {
            let mut rng = SeededRandomGenerator::new(seed);
            let tree = BlockTree::random(32, 3, &mut rng).unwrap();
            let colour = Colour::ALL[colour_index];

            let total: u32 = Colour::ALL.iter().map(|c| perimeter_score(&tree.flatten(), *c)).sum();

            prop_assert_eq!(total, 4 * 8);
            prop_assert!(perimeter_score(&tree.flatten(), colour) <= 32);
        }
    }
}
