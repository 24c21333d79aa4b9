use crate::tree::BlockTree;
use std::io::{self, Write};
use tracing::warn;

/// Presentation hook. The game calls `draw` after every change to the board and at least
/// once per turn.
pub trait Renderer {
    fn draw(&mut self, tree: &BlockTree, active_player: Option<usize>);
}

/// Draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _tree: &BlockTree, _active_player: Option<usize>) {}
}

/// Writes the board as text, one letter per unit cell.
/// Cells of the highlighted block are lower case.
pub struct TextRenderer<W: Write> {
    out: W,
    frames: usize,
}

impl TextRenderer<io::Stdout> {
    /// Renders to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    /// Renders into `out`.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, tree: &BlockTree, active_player: Option<usize>) -> io::Result<()> {
        match active_player {
            Some(player) => writeln!(self.out, "player {player} to move")?,
            None => writeln!(self.out, "game over")?,
        }
        self.out.write_all(render_to_string(tree).as_bytes())?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, tree: &BlockTree, active_player: Option<usize>) {
        match self.write_frame(tree, active_player) {
            Ok(()) => self.frames += 1,
            Err(err) => warn!(%err, "failed to draw board"),
        }
    }
}

/// The board as text, one line per row of unit cells.
pub fn render_to_string(tree: &BlockTree) -> String {
    let grid = tree.flatten();
    let unit = tree.unit_size();
    let highlighted = tree.highlighted().map(|id| tree.region(id));

    let mut text = String::with_capacity(grid.side() * (grid.side() + 1));
    for (y, row) in grid.rows().enumerate() {
        for (x, colour) in row.iter().enumerate() {
            let inside = highlighted.is_some_and(|(origin, size)| {
                let (px, py) = (x as u32 * unit, y as u32 * unit);
                px >= origin.x && px < origin.x + size && py >= origin.y && py < origin.y + size
            });
            let letter = colour.letter();
            text.push(if inside { letter.to_ascii_lowercase() } else { letter });
        }
        text.push('\n');
    }
    text
}
