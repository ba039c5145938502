//! Text rendering of boards.

use crate::actor::Actor;
use crate::board::Board;
use denim_core::{ActorKind, Error, Result};
use std::collections::HashMap;
use std::io::{self, Write};

/// Glyph per actor kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: HashMap<ActorKind, char>,
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::from_pairs([
            (ActorKind::Wall, '█'),
            (ActorKind::Obstacle, '█'),
            (ActorKind::Space, ' '),
            (ActorKind::Egg, 'O'),
            (ActorKind::Food, '*'),
            (ActorKind::Organism, 'x'),
        ])
    }
}

impl GlyphTable {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ActorKind, char)>) -> Self {
        Self {
            glyphs: pairs.into_iter().collect(),
        }
    }

    pub fn glyph(&self, kind: ActorKind) -> Result<char> {
        self.glyphs
            .get(&kind)
            .copied()
            .ok_or(Error::UnhandledActor(kind))
    }

    pub fn convert(&self, actor: &Actor) -> Result<char> {
        self.glyph(actor.kind())
    }

    /// Fail early if any actor kind lacks a glyph
    pub fn check_complete(&self) -> Result<()> {
        ActorKind::all()
            .into_iter()
            .try_for_each(|kind| self.glyph(kind).map(|_| ()))
    }

    /// One line per board row, top to bottom
    pub fn frame(&self, board: &Board) -> Result<String> {
        let (rows, cols) = board.dims();
        let mut out = String::with_capacity(rows * (cols + 1) * 3);
        for row in board.grid().rows() {
            for actor in row {
                out.push(self.convert(actor)?);
            }
            out.push('\n');
        }
        Ok(out)
    }
}

pub trait Renderer {
    fn render_actor(&mut self, actor: &Actor) -> Result<()>;
    fn render_board(&mut self, board: &Board) -> Result<()>;
    fn render_text(&mut self, text: &str) -> Result<()>;
}

/// Writes frames to any `io::Write`, stdout by default
pub struct ConsoleRenderer<W: Write> {
    out: W,
    glyphs: GlyphTable,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), GlyphTable::default())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, glyphs: GlyphTable) -> Self {
        Self { out, glyphs }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render_actor(&mut self, actor: &Actor) -> Result<()> {
        let glyph = self.glyphs.convert(actor)?;
        write!(self.out, "{}", glyph)?;
        Ok(())
    }

    fn render_board(&mut self, board: &Board) -> Result<()> {
        let frame = self.glyphs.frame(board)?;
        writeln!(self.out, "epoch {}", board.epoch())?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn render_text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}
