use super::color::Color;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bold: bool,
}

/// A grid of colored characters the size of the terminal, drawn a frame at a time.
#[derive(Debug)]
pub(crate) struct Canvas {
    width: u16,
    height: u16,
    background: Color,
    cells: Vec<Cell>,
}

impl Canvas {
    pub(crate) fn new(width: u16, height: u16, background: Color) -> Self {
        let blank = Cell { ch: ' ', fg: background, bold: false };
        Self { width, height, background, cells: vec![blank; usize::from(width) * usize::from(height)] }
    }

    pub(crate) fn width(&self) -> u16 {
        self.width
    }

    pub(crate) fn height(&self) -> u16 {
        self.height
    }

    /// Write a character, ignoring anything outside the canvas.
    pub(crate) fn put(&mut self, column: i32, row: i32, ch: char, fg: Color) {
        self.put_styled(column, row, ch, fg, false);
    }

    pub(crate) fn put_styled(&mut self, column: i32, row: i32, ch: char, fg: Color, bold: bool) {
        let (Ok(column), Ok(row)) = (u16::try_from(column), u16::try_from(row)) else {
            return;
        };
        if column >= self.width || row >= self.height {
            return;
        }
        let index = usize::from(row) * usize::from(self.width) + usize::from(column);
        self.cells[index] = Cell { ch, fg, bold };
    }

    /// Write a string left to right starting at a cell. Spaces are transparent.
    pub(crate) fn put_str(&mut self, column: i32, row: i32, text: &str, fg: Color, bold: bool) {
        for (offset, ch) in (0..).zip(text.chars()) {
            if ch != ' ' {
                self.put_styled(column + offset, row, ch, fg, bold);
            }
        }
    }

    /// The characters on a row, for inspection.
    #[cfg(test)]
    pub(crate) fn row_text(&self, row: u16) -> String {
        let start = usize::from(row) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)].iter().map(|cell| cell.ch).collect()
    }

    #[cfg(test)]
    pub(crate) fn color_at(&self, column: u16, row: u16) -> Option<Color> {
        let cell = self.cells.get(usize::from(row) * usize::from(self.width) + usize::from(column))?;
        (cell.ch != ' ').then_some(cell.fg)
    }

    /// Queue the whole frame onto a terminal writer.
    pub(crate) fn draw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        queue!(writer, SetBackgroundColor(self.background.into()))?;
        for row in 0..self.height {
            queue!(writer, MoveTo(0, row))?;
            let start = usize::from(row) * usize::from(self.width);
            let mut current: Option<(Color, bool)> = None;
            for cell in &self.cells[start..start + usize::from(self.width)] {
                if current != Some((cell.fg, cell.bold)) {
                    let attribute = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(writer, SetForegroundColor(cell.fg.into()), SetAttribute(attribute))?;
                    current = Some((cell.fg, cell.bold));
                }
                queue!(writer, Print(cell.ch))?;
            }
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(255, 255, 255);
    const BLACK: Color = Color::new(0, 0, 0);

    #[test]
    fn clips_outside_writes() {
        let mut canvas = Canvas::new(5, 2, BLACK);
        canvas.put_str(-2, 0, "abcdefgh", WHITE, false);
        canvas.put(0, 5, 'x', WHITE);
        assert_eq!(canvas.row_text(0), "cdefg");
        assert_eq!(canvas.row_text(1), "     ");
    }

    #[test]
    fn spaces_are_transparent() {
        let mut canvas = Canvas::new(4, 1, BLACK);
        canvas.put_str(0, 0, "xxxx", WHITE, false);
        canvas.put_str(0, 0, "o  o", WHITE, false);
        assert_eq!(canvas.row_text(0), "oxxo");
    }

    #[test]
    fn draws_every_cell() {
        let mut canvas = Canvas::new(3, 2, BLACK);
        canvas.put(1, 1, '#', WHITE);
        let mut output = Vec::new();
        canvas.draw(&mut output).expect("draw failed");
        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.contains('#'));
        assert_eq!(canvas.color_at(1, 1), Some(WHITE));
        assert_eq!(canvas.color_at(0, 0), None);
    }
}
