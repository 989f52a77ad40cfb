//! Status block redrawn in place on the terminal.

use std::io::{self, Write};

use crossterm::{cursor, queue, terminal};

pub struct StatusView<W: Write> {
    out: W,
    drawn: u16,
}

impl<W: Write> StatusView<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }

    /// Replace the previously drawn block with `lines`
    pub fn draw<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        if self.drawn > 0 {
            queue!(self.out, cursor::MoveUp(self.drawn))?;
        }
        queue!(self.out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
        for line in lines {
            writeln!(self.out, "{}", line.as_ref())?;
        }
        self.out.flush()?;
        self.drawn = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_draw_does_not_move_up() {
        let mut view = StatusView::new(Vec::new());
        view.draw(&["a", "b"]).unwrap();

        let text = String::from_utf8(view.out.clone()).unwrap();
        assert!(text.ends_with("a\nb\n"));
        assert!(!text.contains("\x1b[2A"));
    }

    #[test]
    fn test_redraw_moves_up_by_drawn_lines() {
        let mut view = StatusView::new(Vec::new());
        view.draw(&["a", "b"]).unwrap();
        view.out.clear();

        view.draw(&["c"]).unwrap();
        let text = String::from_utf8(view.out.clone()).unwrap();
        assert!(text.starts_with("\x1b[2A"));
        assert!(text.ends_with("c\n"));
    }
}
