#![forbid(unsafe_code)]

//! Presenter: writes a [`Frame`] to a terminal.
//!
//! Every frame is emitted as whole rows into an internal buffer and flushed
//! once. Rows identical to the previously presented frame are skipped.

use std::io::{self, BufWriter, Write};

use crossterm::{cursor, queue, style::Print, terminal};

use crate::frame::Frame;

/// Size of the internal write buffer (16KB).
const BUFFER_CAPACITY: usize = 16 * 1024;

/// Row-diffing terminal presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    previous: Vec<String>,
    size: (u16, u16),
}

impl<W: Write> Presenter<W> {
    /// Create a presenter over `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            previous: Vec::new(),
            size: (0, 0),
        }
    }

    /// Forget what is on screen; the next present repaints every row.
    pub fn invalidate(&mut self) {
        self.previous.clear();
    }

    /// Present `frame`, writing only rows that changed.
    ///
    /// Returns the number of rows written.
    pub fn present(&mut self, frame: &Frame) -> io::Result<usize> {
        let size = (frame.width(), frame.height());
        if size != self.size {
            self.size = size;
            self.previous.clear();
            queue!(self.writer, terminal::Clear(terminal::ClearType::All))?;
        }

        queue!(self.writer, cursor::Hide)?;
        let mut written = 0;
        for y in 0..frame.height() {
            let row = frame.padded_row(y);
            if self.previous.get(y as usize) == Some(&row) {
                continue;
            }
            queue!(self.writer, cursor::MoveTo(0, y), Print(&row))?;
            written += 1;
        }

        if let Some((x, y)) = frame.cursor_position() {
            queue!(self.writer, cursor::MoveTo(x, y), cursor::Show)?;
        }
        self.writer.flush()?;

        self.previous = (0..frame.height()).map(|y| frame.padded_row(y)).collect();
        Ok(written)
    }

    /// Consume the presenter, returning the inner writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(presenter: Presenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn first_present_writes_every_row() {
        let mut frame = Frame::new(8, 3);
        frame.print(0, 0, "Search:", 8);
        let mut presenter = Presenter::new(Vec::new());
        assert_eq!(presenter.present(&frame).unwrap(), 3);
        assert!(output(presenter).contains("Search: "));
    }

    #[test]
    fn unchanged_rows_are_skipped() {
        let mut frame = Frame::new(8, 2);
        frame.print(0, 0, "one", 8);
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame).unwrap();

        frame.print(0, 1, "two", 8);
        assert_eq!(presenter.present(&frame).unwrap(), 1);

        presenter.invalidate();
        assert_eq!(presenter.present(&frame).unwrap(), 2);
    }

    #[test]
    fn resize_repaints() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&Frame::new(4, 2)).unwrap();
        assert_eq!(presenter.present(&Frame::new(6, 2)).unwrap(), 2);
    }
}
