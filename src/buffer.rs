//! The assembled picture: one iteration count per pixel, filled in a
//! row at a time, in whatever order the rows happen to arrive.

use crate::errors::{Error, Result};

/// A `dim × dim` grid of iteration counts.  Every row is written
/// exactly once; nothing can be read out of a row before it has
/// been written, and the grid as a whole can't be read out until
/// every row is in.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    dim: usize,
    cells: Vec<u32>,
    written: Vec<bool>,
    rows_remaining: usize,
}

impl ImageBuffer {
    /// Allocates an empty grid.
    pub fn new(dim: usize) -> Result<ImageBuffer> {
        if dim == 0 {
            return Err(Error::EmptyImage);
        }
        Ok(ImageBuffer {
            dim,
            cells: vec![0; dim * dim],
            written: vec![false; dim],
            rows_remaining: dim,
        })
    }

    /// The side length of the grid.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// How many rows have yet to be written.
    pub fn rows_remaining(&self) -> usize {
        self.rows_remaining
    }

    /// True once every row has been written.
    pub fn is_complete(&self) -> bool {
        self.rows_remaining == 0
    }

    fn check_row(&self, row: usize) -> Result<usize> {
        if row == 0 || row > self.dim {
            return Err(Error::RowOutOfRange { row, dim: self.dim });
        }
        Ok(row - 1)
    }

    /// Stores the counts for `row` (1-based), left column first.
    pub fn write_row(&mut self, row: usize, counts: &[u32]) -> Result<()> {
        let index = self.check_row(row)?;
        if counts.len() != self.dim {
            return Err(Error::RowLength {
                row,
                expected: self.dim,
                found: counts.len(),
            });
        }
        if self.written[index] {
            return Err(Error::DuplicateRow(row));
        }
        let start = index * self.dim;
        self.cells[start..start + self.dim].copy_from_slice(counts);
        self.written[index] = true;
        self.rows_remaining -= 1;
        Ok(())
    }

    /// The counts of a row that has been written.
    pub fn row(&self, row: usize) -> Option<&[u32]> {
        let index = self.check_row(row).ok()?;
        if !self.written[index] {
            return None;
        }
        let start = index * self.dim;
        Some(&self.cells[start..start + self.dim])
    }

    /// The count at `column` (0-based) of `row` (1-based), if that row
    /// has been written.
    pub fn get(&self, row: usize, column: usize) -> Option<u32> {
        self.row(row).and_then(|r| r.get(column).cloned())
    }

    /// Every count, row-major from the top row, once the grid is full.
    pub fn counts(&self) -> Result<&[u32]> {
        if !self.is_complete() {
            return Err(Error::Incomplete(self.rows_remaining));
        }
        Ok(&self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_refused() {
        assert!(ImageBuffer::new(0).is_err());
    }

    #[test]
    fn rows_fill_in_any_order() {
        let mut buffer = ImageBuffer::new(3).unwrap();
        assert_eq!(buffer.rows_remaining(), 3);
        buffer.write_row(3, &[7, 8, 9]).unwrap();
        buffer.write_row(1, &[1, 2, 3]).unwrap();
        assert!(!buffer.is_complete());
        buffer.write_row(2, &[4, 5, 6]).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(buffer.counts().unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(buffer.get(2, 0), Some(4));
        assert_eq!(buffer.row(3), Some(&[7, 8, 9][..]));
    }

    #[test]
    fn unwritten_rows_cannot_be_read() {
        let mut buffer = ImageBuffer::new(2).unwrap();
        buffer.write_row(2, &[1, 1]).unwrap();
        assert_eq!(buffer.row(1), None);
        assert_eq!(buffer.get(1, 0), None);
        match buffer.counts() {
            Err(Error::Incomplete(1)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rows_are_written_once() {
        let mut buffer = ImageBuffer::new(2).unwrap();
        buffer.write_row(1, &[1, 1]).unwrap();
        match buffer.write_row(1, &[2, 2]) {
            Err(Error::DuplicateRow(1)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(buffer.row(1), Some(&[1, 1][..]));
        assert_eq!(buffer.rows_remaining(), 1);
    }

    #[test]
    fn bad_rows_are_refused() {
        let mut buffer = ImageBuffer::new(2).unwrap();
        assert!(buffer.write_row(0, &[1, 1]).is_err());
        assert!(buffer.write_row(3, &[1, 1]).is_err());
        assert!(buffer.write_row(1, &[1]).is_err());
        assert_eq!(buffer.rows_remaining(), 2);
    }
}
