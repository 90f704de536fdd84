//! The messages exchanged between the coordinator and its workers.
//!
//! A task is a single integer: a row number in `1..=dim`, or `-1` to
//! tell the worker to stop.  A result frame is the row number followed
//! by the row's `dim` iteration counts, left column first.  Replies
//! travel in an envelope naming the worker that sent them, so the
//! coordinator knows where to send that worker's next row.

use crate::errors::{Error, Result};

/// The task word that tells a worker to stop.
pub const TERMINATE: i32 = -1;

/// What a worker is told to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    /// Compute this row (1-based).
    Row(usize),
    /// Stop asking for work.
    Terminate,
}

impl Task {
    /// The wire form of the task.
    pub fn encode(self) -> i32 {
        match self {
            Task::Row(row) => row as i32,
            Task::Terminate => TERMINATE,
        }
    }

    /// Reads a task word for an image `dim` rows tall.
    pub fn decode(word: i32, dim: usize) -> Result<Task> {
        if word == TERMINATE {
            return Ok(Task::Terminate);
        }
        if word >= 1 && (word as usize) <= dim {
            return Ok(Task::Row(word as usize));
        }
        Err(Error::UnknownTask(word))
    }
}

/// One finished row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowResult {
    /// The row (1-based).
    pub row: usize,
    /// The iteration count of every column, left column first.
    pub counts: Vec<u32>,
}

impl RowResult {
    /// Lays the row out as `[row, counts...]`.
    pub fn encode(&self) -> Vec<u32> {
        let mut frame = Vec::with_capacity(self.counts.len() + 1);
        frame.push(self.row as u32);
        frame.extend_from_slice(&self.counts);
        frame
    }

    /// Reads a frame back for an image `dim` pixels wide.
    pub fn decode(frame: &[u32], dim: usize) -> Result<RowResult> {
        let (&row, counts) = frame
            .split_first()
            .ok_or_else(|| Error::MalformedFrame(frame.len()))?;
        let row = row as usize;
        if row == 0 || row > dim {
            return Err(Error::RowOutOfRange { row, dim });
        }
        if counts.len() != dim {
            return Err(Error::RowLength {
                row,
                expected: dim,
                found: counts.len(),
            });
        }
        Ok(RowResult {
            row,
            counts: counts.to_vec(),
        })
    }
}

/// A result frame and the worker that sent it.
#[derive(Clone, Debug)]
pub struct Reply {
    /// The index of the sending worker.
    pub source: usize,
    /// The encoded `RowResult`.
    pub frame: Vec<u32>,
}
