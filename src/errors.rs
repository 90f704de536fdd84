// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can go wrong.  Most of these are protocol
//! violations, which are bugs rather than conditions anyone is
//! expected to recover from; they are reported instead of panicking
//! so the binary can exit cleanly with a message.

use failure::Fail;
use num::Complex;
use std::io;

/// The crate-wide error type.
#[derive(Debug, Fail)]
pub enum Error {
    /// The image must be at least one pixel on a side.
    #[fail(display = "image dimension must be at least 1")]
    EmptyImage,

    /// The iteration cap must be at least one.
    #[fail(display = "iteration cap must be at least 1")]
    NoIterations,

    /// There must be at least one worker.
    #[fail(display = "the worker pool must contain at least one worker")]
    NoWorkers,

    /// The two corners of the complex plane share a real or imaginary
    /// coordinate, or are not finite.
    #[fail(display = "corners {} and {} do not span a rectangle", _0, _1)]
    DegeneratePlane(Complex<f64>, Complex<f64>),

    /// A row identifier outside `[1, dim]`.
    #[fail(display = "row {} is outside 1..={}", row, dim)]
    RowOutOfRange {
        /// The offending row.
        row: usize,
        /// The image dimension.
        dim: usize,
    },

    /// A row that does not carry exactly `dim` iteration counts.
    #[fail(display = "row {} carries {} counts, expected {}", row, found, expected)]
    RowLength {
        /// The offending row.
        row: usize,
        /// The image dimension.
        expected: usize,
        /// What actually arrived.
        found: usize,
    },

    /// A row written into the image twice.
    #[fail(display = "row {} was written twice", _0)]
    DuplicateRow(usize),

    /// The image was read before every row arrived.
    #[fail(display = "image is missing {} rows", _0)]
    Incomplete(usize),

    /// A task word that is neither a row nor the termination token.
    #[fail(display = "task word {} is neither a row nor the termination token", _0)]
    UnknownTask(i32),

    /// A result frame too short to hold a row identifier.
    #[fail(display = "result frame of length {} is malformed", _0)]
    MalformedFrame(usize),

    /// A reply from a worker the coordinator never started.
    #[fail(display = "reply from unknown worker {}", _0)]
    UnknownWorker(usize),

    /// A reply for a row that was not outstanding with that worker.
    #[fail(display = "worker {} returned row {}, which it was not assigned", worker, row)]
    UnexpectedReply {
        /// The worker that replied.
        worker: usize,
        /// The row it reported.
        row: usize,
    },

    /// A row handed to a worker that was still busy, or handed out
    /// once termination had begun.
    #[fail(display = "cannot dispatch row {} to worker {}", row, worker)]
    BadDispatch {
        /// The worker.
        worker: usize,
        /// The row.
        row: usize,
    },

    /// A termination token for a worker that still owes a row.
    #[fail(display = "worker {} was told to stop while computing row {}", worker, row)]
    BusyTermination {
        /// The worker.
        worker: usize,
        /// The row it still owes.
        row: usize,
    },

    /// The other end of a channel went away.
    #[fail(display = "lost contact with {}", _0)]
    WorkerLost(String),

    /// A worker thread panicked.
    #[fail(display = "a worker thread panicked")]
    WorkerPanicked,

    /// Writing the image failed.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
