#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot row farm
//!
//! The Mandelbrot set is drawn by taking each pixel's point `c` on the
//! complex plane, iterating `z = z * z + c`, and counting how long it
//! takes `z` to leave the circle of radius two.  Every pixel is
//! independent of every other, which makes it a nice toy for handing
//! work out to a pool of workers.
//!
//! Here the unit of work is one row of the image.  A single
//! coordinator deals rows to a fixed pool of workers, one at a time
//! per worker, and as each worker hands back a finished row it is
//! immediately dealt the next.  Workers that are quick (or lucky
//! enough to get rows that escape early) simply end up doing more
//! rows.  Rows come back in no particular order and are filed by row
//! number, so the finished picture is the same no matter how many
//! workers there were or which of them was fastest.
//!
//! The coordinator and the workers share nothing mutable; they talk
//! only over channels.  See [`coordinator`] for the protocol itself.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod color;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod escape;
pub mod farm;
pub mod planes;
pub mod ppm;
pub mod protocol;
pub mod worker;

pub use buffer::ImageBuffer;
pub use config::RenderConfig;
pub use coordinator::{DispatchLog, Phase, RowCoordinator};
pub use errors::{Error, Result};
pub use escape::escape_time;
pub use farm::{farm, render, render_sequential, Rendering};
pub use planes::{ComplexPlane, Pixel, PlaneMapper};
pub use worker::{RowWorker, WorkerSummary};
