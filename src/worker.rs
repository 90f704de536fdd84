//! The worker side of the farm.  A worker holds nothing but the plane
//! and the iteration cap; it waits for a row, computes it, sends it
//! back, and waits again until it's told to stop.

use crossbeam::channel::{Receiver, Sender};
use log::trace;

use crate::errors::{Error, Result};
use crate::escape::escape_time;
use crate::planes::{Pixel, PlaneMapper};
use crate::protocol::{Reply, RowResult, Task};

/// What a worker did over its lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerSummary {
    /// The worker's index.
    pub id: usize,
    /// Every row it computed, in the order it computed them.
    pub rows: Vec<usize>,
    /// Whether it stopped because it was told to.
    pub terminated: bool,
}

/// Computes rows of the image on request.
pub struct RowWorker<'a> {
    id: usize,
    plane: &'a PlaneMapper,
    max_iterations: u32,
}

impl<'a> RowWorker<'a> {
    /// A worker with index `id` over `plane`.
    pub fn new(id: usize, plane: &'a PlaneMapper, max_iterations: u32) -> Self {
        RowWorker {
            id,
            plane,
            max_iterations,
        }
    }

    /// Computes the escape time of every pixel in `row`.
    pub fn compute_row(&self, row: usize) -> RowResult {
        let counts = (0..self.plane.dim)
            .map(|column| {
                let c = self.plane.pixel_to_point(&Pixel(column, row));
                escape_time(c, self.max_iterations)
            })
            .collect();
        RowResult { row, counts }
    }

    /// Serves tasks until the termination token arrives.  Losing
    /// either channel before then is an error.
    pub fn run(&self, tasks: Receiver<i32>, replies: Sender<Reply>) -> Result<WorkerSummary> {
        let mut summary = WorkerSummary {
            id: self.id,
            rows: vec![],
            terminated: false,
        };
        loop {
            let word = tasks
                .recv()
                .map_err(|_| Error::WorkerLost("the coordinator".to_string()))?;
            match Task::decode(word, self.plane.dim)? {
                Task::Terminate => {
                    summary.terminated = true;
                    break;
                }
                Task::Row(row) => {
                    trace!("worker {} computing row {}", self.id, row);
                    let frame = self.compute_row(row).encode();
                    replies
                        .send(Reply {
                            source: self.id,
                            frame,
                        })
                        .map_err(|_| Error::WorkerLost("the coordinator".to_string()))?;
                    summary.rows.push(row);
                }
            }
        }
        Ok(summary)
    }
}
