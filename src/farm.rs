//! Wires a coordinator to a pool of workers and runs them.
//!
//! Every participant is a thread in a crossbeam scope.  The only
//! thing they share is the read-only plane; everything else moves
//! over channels.  Each worker has a private task channel with room
//! for a single word, since the coordinator never sends a worker more
//! than one thing at a time.  All workers reply on one common
//! channel, and a blocking receive on it is how the coordinator
//! waits on whichever worker finishes first.

use crossbeam::channel::{bounded, unbounded};
use itertools::iproduct;
use log::info;

use crate::buffer::ImageBuffer;
use crate::config::RenderConfig;
use crate::coordinator::{DispatchLog, RowCoordinator};
use crate::errors::{Error, Result};
use crate::escape::escape_time;
use crate::planes::{Pixel, PlaneMapper};
use crate::worker::{RowWorker, WorkerSummary};

/// The outcome of a farmed render.
#[derive(Debug)]
pub struct Rendering {
    /// The assembled image.
    pub image: ImageBuffer,
    /// The coordinator's record of who was sent what.
    pub log: DispatchLog,
    /// Each worker's own account, indexed by worker.
    pub workers: Vec<WorkerSummary>,
}

/// Renders the image described by `config` with `config.workers`
/// worker threads.
pub fn render(config: &RenderConfig) -> Result<Rendering> {
    config.validate()?;
    let plane = config.plane_mapper()?;
    farm(&plane, config.max_iterations, config.workers)
}

/// Renders `plane` with `workers` worker threads.
pub fn farm(plane: &PlaneMapper, max_iterations: u32, workers: usize) -> Result<Rendering> {
    if workers == 0 {
        return Err(Error::NoWorkers);
    }
    info!(
        "rendering {0}x{0} at {1} iterations with {2} workers",
        plane.dim, max_iterations, workers
    );

    let (reply_tx, reply_rx) = unbounded();
    let (task_txs, task_rxs): (Vec<_>, Vec<_>) = (0..workers).map(|_| bounded(1)).unzip();
    let coordinator = RowCoordinator::new(plane.dim, task_txs, reply_rx)?;

    let outcome = crossbeam::scope(|spawner| {
        let handles: Vec<_> = task_rxs
            .into_iter()
            .enumerate()
            .map(|(id, tasks)| {
                let replies = reply_tx.clone();
                spawner.spawn(move |_| RowWorker::new(id, plane, max_iterations).run(tasks, replies))
            })
            .collect();
        // Only the workers may hold the reply channel open.
        drop(reply_tx);

        // Dropping the coordinator at the end of `run` hangs up every
        // task channel, so the workers wind down even if it failed.
        let assembled = coordinator.run();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.join() {
                Ok(summary) => summaries.push(summary),
                Err(_) => return Err(Error::WorkerPanicked),
            }
        }
        let (image, log) = assembled?;
        let workers = summaries.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Rendering {
            image,
            log,
            workers,
        })
    })
    .map_err(|_| Error::WorkerPanicked)??;

    Ok(outcome)
}

/// Computes the image on the calling thread, one pixel at a time.
pub fn render_sequential(plane: &PlaneMapper, max_iterations: u32) -> Result<ImageBuffer> {
    let mut image = ImageBuffer::new(plane.dim)?;
    let mut counts = Vec::with_capacity(plane.dim);
    for (row, column) in iproduct!(1..=plane.dim, 0..plane.dim) {
        counts.push(escape_time(
            plane.pixel_to_point(&Pixel(column, row)),
            max_iterations,
        ));
        if counts.len() == plane.dim {
            image.write_row(row, &counts)?;
            counts.clear();
        }
    }
    Ok(image)
}
