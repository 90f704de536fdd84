// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coordinator side of the farm.
//!
//! The coordinator owns the pool of unassigned rows and the image
//! being assembled.  It keeps exactly one row in flight per busy
//! worker: every worker is primed with a row, and every time a worker
//! reports a row it is handed the next one straight away, before the
//! report is even filed.  So a worker is never idle for longer than
//! one round trip.  Once the pool runs dry the coordinator collects
//! the stragglers, and only when nothing is in flight does it tell
//! each worker to stop.
//!
//! Replies can arrive in any order; each one is filed under the row
//! it names, so the finished image doesn't depend on which worker was
//! fastest.

use crossbeam::channel::{Receiver, Sender};
use log::{debug, info};

use crate::buffer::ImageBuffer;
use crate::errors::{Error, Result};
use crate::protocol::{Reply, RowResult, Task};

/// Where the coordinator is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Handing every worker its first row.
    Priming,
    /// Trading a new row for every finished one.
    Steady,
    /// No rows left to hand out; waiting for the ones in flight.
    Draining,
    /// Telling the workers to stop.
    Terminating,
    /// Finished.
    Done,
}

/// The rows not yet handed out, dealt from the bottom of the image up.
#[derive(Clone, Debug)]
pub struct TaskPool {
    next: usize,
}

impl TaskPool {
    /// A pool holding every row of an image `dim` rows tall.
    pub fn new(dim: usize) -> Self {
        TaskPool { next: dim }
    }

    /// How many rows are left.
    pub fn remaining(&self) -> usize {
        self.next
    }

    /// True when every row has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.next == 0
    }
}

impl Iterator for TaskPool {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next == 0 {
            return None;
        }
        let row = self.next;
        self.next -= 1;
        Some(row)
    }
}

/// Who was given what.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchLog {
    /// The rows handed to each worker, in the order they were sent.
    pub assignments: Vec<Vec<usize>>,
    /// How many termination tokens each worker was sent.
    pub terminations: Vec<usize>,
}

impl DispatchLog {
    fn new(workers: usize) -> Self {
        DispatchLog {
            assignments: vec![vec![]; workers],
            terminations: vec![0; workers],
        }
    }

    /// The number of rows handed out across all workers.
    pub fn total_dispatched(&self) -> usize {
        self.assignments.iter().map(|rows| rows.len()).sum()
    }
}

/// Hands rows out to workers and assembles what comes back.
pub struct RowCoordinator {
    workers: Vec<Sender<i32>>,
    replies: Receiver<Reply>,
    pool: TaskPool,
    buffer: ImageBuffer,
    outstanding: Vec<Option<usize>>,
    in_flight: usize,
    log: DispatchLog,
    phase: Phase,
}

impl RowCoordinator {
    /// A coordinator for an image `dim` rows tall.  `workers[i]` is the
    /// task channel of worker `i`; `replies` is where every worker
    /// sends its results.  The coordinator must not hold a sender
    /// for `replies` itself, or losing every worker would go
    /// unnoticed.
    pub fn new(dim: usize, workers: Vec<Sender<i32>>, replies: Receiver<Reply>) -> Result<Self> {
        if workers.is_empty() {
            return Err(Error::NoWorkers);
        }
        let count = workers.len();
        Ok(RowCoordinator {
            workers,
            replies,
            pool: TaskPool::new(dim),
            buffer: ImageBuffer::new(dim)?,
            outstanding: vec![None; count],
            in_flight: 0,
            log: DispatchLog::new(count),
            phase: Phase::Priming,
        })
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!("coordinator: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn send(&self, worker: usize, task: Task) -> Result<()> {
        self.workers[worker]
            .send(task.encode())
            .map_err(|_| Error::WorkerLost(format!("worker {}", worker)))
    }

    fn dispatch(&mut self, worker: usize, row: usize) -> Result<()> {
        let allowed = match self.phase {
            Phase::Priming | Phase::Steady => true,
            _ => false,
        };
        if !allowed || self.outstanding[worker].is_some() {
            return Err(Error::BadDispatch { worker, row });
        }
        debug!("dispatching row {} to worker {}", row, worker);
        self.send(worker, Task::Row(row))?;
        self.outstanding[worker] = Some(row);
        self.in_flight += 1;
        self.log.assignments[worker].push(row);
        Ok(())
    }

    fn terminate(&mut self, worker: usize) -> Result<()> {
        if let Some(row) = self.outstanding[worker] {
            return Err(Error::BusyTermination { worker, row });
        }
        self.send(worker, Task::Terminate)?;
        self.log.terminations[worker] += 1;
        Ok(())
    }

    // Blocks until any worker reports, and checks the report is for
    // the row that worker actually owes.
    fn collect(&mut self) -> Result<(usize, RowResult)> {
        let reply = self
            .replies
            .recv()
            .map_err(|_| Error::WorkerLost("every worker".to_string()))?;
        let worker = reply.source;
        if worker >= self.workers.len() {
            return Err(Error::UnknownWorker(worker));
        }
        let result = RowResult::decode(&reply.frame, self.buffer.dim())?;
        if self.outstanding[worker] != Some(result.row) {
            return Err(Error::UnexpectedReply {
                worker,
                row: result.row,
            });
        }
        debug!("worker {} returned row {}", worker, result.row);
        self.outstanding[worker] = None;
        self.in_flight -= 1;
        Ok((worker, result))
    }

    /// Runs the whole exchange and returns the finished image along
    /// with a record of who computed which rows.
    pub fn run(mut self) -> Result<(ImageBuffer, DispatchLog)> {
        for worker in 0..self.workers.len() {
            match self.pool.next() {
                Some(row) => self.dispatch(worker, row)?,
                None => break,
            }
        }
        info!(
            "primed {} of {} workers, {} rows waiting",
            self.in_flight,
            self.workers.len(),
            self.pool.remaining()
        );

        self.enter(if self.pool.is_exhausted() {
            Phase::Draining
        } else {
            Phase::Steady
        });

        while self.in_flight > 0 {
            let (worker, result) = self.collect()?;
            if let Some(row) = self.pool.next() {
                self.dispatch(worker, row)?;
            } else if self.phase == Phase::Steady {
                self.enter(Phase::Draining);
            }
            self.buffer.write_row(result.row, &result.counts)?;
        }

        if !self.buffer.is_complete() {
            return Err(Error::Incomplete(self.buffer.rows_remaining()));
        }

        self.enter(Phase::Terminating);
        for worker in 0..self.workers.len() {
            self.terminate(worker)?;
        }
        self.enter(Phase::Done);
        info!(
            "assembled {} rows from {} workers",
            self.log.total_dispatched(),
            self.workers.len()
        );

        Ok((self.buffer, self.log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::{bounded, unbounded};

    fn channels(workers: usize) -> (Vec<Sender<i32>>, Vec<Receiver<i32>>) {
        (0..workers).map(|_| bounded(1)).unzip()
    }

    #[test]
    fn pool_deals_from_the_bottom_up() {
        let rows: Vec<usize> = TaskPool::new(4).collect();
        assert_eq!(rows, vec![4, 3, 2, 1]);
        assert!(TaskPool::new(0).is_exhausted());
    }

    #[test]
    fn needs_a_worker() {
        let (_tx, rx) = unbounded();
        assert!(RowCoordinator::new(4, vec![], rx).is_err());
    }

    #[test]
    fn starts_out_priming() {
        let (task_txs, _task_rxs) = channels(1);
        let (_reply_tx, reply_rx) = unbounded::<Reply>();
        let coordinator = RowCoordinator::new(2, task_txs, reply_rx).unwrap();
        assert_eq!(coordinator.phase(), Phase::Priming);
    }

    #[test]
    fn dispatch_refuses_a_busy_worker() {
        let (task_txs, _task_rxs) = channels(1);
        let (_reply_tx, reply_rx) = unbounded::<Reply>();
        let mut coordinator = RowCoordinator::new(2, task_txs, reply_rx).unwrap();
        coordinator.dispatch(0, 2).unwrap();
        assert!(coordinator.dispatch(0, 1).is_err());
        assert!(coordinator.terminate(0).is_err());
    }

    #[test]
    fn dispatch_refuses_once_terminating() {
        let (task_txs, _task_rxs) = channels(1);
        let (_reply_tx, reply_rx) = unbounded::<Reply>();
        let mut coordinator = RowCoordinator::new(2, task_txs, reply_rx).unwrap();
        coordinator.enter(Phase::Terminating);
        assert!(coordinator.dispatch(0, 2).is_err());
    }

    #[test]
    fn reply_for_the_wrong_row_is_refused() {
        let (task_txs, _task_rxs) = channels(1);
        let (reply_tx, reply_rx) = unbounded();
        // The worker is primed with row 2 but claims row 1.
        reply_tx
            .send(Reply {
                source: 0,
                frame: vec![1, 0, 0],
            })
            .unwrap();
        let coordinator = RowCoordinator::new(2, task_txs, reply_rx).unwrap();
        match coordinator.run() {
            Err(Error::UnexpectedReply { worker: 0, row: 1 }) => {}
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("a bogus reply was accepted"),
        }
    }

    #[test]
    fn reply_from_a_stranger_is_refused() {
        let (task_txs, _task_rxs) = channels(1);
        let (reply_tx, reply_rx) = unbounded();
        reply_tx
            .send(Reply {
                source: 5,
                frame: vec![2, 0, 0],
            })
            .unwrap();
        let coordinator = RowCoordinator::new(2, task_txs, reply_rx).unwrap();
        assert!(coordinator.run().is_err());
    }

    #[test]
    fn losing_every_worker_is_an_error() {
        let (task_txs, _task_rxs) = channels(2);
        let (reply_tx, reply_rx) = unbounded::<Reply>();
        drop(reply_tx);
        let coordinator = RowCoordinator::new(4, task_txs, reply_rx).unwrap();
        assert!(coordinator.run().is_err());
    }

    #[test]
    fn scripted_exchange_fills_the_image() {
        // Two workers, three rows, with the replies answered by hand
        // out of dispatch order.
        let (task_txs, task_rxs) = channels(2);
        let (reply_tx, reply_rx) = unbounded();
        let coordinator = RowCoordinator::new(3, task_txs, reply_rx).unwrap();

        let script = std::thread::spawn(move || {
            let mut seen = vec![vec![], vec![]];
            // Primed: worker 0 has row 3, worker 1 has row 2.
            for (worker, rx) in task_rxs.iter().enumerate() {
                seen[worker].push(rx.recv().unwrap());
            }
            // Worker 1 answers first and is handed row 1.
            reply_tx.send(Reply { source: 1, frame: vec![2, 20, 21, 22] }).unwrap();
            seen[1].push(task_rxs[1].recv().unwrap());
            reply_tx.send(Reply { source: 1, frame: vec![1, 10, 11, 12] }).unwrap();
            reply_tx.send(Reply { source: 0, frame: vec![3, 30, 31, 32] }).unwrap();
            for (worker, rx) in task_rxs.iter().enumerate() {
                seen[worker].push(rx.recv().unwrap());
            }
            seen
        });

        let (buffer, log) = coordinator.run().unwrap();
        let seen = script.join().unwrap();

        assert_eq!(seen, vec![vec![3, -1], vec![2, 1, -1]]);
        assert_eq!(log.assignments, vec![vec![3], vec![2, 1]]);
        assert_eq!(log.terminations, vec![1, 1]);
        assert_eq!(log.total_dispatched(), 3);
        assert_eq!(
            buffer.counts().unwrap(),
            &[10, 11, 12, 20, 21, 22, 30, 31, 32]
        );
    }

    #[test]
    fn idle_extra_workers_are_still_stopped() {
        let (task_txs, task_rxs) = channels(3);
        let (reply_tx, reply_rx) = unbounded();
        let coordinator = RowCoordinator::new(1, task_txs, reply_rx).unwrap();

        let script = std::thread::spawn(move || {
            assert_eq!(task_rxs[0].recv().unwrap(), 1);
            reply_tx.send(Reply { source: 0, frame: vec![1, 4] }).unwrap();
            task_rxs
                .iter()
                .map(|rx| rx.recv().unwrap())
                .collect::<Vec<i32>>()
        });

        let (buffer, log) = coordinator.run().unwrap();
        assert_eq!(script.join().unwrap(), vec![-1, -1, -1]);
        assert_eq!(log.assignments, vec![vec![1], vec![], vec![]]);
        assert_eq!(log.terminations, vec![1, 1, 1]);
        assert_eq!(buffer.counts().unwrap(), &[4]);
    }
}
