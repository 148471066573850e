//! # Batch Scheduler
//!
//! Accepts batches without waiting for them and runs them one at a time, in the
//! order they were submitted, on a single long-lived worker task.
//!
//! Every submitted batch gets a [`BatchHandle`] that resolves exactly once: with the
//! batch report, with the error that failed the batch, or with
//! [`FulfilmentError::Cancelled`] if the scheduler shut down while the batch was
//! still queued.

use crate::config::SchedulerConfig;
use crate::error::FulfilmentError;
use crate::model::{Batch, BatchId, BatchReport};
use crate::pipeline::BatchProcessor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("batch queue is full ({0} waiting)")]
    QueueFull(usize),

    #[error("scheduler is shutting down")]
    ShuttingDown,
}

type Completion = oneshot::Sender<Result<BatchReport, FulfilmentError>>;

struct Job {
    batch: Batch,
    completion: Completion,
}

/// Resolves when the worker is done with the batch.
#[derive(Debug)]
pub struct BatchHandle {
    batch_id: BatchId,
    completion: oneshot::Receiver<Result<BatchReport, FulfilmentError>>,
}

impl BatchHandle {
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    pub async fn wait(self) -> Result<BatchReport, FulfilmentError> {
        self.completion
            .await
            .map_err(|_| FulfilmentError::WorkerGone)?
    }
}

pub struct BatchScheduler {
    sender: mpsc::UnboundedSender<Job>,
    queued: Arc<AtomicUsize>,
    max_queued: usize,
    accepting: AtomicBool,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BatchScheduler {
    /// Starts the worker. Must be called from within a tokio runtime.
    pub fn spawn<P: BatchProcessor>(processor: Arc<P>, config: &SchedulerConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let queued = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(work(processor, receiver, queued.clone(), shutdown_rx));

        Self {
            sender,
            queued,
            max_queued: config.max_queued_batches,
            accepting: AtomicBool::new(true),
            shutdown,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queues `batch` behind every batch submitted before it.
    pub fn submit(&self, batch: Batch) -> Result<BatchHandle, SchedulerError> {
        if !self.is_accepting() {
            return Err(SchedulerError::ShuttingDown);
        }
        self.reserve_slot()?;

        let batch_id = batch.id;
        let (completion, receiver) = oneshot::channel();
        if self.sender.send(Job { batch, completion }).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(SchedulerError::ShuttingDown);
        }
        debug!(%batch_id, queued = self.queued(), "Batch queued");

        Ok(BatchHandle {
            batch_id,
            completion: receiver,
        })
    }

    fn reserve_slot(&self) -> Result<(), SchedulerError> {
        let max = self.max_queued;
        self.queued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (max == 0 || n < max).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|n| {
                warn!(queued = n, "Batch rejected, queue full");
                SchedulerError::QueueFull(n)
            })
    }

    /// Batches waiting behind the one in flight.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Stops accepting, lets the batch in flight finish, cancels the queued ones and
    /// waits for the worker to exit. Later calls return immediately.
    pub async fn shutdown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        self.shutdown.send_replace(true);

        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                error!(error = %e, "Batch worker panicked");
            }
        }
    }
}

async fn work<P: BatchProcessor>(
    processor: Arc<P>,
    mut receiver: mpsc::UnboundedReceiver<Job>,
    queued: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Batch worker started");

    loop {
        let job = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            job = receiver.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };
        queued.fetch_sub(1, Ordering::SeqCst);

        let batch_id = job.batch.id;
        info!(%batch_id, orders = job.batch.orders.len(), items = job.batch.item_count(), "Batch started");

        let task = {
            let processor = processor.clone();
            let batch = job.batch.clone();
            tokio::spawn(async move { processor.process(&batch).await })
        };
        let result = task
            .await
            .unwrap_or_else(|e| Err(FulfilmentError::TaskFailed(e.to_string())));

        if let Err(e) = &result {
            error!(%batch_id, error = %e, internal = e.is_internal(), "Batch failed");
            processor.abandon(&job.batch, e).await;
        }
        let _ = job.completion.send(result);
    }

    receiver.close();
    let mut cancelled = 0;
    while let Ok(job) = receiver.try_recv() {
        queued.fetch_sub(1, Ordering::SeqCst);
        let error = FulfilmentError::Cancelled(job.batch.id);
        processor.abandon(&job.batch, &error).await;
        let _ = job.completion.send(Err(error));
        cancelled += 1;
    }

    info!(cancelled, "Batch worker stopped");
}
