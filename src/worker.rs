//! Dedicated storage thread. It owns the store, runs jobs one at a time in
//! submission order and sends one completion message back per job.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::app::{Job, Msg};
use crate::store::Store;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to start storage thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("storage thread has stopped")]
    Disconnected,
}

/// Handle to the storage thread.
pub struct Worker {
    jobs: Option<Sender<Job>>,
    messages: Receiver<Msg>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start the storage thread, moving `store` onto it.
    pub fn spawn(store: Box<dyn Store>) -> Result<Self, WorkerError> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

        let handle = thread::Builder::new()
            .name("kb-store".to_string())
            .spawn(move || Self::worker_loop(store, job_rx, msg_tx))?;

        Ok(Self {
            jobs: Some(job_tx),
            messages: msg_rx,
            handle: Some(handle),
        })
    }

    fn worker_loop(mut store: Box<dyn Store>, jobs: Receiver<Job>, messages: Sender<Msg>) {
        for job in jobs {
            let msg = job.run(store.as_mut());
            if messages.send(msg).is_err() {
                break;
            }
        }
        tracing::debug!("storage thread exiting");
    }

    /// Queue a job. Never blocks.
    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        self.jobs
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(job)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Next finished message, if any. Never blocks.
    pub fn try_recv(&self) -> Result<Option<Msg>, WorkerError> {
        match self.messages.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the job channel ends the loop; in-flight work finishes first.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use std::time::{Duration, Instant};

    fn recv(worker: &Worker) -> Msg {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(msg) = worker.try_recv().unwrap() {
                return msg;
            }
            assert!(Instant::now() < deadline, "timed out waiting for worker");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_jobs_complete_in_submission_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let worker = Worker::spawn(Box::new(store)).unwrap();
        worker.submit(Job::CreateBoard { name: "b".into() }).unwrap();
        worker.submit(Job::CreateBoard { name: "a".into() }).unwrap();
        worker.submit(Job::ListBoards).unwrap();

        assert!(matches!(recv(&worker), Msg::BoardCreated(b) if b.name == "b"));
        assert!(matches!(recv(&worker), Msg::BoardCreated(b) if b.name == "a"));
        match recv(&worker) {
            Msg::BoardsListed(boards) => {
                let names: Vec<&str> = boards.iter().map(|b| b.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_try_recv_empty_does_not_block() {
        let store = SqliteStore::open_in_memory().unwrap();
        let worker = Worker::spawn(Box::new(store)).unwrap();
        assert!(worker.try_recv().unwrap().is_none());
    }
}
