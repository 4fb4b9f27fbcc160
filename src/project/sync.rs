//! Background writer for the remote tier.
//!
//! Upserts run on a dedicated thread so a slow or unreachable table never
//! stalls the caller's loop. Failures travel back over a channel and are
//! collected with [`SyncWorker::take_failures`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::remote::{RemoteTable, WorkspaceRow};
use super::storage::StoreError;

enum Job {
    Upsert(WorkspaceRow),
    Flush(Sender<()>),
}

pub struct SyncWorker {
    jobs: Option<Sender<Job>>,
    failures: Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl SyncWorker {
    pub fn spawn(table: Arc<dyn RemoteTable>) -> Result<Self, StoreError> {
        let (job_tx, job_rx) = mpsc::channel();
        let (fail_tx, fail_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("multispace-sync".into())
            .spawn(move || run(table.as_ref(), job_rx, fail_tx))?;
        Ok(Self {
            jobs: Some(job_tx),
            failures: fail_rx,
            handle: Some(handle),
        })
    }

    /// Queue a row. Never blocks.
    pub fn submit(&self, row: WorkspaceRow) {
        let Some(jobs) = &self.jobs else { return };
        if jobs.send(Job::Upsert(row)).is_err() {
            tracing::warn!("sync worker stopped; upsert dropped");
        }
    }

    /// Block until every row submitted so far has been attempted.
    pub fn flush(&self) {
        let Some(jobs) = &self.jobs else { return };
        let (done_tx, done_rx) = mpsc::channel();
        if jobs.send(Job::Flush(done_tx)).is_ok() {
            // A closed channel means the worker is gone; nothing left to wait on.
            let _ = done_rx.recv();
        }
    }

    /// Reasons for upserts that failed since the last call.
    pub fn take_failures(&self) -> Vec<String> {
        self.failures.try_iter().collect()
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        // Closing the queue lets the worker finish what it holds and exit.
        self.jobs.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("sync worker panicked");
        }
    }
}

fn run(table: &dyn RemoteTable, jobs: Receiver<Job>, failures: Sender<String>) {
    tracing::debug!("sync worker started");
    while let Ok(first) = jobs.recv() {
        // Drain the backlog and keep only the newest row per project.
        let mut rows: Vec<WorkspaceRow> = Vec::new();
        let mut waiters = Vec::new();
        for job in std::iter::once(first).chain(jobs.try_iter()) {
            match job {
                Job::Upsert(row) => match rows.iter_mut().find(|r| r.id == row.id) {
                    Some(slot) => *slot = row,
                    None => rows.push(row),
                },
                Job::Flush(done) => waiters.push(done),
            }
        }
        for row in &rows {
            if let Err(err) = table.upsert(row) {
                tracing::warn!(id = %row.id, error = %err, "remote upsert failed");
                let _ = failures.send(err.to_string());
            }
        }
        for done in waiters {
            let _ = done.send(());
        }
    }
    tracing::debug!("sync worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{MemoryTable, Project};
    use std::sync::Mutex;

    /// Holds every upsert until the test opens the gate.
    struct GatedTable {
        inner: MemoryTable,
        gate: Mutex<Receiver<()>>,
    }

    impl RemoteTable for GatedTable {
        fn select_for_user(&self, user_id: &str) -> Result<Vec<WorkspaceRow>, StoreError> {
            self.inner.select_for_user(user_id)
        }

        fn upsert(&self, row: &WorkspaceRow) -> Result<(), StoreError> {
            if let Ok(gate) = self.gate.lock() {
                let _ = gate.recv();
            }
            self.inner.upsert(row)
        }
    }

    fn row(id: &str, name: &str) -> WorkspaceRow {
        WorkspaceRow::from_project(&Project::new(id, name), "u1")
    }

    #[test]
    fn submit_returns_before_the_table_answers() {
        let (open, gate) = mpsc::channel();
        let inner = MemoryTable::new();
        let table = GatedTable {
            inner: inner.clone(),
            gate: Mutex::new(gate),
        };
        let worker = SyncWorker::spawn(Arc::new(table)).unwrap();

        worker.submit(row("default", "Workspace 1"));
        assert!(inner.rows().is_empty());

        open.send(()).unwrap();
        worker.flush();
        assert_eq!(inner.rows().len(), 1);
    }

    #[test]
    fn failures_are_reported_back() {
        let table = MemoryTable::new();
        table.set_unavailable(true);
        let worker = SyncWorker::spawn(Arc::new(table.clone())).unwrap();
        worker.submit(row("default", "Workspace 1"));
        worker.flush();
        let failures = worker.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("offline"));
        assert!(worker.take_failures().is_empty());
    }

    #[test]
    fn drop_finishes_queued_rows() {
        let table = MemoryTable::new();
        let worker = SyncWorker::spawn(Arc::new(table.clone())).unwrap();
        worker.submit(row("a", "First"));
        worker.submit(row("a", "Renamed"));
        worker.submit(row("b", "Second"));
        drop(worker);
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.name == "Renamed"));
    }
}
