use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{ReelError, Result};
use crate::types::{Job, JobUpdate};

/// In-memory keyed registry of job records.
///
/// One pipeline worker writes a given id while any number of status readers
/// poll it; the map mutex makes every `update` atomic, so a reader always
/// sees a complete prior or complete new record, never a partial merge.
/// Records live for the process lifetime; there is no deletion.
pub struct JobStore {
    jobs: Mutex<HashMap<String, Job>>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a new record. Fails with [`ReelError::DuplicateId`] if the id
    /// is already present.
    pub fn insert(&self, job: Job) -> Result<()> {
        let mut jobs = self.lock()?;
        if jobs.contains_key(&job.id) {
            return Err(ReelError::DuplicateId(job.id));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Get a cloned snapshot of a record.
    pub fn get(&self, job_id: &str) -> Result<Job> {
        let jobs = self.lock()?;
        jobs.get(job_id)
            .cloned()
            .ok_or_else(|| ReelError::NotFound(job_id.to_string()))
    }

    /// Atomically merge a partial update into a record and return the new
    /// snapshot. Invariant enforcement (terminal freeze, monotonic progress)
    /// happens in [`Job::apply`] under the same lock.
    pub fn update(&self, job_id: &str, update: JobUpdate) -> Result<Job> {
        let mut jobs = self.lock()?;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| ReelError::NotFound(job_id.to_string()))?;
        job.apply(update);
        Ok(job.clone())
    }

    /// Cloned snapshots of all records.
    pub fn list(&self) -> Vec<Job> {
        self.lock()
            .map(|jobs| jobs.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Job>>> {
        self.jobs.lock().map_err(|e| ReelError::Other(e.to_string()))
    }
}
