//! Thread pool setup for parsing documents in parallel.

use anyhow::Result;
use tracing::{debug, info};

/// Initialize the global rayon thread pool.
/// `jobs` overrides the default of half the available cores (minimum 1).
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = jobs.unwrap_or(cores / 2).max(1);

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build_global() {
        Ok(()) => info!(workers, cores, "initialized thread pool"),
        // Already built, e.g. by an earlier call in the same process.
        Err(err) => debug!(%err, "keeping existing thread pool"),
    }

    Ok(workers)
}
