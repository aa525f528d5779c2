//! Batch hydration over many records.
//!
//! Every batch form preserves input order and aborts on the first failure.
//! [`Hydrator::hydrate_parallel`] fans the batch out over scoped worker
//! threads that share the hydrator's caches.

use super::{Hydrated, Hydrator, MismatchPolicy};
use crate::error::HydrationResult;
use crate::record::Record;
use std::panic;
use tracing::debug;

impl Hydrator {
    /// Hydrate `records` in order, stopping at the first failure.
    pub fn hydrate_collection<'a, I>(
        &self,
        records: I,
        policy: MismatchPolicy,
    ) -> HydrationResult<Vec<Hydrated>>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .map(|record| self.hydrate(record, policy))
            .collect()
    }

    /// Like [`Hydrator::hydrate_collection`], keeping each record's key
    /// alongside its document.
    pub fn hydrate_keyed<'a, K, I>(
        &self,
        records: I,
        policy: MismatchPolicy,
    ) -> HydrationResult<Vec<(K, Hydrated)>>
    where
        I: IntoIterator<Item = (K, &'a Record)>,
    {
        records
            .into_iter()
            .map(|(key, record)| self.hydrate(record, policy).map(|hydrated| (key, hydrated)))
            .collect()
    }

    /// Hydrate `records` on up to `workers` scoped threads.
    ///
    /// Output order matches input order; when several records fail, the
    /// error of the earliest one is returned. A panic in a worker is
    /// propagated to the caller.
    pub fn hydrate_parallel(
        &self,
        records: &[Record],
        policy: MismatchPolicy,
        workers: usize,
    ) -> HydrationResult<Vec<Hydrated>> {
        let workers = workers.max(1);
        if records.len() <= 1 || workers == 1 {
            return self.hydrate_collection(records, policy);
        }

        let chunk_size = records.len().div_ceil(workers);
        debug!(
            records = records.len(),
            workers = workers,
            chunk_size = chunk_size,
            "Starting parallel hydration"
        );

        let chunks = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move |_| self.hydrate_collection(chunk, policy)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|payload| panic::resume_unwind(payload));

        let mut hydrated = Vec::with_capacity(records.len());
        for chunk in chunks {
            hydrated.extend(chunk?);
        }
        Ok(hydrated)
    }
}
