//! Global fetch budget shared across all batches of a run.
//!
//! Both pool tiers are bounded on their own, but the product of the outer and
//! inner widths could still exceed what the network should see. Every fetch
//! holds a permit from this budget while in flight, so total concurrency stays
//! under `max_in_flight` no matter how many queries run at once.

use std::sync::{Condvar, Mutex, MutexGuard};

/// Blocking counting semaphore for in-flight fetches.
#[derive(Debug)]
pub struct FetchBudget {
    max_total: usize,
    in_use: Mutex<usize>,
    freed: Condvar,
}

impl FetchBudget {
    /// Create a budget with the given maximum in-flight fetches (clamped to at least 1).
    pub fn new(max_total: usize) -> Self {
        Self {
            max_total: max_total.max(1),
            in_use: Mutex::new(0),
            freed: Condvar::new(),
        }
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }

    #[cfg(test)]
    pub(crate) fn in_use(&self) -> usize {
        *self.lock()
    }

    /// Blocks until a permit is free. The permit is returned when the guard drops.
    pub fn acquire(&self) -> BudgetPermit<'_> {
        let mut in_use = self.lock();
        while *in_use >= self.max_total {
            in_use = self
                .freed
                .wait(in_use)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        *in_use += 1;
        BudgetPermit { budget: self }
    }

    fn release(&self) {
        let mut in_use = self.lock();
        *in_use = in_use.saturating_sub(1);
        drop(in_use);
        self.freed.notify_one();
    }

    // Poisoning is ignored: the count is only touched under the lock and stays consistent.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.in_use
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases its permit when dropped.
#[derive(Debug)]
pub struct BudgetPermit<'a> {
    budget: &'a FetchBudget,
}

impl Drop for BudgetPermit<'_> {
    fn drop(&mut self) {
        self.budget.release();
    }
}
