//! Bounded worker pool over a shared work queue.
//!
//! `width` worker threads pop items from a queue until it is empty and send
//! `(index, result)` back over a channel. Results arrive in completion order;
//! the caller gets them back sorted by submission index.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Mutex;

/// A work item panicked; carries the panic message when it was a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPanicked(pub String);

impl std::fmt::Display for TaskPanicked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task panicked: {}", self.0)
    }
}

impl std::error::Error for TaskPanicked {}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs `work(index, item)` for every item with at most `width` running at once.
///
/// Every item runs to completion; a panic in one item is caught and reported
/// as `Err(TaskPanicked)` for that index only. Returns one entry per item,
/// sorted by index.
pub fn run_bounded<T, R, F>(items: Vec<T>, width: usize, work: F) -> Vec<(usize, Result<R, TaskPanicked>)>
where
    T: Send,
    R: Send,
    F: Fn(usize, T) -> R + Sync,
{
    let count = items.len();
    if count == 0 {
        return Vec::new();
    }
    let queue: Mutex<VecDeque<(usize, T)>> = Mutex::new(items.into_iter().enumerate().collect());
    let num_workers = width.max(1).min(count);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|s| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let queue = &queue;
            let work = &work;
            s.spawn(move || loop {
                let next = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();
                let Some((index, item)) = next else {
                    break;
                };
                let res = panic::catch_unwind(AssertUnwindSafe(|| work(index, item)))
                    .map_err(|payload| TaskPanicked(panic_message(payload)));
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, Result<R, TaskPanicked>)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results
}
