// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-key job coalescing with last-write-wins
//!
//! Each key runs at most one computation at a time. Inputs submitted while a
//! key is busy overwrite a single pending slot, so only the newest one runs
//! next. Every finished computation is published exactly once.

use crate::error::{GeometryError, GeometryResult};
use dashmap::DashMap;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use tracing::{debug, error, warn};

/// Result of one finished computation
#[derive(Debug, Clone, PartialEq)]
pub struct Published<K, O> {
    pub key: K,
    /// Generation of the input that produced this result
    pub generation: u64,
    /// Absent when the computation failed
    pub result: Option<O>,
}

/// Computation run for every accepted input
pub type ComputeFn<K, I, O> = dyn Fn(&K, I) -> GeometryResult<O> + Send + Sync;

#[derive(Debug)]
enum SlotState<I> {
    Idle,
    Computing { pending: Option<(u64, I)> },
}

#[derive(Debug)]
struct Slot<I> {
    generation: u64,
    state: SlotState<I>,
}

impl<I> Default for Slot<I> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: SlotState::Idle,
        }
    }
}

struct Inner<K, I, O> {
    slots: DashMap<K, Slot<I>>,
    pool: rayon::ThreadPool,
    compute: Box<ComputeFn<K, I, O>>,
    sender: Sender<Published<K, O>>,
    /// Keys currently computing, for `wait_idle`
    busy: Mutex<usize>,
    idle: Condvar,
}

/// Coalescing scheduler over a rayon pool
pub struct JobScheduler<K, I, O> {
    inner: Arc<Inner<K, I, O>>,
}

impl<K, I, O> JobScheduler<K, I, O>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    /// Create a scheduler and the receiver its results are published on.
    /// `worker_threads` of `None` lets rayon size the pool.
    pub fn new<F>(
        worker_threads: Option<usize>,
        compute: F,
    ) -> GeometryResult<(Self, Receiver<Published<K, O>>)>
    where
        F: Fn(&K, I) -> GeometryResult<O> + Send + Sync + 'static,
    {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("polyiou-worker-{i}"));
        if let Some(threads) = worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| GeometryError::failure(format!("worker pool: {e}")))?;

        let (sender, receiver) = mpsc::channel();
        let inner = Arc::new(Inner {
            slots: DashMap::new(),
            pool,
            compute: Box::new(compute),
            sender,
            busy: Mutex::new(0),
            idle: Condvar::new(),
        });
        Ok((Self { inner }, receiver))
    }

    /// Submit an input for `key` and return its generation.
    ///
    /// An idle key starts computing at once. A busy key keeps the input as
    /// its pending job, replacing any older pending input.
    pub fn submit(&self, key: K, input: I) -> u64 {
        let mut slot = self.inner.slots.entry(key.clone()).or_default();
        slot.generation += 1;
        let generation = slot.generation;

        if matches!(slot.state, SlotState::Idle) {
            slot.state = SlotState::Computing { pending: None };
            drop(slot);
            self.inner.mark_busy();
            let inner = Arc::clone(&self.inner);
            self.inner
                .pool
                .spawn(move || inner.run(key, generation, input));
        } else if let SlotState::Computing { pending } = &mut slot.state {
            if let Some((superseded, _)) = pending.replace((generation, input)) {
                debug!(?key, superseded, generation, "pending input superseded");
            }
        }

        generation
    }

    /// Whether `key` has a computation in flight
    pub fn is_busy(&self, key: &K) -> bool {
        self.inner
            .slots
            .get(key)
            .is_some_and(|slot| matches!(slot.state, SlotState::Computing { .. }))
    }

    /// Latest generation handed out for `key`
    pub fn generation(&self, key: &K) -> u64 {
        self.inner.slots.get(key).map_or(0, |slot| slot.generation)
    }

    /// Drop the slot of an idle `key`; a busy key keeps its slot.
    /// Returns whether a slot was dropped.
    pub fn forget(&self, key: &K) -> bool {
        self.inner
            .slots
            .remove_if(key, |_, slot| matches!(slot.state, SlotState::Idle))
            .is_some()
    }

    /// Block until no key is computing
    pub fn wait_idle(&self) {
        let mut busy = self.inner.lock_busy();
        while *busy > 0 {
            busy = match self.inner.idle.wait(busy) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }
}

impl<K, I, O> Inner<K, I, O>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Compute, publish, then drain the pending slot until it is empty
    fn run(&self, key: K, mut generation: u64, mut input: I) {
        loop {
            let result = self.compute_guarded(&key, generation, input);
            if self
                .sender
                .send(Published {
                    key: key.clone(),
                    generation,
                    result,
                })
                .is_err()
            {
                warn!(?key, generation, "result receiver dropped");
            }

            match self.take_pending(&key) {
                Some((next_generation, next_input)) => {
                    generation = next_generation;
                    input = next_input;
                }
                None => break,
            }
        }

        let mut busy = self.lock_busy();
        *busy = busy.saturating_sub(1);
        if *busy == 0 {
            self.idle.notify_all();
        }
    }

    fn compute_guarded(&self, key: &K, generation: u64, input: I) -> Option<O> {
        match catch_unwind(AssertUnwindSafe(|| (self.compute)(key, input))) {
            Ok(Ok(output)) => Some(output),
            Ok(Err(err)) => {
                error!(?key, generation, %err, "job failed");
                None
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(?key, generation, %message, "job panicked");
                None
            }
        }
    }

    /// Next input for `key`, or mark the key idle when there is none
    fn take_pending(&self, key: &K) -> Option<(u64, I)> {
        let mut slot = self.slots.get_mut(key)?;
        let pending = match &mut slot.state {
            SlotState::Computing { pending } => pending.take(),
            SlotState::Idle => None,
        };
        if pending.is_none() {
            slot.state = SlotState::Idle;
        }
        pending
    }

    fn mark_busy(&self) {
        *self.lock_busy() += 1;
    }

    fn lock_busy(&self) -> std::sync::MutexGuard<'_, usize> {
        match self.busy.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
