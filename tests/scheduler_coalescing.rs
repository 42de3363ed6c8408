// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Last-write-wins coalescing under a blocked computation

use polyiou::scheduler::{JobScheduler, Published};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Blocks workers until opened
#[derive(Default)]
struct Gate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cond.wait(open).unwrap();
        }
    }

    fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cond.notify_all();
    }
}

#[test]
fn test_only_latest_pending_input_runs() {
    let gate = Arc::new(Gate::default());
    let calls = Arc::new(Mutex::new(Vec::new()));

    let (worker_gate, worker_calls) = (Arc::clone(&gate), Arc::clone(&calls));
    let (scheduler, results) = JobScheduler::new(Some(2), move |_: &&str, version: u32| {
        worker_gate.wait();
        worker_calls.lock().unwrap().push(version);
        Ok(version * 10)
    })
    .unwrap();

    assert_eq!(scheduler.submit("shape", 0), 1);
    assert!(scheduler.is_busy(&"shape"));
    assert_eq!(scheduler.submit("shape", 1), 2);
    assert_eq!(scheduler.submit("shape", 2), 3);
    assert_eq!(scheduler.submit("shape", 3), 4);

    gate.open();
    scheduler.wait_idle();

    let published: Vec<Published<&str, u32>> = results.try_iter().collect();
    assert_eq!(
        published,
        vec![
            Published {
                key: "shape",
                generation: 1,
                result: Some(0)
            },
            Published {
                key: "shape",
                generation: 4,
                result: Some(30)
            },
        ]
    );
    assert_eq!(*calls.lock().unwrap(), vec![0, 3]);
    assert!(!scheduler.is_busy(&"shape"));
}

#[test]
fn test_busy_key_does_not_block_others() {
    let gate = Arc::new(Gate::default());
    let worker_gate = Arc::clone(&gate);
    let (scheduler, results) = JobScheduler::new(Some(2), move |key: &u8, value: u8| {
        if *key == 0 {
            worker_gate.wait();
        }
        Ok(value)
    })
    .unwrap();

    scheduler.submit(0, 1);
    scheduler.submit(1, 2);

    let first = results.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(first.key, 1);

    gate.open();
    let second = results.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(second.key, 0);
}

#[test]
fn test_idle_submissions_each_compute() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let (scheduler, results) = JobScheduler::new(Some(1), move |_: &u8, v: u8| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(v)
    })
    .unwrap();

    for v in 0..3 {
        scheduler.submit(9, v);
        scheduler.wait_idle();
    }
    let generations: Vec<u64> = results.try_iter().map(|p| p.generation).collect();
    assert_eq!(generations, vec![1, 2, 3]);
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(scheduler.generation(&9), 3);
}
