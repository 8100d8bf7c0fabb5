//! Termination and exactly-once properties of the voxelization pool and
//! the main-thread dispatcher.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use aerovox_engine::{MainThreadDispatcher, PoolConfig, VoxelizationPool};
use aerovox_test_utils::{init_logging, wait_until, CallCounter};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn shutdown_terminates_every_pool_size(n in 1usize..9, jobs in 0usize..40) {
        init_logging();
        let mut pool = VoxelizationPool::new(&PoolConfig::with_workers(n)).unwrap();
        let counter = CallCounter::new();
        for _ in 0..jobs {
            pool.queue_voxelization(counter.job()).unwrap();
        }

        let start = Instant::now();
        let report = pool.shutdown();
        prop_assert!(start.elapsed() < Duration::from_secs(10));
        prop_assert_eq!(report.workers_joined, n);
        prop_assert_eq!(counter.get(), jobs);
        prop_assert_eq!(pool.metrics().jobs_executed, jobs as u64);
    }

    #[test]
    fn multi_producer_jobs_run_exactly_once(
        producers in 1usize..5,
        per_producer in 1usize..60,
        workers in 1usize..6,
    ) {
        let mut pool = VoxelizationPool::new(&PoolConfig::with_workers(workers)).unwrap();
        let total = producers * per_producer;
        let hits: Arc<Vec<Mutex<u32>>> = Arc::new((0..total).map(|_| Mutex::new(0)).collect());

        thread::scope(|s| {
            for p in 0..producers {
                let pool = &pool;
                let hits = Arc::clone(&hits);
                s.spawn(move || {
                    for i in 0..per_producer {
                        let hits = Arc::clone(&hits);
                        let slot = p * per_producer + i;
                        pool.queue_voxelization(move || {
                            *hits[slot].lock().unwrap() += 1;
                        })
                        .unwrap();
                    }
                });
            }
        });

        pool.shutdown();
        for slot in hits.iter() {
            prop_assert_eq!(*slot.lock().unwrap(), 1);
        }
    }
}

#[test]
fn pool_workers_can_round_trip_through_the_main_thread() {
    init_logging();
    let dispatcher = MainThreadDispatcher::new();
    let owner = thread::current().id();
    let mut pool = VoxelizationPool::new(&PoolConfig::with_workers(3)).unwrap();
    let results = Arc::new(Mutex::new(Vec::new()));

    for i in 0..6u32 {
        let host = dispatcher.handle();
        let results = Arc::clone(&results);
        pool.queue_voxelization(move || {
            let on_owner = host
                .run_on_main_thread("check-thread", move || thread::current().id() == owner)
                .unwrap();
            results.lock().unwrap().push((i, on_owner));
        })
        .unwrap();
    }

    // Pump like a host frame loop until every job has reported back.
    assert!(wait_until(Duration::from_secs(5), || {
        dispatcher.pump_pending_tasks();
        results.lock().unwrap().len() == 6
    }));
    let report = pool.shutdown();
    assert_eq!(report.workers_joined, 3);
    assert!(results.lock().unwrap().iter().all(|(_, on_owner)| *on_owner));
}

#[test]
fn empty_pump_returns_immediately() {
    let dispatcher = MainThreadDispatcher::new();
    let start = Instant::now();
    for _ in 0..1000 {
        assert_eq!(dispatcher.pump_pending_tasks().executed, 0);
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}
