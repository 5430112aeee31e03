//! Tier 4: Concurrent saves and loads

use crate::test_utils::*;
use persistkit::{DestinationPath, JsonStore, PersistOptions, WriterRegistry};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn canonical(path: &Path) -> PathBuf {
    DestinationPath::new(path).unwrap().canonical().unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn many_concurrent_saves_leave_readable_file() {
    init_tracing();
    const WRITERS: usize = 250;
    let (_dir, path) = setup();
    let store = Arc::new(JsonStore::new());
    store.save_json(&test_meta(), &obj1(), &path).unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                barrier.wait();
                store.save_json(&test_meta(), &obj1(), &path)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let conflicted = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_conflict()))
        .count();

    assert!(succeeded >= 1);
    // Leases serialize writers, so no save may fail for any other reason.
    assert_eq!(succeeded + conflicted, WRITERS);
    let cores = thread::available_parallelism().map_or(1, |n| n.get());
    if cores > 1 {
        assert!(conflicted >= 1, "no write conflicts among {} writers", WRITERS);
    }

    let got: TestStruct = store.load_json(&test_meta(), &path).unwrap();
    assert_is_obj1(&got);
    assert!(!store.registry().is_active(&canonical(&path)));
}

#[test]
fn stores_sharing_a_registry_exclude_each_other() {
    const WRITERS: usize = 64;
    let (_dir, path) = setup();
    let registry = Arc::new(WriterRegistry::new());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            // A distinct store per thread, one shared guard.
            let store = JsonStore::with_registry(Arc::clone(&registry), PersistOptions::new());
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            let value = if i % 2 == 0 { obj1() } else { obj2() };
            thread::spawn(move || {
                barrier.wait();
                store.save_json(&test_meta(), &value, &path)
            })
        })
        .collect();

    for h in handles {
        if let Err(e) = h.join().unwrap() {
            assert!(e.is_conflict(), "unexpected save failure: {}", e);
        }
    }

    let got: TestStruct = JsonStore::new().load_json(&test_meta(), &path).unwrap();
    assert!(got == obj1() || got == obj2());
}

#[test]
fn independently_built_default_stores_only_conflict() {
    const ROUNDS: usize = 20;
    const WRITERS: usize = 8;
    let (_dir, path) = setup();

    for _ in 0..ROUNDS {
        let barrier = Arc::new(Barrier::new(WRITERS));
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                // No registry passed: each store picks up the process one.
                let store = JsonStore::new();
                let barrier = Arc::clone(&barrier);
                let path = path.clone();
                let value = if i % 2 == 0 { obj1() } else { obj2() };
                thread::spawn(move || {
                    barrier.wait();
                    store.save_json(&test_meta(), &value, &path)
                })
            })
            .collect();

        let mut succeeded = 0;
        for h in handles {
            match h.join().unwrap() {
                Ok(()) => succeeded += 1,
                Err(e) => assert!(e.is_conflict(), "unexpected save failure: {}", e),
            }
        }
        assert!(succeeded >= 1);

        let got: TestStruct = JsonStore::new().load_json(&test_meta(), &path).unwrap();
        assert!(got == obj1() || got == obj2());
    }
}

#[test]
fn loads_during_saves_always_see_a_committed_value() {
    let (_dir, path) = setup();
    let store = Arc::new(JsonStore::new());
    store.save_json(&test_meta(), &obj1(), &path).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let loads = Arc::new(AtomicUsize::new(0));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let stop = Arc::clone(&stop);
            let loads = Arc::clone(&loads);
            let path = path.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let got: TestStruct = store.load_json(&test_meta(), &path).unwrap();
                    assert!(got == obj1() || got == obj2());
                    loads.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            let path = path.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let value = if (w + i) % 2 == 0 { obj1() } else { obj2() };
                    // Conflicts are expected; any other error is a bug.
                    if let Err(e) = store.save_json(&test_meta(), &value, &path) {
                        assert!(e.is_conflict(), "unexpected save failure: {}", e);
                    }
                }
            })
        })
        .collect();

    for w in writers {
        w.join().unwrap();
    }
    stop.store(true, Ordering::Release);
    for r in readers {
        r.join().unwrap();
    }
    assert!(loads.load(Ordering::Relaxed) > 0);
}

#[test]
fn saves_to_different_paths_do_not_conflict() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new());
    let barrier = Arc::new(Barrier::new(32));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let path = dir.path().join(format!("obj{}.json", i));
            thread::spawn(move || {
                barrier.wait();
                store.save_json(&test_meta(), &obj1(), &path)
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }
    for i in 0..32 {
        let got: TestStruct = store
            .load_json(&test_meta(), dir.path().join(format!("obj{}.json", i)))
            .unwrap();
        assert_is_obj1(&got);
    }
}
