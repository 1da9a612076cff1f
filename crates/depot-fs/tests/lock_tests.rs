//! Concurrent access tests for RepositoryLock
//!
//! flock conflicts between separate open file descriptions, so threads in one
//! process contend exactly like separate processes would.

use depot_fs::{Error, RepositoryLock, io};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn lock_serializes_read_modify_write() {
    let dir = tempdir().unwrap();
    let lock_path = Arc::new(dir.path().join("lock"));
    let data_path = Arc::new(dir.path().join("counter"));
    std::fs::write(&*data_path, "0").unwrap();

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let lock_path = Arc::clone(&lock_path);
            let data_path = Arc::clone(&data_path);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let _guard = RepositoryLock::acquire(&lock_path, Duration::from_secs(30))
                    .expect("lock should be acquired within the timeout");

                let current: u32 = std::fs::read_to_string(&*data_path)
                    .unwrap()
                    .trim()
                    .parse()
                    .unwrap();
                thread::sleep(Duration::from_millis(5));
                io::write_atomic(&data_path, (current + 1).to_string().as_bytes()).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let final_value = std::fs::read_to_string(&*data_path).unwrap();
    assert_eq!(final_value, num_threads.to_string(), "no increment may be lost");
}

#[test]
fn waiter_proceeds_once_holder_releases() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("lock");

    let held = RepositoryLock::acquire(&lock_path, Duration::from_secs(1)).unwrap();

    let waiter_path = lock_path.clone();
    let waiter = thread::spawn(move || {
        RepositoryLock::acquire(&waiter_path, Duration::from_secs(10)).map(|_| ())
    });

    thread::sleep(Duration::from_millis(100));
    drop(held);

    waiter
        .join()
        .expect("Thread should not panic")
        .expect("waiter should acquire after release");
}

#[test]
fn lock_released_when_holder_panics() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("lock");

    let panicking_path = lock_path.clone();
    let result = thread::spawn(move || {
        let _guard = RepositoryLock::acquire(&panicking_path, Duration::from_secs(1)).unwrap();
        panic!("command failed mid-flight");
    })
    .join();
    assert!(result.is_err());

    RepositoryLock::acquire(&lock_path, Duration::from_millis(200))
        .expect("lock must be free after the holder unwound");
}

#[test]
fn zero_timeout_fails_immediately_when_held() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("lock");
    let _held = RepositoryLock::acquire(&lock_path, Duration::from_secs(1)).unwrap();

    let err = RepositoryLock::acquire(&lock_path, Duration::ZERO).unwrap_err();
    assert!(matches!(err, Error::LockTimeout { .. }), "got {err:?}");
}
