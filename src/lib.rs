//! Shared helpers for the workspace integration tests.

use std::sync::Barrier;

/// Run `task` on `threads` scoped threads released together by a barrier,
/// returning each thread's result in spawn order.
///
/// # Panics
/// Panics if any task panics.
pub fn run_together<R, F>(threads: usize, task: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    let barrier = Barrier::new(threads);
    crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let barrier = &barrier;
                let task = &task;
                scope.spawn(move |_| {
                    barrier.wait();
                    task(index)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("task panicked"))
            .collect()
    })
    .expect("scope failed")
}
