//! Per-body work scheduling
//!
//! Work is split into contiguous chunks, one task per chunk, on bevy's
//! compute task pool. `TaskPool::scope` only returns once every spawned task
//! has finished, which is the barrier between integration phases.

use bevy::tasks::{ComputeTaskPool, TaskPool};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Chunks of bodies run on the compute task pool
    #[default]
    Parallel,
    /// One loop on the calling thread
    Serial,
}

fn compute_task_pool() -> &'static TaskPool {
    ComputeTaskPool::get_or_init(TaskPool::default)
}

fn chunk_size(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}

impl Execution {
    /// Run `f(offset, chunk)` over disjoint chunks of `items`
    ///
    /// `offset` is the index of the chunk's first element in `items`. Each
    /// call gets exclusive access to its own chunk and nothing else.
    pub fn for_each_chunk_mut<T, F>(self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        if items.is_empty() {
            return;
        }

        match self {
            Execution::Serial => f(0, items),
            Execution::Parallel => {
                let pool = compute_task_pool();
                let chunk_size = chunk_size(items.len(), pool.thread_num());
                let f = &f;

                pool.scope(|scope| {
                    for (chunk_index, chunk) in items.chunks_mut(chunk_size).enumerate() {
                        scope.spawn(async move { f(chunk_index * chunk_size, chunk) });
                    }
                });
            }
        }
    }

    /// Map disjoint chunks of `items` to partial results, in chunk order
    ///
    /// Combining the partials is left to the caller, so there is exactly one
    /// point where cross-chunk values meet.
    pub fn map_chunks<T, R, F>(self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send + 'static,
        F: Fn(usize, &[T]) -> R + Send + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        match self {
            Execution::Serial => vec![f(0, items)],
            Execution::Parallel => {
                let pool = compute_task_pool();
                let chunk_size = chunk_size(items.len(), pool.thread_num());
                let f = &f;

                pool.scope(|scope| {
                    for (chunk_index, chunk) in items.chunks(chunk_size).enumerate() {
                        scope.spawn(async move { f(chunk_index * chunk_size, chunk) });
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_covers_all_items() {
        assert_eq!(chunk_size(10, 4), 3);
        assert_eq!(chunk_size(8, 4), 2);
        assert_eq!(chunk_size(3, 8), 1);
        assert_eq!(chunk_size(5, 0), 5);
    }

    #[test]
    fn test_every_slot_written_exactly_once() {
        for execution in [Execution::Serial, Execution::Parallel] {
            let mut slots = vec![0usize; 1000];
            execution.for_each_chunk_mut(&mut slots, |offset, chunk| {
                for (i, slot) in chunk.iter_mut().enumerate() {
                    *slot += offset + i;
                }
            });

            let expected: Vec<usize> = (0..1000).collect();
            assert_eq!(slots, expected, "{execution:?}");
        }
    }

    #[test]
    fn test_map_chunks_partials_combine_to_total() {
        let values: Vec<u64> = (1..=1000).collect();
        for execution in [Execution::Serial, Execution::Parallel] {
            let total: u64 = execution
                .map_chunks(&values, |_, chunk| chunk.iter().sum::<u64>())
                .into_iter()
                .sum();
            assert_eq!(total, 500_500, "{execution:?}");
        }
    }

    #[test]
    fn test_empty_input_runs_nothing() {
        let mut empty: Vec<u8> = Vec::new();
        Execution::Parallel.for_each_chunk_mut(&mut empty, |_, _| panic!("no chunks expected"));
        let partials: Vec<u8> = Execution::Parallel.map_chunks(&empty, |_, _| 1);
        assert!(partials.is_empty());
    }
}
