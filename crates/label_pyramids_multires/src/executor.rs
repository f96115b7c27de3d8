//! Where block tasks run.
//!
//! Every task is a pure function of its input, so an executor may run them in any order and on any thread. Results come
//! back in input order.

#[cfg(feature = "rayon")]
use std::sync::Arc;

pub trait TaskExecutor {
    /// Runs `f` on every input.
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send;

    /// Folds groups of inputs into accumulators that start as `init()`, then combines the accumulators with `reduce`. Only
    /// gives a deterministic result if `reduce` is associative and commutative and `init()` is its identity.
    fn fold_reduce<I, A, Init, Fold, Reduce>(&self, inputs: &[I], init: Init, fold: Fold, reduce: Reduce) -> A
    where
        I: Sync,
        A: Send,
        Init: Fn() -> A + Sync + Send,
        Fold: Fn(A, &I) -> A + Sync + Send,
        Reduce: Fn(A, A) -> A + Sync + Send;
}

/// Runs every task on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExecutor;

impl TaskExecutor for SerialExecutor {
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send,
    {
        inputs.iter().map(f).collect()
    }

    fn fold_reduce<I, A, Init, Fold, Reduce>(&self, inputs: &[I], init: Init, fold: Fold, reduce: Reduce) -> A
    where
        I: Sync,
        A: Send,
        Init: Fn() -> A + Sync + Send,
        Fold: Fn(A, &I) -> A + Sync + Send,
        Reduce: Fn(A, A) -> A + Sync + Send,
    {
        reduce(init(), inputs.iter().fold(init(), fold))
    }
}

/// Runs tasks on a `rayon` thread pool, either the global one or a dedicated one.
#[cfg(feature = "rayon")]
#[derive(Clone, Debug, Default)]
pub struct ParallelExecutor {
    pool: Option<Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "rayon")]
impl ParallelExecutor {
    /// Uses the global `rayon` pool.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(pool: Arc<rayon::ThreadPool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds a dedicated pool with `num_threads` threads.
    pub fn with_num_threads(num_threads: usize) -> crate::PyramidResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("label-pyramids-{}", i))
            .build()
            .map_err(|e| crate::PyramidError::InvalidConfig(e.to_string()))?;

        Ok(Self::with_pool(Arc::new(pool)))
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

#[cfg(feature = "rayon")]
impl TaskExecutor for ParallelExecutor {
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send,
    {
        use rayon::prelude::*;

        self.install(|| inputs.par_iter().map(f).collect())
    }

    fn fold_reduce<I, A, Init, Fold, Reduce>(&self, inputs: &[I], init: Init, fold: Fold, reduce: Reduce) -> A
    where
        I: Sync,
        A: Send,
        Init: Fn() -> A + Sync + Send,
        Fold: Fn(A, &I) -> A + Sync + Send,
        Reduce: Fn(A, A) -> A + Sync + Send,
    {
        use rayon::prelude::*;

        self.install(|| inputs.par_iter().fold(&init, &fold).reduce(&init, &reduce))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    fn sum_of_squares(executor: &impl TaskExecutor, inputs: &[u64]) -> u64 {
        executor.fold_reduce(inputs, || 0, |acc, &x| acc + x * x, |a, b| a + b)
    }

    #[test]
    fn serial_map_keeps_order() {
        let inputs: Vec<u64> = (0..100).collect();

        assert_eq!(SerialExecutor.map(&inputs, |&x| x + 1), (1..101).collect::<Vec<_>>());
        assert_eq!(sum_of_squares(&SerialExecutor, &inputs), 328350);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_serial() {
        let inputs: Vec<u64> = (0..10_000).collect();
        let executor = ParallelExecutor::with_num_threads(4).unwrap();

        assert_eq!(
            executor.map(&inputs, |&x| x * 3),
            SerialExecutor.map(&inputs, |&x| x * 3)
        );
        assert_eq!(
            sum_of_squares(&executor, &inputs),
            sum_of_squares(&SerialExecutor, &inputs)
        );
        assert_eq!(
            sum_of_squares(&ParallelExecutor::new(), &inputs),
            sum_of_squares(&SerialExecutor, &inputs)
        );
    }

    #[test]
    fn empty_inputs_give_the_identity() {
        assert_eq!(sum_of_squares(&SerialExecutor, &[]), 0);
    }
}
