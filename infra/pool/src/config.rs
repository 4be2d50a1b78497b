use std::thread::available_parallelism;

/// Environment variable overriding the detected worker count.
pub const WORKER_THREADS_ENV: &str = "CTIPRD_WORKER_THREADS";

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
/// The default stack size for threads (2 `MiB`).
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
pub(crate) const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
pub(crate) const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "ctiprd-worker";

/// Worker count from `CTIPRD_WORKER_THREADS`, falling back to the available parallelism.
#[must_use]
pub fn detect_worker_threads() -> usize {
    parse_worker_threads(std::env::var(WORKER_THREADS_ENV).ok().as_deref()).unwrap_or_else(|| {
        available_parallelism().map(std::num::NonZero::get).unwrap_or(DEFAULT_WORKER_THREADS)
    })
}

fn parse_worker_threads(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok()).filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
}

/// Configuration for the [`ThreadPool`](crate::ThreadPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: detect_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }
}

impl PoolConfig {
    /// Single worker; the parallel loops then run inline on the caller.
    #[must_use = "Use this configuration for deterministic, sequential execution"]
    pub fn sequential() -> Self {
        Self { worker_threads: 1, ..Self::default() }
    }

    #[must_use = "Customize the number of worker threads for the pool"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name prefix"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name =
            if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    /// Clamps every field into its valid range.
    pub(crate) fn normalized(&self) -> Self {
        self.clone()
            .with_worker_threads(self.worker_threads)
            .with_stack_size(self.stack_size)
            .with_thread_name(self.thread_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_threads_validation() {
        assert_eq!(PoolConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(PoolConfig::default().with_worker_threads(2000).worker_threads, 1024);
    }

    #[test]
    fn test_stack_size_validation() {
        assert_eq!(PoolConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            PoolConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn test_blank_thread_name_falls_back() {
        assert_eq!(PoolConfig::default().with_thread_name("  ").thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_normalized_clamps_raw_fields() {
        let raw = PoolConfig { worker_threads: 0, stack_size: 0, thread_name: String::new() };
        let cfg = raw.normalized();
        assert_eq!(cfg.worker_threads, 1);
        assert_eq!(cfg.stack_size, MIN_STACK_SIZE);
        assert_eq!(cfg.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_worker_threads_parsing() {
        assert_eq!(parse_worker_threads(Some(" 6 ")), Some(6));
        assert_eq!(parse_worker_threads(Some("0")), None);
        assert_eq!(parse_worker_threads(Some("4096")), None);
        assert_eq!(parse_worker_threads(Some("many")), None);
        assert_eq!(parse_worker_threads(None), None);
        assert!(detect_worker_threads() >= 1);
    }
}
