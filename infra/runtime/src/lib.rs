//! # Runtime
//!
//! Tokio runtime profiles for Charachat binaries.
//!
//! Key derivation at login runs Argon2id on the blocking pool, so every profile sizes
//! that pool explicitly instead of relying on Tokio's default of 512 threads.
//!
//! ## Profiles
//! * **High Performance**: API server; larger stacks, long keep-alive, wide blocking pool.
//! * **Memory Efficient**: tools and tests; half the workers, small blocking pool.
//! * **Default**: detected parallelism with moderate limits.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[charachat_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     charachat_server::run().await
//! }
//! ```

pub use anyhow::Result;
pub use charachat_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// The default stack size for threads (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
/// How long an idle thread stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);
/// Upper bound for the blocking pool; each Argon2 run holds ~19 `MiB`.
const MAX_BLOCKING_THREADS: usize = 256;
const DEFAULT_THREAD_NAME: &str = "charachat-worker";

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Detects the worker count from `TOKIO_WORKER_THREADS` or the hardware.
fn get_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= 1024)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

fn validate_stack_size(stack_size: usize) -> usize {
    stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE)
}

fn normalize_config(config: &RuntimeConfig) -> RuntimeConfig {
    let thread_name = if config.thread_name.trim().is_empty() {
        DEFAULT_THREAD_NAME.to_owned()
    } else {
        config.thread_name.clone()
    };

    RuntimeConfig {
        worker_threads: config.worker_threads.clamp(1, 1024),
        max_blocking_threads: config.max_blocking_threads.clamp(1, MAX_BLOCKING_THREADS),
        stack_size: validate_stack_size(config.stack_size),
        thread_name,
        thread_keep_alive: config.thread_keep_alive,
    }
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    /// Size of the pool that runs password hashing and other blocking work.
    pub max_blocking_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let workers = get_worker_threads();
        Self {
            worker_threads: workers,
            max_blocking_threads: (workers * 4).clamp(4, 64),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Preset for the API server.
    #[must_use = "Use this configuration for high-performance server applications"]
    pub fn high_performance() -> Self {
        let workers = get_worker_threads();
        Self {
            worker_threads: workers,
            max_blocking_threads: (workers * 8).clamp(8, 128),
            stack_size: 4 * 1024 * 1024,
            thread_name: "charachat-hp".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    /// Preset for tools and tests where memory footprint matters.
    #[must_use = "Use this configuration for memory-constrained processes"]
    pub fn memory_efficient() -> Self {
        let workers = (get_worker_threads() / 2).max(1);
        Self {
            worker_threads: workers,
            max_blocking_threads: workers.clamp(2, 8),
            stack_size: 2 * 1024 * 1024,
            thread_name: "charachat-mem".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, 1024);
        self
    }

    #[must_use = "Customize the size of the blocking pool"]
    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.clamp(1, MAX_BLOCKING_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = validate_stack_size(size);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name =
            if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    #[must_use = "Customize how long idle threads stay alive"]
    pub const fn with_thread_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.thread_keep_alive = keep_alive;
        self
    }
}

/// Creates a multi-threaded Tokio runtime with I/O and timers enabled.
///
/// Out-of-range values in `config` are clamped rather than rejected.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the OS refuses to create the runtime threads.
///
/// # Examples
///
/// ```rust
/// use charachat_runtime::{build_runtime_with_config, RuntimeConfig};
///
/// let config = RuntimeConfig::memory_efficient().with_worker_threads(1);
/// let runtime = build_runtime_with_config(&config)?;
/// let answer = runtime.block_on(async { 42 });
/// assert_eq!(answer, 42);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = normalize_config(config);
    debug!(config = ?config, "Building tokio runtime");

    let mut builder = Builder::new_multi_thread();
    builder
        .worker_threads(config.worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive);

    builder.enable_all();

    builder.build().map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_threads_validation() {
        let config = RuntimeConfig::default().with_worker_threads(0);
        assert_eq!(config.worker_threads, 1);

        let config = RuntimeConfig::default().with_worker_threads(2000);
        assert_eq!(config.worker_threads, 1024);
    }

    #[test]
    fn test_blocking_pool_is_bounded() {
        let config = RuntimeConfig::default().with_max_blocking_threads(0);
        assert_eq!(config.max_blocking_threads, 1);

        let config = RuntimeConfig::default().with_max_blocking_threads(10_000);
        assert_eq!(config.max_blocking_threads, MAX_BLOCKING_THREADS);

        assert!(RuntimeConfig::high_performance().max_blocking_threads >= 8);
        assert!(RuntimeConfig::memory_efficient().max_blocking_threads <= 8);
    }

    #[test]
    fn test_stack_size_validation() {
        let config = RuntimeConfig::default().with_stack_size(100);
        assert_eq!(config.stack_size, MIN_STACK_SIZE);

        let config = RuntimeConfig::default().with_stack_size(100 * 1024 * 1024);
        assert_eq!(config.stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn test_blank_thread_name_falls_back() {
        let config = RuntimeConfig::default().with_thread_name("  ");
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_runtime_runs_blocking_work() {
        let config = RuntimeConfig::memory_efficient().with_worker_threads(1);
        let runtime = build_runtime_with_config(&config).unwrap();

        let sum = runtime
            .block_on(async { tokio::task::spawn_blocking(|| (1..=10).sum::<u32>()).await })
            .unwrap();
        assert_eq!(sum, 55);
    }
}
