//! The connection-multiplexing engine: listener setup, the per-worker
//! `poll(2)` loop and the pool that runs the workers.

pub mod listener;
pub mod poll;
pub mod pool;
pub mod table;
pub mod worker;

pub use pool::{ShutdownHandle, WorkerPool};
