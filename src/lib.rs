//! staticd - prefork-style static file server
//!
//! A fixed pool of workers, each running a level-triggered `poll(2)` loop
//! that streams files from a single static root to GET/HEAD clients.

pub mod assets;
pub mod config;
pub mod http;
pub mod logging;
pub mod server;
pub mod static_files;
