// UCP Daemon Library
// Exposes the blockchain synchronization core

#[macro_use]
extern crate log;

pub mod config;
pub mod core;
pub mod sync;
