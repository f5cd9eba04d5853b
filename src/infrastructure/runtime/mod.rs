//! Sync TUI <-> async worker bridge

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerOptions};
