//! Actor-based sampling loop
//!
//! The sampler runs as a single async task communicating over Tokio channels.
//! Within one tick everything runs sequentially to completion: collection,
//! parsing, derivation, formatting and emission never overlap across ticks,
//! so the durable log is a strictly time-ordered append sequence.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → collect records → parse + derive → format → emit (console, log) → publish TickEvent
//!     ↑
//!     └─── Commands (SampleNow, UpdateInterval, Shutdown)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: an mpsc channel for control messages, wrapped by a typed handle
//! 2. **Events**: completed ticks are published to a broadcast channel for observers
//! 3. **Request/Response**: oneshot channels for synchronous replies

pub mod messages;
pub mod sampler;
