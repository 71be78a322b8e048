//! Deterministic random draw streams
//!
//! All randomness in the simulator goes through this module. A run owns one
//! master stream seeded from the run seed; every (period, firm) pair gets its
//! own derived sub-stream so the parallel firm loop needs no locking and the
//! results do not depend on thread scheduling.

mod streams;

pub use streams::{draw_discrete, DrawStreams};
