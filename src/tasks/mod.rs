//! Background Tasks Module
//!
//! Contains the background task that runs for the lifetime of a cache.
//!
//! # Tasks
//! - Expiry Sweep: Removes expired cache entries at a fixed interval

mod sweep;

pub(crate) use sweep::{spawn_sweep_task, SweepTask};
