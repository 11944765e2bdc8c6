//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the host serves
//! requests.
//!
//! # Tasks
//! - Expiry sweep: Purges expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
