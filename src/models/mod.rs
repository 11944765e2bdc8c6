//! Wire types for the cache host API.

pub mod requests;
pub mod responses;

pub use requests::{SetRequest, MAX_KEY_LENGTH};
pub use responses::{GetResponse, HealthResponse, KeyResponse};
