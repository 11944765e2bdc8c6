//! HTTP surface of the demonstration host.
//!
//! `PUT /set`, `GET /get/:key`, `DELETE /del/:key` and `GET /health`, all
//! backed by one sharded cache of string values.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
