//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /{prefix} or GET /{prefix}/{client_id}
//!     → request.rs (request ID)
//!     → server.rs (handler, runs the subscription pipeline)
//!     → response.rs (base64 body, profile headers, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ProfileHeaders};
pub use server::{AppState, HttpServer};
