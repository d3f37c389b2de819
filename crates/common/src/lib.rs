//! Wire types and errors shared across `sealbox` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::Envelope;
