//! Domain layer - Pure business abstractions
//!
//! No framework dependencies here, only trait definitions, the record
//! types, and domain error types.

pub mod errors;
pub mod records;

pub use errors::AppError;
pub use records::PointRecord;
