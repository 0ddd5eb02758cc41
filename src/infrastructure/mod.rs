//! Infrastructure layer: document format, file provider and DI container
//!
//! This layer implements the Provider and I/O boundary traits and wires up services.

pub mod di;
pub mod document;
pub mod error;
pub mod provider;
pub mod traits;

pub use di::ServiceContainer;
pub use document::GraphDocument;
pub use error::{InfraError, InfraResult};
pub use provider::FileProvider;
