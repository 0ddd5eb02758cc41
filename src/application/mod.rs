//! Application layer: provider boundary and mount driver
//!
//! This layer orchestrates domain logic and depends on the Provider trait for I/O.

pub mod error;
pub mod error_ext;
pub mod mount;
pub mod provider;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use mount::{auto_mount, mount, unmount, MountReport};
pub use provider::{Model, Parameters, ProgressListener, Provider, TracingListener};
