pub mod error;
pub mod topic;

pub use error::ProtocolError;
pub use topic::*;
