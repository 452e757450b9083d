mod common;
pub mod request;
pub mod response;
pub mod tagged_fields;

pub use common::*;
pub use request::*;
pub use response::*;
pub use tagged_fields::TaggedFields;
