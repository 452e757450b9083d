pub mod base_parser;
pub mod cursor;
pub mod request_encoder;
pub mod request_parser;
pub mod response_decoder;
pub mod response_encoder;
pub mod traits;
pub mod varint;

pub use base_parser::BaseParser;
pub use request_encoder::RequestEncoder;
pub use request_parser::RequestParser;
pub use response_decoder::ResponseDecoder;
pub use response_encoder::ResponseEncoder;
pub use traits::*;
