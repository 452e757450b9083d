pub mod constants;
pub mod dto;
pub mod framer;
pub mod kafka_protocol_parser;
pub mod parser;

pub use kafka_protocol_parser::KafkaProtocolParser;
