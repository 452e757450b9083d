pub mod tcp_adapter;

pub use tcp_adapter::TcpAdapter;
