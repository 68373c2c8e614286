pub mod grpc;
pub mod memory;
