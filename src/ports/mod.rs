pub mod loader_port;
pub mod secret_port;
pub mod source_port;
