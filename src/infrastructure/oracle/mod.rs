pub mod client;
pub mod connection_url;
pub mod oracle_source_adapter;
