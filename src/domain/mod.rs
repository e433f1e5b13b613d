pub mod bq_type_mapper;
pub mod connection_url;
pub mod entities;
pub mod errors;
pub mod table_filter;
