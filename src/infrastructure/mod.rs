pub mod bigquery;
pub mod gcp;
pub mod oracle;
