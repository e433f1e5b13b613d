pub mod bq_loader_adapter;
