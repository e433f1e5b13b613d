pub mod secret_manager_adapter;
