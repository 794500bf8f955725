pub mod file_system_blob_store;
