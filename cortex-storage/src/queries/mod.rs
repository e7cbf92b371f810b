pub mod export_import;
pub mod link_ops;
pub mod memory_crud;
pub mod memory_query;
pub mod session_crud;
