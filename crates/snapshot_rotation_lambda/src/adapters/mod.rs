pub mod rds;
pub mod snapshot_store;
