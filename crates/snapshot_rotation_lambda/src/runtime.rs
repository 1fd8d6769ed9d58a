pub use snapshot_rotation_core::{config, contract, error, retention};
