pub mod cleanup;
pub mod rotate;

pub use cleanup::{CleanupReport, sweep_orphaned_ips};
pub use rotate::{RotationOutcome, new_public_ip_name, rotate_public_ip};
