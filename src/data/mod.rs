//! Data structures shared by collectors, actions and display

pub mod host;
pub mod inventory;
pub mod platform;

pub use host::HostProfile;
pub use inventory::{Inventory, SoftwareStatus};
pub use platform::{LinuxDistro, OsFamily};
