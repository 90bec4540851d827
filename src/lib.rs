//! patchnova library
//!
//! Shows host identification and triggers the platform's own update tooling
//! (Windows Update, softwareupdate, apt/dnf/pacman), recording every outcome
//! in rotating history and error logs.

pub mod app;
pub mod collectors;
pub mod config;
pub mod data;
pub mod dialogs;
pub mod display;
pub mod error;
pub mod logging;
pub mod software;
pub mod updates;
pub mod utils;
pub mod versions;

pub use app::App;
pub use data::{HostProfile, Inventory, LinuxDistro, OsFamily, SoftwareStatus};
pub use dialogs::Dialogs;
pub use error::{PatchnovaError, Result};
pub use logging::UpdateLog;
pub use updates::Outcome;
