//! Host, platform and package collectors

pub mod host;
pub mod packages;
pub mod platform;
