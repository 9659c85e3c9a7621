//! Navigation configuration re-exports
//!
//! Types are defined in the `modelibr-nav-config` crate and re-exported
//! here so the rest of the crate can use `crate::config::*` unchanged.

pub use modelibr_nav_config::NavConfig;
