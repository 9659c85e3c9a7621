//! Multi-window tab navigation and synchronization core for Modelibr.
//!
//! Several windows of the same application instance each host an
//! independent set of document tabs. The windows share no memory; they
//! coordinate through a persistent shared registry (one record per window)
//! and a best-effort broadcast bus. This crate provides:
//!
//! - [`window`] — stable per-context window identity
//! - [`tab`] — tab identity, the per-window tab list, and the compact
//!   tab-list token codec
//! - [`registry`] — the persisted window registry and its storage backends
//! - [`bus`] — the cross-window broadcast protocol
//! - [`session`] — the per-window navigation store tying it all together,
//!   including deep-link resolution and stale-window collection
//!
//! Content rendering, the backend CRUD API, uploads, and authentication
//! are external collaborators; this core only manages navigation state.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bus;
pub mod config;
pub mod deeplink;
pub mod registry;
pub mod session;
pub mod tab;
pub mod window;

pub use bus::{BusMessage, InProcessBus, NavBus, NoopBus};
pub use config::NavConfig;
pub use deeplink::DeepLinkResolver;
pub use registry::{FileRegistryStore, MemoryRegistryStore, RegistryStore, WindowRecord};
pub use session::NavSession;
pub use tab::{Tab, TabManager, TabType};
pub use window::{get_or_create_window_id, ContextSlot, FileSlot, MemorySlot, WindowId};
