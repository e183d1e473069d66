//! Sitetree Service Library
//!
//! Hosts the core engine: keeps the latest snapshot, serializes scan
//! requests, and serves pages and navigation to a front end.

pub mod coordinator;
pub mod error;
pub mod render;
pub mod settings;
pub mod site;
pub mod state;


pub use coordinator::{BuildState, ScanCoordinator, ScanHandle, ScanStatus};
pub use error::{Result, ServiceError};
pub use render::{MarkdownRenderer, PageSource, Renderer};
pub use settings::{LogLevel, ServiceSettings};
pub use site::{canonical_request_path, RenderedPage, Site};
pub use state::GlobalState;

/// Config file picked up from the content root when none is given
pub const CONFIG_FILE_NAME: &str = "sitetree.yaml";

/// Spawn a coordinator for `state` on the current runtime.
pub fn spawn_coordinator(state: GlobalState) -> ScanHandle {
    let (coordinator, handle) = coordinator::channel(state);
    tokio::spawn(coordinator.start());
    handle
}
