//! PSAR Ring Visualization
//!
//! Watches a running [`psar_ring`] ring through its event feed. Nothing here
//! touches the protocol: presenters start a ring, drain events on their own
//! schedule, and draw what they have seen.
//!
//! # Architecture
//!
//! - **Layout**: places participants evenly on a circle
//! - **Monitor**: folds drained events into log lines and per-node state
//! - **Console**: prints the log and a one-line ring view as it runs
//! - **Server**: HTML page, start button, and JSON snapshot/log endpoints
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(RingConfig::default(), VisConfig::default())?;
//! server.serve(3000).await?;
//! ```

mod config;
mod console;
mod error;
mod layout;
mod monitor;
mod server;

pub use config::{VisConfig, DEFAULT_PACE, DEFAULT_POLL_INTERVAL};
pub use console::run_console;
pub use error::{Error, Result};
pub use layout::{LayoutConfig, NodePosition, RingLayout};
pub use monitor::{log_line, NodeState, RingMonitor, RingSnapshot, COMPLETED_LINE};
pub use server::{AppState, VisServer};
