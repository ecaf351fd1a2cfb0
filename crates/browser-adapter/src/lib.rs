//! Browser adapter layer: port trait, snapshot model, session ownership.
//!
//! Nothing in this crate knows about job applications; it is the seam the
//! rest of the engine talks to a concrete driver through.

pub mod config;
pub mod errors;
pub mod model;
pub mod port;
pub mod session;

pub use config::{
    load_config_from_path, load_config_from_reader, parse_config_str, ConfigError,
    FingerprintConfig, SessionConfig, WindowSize,
};
pub use errors::{PortError, SessionError};
pub use model::{BoundingBox, ElementNode, FormInventory, NodeHandle, PageSnapshot, PageState};
pub use port::BrowserPort;
pub use session::Session;
