//! Orbital galaxy of inspirations.
//!
//! Renders the Nebula Archive on an HTML canvas with:
//! - Four family hubs riding a tilted elliptical orbit
//! - Drag-to-spin rotation with momentum and idle drift
//! - Clusters and inspiration nodes scattered around each hub
//! - A camera that chases whatever the navigation state focuses on
//!
//! The pure parts (orbit, rotation, layout, navigation, camera) have no
//! browser dependency and are unit tested natively.
//!
//! # Example
//!
//! ```ignore
//! use nebula_archive::{GalaxyCanvas, GalaxyCommand, GalaxyConfig, GalaxySession};
//!
//! let session = GalaxySession::new();
//! let snapshot = session.snapshot();
//! view! { <GalaxyCanvas session=session.clone() config=GalaxyConfig::default() fullscreen=true /> }
//! ```

pub mod archive;
pub mod camera;
mod component;
pub mod config;
pub mod layout;
pub mod link;
pub mod navigation;
pub mod orbit;
mod particles;
mod render;
pub mod rotation;
pub mod state;
pub mod theme;
pub mod types;

pub use component::{GalaxyCanvas, GalaxyCommand, GalaxySession};
pub use config::GalaxyConfig;
pub use state::{DetailCard, GalaxyState, ListItem, OverlaySnapshot};
pub use theme::Theme;
pub use types::{Family, Inspiration, InspirationId};
