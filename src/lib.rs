//! Justified image-grid layout.
//!
//! Packs an ordered list of images into rows that exactly fill a container
//! width while keeping every image's aspect ratio. See
//! [`compute_layout`] for the core operation and [`relayout`] for
//! re-running it as the container is resized.

pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod relayout;
pub mod render;
pub mod scanner;

pub use config::{ConfigError, GridConfig, LayoutConfig};
pub use error::LayoutError;
pub use layout::{compute_layout, CachedLayoutComputer, JustifiedLayout};
pub use models::{Dimensions, Image, Layout, RowItem, RowModel};
pub use relayout::{ContainerMetrics, RelayoutScheduler};
