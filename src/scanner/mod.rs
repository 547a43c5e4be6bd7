//! Image sources for the grid.
//!
//! - `load_manifest` - JSON array of images in the sample-data shape
//! - `scan_directory` / `FileScanner` - images found on disk, sized from their headers

pub mod file_scanner;
pub mod manifest;

pub use file_scanner::{scan_directory, FileScanner, ScanConfig};
pub use manifest::{load_manifest, parse_manifest};
