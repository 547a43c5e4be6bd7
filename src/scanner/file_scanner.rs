//! Directory scanner turning image files into layout inputs.
//!
//! - Walks the directory with walkdir, optionally recursing
//! - Keeps files with a known image extension
//! - Reads only the image header to get intrinsic dimensions

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use image::ImageReader;
use tracing::{info, trace, warn};
use walkdir::WalkDir;

use crate::models::Image;

/// Marker dimension for files whose header could not be read.
pub const ERROR_DIMENSION: u32 = 0;

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 0, // unlimited
            follow_symlinks: false,
        }
    }
}

pub fn is_image_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
    )
}

#[derive(Debug, Default)]
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scans `dir` and returns one image per file, sorted by path.
    ///
    /// Ids are paths relative to `dir`; hrefs are the full paths. Files
    /// whose dimensions cannot be read are kept with 0x0 dimensions, so the
    /// layout reports and skips them.
    pub fn scan(&self, dir: &Path) -> Result<Vec<Image>> {
        if !dir.is_dir() {
            bail!("Not a directory: {:?}", dir);
        }

        let mut paths = self.discover_files(dir);
        paths.sort();

        let images: Vec<Image> = paths
            .iter()
            .map(|path| {
                let (width, height) = read_dimensions(path);
                let id = path.strip_prefix(dir).unwrap_or(path);
                Image::new(
                    id.to_string_lossy(),
                    path.to_string_lossy(),
                    f64::from(width),
                    f64::from(height),
                )
            })
            .collect();

        info!(count = images.len(), "Scanned {:?}", dir);
        Ok(images)
    }

    fn discover_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(dir).follow_links(self.config.follow_symlinks);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        } else if self.config.max_depth > 0 {
            walker = walker.max_depth(self.config.max_depth);
        }

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(is_image_extension)
            })
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// Scans `dir` with the default settings, descending into subdirectories
/// when `recursive` is set.
pub fn scan_directory(dir: &Path, recursive: bool) -> Result<Vec<Image>> {
    FileScanner::with_config(ScanConfig {
        recursive,
        ..Default::default()
    })
    .scan(dir)
}

/// Reads intrinsic dimensions from the image header.
///
/// Returns `(0, 0)` for unreadable files instead of erroring.
pub fn read_dimensions(path: &Path) -> (u32, u32) {
    let dimensions = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.into_dimensions());

    match dimensions {
        Ok((width, height)) => {
            trace!("Got dimensions {}x{} for {:?}", width, height, path);
            (width, height)
        }
        Err(e) => {
            warn!("Failed to read image dimensions for {:?}: {}", path, e);
            (ERROR_DIMENSION, ERROR_DIMENSION)
        }
    }
}
