//! Reading and writing GeoJSON files.

use std::fs;
use std::path::{Path, PathBuf};

use geocapture_core::{GeometryError, GeometryPair};
use thiserror::Error;

/// Errors from opening or saving a GeoJSON file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid geometry file: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read a point and/or polygon from a GeoJSON file.
pub fn read_geometries(path: &Path) -> Result<GeometryPair, FileError> {
    let text = fs::read_to_string(path)?;
    let pair = GeometryPair::from_geojson_str(&text)?;
    log::info!(
        "Read {} (point: {}, polygon: {})",
        path.display(),
        pair.point.is_some(),
        pair.polygon.is_some()
    );
    Ok(pair)
}

/// Write the pair as a GeoJSON FeatureCollection.
pub fn write_geometries(path: &Path, pair: &GeometryPair) -> Result<(), FileError> {
    let json = serde_json::to_string_pretty(&pair.to_feature_collection())?;
    fs::write(path, json)?;
    log::info!("Saved geometries to {}", path.display());
    Ok(())
}

/// Ask for a GeoJSON file to open.
#[cfg(feature = "native")]
pub fn pick_open_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open GeoJSON")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file()
}

/// Ask where to save a GeoJSON file.
#[cfg(feature = "native")]
pub fn pick_save_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save GeoJSON")
        .set_file_name("location.geojson")
        .add_filter("GeoJSON", &["geojson", "json"])
        .save_file()
}

#[cfg(not(feature = "native"))]
pub fn pick_open_path() -> Option<PathBuf> {
    log::warn!("File dialogs need the `native` feature");
    None
}

#[cfg(not(feature = "native"))]
pub fn pick_save_path() -> Option<PathBuf> {
    log::warn!("File dialogs need the `native` feature");
    None
}
