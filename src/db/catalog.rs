use std::io::Read;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogEntry},
};

const REQUIRED_COLUMNS: [&str; 2] = ["Title", "Description"];

/// Loads the show catalog from a CSV file
///
/// The file must have `Title` and `Description` columns; any other columns
/// are ignored.
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::Catalog(format!("Failed to open catalog {}: {}", path.display(), e))
    })?;

    let catalog = read_catalog(file)?;

    tracing::info!(
        path = %path.display(),
        shows = catalog.len(),
        "Loaded show catalog"
    );

    Ok(catalog)
}

/// Reads catalog rows from any CSV source
pub fn read_catalog<R: Read>(reader: R) -> AppResult<Catalog> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::Catalog(format!(
                "Catalog is missing required column '{}'",
                column
            )));
        }
    }

    let mut catalog = Catalog::new();
    for (row, record) in reader.deserialize::<CatalogEntry>().enumerate() {
        let entry = record?;

        if entry.title.is_empty() {
            tracing::warn!(row = row + 1, "Skipping catalog row without a title");
            continue;
        }

        let title = entry.title.clone();
        if !catalog.insert(entry) {
            tracing::warn!(title = %title, row = row + 1, "Duplicate catalog title, keeping first");
        }
    }

    Ok(catalog)
}
