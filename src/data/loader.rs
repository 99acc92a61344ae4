use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset from a comma-separated file with a header row.
///
/// Every field stays text; the filter pipeline coerces scores when it
/// builds a chart series.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|_| LoadError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    read_table(file)
}

/// Parse CSV from any byte source.
pub fn read_table<R: Read>(source: R) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(source);

    let column_names: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(Record::new(row.iter()));
    }

    Ok(Table::new(column_names, records))
}

/// Load the dataset, or fall back to an empty table plus the error to show.
pub fn load_or_empty(path: &Path) -> (Table, Option<LoadError>) {
    match load_table(path) {
        Ok(table) => {
            log::info!(
                "Loaded {} rows with columns {:?} from {}",
                table.len(),
                table.column_names,
                path.display()
            );
            (table, None)
        }
        Err(e) => {
            log::warn!("Failed to load {}: {e}", path.display());
            (Table::empty(), Some(e))
        }
    }
}
