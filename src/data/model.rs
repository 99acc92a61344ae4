// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

/// Cell texts treated as "no value", mirroring the usual DataFrame null markers.
const NULL_MARKERS: &[&str] = &["NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Whether a raw cell counts as missing (blank or a null marker).
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_MARKERS.contains(&trimmed)
}

// ---------------------------------------------------------------------------
// Record – one row of the CSV
// ---------------------------------------------------------------------------

/// A single row of the source table. Cells are kept as the original text,
/// in header order; numeric coercion happens in the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub cells: Vec<String>,
}

impl Record {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Cell at `idx`, or `""` for a short row.
    pub fn get(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset: header plus rows. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// All records (rows).
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(column_names: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            column_names,
            records,
        }
    }

    /// A table with no columns and no rows (what the UI shows after a failed load).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
