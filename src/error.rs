use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Errors while reading the source CSV into a [`Table`](crate::data::model::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configured path does not resolve to a readable file.
    #[error("No se encontró el archivo CSV: {}. Verifica la ruta y el nombre del archivo.", .path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read as CSV.
    #[error("No se pudo leer el archivo CSV: {0}")]
    Read(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A matched record whose score could not be coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct BadScore {
    /// Zero-based data row (header excluded).
    pub row: usize,
    /// Raw cell text.
    pub value: String,
}

impl fmt::Display for BadScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Users count rows from 1 below the header line.
        write!(f, "fila {}: '{}'", self.row + 1, self.value)
    }
}

/// Errors raised by the filter pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required columns absent from the header (fatal for the session).
    #[error("El archivo CSV no contiene las columnas esperadas: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Matched records with unparsable scores (fatal for this chart only).
    #[error("Valores de integridad no numéricos: {}", join_bad_scores(.0))]
    NonNumericScore(Vec<BadScore>),
}

fn join_bad_scores(bad: &[BadScore]) -> String {
    bad.iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Errors while rendering or saving the PNG chart.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No hay datos para exportar")]
    EmptySeries,

    #[error("Tamaño de imagen inválido: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Error al dibujar la gráfica: {0}")]
    Draw(String),

    #[error("Error al codificar PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Error al escribir {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Errors while reading `dashboard.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
