//! The restart symbol matrix and its file loader.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of restarts (rows) in a restart matrix.
pub const MATRIX_ROWS: usize = 1000;
/// Symbols captured per restart (columns).
pub const MATRIX_COLUMNS: usize = 1000;
/// Total bytes in a restart matrix file.
pub const MATRIX_SIZE: usize = MATRIX_ROWS * MATRIX_COLUMNS;

/// Errors raised while loading a restart matrix.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("failed to open input file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read input file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("only {got} of {expected} bytes read from {}", .path.display())]
    ShortRead {
        path: PathBuf,
        got: usize,
        expected: usize,
    },
    #[error("{} holds more than {expected} bytes", .path.display())]
    TrailingData { path: PathBuf, expected: usize },
    #[error("matrix must hold exactly {expected} symbols, got {got}")]
    InvalidLength { got: usize, expected: usize },
}

/// A 1000 x 1000 grid of restart symbols, one byte per symbol.
///
/// Row `r` holds the symbols of restart `r`. Storage is a single row-major
/// heap buffer; the matrix is immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolMatrix {
    data: Box<[u8]>,
}

impl SymbolMatrix {
    /// Wraps an in-memory buffer of exactly [`MATRIX_SIZE`] bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, MatrixError> {
        if data.len() != MATRIX_SIZE {
            return Err(MatrixError::InvalidLength {
                got: data.len(),
                expected: MATRIX_SIZE,
            });
        }
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Builds a matrix by evaluating `symbol(row, column)` for every cell.
    pub fn from_fn(mut symbol: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(MATRIX_SIZE);
        for row in 0..MATRIX_ROWS {
            for column in 0..MATRIX_COLUMNS {
                data.push(symbol(row, column));
            }
        }
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Reads a matrix file of exactly [`MATRIX_SIZE`] bytes.
    ///
    /// A shorter file is a [`MatrixError::ShortRead`]; a longer one is
    /// [`MatrixError::TrailingData`]. Nothing is padded or truncated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MatrixError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MatrixError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // One byte past the matrix is enough to detect trailing data.
        let mut data = Vec::with_capacity(MATRIX_SIZE + 1);
        file.take(MATRIX_SIZE as u64 + 1)
            .read_to_end(&mut data)
            .map_err(|source| MatrixError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            read = data.len().min(MATRIX_SIZE),
            expected = MATRIX_SIZE,
            "Read restart matrix"
        );

        if data.len() < MATRIX_SIZE {
            return Err(MatrixError::ShortRead {
                path: path.to_path_buf(),
                got: data.len(),
                expected: MATRIX_SIZE,
            });
        }
        if data.len() > MATRIX_SIZE {
            return Err(MatrixError::TrailingData {
                path: path.to_path_buf(),
                expected: MATRIX_SIZE,
            });
        }

        Self::from_bytes(data)
    }

    /// Number of rows (restarts).
    #[inline]
    pub fn rows(&self) -> usize {
        MATRIX_ROWS
    }

    /// Number of columns (symbols per restart).
    #[inline]
    pub fn columns(&self) -> usize {
        MATRIX_COLUMNS
    }

    /// Returns the symbol at `(row, column)`.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.data[row * MATRIX_COLUMNS + column]
    }

    /// Returns one row as a contiguous slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * MATRIX_COLUMNS;
        &self.data[start..start + MATRIX_COLUMNS]
    }

    /// Iterates the symbols of one column, top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = u8> + '_ {
        self.data[column..].iter().step_by(MATRIX_COLUMNS).copied()
    }

    /// Returns the raw row-major bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Smallest symbol width in bits (1-8) covering every value present.
    pub fn bits_per_symbol(&self) -> u8 {
        let combined = self.data.iter().fold(0u8, |acc, &symbol| acc | symbol);
        (8 - combined.leading_zeros() as u8).max(1)
    }
}

impl std::fmt::Debug for SymbolMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolMatrix")
            .field("rows", &MATRIX_ROWS)
            .field("columns", &MATRIX_COLUMNS)
            .field("bits_per_symbol", &self.bits_per_symbol())
            .finish()
    }
}
