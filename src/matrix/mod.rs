//! Restart matrix input and frequency scanning.
//!
//! A restart matrix holds 1000 restarts of the noise source, 1000 symbols
//! each, one symbol per byte. This module loads and validates that file and
//! derives the per-line repeat statistics the restart test is built on.

mod scan;
mod symbols;

pub use scan::FrequencyScan;
pub use symbols::{MatrixError, SymbolMatrix, MATRIX_COLUMNS, MATRIX_ROWS, MATRIX_SIZE};
