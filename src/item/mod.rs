/// This module provides a CSV/TSV record writer.
pub mod csv;
