//! Tests for the sortino front end
//!
//! Tests are organized by topic:
//! - `config` - YAML configuration and command-line overrides
//! - `data` - CSV loading and cleaning into a return matrix
//! - `output` - Printed summary and JSON export
//! - `logging` - Log file rotation
