//! Resolution engine tests
//!
//! Full runs over small sessions:
//! - Multi-header resolution and header order
//! - Scoped symbol lookup
//! - Placeholder replacement
//! - Validation diagnostics

mod tests_end_to_end;
mod tests_placeholders;
mod tests_symbol_scoping;
mod tests_validation;
