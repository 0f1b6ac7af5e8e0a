//! Property model tests
//!
//! - Default value sanitizing across scalar and struct kinds
//! - Container construction and flag propagation
//! - Structural equality

mod tests_containers;
mod tests_default_values;
mod tests_same_type;
