//! Reference collection, header ordering and export hand-off tests

mod tests_export;
mod tests_header_order;
