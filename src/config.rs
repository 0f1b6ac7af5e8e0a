//! Session options

/// Options for one header tool run.
///
/// Owned by the [`Session`](crate::resolve::Session) and passed by reference to
/// every phase; there is no process-wide configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fan per-header work out over the thread pool (false = sequential)
    pub go_wide: bool,
    /// Treat warnings as errors when deciding whether later phases run
    pub warnings_as_errors: bool,
    /// Maximum number of exporter tasks writing at the same time
    pub export_concurrency: usize,
    /// Packages whose editable members must carry a `Category`
    pub engine_package_names: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            go_wide: true,
            warnings_as_errors: false,
            export_concurrency: 32,
            engine_package_names: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_go_wide(mut self, go_wide: bool) -> Self {
        self.go_wide = go_wide;
        self
    }

    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    pub fn with_export_concurrency(mut self, width: usize) -> Self {
        self.export_concurrency = width.max(1);
        self
    }

    pub fn with_engine_package(mut self, name: impl Into<String>) -> Self {
        self.engine_package_names.push(name.into());
        self
    }

    /// Whether `package` requires member categories
    pub fn is_engine_package(&self, package: &str) -> bool {
        self.engine_package_names.iter().any(|p| p == package)
    }
}
