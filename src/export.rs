//! Export hand-off - what leaves the core after a successful run.
//!
//! The core never writes files. Each header's collected references are
//! formatted into a [`HeaderExport`] and handed, in dependency order, to
//! caller-supplied [`Exporter`]s. Exporters may run concurrently; an
//! [`ExportThrottle`] bounds how many run at once.
//!
//! ## Key Types
//!
//! - [`HeaderExport`] - Formatted reference lists for one header
//! - [`Exporter`] - Consumer of header exports
//! - [`ExportThrottle`] - Bounded counting semaphore

use std::panic::{self, AssertUnwindSafe};

use parking_lot::{Condvar, Mutex};
use rayon::prelude::*;

use crate::base::{HeaderId, Name, TypeId};
use crate::diag::{ContextFrame, MessageKind, ResolveResult, push_context};
use crate::references::singleton_name;
use crate::resolve::Session;
use crate::types::TypeArena;

/// Formats a reference key as text.
pub type ReferenceFormatter = fn(&TypeArena, TypeId, bool) -> String;

/// Everything an exporter needs for one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderExport {
    pub header: HeaderId,
    pub path: Name,
    /// Sorted, deduplicated references to types declared elsewhere
    pub cross_module: Vec<String>,
    /// Sorted construction functions of the types declared here
    pub declaration: Vec<String>,
    /// Forward declarations in first-use order
    pub forward_declarations: Vec<String>,
    pub singletons: Vec<String>,
    pub export_types: Vec<TypeId>,
}

/// A consumer of finished headers.
pub trait Exporter: Sync {
    fn name(&self) -> &str;

    /// Export one header. An `Err` is reported on that header.
    fn export(&self, session: &Session, header: &HeaderExport) -> ResolveResult<()>;
}

// ============================================================================
// THROTTLE
// ============================================================================

/// Counting semaphore limiting concurrent exporter work.
#[derive(Debug)]
pub struct ExportThrottle {
    available: Mutex<usize>,
    released: Condvar,
}

/// Held while one exporter task runs; returns its slot on drop.
#[derive(Debug)]
pub struct ExportPermit<'a> {
    throttle: &'a ExportThrottle,
}

impl ExportThrottle {
    pub fn new(width: usize) -> Self {
        Self {
            available: Mutex::new(width.max(1)),
            released: Condvar::new(),
        }
    }

    /// Block until a slot is free.
    pub fn acquire(&self) -> ExportPermit<'_> {
        let mut available = self.available.lock();
        while *available == 0 {
            self.released.wait(&mut available);
        }
        *available -= 1;
        ExportPermit { throttle: self }
    }

    pub fn available(&self) -> usize {
        *self.available.lock()
    }
}

impl Drop for ExportPermit<'_> {
    fn drop(&mut self) {
        *self.throttle.available.lock() += 1;
        self.throttle.released.notify_one();
    }
}

// ============================================================================
// SESSION ENTRY POINTS
// ============================================================================

impl Session {
    /// Format the references collected for `header`.
    pub fn header_export(&self, header: HeaderId, formatter: ReferenceFormatter) -> HeaderExport {
        let file = self.header(header);
        let types = self.types();
        file.with_references(|refs| HeaderExport {
            header,
            path: file.path.clone(),
            cross_module: refs.cross_module.sorted(|id, registered| formatter(types, id, registered)),
            declaration: refs.declaration.sorted(|id, registered| formatter(types, id, registered)),
            forward_declarations: refs.forward_declarations.iter().cloned().collect(),
            singletons: refs.singletons.sorted(|id, registered| formatter(types, id, registered)),
            export_types: refs.export_types.clone(),
        })
    }

    /// Exports for every header in dependency order, using construction
    /// function names.
    pub fn header_exports(&self) -> Vec<HeaderExport> {
        self.sorted_headers()
            .iter()
            .map(|&header| self.header_export(header, singleton_name))
            .collect()
    }

    /// Hand every header to every exporter.
    ///
    /// Does nothing once errors have been reported. Failures are posted on the
    /// header being exported. Returns `true` when no errors were reported.
    pub fn run_exporters(&self, exporters: &[&dyn Exporter]) -> bool {
        if self.has_errors() {
            tracing::debug!("[EXPORT] skipped, errors reported");
            return false;
        }

        let exports = self.header_exports();
        let throttle = ExportThrottle::new(self.config().export_concurrency);
        let tasks: Vec<(&dyn Exporter, &HeaderExport)> = exporters
            .iter()
            .flat_map(|&exporter| exports.iter().map(move |export| (exporter, export)))
            .collect();

        if self.config().go_wide {
            tasks
                .par_iter()
                .for_each(|&(exporter, export)| self.run_export_task(&throttle, exporter, export));
        } else {
            tasks
                .iter()
                .for_each(|&(exporter, export)| self.run_export_task(&throttle, exporter, export));
        }

        tracing::debug!(
            "[EXPORT] {} exporters over {} headers",
            exporters.len(),
            exports.len()
        );
        !self.has_errors()
    }

    fn run_export_task(&self, throttle: &ExportThrottle, exporter: &dyn Exporter, export: &HeaderExport) {
        let _permit = throttle.acquire();
        let _frame = push_context(ContextFrame::Note(format!(
            "while exporting '{}' with '{}'",
            export.path,
            exporter.name()
        )));
        match panic::catch_unwind(AssertUnwindSafe(|| exporter.export(self, export))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.post_failure(export.header, &err),
            Err(_) => self.post(
                export.header,
                MessageKind::Ice,
                0,
                None,
                format!("Exporter '{}' panicked", exporter.name()),
            ),
        }
    }
}
