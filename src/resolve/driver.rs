//! Phase scheduling: per-header fan-out with a barrier between steps.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;

use crate::base::HeaderId;
use crate::diag::{ContextFrame, MessageKind, ResolveError, ResolveResult, codes, push_context};
use crate::references::topological_sort;
use crate::types::HeaderFile;

use super::session::Session;
use super::{ResolvePhase, bases, finalize, invalid, properties, validate};

/// Work performed for one header within one step.
pub(super) type HeaderStep = fn(&Session, &HeaderFile) -> ResolveResult<()>;

impl Session {
    /// Populate the symbol tables, run every phase and sort the headers.
    ///
    /// Returns `true` when the run finished without errors.
    pub fn run(&mut self) -> bool {
        let started = Instant::now();
        self.populate();

        for phase in ResolvePhase::ALL {
            match phase {
                ResolvePhase::Bases => self.step_for_all_headers(phase.name(), bases::resolve_header),
                ResolvePhase::InvalidCheck => {
                    self.step_for_all_headers(phase.name(), invalid::check_header)
                }
                ResolvePhase::Properties => {
                    self.step_for_all_headers(phase.name(), properties::resolve_header)
                }
                ResolvePhase::Final => {
                    // Every placeholder must be swapped before any header's
                    // final pass reads through one.
                    self.step_for_all_headers("Final (placeholders)", finalize::replace_placeholders);
                    self.step_for_all_headers(phase.name(), finalize::finalize_header);
                }
                ResolvePhase::Validate => {
                    self.step_for_all_headers(phase.name(), validate::validate_header)
                }
                ResolvePhase::CollectReferences => {
                    self.step_for_all_headers(phase.name(), crate::references::collect_header)
                }
            }
        }

        if !self.has_errors() {
            if let Err(err) = self.sort_headers() {
                tracing::debug!("[TOPO] {err}");
            }
        }

        tracing::debug!(
            "[RESOLVE] run finished in {:?}: {} errors, {} warnings",
            started.elapsed(),
            self.counters.error_count(),
            self.counters.warning_count()
        );
        !self.has_errors()
    }

    /// Run `step` for every header, in parallel when going wide.
    ///
    /// Returns once every header has finished. Skipped entirely when errors
    /// have already been reported.
    pub(super) fn step_for_all_headers(&self, name: &'static str, step: HeaderStep) {
        if self.has_errors() {
            tracing::debug!("[RESOLVE] step {name} skipped, errors reported");
            return;
        }

        let started = Instant::now();
        let run = |header: &HeaderFile| self.run_header_step(name, header, step);
        if self.config.go_wide {
            self.headers.par_iter().for_each(run);
        } else {
            self.headers.iter().for_each(run);
        }
        tracing::debug!(
            "[RESOLVE] step {name}: {} headers in {:?}",
            self.headers.len(),
            started.elapsed()
        );
    }

    /// Order headers by their collected references.
    ///
    /// On a cycle every edge of it is reported on the header the cycle was
    /// entered through and no order is stored.
    pub(super) fn sort_headers(&mut self) -> ResolveResult<()> {
        let edges: Vec<Vec<HeaderId>> = self.headers.iter().map(HeaderFile::referenced_headers).collect();
        match topological_sort(&edges) {
            Ok(order) => {
                self.sorted_headers = order;
                Ok(())
            }
            Err(cycle) => {
                let Some(&(first, _)) = cycle.chain.first() else {
                    return Err(ResolveError::ice("Empty header dependency cycle"));
                };
                self.post(first, MessageKind::Error, 0, Some(codes::CIRCULAR), "Circular dependency detected:");
                let mut paths = vec![self.headers[first.index()].path.to_string()];
                for (from, to) in &cycle.chain {
                    let from = &self.headers[from.index()].path;
                    let to = &self.headers[to.index()].path;
                    self.post(
                        first,
                        MessageKind::Error,
                        0,
                        Some(codes::CIRCULAR),
                        format!("'{from}' includes/requires '{to}'"),
                    );
                    paths.push(to.to_string());
                }
                self.sorted_headers.clear();
                Err(ResolveError::DependencyCycle(paths))
            }
        }
    }

    /// One header is one isolation unit: failures and panics become messages
    /// on that header and never reach its siblings.
    fn run_header_step(&self, name: &'static str, header: &HeaderFile, step: HeaderStep) {
        let _frame = push_context(ContextFrame::Header {
            path: header.path.clone(),
            step: name,
        });
        match panic::catch_unwind(AssertUnwindSafe(|| step(self, header))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.post_failure(header.id, &err),
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                self.post(
                    header.id,
                    MessageKind::Ice,
                    0,
                    None,
                    format!("Panic while running '{name}': {detail}"),
                );
            }
        }
    }
}
