//! Header dependency ordering.

use thiserror::Error;

use crate::base::HeaderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unmarked,
    InProgress,
    Done,
}

/// A reference cycle between headers.
///
/// `chain` lists each edge of the cycle, starting at the header the walk
/// re-entered: `(a, b)` means `a` references `b`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency across {} headers", chain.len())]
pub struct DependencyCycle {
    pub chain: Vec<(HeaderId, HeaderId)>,
}

/// Order headers so every header follows the headers it references.
///
/// `edges[h]` lists the headers `h` references. Roots are visited in index
/// order and edges in list order, so the result is deterministic. Self edges
/// and out-of-range targets are ignored. A cycle yields no ordering at all.
pub fn topological_sort(edges: &[Vec<HeaderId>]) -> Result<Vec<HeaderId>, DependencyCycle> {
    let count = edges.len();
    let mut marks = vec![Mark::Unmarked; count];
    let mut order = Vec::with_capacity(count);
    // (node, index of the next edge to follow)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let header = |index: usize| HeaderId::new(index as u32);

    for root in 0..count {
        if marks[root] != Mark::Unmarked {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let Some(target) = edges[node].get(top.1) else {
                marks[node] = Mark::Done;
                order.push(header(node));
                stack.pop();
                continue;
            };
            top.1 += 1;

            let target = target.index();
            if target == node || target >= count {
                continue;
            }
            match marks[target] {
                Mark::Unmarked => {
                    marks[target] = Mark::InProgress;
                    stack.push((target, 0));
                }
                Mark::InProgress => {
                    let start = stack
                        .iter()
                        .position(|&(entry, _)| entry == target)
                        .unwrap_or(0);
                    let mut chain: Vec<(HeaderId, HeaderId)> = stack[start..]
                        .windows(2)
                        .map(|pair| (header(pair[0].0), header(pair[1].0)))
                        .collect();
                    chain.push((header(node), header(target)));
                    tracing::trace!("[TOPO] cycle through {} headers", chain.len());
                    return Err(DependencyCycle { chain });
                }
                Mark::Done => {}
            }
        }
    }

    tracing::trace!("[TOPO] sorted {} headers", order.len());
    Ok(order)
}
