//! Cycle detection over module reference maps.

use rustc_hash::FxHashMap;

use crate::compile::SourceModule;
use crate::error::{Error, Result};

/// Module id → ids it references directly.
pub type Adjacency = FxHashMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the active path.
    Gray,
    /// Fully explored.
    Black,
}

struct Frame<'a> {
    node: &'a str,
    next_child: usize,
}

/// Depth-first search from `start` for a reference loop.
///
/// Returns the path from `start` to the module that closes the loop, with
/// that module appearing twice (last element repeats an earlier one). A
/// direct self-reference yields `[start, start]`. Ids missing from
/// `adjacency` are treated as leaves.
///
/// Uses an explicit stack, so reference chain depth is bounded only by
/// memory.
pub fn detect_cycle<'a>(start: &'a str, adjacency: &'a Adjacency) -> Option<Vec<String>> {
    let mut marks: FxHashMap<&'a str, Mark> = FxHashMap::default();
    let mut stack = vec![Frame {
        node: start,
        next_child: 0,
    }];
    marks.insert(start, Mark::Gray);

    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        let child = adjacency
            .get(node)
            .and_then(|children| children.get(frame.next_child));
        frame.next_child += 1;

        let Some(child) = child else {
            marks.insert(node, Mark::Black);
            stack.pop();
            continue;
        };

        match marks.get(child.as_str()) {
            None => {
                marks.insert(child, Mark::Gray);
                stack.push(Frame {
                    node: child,
                    next_child: 0,
                });
            }
            Some(Mark::Gray) => {
                let mut path: Vec<String> = stack.iter().map(|f| f.node.to_string()).collect();
                path.push(child.clone());
                return Some(path);
            }
            Some(Mark::Black) => {}
        }
    }

    None
}

/// Build the reference map of the modules being compiled.
///
/// Only the compiled modules contribute outgoing edges; referenced modules
/// outside the set are leaves.
pub fn adjacency_of(modules: &[SourceModule]) -> Adjacency {
    modules
        .iter()
        .map(|m| (m.id.clone(), m.references.clone()))
        .collect()
}

/// Fail with [`Error::CyclicDependency`] if any module can reach a loop.
///
/// Modules are tried as start points in request order; the first loop found
/// is reported.
pub fn check_for_cycles(modules: &[SourceModule]) -> Result<()> {
    let adjacency = adjacency_of(modules);

    for module in modules {
        if let Some(path) = detect_cycle(&module.id, &adjacency) {
            tracing::warn!("Cyclic dependency detected: {}", path.join(" -> "));
            return Err(Error::CyclicDependency { path });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(&str, &[&str])]) -> Adjacency {
        edges
            .iter()
            .map(|(from, to)| {
                (
                    from.to_string(),
                    to.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_acyclic_chain() {
        let map = adjacency(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        for start in ["a", "b", "c"] {
            assert_eq!(detect_cycle(start, &map), None);
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // d is reached twice, but never while on the active path.
        let map = adjacency(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert_eq!(detect_cycle("a", &map), None);
    }

    #[test]
    fn test_three_cycle_path() {
        let map = adjacency(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        assert_eq!(
            detect_cycle("A", &map),
            Some(vec!["A".into(), "B".into(), "C".into(), "A".into()])
        );
    }

    #[test]
    fn test_self_reference() {
        let map = adjacency(&[("A", &["A"])]);
        assert_eq!(detect_cycle("A", &map), Some(vec!["A".into(), "A".into()]));
    }

    #[test]
    fn test_cycle_not_through_start() {
        let map = adjacency(&[("a", &["b"]), ("b", &["c"]), ("c", &["b"])]);
        assert_eq!(
            detect_cycle("a", &map),
            Some(vec!["a".into(), "b".into(), "c".into(), "b".into()])
        );
    }

    #[test]
    fn test_missing_nodes_are_leaves() {
        let map = adjacency(&[("a", &["ghost", "b"]), ("b", &[])]);
        assert_eq!(detect_cycle("a", &map), None);
        assert_eq!(detect_cycle("unknown", &map), None);
    }

    #[test]
    fn test_backtracked_branch_then_cycle() {
        let map = adjacency(&[("a", &["x", "b"]), ("x", &[]), ("b", &["a"])]);
        assert_eq!(
            detect_cycle("a", &map),
            Some(vec!["a".into(), "b".into(), "a".into()])
        );
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n = 100_000;
        let map: Adjacency = (0..n)
            .map(|i| (i.to_string(), vec![(i + 1).to_string()]))
            .collect();
        assert_eq!(detect_cycle("0", &map), None);
    }
}
