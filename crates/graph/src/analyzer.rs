use crate::diagnostics::Diagnostics;
use crate::error::GraphError;
use crate::store::GraphStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Component whose neighbor count reached the hub threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    pub id: String,
    pub neighbor_count: usize,
}

/// Result of [`GraphAnalyzer::dependency_depth`].
///
/// `paths` maps every reached dependency to the route `[start, .., dependency]`
/// taken by the first visit. A dependency reachable over several routes keeps the
/// first one the DFS found, so `max_depth` is the depth of that traversal, not the
/// longest possible chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDepth {
    pub max_depth: usize,
    pub paths: BTreeMap<String, Vec<String>>,
}

/// One component on the explicit DFS stack: its dependencies, the next one to
/// explore, and the deepest chain found below it so far.
struct DepthFrame<'a> {
    id: &'a str,
    pending: Vec<&'a str>,
    cursor: usize,
    depth: usize,
}

impl<'a> DepthFrame<'a> {
    fn new(id: &'a str, pending: Vec<&'a str>) -> Self {
        Self {
            id,
            pending,
            cursor: 0,
            depth: 0,
        }
    }
}

/// Read-only graph algorithms. Every query recomputes from the current store.
pub struct GraphAnalyzer<'a> {
    store: &'a GraphStore,
    diagnostics: Diagnostics,
}

impl<'a> GraphAnalyzer<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// BFS over the undirected neighbor view. `[from]` when both ids are equal,
    /// empty when either id is unknown or no path exists.
    pub fn shortest_path(&self, from: &str, to: &str) -> Vec<String> {
        if !self.store.contains(from) || !self.store.contains(to) {
            return Vec::new();
        }
        if from == to {
            return vec![from.to_string()];
        }

        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue: VecDeque<&str> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for next in self.store.neighbors(current) {
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == to {
                    return Self::unwind(&parent, from, to);
                }
                queue.push_back(next);
            }
        }

        Vec::new()
    }

    fn unwind(parent: &HashMap<&str, &str>, from: &str, to: &str) -> Vec<String> {
        let mut path = vec![to.to_string()];
        let mut current = to;
        while current != from {
            match parent.get(current) {
                Some(&prev) => {
                    path.push(prev.to_string());
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Directed cycles reachable from `start` over outgoing edges of any type.
    ///
    /// Each cycle is the slice of the DFS path from the first occurrence of the
    /// revisited node through the repeat, e.g. `[a, b, c, a]`.
    pub fn find_cycles(&self, start: &str) -> Vec<Vec<String>> {
        if !self.store.contains(start) {
            return Vec::new();
        }

        let mut cycles = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut path: Vec<&str> = vec![start];
        // Per path entry: outgoing targets and the next one to explore.
        let mut frames: Vec<(Vec<&str>, usize)> = vec![(self.successors(start), 0)];

        while let Some((targets, cursor)) = frames.last_mut() {
            let Some(&next) = targets.get(*cursor) else {
                frames.pop();
                path.pop();
                continue;
            };
            *cursor += 1;

            if let Some(pos) = path.iter().position(|id| *id == next) {
                let mut cycle: Vec<String> = path[pos..].iter().map(|id| id.to_string()).collect();
                cycle.push(next.to_string());
                cycles.push(cycle);
            } else if visited.insert(next) {
                path.push(next);
                frames.push((self.successors(next), 0));
            }
        }

        cycles
    }

    /// Components with at least `threshold` neighbors, most connected first.
    /// Ties keep storage order.
    pub fn find_hubs(&self, threshold: usize) -> Vec<Hub> {
        let mut hubs: Vec<Hub> = self
            .store
            .nodes()
            .map(|node| Hub {
                id: node.id.clone(),
                neighbor_count: self.store.neighbor_count(&node.id),
            })
            .filter(|hub| hub.neighbor_count >= threshold)
            .collect();
        hubs.sort_by(|a, b| b.neighbor_count.cmp(&a.neighbor_count));
        hubs
    }

    /// Components with at most `threshold` neighbors, in storage order
    pub fn find_isolated(&self, threshold: usize) -> Vec<String> {
        self.store
            .nodes()
            .filter(|node| self.store.neighbor_count(&node.id) <= threshold)
            .map(|node| node.id.clone())
            .collect()
    }

    /// Depth of the dependsOn chain below `id`, with one path per reached dependency
    pub fn dependency_depth(&self, id: &str) -> DependencyDepth {
        let mut result = DependencyDepth::default();
        let Some(start) = self.store.node(id) else {
            return result;
        };
        let start = start.id.as_str();

        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut on_path: HashSet<&str> = HashSet::from([start]);
        let mut path = vec![start];
        let mut frames = vec![DepthFrame::new(start, self.depends_on(start))];

        while let Some(frame) = frames.last_mut() {
            if let Some(&dependency) = frame.pending.get(frame.cursor) {
                frame.cursor += 1;
                if on_path.contains(dependency) {
                    self.warn_cycle("dependency depth", &path, dependency);
                    continue;
                }
                if !visited.insert(dependency) {
                    continue;
                }

                path.push(dependency);
                on_path.insert(dependency);
                result.paths.insert(
                    dependency.to_string(),
                    path.iter().map(|id| id.to_string()).collect(),
                );
                frames.push(DepthFrame::new(dependency, self.depends_on(dependency)));
                continue;
            }

            // Every dependency of the top frame is explored: fold its depth upwards.
            let Some(finished) = frames.pop() else { break };
            path.pop();
            on_path.remove(finished.id);
            match frames.last_mut() {
                Some(parent) => parent.depth = parent.depth.max(finished.depth + 1),
                None => result.max_depth = finished.depth,
            }
        }

        result
    }

    /// Dependencies shared by every id in `ids`, in the order of the first id's list
    pub fn common_dependencies(&self, ids: &[&str]) -> Vec<String> {
        let Some((first, rest)) = ids.split_first() else {
            return Vec::new();
        };

        let others: Vec<HashSet<&str>> = rest
            .iter()
            .map(|id| self.depends_on(id).into_iter().collect())
            .collect();

        self.depends_on(first)
            .into_iter()
            .filter(|dep| others.iter().all(|set| set.contains(dep)))
            .map(str::to_string)
            .collect()
    }

    /// Every component ordered so that its dependencies come first.
    ///
    /// A dependency cycle is reported as a warning and the closing edge is
    /// skipped; the order still covers every component.
    pub fn topological_order(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.store.node_count());
        let mut done: HashSet<&str> = HashSet::new();

        for node in self.store.nodes() {
            let root = node.id.as_str();
            if done.contains(root) {
                continue;
            }

            let mut path = vec![root];
            let mut on_path: HashSet<&str> = HashSet::from([root]);
            let mut frames = vec![DepthFrame::new(root, self.depends_on(root))];

            while let Some(frame) = frames.last_mut() {
                if let Some(&dependency) = frame.pending.get(frame.cursor) {
                    frame.cursor += 1;
                    if on_path.contains(dependency) {
                        self.warn_cycle("topological order", &path, dependency);
                    } else if !done.contains(dependency) {
                        path.push(dependency);
                        on_path.insert(dependency);
                        frames.push(DepthFrame::new(dependency, self.depends_on(dependency)));
                    }
                    continue;
                }

                let Some(finished) = frames.pop() else { break };
                path.pop();
                on_path.remove(finished.id);
                if done.insert(finished.id) {
                    order.push(finished.id.to_string());
                }
            }
        }

        order
    }

    /// Distinct sources of inbound prop/state/context edges
    fn depends_on(&self, id: &str) -> Vec<&'a str> {
        let mut deps: Vec<&'a str> = Vec::new();
        for edge in self.store.in_edges(id) {
            if edge.kind.is_dependency() && edge.source != id && !deps.contains(&edge.source.as_str())
            {
                deps.push(edge.source.as_str());
            }
        }
        deps
    }

    /// Distinct targets of outgoing edges of any type
    fn successors(&self, id: &str) -> Vec<&'a str> {
        let mut targets: Vec<&'a str> = Vec::new();
        for edge in self.store.out_edges(id) {
            if !targets.contains(&edge.target.as_str()) {
                targets.push(edge.target.as_str());
            }
        }
        targets
    }

    fn warn_cycle(&self, context: &str, path: &[&str], repeat: &str) {
        let start = path.iter().position(|id| *id == repeat).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
        cycle.push(repeat.to_string());
        self.diagnostics.report_error(&GraphError::Cycle {
            context: context.to_string(),
            path: cycle,
        });
    }
}
