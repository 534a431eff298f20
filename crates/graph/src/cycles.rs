//! Cycle detection
//!
//! Strongly connected components via an iterative Tarjan's algorithm.
//! Papers that mutually cover each other's prerequisites end up in the
//! same component; any component with more than one paper is a cycle.

use crate::graph::DependencyGraph;

/// Tarjan's algorithm state for SCC detection
struct TarjanState {
    /// Next DFS index
    index: usize,
    /// DFS index per node, `None` until visited
    indices: Vec<Option<usize>>,
    /// Lowlink per node
    lowlinks: Vec<usize>,
    /// Nodes on the current component stack
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    /// Finished components
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(node_count: usize) -> Self {
        Self {
            index: 0,
            indices: vec![None; node_count],
            lowlinks: vec![0; node_count],
            stack: Vec::with_capacity(node_count),
            on_stack: vec![false; node_count],
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) {
        self.indices[v] = Some(self.index);
        self.lowlinks[v] = self.index;
        self.index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }
}

/// Strongly connected components of the graph, as node positions.
///
/// Members of each component are sorted by insertion position and the
/// components are ordered by their first member.
fn strongly_connected_components(graph: &DependencyGraph) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut state = TarjanState::new(n);

    for start in 0..n {
        if state.indices[start].is_some() {
            continue;
        }

        // (node, successor list, next successor to look at)
        let mut work: Vec<(usize, Vec<usize>, usize)> = Vec::new();
        state.visit(start);
        work.push((start, graph.successors(start).collect(), 0));

        while let Some((v, successors, next)) = work.last_mut() {
            let v = *v;
            if *next < successors.len() {
                let w = successors[*next];
                *next += 1;

                match state.indices[w] {
                    None => {
                        state.visit(w);
                        work.push((w, graph.successors(w).collect(), 0));
                    }
                    Some(w_index) if state.on_stack[w] => {
                        state.lowlinks[v] = state.lowlinks[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some((parent, _, _)) = work.last() {
                let parent = *parent;
                state.lowlinks[parent] = state.lowlinks[parent].min(state.lowlinks[v]);
            }

            if Some(state.lowlinks[v]) == state.indices[v] {
                let mut component = Vec::new();
                while let Some(w) = state.stack.pop() {
                    state.on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_unstable();
                state.components.push(component);
            }
        }
    }

    let mut components = state.components;
    components.sort_by_key(|c| c[0]);
    components
}

/// Groups of papers that depend on each other in a cycle.
///
/// Each group lists paper ids in batch order; groups are ordered by their
/// first paper. Empty for an acyclic graph.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    strongly_connected_components(graph)
        .into_iter()
        .filter(|c| c.len() > 1)
        .map(|c| c.into_iter().map(|v| graph.id_at(v).to_string()).collect())
        .collect()
}
