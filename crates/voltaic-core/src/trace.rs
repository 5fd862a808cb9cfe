//! Connectivity tracing: loop validation and shortest logical paths.

use std::collections::HashSet;

use crate::ids::{ComponentId, WireId};
use crate::network::Network;

impl Network {
    /// Depth-first search from `from` to `target`.
    ///
    /// Follows outbound wires, and inbound wires as well when `directed` is
    /// false. A wire is never reused within one branch of the search, but a
    /// sibling branch may walk it again. Edges into the inactive branch of a
    /// two-way switch are skipped. With `check_passable`, blown components
    /// and components holding their own circuit open stop the search.
    ///
    /// Returns the fewest-hop path as the list of components from `from` up
    /// to, but excluding, `target`. `trace(head, head, ..)` therefore finds a
    /// closed loop through the head.
    pub fn trace(
        &self,
        from: ComponentId,
        target: ComponentId,
        check_passable: bool,
        directed: bool,
    ) -> Option<Vec<ComponentId>> {
        self.trace_step(from, target, check_passable, directed, 0, &[])
    }

    fn trace_step(
        &self,
        at: ComponentId,
        target: ComponentId,
        check_passable: bool,
        directed: bool,
        depth: usize,
        scanned: &[WireId],
    ) -> Option<Vec<ComponentId>> {
        if at == target && depth > 0 {
            return Some(Vec::new());
        }
        let component = self.component(at)?;
        if check_passable && !self.is_passable(at) {
            return None;
        }

        let outbound = component
            .outputs
            .iter()
            .filter_map(|&id| self.wires.get(&id).map(|w| (id, w.output)));
        let inbound = component
            .inputs
            .iter()
            .filter(|_| !directed)
            .filter_map(|&id| self.wires.get(&id).map(|w| (id, w.input)));

        let mut best: Option<Vec<ComponentId>> = None;
        for (wire, next) in outbound.chain(inbound) {
            if scanned.contains(&wire) || self.in_inactive_branch(next) {
                continue;
            }
            let mut branch = scanned.to_vec();
            branch.push(wire);

            let Some(path) =
                self.trace_step(next, target, check_passable, directed, depth + 1, &branch)
            else {
                continue;
            };
            if best.as_ref().is_none_or(|b| path.len() < b.len()) {
                best = Some(path);
            }
        }

        best.map(|mut path| {
            path.insert(0, at);
            path
        })
    }

    fn in_inactive_branch(&self, id: ComponentId) -> bool {
        self.component(id)
            .and_then(|c| self.circuit(c.circuit))
            .is_some_and(|c| c.is_inactive_branch())
    }

    /// Follow outbound wires only. Returns the first path found, not
    /// necessarily the shortest; each component is visited at most once.
    pub fn trace_forward(&self, from: ComponentId, target: ComponentId) -> Option<Vec<ComponentId>> {
        let mut visited = HashSet::new();
        self.walk(from, target, &mut visited, true)
    }

    /// Follow inbound wires only, with the same guarantees as
    /// [`trace_forward`](Self::trace_forward).
    pub fn trace_backward(&self, from: ComponentId, target: ComponentId) -> Option<Vec<ComponentId>> {
        let mut visited = HashSet::new();
        self.walk(from, target, &mut visited, false)
    }

    fn walk(
        &self,
        at: ComponentId,
        target: ComponentId,
        visited: &mut HashSet<ComponentId>,
        forward: bool,
    ) -> Option<Vec<ComponentId>> {
        if at == target && !visited.is_empty() {
            return Some(Vec::new());
        }
        if !visited.insert(at) {
            return None;
        }
        let component = self.component(at)?;
        let edges = if forward {
            &component.outputs
        } else {
            &component.inputs
        };

        for wire in edges.iter().filter_map(|id| self.wires.get(id)) {
            let next = if forward { wire.output } else { wire.input };
            if let Some(mut path) = self.walk(next, target, visited, forward) {
                path.insert(0, at);
                return Some(path);
            }
        }
        None
    }

    /// Components in flow order: a pre-order walk along outbound wires from
    /// the head, followed by everything the walk did not reach, in registry
    /// order.
    pub fn flow_order(&self) -> Vec<ComponentId> {
        let mut order = Vec::with_capacity(self.components.len());
        let mut seen = HashSet::new();

        if let Some(head) = self.find_head() {
            let mut stack = vec![head];
            while let Some(id) = stack.pop() {
                if !seen.insert(id) {
                    continue;
                }
                order.push(id);
                let Some(component) = self.component(id) else {
                    continue;
                };
                for wire in component.outputs.iter().rev() {
                    if let Some(wire) = self.wires.get(wire) {
                        stack.push(wire.output);
                    }
                }
            }
        }

        order.extend(self.components.keys().filter(|id| !seen.contains(*id)));
        order
    }
}
