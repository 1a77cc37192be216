//! Service dependency graph using `petgraph`.
//!
//! Builds a directed graph from construction plans and resolves the order
//! in which services can be instantiated.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::types::Type;

use crate::plan::ServiceConstructionPlan;

/// A dependency graph of services.
#[derive(Debug, Default)]
pub struct ServiceDependencyGraph {
    graph: DiGraph<Type, ()>,
    nodes: HashMap<Type, NodeIndex>,
}

impl ServiceDependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph of `plans`.
    ///
    /// References to services without a plan are not part of the graph.
    #[must_use]
    pub fn from_plans(plans: &[ServiceConstructionPlan<'_>]) -> Self {
        let mut graph = Self::new();
        for plan in plans {
            let _ = graph.add_service(plan.service_type().clone());
        }
        for plan in plans {
            for dependency in plan.dependencies() {
                if graph.nodes.contains_key(dependency) {
                    graph.add_dependency(plan.service_type(), dependency);
                }
            }
        }
        tracing::debug!(
            services = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "built service dependency graph"
        );
        graph
    }

    /// Adds a service node, returning the existing node for known services.
    pub fn add_service(&mut self, service: Type) -> NodeIndex {
        if let Some(&index) = self.nodes.get(&service) {
            return index;
        }
        let index = self.graph.add_node(service.clone());
        let _ = self.nodes.insert(service, index);
        index
    }

    /// Records that `dependent` needs `dependency` first.
    ///
    /// The edge points from `dependency` to `dependent` so that a
    /// topological sort yields dependencies first.
    pub fn add_dependency(&mut self, dependent: &Type, dependency: &Type) {
        let to = self.add_service(dependent.clone());
        let from = self.add_service(dependency.clone());
        let _ = self.graph.update_edge(from, to, ());
    }

    /// Returns the number of services in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the graph holds no service.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns services ordered so that every dependency precedes its
    /// dependents.
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` naming the services of the first cycle
    /// found.
    pub fn resolve_order(&self) -> Result<Vec<Type>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => {
                let services = self.cycle_members(cycle.node_id());
                tracing::warn!(services = ?services, "circular service dependency");
                Err(WireplanError::CircularDependency { services })
            }
        }
    }

    fn cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let component = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&start))
            .unwrap_or_else(|| vec![start]);
        let mut services: Vec<String> = component
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).map(ToString::to_string))
            .collect();
        services.sort();
        services
    }
}

#[cfg(test)]
mod tests {
    use wireplan_definition::types::TypeFactory;

    use super::*;

    fn types(names: &[&str]) -> Vec<Type> {
        let mut factory = TypeFactory::new();
        names
            .iter()
            .map(|n| factory.class(n).expect("class"))
            .collect()
    }

    fn position(order: &[Type], ty: &Type) -> usize {
        order.iter().position(|t| t == ty).expect("present")
    }

    #[test]
    fn empty_graph_resolves_to_empty() {
        let graph = ServiceDependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.resolve_order().expect("order").is_empty());
    }

    #[test]
    fn dependencies_come_first() {
        let t = types(&["App\\Controller", "App\\Repository", "App\\Connection"]);
        let mut graph = ServiceDependencyGraph::new();
        graph.add_dependency(&t[0], &t[1]);
        graph.add_dependency(&t[1], &t[2]);

        let order = graph.resolve_order().expect("order");
        assert_eq!(order.len(), 3);
        assert!(position(&order, &t[2]) < position(&order, &t[1]));
        assert!(position(&order, &t[1]) < position(&order, &t[0]));
    }

    #[test]
    fn diamond_dependency() {
        let t = types(&["a", "b", "c", "d"]);
        let mut graph = ServiceDependencyGraph::new();
        graph.add_dependency(&t[0], &t[1]);
        graph.add_dependency(&t[0], &t[2]);
        graph.add_dependency(&t[1], &t[3]);
        graph.add_dependency(&t[2], &t[3]);
        graph.add_dependency(&t[2], &t[3]);

        let order = graph.resolve_order().expect("order");
        assert_eq!(order.len(), 4);
        assert!(position(&order, &t[3]) < position(&order, &t[1]));
        assert!(position(&order, &t[3]) < position(&order, &t[2]));
        assert!(position(&order, &t[1]) < position(&order, &t[0]));
    }

    #[test]
    fn repeated_services_share_a_node() {
        let t = types(&["App\\A"]);
        let mut graph = ServiceDependencyGraph::new();
        let first = graph.add_service(t[0].clone());
        let second = graph.add_service(t[0].clone());
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn cycle_names_its_members() {
        let t = types(&["App\\A", "App\\B", "App\\C", "App\\Leaf"]);
        let mut graph = ServiceDependencyGraph::new();
        graph.add_dependency(&t[0], &t[1]);
        graph.add_dependency(&t[1], &t[2]);
        graph.add_dependency(&t[2], &t[0]);
        graph.add_dependency(&t[0], &t[3]);

        let err = graph.resolve_order().unwrap_err();
        let WireplanError::CircularDependency { services } = &err else {
            panic!("expected circular dependency, got {err}");
        };
        assert_eq!(services, &vec!["App\\A", "App\\B", "App\\C"]);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let t = types(&["App\\Node"]);
        let mut graph = ServiceDependencyGraph::new();
        graph.add_dependency(&t[0], &t[0]);
        assert!(matches!(
            graph.resolve_order(),
            Err(WireplanError::CircularDependency { .. })
        ));
    }
}
