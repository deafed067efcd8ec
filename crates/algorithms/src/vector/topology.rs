//! Node/arc graph for topological queries
//!
//! Nodes are named points; each arc joins the nodes sitting on its first and
//! last coordinates and weighs its own length. Arcs whose ends do not land on
//! a node are left out and listed in the [`BuildReport`].

use super::measurements::length;
use geo::{Coord, Geometry, Point};
use geomatica_core::{Error, FeatureCollection, Result};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Options for matching arc ends to nodes
#[derive(Debug, Clone, Default)]
pub struct TopologyParams {
    /// Largest distance between an arc end and its node. 0 demands exact equality.
    pub snap_tolerance: f64,
}

/// A named point of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub point: Point<f64>,
}

/// A named, weighted connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub name: String,
    pub length: f64,
}

/// An arc that could not be attached to the graph
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedArc {
    pub name: String,
    /// First and last coordinates, `None` if the feature is not a line
    pub ends: Option<(Coord<f64>, Coord<f64>)>,
    pub start_matched: bool,
    pub end_matched: bool,
}

/// Outcome of a graph build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub arcs_added: usize,
    pub unmatched: Vec<UnmatchedArc>,
    /// Node features skipped because their geometry is not a point
    pub skipped_nodes: Vec<String>,
}

/// Path found by [`TopologyGraph::shortest_path`]
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<String>,
    pub arcs: Vec<String>,
    pub length: f64,
}

/// Undirected weighted graph of named nodes and arcs
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    graph: UnGraph<Node, Arc>,
    by_name: HashMap<String, NodeIndex>,
}

fn feature_name(name: Option<&str>, fallback: &str, i: usize) -> String {
    name.map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", fallback, i))
}

impl TopologyGraph {
    /// Build the graph from point `nodes` and line `arcs`.
    pub fn build(
        nodes: &FeatureCollection,
        arcs: &FeatureCollection,
        params: &TopologyParams,
    ) -> Result<(Self, BuildReport)> {
        let tol = params.snap_tolerance;
        if !(tol >= 0.0 && tol.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "snap_tolerance",
                value: tol.to_string(),
                reason: "must be a finite, non-negative distance".into(),
            });
        }

        let mut graph = UnGraph::new_undirected();
        let mut by_name = HashMap::new();
        let mut report = BuildReport::default();

        for (i, feature) in nodes.iter().enumerate() {
            let name = feature_name(feature.name(), "node", i);
            let Some(point) = feature.point() else {
                warn!(node = %name, "node geometry is not a point, skipped");
                report.skipped_nodes.push(name);
                continue;
            };
            if by_name.contains_key(&name) {
                return Err(Error::InvalidParameter {
                    name: "nodes",
                    value: name,
                    reason: "node names must be unique".into(),
                });
            }
            let idx = graph.add_node(Node {
                name: name.clone(),
                point,
            });
            by_name.insert(name, idx);
        }

        let mut topo = Self { graph, by_name };

        for (i, feature) in arcs.iter().enumerate() {
            let name = feature_name(feature.name(), "arc", i);
            let line = feature.line_string();
            let ends = line.and_then(|l| Some((*l.0.first()?, *l.0.last()?)));

            let matched = ends.map(|(a, b)| (topo.match_node(a, tol), topo.match_node(b, tol)));
            match (line, matched) {
                (Some(line), Some((Some(u), Some(v)))) => {
                    let arc_length = length(&Geometry::LineString(line.clone()));
                    debug!(arc = %name, length = arc_length, "arc added");
                    topo.graph.add_edge(
                        u,
                        v,
                        Arc {
                            name,
                            length: arc_length,
                        },
                    );
                    report.arcs_added += 1;
                }
                (_, matched) => {
                    let (start_matched, end_matched) = matched
                        .map(|(u, v)| (u.is_some(), v.is_some()))
                        .unwrap_or((false, false));
                    warn!(
                        arc = %name,
                        start_matched,
                        end_matched,
                        "arc endpoints do not match any node, arc left out of the graph"
                    );
                    report.unmatched.push(UnmatchedArc {
                        name,
                        ends,
                        start_matched,
                        end_matched,
                    });
                }
            }
        }

        Ok((topo, report))
    }

    /// Node at `c`: exact equality when `tol` is 0, otherwise the nearest within `tol`
    fn match_node(&self, c: Coord<f64>, tol: f64) -> Option<NodeIndex> {
        if tol == 0.0 {
            return self
                .graph
                .node_indices()
                .find(|&i| self.graph[i].point.0 == c);
        }
        self.graph
            .node_indices()
            .map(|i| (i, distance(self.graph[i].point.0, c)))
            .filter(|&(_, d)| d <= tol)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&i| &self.graph[i])
    }

    fn index(&self, name: &str) -> Result<NodeIndex> {
        self.by_name.get(name).copied().ok_or_else(|| Error::InvalidParameter {
            name: "node",
            value: name.to_string(),
            reason: "no node with this name".into(),
        })
    }

    /// Minimum-weight path between two named nodes; `Ok(None)` if they are disconnected.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Option<Route>> {
        let start = self.index(from)?;
        let goal = self.index(to)?;

        let found = astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| e.weight().length,
            |_| 0.0,
        );

        Ok(found.map(|(total, path)| {
            let arcs = path
                .windows(2)
                .filter_map(|pair| {
                    self.graph
                        .edges_connecting(pair[0], pair[1])
                        .min_by(|a, b| a.weight().length.total_cmp(&b.weight().length))
                        .map(|e| e.weight().name.clone())
                })
                .collect();
            Route {
                nodes: path.iter().map(|&i| self.graph[i].name.clone()).collect(),
                arcs,
                length: total,
            }
        }))
    }

    /// Independent cycles of the graph, each as a list of node names.
    ///
    /// Spanning-tree construction as in Paton (1969); the number of cycles is
    /// `edges - nodes + components` for a graph without parallel arcs.
    pub fn cycle_basis(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<NodeIndex>> = Vec::new();
        let mut remaining: BTreeSet<NodeIndex> = self.graph.node_indices().collect();

        while let Some(root) = remaining.pop_first() {
            let mut stack = vec![root];
            let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::from([(root, root)]);
            let mut used: HashMap<NodeIndex, BTreeSet<NodeIndex>> =
                HashMap::from([(root, BTreeSet::new())]);

            while let Some(z) = stack.pop() {
                let neighbours: BTreeSet<NodeIndex> = self.graph.neighbors(z).collect();
                for nbr in neighbours {
                    if !used.contains_key(&nbr) {
                        pred.insert(nbr, z);
                        stack.push(nbr);
                        used.insert(nbr, BTreeSet::from([z]));
                    } else if nbr == z {
                        cycles.push(vec![z]);
                    } else if !used[&z].contains(&nbr) {
                        let pn = &used[&nbr];
                        let mut cycle = vec![nbr, z];
                        let mut p = pred[&z];
                        while !pn.contains(&p) {
                            cycle.push(p);
                            p = pred[&p];
                        }
                        cycle.push(p);
                        cycles.push(cycle);
                        if let Some(set) = used.get_mut(&nbr) {
                            set.insert(z);
                        }
                    }
                }
            }

            for visited in pred.keys() {
                remaining.remove(visited);
            }
        }

        cycles
            .into_iter()
            .map(|c| c.into_iter().map(|i| self.graph[i].name.clone()).collect())
            .collect()
    }

    /// Names of the nodes sharing an arc with `name`
    pub fn neighbors(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.index(name)?;
        let unique: BTreeSet<NodeIndex> = self.graph.neighbors(idx).collect();
        Ok(unique.into_iter().map(|i| self.graph[i].name.clone()).collect())
    }

    /// Geometrically closest node to `p` and its distance
    pub fn nearest_node(&self, p: Point<f64>) -> Option<(&str, f64)> {
        self.graph
            .node_indices()
            .map(|i| (self.graph[i].name.as_str(), distance(self.graph[i].point.0, p.0)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Arcs as (from, to, arc) triples in insertion order
    pub fn arcs(&self) -> impl Iterator<Item = (&str, &str, &Arc)> + '_ {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].name.as_str(),
                self.graph[e.target()].name.as_str(),
                e.weight(),
            )
        })
    }
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
