use anyhow::{Context, Result};
use geo::{Geometry, Point, Polygon};
use geomatica_algorithms::vector::{
    area, coords_list, samples, to_svg, to_wkt, GeometryAttributes, TopologyGraph, TopologyParams,
};
use std::path::Path;
use tracing::info;

use crate::{ensure_dir, section};

pub fn run(output: &Path) -> Result<()> {
    ensure_dir(output)?;

    section("Basic and complex geometries");
    for (label, geom) in samples::gallery() {
        println!();
        println!("[{}] {}", label, to_wkt(&geom));
        println!("{}", GeometryAttributes::of(&geom));

        let path = output.join(format!("{}.svg", label));
        std::fs::write(&path, to_svg(&geom))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("SVG preview: {}", path.display());
    }

    section("Practical example: polygon area");
    let practice = samples::practice_polygon();
    println!("Coordinates: {}", coords_list(&practice.exterior().0));
    println!("Area: {}", area(&Geometry::Polygon(practice)));

    section("Polygon with a hole");
    let holed = samples::polygon_with_hole();
    let outer = Polygon::new(holed.exterior().clone(), vec![]);
    println!("Outer area: {}", area(&Geometry::Polygon(outer)));
    println!("Net area: {}", area(&Geometry::Polygon(holed)));

    topology()
}

fn topology() -> Result<()> {
    section("Topology: road network");
    let nodes = samples::network_nodes();
    let arcs = samples::network_arcs();
    let (graph, report) = TopologyGraph::build(&nodes, &arcs, &TopologyParams::default())
        .context("Failed to build topology graph")?;

    println!("Nodes: {}", graph.node_count());
    println!("Arcs: {} of {}", report.arcs_added, arcs.len());
    for arc in &report.unmatched {
        println!(
            "  Not connected: {} (start on a node: {}, end on a node: {})",
            arc.name, arc.start_matched, arc.end_matched
        );
    }
    for (from, to, arc) in graph.arcs() {
        println!("  {} -- {}  [{}] length {:.3}", from, to, arc.name, arc.length);
    }

    match graph.shortest_path("A", "E").context("Shortest path query failed")? {
        Some(route) => {
            println!();
            println!("Shortest path A -> E: {}", route.nodes.join(" -> "));
            println!("  via arcs: {}", route.arcs.join(", "));
            println!("  length: {:.3}", route.length);
        }
        None => println!("No path between A and E"),
    }

    println!();
    println!("Cycle basis:");
    for cycle in graph.cycle_basis() {
        println!("  {}", cycle.join(" -> "));
    }

    // Geometric proximity and graph adjacency need not agree
    let query = Point::new(1.0, 1.5);
    if let Some((name, dist)) = graph.nearest_node(query) {
        println!();
        println!("Nearest node to ({}, {}): {} at {:.3}", query.x(), query.y(), name, dist);
        let adjacent = graph.neighbors(name).context("Neighbor query failed")?;
        println!("Nodes connected to {}: {}", name, adjacent.join(", "));
    }
    Ok(())
}
