use std::io::{self, BufRead, Write as _};

use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;

mod dijkstra;
mod geo;
mod graph;
mod nearest;
mod osm;
mod route;

use geo::haversine_meters;
use graph::Graph;
use osm::{find_building, CampusMap};
use route::Route;

#[derive(Parser, Debug)]
#[command(name = "campusnav")]
#[command(about = "Build a walking graph from an OSM .pbf and answer shortest-route queries between buildings.", long_about = None)]
struct Cli {
    /// Path to the .osm.pbf file
    #[arg(short, long)]
    pbf: String,

    /// Only include dedicated pedestrian ways (recommended). If false, any
    /// highway not closed to foot traffic is routable.
    #[arg(long, default_value_t = true)]
    only_footways: bool,

    /// Output CSV (node_id, lat, lon, cumulative_m) for each found route.
    /// Overwritten per query.
    #[arg(short, long)]
    out: Option<String>,
}

/// Every map node becomes a vertex; each consecutive footway node pair
/// becomes a pair of directed edges weighted by great-circle distance.
fn build_graph(map: &CampusMap) -> Result<Graph> {
    let mut g = Graph::new();
    for (&nid, _) in map.coords.iter() {
        g.add_vertex(nid)?;
    }
    for footway in &map.footways {
        for pair in footway.nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (&ca, &cb) = match (map.coords.get(&a), map.coords.get(&b)) {
                (Some(ca), Some(cb)) => (ca, cb),
                _ => continue,
            };
            let weight = haversine_meters(ca, cb);
            g.add_edge(a, b, weight)?;
            g.add_edge(b, a, weight)?;
        }
    }
    Ok(g)
}

fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

fn write_route_csv(path: &str, map: &CampusMap, path_nodes: &[graph::VertexId]) -> Result<()> {
    let mut wtr = Writer::from_path(path).with_context(|| format!("creating CSV {}", path))?;
    wtr.write_record(["node_id", "lat", "lon", "cumulative_m"])?;
    let mut cumulative = 0.0_f64;
    let mut previous: Option<geo::Coordinates> = None;
    for nid in path_nodes {
        let pos = map.coords[nid];
        if let Some(prev) = previous {
            cumulative += haversine_meters(prev, pos);
        }
        previous = Some(pos);
        wtr.write_record(&[
            nid.to_string(),
            format!("{:.7}", pos.lat),
            format!("{:.7}", pos.lon),
            format!("{:.2}", cumulative),
        ])?;
    }
    wtr.flush()?;
    println!("Wrote {} waypoints to {}", path_nodes.len(), path);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("** Navigating campus open street map **");
    println!();

    let map = osm::load_campus_map(&cli.pbf, cli.only_footways)?;
    let graph = build_graph(&map)?;

    println!("# of nodes: {}", map.coords.len());
    println!("# of footways: {}", map.footways.len());
    println!("# of buildings: {}", map.buildings.len());
    println!("# of vertices: {}", graph.vertex_count());
    println!("# of edges: {}", graph.edge_count());
    println!();

    loop {
        let Some(start_query) = prompt("Enter start (partial name or abbreviation), or #> ")?
        else {
            break;
        };
        if start_query == "#" {
            break;
        }
        let Some(dest_query) = prompt("Enter destination (partial name or abbreviation)> ")?
        else {
            break;
        };

        let Some(start) = find_building(&map.buildings, &start_query) else {
            println!("Start building not found");
            println!();
            continue;
        };
        let Some(dest) = find_building(&map.buildings, &dest_query) else {
            println!("Destination building not found");
            println!();
            continue;
        };

        println!("Starting point:");
        println!(" {}", start.full_name);
        println!(" ({:.7}, {:.7})", start.coords.lat, start.coords.lon);
        println!("Destination point:");
        println!(" {}", dest.full_name);
        println!(" ({:.7}, {:.7})", dest.coords.lat, dest.coords.lon);
        println!();

        let start_node = nearest::nearest_vertex(start.coords, map.footway_nodes(), haversine_meters)
            .context("map has no footway nodes to route on")?;
        let dest_node = nearest::nearest_vertex(dest.coords, map.footway_nodes(), haversine_meters)
            .context("map has no footway nodes to route on")?;

        println!("Nearest start node:");
        println!(" {}", start_node);
        println!(" ({:.7}, {:.7})", map.coords[&start_node].lat, map.coords[&start_node].lon);
        println!("Nearest destination node:");
        println!(" {}", dest_node);
        println!(" ({:.7}, {:.7})", map.coords[&dest_node].lat, map.coords[&dest_node].lon);
        println!();

        println!("Navigating with Dijkstra...");
        let sp = dijkstra::shortest_paths(&graph, start_node)?;

        match route::reconstruct_path(&sp.pred, start_node, dest_node) {
            Route::Unreachable => println!("Sorry, destination unreachable"),
            Route::Path(path_nodes) => {
                println!("Distance to destination: {:.2} meters", sp.dist[&dest_node]);
                let rendered: Vec<String> =
                    path_nodes.iter().map(|nid| nid.to_string()).collect();
                println!("Path: {}", rendered.join("->"));
                if let Some(out_path) = &cli.out {
                    write_route_csv(out_path, &map, &path_nodes)?;
                }
            }
        }
        println!();
    }

    println!("** Done **");
    Ok(())
}
