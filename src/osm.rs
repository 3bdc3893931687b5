use std::fs::File;

use anyhow::{Context, Result};
use fnv::FnvHashMap;
use osmpbfreader::{OsmObj, OsmPbfReader, Tags};
use std::collections::HashSet;

use crate::geo::Coordinates;
use crate::graph::VertexId;

/// One walkable path: an ordered run of node ids whose consecutive pairs
/// become graph edges.
#[derive(Clone, Debug)]
pub struct Footway {
    pub id: i64,
    pub nodes: Vec<VertexId>,
}

#[derive(Clone, Debug)]
pub struct Building {
    pub full_name: String,
    pub abbrev: Option<String>,
    pub coords: Coordinates,
}

pub struct CampusMap {
    pub coords: FnvHashMap<VertexId, Coordinates>,
    pub footways: Vec<Footway>,
    pub buildings: Vec<Building>,
}

impl CampusMap {
    /// Routable nearest-vertex candidates: every node of every footway, in
    /// footway order, paired with its position. Nodes shared between footways
    /// show up once per footway.
    pub fn footway_nodes(&self) -> impl Iterator<Item = (VertexId, Coordinates)> + '_ {
        self.footways
            .iter()
            .flat_map(|f| f.nodes.iter())
            .filter_map(|nid| self.coords.get(nid).map(|&c| (*nid, c)))
    }
}

fn is_footway(tags: &Tags, only_footways: bool) -> bool {
    let Some(highway) = tags.get("highway") else {
        return false;
    };
    // Exclude areas and non-linear ways
    if tags.get("area").map(|v| v == "yes").unwrap_or(false) {
        return false;
    }
    if tags.get("foot").map(|v| v == "no").unwrap_or(false) {
        return false;
    }
    if only_footways {
        matches!(highway.as_str(), "footway" | "path" | "pedestrian" | "steps")
    } else {
        true
    }
}

fn is_named_building(tags: &Tags) -> bool {
    tags.contains_key("building") && tags.contains_key("name")
}

fn building_from_tags(tags: &Tags, coords: Coordinates) -> Building {
    Building {
        full_name: tags.get("name").map(|v| v.to_string()).unwrap_or_default(),
        abbrev: tags.get("short_name").map(|v| v.to_string()),
        coords,
    }
}

/// Loads nodes, footways and named buildings from an `.osm.pbf` in two
/// passes: ways first to learn which node ids matter, then node coordinates.
pub fn load_campus_map(path: &str, only_footways: bool) -> Result<CampusMap> {
    // Pass 1: footways and building ways, plus the node ids they reference
    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    let mut pbf = OsmPbfReader::new(file);

    let mut needed_nodes: HashSet<VertexId> = HashSet::new();
    let mut footways: Vec<Footway> = Vec::new();
    let mut building_ways: Vec<(Tags, Vec<VertexId>)> = Vec::new();

    for obj in pbf.iter() {
        let obj = obj?;
        if let OsmObj::Way(w) = obj {
            let node_ids: Vec<VertexId> = w.nodes.iter().map(|n| n.0).collect();
            if is_footway(&w.tags, only_footways) {
                needed_nodes.extend(&node_ids);
                footways.push(Footway { id: w.id.0, nodes: node_ids });
            } else if is_named_building(&w.tags) {
                needed_nodes.extend(&node_ids);
                building_ways.push((w.tags.clone(), node_ids));
            }
        }
    }

    // Pass 2: coordinates for needed nodes, and buildings mapped as nodes
    let file2 = File::open(path).with_context(|| format!("reopening {}", path))?;
    let mut pbf2 = OsmPbfReader::new(file2);

    let mut coords: FnvHashMap<VertexId, Coordinates> = FnvHashMap::default();
    let mut buildings: Vec<Building> = Vec::new();

    for obj in pbf2.iter() {
        let obj = obj?;
        if let OsmObj::Node(n) = obj {
            let pos = Coordinates { lat: n.lat(), lon: n.lon() };
            if needed_nodes.contains(&n.id.0) {
                coords.insert(n.id.0, pos);
            }
            if is_named_building(&n.tags) {
                buildings.push(building_from_tags(&n.tags, pos));
            }
        }
    }

    // Building ways get the centroid of their member nodes as an anchor
    for (tags, node_ids) in building_ways {
        let positions: Vec<Coordinates> =
            node_ids.iter().filter_map(|nid| coords.get(nid).copied()).collect();
        if positions.is_empty() {
            continue;
        }
        let n = positions.len() as f64;
        let centroid = Coordinates {
            lat: positions.iter().map(|c| c.lat).sum::<f64>() / n,
            lon: positions.iter().map(|c| c.lon).sum::<f64>() / n,
        };
        buildings.push(building_from_tags(&tags, centroid));
    }

    Ok(CampusMap { coords, footways, buildings })
}

/// Resolves a user-typed building query in two phases: an exact abbreviation
/// match wins outright, otherwise the first building whose full name contains
/// the query as a substring.
pub fn find_building<'a>(buildings: &'a [Building], query: &str) -> Option<&'a Building> {
    if let Some(b) = buildings
        .iter()
        .find(|b| b.abbrev.as_deref() == Some(query))
    {
        return Some(b);
    }
    buildings.iter().find(|b| b.full_name.contains(query))
}
