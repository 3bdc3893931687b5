use thiserror::Error;

use crate::geo::Coordinates;
use crate::graph::VertexId;

#[derive(Debug, Error, PartialEq)]
#[error("no candidate vertices to search")]
pub struct EmptyCandidates;

/// Finds the candidate vertex closest to `query` under `metric`, by linear
/// scan. Ties go to the first candidate in iteration order (strict `<`
/// improvement); duplicate candidates are revisited harmlessly.
///
/// Fails explicitly when `candidates` yields nothing, so a map without
/// footways can never hand back an unset vertex.
pub fn nearest_vertex<I, F>(
    query: Coordinates,
    candidates: I,
    metric: F,
) -> Result<VertexId, EmptyCandidates>
where
    I: IntoIterator<Item = (VertexId, Coordinates)>,
    F: Fn(Coordinates, Coordinates) -> f64,
{
    let mut best: Option<(VertexId, f64)> = None;
    for (id, pos) in candidates {
        let d = metric(query, pos);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((id, d)),
        }
    }
    best.map(|(id, _)| id).ok_or(EmptyCandidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_meters;

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates { lat, lon }
    }

    #[test]
    fn empty_candidate_set_fails() {
        let got = nearest_vertex(at(41.87, -87.65), std::iter::empty(), haversine_meters);
        assert_eq!(got, Err(EmptyCandidates));
    }

    #[test]
    fn picks_the_closest_candidate() {
        let candidates = vec![
            (10, at(41.880, -87.650)),
            (11, at(41.871, -87.650)),
            (12, at(41.900, -87.650)),
        ];
        let got = nearest_vertex(at(41.870, -87.650), candidates, haversine_meters);
        assert_eq!(got, Ok(11));
    }

    #[test]
    fn exact_tie_goes_to_the_first_in_iteration_order() {
        let p = at(41.871, -87.649);
        let candidates = vec![(5, p), (3, p), (9, p)];
        let got = nearest_vertex(p, candidates, haversine_meters);
        assert_eq!(got, Ok(5));
    }

    #[test]
    fn duplicates_do_not_change_the_answer() {
        let near = at(41.8701, -87.6500);
        let far = at(41.8800, -87.6500);
        let candidates = vec![(1, far), (2, near), (1, far), (2, near)];
        let got = nearest_vertex(at(41.8700, -87.6500), candidates, haversine_meters);
        assert_eq!(got, Ok(2));
    }
}
