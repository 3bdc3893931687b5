use hashbrown::HashMap;

use crate::graph::VertexId;

/// An ordered walk from source to destination, or the explicit marker that no
/// such walk exists. Unreachable is a normal outcome, not an error.
#[derive(Debug, PartialEq)]
pub enum Route {
    Path(Vec<VertexId>),
    Unreachable,
}

/// Walks `pred` backward from `destination` to `source` and reverses the
/// chain. A `None` (or missing) predecessor before reaching the source means
/// the destination is unreachable; "no predecessor" is an explicit value, so
/// vertex id 0 stays a legal id.
pub fn reconstruct_path(
    pred: &HashMap<VertexId, Option<VertexId>>,
    source: VertexId,
    destination: VertexId,
) -> Route {
    if destination == source {
        return Route::Path(vec![source]);
    }

    let mut chain = vec![destination];
    let mut current = destination;
    while current != source {
        match pred.get(&current).copied().flatten() {
            Some(p) => {
                chain.push(p);
                current = p;
            }
            None => return Route::Unreachable,
        }
    }
    chain.reverse();
    Route::Path(chain)
}
