use log::debug;

use super::sessions_model::ResolvedSessionMap;

/// Drop every resolved session missing an open or a close.
///
/// Dropped instruments are recorded in [`ResolvedSessionMap::incomplete`].
pub fn clean(mut map: ResolvedSessionMap) -> ResolvedSessionMap {
    let dropped = map.take_incomplete();
    if !dropped.is_empty() {
        debug!(
            "Dropped {} incomplete sessions for {}: {:?}",
            dropped.len(),
            map.target_date,
            dropped
        );
    }
    map
}
