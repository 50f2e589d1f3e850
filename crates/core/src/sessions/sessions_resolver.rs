//! Trading-date resolution.
//!
//! Sessions are inferred empirically from whatever bars the provider returned
//! in the window around the target date; there is no holiday calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crosslist_market_data::{InstrumentId, Session};

use super::sessions_model::{
    Direction, ReferencePair, ResolutionRequest, ResolvedSession, ResolvedSessionMap,
};
use crate::config::IncompleteSessionPolicy;

/// Fetched session windows keyed by instrument.
pub type SessionWindows = BTreeMap<InstrumentId, Vec<Session>>;

/// Pick the session closest to `target` on the admitted side of it.
///
/// Returns `None` when no session satisfies the direction; that is the normal
/// "no session in window" outcome. With duplicate dates the first one in
/// `sessions` order wins.
pub fn resolve_nearest(
    sessions: &[Session],
    target: NaiveDate,
    direction: Direction,
) -> Option<&Session> {
    nearest_of(sessions.iter(), target, direction)
}

fn nearest_of<'a>(
    candidates: impl Iterator<Item = &'a Session>,
    target: NaiveDate,
    direction: Direction,
) -> Option<&'a Session> {
    candidates
        .filter(|s| direction.admits(s.date, target))
        .reduce(|best, s| {
            if direction.is_closer(s.date, best.date) {
                s
            } else {
                best
            }
        })
}

fn resolve_with_policy(
    window: &[Session],
    target: NaiveDate,
    direction: Direction,
    policy: IncompleteSessionPolicy,
) -> Option<&Session> {
    let candidates = window.iter().filter(|s| match policy {
        IncompleteSessionPolicy::ExcludeInstrument => true,
        IncompleteSessionPolicy::SkipSession => s.is_complete(),
    });
    nearest_of(candidates, target, direction)
}

fn window_for<'a>(windows: &'a SessionWindows, instrument: &InstrumentId) -> &'a [Session] {
    windows.get(instrument).map(Vec::as_slice).unwrap_or(&[])
}

/// Resolve a session for every instrument of the universe on one target date.
///
/// Each instrument is resolved independently in the requested direction. If
/// the reference pair belongs to the universe and either listing came back
/// empty or without both prices, the pair alone is resolved once more in the
/// opposite direction over complete sessions only; the retry result is
/// adopted only when it yields both listings. No further
/// retries happen, so the map is final after at most two passes and may still
/// contain unresolved instruments.
pub fn resolve_universe(
    windows: &SessionWindows,
    request: &ResolutionRequest,
    reference_pair: Option<&ReferencePair>,
    policy: IncompleteSessionPolicy,
) -> ResolvedSessionMap {
    let target = request.target_date;
    let mut map = ResolvedSessionMap::new(target, request.direction);

    for instrument in &request.universe {
        match resolve_with_policy(
            window_for(windows, instrument),
            target,
            request.direction,
            policy,
        ) {
            Some(session) => {
                debug!(
                    "Resolved {} for {} ({:?}) to session {}",
                    instrument, target, request.direction, session.date
                );
                map.insert(ResolvedSession::primary(session.clone(), request.direction));
            }
            None => {
                debug!(
                    "No {:?} session for {} around {}",
                    request.direction, instrument, target
                );
                map.mark_unresolved(instrument.clone());
            }
        }
    }

    let Some(pair) = reference_pair.filter(|p| p.is_within(&request.universe)) else {
        return map;
    };
    let usable = |m: &InstrumentId| map.get(m).is_some_and(|r| r.session.is_complete());
    if pair.members().into_iter().all(usable) {
        return map;
    }

    let flipped = request.direction.flipped();
    warn!(
        "Reference pair {}/{} incomplete for {} ({:?}); retrying pair {:?}",
        pair.local, pair.foreign, target, request.direction, flipped
    );

    // A fallback reference bar without both prices is useless for the ratios
    let retry_policy = IncompleteSessionPolicy::SkipSession;
    let local = resolve_with_policy(
        window_for(windows, &pair.local),
        target,
        flipped,
        retry_policy,
    );
    let foreign = resolve_with_policy(
        window_for(windows, &pair.foreign),
        target,
        flipped,
        retry_policy,
    );

    match (local, foreign) {
        (Some(local), Some(foreign)) => {
            info!(
                "Reference pair resolved {:?} for {}: {} on {}, {} on {}",
                flipped, target, pair.local, local.date, pair.foreign, foreign.date
            );
            map.insert(ResolvedSession::fallback(local.clone(), flipped));
            map.insert(ResolvedSession::fallback(foreign.clone(), flipped));
        }
        _ => {
            warn!(
                "Reference pair {}/{} unavailable for {}; normalization will be skipped",
                pair.local, pair.foreign, target
            );
        }
    }

    map
}
