//! Session resolution domain models.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crosslist_market_data::{InstrumentId, Session};

/// Which side of the target date a resolved session may fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Closest session on or after the target date.
    Forward,
    /// Closest session on or before the target date.
    Backward,
}

impl Direction {
    /// Whether a session dated `date` may be used for `target`.
    pub fn admits(self, date: NaiveDate, target: NaiveDate) -> bool {
        match self {
            Direction::Forward => date >= target,
            Direction::Backward => date <= target,
        }
    }

    /// Whether `candidate` is strictly closer to the target than `current`,
    /// both already admitted.
    pub fn is_closer(self, candidate: NaiveDate, current: NaiveDate) -> bool {
        match self {
            Direction::Forward => candidate < current,
            Direction::Backward => candidate > current,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// The two listings of the same underlying whose price ratio acts as the
/// listing/currency conversion factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencePair {
    /// Local listing, e.g. "YPFD.BA"
    pub local: InstrumentId,
    /// Foreign listing (depositary receipt), e.g. "YPF"
    pub foreign: InstrumentId,
}

impl ReferencePair {
    pub fn new(local: impl Into<InstrumentId>, foreign: impl Into<InstrumentId>) -> Self {
        Self {
            local: local.into(),
            foreign: foreign.into(),
        }
    }

    pub fn members(&self) -> [&InstrumentId; 2] {
        [&self.local, &self.foreign]
    }

    /// Both listings belong to `universe`.
    pub fn is_within(&self, universe: &BTreeSet<InstrumentId>) -> bool {
        universe.contains(&self.local) && universe.contains(&self.foreign)
    }
}

/// Resolve one session per instrument for a single target date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub universe: BTreeSet<InstrumentId>,
    pub target_date: NaiveDate,
    pub direction: Direction,
}

/// A session chosen for an instrument on a target date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSession {
    pub session: Session,
    /// Direction that actually selected the session. Differs from the map's
    /// direction only for reference listings adopted from the fallback pass.
    pub direction: Direction,
    pub via_fallback: bool,
}

impl ResolvedSession {
    pub fn primary(session: Session, direction: Direction) -> Self {
        Self {
            session,
            direction,
            via_fallback: false,
        }
    }

    pub fn fallback(session: Session, direction: Direction) -> Self {
        Self {
            session,
            direction,
            via_fallback: true,
        }
    }

    pub fn instrument(&self) -> &InstrumentId {
        &self.session.instrument
    }

    pub fn date(&self) -> NaiveDate {
        self.session.date
    }

    pub fn open(&self) -> Option<Decimal> {
        self.session.open
    }

    pub fn close(&self) -> Option<Decimal> {
        self.session.close
    }
}

/// Per-instrument sessions resolved for one nominal target date.
///
/// Each instrument of the universe ends up in exactly one of `sessions`,
/// `unresolved` (no admissible session in the fetched window) or
/// `incomplete` (resolved session lacked a price and was cleaned out).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSessionMap {
    pub target_date: NaiveDate,
    pub direction: Direction,
    sessions: BTreeMap<InstrumentId, ResolvedSession>,
    unresolved: BTreeSet<InstrumentId>,
    incomplete: BTreeSet<InstrumentId>,
}

impl ResolvedSessionMap {
    pub fn new(target_date: NaiveDate, direction: Direction) -> Self {
        Self {
            target_date,
            direction,
            sessions: BTreeMap::new(),
            unresolved: BTreeSet::new(),
            incomplete: BTreeSet::new(),
        }
    }

    pub fn get(&self, instrument: &InstrumentId) -> Option<&ResolvedSession> {
        self.sessions.get(instrument)
    }

    pub fn contains(&self, instrument: &InstrumentId) -> bool {
        self.sessions.contains_key(instrument)
    }

    /// Present entries, ordered by instrument.
    pub fn sessions(&self) -> impl Iterator<Item = (&InstrumentId, &ResolvedSession)> {
        self.sessions.iter()
    }

    pub fn unresolved(&self) -> &BTreeSet<InstrumentId> {
        &self.unresolved
    }

    pub fn incomplete(&self) -> &BTreeSet<InstrumentId> {
        &self.incomplete
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Record a resolved session, replacing any earlier entry for the instrument.
    pub fn insert(&mut self, resolved: ResolvedSession) {
        let instrument = resolved.instrument().clone();
        self.unresolved.remove(&instrument);
        self.incomplete.remove(&instrument);
        self.sessions.insert(instrument, resolved);
    }

    pub fn mark_unresolved(&mut self, instrument: InstrumentId) {
        self.sessions.remove(&instrument);
        self.unresolved.insert(instrument);
    }

    pub(crate) fn take_incomplete(&mut self) -> Vec<InstrumentId> {
        let dropped: Vec<InstrumentId> = self
            .sessions
            .iter()
            .filter(|(_, resolved)| !resolved.session.is_complete())
            .map(|(instrument, _)| instrument.clone())
            .collect();
        for instrument in &dropped {
            self.sessions.remove(instrument);
            self.incomplete.insert(instrument.clone());
        }
        dropped
    }
}
