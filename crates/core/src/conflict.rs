//! # Conflict Engine
//!
//! Pure computations over a group's sessions and the sessions the current
//! user has already accepted. Nothing here performs I/O, keeps state, or
//! returns an error; a conflict is a successful result that carries a warning.
//!
//! Every interval is derived through [`window_for`], which is the only place
//! a missing or non-positive duration is replaced by
//! [`DEFAULT_DURATION_MINUTES`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::models::session::{DEFAULT_DURATION_MINUTES, NewSession, Session};

/// Anything with a start instant and a (possibly missing) duration.
///
/// Implemented for stored sessions and for proposals that have not been
/// created yet, so both can be checked against accepted sessions.
pub trait Scheduled {
    fn start_at(&self) -> DateTime<Utc>;
    fn duration_minutes(&self) -> Option<i64>;
}

impl Scheduled for Session {
    fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    fn duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
    }
}

impl Scheduled for NewSession {
    fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    fn duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
    }
}

/// The first overlapping (candidate, accepted) pair found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPair {
    /// Position of the candidate in the candidate list
    pub candidate_index: usize,
    /// Position of the accepted session in the accepted list
    pub accepted_index: usize,
    pub candidate_window: Interval,
    pub accepted_window: Interval,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub pair: Option<ConflictPair>,
}

impl ConflictResult {
    pub fn none() -> Self {
        Self::default()
    }

    fn found(pair: ConflictPair) -> Self {
        Self {
            has_conflict: true,
            pair: Some(pair),
        }
    }
}

fn normalized_duration(minutes: Option<i64>) -> i64 {
    match minutes {
        Some(m) if m > 0 => m,
        _ => DEFAULT_DURATION_MINUTES,
    }
}

/// Derives the half-open window `[start_at, start_at + duration)`.
///
/// A duration too large to represent runs to `DateTime::<Utc>::MAX_UTC`.
pub fn window_for<S: Scheduled + ?Sized>(session: &S) -> Interval {
    let start = session.start_at();
    let minutes = normalized_duration(session.duration_minutes());
    let end = Duration::try_minutes(minutes)
        .and_then(|duration| start.checked_add_signed(duration))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    Interval::new(start, end)
}

/// Checks candidates against the user's accepted sessions.
///
/// Candidates are walked in order and each is compared with every accepted
/// session in order. The search stops at the first overlapping pair; callers
/// show a single warning rather than a list of every clash.
pub fn compute_self_conflict<C, A>(candidates: &[C], accepted: &[A]) -> ConflictResult
where
    C: Scheduled,
    A: Scheduled,
{
    if candidates.is_empty() || accepted.is_empty() {
        return ConflictResult::none();
    }

    let accepted_windows: Vec<Interval> = accepted.iter().map(window_for).collect();

    for (candidate_index, candidate) in candidates.iter().enumerate() {
        let candidate_window = window_for(candidate);
        let hit = accepted_windows
            .iter()
            .position(|accepted_window| candidate_window.overlaps(accepted_window));

        if let Some(accepted_index) = hit {
            return ConflictResult::found(ConflictPair {
                candidate_index,
                accepted_index,
                candidate_window,
                accepted_window: accepted_windows[accepted_index],
            });
        }
    }

    ConflictResult::none()
}

/// Picks the earliest session that has not finished yet.
///
/// A session stays eligible until its computed end, so one that started ten
/// minutes ago and runs for an hour is still the soonest. Ties on `start_at`
/// go to whichever session appears first in `sessions`.
pub fn select_soonest(sessions: &[Session], now: DateTime<Utc>) -> Option<&Session> {
    sessions
        .iter()
        .filter(|session| window_for(*session).end > now)
        // `min_by_key` keeps the last minimum, so fold to keep the first.
        .fold(None, |best: Option<&Session>, session| match best {
            Some(current) if current.start_at <= session.start_at => Some(current),
            _ => Some(session),
        })
}

/// The window to ask the availability source about: that of the soonest
/// upcoming session, if there is one.
pub fn availability_window(
    sessions: &[Session],
    now: DateTime<Utc>,
) -> Option<(&Session, Interval)> {
    select_soonest(sessions, now).map(|session| (session, window_for(session)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn normalizes_non_positive_durations() {
        assert_eq!(normalized_duration(None), 60);
        assert_eq!(normalized_duration(Some(0)), 60);
        assert_eq!(normalized_duration(Some(-15)), 60);
        assert_eq!(normalized_duration(Some(45)), 45);
    }

    #[test]
    fn window_for_proposal_uses_default() {
        let proposal = NewSession::starting_at(at(10, 0));
        let window = window_for(&proposal);
        assert_eq!(window.start, at(10, 0));
        assert_eq!(window.end, at(11, 0));
    }
}
