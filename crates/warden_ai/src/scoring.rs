//! Search candidate ranking
//!
//! Selection and consumption use different orders on purpose: candidates
//! are chosen by relevance (short and aligned with where the target was
//! heading), then visited nearest-first from wherever the pursuer stands.

use serde::{Deserialize, Serialize};
use warden_math::{map_clamped, Vec3};
use warden_nav::{NavPath, NavigationPort};

/// Paths shorter than this are scored as if they had this length
const MIN_PATH_LENGTH: f32 = 1e-3;

/// A scored search location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub position: Vec3,
    pub relevance: f32,
}

/// Relevance of a path given the last known target velocity.
///
/// `((180 - angle) / 180)^4 / length`, where `angle` is measured between
/// the first leg of the path and the velocity. A zero velocity counts as
/// perfectly aligned.
pub fn relevance(path: &NavPath, last_velocity: Vec3) -> f32 {
    let length = path.length().max(MIN_PATH_LENGTH);
    let angle = path.initial_direction().angle_between_deg(last_velocity);
    let angle_factor = map_clamped(angle, 0.0, 180.0, 1.0, 0.0).powi(4);
    angle_factor / length
}

/// Score one candidate; `None` when it cannot be reached
pub fn score(
    nav: &dyn NavigationPort,
    agent_position: Vec3,
    candidate: Vec3,
    last_velocity: Vec3,
) -> Option<Candidate> {
    nav.find_path(agent_position, candidate).map(|path| Candidate {
        position: candidate,
        relevance: relevance(&path, last_velocity),
    })
}

/// Keep the `k` most relevant reachable candidates.
///
/// The result is ordered by ascending relevance, so popping from the back
/// yields the best candidate first.
pub fn select_search_set<I>(
    nav: &dyn NavigationPort,
    agent_position: Vec3,
    candidates: I,
    last_velocity: Vec3,
    k: usize,
) -> Vec<Candidate>
where
    I: IntoIterator<Item = Vec3>,
{
    let mut scored: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|candidate| score(nav, agent_position, candidate, last_velocity))
        .collect();

    scored.sort_by(|a, b| a.relevance.total_cmp(&b.relevance));
    let skip = scored.len().saturating_sub(k);
    scored.split_off(skip)
}

/// Reorder so the nearest point by path length is last.
///
/// Unreachable points sort to the front and are consumed last.
pub fn sort_nearest_last(nav: &dyn NavigationPort, from: Vec3, points: &mut [Vec3]) {
    let mut keyed: Vec<(f32, Vec3)> = points
        .iter()
        .map(|point| (nav.path_length(from, *point).unwrap_or(f32::INFINITY), *point))
        .collect();

    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (slot, (_, point)) in points.iter_mut().zip(keyed) {
        *slot = point;
    }
}
