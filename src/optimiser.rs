//! The Star Power activation search.
//!
//! Given a [`ProcessedSong`], the optimiser picks a set of non-overlapping
//! activations maximising the total score boost. Greedy choices are not
//! good enough: spending half a bar on the first available note can starve
//! a later, more valuable window, and an activation sometimes has to begin
//! before its first boosted note so that it dies before the next phrase
//! note's hit window closes. The search therefore explores every candidate
//! (first boosted point, last boosted point) pair depth-first, memoised on
//! the suffix it leaves behind.

use std::collections::HashMap;

use crate::points::Point;
use crate::processed::ProcessedSong;
use crate::sp::{MINIMUM_SP_AMOUNT, SP_PER_PHRASE};
use crate::timing::Beat;

/// One Star Power activation.
///
/// `act_start..=act_end` are the indices of the boosted points; `sp_start`
/// and `sp_end` are the beats the meter switches on and empties at.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activation {
    /// Index of the first boosted point.
    pub act_start: usize,
    /// Index of the last boosted point.
    pub act_end: usize,
    /// Beat the meter is activated at.
    pub sp_start: Beat,
    /// Beat the meter empties at.
    pub sp_end: Beat,
}

/// An optimal set of activations and the extra score it earns.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// The activations, ordered and disjoint.
    pub activations: Vec<Activation>,
    /// Extra points earned over never activating.
    pub score_boost: u32,
}

type SearchResult = (u32, Vec<Activation>);

/// The activation path search over one processed song.
#[derive(Debug)]
pub struct Optimiser<'a> {
    song: &'a ProcessedSong,
    /// Granting points from each index onwards, for pruning suffixes that
    /// can never refill half a bar.
    grants_after: Vec<u32>,
    /// Front-end window of the first granting point at or after each index.
    next_grant_front: Vec<f64>,
    /// Start of the earliest whammy interval, if any.
    first_whammy_start: f64,
}

impl<'a> Optimiser<'a> {
    /// Creates an optimiser borrowing a processed song.
    #[must_use]
    pub fn new(song: &'a ProcessedSong) -> Self {
        let points = song.points().points();
        let mut grants_after = vec![0u32; points.len() + 1];
        let mut next_grant_front = vec![f64::INFINITY; points.len() + 1];
        for index in (0..points.len()).rev() {
            grants_after[index] = grants_after[index + 1];
            next_grant_front[index] = next_grant_front[index + 1];
            if points[index].is_sp_granting {
                grants_after[index] += 1;
                next_grant_front[index] = points[index].hit_window_start.value();
            }
        }
        let first_whammy_start = song
            .sp_data()
            .ranges()
            .first()
            .map_or(f64::INFINITY, |range| range.0);
        Self {
            song,
            grants_after,
            next_grant_front,
            first_whammy_start,
        }
    }

    /// Finds a path with maximal score boost. Always succeeds; a chart
    /// whose phrases and sustains can never fill half a bar gets the empty
    /// path.
    #[must_use]
    pub fn optimal_path(&self) -> Path {
        let mut cache = HashMap::new();
        let (score_boost, activations) = self.best_from(0, f64::NEG_INFINITY, &mut cache);
        Path {
            activations,
            score_boost,
        }
    }

    /// Best continuation when every point before `start` is spoken for and
    /// the previous activation (if any) emptied at `prev_end`.
    fn best_from(
        &self,
        start: usize,
        prev_end: f64,
        cache: &mut HashMap<(usize, u64), SearchResult>,
    ) -> SearchResult {
        // When nothing relevant lies at or before `prev_end`, the suffix
        // plays out exactly as from the start of the song; collapsing such
        // states is what keeps the search tractable.
        let relevance_floor = self.next_grant_front[start].min(self.first_whammy_start);
        let prev_end = if prev_end <= relevance_floor {
            f64::NEG_INFINITY
        } else {
            prev_end
        };

        let key = (start, prev_end.to_bits());
        if let Some(found) = cache.get(&key) {
            return found.clone();
        }

        let sp_data = self.song.sp_data();
        let ceiling = SP_PER_PHRASE * f64::from(self.grants_after[start])
            + sp_data.available_whammy(Beat::new(prev_end), Beat::new(f64::INFINITY));
        if ceiling < MINIMUM_SP_AMOUNT {
            cache.insert(key, (0, Vec::new()));
            return (0, Vec::new());
        }

        let points = self.song.points().points();
        let converter = self.song.converter();
        let mut best: SearchResult = (0, Vec::new());

        // Phrase grants available before the activation; a point escaping
        // the previous activation is credited no earlier than its end.
        let mut pre_grants: Vec<Beat> = Vec::new();

        for i in start..points.len() {
            if i > start && points[i - 1].is_sp_granting {
                pre_grants.push(Beat::new(
                    points[i - 1].hit_window_start.value().max(prev_end),
                ));
            }
            let Some(avail) = sp_data.earliest_half_bar(Beat::new(prev_end), &pre_grants) else {
                continue;
            };

            let mut start_lo = avail.value();
            if i > start {
                // The preceding point must be hittable before the meter
                // switches on, or it would be dragged into the activation.
                start_lo = start_lo.max(points[i - 1].hit_window_start.value());
            }

            let sp_at =
                |beat: f64| sp_data.sp_at(Beat::new(prev_end), &pre_grants, Beat::new(beat));

            // Upper bound on how far any activation starting at `i` can
            // reach, for cutting the `j` scan short.
            let all_grants: Vec<Beat> = points[i..]
                .iter()
                .filter(|point| point.is_sp_granting)
                .map(|point| point.hit_window_start)
                .collect();
            let horizon = sp_data
                .drain_end(
                    converter,
                    Beat::new(latest_hit(&points[i])),
                    1.0,
                    &all_grants,
                    true,
                )
                .value();

            let point_beat = points[i].position.beat.value();
            let mut start_hi_window = f64::INFINITY;
            let mut act_grants: Vec<Beat> = Vec::new();
            let mut needed_end = f64::NEG_INFINITY;
            let mut boost = 0u32;

            for j in i..points.len() {
                if earliest_hit(&points[j]) > horizon {
                    break;
                }
                // A phrase overlapped by the activation recharges the meter
                // as soon as its last note can be hit.
                if points[j].is_sp_granting {
                    act_grants.push(points[j].hit_window_start);
                }
                start_hi_window = start_hi_window.min(latest_hit(&points[j]));
                needed_end = needed_end.max(earliest_hit(&points[j]));
                boost += points[j].value;
                if start_lo > start_hi_window {
                    break;
                }

                // The next point has to be hittable after the meter dies,
                // or it would be dragged into the activation too.
                let escape = points.get(j + 1).map(latest_hit);
                if let Some(limit) = escape {
                    if needed_end >= limit {
                        continue;
                    }
                }

                let end_without = |beat: f64| {
                    sp_data
                        .drain_end(converter, Beat::new(beat), sp_at(beat), &act_grants, false)
                        .value()
                };
                let end_with = |beat: f64| {
                    sp_data
                        .drain_end(converter, Beat::new(beat), sp_at(beat), &act_grants, true)
                        .value()
                };

                // Activating on the point itself is almost always legal;
                // only fall back to the window search when it is not.
                let natural = point_beat.max(start_lo);
                let mut choice = None;
                if natural <= start_hi_window {
                    let min_end = end_without(natural);
                    if escape.is_none_or(|limit| min_end < limit) {
                        let max_end = end_with(natural);
                        if max_end >= needed_end {
                            choice = Some((natural, max_end, min_end));
                        }
                    }
                }
                let (sp_start, max_end, min_end) = match choice {
                    Some(found) => found,
                    None => {
                        if let Some(limit) = escape {
                            if end_without(start_lo) >= limit {
                                continue;
                            }
                        }
                        let mut lo = start_lo;
                        let mut hi = start_hi_window;
                        if let Some(limit) = escape {
                            if end_without(hi) >= limit {
                                hi = bisect_max(lo, hi, |beat| end_without(beat) < limit);
                            }
                        }
                        if end_with(hi) < needed_end {
                            continue;
                        }
                        if end_with(lo) < needed_end {
                            lo = bisect_min(lo, hi, |beat| end_with(beat) >= needed_end);
                        }
                        if lo > hi {
                            continue;
                        }
                        // A forced-early activation is reported at the
                        // middle of its feasible window.
                        let sp_start = if point_beat <= hi {
                            point_beat.max(lo)
                        } else {
                            0.5 * (lo + hi)
                        };
                        (sp_start, end_with(sp_start), end_without(sp_start))
                    }
                };

                // When the next point forces an early end, the player stops
                // whammying as soon as coverage allows.
                let sp_end = match escape {
                    Some(limit) if max_end >= limit => min_end.max(needed_end),
                    _ => max_end,
                };

                let (sub_boost, sub_acts) = self.best_from(j + 1, sp_end, cache);
                let total = boost + sub_boost;
                let improves = total > best.0
                    || (total == best.0
                        && best
                            .1
                            .first()
                            .is_some_and(|first| sp_end > first.sp_end.value()));
                if improves {
                    let mut activations = Vec::with_capacity(sub_acts.len() + 1);
                    activations.push(Activation {
                        act_start: i,
                        act_end: j,
                        sp_start: Beat::new(sp_start),
                        sp_end: Beat::new(sp_end),
                    });
                    activations.extend(sub_acts);
                    best = (total, activations);
                }
            }
        }

        cache.insert(key, best.clone());
        best
    }
}

/// Earliest beat a point can be hit at.
fn earliest_hit(point: &Point) -> f64 {
    if point.is_hold_point {
        point.position.beat.value()
    } else {
        point.hit_window_start.value()
    }
}

/// Latest beat a point can be hit at.
fn latest_hit(point: &Point) -> f64 {
    if point.is_hold_point {
        point.position.beat.value()
    } else {
        point.hit_window_end.value()
    }
}

/// Largest value in `[lo, hi]` satisfying a monotone predicate that holds
/// at `lo`.
fn bisect_max(mut lo: f64, mut hi: f64, pred: impl Fn(f64) -> bool) -> f64 {
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        if pred(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Smallest value in `[lo, hi]` satisfying a monotone predicate that holds
/// at `hi`.
fn bisect_min(mut lo: f64, mut hi: f64, pred: impl Fn(f64) -> bool) -> f64 {
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}
