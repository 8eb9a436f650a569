// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timeline reconciliation.
//!
//! Merges a trip's moments and footprints into one day-grouped timeline:
//! 1. Pair each moment with the nearest unused footprint inside the window
//! 2. Emit every unpaired footprint on its own
//! 3. Bucket entries by wall-clock day in the viewer's zone
//! 4. Order days and entries oldest-first for ended trips, newest-first otherwise
//!
//! Pure and synchronous: same inputs, same output.

use crate::models::{DayKey, Footprint, Moment, Timeline, TimelineEntry};
use crate::time_utils::{day_key, parse_timestamp};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet};

/// Maximum distance between a moment and its footprint, inclusive.
pub const PROXIMITY_WINDOW_MS: i64 = 120_000;

/// Build the display timeline for one trip.
///
/// Matching is greedy per moment, in the order `moments` are given; it does
/// not search for the globally best pairing. Candidates are scanned newest to
/// oldest and a later candidate only wins with a strictly smaller distance,
/// so on equal distance the newer footprint is taken. That tie-break is kept
/// for output stability, not because it matters to the product.
///
/// Entries whose timestamp does not parse never pair, land in the
/// [`DayKey::Unknown`] group and sort below every real instant.
pub fn reconcile<Tz: TimeZone>(
    moments: &[Moment],
    footprints: &[Footprint],
    is_ended: bool,
    tz: &Tz,
) -> Timeline {
    let window = Duration::milliseconds(PROXIMITY_WINDOW_MS);

    // Newest first, unparseable last, input order among equals.
    let mut candidates: Vec<(usize, Option<DateTime<Utc>>)> = footprints
        .iter()
        .enumerate()
        .map(|(idx, fp)| (idx, parse_timestamp(&fp.created_at)))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    // Keyed by position so duplicate ids can't alias.
    let mut used: HashSet<usize> = HashSet::with_capacity(footprints.len());
    let mut entries: Vec<TimelineEntry> = Vec::with_capacity(moments.len() + footprints.len());

    for moment in moments {
        let nearest = parse_timestamp(&moment.created_at)
            .and_then(|at| nearest_unused(at, &candidates, &used, window));

        match nearest {
            Some(idx) => {
                used.insert(idx);
                entries.push(TimelineEntry::Combined {
                    moment: moment.clone(),
                    footprint: footprints[idx].clone(),
                });
            }
            None => entries.push(TimelineEntry::MomentOnly {
                moment: moment.clone(),
            }),
        }
    }

    let combined = used.len();

    entries.extend(
        footprints
            .iter()
            .enumerate()
            .filter(|(idx, _)| !used.contains(idx))
            .map(|(_, fp)| TimelineEntry::FootprintOnly {
                footprint: fp.clone(),
            }),
    );

    let timeline = group_by_day(entries, is_ended, tz);

    tracing::debug!(
        moments = moments.len(),
        footprints = footprints.len(),
        combined,
        days = timeline.len(),
        is_ended,
        "Reconciled timeline"
    );

    timeline
}

/// Index of the closest unused footprint within `window` of `at`.
fn nearest_unused(
    at: DateTime<Utc>,
    candidates: &[(usize, Option<DateTime<Utc>>)],
    used: &HashSet<usize>,
    window: Duration,
) -> Option<usize> {
    let mut best: Option<(usize, Duration)> = None;

    for &(idx, fp_at) in candidates {
        if used.contains(&idx) {
            continue;
        }
        let Some(fp_at) = fp_at else {
            continue;
        };

        let delta = if fp_at >= at { fp_at - at } else { at - fp_at };
        if delta > window {
            continue;
        }

        if best.map_or(true, |(_, best_delta)| delta < best_delta) {
            best = Some((idx, delta));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Bucket entries by day and apply the trip's reading direction.
///
/// Both axes are sorted ascending and reversed as a whole for active trips,
/// so flipping `is_ended` mirrors the output exactly.
fn group_by_day<Tz: TimeZone>(entries: Vec<TimelineEntry>, is_ended: bool, tz: &Tz) -> Timeline {
    let mut keyed: Vec<(Option<DateTime<Utc>>, TimelineEntry)> =
        entries.into_iter().map(|e| (e.sort_key(), e)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut days: BTreeMap<DayKey, Vec<TimelineEntry>> = BTreeMap::new();
    for (at, entry) in keyed {
        days.entry(day_key(at, tz)).or_default().push(entry);
    }

    if is_ended {
        days.into_iter().collect()
    } else {
        days.into_iter()
            .rev()
            .map(|(day, mut group)| {
                group.reverse();
                (day, group)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FootprintKind;
    use chrono::{FixedOffset, NaiveDate};

    fn moment(id: &str, at: &str) -> Moment {
        Moment {
            id: id.to_string(),
            trip_id: "trip".to_string(),
            author_id: "user".to_string(),
            text: Some(format!("moment {}", id)),
            photo_ref: None,
            created_at: at.to_string(),
        }
    }

    fn footprint(id: &str, at: &str) -> Footprint {
        Footprint {
            id: id.to_string(),
            trip_id: "trip".to_string(),
            kind: FootprintKind::Breadcrumb,
            lat: 37.33,
            lng: -122.08,
            accuracy_meters: Some(10.0),
            place_text: None,
            moment_id: None,
            created_at: at.to_string(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    /// Flatten to (kind, id) pairs for compact assertions.
    fn ids(entries: &[TimelineEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| match e {
                TimelineEntry::Combined { moment, footprint } => {
                    format!("{}+{}", moment.id, footprint.id)
                }
                TimelineEntry::MomentOnly { moment } => moment.id.clone(),
                TimelineEntry::FootprintOnly { footprint } => footprint.id.clone(),
            })
            .collect()
    }

    #[test]
    fn test_close_pair_is_combined() {
        let moments = vec![moment("m1", "2024-06-01T10:00:00Z")];
        let footprints = vec![footprint("f1", "2024-06-01T10:01:00Z")];

        let timeline = reconcile(&moments, &footprints, false, &Utc);

        assert_eq!(timeline.len(), 1);
        assert_eq!(ids(&timeline[&day(2024, 6, 1)]), vec!["m1+f1"]);
    }

    #[test]
    fn test_far_pair_stays_separate() {
        let moments = vec![moment("m1", "2024-06-01T10:00:00Z")];
        let footprints = vec![footprint("f1", "2024-06-01T10:05:00Z")];

        let timeline = reconcile(&moments, &footprints, true, &Utc);

        assert_eq!(timeline.len(), 1);
        let entries = &timeline[&day(2024, 6, 1)];
        assert_eq!(ids(entries), vec!["m1", "f1"]);
        assert!(matches!(entries[0], TimelineEntry::MomentOnly { .. }));
        assert!(matches!(entries[1], TimelineEntry::FootprintOnly { .. }));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let moments = vec![
            moment("m1", "2024-06-01T10:00:00Z"),
            moment("m2", "2024-06-01T12:00:00Z"),
        ];
        let footprints = vec![
            footprint("f1", "2024-06-01T10:02:00Z"),
            footprint("f2", "2024-06-01T12:02:00.001Z"),
        ];

        let timeline = reconcile(&moments, &footprints, true, &Utc);

        assert_eq!(
            ids(&timeline[&day(2024, 6, 1)]),
            vec!["m1+f1", "m2", "f2"]
        );
    }

    #[test]
    fn test_equidistant_moments_first_moment_wins() {
        let moments = vec![
            moment("m1", "2024-06-01T10:00:00Z"),
            moment("m2", "2024-06-01T10:00:30Z"),
        ];
        let footprints = vec![footprint("f1", "2024-06-01T10:00:15Z")];

        let timeline = reconcile(&moments, &footprints, true, &Utc);
        let entries = &timeline[&day(2024, 6, 1)];

        let combined: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e, TimelineEntry::Combined { .. }))
            .collect();
        assert_eq!(combined.len(), 1);
        assert_eq!(ids(entries), vec!["m1+f1", "m2"]);
    }

    #[test]
    fn test_equidistant_footprints_newest_wins() {
        // f_early and f_late are both 30s from the moment; the newest-first
        // scan sees f_late first and keeps it.
        let moments = vec![moment("m1", "2024-06-01T10:00:30Z")];
        let footprints = vec![
            footprint("f_early", "2024-06-01T10:00:00Z"),
            footprint("f_late", "2024-06-01T10:01:00Z"),
        ];

        let timeline = reconcile(&moments, &footprints, true, &Utc);

        assert_eq!(
            ids(&timeline[&day(2024, 6, 1)]),
            vec!["f_early", "m1+f_late"]
        );
    }

    #[test]
    fn test_greedy_matching_is_not_globally_optimal() {
        // m1 grabs f1 (its nearest), leaving m2 with nothing even though
        // m1->f0 and m2->f1 would have paired both.
        let moments = vec![
            moment("m1", "2024-06-01T10:01:00Z"),
            moment("m2", "2024-06-01T10:02:30Z"),
        ];
        let footprints = vec![
            footprint("f0", "2024-06-01T09:59:30Z"),
            footprint("f1", "2024-06-01T10:01:10Z"),
        ];

        let timeline = reconcile(&moments, &footprints, true, &Utc);
        let entries = &timeline[&day(2024, 6, 1)];

        assert_eq!(ids(entries), vec!["f0", "m1+f1", "m2"]);
    }

    #[test]
    fn test_each_footprint_used_once() {
        let moments = vec![
            moment("m1", "2024-06-01T10:00:00Z"),
            moment("m2", "2024-06-01T10:00:05Z"),
            moment("m3", "2024-06-01T10:00:10Z"),
        ];
        let footprints = vec![
            footprint("f1", "2024-06-01T10:00:04Z"),
            footprint("f2", "2024-06-01T10:00:06Z"),
        ];

        let timeline = reconcile(&moments, &footprints, true, &Utc);
        let entries = &timeline[&day(2024, 6, 1)];

        // m1 takes f1 (4s), m2 takes f2 (1s), m3 finds nothing left.
        assert_eq!(ids(entries), vec!["m1+f1", "m2+f2", "m3"]);
    }

    #[test]
    fn test_active_trip_is_newest_first_on_both_axes() {
        let moments = vec![
            moment("a", "2024-06-01T09:00:00Z"),
            moment("b", "2024-06-01T18:00:00Z"),
            moment("c", "2024-06-02T08:00:00Z"),
        ];
        let footprints = vec![footprint("d", "2024-06-02T20:00:00Z")];

        let timeline = reconcile(&moments, &footprints, false, &Utc);

        let days: Vec<DayKey> = timeline.keys().copied().collect();
        assert_eq!(days, vec![day(2024, 6, 2), day(2024, 6, 1)]);
        assert_eq!(ids(&timeline[&day(2024, 6, 2)]), vec!["d", "c"]);
        assert_eq!(ids(&timeline[&day(2024, 6, 1)]), vec!["b", "a"]);
    }

    #[test]
    fn test_ended_trip_is_oldest_first_on_both_axes() {
        let moments = vec![
            moment("a", "2024-06-01T09:00:00Z"),
            moment("b", "2024-06-01T18:00:00Z"),
            moment("c", "2024-06-02T08:00:00Z"),
        ];
        let footprints = vec![footprint("d", "2024-06-02T20:00:00Z")];

        let timeline = reconcile(&moments, &footprints, true, &Utc);

        let days: Vec<DayKey> = timeline.keys().copied().collect();
        assert_eq!(days, vec![day(2024, 6, 1), day(2024, 6, 2)]);
        assert_eq!(ids(&timeline[&day(2024, 6, 1)]), vec!["a", "b"]);
        assert_eq!(ids(&timeline[&day(2024, 6, 2)]), vec!["c", "d"]);
    }

    #[test]
    fn test_empty_inputs_yield_empty_timeline() {
        assert!(reconcile(&[], &[], false, &Utc).is_empty());
        assert!(reconcile(&[], &[], true, &Utc).is_empty());
    }

    #[test]
    fn test_malformed_timestamps_are_kept_and_sorted_lowest() {
        let moments = vec![
            moment("bad_m", "not a timestamp"),
            moment("m1", "2024-06-01T10:00:00Z"),
        ];
        let footprints = vec![
            footprint("bad_f", ""),
            footprint("f1", "2024-06-01T10:00:30Z"),
        ];

        let ended = reconcile(&moments, &footprints, true, &Utc);
        let days: Vec<DayKey> = ended.keys().copied().collect();
        assert_eq!(days, vec![DayKey::Unknown, day(2024, 6, 1)]);
        // Unparseable entries never pair with each other or anything else.
        assert_eq!(ids(&ended[&DayKey::Unknown]), vec!["bad_m", "bad_f"]);
        assert_eq!(ids(&ended[&day(2024, 6, 1)]), vec!["m1+f1"]);

        let active = reconcile(&moments, &footprints, false, &Utc);
        let days: Vec<DayKey> = active.keys().copied().collect();
        assert_eq!(days, vec![day(2024, 6, 1), DayKey::Unknown]);
        assert_eq!(ids(&active[&DayKey::Unknown]), vec!["bad_f", "bad_m"]);
    }

    #[test]
    fn test_grouping_follows_viewer_zone() {
        let moments = vec![moment("late", "2024-06-01T23:30:00Z")];
        let footprints = vec![footprint("early", "2024-06-01T08:00:00Z")];

        let utc = reconcile(&moments, &footprints, true, &Utc);
        assert_eq!(utc.len(), 1);
        assert_eq!(ids(&utc[&day(2024, 6, 1)]), vec!["early", "late"]);

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let shifted = reconcile(&moments, &footprints, true, &tokyo);
        let days: Vec<DayKey> = shifted.keys().copied().collect();
        assert_eq!(days, vec![day(2024, 6, 1), day(2024, 6, 2)]);
        assert_eq!(ids(&shifted[&day(2024, 6, 2)]), vec!["late"]);
    }

    #[test]
    fn test_combined_entry_sorts_by_moment_time() {
        // The footprint is just past midnight but the pair belongs to the
        // moment's day.
        let moments = vec![moment("m1", "2024-06-01T23:59:30Z")];
        let footprints = vec![footprint("f1", "2024-06-02T00:00:30Z")];

        let timeline = reconcile(&moments, &footprints, true, &Utc);

        assert_eq!(timeline.len(), 1);
        assert_eq!(ids(&timeline[&day(2024, 6, 1)]), vec!["m1+f1"]);
    }
}
