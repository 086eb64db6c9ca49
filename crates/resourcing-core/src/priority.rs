//! Priority normalization.
//!
//! Rewrites declared priorities into contiguous ranks per assignee. Each
//! active row, taken in input order, asks to be inserted at slot
//! `priority - 1` of its assignee's queue; a request past the end of the
//! queue appends instead. Final positions become ranks 1..N.
//!
//! This is not a sort. When a later row declares a slot that is already
//! taken, it lands in that slot and pushes the earlier occupant down, which
//! is how "insert job at position 2" behaves in the editing layer.

use std::collections::HashMap;

use crate::model::Job;

/// Normalize priorities for a whole job snapshot.
///
/// Returns every active group (assignees in order of first appearance)
/// followed by the on-hold jobs in their original order. All other fields
/// are preserved.
pub fn normalize(jobs: Vec<Job>) -> Vec<Job> {
    let mut groups: Vec<Vec<Job>> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();
    let mut hold = Vec::new();

    for job in jobs {
        if !job.is_active() {
            hold.push(job);
            continue;
        }
        let idx = *group_of.entry(job.assignee.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(job);
    }

    let mut out: Vec<Job> = groups.into_iter().flat_map(rank_group).collect();
    tracing::debug!(active = out.len(), on_hold = hold.len(), "normalized priorities");
    out.extend(hold);
    out
}

/// Place one assignee's active rows by requested slot, then renumber.
fn rank_group(rows: Vec<Job>) -> Vec<Job> {
    let mut ordered: Vec<Job> = Vec::with_capacity(rows.len());
    for job in rows {
        let slot = job.priority.max(1) as usize - 1;
        if slot >= ordered.len() {
            ordered.push(job);
        } else {
            ordered.insert(slot, job);
        }
    }
    for (rank, job) in ordered.iter_mut().enumerate() {
        job.priority = rank as u32 + 1;
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(jobs: &[Job]) -> Vec<(&str, u32)> {
        jobs.iter().map(|j| (j.name.as_str(), j.priority)).collect()
    }

    #[test]
    fn gaps_are_closed() {
        let jobs = vec![Job::new("A", 1.0, 3, "SL"), Job::new("B", 1.0, 7, "SL")];
        assert_eq!(names(&normalize(jobs)), vec![("A", 1), ("B", 2)]);
    }

    #[test]
    fn later_row_takes_contested_slot() {
        let jobs = vec![
            Job::new("A", 1.0, 1, "SL"),
            Job::new("B", 1.0, 2, "SL"),
            Job::new("C", 1.0, 1, "SL"),
        ];
        assert_eq!(names(&normalize(jobs)), vec![("C", 1), ("A", 2), ("B", 3)]);
    }

    #[test]
    fn differs_from_a_stable_sort() {
        // A stable sort by priority would give B, A, C
        let jobs = vec![
            Job::new("A", 1.0, 2, "SL"),
            Job::new("B", 1.0, 1, "SL"),
            Job::new("C", 1.0, 2, "SL"),
        ];
        assert_eq!(names(&normalize(jobs)), vec![("B", 1), ("C", 2), ("A", 3)]);
    }

    #[test]
    fn assignees_are_ranked_independently() {
        let jobs = vec![
            Job::new("A", 1.0, 5, "SL"),
            Job::new("X", 1.0, 2, "LS"),
            Job::new("B", 1.0, 1, "SL"),
        ];
        let out = normalize(jobs);
        assert_eq!(names(&out), vec![("B", 1), ("A", 2), ("X", 1)]);
    }

    #[test]
    fn hold_jobs_follow_active_in_original_order() {
        let jobs = vec![
            Job::new("H1", 1.0, 0, "SL"),
            Job::new("A", 1.0, 1, "SL"),
            Job::new("H2", 1.0, 0, "LS"),
        ];
        assert_eq!(
            names(&normalize(jobs)),
            vec![("A", 1), ("H1", 0), ("H2", 0)]
        );
    }

    #[test]
    fn other_fields_survive() {
        let due = chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let job = Job::new("A", 12.5, 4, "SL")
            .with_due_date(due)
            .with_notes("hydraulics");
        let id = job.id.clone();
        let out = normalize(vec![job]);
        assert_eq!(out[0].id, id);
        assert_eq!(out[0].required_hours, 12.5);
        assert_eq!(out[0].due_date, Some(due));
        assert_eq!(out[0].notes, "hydraulics");
    }

    #[test]
    fn normalize_is_idempotent() {
        let jobs = vec![
            Job::new("A", 1.0, 2, "SL"),
            Job::new("B", 1.0, 2, "SL"),
            Job::new("C", 1.0, 0, "SL"),
            Job::new("D", 1.0, 9, "LS"),
        ];
        let once = normalize(jobs);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
