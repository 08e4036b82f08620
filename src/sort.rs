//! Deterministic display ordering for task listings.

use std::cmp::Ordering;

use crate::task::Task;

/// Return a new collection ordered for presentation; the input is not
/// mutated. Not-done tasks come first, by deadline then priority; done tasks
/// follow, completed-longer-ago first. `added_at` is the final tie-break,
/// and the underlying sort is stable, so equal tasks keep a consistent
/// relative order across calls.
pub fn sorted_for_display(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by(compare);
    out
}

fn compare(a: &Task, b: &Task) -> Ordering {
    match (a.done, b.done) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => a
            .done_at
            .cmp(&b.done_at)
            .then_with(|| a.added_at.cmp(&b.added_at)),
        (false, false) => a
            .deadline
            .cmp(&b.deadline)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.added_at.cmp(&b.added_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn task(summary: &str, deadline: &str, priority: u8, done_at: Option<&str>) -> Task {
        let done_at = done_at.map(|d| {
            Utc.from_utc_datetime(
                &NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            )
        });
        Task {
            id: Uuid::new_v4(),
            priority,
            deadline: NaiveDate::parse_from_str(deadline, "%Y-%m-%d").unwrap(),
            added_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            done: done_at.is_some(),
            done_at,
            summary: summary.to_string(),
            details: String::new(),
        }
    }

    fn summaries(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.summary.as_str()).collect()
    }

    #[test]
    fn test_not_done_first_then_deadline_priority_done_at() {
        let a = task("a", "2024-01-01", 3, None);
        let b = task("b", "2024-01-01", 5, None);
        let c = task("c", "2024-01-01", 1, Some("2023-01-01"));
        let d = task("d", "2024-01-01", 1, Some("2023-06-01"));

        let sorted = sorted_for_display(&[d.clone(), c.clone(), a.clone(), b.clone()]);
        assert_eq!(summaries(&sorted), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_earlier_deadline_wins_over_priority() {
        let near = task("near", "2024-01-01", 1, None);
        let far = task("far", "2024-06-01", 5, None);
        let sorted = sorted_for_display(&[far, near]);
        assert_eq!(summaries(&sorted), vec!["near", "far"]);
    }

    #[test]
    fn test_added_at_breaks_remaining_ties() {
        let mut old = task("old", "2024-01-01", 3, None);
        old.added_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut new = task("new", "2024-01-01", 3, None);
        new.added_at = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();

        let sorted = sorted_for_display(&[new, old]);
        assert_eq!(summaries(&sorted), vec!["old", "new"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = vec![
            task("z", "2024-06-01", 1, None),
            task("a", "2024-01-01", 1, None),
        ];
        let before = input.clone();
        let _ = sorted_for_display(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_stable_across_repeated_calls() {
        let input = vec![
            task("first", "2024-01-01", 3, None),
            task("second", "2024-01-01", 3, None),
        ];
        let once = sorted_for_display(&input);
        let twice = sorted_for_display(&input);
        assert_eq!(summaries(&once), vec!["first", "second"]);
        assert_eq!(once, twice);
    }
}
