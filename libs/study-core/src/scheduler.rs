//! Spaced repetition scheduling.
//!
//! SM-2 family update rule over [`ReviewItem`] state: the ease factor
//! stays within [1.3, 3.0], intervals start at 1 and 3 days for the
//! first two successes, then grow by the ease factor.

use chrono::{DateTime, Duration, Utc};

use crate::types::{ReviewItem, ReviewStats};

/// Lowest allowed ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Highest allowed ease factor.
pub const MAX_EASE_FACTOR: f64 = 3.0;
/// Ease penalty applied on an incorrect review.
const INCORRECT_EASE_PENALTY: f64 = 0.2;

/// Streak at which an item counts as mastered.
const MASTERED_STREAK: u32 = 5;
/// Streak below which an item still counts as learning.
const LEARNING_STREAK: u32 = 3;
/// Floor for the suggested number of daily reviews.
const MIN_DAILY_TARGET: usize = 10;

/// Advance a review item's state after one review outcome.
///
/// Pure function of the item, the outcome, and `now`; the caller owns
/// persisting the returned state.
///
/// On a correct review the ease factor moves by `0.1 - (5 - streak) * 0.08`,
/// so short streaks still pull it down, and the interval follows the
/// streak: 1 day, then 3 days, then the previous interval scaled by the
/// new ease factor. An incorrect review costs 0.2 ease and resets the
/// interval to 1 day and the streak to zero.
pub fn apply_review(item: &ReviewItem, is_correct: bool, now: DateTime<Utc>) -> ReviewItem {
    let mut next = item.clone();

    if is_correct {
        let adjustment = 0.1 - (5.0 - item.streak as f64) * 0.08;
        next.ease_factor = (item.ease_factor + adjustment).clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);
        next.interval_days = match item.streak {
            0 => 1,
            1 => 3,
            _ => (item.interval_days as f64 * next.ease_factor).round() as u32,
        };
        next.streak = item.streak + 1;
        next.correct_count = item.correct_count + 1;
    } else {
        next.ease_factor =
            (item.ease_factor - INCORRECT_EASE_PENALTY).clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);
        next.interval_days = 1;
        next.streak = 0;
        next.incorrect_count = item.incorrect_count + 1;
    }

    next.review_count = item.review_count + 1;
    next.last_reviewed = now;
    next.next_review = now + Duration::days(next.interval_days as i64);
    next
}

/// Collect the items due at `now`, soonest scheduled first.
///
/// The sort is stable, so items sharing a next_review timestamp keep
/// their input order.
pub fn due_items<'a>(items: &'a [ReviewItem], now: DateTime<Utc>) -> Vec<&'a ReviewItem> {
    let mut due: Vec<&ReviewItem> = items.iter().filter(|item| item.is_due(now)).collect();
    due.sort_by_key(|item| item.next_review);
    due
}

/// Summarize progress across a review collection.
///
/// Mastered means a streak of five or more, learning means fewer than
/// three. The daily target is a tenth of the collection, floored at ten.
pub fn review_stats(items: &[ReviewItem], now: DateTime<Utc>) -> ReviewStats {
    let total = items.len();
    let mastered = items.iter().filter(|item| item.streak >= MASTERED_STREAK).count();
    let learning = items.iter().filter(|item| item.streak < LEARNING_STREAK).count();
    let review = items.iter().filter(|item| item.is_due(now)).count();
    let daily_target = MIN_DAILY_TARGET.max((total as f64 * 0.1).ceil() as usize);

    ReviewStats {
        total,
        mastered,
        learning,
        review,
        daily_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item_with(streak: u32, ease_factor: f64, interval_days: u32) -> ReviewItem {
        let now = Utc::now();
        ReviewItem {
            streak,
            ease_factor,
            interval_days,
            ..ReviewItem::new("q1".to_string(), "physics".to_string(), "medium".to_string(), now)
        }
    }

    #[test]
    fn first_correct_review_schedules_one_day() {
        let now = Utc::now();
        let item = ReviewItem::new("q1".to_string(), "physics".to_string(), "easy".to_string(), now);

        let next = apply_review(&item, true, now);

        assert_eq!(next.interval_days, 1);
        assert_eq!(next.streak, 1);
        assert_eq!(next.correct_count, 1);
        assert_eq!(next.review_count, 1);
        assert_eq!(next.next_review, now + Duration::days(1));
        // 2.5 + (0.1 - 5 * 0.08) = 2.2
        assert!((next.ease_factor - 2.2).abs() < 1e-9);
    }

    #[test]
    fn second_correct_review_schedules_three_days() {
        let item = item_with(1, 2.2, 1);
        let now = Utc::now();

        let next = apply_review(&item, true, now);

        assert_eq!(next.interval_days, 3);
        assert_eq!(next.streak, 2);
        // 2.2 + (0.1 - 4 * 0.08) = 1.98
        assert!((next.ease_factor - 1.98).abs() < 1e-9);
    }

    #[test]
    fn later_intervals_scale_by_new_ease() {
        let item = item_with(5, 2.5, 10);
        let now = Utc::now();

        let next = apply_review(&item, true, now);

        // 2.5 + (0.1 - 0 * 0.08) = 2.6, then round(10 * 2.6) = 26.
        assert!((next.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(next.interval_days, 26);
        assert_eq!(next.streak, 6);
    }

    #[test]
    fn incorrect_review_resets_interval_and_streak() {
        let item = item_with(4, 2.5, 10);
        let now = Utc::now();

        let next = apply_review(&item, false, now);

        assert!((next.ease_factor - 2.3).abs() < 1e-9);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.streak, 0);
        assert_eq!(next.incorrect_count, 1);
        assert_eq!(next.next_review, now + Duration::days(1));
    }

    #[test]
    fn ease_factor_never_leaves_bounds() {
        let now = Utc::now();
        let mut item = item_with(0, 2.5, 1);
        for i in 0..40 {
            let is_correct = i % 3 != 0;
            item = apply_review(&item, is_correct, now);
            assert!(item.ease_factor >= MIN_EASE_FACTOR - 1e-9);
            assert!(item.ease_factor <= MAX_EASE_FACTOR + 1e-9);
            assert!(item.interval_days >= 1);
        }

        let mut failing = item_with(0, 1.4, 1);
        for _ in 0..10 {
            failing = apply_review(&failing, false, now);
        }
        assert!((failing.ease_factor - MIN_EASE_FACTOR).abs() < 1e-9);

        let mut mastered = item_with(10, 2.9, 30);
        for _ in 0..10 {
            mastered = apply_review(&mastered, true, now);
        }
        assert!((mastered.ease_factor - MAX_EASE_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn review_counts_track_outcomes() {
        let now = Utc::now();
        let item = item_with(2, 2.0, 3);

        let after_correct = apply_review(&item, true, now);
        assert_eq!(after_correct.correct_count, 1);
        assert_eq!(after_correct.incorrect_count, 0);

        let after_incorrect = apply_review(&after_correct, false, now);
        assert_eq!(after_incorrect.correct_count, 1);
        assert_eq!(after_incorrect.incorrect_count, 1);
        assert_eq!(after_incorrect.review_count, 2);
        assert_eq!(after_incorrect.last_reviewed, now);
    }

    #[test]
    fn due_items_are_sorted_and_exclude_future() {
        let now = Utc::now();
        let mut items = Vec::new();
        for (id, offset_days) in [("a", -3i64), ("b", 2), ("c", -1), ("d", 0), ("e", 5)] {
            let mut item =
                ReviewItem::new(id.to_string(), "math".to_string(), "easy".to_string(), now);
            item.next_review = now + Duration::days(offset_days);
            items.push(item);
        }

        let due = due_items(&items, now);

        let ids: Vec<&str> = due.iter().map(|item| item.question_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn stats_count_mastery_bands_and_due() {
        let now = Utc::now();
        let streaks = [0u32, 1, 2, 3, 5, 7];
        let mut items = Vec::new();
        for (i, streak) in streaks.into_iter().enumerate() {
            let mut item = ReviewItem::new(
                format!("q{i}"),
                "biology".to_string(),
                "hard".to_string(),
                now,
            );
            item.streak = streak;
            // Half due now, half scheduled out.
            item.next_review = if i % 2 == 0 { now } else { now + Duration::days(4) };
            items.push(item);
        }

        let stats = review_stats(&items, now);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.mastered, 2);
        assert_eq!(stats.learning, 3);
        assert_eq!(stats.review, 3);
        assert_eq!(stats.daily_target, 10);
    }

    #[test]
    fn daily_target_scales_with_collection_size() {
        let now = Utc::now();
        let items: Vec<ReviewItem> = (0..250)
            .map(|i| ReviewItem::new(format!("q{i}"), "law".to_string(), "easy".to_string(), now))
            .collect();

        let stats = review_stats(&items, now);
        assert_eq!(stats.daily_target, 25);
    }
}
