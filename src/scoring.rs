//! ESG scoring
//!
//! Weighted mean of per-category impact scores, rounded to an integer and
//! capped at 100.

use crate::models::{Category, CategoryCounts, EsgActivity};

/// Impact score assumed when an activity does not carry one
pub const DEFAULT_IMPACT_SCORE: f64 = 5.0;

pub const MAX_SCORE: u32 = 100;

/// Weight of a category's mean in the overall score
pub fn category_weight(category: Category) -> f64 {
    match category {
        Category::Environmental => 0.4,
        Category::Social => 0.3,
        Category::Governance => 0.3,
    }
}

fn impact(activity: &EsgActivity) -> f64 {
    activity.impact_score.unwrap_or(DEFAULT_IMPACT_SCORE)
}

/// Mean impact of one category; 0 when the category has no activities.
pub fn category_mean<'a, I>(activities: I, category: Category) -> f64
where
    I: IntoIterator<Item = &'a EsgActivity>,
{
    let (sum, count) = activities
        .into_iter()
        .filter(|a| a.category == category)
        .fold((0.0, 0usize), |(sum, count), a| (sum + impact(a), count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Score a set of activities in [0, 100].
///
/// Impact scores are non-negative by validation, so only the upper bound is
/// enforced.
pub fn score<'a, I>(activities: I) -> u32
where
    I: IntoIterator<Item = &'a EsgActivity>,
    I::IntoIter: Clone,
{
    let activities = activities.into_iter();

    let weighted: f64 = Category::ALL
        .iter()
        .map(|&c| category_weight(c) * category_mean(activities.clone(), c))
        .sum();

    let rounded = weighted.round();
    if rounded >= MAX_SCORE as f64 {
        MAX_SCORE
    } else {
        rounded as u32
    }
}

/// Count activities per category, omitting empty categories.
pub fn category_counts<'a, I>(activities: I) -> CategoryCounts
where
    I: IntoIterator<Item = &'a EsgActivity>,
{
    let mut counts = CategoryCounts::new();
    for activity in activities {
        *counts.entry(activity.category).or_insert(0) += 1;
    }
    counts
}
