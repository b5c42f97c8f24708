//! Content-based similarity scoring for recipes.
//!
//! The score is a crude ingredient/title overlap heuristic carried over from
//! the product: ingredient matching is bidirectional substring containment,
//! which catches variants like "egg"/"eggs" but also pairs like
//! "egg"/"eggplant". That looseness is intentional, preserved behavior.

use db::models::recipe::Recipe;
use serde::Serialize;
use sqlx::SqlitePool;
use ts_rs::TS;
use uuid::Uuid;

pub const DEFAULT_SIMILAR_LIMIT: usize = 6;

/// A candidate recipe annotated with its relevance score. Transient, never
/// persisted.
#[derive(Debug, Clone, Serialize, TS)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    #[ts(flatten)]
    pub recipe: Recipe,
    pub score: u32,
}

/// Rank `pool` against `reference` and return the top `limit` candidates.
///
/// Per candidate, the score is the count of its ingredients that overlap one
/// of the reference's (substring containment either way, case-insensitive),
/// plus 1 if the candidate's title contains the reference's title. The
/// reference itself and zero-score candidates are dropped; ties keep pool
/// order.
pub fn rank(reference: &Recipe, pool: &[Recipe], limit: usize) -> Vec<ScoredCandidate> {
    let reference_title = reference.title.to_lowercase();
    let reference_ingredients: Vec<String> = reference
        .ingredients
        .iter()
        .map(|i| i.to_lowercase())
        .collect();

    let mut scored: Vec<ScoredCandidate> = pool
        .iter()
        .filter(|candidate| candidate.id != reference.id)
        .filter_map(|candidate| {
            let ingredient_overlap = candidate
                .ingredients
                .iter()
                .map(|i| i.to_lowercase())
                .filter(|ci| {
                    reference_ingredients
                        .iter()
                        .any(|ri| ci.contains(ri.as_str()) || ri.contains(ci.as_str()))
                })
                .count() as u32;
            let title_match = u32::from(candidate.title.to_lowercase().contains(&reference_title));

            let score = ingredient_overlap + title_match;
            (score > 0).then(|| ScoredCandidate {
                recipe: candidate.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable, so ties retain pool order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

pub struct SimilarityService;

impl SimilarityService {
    /// Load the reference recipe and the full pool from the store and rank.
    /// An unknown reference yields an empty result rather than an error.
    pub async fn similar_recipes(
        pool: &SqlitePool,
        recipe_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, sqlx::Error> {
        let Some(reference) = Recipe::find_by_id(pool, recipe_id).await? else {
            return Ok(Vec::new());
        };
        let candidates = Recipe::find_all(pool).await?;
        Ok(rank(&reference, &candidates, limit))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn recipe(id: u128, title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: Uuid::from_u128(id),
            title: title.to_string(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn excludes_reference_and_zero_scores() {
        let reference = recipe(1, "Tomato Soup", &["tomato", "salt"]);
        let pool = vec![
            reference.clone(),
            recipe(2, "Chocolate Cake", &["flour", "cocoa"]),
            recipe(3, "Tomato Salad", &["tomato", "cucumber"]),
        ];

        let ranked = rank(&reference, &pool, DEFAULT_SIMILAR_LIMIT);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].recipe.id, Uuid::from_u128(3));
        assert!(ranked.iter().all(|c| c.score > 0));
    }

    #[test]
    fn title_match_requires_candidate_to_contain_reference_title() {
        let reference = recipe(1, "Tomato Soup", &["tomato", "salt"]);

        // "Tomato Basil Soup" does not contain "Tomato Soup": overlap only
        let candidate = recipe(2, "Tomato Basil Soup", &["tomato", "basil"]);
        let ranked = rank(&reference, &[candidate], 6);
        assert_eq!(ranked[0].score, 1);

        // "Spicy Tomato Soup" does: overlap + title match
        let candidate = recipe(3, "Spicy Tomato Soup", &["tomato", "chili"]);
        let ranked = rank(&reference, &[candidate], 6);
        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn ingredient_overlap_is_bidirectional_substring() {
        let reference = recipe(1, "Breakfast", &["egg", "Milk"]);
        let candidate = recipe(2, "Dinner", &["eggplant", "milk", "rice"]);

        // "egg" is contained in "eggplant" (the documented false positive)
        // and "milk" matches case-insensitively.
        let ranked = rank(&reference, &[candidate], 6);
        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn sorts_descending_with_stable_ties_and_truncates() {
        let reference = recipe(1, "Stew", &["beef", "carrot", "onion"]);
        let pool = vec![
            recipe(2, "Soup A", &["carrot"]),
            recipe(3, "Rich Stew", &["beef", "carrot", "onion"]),
            recipe(4, "Soup B", &["onion"]),
            recipe(5, "Soup C", &["beef"]),
        ];

        let ranked = rank(&reference, &pool, 6);
        let ids: Vec<Uuid> = ranked.iter().map(|c| c.recipe.id).collect();
        assert_eq!(
            ids,
            vec![
                Uuid::from_u128(3),
                Uuid::from_u128(2),
                Uuid::from_u128(4),
                Uuid::from_u128(5),
            ]
        );

        let ranked = rank(&reference, &pool, 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn deterministic_over_repeated_calls() {
        let reference = recipe(1, "Pasta", &["tomato", "basil", "garlic"]);
        let pool: Vec<Recipe> = (2..20)
            .map(|i| recipe(i, &format!("Dish {i}"), &["tomato", "garlic"]))
            .collect();

        let first = rank(&reference, &pool, 6);
        let second = rank(&reference, &pool, 6);
        let first_ids: Vec<Uuid> = first.iter().map(|c| c.recipe.id).collect();
        let second_ids: Vec<Uuid> = second.iter().map(|c| c.recipe.id).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(first_ids.len(), 6);
    }

    #[test]
    fn empty_pool_and_empty_ingredients() {
        let reference = recipe(1, "Anything", &[]);
        assert!(rank(&reference, &[], 6).is_empty());

        // No ingredients and no title match means no candidates survive
        let pool = vec![recipe(2, "Other", &["water"])];
        assert!(rank(&reference, &pool, 6).is_empty());
    }
}
