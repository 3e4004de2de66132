use std::collections::HashSet;

use crate::{
    models::{RankedRecipe, Recipe, TasteVector},
    services::{catalog::RecipeCatalog, similarity::cosine},
};

/// Weight of taste similarity in the blended score
pub const SIMILARITY_WEIGHT: f64 = 0.75;
/// Weight of ingredient availability in the blended score
pub const AVAILABILITY_WEIGHT: f64 = 0.25;

fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized set of ingredients the user has on hand
///
/// Tokens are trimmed and lowercased; empty and duplicate tokens are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnHand {
    items: HashSet<String>,
}

impl OnHand {
    /// Parses free text such as `"tomate, Chile,,"`
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.items.contains(&normalize_ingredient(ingredient))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for OnHand {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let items = iter
            .into_iter()
            .map(|s| normalize_ingredient(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { items }
    }
}

/// Fraction of the on-hand set that this recipe uses, in [0, 1]
///
/// A recipe listing the same ingredient twice counts it once.
pub fn availability(recipe: &Recipe, on_hand: &OnHand) -> f64 {
    if on_hand.is_empty() {
        return 0.0;
    }

    let matched: HashSet<String> = recipe
        .ingredients
        .iter()
        .map(|i| normalize_ingredient(i))
        .filter(|i| on_hand.items.contains(i))
        .collect();

    matched.len() as f64 / on_hand.len() as f64
}

/// Blended recommendation score
pub fn blended_score(similarity: f64, availability: f64) -> f64 {
    SIMILARITY_WEIGHT * similarity + AVAILABILITY_WEIGHT * availability
}

/// Ranks the catalog against a taste profile
///
/// Pure over its inputs: re-running with the same profile and on-hand set
/// always yields the same list.
pub struct RecommendationRanker<'a> {
    catalog: &'a RecipeCatalog,
}

impl<'a> RecommendationRanker<'a> {
    pub fn new(catalog: &'a RecipeCatalog) -> Self {
        Self { catalog }
    }

    /// Scores every recipe and sorts by descending score
    ///
    /// Equal scores keep catalog order (`sort_by` is stable).
    pub fn rank(&self, profile: &TasteVector, on_hand: &OnHand) -> Vec<RankedRecipe<'a>> {
        let mut ranked: Vec<RankedRecipe<'a>> = self
            .catalog
            .iter()
            .map(|recipe| {
                let similarity = cosine(profile, &recipe.vector);
                let availability = availability(recipe, on_hand);
                RankedRecipe {
                    rank: 0,
                    recipe,
                    score: blended_score(similarity, availability),
                    similarity,
                    availability,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        for (position, entry) in ranked.iter_mut().enumerate() {
            entry.rank = position + 1;
        }

        tracing::debug!(
            recipe_count = ranked.len(),
            on_hand = on_hand.len(),
            top = ranked.first().map(|r| r.recipe.id),
            "Ranked recipes"
        );

        ranked
    }

    /// Like [`rank`](Self::rank), truncated to at most `limit` entries
    pub fn top(&self, profile: &TasteVector, on_hand: &OnHand, limit: usize) -> Vec<RankedRecipe<'a>> {
        let mut ranked = self.rank(profile, on_hand);
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeRecord;

    const EPS: f64 = 1e-9;

    fn record(id: u32, ingredients: &[&str], v: [f64; 7]) -> RecipeRecord {
        RecipeRecord {
            id,
            title: format!("Recipe {}", id),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            tags: vec![],
            v: v.to_vec(),
        }
    }

    fn ids(ranked: &[RankedRecipe<'_>]) -> Vec<u32> {
        ranked.iter().map(|r| r.recipe.id).collect()
    }

    #[test]
    fn test_on_hand_parse_normalizes() {
        let on_hand = OnHand::parse(" Tomate , chile,,tomate ,  ");
        assert_eq!(on_hand.len(), 2);
        assert!(on_hand.contains("tomate"));
        assert!(on_hand.contains("CHILE"));
        assert!(OnHand::parse("").is_empty());
        assert!(OnHand::parse(" , ,").is_empty());
    }

    #[test]
    fn test_availability_fraction() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let on_hand = OnHand::parse("tomate,chile");

        let tacos = catalog.get(6).unwrap();
        assert_eq!(availability(tacos, &on_hand), 1.0);

        let curry = catalog.get(2).unwrap();
        assert_eq!(availability(curry, &on_hand), 0.5);

        let citrus = catalog.get(3).unwrap();
        assert_eq!(availability(citrus, &on_hand), 0.0);
    }

    #[test]
    fn test_availability_empty_on_hand_is_zero() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let on_hand = OnHand::default();
        for recipe in catalog.iter() {
            assert_eq!(availability(recipe, &on_hand), 0.0);
        }
    }

    #[test]
    fn test_availability_counts_duplicate_ingredients_once() {
        let catalog = RecipeCatalog::from_records(vec![record(
            1,
            &["tomate", "Tomate ", "ajo"],
            [0.5; 7],
        )])
        .unwrap();
        let on_hand = OnHand::parse("tomate");
        let value = availability(catalog.get(1).unwrap(), &on_hand);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_rank_sorted_descending_with_positions() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let ranked = ranker.rank(&TasteVector::default(), &OnHand::parse("tomate, chile"));

        assert_eq!(ranked.len(), 6);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let positions: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_on_hand_lifts_tacos_above_pure_similarity() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let citrus_lover = catalog.get(3).unwrap().vector;

        let pure = ranker.rank(&citrus_lover, &OnHand::default());
        assert_eq!(pure[0].recipe.id, 3);

        let with_pantry = ranker.rank(&citrus_lover, &OnHand::parse("tomate,chile"));
        let tacos = with_pantry.iter().find(|r| r.recipe.id == 6).unwrap();
        assert_eq!(tacos.availability, 1.0);
        assert!(tacos.score > SIMILARITY_WEIGHT * tacos.similarity);
        assert!((tacos.score - (0.75 * tacos.similarity + 0.25)).abs() < EPS);
        assert_eq!(with_pantry[0].recipe.id, 6);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let same = [0.3, 0.4, 0.5, 0.1, 0.2, 0.6, 0.7];
        let catalog = RecipeCatalog::from_records(vec![
            record(30, &["a"], same),
            record(10, &["b"], same),
            record(20, &["c"], same),
        ])
        .unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let ranked = ranker.rank(&TasteVector::default(), &OnHand::default());
        assert_eq!(ids(&ranked), vec![30, 10, 20]);
    }

    #[test]
    fn test_zero_profile_ranks_by_availability_only() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let ranked = ranker.rank(&TasteVector::zero(), &OnHand::parse("tomate"));

        // Curry and tacos both use tomate; the rest tie at zero in catalog order
        assert_eq!(ids(&ranked), vec![2, 6, 1, 3, 4, 5]);
        assert!(ranked.iter().all(|r| r.similarity == 0.0));
    }

    #[test]
    fn test_rank_is_repeatable() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let profile = TasteVector::clamped([0.3, 0.5, 0.35, 0.3, 0.675, 0.35, 0.6]);
        let on_hand = OnHand::parse("miso");
        assert_eq!(ranker.rank(&profile, &on_hand), ranker.rank(&profile, &on_hand));
    }

    #[test]
    fn test_top_truncates() {
        let catalog = RecipeCatalog::bundled().unwrap();
        let ranker = RecommendationRanker::new(&catalog);
        let top = ranker.top(&TasteVector::default(), &OnHand::default(), 2);
        assert_eq!(ids(&top), vec![6, 2]);
        assert_eq!(ranker.top(&TasteVector::default(), &OnHand::default(), 50).len(), 6);
    }
}
