use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::bank::question::Question;
use crate::engine::performance::PerformanceAggregator;

/// Weighted-random question selection. Selection probability follows the
/// mastery weight of each candidate; the returned order is an independent
/// uniform shuffle, so weight influences inclusion but not position.
pub struct AdaptiveSelector<'a> {
    aggregator: &'a PerformanceAggregator<'a>,
}

impl<'a> AdaptiveSelector<'a> {
    pub fn new(aggregator: &'a PerformanceAggregator<'a>) -> Self {
        Self { aggregator }
    }

    /// Draw up to `count` distinct questions from `pool`, optionally filtered
    /// to one category. An empty pool, a zero count, or a category with no
    /// matches returns an empty sequence, never an error.
    pub fn select_questions(
        &self,
        rng: &mut SmallRng,
        pool: &[Question],
        count: usize,
        category: Option<&str>,
    ) -> Vec<Question> {
        let mut candidates: Vec<&Question> = match category {
            Some(cat) => pool.iter().filter(|q| q.category == cat).collect(),
            None => pool.iter().collect(),
        };
        if candidates.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut weights: Vec<f64> = candidates
            .iter()
            .map(|q| {
                self.aggregator
                    .performance_for(&q.id, &q.category)
                    .weight as f64
            })
            .collect();

        // Sampling without replacement: each draw removes the winner and the
        // remaining weights renormalize implicitly on the next pass.
        let target = count.min(candidates.len());
        let mut selected = Vec::with_capacity(target);
        while selected.len() < target {
            let idx = pick_weighted(rng, &weights);
            selected.push(candidates.swap_remove(idx).clone());
            weights.swap_remove(idx);
        }

        selected.shuffle(rng);
        selected
    }
}

fn pick_weighted(rng: &mut SmallRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (i, weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll <= 0.0 {
            return i;
        }
    }
    weights.len() - 1
}
