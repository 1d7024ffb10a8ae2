// Topic summaries — the top-weighted vocabulary terms of each topic.
//
// Ranking is a stable descending sort on weight, so equal weights keep
// ascending vocabulary order.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::traits::TopicModel;
use super::vectorizer::CountVectorizer;

/// One ranked term within a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTerm {
    pub term: String,
    pub weight: f64,
}

/// A topic as shown to people: a label and its strongest terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    /// Zero-based topic index
    pub index: usize,
    /// "Topic #1" through "Topic #N"
    pub label: String,
    /// Fraction of the model's total pseudo-count mass held by this topic
    pub share: f64,
    /// Strongest terms, highest weight first
    pub terms: Vec<TopicTerm>,
}

impl TopicSummary {
    /// Terms joined with ", " for compact display.
    pub fn joined_terms(&self) -> String {
        self.terms
            .iter()
            .map(|t| t.term.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Indices of the `n` largest weights, largest first.
pub fn top_term_indices(weights: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    // sort_by is stable: ties stay in index order
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
    order.truncate(n);
    order
}

/// Summarize every topic of `model` with its `n` strongest terms.
pub fn summarize<M: TopicModel>(model: &M, vectorizer: &CountVectorizer, n: usize) -> Result<Vec<TopicSummary>> {
    let total: f64 = model.components().iter().flatten().sum();
    model
        .components()
        .iter()
        .enumerate()
        .map(|(index, weights)| {
            if weights.len() != vectorizer.vocabulary_size() {
                anyhow::bail!(
                    "Topic {index} has {} weights but the vocabulary has {} terms",
                    weights.len(),
                    vectorizer.vocabulary_size()
                );
            }
            let terms = top_term_indices(weights, n)
                .into_iter()
                .map(|i| TopicTerm {
                    term: vectorizer.feature_names()[i].clone(),
                    weight: weights[i],
                })
                .collect();
            let share = if total > 0.0 {
                weights.iter().sum::<f64>() / total
            } else {
                0.0
            };
            Ok(TopicSummary {
                index,
                label: format!("Topic #{}", index + 1),
                share,
                terms,
            })
        })
        .collect()
}
