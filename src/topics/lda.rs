// Latent Dirichlet Allocation, fitted with batch variational Bayes.
//
// Each EM pass runs a full E-step over every document (per-document
// variational updates until the topic mixture stops moving), then replaces
// the topic-word parameters with `topic_word_prior + sufficient statistics`.
// The fitted `components` are unnormalized topic-word pseudo-counts: row t,
// column w is how strongly topic t is associated with vocabulary term w.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::TopicModel;
use super::vectorizer::DocumentTermMatrix;

/// Guards the per-term normalizer against division by zero.
const EPS: f64 = f64::EPSILON;

/// Shape and scale of the Gamma draw used to start variational parameters.
const INIT_GAMMA_SHAPE: f64 = 100.0;
const INIT_GAMMA_SCALE: f64 = 1.0 / INIT_GAMMA_SHAPE;

#[derive(Debug, Clone, PartialEq)]
pub struct LdaParams {
    pub n_topics: usize,
    /// Dirichlet prior on document-topic mixtures; `None` means 1 / n_topics
    pub doc_topic_prior: Option<f64>,
    /// Dirichlet prior on topic-word distributions; `None` means 1 / n_topics
    pub topic_word_prior: Option<f64>,
    /// Number of EM passes over the corpus
    pub max_iter: usize,
    /// Cap on per-document variational updates within one E-step
    pub max_doc_update_iter: usize,
    /// Per-document convergence threshold on mean absolute change
    pub mean_change_tol: f64,
    pub seed: u64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            n_topics: 10,
            doc_topic_prior: None,
            topic_word_prior: None,
            max_iter: 10,
            max_doc_update_iter: 100,
            mean_change_tol: 1e-3,
            seed: 42,
        }
    }
}

/// A fitted topic model. Persisted as the `lda_model.json` artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdaModel {
    n_topics: usize,
    doc_topic_prior: f64,
    topic_word_prior: f64,
    /// EM passes actually run
    n_iter: usize,
    /// [topic][term] pseudo-counts
    components: Vec<Vec<f64>>,
}

impl LdaModel {
    /// Fit a model to a document-term matrix.
    pub fn fit(dtm: &DocumentTermMatrix, params: &LdaParams) -> Result<Self> {
        Self::fit_with_progress(dtm, params, |_, _| {})
    }

    /// Fit a model, calling `on_pass(done, total)` after every EM pass.
    pub fn fit_with_progress<F>(dtm: &DocumentTermMatrix, params: &LdaParams, mut on_pass: F) -> Result<Self>
    where
        F: FnMut(usize, usize),
    {
        let k = params.n_topics;
        let v = dtm.n_terms();
        if k == 0 {
            anyhow::bail!("LDA needs at least one topic");
        }
        if v == 0 {
            anyhow::bail!("Cannot fit LDA on an empty vocabulary");
        }
        if dtm.n_documents() == 0 {
            anyhow::bail!("Cannot fit LDA on an empty document-term matrix");
        }

        let doc_topic_prior = params.doc_topic_prior.unwrap_or(1.0 / k as f64);
        let topic_word_prior = params.topic_word_prior.unwrap_or(1.0 / k as f64);

        let gamma = Gamma::new(INIT_GAMMA_SHAPE, INIT_GAMMA_SCALE)
            .map_err(|e| anyhow!("Invalid Gamma initialization parameters: {e}"))?;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let mut components: Vec<Vec<f64>> = (0..k)
            .map(|_| (0..v).map(|_| gamma.sample(&mut rng)).collect())
            .collect();
        let mut exp_elog_beta = exp_dirichlet_expectation_rows(&components);

        for pass in 0..params.max_iter {
            let sstats = e_step(dtm, &exp_elog_beta, doc_topic_prior, params, &gamma, &mut rng);

            // M-step: the batch update replaces the parameters outright
            for (t, row) in components.iter_mut().enumerate() {
                for (w, value) in row.iter_mut().enumerate() {
                    *value = topic_word_prior + sstats[t][w] * exp_elog_beta[t][w];
                }
            }
            exp_elog_beta = exp_dirichlet_expectation_rows(&components);

            debug!(pass = pass + 1, total = params.max_iter, "LDA EM pass complete");
            on_pass(pass + 1, params.max_iter);
        }

        Ok(Self {
            n_topics: k,
            doc_topic_prior,
            topic_word_prior,
            n_iter: params.max_iter,
            components,
        })
    }

    /// (n_topics, vocabulary_size)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_topics, self.vocabulary_size())
    }

    pub fn n_topics(&self) -> usize {
        self.n_topics
    }

    pub fn vocabulary_size(&self) -> usize {
        self.components.first().map_or(0, Vec::len)
    }

    pub fn doc_topic_prior(&self) -> f64 {
        self.doc_topic_prior
    }

    pub fn topic_word_prior(&self) -> f64 {
        self.topic_word_prior
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Check the structural invariants of a deserialized model.
    pub fn validate(&self) -> Result<()> {
        if self.components.len() != self.n_topics {
            anyhow::bail!(
                "Model declares {} topics but stores {} weight rows",
                self.n_topics,
                self.components.len()
            );
        }
        let v = self.vocabulary_size();
        for (t, row) in self.components.iter().enumerate() {
            if row.len() != v {
                anyhow::bail!("Topic {t} has {} weights, expected {v}", row.len());
            }
            if row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                anyhow::bail!("Topic {t} has a negative or non-finite weight");
            }
        }
        Ok(())
    }
}

impl TopicModel for LdaModel {
    fn components(&self) -> &[Vec<f64>] {
        &self.components
    }
}

/// One E-step over the whole corpus. Returns the sufficient statistics
/// before they are scaled by exp(E[log beta]).
fn e_step(
    dtm: &DocumentTermMatrix,
    exp_elog_beta: &[Vec<f64>],
    doc_topic_prior: f64,
    params: &LdaParams,
    gamma: &Gamma<f64>,
    rng: &mut StdRng,
) -> Vec<Vec<f64>> {
    let k = exp_elog_beta.len();
    let v = dtm.n_terms();
    let mut sstats = vec![vec![0.0f64; v]; k];

    // Scratch buffers reused across documents
    let mut doc_topic = vec![0.0f64; k];
    let mut exp_doc_topic = vec![0.0f64; k];
    let mut last = vec![0.0f64; k];

    for row in dtm.rows() {
        // Every document draws its starting mixture, empty or not, so the
        // random stream does not depend on which rows are empty
        for value in doc_topic.iter_mut() {
            *value = gamma.sample(rng);
        }
        if row.is_empty() {
            continue;
        }
        exp_dirichlet_expectation(&doc_topic, &mut exp_doc_topic);

        let ids: Vec<usize> = row.iter().map(|&(col, _)| col).collect();
        let cnts: Vec<f64> = row.iter().map(|&(_, c)| c as f64).collect();
        let mut norm_phi = vec![0.0f64; ids.len()];

        for _ in 0..params.max_doc_update_iter {
            last.copy_from_slice(&doc_topic);

            compute_norm_phi(&exp_doc_topic, exp_elog_beta, &ids, &mut norm_phi);
            for t in 0..k {
                let dot: f64 = ids
                    .iter()
                    .zip(&cnts)
                    .zip(&norm_phi)
                    .map(|((&w, &c), &n)| c / n * exp_elog_beta[t][w])
                    .sum();
                doc_topic[t] = exp_doc_topic[t] * dot + doc_topic_prior;
            }
            exp_dirichlet_expectation(&doc_topic, &mut exp_doc_topic);

            if mean_change(&last, &doc_topic) < params.mean_change_tol {
                break;
            }
        }

        compute_norm_phi(&exp_doc_topic, exp_elog_beta, &ids, &mut norm_phi);
        for t in 0..k {
            for ((&w, &c), &n) in ids.iter().zip(&cnts).zip(&norm_phi) {
                sstats[t][w] += exp_doc_topic[t] * c / n;
            }
        }
    }

    sstats
}

fn compute_norm_phi(exp_doc_topic: &[f64], exp_elog_beta: &[Vec<f64>], ids: &[usize], out: &mut [f64]) {
    for (slot, &w) in out.iter_mut().zip(ids) {
        *slot = exp_doc_topic
            .iter()
            .zip(exp_elog_beta)
            .map(|(&theta, beta)| theta * beta[w])
            .sum::<f64>()
            + EPS;
    }
}

/// exp(E[log X]) for X ~ Dirichlet(alpha), written into `out`.
fn exp_dirichlet_expectation(alpha: &[f64], out: &mut [f64]) {
    let psi_total = digamma(alpha.iter().sum());
    for (o, &a) in out.iter_mut().zip(alpha) {
        *o = (digamma(a) - psi_total).exp();
    }
}

/// Row-wise exp(E[log beta]) of a topic-word parameter matrix.
fn exp_dirichlet_expectation_rows(alpha: &[Vec<f64>]) -> Vec<Vec<f64>> {
    alpha
        .iter()
        .map(|row| {
            let mut out = vec![0.0; row.len()];
            exp_dirichlet_expectation(row, &mut out);
            out
        })
        .collect()
}

fn mean_change(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / a.len() as f64
}

/// Digamma function for positive arguments.
///
/// Shifts small arguments up with the recurrence psi(x) = psi(x + 1) - 1/x,
/// then applies the asymptotic series.
pub fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let f = 1.0 / (x * x);
    result + x.ln()
        - 0.5 / x
        - f * (1.0 / 12.0 - f * (1.0 / 120.0 - f * (1.0 / 252.0 - f * (1.0 / 240.0 - f / 132.0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::stopwords::StopWordList;
    use crate::topics::vectorizer::{CountVectorizer, VectorizerParams};

    fn corpus() -> Vec<&'static str> {
        vec![
            "cricket test match australia wins",
            "cricket captain test series",
            "australia cricket series win",
            "council rates budget vote",
            "council budget water rates",
            "water council plan budget",
            "cricket match captain injured",
            "budget rates rise council",
        ]
    }

    fn fitted(seed: u64) -> (CountVectorizer, LdaModel) {
        let params = VectorizerParams {
            min_df: 1,
            max_df: 1.0,
            stop_words: StopWordList::Sklearn,
        };
        let (v, dtm) = CountVectorizer::fit_transform(params, &corpus()).unwrap();
        let lda = LdaParams {
            n_topics: 2,
            seed,
            ..LdaParams::default()
        };
        (v, LdaModel::fit(&dtm, &lda).unwrap())
    }

    #[test]
    fn digamma_matches_known_values() {
        // psi(1) = -gamma (Euler–Mascheroni)
        assert!((digamma(1.0) + 0.577_215_664_901_532_9).abs() < 1e-10);
        // psi(0.5) = -gamma - 2 ln 2
        assert!((digamma(0.5) + 1.963_510_026_021_423_5).abs() < 1e-10);
        assert!((digamma(10.0) - 2.251_752_589_066_721_2).abs() < 1e-10);
    }

    #[test]
    fn components_have_topic_by_vocabulary_shape() {
        let (v, model) = fitted(42);
        assert_eq!(model.shape(), (2, v.vocabulary_size()));
        model.validate().unwrap();
    }

    #[test]
    fn fitting_is_deterministic_for_a_seed() {
        let (_, a) = fitted(42);
        let (_, b) = fitted(42);
        assert_eq!(a.components, b.components);
    }

    #[test]
    fn different_seeds_give_different_components() {
        let (_, a) = fitted(42);
        let (_, b) = fitted(7);
        assert_ne!(a.components, b.components);
    }

    #[test]
    fn weights_are_at_least_the_prior() {
        let (_, model) = fitted(42);
        for row in &model.components {
            for &w in row {
                assert!(w >= model.topic_word_prior());
            }
        }
    }

    #[test]
    fn pseudo_counts_sum_to_corpus_size() {
        // Each token's responsibility is split across topics and sums to 1,
        // so total mass equals token count plus the prior mass.
        let params = VectorizerParams {
            min_df: 1,
            max_df: 1.0,
            stop_words: StopWordList::Sklearn,
        };
        let (v, dtm) = CountVectorizer::fit_transform(params, &corpus()).unwrap();
        let model = LdaModel::fit(&dtm, &LdaParams { n_topics: 2, ..LdaParams::default() }).unwrap();
        let total: f64 = model.components.iter().flatten().sum();
        let expected = dtm.total() as f64 + 2.0 * v.vocabulary_size() as f64 * model.topic_word_prior();
        assert!((total - expected).abs() < 1e-6 * expected, "{total} vs {expected}");
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let model = LdaModel {
            n_topics: 2,
            doc_topic_prior: 0.5,
            topic_word_prior: 0.5,
            n_iter: 1,
            components: vec![vec![1.0, 2.0], vec![1.0]],
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn rejects_zero_topics() {
        let params = VectorizerParams {
            min_df: 1,
            max_df: 1.0,
            stop_words: StopWordList::Sklearn,
        };
        let (_, dtm) = CountVectorizer::fit_transform(params, &corpus()).unwrap();
        let result = LdaModel::fit(&dtm, &LdaParams { n_topics: 0, ..LdaParams::default() });
        assert!(result.is_err());
    }
}
