// Count vectorizer — headlines in, sparse document-term counts out.
//
// The vocabulary keeps terms that appear in at least `min_df` documents and
// in no more than `max_df` (a fraction) of them. Columns are ordered
// alphabetically by term, so column index order is also lexical order.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stopwords::StopWordList;
use super::tokenizer::Tokenizer;

/// Vocabulary pruning and tokenization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in
    pub max_df: f64,
    pub stop_words: StopWordList,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            min_df: 2,
            max_df: 0.9,
            stop_words: StopWordList::Sklearn,
        }
    }
}

/// Sparse document-term count matrix.
///
/// Each row lists `(column, count)` pairs in ascending column order; columns
/// absent from a row have count zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    rows: Vec<Vec<(usize, u32)>>,
    n_terms: usize,
}

impl DocumentTermMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_terms)
    }

    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, u32)]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|&(_, c)| c as u64))
            .sum()
    }
}

/// A fitted count vectorizer. Persisted as the `vectorizer.json` artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Terms in column order
    terms: Vec<String>,
    /// Document frequency per column, measured on the fitting corpus
    document_frequencies: Vec<usize>,
    /// Documents seen during fitting
    n_documents: usize,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CountVectorizer {
    /// Build the vocabulary from `docs` and return their count matrix.
    pub fn fit_transform(params: VectorizerParams, docs: &[&str]) -> Result<(Self, DocumentTermMatrix)> {
        if docs.is_empty() {
            anyhow::bail!("Cannot fit a vectorizer on an empty corpus");
        }
        if !(0.0..=1.0).contains(&params.max_df) {
            anyhow::bail!("max_df must be a fraction in [0, 1], got {}", params.max_df);
        }

        let n_docs = docs.len();
        let max_doc_count = params.max_df * n_docs as f64;
        if max_doc_count < params.min_df as f64 {
            anyhow::bail!(
                "max_df corresponds to {max_doc_count:.1} documents, fewer than min_df ({})",
                params.min_df
            );
        }

        let tokenizer = Tokenizer::new(params.stop_words)?;
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenizer.tokenize(d)).collect();

        // BTreeMap keeps candidate terms in lexical order for column assignment
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &tokenized {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        let candidates = doc_freq.len();

        let (terms, document_frequencies): (Vec<String>, Vec<usize>) = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= params.min_df && (df as f64) <= max_doc_count)
            .map(|(term, df)| (term.to_string(), df))
            .unzip();

        if terms.is_empty() {
            anyhow::bail!(
                "After pruning, no terms remain ({candidates} candidates, min_df={}, max_df={})",
                params.min_df,
                params.max_df
            );
        }

        info!(
            documents = n_docs,
            candidates,
            vocabulary = terms.len(),
            "Built vocabulary"
        );

        let index = build_index(&terms);
        let vectorizer = Self {
            params,
            terms,
            document_frequencies,
            n_documents: n_docs,
            index,
        };
        let dtm = vectorizer.count(&tokenized);
        Ok((vectorizer, dtm))
    }

    /// Count vocabulary terms in new documents. Unknown terms are ignored.
    pub fn transform(&self, docs: &[&str]) -> Result<DocumentTermMatrix> {
        let tokenizer = Tokenizer::new(self.params.stop_words)?;
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenizer.tokenize(d)).collect();
        Ok(self.count(&tokenized))
    }

    fn count(&self, tokenized: &[Vec<String>]) -> DocumentTermMatrix {
        let rows = tokenized
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for term in doc {
                    if let Some(&col) = self.index.get(term) {
                        *counts.entry(col).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();
        DocumentTermMatrix {
            rows,
            n_terms: self.terms.len(),
        }
    }

    /// Rebuild the term lookup after deserialization.
    pub(crate) fn reindex(&mut self) {
        self.index = build_index(&self.terms);
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    /// Vocabulary terms in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.terms
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.index_of(term).map(|i| self.document_frequencies[i])
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

fn build_index(terms: &[String]) -> HashMap<String, usize> {
    terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect()
}
