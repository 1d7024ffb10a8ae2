// Topic modeling — tokenization, count vectorization, LDA and summaries.

pub mod lda;
pub mod stopwords;
pub mod summary;
pub mod tokenizer;
pub mod traits;
pub mod vectorizer;
