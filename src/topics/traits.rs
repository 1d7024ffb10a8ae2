// Topic model trait.
//
// Summaries and renderers only need the topic-by-term weight matrix, so they
// take anything that exposes one rather than the LDA type itself.

/// A fitted model with one non-negative weight vector per topic.
pub trait TopicModel {
    /// Weight rows, one per topic, each as long as the vocabulary.
    fn components(&self) -> &[Vec<f64>];

    fn topic_count(&self) -> usize {
        self.components().len()
    }
}
