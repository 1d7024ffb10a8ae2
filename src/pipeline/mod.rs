// Offline pipelines. Training is the only one: it turns the headline corpus
// into the two artifacts the presentation side reads.

pub mod train;
