// newstopics: topic modeling over news headlines.
//
// This is the library root. The training side (corpus, topics, pipeline)
// produces two artifacts; the presentation side (artifacts::cache, output,
// web) reads them back and shows the discovered topics.

pub mod artifacts;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
