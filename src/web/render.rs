// Server-side HTML for the single-page topic viewer.
//
// Two tabs, switched with CSS only (radio inputs + labels): the discovered
// topics, and a static project description. When artifacts are missing the
// page renders an error banner in place of the topic grid.

use maud::{html, Markup, DOCTYPE};

use crate::topics::summary::TopicSummary;

pub const PAGE_TITLE: &str = "Discovering Hidden Topics in News Headlines";

const LDA_IMAGE_URL: &str =
    "https://miro.medium.com/v2/resize:fit:1400/format:webp/1*0fUaG3pS2T133IpHs3G2Zw.png";

const LDA_IMAGE_CAPTION: &str = "Conceptual overview of LDA";

/// What the topics tab should show.
pub enum PageBody<'a> {
    Topics {
        topics: &'a [TopicSummary],
        sample_size: usize,
    },
    Error(&'a str),
}

/// Render the full page.
#[must_use]
pub fn render_page(body: &PageBody<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Topic Modeling on News Headlines" }
                link rel="stylesheet" href="/static/style.css";
            }
            body {
                main {
                    h1 { (PAGE_TITLE) }
                    @match body {
                        PageBody::Error(message) => {
                            div.banner.error role="alert" { (message) }
                        }
                        PageBody::Topics { topics, sample_size } => {
                            div.tabs {
                                input type="radio" name="tab" id="tab-topics" checked;
                                label for="tab-topics" { "Discovered Topics" }
                                input type="radio" name="tab" id="tab-about";
                                label for="tab-about" { "Project Details" }
                                section.panel #panel-topics { (render_topics(topics, *sample_size)) }
                                section.panel #panel-about { (render_about()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_topics(topics: &[TopicSummary], sample_size: usize) -> Markup {
    let count = topics.len();
    html! {
        h2 { "The " (count) " Main Topics Found by the Model" }
        p {
            "The LDA model analyzed " (sample_size) " news headlines and found the "
            (count) " hidden topics below, together with the keywords that best "
            "describe each one, entirely on its own."
        }
        hr;
        div.grid {
            @for topic in topics {
                div.topic {
                    h3 { (topic.label) }
                    p.terms { (topic.joined_terms()) }
                }
            }
        }
    }
}

fn render_about() -> Markup {
    html! {
        h2 { "Project Goals and Technical Details" }
        p {
            "The goal of this project is a " strong { "topic modeling" }
            " system that automatically discovers abstract \"topics\" inside a large collection of text."
        }
        ul {
            li {
                strong { "Method:" } " this is an " strong { "unsupervised learning" }
                " project. The model was never told that a headline is about sport or politics. "
                "It found these groups on its own by looking at which words tend to appear together."
            }
            li {
                strong { "Model:" } " " strong { "LDA (Latent Dirichlet Allocation)" }
                " is one of the most widely used probabilistic topic models. It assumes every "
                "document is a mixture of several topics, and every topic is a distribution over words."
            }
            li {
                strong { "Key technical detail:" } " before the text reaches the model, a "
                strong { "count vectorizer" }
                " turns it into numbers by counting how often each word occurs in each headline. "
                "The resulting document-term matrix is the input to LDA."
            }
        }
        figure {
            img src=(LDA_IMAGE_URL) alt=(LDA_IMAGE_CAPTION);
            figcaption { (LDA_IMAGE_CAPTION) }
        }
    }
}
