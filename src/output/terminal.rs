// Colored terminal output for topic summaries and training runs.

use colored::Colorize;

use crate::pipeline::train::TrainingReport;
use crate::topics::summary::TopicSummary;

/// Display discovered topics as labeled keyword groups.
pub fn display_topics(topics: &[TopicSummary]) {
    if topics.is_empty() {
        println!("The model has no topics.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} Topics Discovered in the Headlines ===", topics.len()).bold()
    );
    println!();

    let bar_width: usize = 20;
    let max_share = topics.iter().map(|t| t.share).fold(0.0f64, f64::max);

    for topic in topics {
        // Bars are scaled to the largest topic so small differences stay visible
        let relative = if max_share > 0.0 { topic.share / max_share } else { 0.0 };
        let filled = (relative * bar_width as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(bar_width.saturating_sub(filled))
        );

        println!(
            "  {:<10} {} {:>5.1}%",
            topic.label.bold(),
            bar.bright_blue(),
            topic.share * 100.0
        );
        println!("      {}", topic.joined_terms().dimmed());
        println!();
    }
}

/// Summarize a finished training run.
pub fn display_training_report(report: &TrainingReport) {
    println!();
    println!("  Rows in corpus:   {}", report.rows_read);
    println!("  Rows sampled:     {}", report.rows_sampled);
    println!("  Vocabulary size:  {}", report.vocabulary_size);
    println!("  Tokens counted:   {}", report.tokens);
    println!(
        "  Model shape:      {} topics x {} terms",
        report.model_shape.0, report.model_shape.1
    );
    println!("  EM passes:        {}", report.em_passes);
    println!(
        "  Priors:           alpha={:.3} eta={:.3}",
        report.priors.0, report.priors.1
    );
    println!("  Vectorizer:       {}", report.paths.vectorizer.display());
    println!("  Model:            {}", report.paths.model.display());
}

/// Print an operator-facing error in the standard style.
pub fn display_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}
