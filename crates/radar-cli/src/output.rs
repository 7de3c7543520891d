//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use radar_core::{AnalysisResult, Sentiment, SentimentDistribution};
use unicode_width::UnicodeWidthStr;

const BAR_WIDTH: usize = 20;
const TOPIC_WIDTH: usize = 22;

/// Print the full report as a terminal dashboard.
pub fn print_analysis(result: &AnalysisResult) {
    println!();
    match &result.website_url {
        Some(url) => println!("{}  {}", result.company_name.cyan().bold(), url.dimmed()),
        None => println!("{}", result.company_name.cyan().bold()),
    }
    println!();

    let tone = Sentiment::from_score(result.overall_score as f64);
    println!(
        "{}  {}  {}",
        "Overall score".bold(),
        tinted(&format!("{:>3}/100", result.overall_score), tone).bold(),
        tinted(&bar(result.overall_score as f64, 100.0, BAR_WIDTH), tone)
    );
    print_distribution(&result.sentiment_distribution);
    println!();

    for line in wrap(&result.summary, term_width().saturating_sub(2)) {
        println!("  {}", line);
    }

    if !result.pros.is_empty() {
        println!();
        println!("{}", "Pros".bold());
        for pro in &result.pros {
            println!("  {} {}", "+".green().bold(), pro);
        }
    }

    if !result.cons.is_empty() {
        println!();
        println!("{}", "Cons".bold());
        for con in &result.cons {
            println!("  {} {}", "-".red().bold(), con);
        }
    }

    if !result.topics.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} {:>5}  {:<10}  {}", pad_right("Topic", TOPIC_WIDTH), "Score", "Volume", "Summary").bold()
        );
        println!("{}", "─".repeat(term_width().min(100)));

        let summary_width = term_width().saturating_sub(TOPIC_WIDTH + 20).max(20);
        for topic in &result.topics {
            println!(
                "{} {:>5}  {:<10}  {}",
                pad_right(&truncate_visual(&topic.topic, TOPIC_WIDTH), TOPIC_WIDTH),
                tinted(&format!("{:.0}", topic.sentiment_score), topic.tone()),
                bar(topic.volume, 10.0, 10).dimmed(),
                truncate_visual(&topic.summary, summary_width)
            );
        }
    }

    if !result.reviews.is_empty() {
        println!();
        println!(
            "{}  {}",
            "Sources".bold(),
            format!(
                "{} positive · {} neutral · {} negative",
                result.review_count(Sentiment::Positive),
                result.review_count(Sentiment::Neutral),
                result.review_count(Sentiment::Negative)
            )
            .dimmed()
        );
        for review in &result.reviews {
            let mut header = format!("{}", review.platform.bold());
            if let Some(date) = &review.date {
                header.push_str(&format!(" · {}", date).dimmed().to_string());
            }
            println!(
                "  {} {}",
                tinted(&format!("[{}]", review.sentiment), review.sentiment),
                header
            );
            println!("    \"{}\"", review.snippet);
            if let Some(url) = &review.url {
                println!("    {}", url.dimmed());
            }
        }
    }
    println!();
}

/// Print the error state.
pub fn print_failure(message: &str) {
    eprintln!();
    eprintln!("{} {}", "✗".red().bold(), "Analysis Failed".red().bold());
    eprintln!("  {}", message);
    eprintln!();
}

/// Print validation warnings, if any.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("{} {} warning(s):", "!".yellow(), warnings.len());
    for warning in warnings {
        println!("  {} {}", "•".dimmed(), warning);
    }
}

fn print_distribution(dist: &SentimentDistribution) {
    println!(
        "{}   {}  {}  {}",
        "Distribution".bold(),
        format!("{:.0}% positive", dist.positive).green(),
        format!("{:.0}% neutral", dist.neutral).dimmed(),
        format!("{:.0}% negative", dist.negative).red()
    );
}

fn tinted(text: &str, sentiment: Sentiment) -> ColoredString {
    match sentiment {
        Sentiment::Positive => text.green(),
        Sentiment::Neutral => text.yellow(),
        Sentiment::Negative => text.red(),
    }
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`.
fn bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Greedy word wrap to a visual width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(20);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = UnicodeWidthStr::width(line.as_str()) + UnicodeWidthStr::width(word) + 1;
        if !line.is_empty() && needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
