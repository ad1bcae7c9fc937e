use chrono::NaiveDate;
use colored::*;
use itertools::Itertools;

use crate::apod::{ApodRecord, MediaType};

/// Number of explanation words shown on a card.
pub const PREVIEW_WORDS: usize = 40;

/// Human date as shown on cards, e.g. "March 15, 2024".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn preview(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
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

fn media_badge(media_type: MediaType) -> ColoredString {
    let label = format!("[{}]", media_type);
    match media_type {
        MediaType::Image => label.cyan(),
        MediaType::Video => label.magenta(),
        MediaType::Other => label.yellow(),
    }
}

fn date_badge(date: NaiveDate) -> ColoredString {
    format!("[{}]", format_display_date(date)).dimmed()
}

/// One gallery card. `index` is the 1-based number used by `show`.
pub fn render_card(index: usize, record: &ApodRecord, width: usize) -> String {
    let header = format!(
        "{} {} {}",
        format!("{:>3}.", index).bold(),
        date_badge(record.date),
        media_badge(record.media_type)
    );
    let body = wrap(&preview(&record.explanation, PREVIEW_WORDS), width.saturating_sub(5))
        .iter()
        .map(|line| format!("     {}", line.dimmed()))
        .join("\n");

    if body.is_empty() {
        format!("{}\n     {}", header, record.title.bold())
    } else {
        format!("{}\n     {}\n{}", header, record.title.bold(), body)
    }
}

pub fn render_gallery(records: &[ApodRecord], width: usize) -> String {
    if records.is_empty() {
        return format!("{}", "No images found.".yellow());
    }
    records
        .iter()
        .enumerate()
        .map(|(i, record)| render_card(i + 1, record, width))
        .join("\n\n")
}

/// Full view of a single record.
pub fn render_detail(record: &ApodRecord, width: usize) -> String {
    let mut out = vec![
        format!("{} {}", date_badge(record.date), media_badge(record.media_type)),
        format!("{}", record.title.bold().underline()),
        String::new(),
        format!("{} {}", if record.is_image() { "Image:" } else { "Media:" }, record.display_url().blue()),
        String::new(),
    ];
    out.extend(wrap(&record.explanation, width));
    if let Some(copyright) = record.copyright() {
        out.push(String::new());
        out.push(format!("{}", format!("© {}", copyright).dimmed()));
    }
    out.join("\n")
}
