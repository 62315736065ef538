//! Plain-text rendering of the published board.

use crate::application::snapshot_store::BoardSnapshot;
use crate::domain::market::{MarketItem, format_data_time};
use std::fmt::Write;

const DASH: &str = "—";
const SCORE_SUFFIX: &str = "/ 100";
const BAR_WIDTH: usize = 20;

/// Which side of neutral a score leans to; scores up to 50 lean to fear.
pub fn bias_label(score: Option<u8>) -> &'static str {
    match score {
        None => "Loading",
        Some(s) if s <= 50 => "Fear-leaning",
        Some(_) => "Greed-leaning",
    }
}

fn score_bar(score: Option<u8>) -> String {
    let filled = score.map_or(0, |s| usize::from(s.min(100)) * BAR_WIDTH / 100);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// One card: name, score, bucket, bias, then source and data time.
pub fn render_item(item: &MarketItem) -> String {
    let score = item
        .score
        .map_or_else(|| DASH.to_string(), |s| s.to_string());
    let bucket = item
        .bucket
        .map_or_else(|| DASH.to_string(), |b| b.to_string());

    let mut meta: Vec<String> = Vec::new();
    if let Some(source) = item.source {
        meta.push(format!("Source: {}", source));
    }
    if let Some(rating) = item.original_rating {
        meta.push(format!("Raw rating: {}", rating));
    }
    if !item.data_time.is_empty() {
        meta.push(format!("Data time: {}", item.data_time));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:>6}  {:>3} {}  {} {:<13} ({})",
        item.id.display_name(),
        item.id.tag(),
        score,
        SCORE_SUFFIX,
        score_bar(item.score),
        bucket,
        bias_label(item.score)
    );
    if !meta.is_empty() {
        let _ = writeln!(out, "    {}", meta.join(" · "));
    }
    out
}

pub fn render_board(board: &BoardSnapshot) -> String {
    let refreshed = board
        .refreshed_at
        .as_ref()
        .map_or_else(|| DASH.to_string(), format_data_time);

    let mut out = String::new();
    let _ = writeln!(out, "Fear & Greed Index (Markets: US, HK, CN, Crypto)");
    let _ = writeln!(out, "Last refresh: {}", refreshed);
    for item in &board.items {
        out.push_str(&render_item(item));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{MarketId, SourceLabel};
    use crate::domain::sentiment::SentimentBucket;

    #[test]
    fn test_bias_label() {
        assert_eq!(bias_label(None), "Loading");
        assert_eq!(bias_label(Some(50)), "Fear-leaning");
        assert_eq!(bias_label(Some(51)), "Greed-leaning");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(None), format!("[{}]", ".".repeat(20)));
        assert_eq!(score_bar(Some(100)), format!("[{}]", "#".repeat(20)));
        assert_eq!(score_bar(Some(50)), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
    }

    #[test]
    fn test_render_placeholder() {
        let text = render_item(&MarketItem::placeholder(MarketId::Hk));
        assert!(text.contains("HK Fear & Greed Index"));
        assert!(text.contains(DASH));
        assert!(text.contains("Loading"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_render_externally_rated_item() {
        let item = MarketItem {
            id: MarketId::Us,
            score: Some(62),
            bucket: Some(SentimentBucket::Greed),
            original_rating: Some(SentimentBucket::Greed),
            source: Some(SourceLabel::Cnn),
            data_time: "2026-10-16 23:59".to_string(),
        };
        let text = render_item(&item);
        assert!(text.contains("62 / 100"));
        assert!(text.contains("Greed-leaning"));
        assert!(text.contains("Source: CNN (via dataviz) · Raw rating: Greed · Data time: 2026-10-16 23:59"));
    }

    #[test]
    fn test_render_board_header() {
        let board = BoardSnapshot::initial(&MarketId::ALL);
        let text = render_board(&board);
        assert!(text.contains("Last refresh: —"));
        assert_eq!(text.lines().count(), 2 + 4);
    }
}
