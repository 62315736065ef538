use crate::domain::price::{PriceRow, PriceSeries};
use tracing::{debug, warn};

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";

/// Lenient parser for daily `Date`/`Close` tables.
///
/// Upstream feeds are not guaranteed to be clean, so nothing here fails: an
/// unusable source yields an empty series and malformed rows are skipped.
#[derive(Debug, Clone)]
pub struct PriceCsvParser {
    delimiter: u8,
}

impl Default for PriceCsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl PriceCsvParser {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn parse(&self, text: &str) -> PriceSeries {
        // The csv reader accepts \n, \r\n and bare \r as record terminators
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .delimiter(self.delimiter)
            .from_reader(text.trim().as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                warn!("PriceCsvParser: unreadable header row: {}", e);
                return Vec::new();
            }
        };

        let date_idx = headers.iter().position(|h| h == DATE_COLUMN);
        let close_idx = headers.iter().position(|h| h == CLOSE_COLUMN);
        let (Some(date_idx), Some(close_idx)) = (date_idx, close_idx) else {
            debug!(
                "PriceCsvParser: missing {}/{} columns in header {:?}",
                DATE_COLUMN, CLOSE_COLUMN, headers
            );
            return Vec::new();
        };

        let mut skipped = 0usize;
        let rows: PriceSeries = reader
            .records()
            .filter_map(|record| {
                let row = record
                    .ok()
                    .and_then(|record| parse_row(&record, date_idx, close_idx));
                if row.is_none() {
                    skipped += 1;
                }
                row
            })
            .collect();

        if skipped > 0 {
            debug!("PriceCsvParser: dropped {} malformed rows", skipped);
        }
        rows
    }
}

fn parse_row(record: &csv::StringRecord, date_idx: usize, close_idx: usize) -> Option<PriceRow> {
    let date = record.get(date_idx)?;
    if date.is_empty() {
        return None;
    }

    let close: f64 = record.get(close_idx)?.trim().parse().ok()?;
    if !close.is_finite() || close <= 0.0 {
        return None;
    }

    Some(PriceRow {
        date: date.to_string(),
        close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> PriceSeries {
        PriceCsvParser::default().parse(text)
    }

    #[test]
    fn test_parses_stooq_layout() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2026-10-14,3880.1,3901.2,3870.0,3895.5,1000\n\
                   2026-10-15,3895.5,3910.0,3890.4,3902.25,1200\n";
        let rows = parse(csv);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2026-10-14");
        assert_eq!(rows[1].close, 3902.25);
    }

    #[test]
    fn test_column_order_is_free() {
        let rows = parse("Close,Volume,Date\n10.5,1,2026-01-02\n11,2,2026-01-03");
        assert_eq!(
            rows,
            vec![
                PriceRow {
                    date: "2026-01-02".to_string(),
                    close: 10.5
                },
                PriceRow {
                    date: "2026-01-03".to_string(),
                    close: 11.0
                },
            ]
        );
    }

    #[test]
    fn test_missing_columns_yield_empty_series() {
        assert!(parse("Day,Close\n2026-01-02,10").is_empty());
        assert!(parse("Date,Open\n2026-01-02,10").is_empty());
        // Header match is exact
        assert!(parse("date,close\n2026-01-02,10").is_empty());
        assert!(parse("No data").is_empty());
    }

    #[test]
    fn test_header_only_or_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("Date,Close").is_empty());
        assert!(parse("  \n Date,Close \n ").is_empty());
    }

    #[test]
    fn test_any_newline_style() {
        let rows = parse("Date,Close\r\n2026-01-02,10\r\n2026-01-03,11\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].close, 11.0);

        let rows = parse("Date,Close\n2026-01-02,10\r\n2026-01-03,11");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let csv = "Date,Close\n\
                   2026-01-02,10\n\
                   ,11\n\
                   2026-01-04,abc\n\
                   2026-01-05,NaN\n\
                   2026-01-06,inf\n\
                   2026-01-07\n\
                   2026-01-08,0\n\
                   2026-01-09,-3\n\
                   2026-01-10,12";
        let rows = parse(csv);
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-02", "2026-01-10"]);
    }

    #[test]
    fn test_stray_quote_only_affects_its_own_row() {
        let rows = parse("Date,Close\n\"2024-01-01,10\n2024-01-02,11\n2024-01-03,12");
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["\"2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(rows[2].close, 12.0);
    }

    #[test]
    fn test_source_order_is_preserved() {
        let rows = parse("Date,Close\n2026-01-05,1\n2026-01-02,2\n2026-01-03,3");
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-05", "2026-01-02", "2026-01-03"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let rows = PriceCsvParser::with_delimiter(b';').parse("Date;Close\n2026-01-02;10.25");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 10.25);
    }
}
