use feargreed::domain::market::{MarketId, SourceLabel};
use feargreed::domain::ports::TextRetriever;
use feargreed::domain::sentiment::{SentimentBucket, SentimentProvider};
use feargreed::infrastructure::core::ProxyRetriever;
use feargreed::infrastructure::core::retrieval::DEFAULT_PROXY_BASE;
use feargreed::infrastructure::mock::MockRetriever;
use feargreed::infrastructure::observability::Metrics;
use feargreed::infrastructure::sentiment::AlternativeMeSentimentProvider;
use feargreed::infrastructure::sentiment::alternative_me::DEFAULT_ALTERNATIVE_ME_URL;
use feargreed::infrastructure::stooq::{DEFAULT_STOOQ_BASE_URL, StooqSentimentProvider};
use feargreed::infrastructure::RetrievalChain;
use std::fmt::Write;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok, block_on};

const CRYPTO_BODY: &str = r#"{"name":"Fear and Greed Index","data":[{"value":"15","value_classification":"Extreme Fear","timestamp":"1700000000","time_until_update":"3600"}]}"#;

fn proxy_wrapped(body: &str) -> String {
    format!(
        "Title: \n\nURL Source: http://upstream\n\nMarkdown Content:\n{}\n",
        body
    )
}

/// Direct strategy answering `direct`, proxy strategy backed by `transport`.
fn chain(direct: Arc<MockRetriever>, transport: Arc<MockRetriever>) -> RetrievalChain {
    let proxy: Arc<dyn TextRetriever> = Arc::new(ProxyRetriever::new(transport, DEFAULT_PROXY_BASE));
    RetrievalChain::new(vec![direct as Arc<dyn TextRetriever>, proxy])
}

fn index_csv(rows: usize) -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    for i in 0..rows {
        let close = 20_000.0 + 10.0 * i as f64;
        writeln!(csv, "2024-{:02}-{:02},0,0,0,{},0", 1 + i / 28 % 12, 1 + i % 28, close).unwrap();
    }
    csv
}

#[test]
fn test_crypto_via_proxy_matches_direct() {
    let direct_ok = chain(
        Arc::new(MockRetriever::ok("direct", CRYPTO_BODY)),
        Arc::new(MockRetriever::failing("transport", 500)),
    );
    let transport = Arc::new(MockRetriever::ok("transport", proxy_wrapped(CRYPTO_BODY)));
    let direct_blocked = chain(
        Arc::new(MockRetriever::failing("direct", 403)),
        transport.clone(),
    );

    let direct_item = assert_ok!(block_on(
        AlternativeMeSentimentProvider::new(direct_ok, DEFAULT_ALTERNATIVE_ME_URL).fetch_sentiment()
    ));
    let proxied_item = assert_ok!(block_on(
        AlternativeMeSentimentProvider::new(direct_blocked, DEFAULT_ALTERNATIVE_ME_URL)
            .fetch_sentiment()
    ));

    assert_eq!(direct_item, proxied_item);
    assert_eq!(proxied_item.score, Some(15));
    assert_eq!(proxied_item.bucket, Some(SentimentBucket::ExtremeFear));
    assert_eq!(proxied_item.source, Some(SourceLabel::AlternativeMe));
    assert_eq!(
        transport.requested_urls(),
        vec!["https://r.jina.ai/http://api.alternative.me/fng/?limit=1&format=json".to_string()]
    );
}

#[test]
fn test_stooq_via_proxy_matches_direct() {
    let csv = index_csv(120);
    let direct_ok = chain(
        Arc::new(MockRetriever::ok("direct", csv.clone())),
        Arc::new(MockRetriever::failing("transport", 500)),
    );
    let transport = Arc::new(MockRetriever::ok("transport", proxy_wrapped(&csv)));
    let direct_blocked = chain(
        Arc::new(MockRetriever::failing("direct", 429)),
        transport.clone(),
    );

    let direct_item = assert_ok!(block_on(
        StooqSentimentProvider::new(MarketId::Hk, "^hsi", DEFAULT_STOOQ_BASE_URL, direct_ok)
            .fetch_sentiment()
    ));
    let proxied_item = assert_ok!(block_on(
        StooqSentimentProvider::new(MarketId::Hk, "^hsi", DEFAULT_STOOQ_BASE_URL, direct_blocked)
            .fetch_sentiment()
    ));

    assert_eq!(direct_item, proxied_item);
    assert_eq!(proxied_item.id, MarketId::Hk);
    assert!(proxied_item.score.is_some());
    assert_eq!(proxied_item.source, Some(SourceLabel::StooqComputed));
    assert_eq!(
        transport.requested_urls(),
        vec!["https://r.jina.ai/http://stooq.com/q/d/l/?s=%5Ehsi&i=d".to_string()]
    );
}

#[test]
fn test_stooq_no_data_still_publishes_an_unscored_item() {
    let chain = chain(
        Arc::new(MockRetriever::ok("direct", "No data")),
        Arc::new(MockRetriever::failing("transport", 500)),
    );
    let item = assert_ok!(block_on(
        StooqSentimentProvider::new(MarketId::Cn, "^shc", DEFAULT_STOOQ_BASE_URL, chain)
            .fetch_sentiment()
    ));

    assert_eq!(item.id, MarketId::Cn);
    assert_eq!(item.score, None);
    assert_eq!(item.bucket, None);
    assert_eq!(item.source, Some(SourceLabel::StooqComputed));
}

#[test]
fn test_all_strategies_failing_is_an_error() {
    let metrics = Metrics::new().unwrap();
    let transport = Arc::new(MockRetriever::failing("transport", 502));
    let chain = chain(Arc::new(MockRetriever::failing("direct", 403)), transport.clone())
        .with_metrics(metrics.clone());

    let outcome = block_on(
        AlternativeMeSentimentProvider::new(chain, DEFAULT_ALTERNATIVE_ME_URL).fetch_sentiment(),
    );

    let err = assert_err!(outcome);
    let message = format!("{:#}", err);
    assert!(message.contains("502"), "last error should win: {}", message);
    assert_eq!(transport.calls(), 1);
    assert_eq!(metrics.fallbacks_total("proxy"), 1);
}
