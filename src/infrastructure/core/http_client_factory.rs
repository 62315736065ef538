use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared HTTP client.
    ///
    /// Every request carries cache-busting headers. No timeout is set.
    pub fn create_client() -> Client {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        Client::builder()
            .pool_max_idle_per_host(5)
            .default_headers(headers)
            .user_agent(concat!("feargreed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Helper function to build a URL with query parameters.
///
/// Falls back to plain concatenation when `base_url` does not parse.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return base_url.to_string();
    }

    match Url::parse(base_url) {
        Ok(mut url) => {
            {
                let mut pairs = url.query_pairs_mut();
                for (k, v) in params {
                    pairs.append_pair(k.as_ref(), v.as_ref());
                }
            }
            url.to_string()
        }
        Err(_) => {
            let query_string: String = params
                .iter()
                .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
                .collect::<Vec<_>>()
                .join("&");
            if base_url.contains('?') {
                format!("{}&{}", base_url, query_string)
            } else {
                format!("{}?{}", base_url, query_string)
            }
        }
    }
}
