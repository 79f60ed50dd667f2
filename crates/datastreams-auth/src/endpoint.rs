//! Signed paths for the reports API.
//!
//! The signature covers the path and query exactly as sent, so the query
//! must be built once and reused for both signing and the request URL.

use url::form_urlencoded::Serializer;
use url::Url;

use crate::error::Result;

/// Environment variable holding the REST API base URL.
pub const API_URL_ENV: &str = "CHAINLINK_API_URL";

/// Environment variable holding the websocket base URL.
pub const WS_URL_ENV: &str = "CHAINLINK_WS_URL";

pub const REPORTS_PATH: &str = "/api/v1/reports";
pub const BULK_REPORTS_PATH: &str = "/api/v1/reports/bulk";
pub const WS_PATH: &str = "/api/v1/ws";

/// `/api/v1/reports?feedID=…&timestamp=…`
pub fn report_path(feed_id: &str, timestamp: u64) -> String {
    let query = Serializer::new(String::new())
        .append_pair("feedID", feed_id)
        .append_pair("timestamp", &timestamp.to_string())
        .finish();
    format!("{REPORTS_PATH}?{query}")
}

/// `/api/v1/reports/bulk?feedIDs=a,b&timestamp=…`
pub fn bulk_reports_path<I, S>(feed_ids: I, timestamp: u64) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let query = Serializer::new(String::new())
        .append_pair("feedIDs", &join(feed_ids))
        .append_pair("timestamp", &timestamp.to_string())
        .finish();
    format!("{BULK_REPORTS_PATH}?{query}")
}

/// `/api/v1/ws?feedIDs=a,b`
pub fn websocket_path<I, S>(feed_ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let query = Serializer::new(String::new())
        .append_pair("feedIDs", &join(feed_ids))
        .finish();
    format!("{WS_PATH}?{query}")
}

/// Join a signed path onto a base URL such as `https://api.example.com`.
pub fn request_url(base: &str, path_and_query: &str) -> Result<Url> {
    Ok(Url::parse(base)?.join(path_and_query)?)
}

fn join<I, S>(feed_ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    feed_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;

    const FEED: &str = "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";

    #[test]
    fn single_report_path() {
        assert_eq!(
            report_path(FEED, 1_718_885_772),
            format!("/api/v1/reports?feedID={FEED}&timestamp=1718885772")
        );
    }

    #[test]
    fn bulk_path_encodes_separator() {
        assert_eq!(
            bulk_reports_path(["0x01", "0x02"], 7),
            "/api/v1/reports/bulk?feedIDs=0x01%2C0x02&timestamp=7"
        );
    }

    #[test]
    fn websocket_path_lists_feeds() {
        assert_eq!(websocket_path(vec![FEED.to_string()]), format!("/api/v1/ws?feedIDs={FEED}"));
    }

    #[test]
    fn request_url_keeps_signed_query() {
        let path = report_path(FEED, 1);
        let url = request_url("https://api.testnet-dataengine.chain.link", &path).unwrap();
        assert_eq!(url.path(), REPORTS_PATH);
        assert_eq!(&url[url::Position::BeforePath..], path);
        assert!(matches!(
            request_url("not a url", &path),
            Err(AuthError::InvalidUrl(_))
        ));
    }
}
