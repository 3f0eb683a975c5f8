//! Census API integration

use crate::error::{Error, Result};
use americas_core::census::{self, API_BASE};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Census Data API client
pub struct CensusClient {
    client: reqwest::blocking::Client,
    api_base: String,
    api_key: Option<String>,
}

impl CensusClient {
    pub fn new(api_base: Option<String>, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("americas-immigration"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.unwrap_or_else(|| API_BASE.to_string()),
            api_key,
        })
    }

    /// Full request URL for the B05006 variables
    pub fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in census::query_params() {
                query.append_pair(key, &value);
            }
            if let Some(ref key) = self.api_key {
                query.append_pair("key", key);
            }
        }
        Ok(url)
    }

    /// Fetch raw variable values, keyed by variable name
    pub fn fetch(&self) -> Result<HashMap<String, u64>> {
        let url = self.request_url()?;
        debug!("GET {}", url);

        let rows: Vec<Vec<String>> = self
            .client
            .get(url)
            .send()?
            .error_for_status()
            .map_err(|e| Error::Census(format!("Request failed: {}", e)))?
            .json()?;

        Ok(census::parse_api_response(&rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use americas_core::census::VARIABLES;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer a single request with `status` and `body`; returns the base URL
    fn serve_once(status: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 8192];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}/data/2024/acs/acs1")
    }

    fn api_body() -> String {
        let mut header: Vec<String> = VARIABLES.iter().map(|v| v.to_string()).collect();
        header.push("us".to_string());
        let mut values: Vec<String> = (1..=VARIABLES.len()).map(|i| (i * 1000).to_string()).collect();
        values.push("1".to_string());
        serde_json::to_string(&vec![header, values]).unwrap()
    }

    #[test]
    fn test_fetch_parses_response() {
        let base = serve_once("200 OK", api_body());
        let client = CensusClient::new(Some(base), None).unwrap();

        let raw = client.fetch().unwrap();
        assert_eq!(raw.len(), VARIABLES.len());
        assert_eq!(raw[census::TOTAL], 1000);
        assert_eq!(raw[census::CANADA], 14_000);
        assert!(!raw.contains_key("us"));
    }

    #[test]
    fn test_fetch_http_error() {
        let base = serve_once("500 Internal Server Error", "{}".to_string());
        let client = CensusClient::new(Some(base), None).unwrap();

        assert!(matches!(client.fetch(), Err(Error::Census(_))));
    }

    #[test]
    fn test_request_url() {
        let client = CensusClient::new(None, None).unwrap();
        let url = client.request_url().unwrap();

        assert_eq!(url.host_str(), Some("api.census.gov"));
        assert!(url.path().contains("2024/acs/acs1"));
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["for"], "us:1");
        assert!(pairs["get"].contains("B05006_160E"));
        assert!(!pairs.contains_key("key"));
    }

    #[test]
    fn test_request_url_with_key_and_base() {
        let client = CensusClient::new(
            Some("http://localhost:8080/data".to_string()),
            Some("secret".to_string()),
        )
        .unwrap();
        let url = client.request_url().unwrap();

        assert_eq!(url.host_str(), Some("localhost"));
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["key"], "secret");
    }

    #[test]
    fn test_invalid_base() {
        let client = CensusClient::new(Some("not a url".to_string()), None).unwrap();
        assert!(matches!(client.request_url(), Err(Error::Url(_))));
    }
}
