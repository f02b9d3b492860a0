use std::sync::Arc;

use anyhow::Context;
use common::equipment::EquipmentRecord;
use common::listing_const::MAX_SEARCH_HITS;
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::config::{Config, SearchIndexCredentials};
use crate::search_index::SearchIndexError;
use crate::search_index::filters::{ListingKind, build_filters};

const APP_ID_HEADER: &str = "X-Algolia-Application-Id";
const API_KEY_HEADER: &str = "X-Algolia-API-Key";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRadius {
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    pub query: String,
    pub filters: Option<String>,
    pub around: Option<GeoRadius>,
    pub hits_per_page: u32,
    pub page: u32,
}

impl SearchRequest {
    pub fn for_listing(kind: ListingKind, around: Option<GeoRadius>) -> Self {
        Self {
            query: String::new(),
            filters: build_filters(kind),
            around,
            hits_per_page: MAX_SEARCH_HITS,
            page: 0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireQuery<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    around_lat_lng: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    around_radius: Option<u32>,
    hits_per_page: u32,
    page: u32,
    get_ranking_info: bool,
}

impl<'a> From<&'a SearchRequest> for WireQuery<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        WireQuery {
            query: &request.query,
            filters: request.filters.as_deref(),
            around_lat_lng: request.around.map(|g| format!("{}, {}", g.lat, g.lng)),
            around_radius: request.around.map(|g| g.radius_meters),
            hits_per_page: request.hits_per_page,
            page: request.page,
            get_ranking_info: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResult {
    hits: Vec<RawSearchResultHit>,
    #[serde(rename = "nbHits", default)]
    total_hits: u64,
    #[serde(default)]
    page: u32,
    #[serde(rename = "nbPages", default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct RawSearchResultHit {
    #[serde(flatten)]
    record: EquipmentRecord,
    #[serde(rename = "_rankingInfo", default)]
    ranking_info: Option<RawRankingInfo>,
}

#[derive(Debug, Deserialize)]
struct RawRankingInfo {
    #[serde(rename = "geoDistance", default)]
    geo_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub records: Vec<EquipmentRecord>,
    pub total_hits: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl From<RawSearchResult> for SearchResponse {
    fn from(raw: RawSearchResult) -> Self {
        let records = raw
            .hits
            .into_iter()
            .map(|hit| {
                let mut record = hit.record;
                if let Some(distance) = hit.ranking_info.and_then(|info| info.geo_distance) {
                    record.distance_meters = Some(distance);
                }
                record
            })
            .collect();
        SearchResponse {
            records,
            total_hits: raw.total_hits,
            page: raw.page,
            total_pages: raw.total_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchIndexClient {
    http: reqwest::Client,
    base_url: Option<String>,
    index_name: String,
    credentials: Option<SearchIndexCredentials>,
    cache: Arc<ResponseCache>,
}

impl SearchIndexClient {
    pub fn new(config: &Config, cache: Arc<ResponseCache>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.search_timeout)
            .build()
            .context("failed to build search index http client")?;
        Ok(Self {
            http,
            base_url: config.search_index_url.clone(),
            index_name: config.search_index_name.clone(),
            credentials: config.credentials.clone(),
            cache,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<(Url, &SearchIndexCredentials)> {
        let (Some(base_url), Some(credentials)) = (&self.base_url, &self.credentials) else {
            return Err(SearchIndexError::NotConfigured.into());
        };
        let mut url = Url::parse(base_url)
            .with_context(|| format!("invalid search index url: {base_url}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("search index url cannot be a base: {base_url}"))?
            .pop_if_empty()
            .extend(["1", "indexes", self.index_name.as_str()])
            .extend(segments);
        Ok((url, credentials))
    }

    /// Sends a request, serving from the cache when possible. `Ok(None)` means 404.
    async fn cached_request(
        &self,
        method: Method,
        url: Url,
        credentials: &SearchIndexCredentials,
        body: Option<String>,
    ) -> anyhow::Result<Option<String>> {
        let cache_key =
            ResponseCache::key_for(&format!("{method} {url}\n{}", body.as_deref().unwrap_or("")));
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("SEARCH CACHE HIT: {}", cache_key);
            return Ok(Some(cached));
        }
        debug!("SEARCH CACHE MISS: {}", cache_key);

        let t0 = std::time::Instant::now();
        let mut request = self
            .http
            .request(method, url.clone())
            .header(APP_ID_HEADER, &credentials.app_id)
            .header(API_KEY_HEADER, &credentials.api_key);
        if let Some(body) = body {
            request =
                request.header(reqwest::header::CONTENT_TYPE, "application/json").body(body);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("search index request failed: {}", url.path()))?;
        let status = response.status();
        let response_txt = response.text().await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let status = status.as_u16();
            return Err(SearchIndexError::Status { status, body: response_txt }.into());
        }
        info!(
            "SEARCH RESPONSE: {} len = {} ({}ms)",
            url.path(),
            response_txt.len(),
            t0.elapsed().as_millis()
        );
        self.cache.insert(cache_key, response_txt.clone());
        Ok(Some(response_txt))
    }

    pub async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        let (url, credentials) = self.endpoint(&["query"])?;
        let body = serde_json::to_string(&WireQuery::from(request))?;
        let Some(response_txt) =
            self.cached_request(Method::POST, url, credentials, Some(body)).await?
        else {
            let body = format!("index {} not found", self.index_name);
            return Err(SearchIndexError::Status { status: 404, body }.into());
        };
        let response: RawSearchResult =
            serde_json::from_str(&response_txt).context("invalid search index response")?;
        Ok(response.into())
    }

    pub async fn search_listing(
        &self,
        kind: ListingKind,
        around: Option<GeoRadius>,
    ) -> anyhow::Result<Vec<EquipmentRecord>> {
        let request = SearchRequest::for_listing(kind, around);
        let response = self.search(&request).await?;
        info!(
            "listing search: kind={:?} hits={} returned={}",
            kind,
            response.total_hits,
            response.records.len()
        );
        Ok(response.records)
    }

    pub async fn get_record(&self, id: &str) -> anyhow::Result<Option<EquipmentRecord>> {
        let (url, credentials) = self.endpoint(&[id])?;
        let Some(response_txt) = self.cached_request(Method::GET, url, credentials, None).await?
        else {
            return Ok(None);
        };
        let record = serde_json::from_str(&response_txt).context("invalid search index record")?;
        Ok(Some(record))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchIndexClient {
        let config = Config {
            search_index_url: Some(server.uri()),
            credentials: Some(SearchIndexCredentials {
                app_id: "app".into(),
                api_key: "key".into(),
            }),
            ..Config::default()
        };
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60), clock));
        SearchIndexClient::new(&config, cache).unwrap()
    }

    #[test]
    fn wire_query_includes_geo_radius() {
        let request = SearchRequest {
            filters: Some("buyItNow:true".into()),
            around: Some(GeoRadius { lat: 30.25, lng: -97.75, radius_meters: 50_000 }),
            hits_per_page: 100,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(WireQuery::from(&request)).unwrap(),
            json!({
                "query": "",
                "filters": "buyItNow:true",
                "aroundLatLng": "30.25, -97.75",
                "aroundRadius": 50000,
                "hitsPerPage": 100,
                "page": 0,
                "getRankingInfo": true
            })
        );
    }

    #[tokio::test]
    async fn search_maps_hits_and_caches_the_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/indexes/machines/query"))
            .and(header("x-algolia-application-id", "app"))
            .and(header("x-algolia-api-key", "key"))
            .and(body_json(json!({
                "query": "",
                "filters": "buyItNow:true",
                "hitsPerPage": 1000,
                "page": 0,
                "getRankingInfo": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [
                    {
                        "objectID": "a", "primaryType": "Excavator", "buyItNow": true,
                        "_rankingInfo": { "geoDistance": 1200 }
                    },
                    { "objectID": "b" }
                ],
                "nbHits": 2,
                "page": 0,
                "nbPages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let records = client.search_listing(ListingKind::Buy, None).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].distance_meters, Some(1200.0));
        assert_eq!(records[0].primary_type.as_deref(), Some("Excavator"));
        assert_eq!(records[1].distance_meters, None);

        // second call is served from the cache; the mock expects a single hit
        let again = client.search_listing(ListingKind::Buy, None).await.unwrap();
        assert_eq!(again, records);
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&SearchRequest::default()).await.unwrap_err();
        match err.downcast_ref::<SearchIndexError>() {
            Some(SearchIndexError::Status { status, body }) => {
                assert_eq!(*status, 403);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_record_returns_none_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1/indexes/machines/m-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "objectID": "m-1", "year": 2019 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1/indexes/machines/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let record = client.get_record("m-1").await.unwrap().unwrap();
        assert_eq!(record.year, Some(2019));
        assert_eq!(client.get_record("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let cache = Arc::new(ResponseCache::with_system_clock(Duration::from_secs(60)));
        let client = SearchIndexClient::new(&Config::default(), cache).unwrap();
        let err = client.get_record("m-1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchIndexError>(),
            Some(SearchIndexError::NotConfigured)
        ));
    }
}
