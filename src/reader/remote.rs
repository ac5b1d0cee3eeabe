use super::{SourceError, absorb, is_safe_code};
use crate::models::{
    cbsa::Cbsa,
    feature::BlockGroupCollection,
    filter::{ActiveFilterSelection, FilterCatalog},
};
use crate::traits::JobsSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// The jobs API over HTTP.
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(RemoteSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| SourceError::Decode { what: url, source })
    }
}

#[async_trait]
impl JobsSource for RemoteSource {
    async fn list_cbsas(&self) -> Vec<Cbsa> {
        absorb("CBSAs", self.get_json("cbsas", &[]).await).unwrap_or_default()
    }

    async fn block_groups(&self, cbsa_code: &str) -> Option<BlockGroupCollection> {
        if !is_safe_code(cbsa_code) {
            warn!("Refusing CBSA code {:?}", cbsa_code);
            return None;
        }
        let path = format!("blockgroups/{}", cbsa_code);
        absorb("block groups", self.get_json(&path, &[]).await)
    }

    async fn filter_catalog(&self) -> Option<FilterCatalog> {
        absorb("filters", self.get_json("filters", &[]).await)
    }

    async fn filtered_block_groups(
        &self,
        cbsa_code: &str,
        filters: &ActiveFilterSelection,
    ) -> Option<BlockGroupCollection> {
        let mut query = vec![("cbsa_code", cbsa_code)];
        query.extend(filters.query_pairs());
        absorb(
            "filtered data",
            self.get_json("blockgroups/filtered", &query).await,
        )
    }

    async fn cbsa_detail(&self, cbsa_code: &str) -> Option<Cbsa> {
        if !is_safe_code(cbsa_code) {
            warn!("Refusing CBSA code {:?}", cbsa_code);
            return None;
        }
        let path = format!("cbsa/{}", cbsa_code);
        absorb("CBSA details", self.get_json(&path, &[]).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn cbsas() -> impl IntoResponse {
        Json(json!([
            {"id": 1, "cbsa_code": "35620", "cbsa_name": "New York", "total_jobs": 9000000},
            {"id": 2, "cbsa_code": "31080", "cbsa_name": "Los Angeles", "total_jobs": 6000000}
        ]))
    }

    async fn block_groups(Path(code): Path<String>) -> impl IntoResponse {
        if code != "35620" {
            return Json(json!({"type": "FeatureCollection", "features": []}));
        }
        Json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[-74.0, 40.7], [-73.9, 40.7], [-73.9, 40.8], [-74.0, 40.7]]]},
                "properties": {"bg_geoid": "360610001001", "total_jobs": 120, "ca01": 30}
            }]
        }))
    }

    // Echoes the filters it received back as active_filters
    async fn filtered(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let mut active: Vec<String> = params
            .iter()
            .filter(|(k, _)| k.as_str() != "cbsa_code")
            .map(|(_, v)| v.to_lowercase())
            .collect();
        active.sort();
        Json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "bg_geoid": params.get("cbsa_code").cloned().unwrap_or_default(),
                    "total_jobs": 120,
                    "metric_value": 7,
                    "active_filters": active
                }
            }]
        }))
    }

    async fn detail(Path(code): Path<String>) -> impl IntoResponse {
        if code == "35620" {
            Json(json!({"id": 1, "cbsa_code": "35620", "cbsa_name": "New York", "total_jobs": 9000000}))
                .into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(json!({"detail": "CBSA not found"}))).into_response()
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    async fn api() -> RemoteSource {
        let app = Router::new()
            .route("/api/cbsas", get(cbsas))
            .route("/api/blockgroups/filtered", get(filtered))
            .route("/api/blockgroups/{code}", get(block_groups))
            .route("/api/filters", get(|| async { "not json" }))
            .route("/api/cbsa/{code}", get(detail));
        RemoteSource::new(&serve(app).await).unwrap()
    }

    #[tokio::test]
    async fn test_lists_cbsas() {
        let api = api().await;
        let cbsas = api.list_cbsas().await;
        assert_eq!(cbsas.len(), 2);
        assert_eq!(cbsas[1].code, "31080");
    }

    #[tokio::test]
    async fn test_block_groups_decode() {
        let api = api().await;
        let collection = api.block_groups("35620").await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].properties.ca01, Some(30.0));
        assert!(api.block_groups("99999").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_sends_only_selected_filters() {
        let api = api().await;
        let selection = ActiveFilterSelection {
            employment_code: Some("CNS07".to_string()),
            age_group: Some(String::new()),
            earnings_bracket: None,
            education_level: Some("CD04".to_string()),
        };
        let collection = api.filtered_block_groups("35620", &selection).await.unwrap();
        let props = &collection.features[0].properties;
        assert_eq!(props.bg_geoid, "35620");
        assert_eq!(
            props.active_filters,
            Some(vec!["cd04".to_string(), "cns07".to_string()])
        );
    }

    #[tokio::test]
    async fn test_failures_become_absent() {
        let api = api().await;
        // 404
        assert!(api.cbsa_detail("00000").await.is_none());
        assert_eq!(api.cbsa_detail("35620").await.unwrap().total_jobs, 9_000_000);
        // undecodable body
        assert!(api.filter_catalog().await.is_none());
    }

    #[tokio::test]
    async fn test_codes_cannot_rewrite_the_path() {
        let api = api().await;
        // Unguarded, these would reach /api/cbsa/35620 and /api/blockgroups/35620
        assert!(api.cbsa_detail("35620?x=1").await.is_none());
        assert!(api.cbsa_detail("x/../35620").await.is_none());
        assert!(api.block_groups("35620#frag").await.is_none());
        assert!(api.block_groups("").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_absent() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = RemoteSource::new(&format!("http://{}/api/", addr)).unwrap();
        assert_eq!(api.base_url(), format!("http://{}/api", addr));
        assert!(api.list_cbsas().await.is_empty());
        assert!(api.block_groups("35620").await.is_none());
    }
}
