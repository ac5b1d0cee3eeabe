use super::{SourceError, absorb, is_safe_code};
use crate::models::{
    cbsa::Cbsa,
    feature::BlockGroupCollection,
    filter::{ActiveFilterSelection, FilterCatalog},
};
use crate::traits::JobsSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A folder exported from the jobs API:
///
/// ```text
/// <root>/cbsas.json
/// <root>/filters.json
/// <root>/blockgroups/<cbsa>.geojson
/// <root>/cbsa/<cbsa>.json        (optional, falls back to cbsas.json)
/// ```
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        LocalSource {
            root: root.as_ref().to_path_buf(),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, SourceError> {
        let path = self.root.join(relative);
        debug!("Reading {:?}", path);
        let bytes = tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
            what: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl JobsSource for LocalSource {
    async fn list_cbsas(&self) -> Vec<Cbsa> {
        absorb("CBSAs", self.read_json("cbsas.json").await).unwrap_or_default()
    }

    async fn block_groups(&self, cbsa_code: &str) -> Option<BlockGroupCollection> {
        if !is_safe_code(cbsa_code) {
            warn!("Refusing CBSA code {:?}", cbsa_code);
            return None;
        }
        let relative = format!("blockgroups/{}.geojson", cbsa_code);
        absorb("block groups", self.read_json(&relative).await)
    }

    async fn filter_catalog(&self) -> Option<FilterCatalog> {
        absorb("filters", self.read_json("filters.json").await)
    }

    async fn filtered_block_groups(
        &self,
        cbsa_code: &str,
        filters: &ActiveFilterSelection,
    ) -> Option<BlockGroupCollection> {
        warn!(
            "Filtered block groups for {} ({:?}) need a remote source; nothing to show",
            cbsa_code,
            filters.query_pairs()
        );
        None
    }

    async fn cbsa_detail(&self, cbsa_code: &str) -> Option<Cbsa> {
        if !is_safe_code(cbsa_code) {
            warn!("Refusing CBSA code {:?}", cbsa_code);
            return None;
        }
        let relative = format!("cbsa/{}.json", cbsa_code);
        if self.root.join(&relative).is_file() {
            return absorb("CBSA details", self.read_json(&relative).await);
        }
        self.list_cbsas()
            .await
            .into_iter()
            .find(|cbsa| cbsa.code == cbsa_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn export() -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("blockgroups")).unwrap();
        fs::write(
            root.join("cbsas.json"),
            r#"[{"cbsa_code": "35620", "cbsa_name": "New York", "total_jobs": 9000000},
                {"cbsa_code": "31080", "cbsa_name": "Los Angeles", "total_jobs": 6000000}]"#,
        )
        .unwrap();
        fs::write(
            root.join("filters.json"),
            r#"{"employment_codes": [{"code": "CNS07", "name": "Retail Trade"}]}"#,
        )
        .unwrap();
        fs::write(
            root.join("blockgroups/35620.geojson"),
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": null, "properties": {"bg_geoid": "1", "total_jobs": 4}}
            ]}"#,
        )
        .unwrap();
        fs::write(root.join("blockgroups/31080.geojson"), "{ truncated").unwrap();
        tmp
    }

    #[tokio::test]
    async fn test_reads_exported_files() {
        let tmp = export();
        let source = LocalSource::new(tmp.path());
        assert_eq!(source.list_cbsas().await.len(), 2);
        assert_eq!(source.block_groups("35620").await.unwrap().len(), 1);
        assert_eq!(
            source.filter_catalog().await.unwrap().employment_codes[0].code,
            "CNS07"
        );
    }

    #[tokio::test]
    async fn test_missing_and_broken_files_are_absent() {
        let tmp = export();
        let source = LocalSource::new(tmp.path());
        assert!(source.block_groups("99999").await.is_none());
        assert!(source.block_groups("31080").await.is_none());
        assert!(source.block_groups("../cbsas").await.is_none());
    }

    #[tokio::test]
    async fn test_detail_falls_back_to_listing() {
        let tmp = export();
        let source = LocalSource::new(tmp.path());
        assert_eq!(source.cbsa_detail("31080").await.unwrap().name, "Los Angeles");
        assert!(source.cbsa_detail("00000").await.is_none());
    }

    #[tokio::test]
    async fn test_filtered_queries_are_unsupported() {
        let tmp = export();
        let source = LocalSource::new(tmp.path());
        let selection = ActiveFilterSelection {
            employment_code: Some("CNS07".to_string()),
            ..Default::default()
        };
        assert!(source.filtered_block_groups("35620", &selection).await.is_none());
    }
}
