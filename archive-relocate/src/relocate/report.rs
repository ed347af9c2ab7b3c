//! Report returned for every relocated archive.

use crate::template::VariableSource;
use serde::{Deserialize, Serialize};

/// Metadata forwarded to downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub cluster_id: Option<String>,
    pub external_organization: Option<String>,
}

impl ReportMetadata {
    /// Build metadata from the values visible while rendering the target.
    pub fn from_vars(vars: &dyn VariableSource) -> Self {
        Self {
            cluster_id: vars.lookup("cluster_id").map(|v| v.into_owned()),
            external_organization: vars.lookup("org_id").map(|v| v.into_owned()),
        }
    }
}

/// Where an archive came from and where it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub path: String,
    pub original_path: String,
    pub metadata: ReportMetadata,
}

impl UploadReport {
    pub fn new(
        path: impl Into<String>,
        original_path: impl Into<String>,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            path: path.into(),
            original_path: original_path.into(),
            metadata,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_json_layout() {
        let report = UploadReport::new(
            "5d/cluster/202401/01/120000.tar.gz",
            "1/cluster/20240101120000-a",
            ReportMetadata {
                cluster_id: Some("cluster".to_string()),
                external_organization: Some("1".to_string()),
            },
        );
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"path":"5d/cluster/202401/01/120000.tar.gz","original_path":"1/cluster/20240101120000-a","metadata":{"cluster_id":"cluster","external_organization":"1"}}"#
        );
    }

    #[test]
    fn test_metadata_maps_org_id_to_external_organization() {
        let vars: HashMap<String, String> = [
            ("cluster_id".to_string(), "c".to_string()),
            ("org_id".to_string(), "42".to_string()),
        ]
        .into();
        let metadata = ReportMetadata::from_vars(&vars);
        assert_eq!(metadata.cluster_id.as_deref(), Some("c"));
        assert_eq!(metadata.external_organization.as_deref(), Some("42"));
    }

    #[test]
    fn test_absent_metadata_serializes_as_null() {
        let report = UploadReport::new("p", "o", ReportMetadata::default());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(value["metadata"]["cluster_id"].is_null());
        assert!(value["metadata"]["external_organization"].is_null());
    }
}
