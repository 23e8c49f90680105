//! Metadata records exchanged with the remote service

use serde::{Deserialize, Serialize};
use sfpa_common::config::ObjectPermission;

/// Type query for a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadataQuery {
    /// Metadata type, e.g. "Profile"
    #[serde(rename = "type")]
    pub metadata_type: String,
    /// Folder for folder-based types; profiles have none
    pub folder: Option<String>,
}

impl ListMetadataQuery {
    pub fn new(metadata_type: impl Into<String>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            folder: None,
        }
    }
}

/// Raw item returned by the list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDescriptor {
    /// Percent-encoded full name, e.g. `Sales%20Rep`
    pub full_name: String,
    #[serde(rename = "type")]
    pub metadata_type: String,
    pub id: Option<String>,
    pub file_name: Option<String>,
}

impl MetadataDescriptor {
    pub fn new(full_name: impl Into<String>, metadata_type: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            metadata_type: metadata_type.into(),
            id: None,
            file_name: None,
        }
    }
}

/// Apex class access granted to a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAccessEntry {
    pub apex_class: String,
    pub enabled: bool,
}

/// Desired state of one profile, the unit submitted to the update call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRecord {
    /// Decoded profile name
    pub full_name: String,
    pub class_accesses: Vec<ClassAccessEntry>,
    /// Passed through from configuration unchanged
    pub object_permissions: Vec<ObjectPermission>,
}

/// Outcome of one submitted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub success: bool,
    pub full_name: String,
    #[serde(default)]
    pub errors: Vec<UpdateError>,
}

impl UpdateResult {
    pub fn succeeded(full_name: impl Into<String>) -> Self {
        Self {
            success: true,
            full_name: full_name.into(),
            errors: Vec::new(),
        }
    }
}

/// Error reported by the remote service for a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateError {
    pub status_code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}
