//! Desired profile state
//!
//! Pure computation, no I/O: decode and filter listed profile names, then combine each
//! retained name with the static class access and object permission template.

use crate::models::{ClassAccessEntry, MetadataDescriptor, ProfileUpdateRecord};
use sfpa_common::config::{ObjectPermission, SyncConfig};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Decode a percent-encoded `fullName`
///
/// Falls back to the raw value when the decoded bytes are not valid UTF-8.
pub fn decode_full_name(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!(full_name = raw, error = %e, "fullName is not valid percent-encoded UTF-8, keeping raw value");
            raw.to_string()
        }
    }
}

/// Decoded names of every descriptor not in `excluded`
///
/// Duplicates in the listing are passed through.
pub fn extract_profile_names(
    descriptors: &[MetadataDescriptor],
    excluded: &HashSet<String>,
) -> Vec<String> {
    descriptors
        .iter()
        .map(|descriptor| decode_full_name(&descriptor.full_name))
        .filter(|name| {
            let keep = !excluded.contains(name);
            if !keep {
                debug!(profile = %name, "Skipping excluded profile");
            }
            keep
        })
        .collect()
}

/// One enabled class access per class name, in input order
pub fn build_class_accesses(class_names: &[String]) -> Vec<ClassAccessEntry> {
    class_names
        .iter()
        .map(|name| ClassAccessEntry {
            apex_class: name.clone(),
            enabled: true,
        })
        .collect()
}

/// One update record per profile name, each carrying the full template
pub fn build_update_records(
    profile_names: Vec<String>,
    class_accesses: &[ClassAccessEntry],
    object_permissions: &[ObjectPermission],
) -> Vec<ProfileUpdateRecord> {
    profile_names
        .into_iter()
        .map(|full_name| ProfileUpdateRecord {
            full_name,
            class_accesses: class_accesses.to_vec(),
            object_permissions: object_permissions.to_vec(),
        })
        .collect()
}

/// Exclusion set plus permission template, built once from configuration
#[derive(Debug, Clone, Default)]
pub struct ProfileTransformer {
    excluded: HashSet<String>,
    class_accesses: Vec<ClassAccessEntry>,
    object_permissions: Vec<ObjectPermission>,
}

impl ProfileTransformer {
    pub fn new(
        excluded_profiles: &[String],
        class_names: &[String],
        object_permissions: Vec<ObjectPermission>,
    ) -> Self {
        Self {
            excluded: excluded_profiles.iter().cloned().collect(),
            class_accesses: build_class_accesses(class_names),
            object_permissions,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            &config.excluded_profiles,
            &config.class_access,
            config.object_access.clone(),
        )
    }

    /// Update records for every retained profile, in listing order
    pub fn transform(&self, descriptors: &[MetadataDescriptor]) -> Vec<ProfileUpdateRecord> {
        let names = extract_profile_names(descriptors, &self.excluded);
        build_update_records(names, &self.class_accesses, &self.object_permissions)
    }

    pub fn class_accesses(&self) -> &[ClassAccessEntry] {
        &self.class_accesses
    }
}
