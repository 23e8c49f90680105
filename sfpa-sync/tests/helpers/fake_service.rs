//! In-memory metadata service
//!
//! Serves a fixed profile listing and echoes successful update results. Update calls
//! record their batch, track how many calls overlap, and can be slowed down or failed
//! per profile.

use async_trait::async_trait;
use sfpa_sync::models::{
    Credentials, ListMetadataQuery, MetadataDescriptor, ProfileUpdateRecord, UpdateResult,
};
use sfpa_sync::{MetadataService, ServiceError, Session};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeMetadataService {
    profiles: Vec<String>,
    /// Any batch containing one of these profiles fails with HTTP 500
    failing_profiles: Vec<String>,
    /// Extra latency for a batch containing the profile
    slow_profiles: HashMap<String, Duration>,
    update_delay: Duration,

    login_calls: AtomicUsize,
    list_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl FakeMetadataService {
    /// Listing returns `profiles` exactly as given (percent-encoded)
    pub fn with_profiles<S: AsRef<str>>(profiles: &[S]) -> Self {
        Self {
            profiles: profiles.iter().map(|p| p.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn fail_batch_containing(mut self, profile: &str) -> Self {
        self.failing_profiles.push(profile.to_string());
        self
    }

    pub fn slow_batch_containing(mut self, profile: &str, delay: Duration) -> Self {
        self.slow_profiles.insert(profile.to_string(), delay);
        self
    }

    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Profile names per update call, in call order
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl MetadataService for FakeMetadataService {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ServiceError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Session {
            session_id: "FAKE_SESSION".to_string(),
            server_url: format!("{}/services/Soap/u/50.0", credentials.endpoint_url),
            metadata_server_url: format!("{}/services/Soap/m/50.0", credentials.endpoint_url),
            user_id: Some("005000000000001".to_string()),
            organization_id: Some("00D000000000001".to_string()),
        })
    }

    async fn list_metadata(
        &self,
        _session: &Session,
        queries: &[ListMetadataQuery],
        _api_version: &str,
    ) -> Result<Vec<MetadataDescriptor>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let metadata_type = &queries[0].metadata_type;
        Ok(self
            .profiles
            .iter()
            .map(|name| MetadataDescriptor::new(name.clone(), metadata_type.clone()))
            .collect())
    }

    async fn update_metadata(
        &self,
        _session: &Session,
        _metadata_type: &str,
        records: &[ProfileUpdateRecord],
    ) -> Result<Vec<UpdateResult>, ServiceError> {
        let names: Vec<String> = records.iter().map(|r| r.full_name.clone()).collect();
        self.batches.lock().unwrap().push(names.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = names
            .iter()
            .find_map(|n| self.slow_profiles.get(n).copied())
            .unwrap_or(self.update_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if names.iter().any(|n| self.failing_profiles.contains(n)) {
            return Err(ServiceError::Http(500, "Internal Server Error".to_string()));
        }

        Ok(names.into_iter().map(UpdateResult::succeeded).collect())
    }
}
