//! Scripted metadata service for unit tests

use super::{MetadataService, Session};
use crate::error::ServiceError;
use crate::models::{
    Credentials, ListMetadataQuery, MetadataDescriptor, ProfileUpdateRecord, UpdateResult,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) fn test_session() -> Session {
    Session {
        session_id: "SESSION".to_string(),
        server_url: "https://test.my.salesforce.com/services/Soap/u/50.0".to_string(),
        metadata_server_url: "https://test.my.salesforce.com/services/Soap/m/50.0".to_string(),
        user_id: None,
        organization_id: None,
    }
}

pub(crate) fn record(name: &str) -> ProfileUpdateRecord {
    ProfileUpdateRecord {
        full_name: name.to_string(),
        class_accesses: Vec::new(),
        object_permissions: Vec::new(),
    }
}

/// Counts every remote call; each scripted error is returned once
#[derive(Default)]
pub(crate) struct ScriptedService {
    profiles: Vec<String>,
    login_error: Mutex<Option<ServiceError>>,
    list_error: Mutex<Option<ServiceError>>,
    update_error: Mutex<Option<ServiceError>>,
    update_delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedService {
    pub(crate) fn with_profiles(names: &[&str]) -> Self {
        Self {
            profiles: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn failing_login(error: ServiceError) -> Self {
        Self {
            login_error: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    pub(crate) fn failing_list(error: ServiceError) -> Self {
        Self {
            list_error: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    pub(crate) fn failing_update(error: ServiceError) -> Self {
        Self {
            update_error: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    pub(crate) fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn scripted(slot: &Mutex<Option<ServiceError>>) -> Result<(), ServiceError> {
        match slot.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataService for ScriptedService {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<Session, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.login_error)?;
        Ok(test_session())
    }

    async fn list_metadata(
        &self,
        _session: &Session,
        queries: &[ListMetadataQuery],
        _api_version: &str,
    ) -> Result<Vec<MetadataDescriptor>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.list_error)?;
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
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.update_delay.is_zero() {
            tokio::time::sleep(self.update_delay).await;
        }
        Self::scripted(&self.update_error)?;
        Ok(records
            .iter()
            .map(|r| UpdateResult::succeeded(r.full_name.clone()))
            .collect())
    }
}
