//! Metadata API client over SOAP

use super::{request, response, xml};
use crate::error::ServiceError;
use crate::models::{
    Credentials, ListMetadataQuery, MetadataDescriptor, ProfileUpdateRecord, UpdateResult,
};
use crate::services::{MetadataService, Session};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const USER_AGENT: &str = concat!("sfpa-sync/", env!("CARGO_PKG_VERSION"));
const SOAP_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// SOAP client for partner login plus list/update metadata calls
pub struct SoapMetadataClient {
    http_client: reqwest::Client,
    api_version: String,
    timeout: Duration,
}

impl SoapMetadataClient {
    /// `timeout` bounds every HTTP request made by this client
    pub fn new(api_version: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_version: api_version.into(),
            timeout,
        })
    }

    /// Partner SOAP endpoint under the login host
    pub fn login_url(&self, endpoint_url: &str) -> String {
        format!(
            "{}/services/Soap/u/{}",
            endpoint_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// POST an envelope and return the parsed response document
    ///
    /// Faults are reported as HTTP 500 with a `Fault` body, so the body is checked for a
    /// fault before the status code.
    async fn call(
        &self,
        url: &str,
        soap_action: &str,
        envelope: String,
    ) -> Result<xml::XmlElement, ServiceError> {
        tracing::debug!(url = %url, soap_action, "Sending SOAP request");

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", soap_action)
            .body(envelope)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        let document = match xml::parse(&body) {
            Ok(document) => document,
            Err(_) if !status.is_success() => {
                return Err(ServiceError::Http(status.as_u16(), body));
            }
            Err(e) => return Err(e),
        };

        if let Some(fault) = response::fault(&document) {
            tracing::debug!(status = status.as_u16(), error = %fault, "SOAP fault received");
            return Err(fault);
        }

        if !status.is_success() {
            return Err(ServiceError::Http(status.as_u16(), body));
        }

        Ok(document)
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.timeout)
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl MetadataService for SoapMetadataClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ServiceError> {
        let url = self.login_url(&credentials.endpoint_url);
        let envelope = request::login(&credentials.username, &credentials.password);

        let document = self.call(&url, "login", envelope).await?;
        response::login(&document)
    }

    async fn list_metadata(
        &self,
        session: &Session,
        queries: &[ListMetadataQuery],
        api_version: &str,
    ) -> Result<Vec<MetadataDescriptor>, ServiceError> {
        let envelope = request::list_metadata(&session.session_id, queries, api_version);

        let document = self
            .call(&session.metadata_server_url, "\"\"", envelope)
            .await?;
        response::list_metadata(&document)
    }

    async fn update_metadata(
        &self,
        session: &Session,
        metadata_type: &str,
        records: &[ProfileUpdateRecord],
    ) -> Result<Vec<UpdateResult>, ServiceError> {
        let envelope = request::update_metadata(&session.session_id, metadata_type, records);

        let document = self
            .call(&session.metadata_server_url, "\"\"", envelope)
            .await?;
        response::update_metadata(&document)
    }
}
