//! SOAP response decoding

use super::xml::XmlElement;
use crate::error::ServiceError;
use crate::models::{MetadataDescriptor, UpdateError, UpdateResult};
use crate::services::Session;

/// SOAP fault carried in a response body, if any
pub fn fault(document: &XmlElement) -> Option<ServiceError> {
    let fault = document.find("Fault")?;
    Some(ServiceError::Fault {
        code: fault.child_text("faultcode").unwrap_or("unknown").to_string(),
        message: fault.child_text("faultstring").unwrap_or_default().to_string(),
    })
}

/// `loginResponse` → session handle
pub fn login(document: &XmlElement) -> Result<Session, ServiceError> {
    let result = operation_response(document, "loginResponse")?
        .child("result")
        .ok_or_else(|| missing("loginResponse/result"))?;

    Ok(Session {
        session_id: required_text(result, "sessionId")?,
        server_url: required_text(result, "serverUrl")?,
        metadata_server_url: required_text(result, "metadataServerUrl")?,
        user_id: result.child_text("userId").map(str::to_string),
        organization_id: result
            .find("organizationId")
            .map(|e| e.text.clone())
            .filter(|id| !id.is_empty()),
    })
}

/// `listMetadataResponse` → descriptors, in response order
///
/// A response without `result` elements is an empty listing.
pub fn list_metadata(document: &XmlElement) -> Result<Vec<MetadataDescriptor>, ServiceError> {
    operation_response(document, "listMetadataResponse")?
        .children_named("result")
        .map(|result| -> Result<MetadataDescriptor, ServiceError> {
            Ok(MetadataDescriptor {
                full_name: required_text(result, "fullName")?,
                metadata_type: result.child_text("type").unwrap_or_default().to_string(),
                id: optional_text(result, "id"),
                file_name: optional_text(result, "fileName"),
            })
        })
        .collect()
}

/// `updateMetadataResponse` → per-record results, in response order
pub fn update_metadata(document: &XmlElement) -> Result<Vec<UpdateResult>, ServiceError> {
    operation_response(document, "updateMetadataResponse")?
        .children_named("result")
        .map(|result| -> Result<UpdateResult, ServiceError> {
            let success = match result.child_text("success") {
                Some("true") => true,
                Some("false") | None => false,
                Some(other) => {
                    return Err(ServiceError::Parse(format!(
                        "Unexpected success value: {}",
                        other
                    )))
                }
            };

            let errors = result
                .children_named("errors")
                .map(|error| UpdateError {
                    status_code: optional_text(error, "statusCode"),
                    message: error.child_text("message").unwrap_or_default().to_string(),
                    fields: error
                        .children_named("fields")
                        .map(|f| f.text.clone())
                        .collect(),
                })
                .collect();

            Ok(UpdateResult {
                success,
                full_name: result.child_text("fullName").unwrap_or_default().to_string(),
                errors,
            })
        })
        .collect()
}

fn operation_response<'a>(
    document: &'a XmlElement,
    name: &str,
) -> Result<&'a XmlElement, ServiceError> {
    document.find(name).ok_or_else(|| missing(name))
}

fn required_text(element: &XmlElement, name: &str) -> Result<String, ServiceError> {
    optional_text(element, name).ok_or_else(|| missing(name))
}

fn optional_text(element: &XmlElement, name: &str) -> Option<String> {
    element
        .child_text(name)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn missing(name: &str) -> ServiceError {
    ServiceError::Parse(format!("Response is missing {}", name))
}
