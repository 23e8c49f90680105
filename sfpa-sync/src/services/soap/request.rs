//! SOAP request envelopes for the partner login and Metadata API calls

use crate::models::{ListMetadataQuery, ProfileUpdateRecord};
use quick_xml::escape::escape;
use serde_json::{Map, Value};

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const PARTNER_NS: &str = "urn:partner.soap.sforce.com";
pub const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Partner API `login` request
pub fn login(username: &str, password: &str) -> String {
    let mut body = String::new();
    element(&mut body, "username", username);
    element(&mut body, "password", password);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="{}"><soapenv:Body><login xmlns="{}">{}</login></soapenv:Body></soapenv:Envelope>"#,
        SOAP_ENV_NS, PARTNER_NS, body
    )
}

/// Metadata API `listMetadata` request
pub fn list_metadata(session_id: &str, queries: &[ListMetadataQuery], api_version: &str) -> String {
    let mut body = String::new();
    for query in queries {
        body.push_str("<queries>");
        if let Some(folder) = &query.folder {
            element(&mut body, "folder", folder);
        }
        element(&mut body, "type", &query.metadata_type);
        body.push_str("</queries>");
    }
    element(&mut body, "asOfVersion", api_version);

    metadata_envelope(session_id, "listMetadata", &body)
}

/// Metadata API `updateMetadata` request
///
/// Element order follows the metadata schema: `fullName` from the base type first,
/// then `classAccesses` before `objectPermissions`. Object permission keys are written
/// in sorted order, which is the order the `ObjectPermissions` type declares them.
pub fn update_metadata(
    session_id: &str,
    metadata_type: &str,
    records: &[ProfileUpdateRecord],
) -> String {
    let mut body = String::new();
    for record in records {
        body.push_str(&format!(r#"<metadata xsi:type="{}">"#, escape(metadata_type)));
        element(&mut body, "fullName", &record.full_name);
        for access in &record.class_accesses {
            body.push_str("<classAccesses>");
            element(&mut body, "apexClass", &access.apex_class);
            element(&mut body, "enabled", if access.enabled { "true" } else { "false" });
            body.push_str("</classAccesses>");
        }
        for permission in &record.object_permissions {
            body.push_str("<objectPermissions>");
            for (key, value) in sorted_entries(permission) {
                value_element(&mut body, key, value);
            }
            body.push_str("</objectPermissions>");
        }
        body.push_str("</metadata>");
    }

    metadata_envelope(session_id, "updateMetadata", &body)
}

fn metadata_envelope(session_id: &str, operation: &str, body: &str) -> String {
    let mut header = String::new();
    element(&mut header, "sessionId", session_id);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="{env}" xmlns:xsi="{xsi}"><soapenv:Header><SessionHeader xmlns="{ns}">{header}</SessionHeader></soapenv:Header><soapenv:Body><{op} xmlns="{ns}">{body}</{op}></soapenv:Body></soapenv:Envelope>"#,
        env = SOAP_ENV_NS,
        xsi = XSI_NS,
        ns = METADATA_NS,
        header = header,
        op = operation,
        body = body,
    )
}

fn element(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(text));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Render an opaque JSON value as XML: arrays repeat the element, objects nest,
/// nulls are omitted
fn value_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => element(out, name, if *b { "true" } else { "false" }),
        Value::Number(n) => element(out, name, &n.to_string()),
        Value::String(s) => element(out, name, s),
        Value::Array(items) => {
            for item in items {
                value_element(out, name, item);
            }
        }
        Value::Object(map) => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            for (key, child) in sorted_entries(map) {
                value_element(out, key, child);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}
