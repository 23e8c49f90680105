//! Salesforce SOAP transport
//!
//! - `request`: envelope builders
//! - `response`: response and fault decoding
//! - `xml`: element tree used by the decoders

mod client;
pub mod request;
pub mod response;
pub mod xml;

pub use client::SoapMetadataClient;
