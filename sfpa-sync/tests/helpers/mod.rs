//! Shared integration test helpers

#![allow(dead_code)]

pub mod fake_service;
pub mod log_capture;

pub use fake_service::FakeMetadataService;
pub use log_capture::LogCapture;

use sfpa_sync::models::Credentials;

pub const EXCLUDED: [&str; 2] = ["Admin", "Read Only"];

pub fn credentials() -> Credentials {
    Credentials::new("https://login.salesforce.com", "admin@example.com", "secret")
}

/// `count` percent-encoded profile names: `Custom%20Profile%2001`, ...
pub fn encoded_profiles(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("Custom%20Profile%20{:02}", i))
        .collect()
}

/// Decoded form of [`encoded_profiles`]
pub fn decoded_profiles(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Custom Profile {:02}", i)).collect()
}

/// 21 syncable profiles with the two excluded ones mixed in (23 total)
pub fn org_listing() -> Vec<String> {
    let mut listing = encoded_profiles(21);
    listing.insert(0, "Admin".to_string());
    listing.insert(12, "Read%20Only".to_string());
    listing
}
