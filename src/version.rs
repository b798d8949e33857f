// Version information for the seed classification gateway

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-seed-detection-gateway";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "roboflow-hosted-detection",
    "multipart-upload",
    "resize-before-upload",
    "annotated-image",
    "cors",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} ({})", VERSION, FEATURES.join(", "))
}
