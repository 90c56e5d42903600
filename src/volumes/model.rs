// Volume domain models

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub labels: HashMap<String, String>,
    pub options: HashMap<String, String>,
    /// "local" or "global".
    pub scope: String,
    pub created_at: String,
    /// Driver-specific, passed through uninterpreted.
    pub status: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateVolumeOptions {
    pub name: String,
    /// Empty lets the daemon pick ("local").
    pub driver: String,
    pub driver_opts: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}
