use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseType {
    Dynamic,
    Static,
}

impl LeaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseType::Dynamic => "dynamic",
            LeaseType::Static => "static",
        }
    }
}

impl fmt::Display for LeaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lease exactly as the appliance reports it. Carries no type tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLease {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub hostname: String,
    /// Static leases never expire, so the appliance omits this field for them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl RawLease {
    pub fn new(mac: impl Into<String>, ip: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ip: ip.into(),
            hostname: hostname.into(),
            expires: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub mac: String,
    pub ip: String,
    pub hostname: String,
    pub expires: Option<String>,
    pub lease_type: LeaseType,
}

impl Lease {
    pub fn tagged(raw: &RawLease, lease_type: LeaseType) -> Self {
        Self {
            mac: raw.mac.clone(),
            ip: raw.ip.clone(),
            hostname: raw.hostname.clone(),
            expires: raw.expires.clone(),
            lease_type,
        }
    }
}

/// Raw DHCP status: both lease lists, untagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DhcpStatus {
    pub enabled: bool,
    pub dynamic_leases: Vec<RawLease>,
    pub static_leases: Vec<RawLease>,
}

/// Tagged leases, kept both split by type and as one dynamic-then-static list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedLeases {
    pub dynamic: Vec<Lease>,
    pub static_leases: Vec<Lease>,
    pub leases: Vec<Lease>,
}

impl MergedLeases {
    pub fn count(&self, lease_type: LeaseType) -> usize {
        match lease_type {
            LeaseType::Dynamic => self.dynamic.len(),
            LeaseType::Static => self.static_leases.len(),
        }
    }
}
