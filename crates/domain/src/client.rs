use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// identifier (IP, MAC, ClientID) -> display name
pub type ClientNames = HashMap<String, String>;

/// A persistent client as configured on the appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ids: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClientInfo {
    pub fn new(name: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ids,
        }
    }
}

/// One record of a client search response: the key the appliance matched on
/// and the client it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLookupRecord {
    pub lookup_key: String,
    pub info: ClientInfo,
}
