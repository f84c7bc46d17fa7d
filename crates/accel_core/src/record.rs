use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Stable key used for list diffing.
pub type RecordKey = u64;

/// One acceleration row as delivered by the backend.
///
/// Only the fields the pipeline reads or derives are typed; everything else is
/// carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub boost_cost: Option<f64>,
    #[serde(default)]
    pub bid_boost: Option<f64>,
    /// Derived by the normalizer; whatever the backend sent is overwritten.
    #[serde(default)]
    pub boost: Option<f64>,
    /// Unconfirmed rows may carry `null`; they key as 0.
    #[serde(default, alias = "blockHeight", deserialize_with = "null_as_default")]
    pub height: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn key(&self) -> RecordKey {
        self.height
    }

    pub fn has_status(&self) -> bool {
        self.status.as_deref().is_some_and(|status| !status.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
