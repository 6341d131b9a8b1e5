use serde::{Deserialize, Deserializer};

/// Wraps any present value in `Some`, so that with `#[serde(default)]` an
/// absent key reads as `None` and an explicit `null` as `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
