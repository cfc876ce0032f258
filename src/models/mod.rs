/// Catalog of a board's active threads, organized by index page.
pub mod catalog;

/// A single thread and the posts it contains.
pub mod thread;

pub(crate) fn maybe_de_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <Option<u32> as serde::Deserialize>::deserialize(deserializer)?;
    // If it's 1, return Some(true), if it's 0, return Some(false), else None
    Ok(value.map(|v| v == 1))
}
