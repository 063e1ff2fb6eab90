//! Value and Getter Capabilities
//!
//! The two traits a caller plugs into a group: what gets cached and how it
//! is loaded.

// == Value ==
/// A cacheable value that releases its resources when evicted.
///
/// The cache calls [`Value::dispose`] exactly once per evicted entry, while
/// holding the owning group's cache lock. Implementations must not call back
/// into the group from `dispose`.
pub trait Value: Send + Sync + 'static {
    /// Releases any resources held by the value.
    fn dispose(&self) -> anyhow::Result<()>;
}

// == Getter ==
/// Loads the value for a key on a cache miss.
///
/// Any retry policy belongs to the getter; the group calls it once per miss.
pub trait Getter<V>: Send + Sync {
    /// Returns the value identified by `key`.
    fn get(&self, key: &str) -> anyhow::Result<V>;
}

impl<V, F> Getter<V> for F
where
    F: Fn(&str) -> anyhow::Result<V> + Send + Sync,
{
    fn get(&self, key: &str) -> anyhow::Result<V> {
        self(key)
    }
}
