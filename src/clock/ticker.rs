/// Keyed per-frame callback registry.
///
/// Registering a key that already exists replaces its callback in place, so re-running a setup
/// routine never doubles the per-frame work.
pub struct Ticker<F: ?Sized> {
    entries: Vec<(String, Box<F>)>,
}

impl<F: ?Sized> Default for Ticker<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for Ticker<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<F: ?Sized> Ticker<F> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `key`. Returns `true` if an existing entry was replaced.
    pub fn add(&mut self, key: impl Into<String>, callback: Box<F>) -> bool {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = callback;
            return true;
        }
        self.entries.push((key, callback));
        false
    }

    /// Unregister `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Run every callback through `call` in registration order.
    ///
    /// A failing callback is logged and skipped; the rest still run. Returns the number of
    /// failures.
    pub fn dispatch(&mut self, mut call: impl FnMut(&mut F) -> anyhow::Result<()>) -> usize {
        let mut faults = 0;
        for (key, cb) in &mut self.entries {
            if let Err(err) = call(cb.as_mut()) {
                faults += 1;
                tracing::warn!(key = key.as_str(), error = %err, "per-frame callback failed");
            }
        }
        faults
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/ticker.rs"]
mod tests;
