//! Key/value preference store with change notifications.
//!
//! Values are kept as JSON so any serde type can be stored. Typed access
//! goes through [`Preference`] handles. Every successful write that changes
//! a value is broadcast to current subscribers; subscribers that are not
//! listening at the time of a write never see it.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::{LibraryError, Result};

/// Capacity of the change channel. Slow subscribers skip what they missed.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A value change. `value` is `None` when the key was deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceChange {
    pub key: String,
    pub value: Option<Value>,
}

/// Stream of decoded values emitted by [`Preference::changes`].
pub type PreferenceStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// In-memory preference store shared through `Arc`.
pub struct PreferenceStore {
    values: RwLock<BTreeMap<String, Value>>,
    changes: broadcast::Sender<PreferenceChange>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(BTreeMap::new()),
            changes,
        }
    }
}

impl PreferenceStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raw stored value, if any.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store `value` under `key`, notifying subscribers if it changed.
    pub fn set_raw(&self, key: &str, value: Value) {
        let changed = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            match values.get(key) {
                Some(old) if *old == value => false,
                _ => {
                    values.insert(key.to_owned(), value.clone());
                    true
                }
            }
        };
        if changed {
            self.notify(key, Some(value));
        }
    }

    /// Remove `key`. Returns `true` if it was set.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            self.notify(key, None);
        }
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Receive every change from now on. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.changes.subscribe()
    }

    fn notify(&self, key: &str, value: Option<Value>) {
        tracing::trace!(key, "preference changed");
        // No subscribers is fine.
        let _ = self.changes.send(PreferenceChange {
            key: key.to_owned(),
            value,
        });
    }

    /// Typed handle for `key`, answering `default` while unset.
    pub fn preference<T>(self: &Arc<Self>, key: impl Into<String>, default: T) -> Preference<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        Preference {
            store: Arc::clone(self),
            key: key.into(),
            default,
            _marker: PhantomData,
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("keys", &self.keys())
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}

/// Typed view of one preference key.
#[derive(Clone)]
pub struct Preference<T> {
    store: Arc<PreferenceStore>,
    key: String,
    default: T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Preference<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Current value, or the default when unset or undecodable.
    pub fn get(&self) -> T {
        decode_or(&self.key, self.store.get_raw(&self.key).as_ref(), &self.default)
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::Preference`] if `value` cannot be encoded.
    pub fn set(&self, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| LibraryError::Preference(format!("{}: {e}", self.key)))?;
        self.store.set_raw(&self.key, encoded);
        Ok(())
    }

    /// Reset to the default. Subscribers receive the default value.
    pub fn delete(&self) {
        self.store.remove(&self.key);
    }

    pub fn is_set(&self) -> bool {
        self.store.contains(&self.key)
    }

    /// Values written to this key from now on.
    ///
    /// Each call starts a fresh subscription; dropping the stream ends it.
    /// Changes missed by a lagging subscriber are skipped.
    pub fn changes(&self) -> PreferenceStream<T> {
        let key = self.key.clone();
        let default = self.default.clone();
        let stream = BroadcastStream::new(self.store.subscribe()).filter_map(move |event| {
            let change = event.ok()?;
            if change.key != key {
                return None;
            }
            Some(decode_or(&key, change.value.as_ref(), &default))
        });
        Box::pin(stream)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Preference<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preference")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}

fn decode_or<T: DeserializeOwned + Clone>(key: &str, value: Option<&Value>, default: &T) -> T {
    let Some(value) = value else {
        return default.clone();
    };
    match T::deserialize(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored preference does not decode, using default");
            default.clone()
        }
    }
}
