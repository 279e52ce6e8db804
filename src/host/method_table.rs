use super::{HostCallError, HostCallResult, HostValue};
use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, RwLock},
};

/// A callable host entry point. The receiver (`this`) is whatever the closure captured.
pub type HostMethod = Arc<dyn Fn(&[HostValue]) -> HostCallResult + Send + Sync>;

/// Stable identity of a host object holding entry points, e.g. `"geofs.autopilot"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(path: &str) -> Self { Self(path.to_string()) }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Clone)]
enum Slot {
    Method(HostMethod),
    Value(HostValue),
}

/// A host object viewed as named slots. Slots are looked up at call time, so
/// replacing a slot redirects every later call made through the table.
pub struct MethodTable {
    id: OwnerId,
    slots: RwLock<BTreeMap<String, Slot>>,
}

impl MethodTable {
    pub fn new(path: &str) -> Self {
        Self { id: OwnerId::new(path), slots: RwLock::new(BTreeMap::new()) }
    }

    pub fn id(&self) -> &OwnerId { &self.id }

    /// The method stored under `key`, `None` if absent or not callable.
    pub fn method(&self, key: &str) -> Option<HostMethod> {
        match self.slots.read().ok()?.get(key)? {
            Slot::Method(m) => Some(Arc::clone(m)),
            Slot::Value(_) => None,
        }
    }

    pub fn value(&self, key: &str) -> Option<HostValue> {
        match self.slots.read().ok()?.get(key)? {
            Slot::Value(v) => Some(v.clone()),
            Slot::Method(_) => None,
        }
    }

    pub fn set_method(&self, key: &str, method: HostMethod) {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(key.to_string(), Slot::Method(method));
        }
    }

    pub fn set_value(&self, key: &str, value: HostValue) {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(key.to_string(), Slot::Value(value));
        }
    }

    /// All slot keys in lexical order, callable or not.
    pub fn keys(&self) -> Vec<String> {
        self.slots.read().map(|s| s.keys().cloned().collect()).unwrap_or_default()
    }

    /// Calls the method under `key`. The lock is released before the call,
    /// so the method may itself call back into this table.
    pub fn call(&self, key: &str, args: &[HostValue]) -> HostCallResult {
        let slot = self
            .slots
            .read()
            .map_err(|_| HostCallError::Missing(key.to_string()))?
            .get(key)
            .cloned();
        match slot {
            Some(Slot::Method(m)) => m(args),
            Some(Slot::Value(_)) => Err(HostCallError::NotCallable(format!("{}.{key}", self.id))),
            None => Err(HostCallError::Missing(format!("{}.{key}", self.id))),
        }
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable").field("id", &self.id).field("keys", &self.keys()).finish()
    }
}
