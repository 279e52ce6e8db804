use crate::host::OwnerId;
use std::collections::HashSet;

/// One intercepted host entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WrapKey {
    owner: OwnerId,
    key: String,
}

impl WrapKey {
    pub fn new(owner: &OwnerId, key: &str) -> Self { Self { owner: owner.clone(), key: key.to_string() } }
}

/// Entry points already replaced by the harness. Entries live as long as the page does.
#[derive(Debug, Default)]
pub struct WrapRegistry {
    wrapped: HashSet<WrapKey>,
}

impl WrapRegistry {
    pub fn new() -> Self { Self::default() }

    #[cfg(test)]
    pub fn contains(&self, owner: &OwnerId, key: &str) -> bool {
        self.wrapped.contains(&WrapKey::new(owner, key))
    }

    /// Records `owner.key`; `false` if it was already recorded.
    pub fn register(&mut self, owner: &OwnerId, key: &str) -> bool {
        self.wrapped.insert(WrapKey::new(owner, key))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.wrapped.len() }
}
