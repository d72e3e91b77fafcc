use std::{hash::Hash, sync::Arc};

use hashbrown::{Equivalent, HashMap};

/// Named collection of shared items with an optional default.
pub struct Registry<T: ?Sized, K = String> {
    items: HashMap<K, Arc<T>>,
    default: Option<Arc<T>>,
}

impl<T: ?Sized, K> Registry<T, K> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            default: None,
        }
    }

    pub fn with_default(default: Arc<T>) -> Self {
        Self {
            items: HashMap::new(),
            default: Some(default),
        }
    }

    pub fn get_default(&self) -> Option<Arc<T>> {
        self.default.clone()
    }

    pub fn set_default(&mut self, default: Arc<T>) {
        self.default = Some(default);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: ?Sized, K> Registry<T, K>
where
    K: Hash + Eq,
{
    pub fn register(&mut self, key: K, item: Arc<T>) {
        self.items.insert(key, item);
    }

    pub fn get<Q>(&self, k: &Q) -> Option<Arc<T>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.items.get(k).cloned()
    }

    pub fn is_registered<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.items.contains_key(k)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.items.keys()
    }
}

impl<T: ?Sized, K> Default for Registry<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_default() {
        let mut registry: Registry<str> = Registry::with_default(Arc::from("fallback"));
        registry.register("a".to_string(), Arc::from("first"));

        assert!(registry.is_registered("a"));
        assert!(!registry.is_registered("b"));
        assert_eq!(registry.get("a").as_deref(), Some("first"));
        assert_eq!(registry.get("b"), None);
        assert_eq!(registry.get_default().as_deref(), Some("fallback"));
        assert_eq!(registry.len(), 1);

        registry.set_default(Arc::from("second"));
        assert_eq!(registry.get_default().as_deref(), Some("second"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), [&"a".to_string()]);
    }
}
