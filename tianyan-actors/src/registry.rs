use crate::actor::{Actor, Addr};
use dashmap::DashMap;
use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Shared lookup for typed values, mostly `Addr<T>`, by name or by type.
#[derive(Default, Clone)]
pub struct Registry {
    by_name: Arc<DashMap<String, Box<dyn Any + Send + Sync>>>,
    by_type: Arc<DashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

fn addr_key<A: Actor>(name: &str) -> String {
    format!("{}::{}", std::any::type_name::<Addr<A>>(), name)
}

impl Registry {
    pub fn insert_named<T: Send + Sync + 'static>(&self, name: impl Into<String>, value: T) {
        self.by_name.insert(name.into(), Box::new(value));
    }

    pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
        self.by_type.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get_named<T: Send + Sync + 'static + Clone>(&self, name: &str) -> Option<T> {
        self.by_name.get(name)?.downcast_ref::<T>().cloned()
    }

    pub fn get<T: Send + Sync + 'static + Clone>(&self) -> Option<T> {
        self.by_type
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn insert_addr<A: Actor>(&self, name: &str, addr: Addr<A>)
    where
        Addr<A>: Send + Sync,
    {
        self.insert_named(addr_key::<A>(name), addr);
    }

    pub fn get_addr<A: Actor>(&self, name: &str) -> Option<Addr<A>>
    where
        Addr<A>: Send + Sync,
    {
        self.get_named(&addr_key::<A>(name))
    }

    /// Drop every entry so held mailboxes can close.
    pub fn clear(&self) {
        self.by_name.clear();
        self.by_type.clear();
    }

    pub fn len(&self) -> usize {
        self.by_name.len() + self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct BaseUrl(String);

    #[test]
    fn typed_and_named_lookups_are_separate() {
        let reg = Registry::default();
        reg.insert(BaseUrl("http://127.0.0.1:1314/".into()));
        reg.insert_named("suffix", " - 天眼搜索".to_string());

        assert_eq!(
            reg.get::<BaseUrl>(),
            Some(BaseUrl("http://127.0.0.1:1314/".into()))
        );
        assert_eq!(reg.get_named::<String>("suffix").as_deref(), Some(" - 天眼搜索"));
        assert_eq!(reg.get_named::<BaseUrl>("suffix"), None);
        assert_eq!(reg.len(), 2);

        reg.clear();
        assert!(reg.is_empty());
    }
}
