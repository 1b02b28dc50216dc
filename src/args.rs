use std::sync::Arc;

use crate::any::{self, TypeInfo};

/// Values supplied by the caller of [`crate::Injector::call_with`].
///
/// Keyed by type. A parameter whose type has a value here takes it instead of being resolved.
///
/// There is one value per type, not per parameter: a callable taking two `Inject<A>` or `Arg<A>`
/// parameters gets the same supplied `A` in both. Wrap values in distinct newtypes to tell them apart.
#[derive(Clone, Default)]
pub struct Args {
    pub(crate) map: Option<Box<any::Map>>,
}

impl Args {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { map: None }
    }

    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<Arc<T>> {
        self.insert_rc(Arc::new(value))
    }

    #[inline]
    pub fn insert_rc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) -> Option<Arc<T>> {
        self.map
            .get_or_insert_with(Box::default)
            .insert(TypeInfo::of::<T>(), value)
            .and_then(|boxed| boxed.downcast().ok())
    }

    #[inline]
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .as_ref()
            .and_then(|map| map.get(&TypeInfo::of::<T>()))
            .and_then(|boxed| boxed.clone().downcast().ok())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.map.as_ref().is_some_and(|map| map.contains_key(type_info))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
