use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    any::{RcAny, TypeInfo},
    errors::ConfigurationErrorKind,
    instantiator::Callable,
};

pub(crate) type Slot = Arc<OnceCell<RcAny>>;

/// Instance store, factory store and provider registry, all keyed by [`TypeInfo`].
///
/// Locks are only held for the map operation itself, never while user code runs.
#[derive(Default)]
pub(crate) struct Registry {
    instances: RwLock<BTreeMap<TypeInfo, RcAny>>,
    factories: RwLock<BTreeMap<TypeInfo, Callable>>,
    providers: RwLock<BTreeMap<TypeInfo, Callable>>,
    slots: Mutex<BTreeMap<TypeInfo, Slot>>,
}

impl Registry {
    #[inline]
    pub(crate) fn get_instance(&self, type_info: &TypeInfo) -> Option<RcAny> {
        self.instances.read().get(type_info).cloned()
    }

    #[inline]
    pub(crate) fn get_factory(&self, type_info: &TypeInfo) -> Option<Callable> {
        self.factories.read().get(type_info).cloned()
    }

    #[inline]
    pub(crate) fn get_provider(&self, type_info: &TypeInfo) -> Option<Callable> {
        self.providers.read().get(type_info).cloned()
    }

    pub(crate) fn set_instance(&self, type_info: TypeInfo, value: RcAny, overwrite: bool) -> Result<Option<RcAny>, ConfigurationErrorKind> {
        insert_guarded(&mut self.instances.write(), type_info, value, overwrite)
            .map_err(|type_info| ConfigurationErrorKind::InstanceExists { type_info })
    }

    pub(crate) fn set_factory(
        &self,
        type_info: TypeInfo,
        value: Callable,
        overwrite: bool,
    ) -> Result<Option<Callable>, ConfigurationErrorKind> {
        insert_guarded(&mut self.factories.write(), type_info, value, overwrite)
            .map_err(|type_info| ConfigurationErrorKind::FactoryExists { type_info })
    }

    pub(crate) fn set_provider(
        &self,
        type_info: TypeInfo,
        value: Callable,
        overwrite: bool,
    ) -> Result<Option<Callable>, ConfigurationErrorKind> {
        insert_guarded(&mut self.providers.write(), type_info, value, overwrite)
            .map_err(|type_info| ConfigurationErrorKind::ProviderExists { type_info })
    }

    /// Inserts every provider or none of them.
    ///
    /// Without `overwrite`, a key that is already registered, or that appears twice in `providers`, fails the whole batch.
    pub(crate) fn set_providers(
        &self,
        providers: Vec<(TypeInfo, Callable)>,
        overwrite: bool,
    ) -> Result<Vec<(TypeInfo, Option<Callable>)>, ConfigurationErrorKind> {
        let mut registered = self.providers.write();

        if !overwrite {
            let mut batch = BTreeSet::new();
            for (type_info, _) in &providers {
                if registered.contains_key(type_info) || !batch.insert(*type_info) {
                    return Err(ConfigurationErrorKind::ProviderExists { type_info: *type_info });
                }
            }
        }

        Ok(providers
            .into_iter()
            .map(|(type_info, provider)| (type_info, registered.insert(type_info, provider)))
            .collect())
    }

    /// Slot shared by everyone resolving the same singleton key until its value is cached.
    pub(crate) fn singleton_slot(&self, type_info: TypeInfo) -> Slot {
        self.slots.lock().entry(type_info).or_default().clone()
    }

    /// Stores a singleton value unless an instance already exists, returning the stored one.
    pub(crate) fn cache_instance(&self, type_info: TypeInfo, value: RcAny) -> RcAny {
        let cached = self.instances.write().entry(type_info).or_insert(value).clone();
        self.slots.lock().remove(&type_info);
        cached
    }
}

fn insert_guarded<V>(map: &mut BTreeMap<TypeInfo, V>, type_info: TypeInfo, value: V, overwrite: bool) -> Result<Option<V>, TypeInfo> {
    match map.entry(type_info) {
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(None)
        }
        Entry::Occupied(mut entry) if overwrite => Ok(Some(entry.insert(value))),
        Entry::Occupied(_) => Err(type_info),
    }
}
