use std::{ops::Deref, sync::Arc};

use crate::{
    args::Args, dependency::Dependency, dependency_resolver::DependencyResolver, injectable::Injectable, Injector,
    ResolveErrorKind,
};

/// Parameter resolved by type: a caller-supplied value if one is present, otherwise [`Injector::get`].
#[derive(Debug)]
pub struct Inject<Dep>(pub Arc<Dep>);

impl<Dep: Injectable> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    fn resolve(injector: &Injector, args: &Args) -> Result<Self, Self::Error> {
        if let Some(dependency) = args.get::<Dep>() {
            return Ok(Self(dependency));
        }
        injector.get().map(Self)
    }

    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::injected::<Dep>()]
    }
}

impl<Dep> Deref for Inject<Dep> {
    type Target = Dep;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Parameter with no resolvable type: it can only be supplied by the caller.
///
/// Wrap it in [`Option`] to let the callable fall back to its own default.
#[derive(Debug)]
pub struct Arg<T>(pub Arc<T>);

impl<T: Send + Sync + 'static> DependencyResolver for Arg<T> {
    type Error = ResolveErrorKind;

    fn resolve(_injector: &Injector, args: &Args) -> Result<Self, Self::Error> {
        args.get().map(Self).ok_or_else(|| ResolveErrorKind::MissingArgument {
            type_info: crate::TypeInfo::of::<T>(),
        })
    }

    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::supplied::<T>()]
    }
}

impl<T: Send + Sync + 'static> DependencyResolver for Option<Arg<T>> {
    type Error = ResolveErrorKind;

    fn resolve(_injector: &Injector, args: &Args) -> Result<Self, Self::Error> {
        Ok(args.get().map(Arg))
    }

    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::optional::<T>()]
    }
}

impl<T> Deref for Arg<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
