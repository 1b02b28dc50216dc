use std::sync::Arc;
use tracing::debug;

use crate::{
    any::TypeInfo,
    args::Args,
    dependency::Dependency,
    dependency_resolver::DependencyResolver,
    errors::{InstantiatorErrorKind, ResolveErrorKind},
    instantiator::{Callable, InstantiatorError, Instantiator},
    metadata::Metadata,
    Injector,
};

/// A type the injector may be asked for.
///
/// The default [`Recipe::Opaque`] means the type is only available through registered
/// instances, factories or providers. Override [`Injectable::recipe`] to let the injector
/// build the type on its own.
///
/// # Examples
/// ```rust
/// use autowire::{Inject, Injectable, InstantiateErrorKind, Injector, Recipe};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Config;
///
/// impl Injectable for Config {
///     fn recipe() -> Recipe<Self> {
///         Recipe::from_default()
///     }
/// }
///
/// struct Service {
///     config: Arc<Config>,
/// }
///
/// impl Injectable for Service {
///     fn recipe() -> Recipe<Self> {
///         Recipe::construct(|Inject(config): Inject<Config>| Ok::<_, InstantiateErrorKind>(Service { config }))
///     }
/// }
///
/// let service = Injector::new().get::<Service>().unwrap();
/// let _config: &Config = &service.config;
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    #[must_use]
    fn recipe() -> Recipe<Self> {
        Recipe::Opaque
    }
}

/// How a type is produced when nothing is registered for it.
pub enum Recipe<T> {
    /// Resolve the constructor's parameters, construct, then fill injection targets.
    Construct(Constructor<T>),
    /// Resolve the callable's parameters and return its result.
    Invoke(Callable),
    /// Not buildable by the injector.
    Opaque,
}

impl<T: Send + Sync + 'static> Recipe<T> {
    #[inline]
    #[must_use]
    pub fn construct<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps, Provides = T>,
        Deps: DependencyResolver,
    {
        Self::Construct(Constructor::new(instantiator))
    }

    /// Constructor without parameters.
    #[inline]
    #[must_use]
    pub fn from_default() -> Self
    where
        T: Default,
    {
        Self::Construct(Constructor::from_default())
    }

    #[inline]
    #[must_use]
    pub fn invoke(callable: Callable) -> Self {
        Self::Invoke(callable)
    }

    #[must_use]
    pub fn metadata(&self) -> Metadata {
        match self {
            Self::Construct(constructor) => constructor.metadata.clone(),
            Self::Invoke(callable) => callable.metadata().clone(),
            Self::Opaque => Metadata::new(),
        }
    }
}

type Build<T> = Box<dyn FnOnce(&Injector) -> Result<T, InstantiatorError>>;

type Assign<T> = Box<dyn Fn(&Injector, &mut T) -> Result<(), ResolveErrorKind>>;

struct InjectionTarget<T> {
    name: &'static str,
    assign: Assign<T>,
}

/// Structural constructor of `T` with optional post-construction injection targets.
pub struct Constructor<T> {
    build: Build<T>,
    dependencies: Vec<Dependency>,
    targets: Vec<InjectionTarget<T>>,
    metadata: Metadata,
}

impl<T: Send + Sync + 'static> Constructor<T> {
    #[must_use]
    pub fn new<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps, Provides = T>,
        Deps: DependencyResolver,
    {
        Self {
            build: Box::new(move |injector: &Injector| -> Result<T, InstantiatorError> {
                let dependencies = match Deps::resolve(injector, &Args::new()) {
                    Ok(dependencies) => dependencies,
                    Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
                };
                instantiator
                    .instantiate(dependencies)
                    .map_err(|err| InstantiatorErrorKind::Factory(err.into()))
            }),
            dependencies: Deps::dependencies(),
            targets: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn from_default() -> Self
    where
        T: Default,
    {
        Self {
            build: Box::new(|_: &Injector| -> Result<T, InstantiatorError> { Ok(T::default()) }),
            dependencies: Vec::new(),
            targets: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Requires an extra attribute named `name` of type `U`, resolved and assigned after construction.
    ///
    /// The attribute needs no constructor slot; `assign` stores the resolved value on the new instance.
    #[must_use]
    pub fn inject<U, F>(mut self, name: &'static str, assign: F) -> Self
    where
        U: Injectable,
        F: Fn(&mut T, Arc<U>) + 'static,
    {
        self.metadata.merge(Metadata::new().with_inject(name, TypeInfo::of::<U>()));
        self.targets.push(InjectionTarget {
            name,
            assign: Box::new(move |injector: &Injector, dependency: &mut T| -> Result<(), ResolveErrorKind> {
                assign(dependency, injector.get::<U>()?);
                Ok(())
            }),
        });
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.merge(metadata);
        self
    }

    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    #[inline]
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn construct(self, injector: &Injector) -> Result<T, ResolveErrorKind> {
        let mut dependency = (self.build)(injector)?;
        for InjectionTarget { name, assign } in self.targets {
            assign(injector, &mut dependency)?;
            debug!(target = name, "Injected");
        }
        Ok(dependency)
    }
}

opaque_injectable!(
    String,
    &'static str,
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

impl<T: ?Sized + Send + Sync + 'static> Injectable for Box<T> {}

impl<T: Send + Sync + 'static> Injectable for Vec<T> {}
