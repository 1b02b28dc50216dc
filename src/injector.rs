use once_cell::sync::OnceCell;
use std::{
    any::{type_name, Any as _},
    sync::Arc,
};
use tracing::{debug, error, info_span, warn};

use crate::{
    any::{RcAny, TypeInfo},
    args::Args,
    config::Config,
    dependency_resolver::DependencyResolver,
    errors::{ConfigurationErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    guard::ResolutionGuard,
    injectable::{Injectable, Recipe},
    instantiator::{provider, Callable, Instantiator},
    plugin::{Plugin, PluginSource},
    registry::Registry,
};

/// Dependency-resolution container.
///
/// Cloning is cheap and every clone shares the same registries.
#[derive(Clone, Default)]
pub struct Injector {
    pub(crate) inner: Arc<InjectorInner>,
}

#[derive(Default)]
pub(crate) struct InjectorInner {
    registry: Registry,
    config: Config,
}

impl Injector {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(InjectorInner {
                registry: Registry::default(),
                config,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Gets a dependency, building it if needed.
    ///
    /// Lookup order: registered instance, factory, provider, then the type's [`Recipe`].
    /// Results of singleton-marked factories and providers are cached as instances.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::Unresolvable`] if nothing is registered and the recipe is [`Recipe::Opaque`]
    /// - [`ResolveErrorKind::CyclicDependency`] if the type is already being resolved on this thread
    /// - [`ResolveErrorKind::DepthExceeded`] if nesting goes past [`Config::max_depth`]
    /// - [`ResolveErrorKind::Instantiator`] if a parameter or the producing function failed
    pub fn get<Dep: Injectable>(&self) -> Result<Arc<Dep>, ResolveErrorKind> {
        let type_info = TypeInfo::of::<Dep>();
        let span = info_span!("get", dependency = type_info.name);
        let _guard = span.enter();

        let _resolving = self.enter(type_info)?;
        self.resolve::<Dep>()
    }

    /// Calls a function, resolving every parameter the caller didn't supply.
    ///
    /// # Errors
    /// Returns the parameter's error if one couldn't be resolved,
    /// or [`InstantiatorErrorKind::Factory`] wrapped in [`ResolveErrorKind::Instantiator`] if the function failed.
    #[inline]
    pub fn call<Inst, Deps>(&self, instantiator: Inst) -> Result<Inst::Provides, ResolveErrorKind>
    where
        Inst: Instantiator<Deps>,
        Deps: DependencyResolver,
    {
        self.call_with(instantiator, &Args::new())
    }

    /// Like [`Injector::call`], taking parameter values from `args` first.
    ///
    /// # Errors
    /// See [`Injector::call`].
    pub fn call_with<Inst, Deps>(&self, instantiator: Inst, args: &Args) -> Result<Inst::Provides, ResolveErrorKind>
    where
        Inst: Instantiator<Deps>,
        Deps: DependencyResolver,
    {
        let span = info_span!("call", callable = type_name::<Inst>(), supplied = args.len());
        let _guard = span.enter();

        let dependencies = match Deps::resolve(self, args) {
            Ok(dependencies) => dependencies,
            Err(err) => {
                let err: ResolveErrorKind = err.into();
                error!("{}", err);
                return Err(err);
            }
        };

        match instantiator.instantiate(dependencies) {
            Ok(provides) => {
                debug!("Called");
                Ok(provides)
            }
            Err(err) => {
                let err = ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err.into()));
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Registers a provider under the type it produces.
    ///
    /// # Errors
    /// - [`ConfigurationErrorKind::NotAProvider`] if the callable isn't marked as a provider
    /// - [`ConfigurationErrorKind::IncorrectType`] if the marked type isn't what the callable returns
    /// - [`ConfigurationErrorKind::ProviderExists`] if the type already has a provider and
    ///   [`Config::replace_providers`] is off
    pub fn register_provider(&self, provider: Callable) -> Result<(), ConfigurationErrorKind> {
        let span = info_span!("register_provider", provider = provider.name());
        let _guard = span.enter();

        let produces = check_provider(&provider)?;

        match self
            .inner
            .registry
            .set_provider(produces, provider, self.inner.config.replace_providers)
        {
            Ok(None) => {
                debug!(provides = produces.name, "Registered");
                Ok(())
            }
            Ok(Some(previous)) => {
                warn!(provides = produces.name, previous = previous.name(), "Replaced provider");
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Registers `instantiator` as a provider of its return type.
    ///
    /// # Errors
    /// See [`Injector::register_provider`].
    #[inline]
    pub fn provide<Inst, Deps>(&self, instantiator: Inst) -> Result<(), ConfigurationErrorKind>
    where
        Inst: Instantiator<Deps>,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver,
    {
        self.register_provider(provider(instantiator))
    }

    /// Registers `instantiator` as a singleton provider of its return type.
    ///
    /// # Errors
    /// See [`Injector::register_provider`].
    #[inline]
    pub fn provide_singleton<Inst, Deps>(&self, instantiator: Inst) -> Result<(), ConfigurationErrorKind>
    where
        Inst: Instantiator<Deps>,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver,
    {
        self.register_provider(provider(instantiator).singleton())
    }

    /// Registers the provider methods of a live plugin.
    ///
    /// Either every provider method gets registered or, on error, none of them.
    ///
    /// # Errors
    /// See [`Injector::register_provider`].
    #[inline]
    pub fn register_plugin<P: Plugin>(&self, plugin: P) -> Result<(), ConfigurationErrorKind> {
        self.register_plugin_rc(Arc::new(plugin))
    }

    /// Registers the provider methods of a shared plugin.
    ///
    /// # Errors
    /// See [`Injector::register_provider`].
    #[inline]
    pub fn register_plugin_rc<P: Plugin>(&self, plugin: Arc<P>) -> Result<(), ConfigurationErrorKind> {
        self.register_plugin_source(PluginSource::Eager(plugin))
    }

    /// Registers the provider methods of a plugin that is resolved the first time one of them is used.
    ///
    /// The plugin's own dependencies only have to be available by then, not at registration.
    ///
    /// # Errors
    /// See [`Injector::register_provider`].
    #[inline]
    pub fn register_plugin_type<P: Plugin + Injectable>(&self) -> Result<(), ConfigurationErrorKind> {
        self.register_plugin_source(PluginSource::Lazy {
            cell: Arc::new(OnceCell::new()),
            resolve: Self::resolve::<P>,
        })
    }

    /// Sets an instance of a type.
    ///
    /// # Errors
    /// Returns [`ConfigurationErrorKind::InstanceExists`] if an instance is set and `overwrite` is `false`.
    #[inline]
    pub fn set_instance<Dep: Send + Sync + 'static>(&self, value: Dep, overwrite: bool) -> Result<(), ConfigurationErrorKind> {
        self.set_instance_rc(Arc::new(value), overwrite)
    }

    /// Sets a shared instance of a type. [`Injector::get`] returns this very `Arc`.
    ///
    /// # Errors
    /// See [`Injector::set_instance`].
    pub fn set_instance_rc<Dep: Send + Sync + 'static>(&self, value: Arc<Dep>, overwrite: bool) -> Result<(), ConfigurationErrorKind> {
        let type_info = TypeInfo::of::<Dep>();
        match self.inner.registry.set_instance(type_info, value, overwrite) {
            Ok(previous) => {
                debug!(dependency = type_info.name, overwritten = previous.is_some(), "Instance set");
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Sets the callable used to produce a type instead of its recipe or provider.
    ///
    /// # Errors
    /// - [`ConfigurationErrorKind::IncorrectType`] if the callable doesn't return `Dep`
    /// - [`ConfigurationErrorKind::FactoryExists`] if a factory is set and `overwrite` is `false`
    pub fn set_factory<Dep: Send + Sync + 'static>(&self, factory: Callable, overwrite: bool) -> Result<(), ConfigurationErrorKind> {
        let type_info = TypeInfo::of::<Dep>();
        if factory.output() != type_info {
            let err = ConfigurationErrorKind::IncorrectType {
                name: factory.name(),
                expected: type_info,
                actual: factory.output(),
            };
            error!("{}", err);
            return Err(err);
        }

        match self.inner.registry.set_factory(type_info, factory, overwrite) {
            Ok(previous) => {
                debug!(dependency = type_info.name, overwritten = previous.is_some(), "Factory set");
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }
}

impl Injector {
    #[inline]
    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Marks `type_info` as being resolved on this thread until the guard drops.
    pub(crate) fn enter(&self, type_info: TypeInfo) -> Result<ResolutionGuard, ResolveErrorKind> {
        ResolutionGuard::enter(self.id(), type_info, self.inner.config.max_depth).map_err(|err| {
            error!("{}", err);
            err
        })
    }

    /// [`Injector::get`] without entering the resolution guard. Callers enter it themselves.
    pub(crate) fn resolve<Dep: Injectable>(&self) -> Result<Arc<Dep>, ResolveErrorKind> {
        let type_info = TypeInfo::of::<Dep>();
        match self.lookup(type_info)? {
            Some(dependency) => downcast(type_info, dependency),
            None => self.build::<Dep>(type_info),
        }
    }

    fn register_plugin_source<P: Plugin>(&self, source: PluginSource<P>) -> Result<(), ConfigurationErrorKind> {
        let span = info_span!("register_plugin", plugin = type_name::<P>());
        let _guard = span.enter();

        let mut providers = Vec::new();
        for method in P::methods() {
            if !method.metadata().is_provider() {
                debug!(method = method.name(), "Skipped, not a provider");
                continue;
            }
            let provider = method.bind(source.clone());
            providers.push((check_provider(&provider)?, provider));
        }

        match self
            .inner
            .registry
            .set_providers(providers, self.inner.config.replace_providers)
        {
            Ok(registered) => {
                for (produces, previous) in registered {
                    match previous {
                        None => debug!(provides = produces.name, "Registered"),
                        Some(previous) => warn!(provides = produces.name, previous = previous.name(), "Replaced provider"),
                    }
                }
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn lookup(&self, type_info: TypeInfo) -> Result<Option<RcAny>, ResolveErrorKind> {
        let registry = &self.inner.registry;

        if let Some(instance) = registry.get_instance(&type_info) {
            debug!("Found in instances");
            return Ok(Some(instance));
        }
        if let Some(factory) = registry.get_factory(&type_info) {
            debug!(factory = factory.name(), "Found factory");
            return self.produce(type_info, &factory).map(Some);
        }
        if let Some(provider) = registry.get_provider(&type_info) {
            debug!(provider = provider.name(), "Found provider");
            return self.produce(type_info, &provider).map(Some);
        }

        debug!("Not registered");
        Ok(None)
    }

    fn produce(&self, type_info: TypeInfo, callable: &Callable) -> Result<RcAny, ResolveErrorKind> {
        if !callable.metadata().is_singleton() {
            return self.invoke(callable);
        }

        let registry = &self.inner.registry;
        let slot = registry.singleton_slot(type_info);
        let dependency = slot
            .get_or_try_init(|| match registry.get_instance(&type_info) {
                Some(instance) => Ok(instance),
                None => self.invoke(callable),
            })?
            .clone();

        let dependency = registry.cache_instance(type_info, dependency);
        debug!("Cached");
        Ok(dependency)
    }

    fn invoke(&self, callable: &Callable) -> Result<RcAny, ResolveErrorKind> {
        callable.invoke(self, &Args::new()).map_err(|err| {
            let err = ResolveErrorKind::from(err);
            error!("{}", err);
            err
        })
    }

    fn build<Dep: Injectable>(&self, type_info: TypeInfo) -> Result<Arc<Dep>, ResolveErrorKind> {
        match Dep::recipe() {
            Recipe::Construct(constructor) => match constructor.construct(self) {
                Ok(dependency) => {
                    debug!("Constructed");
                    Ok(Arc::new(dependency))
                }
                Err(err) => {
                    error!("{}", err);
                    Err(err)
                }
            },
            Recipe::Invoke(callable) => {
                if callable.output() != type_info {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: type_info,
                        actual: callable.output().id,
                    };
                    error!("{}", err);
                    return Err(err);
                }
                downcast(type_info, self.invoke(&callable)?)
            }
            Recipe::Opaque => {
                let err = ResolveErrorKind::Unresolvable { type_info };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

/// Type a callable may be registered under as a provider.
fn check_provider(provider: &Callable) -> Result<TypeInfo, ConfigurationErrorKind> {
    let Some(produces) = provider.metadata().produces() else {
        let err = ConfigurationErrorKind::NotAProvider { name: provider.name() };
        error!("{}", err);
        return Err(err);
    };
    if produces != provider.output() {
        let err = ConfigurationErrorKind::IncorrectType {
            name: provider.name(),
            expected: produces,
            actual: provider.output(),
        };
        error!("{}", err);
        return Err(err);
    }
    Ok(produces)
}

fn downcast<Dep: Send + Sync + 'static>(type_info: TypeInfo, dependency: RcAny) -> Result<Arc<Dep>, ResolveErrorKind> {
    dependency.downcast::<Dep>().map_err(|incorrect_type| {
        let err = ResolveErrorKind::IncorrectType {
            expected: type_info,
            actual: (*incorrect_type).type_id(),
        };
        error!("{}", err);
        err
    })
}
