use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

use crate::{
    any::{RcAny, TypeInfo},
    args::Args,
    dependency::Dependency,
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    instantiator::{Callable, InstantiatorError},
    metadata::Metadata,
    Injector,
};

/// A group of providers defined as methods on one object.
///
/// # Examples
/// ```rust
/// use autowire::{Injector, InstantiateErrorKind, Method, Plugin};
///
/// struct Greetings {
///     name: &'static str,
/// }
///
/// impl Plugin for Greetings {
///     fn methods() -> Vec<Method<Self>> {
///         vec![Method::provider("greeting", |this: &Self| {
///             Ok::<_, InstantiateErrorKind>(format!("hello, {}", this.name))
///         })]
///     }
/// }
///
/// let injector = Injector::new();
/// injector.register_plugin(Greetings { name: "world" }).unwrap();
///
/// assert_eq!(*injector.get::<String>().unwrap(), "hello, world");
/// ```
pub trait Plugin: Send + Sync + Sized + 'static {
    /// Every method of the plugin. Only those carrying provider metadata get registered.
    fn methods() -> Vec<Method<Self>>;
}

/// A function of `&P` whose remaining parameters the injector can resolve.
pub trait MethodInstantiator<P, Deps>: Send + Sync + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&self, plugin: &P, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

macro_rules! impl_method_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, P, Response, Err, $($ty,)*> MethodInstantiator<P, ($($ty,)*)> for F
        where
            F: Fn(&P, $($ty,)*) -> Result<Response, Err> + Send + Sync + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&self, plugin: &P, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self(plugin, $($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_method_instantiator);

type UnboundMethod<P> = Arc<dyn Fn(&P, &Injector, &Args) -> Result<RcAny, InstantiatorError> + Send + Sync>;

/// A plugin method not yet bound to a plugin instance.
pub struct Method<P> {
    method: UnboundMethod<P>,
    name: &'static str,
    output: TypeInfo,
    dependencies: Vec<Dependency>,
    metadata: Metadata,
}

impl<P: Plugin> Method<P> {
    #[must_use]
    pub fn new<M, Deps>(name: &'static str, method: M) -> Self
    where
        M: MethodInstantiator<P, Deps>,
        M::Provides: Send + Sync,
        Deps: DependencyResolver,
    {
        Self {
            method: Arc::new(move |plugin: &P, injector: &Injector, args: &Args| -> Result<RcAny, InstantiatorError> {
                let dependencies = match Deps::resolve(injector, args) {
                    Ok(dependencies) => dependencies,
                    Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
                };
                let dependency = match method.instantiate(plugin, dependencies) {
                    Ok(dependency) => dependency,
                    Err(err) => return Err(InstantiatorErrorKind::Factory(err.into())),
                };
                Ok(Arc::new(dependency) as _)
            }),
            name,
            output: TypeInfo::of::<M::Provides>(),
            dependencies: Deps::dependencies(),
            metadata: Metadata::new(),
        }
    }

    /// Method that provides its return type.
    #[inline]
    #[must_use]
    pub fn provider<M, Deps>(name: &'static str, method: M) -> Self
    where
        M: MethodInstantiator<P, Deps>,
        M::Provides: Send + Sync,
        Deps: DependencyResolver,
    {
        Self::new(name, method).as_provider()
    }

    #[inline]
    #[must_use]
    pub fn as_provider(self) -> Self {
        let output = self.output;
        self.with_metadata(Metadata::new().with_provides(output))
    }

    #[inline]
    #[must_use]
    pub fn singleton(self) -> Self {
        self.with_metadata(Metadata::new().with_singleton(true))
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.merge(metadata);
        self
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn output(&self) -> TypeInfo {
        self.output
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

    pub(crate) fn bind(self, source: PluginSource<P>) -> Callable {
        let method = self.method;
        Callable::from_parts(
            Arc::new(move |injector: &Injector, args: &Args| -> Result<RcAny, InstantiatorError> {
                let plugin = source.get(injector).map_err(InstantiatorError::Deps)?;
                method(&plugin, injector, args)
            }),
            self.name,
            self.output,
            self.dependencies,
        )
        .with_metadata(self.metadata)
    }
}

/// Where bound methods take their plugin instance from.
pub(crate) enum PluginSource<P> {
    Eager(Arc<P>),
    /// Resolved on first use and shared by every method of the plugin afterwards.
    Lazy {
        cell: Arc<OnceCell<Arc<P>>>,
        /// Resolves the plugin without entering the resolution guard.
        resolve: fn(&Injector) -> Result<Arc<P>, ResolveErrorKind>,
    },
}

impl<P> Clone for PluginSource<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Eager(plugin) => Self::Eager(plugin.clone()),
            Self::Lazy { cell, resolve } => Self::Lazy {
                cell: cell.clone(),
                resolve: *resolve,
            },
        }
    }
}

impl<P: 'static> PluginSource<P> {
    pub(crate) fn get(&self, injector: &Injector) -> Result<Arc<P>, ResolveErrorKind> {
        match self {
            Self::Eager(plugin) => Ok(plugin.clone()),
            Self::Lazy { cell, resolve } => {
                if let Some(plugin) = cell.get() {
                    return Ok(plugin.clone());
                }
                // Re-entry from this thread fails here, before it could block on its own initialization.
                let _resolving = injector.enter(TypeInfo::of::<P>())?;
                cell.get_or_try_init(|| -> Result<Arc<P>, ResolveErrorKind> {
                    let plugin = resolve(injector)?;
                    debug!("Plugin instantiated");
                    Ok(plugin)
                })
                .cloned()
            }
        }
    }
}
