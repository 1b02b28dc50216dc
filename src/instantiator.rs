use std::{
    any::type_name,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use tracing::debug;

use super::{
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
};
use crate::{
    any::{RcAny, TypeInfo},
    args::Args,
    dependency::Dependency,
    metadata::Metadata,
    Injector,
};

/// A function whose parameters the injector can resolve.
///
/// Implemented for every `Fn(T1, .., Tn) -> Result<Response, Err>` where each `Ti` is a [`DependencyResolver`].
pub trait Instantiator<Deps>: Send + Sync + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

pub(crate) type InstantiatorError = InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>;

pub(crate) type BoxedInstantiator = Arc<dyn Fn(&Injector, &Args) -> Result<RcAny, InstantiatorError> + Send + Sync>;

#[must_use]
pub(crate) fn boxed_instantiator<Inst, Deps>(instantiator: Inst) -> BoxedInstantiator
where
    Inst: Instantiator<Deps>,
    Inst::Provides: Send + Sync,
    Deps: DependencyResolver,
{
    Arc::new(move |injector: &Injector, args: &Args| -> Result<RcAny, InstantiatorError> {
        let dependencies = match Deps::resolve(injector, args) {
            Ok(dependencies) => dependencies,
            Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
        };
        let dependency = match instantiator.instantiate(dependencies) {
            Ok(dependency) => dependency,
            Err(err) => return Err(InstantiatorErrorKind::Factory(err.into())),
        };

        debug!("Instantiated");

        Ok(Arc::new(dependency) as _)
    })
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Result<Response, Err> + Send + Sync + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

/// Type-erased function together with its resolution metadata.
///
/// Built with [`callable`] or [`provider`]. A callable is a provider once its metadata names the type it produces.
#[derive(Clone)]
pub struct Callable {
    pub(crate) instantiator: BoxedInstantiator,
    name: &'static str,
    output: TypeInfo,
    dependencies: Arc<[Dependency]>,
    metadata: Metadata,
}

impl Callable {
    #[must_use]
    pub fn new<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps>,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver,
    {
        Self::from_parts(
            boxed_instantiator(instantiator),
            type_name::<Inst>(),
            TypeInfo::of::<Inst::Provides>(),
            Deps::dependencies(),
        )
    }

    pub(crate) fn from_parts(
        instantiator: BoxedInstantiator,
        name: &'static str,
        output: TypeInfo,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            instantiator,
            name,
            output,
            dependencies: dependencies.into(),
            metadata: Metadata::new(),
        }
    }

    /// Marks the callable as a provider of its return type.
    #[inline]
    #[must_use]
    pub fn as_provider(self) -> Self {
        let output = self.output;
        self.with_metadata(Metadata::new().with_provides(output))
    }

    /// Marks the result for caching after the first resolution.
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

    #[inline]
    pub(crate) fn invoke(&self, injector: &Injector, args: &Args) -> Result<RcAny, InstantiatorError> {
        (self.instantiator)(injector, args)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("output", &self.output)
            .field("dependencies", &self.dependencies)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Wraps a function into a [`Callable`] without marking it as a provider.
#[inline]
#[must_use]
pub fn callable<Inst, Deps>(instantiator: Inst) -> Callable
where
    Inst: Instantiator<Deps>,
    Inst::Provides: Send + Sync,
    Deps: DependencyResolver,
{
    Callable::new(instantiator)
}

/// Wraps a function into a [`Callable`] that provides its return type.
///
/// # Examples
/// ```rust
/// use autowire::{provider, Inject, InstantiatorResult, Injector};
///
/// struct Greeting(&'static str);
/// struct Banner(String);
///
/// autowire::opaque_injectable!(Greeting, Banner);
///
/// fn greeting() -> InstantiatorResult<Greeting> {
///     Ok(Greeting("hello"))
/// }
///
/// fn banner(Inject(greeting): Inject<Greeting>) -> InstantiatorResult<Banner> {
///     Ok(Banner(greeting.0.to_uppercase()))
/// }
///
/// let injector = Injector::new();
/// injector.register_provider(provider(greeting).singleton()).unwrap();
/// injector.register_provider(provider(banner)).unwrap();
///
/// assert_eq!(injector.get::<Greeting>().unwrap().0, "hello");
/// assert_eq!(injector.get::<Banner>().unwrap().0, "HELLO");
/// ```
#[inline]
#[must_use]
pub fn provider<Inst, Deps>(instantiator: Inst) -> Callable
where
    Inst: Instantiator<Deps>,
    Inst::Provides: Send + Sync,
    Deps: DependencyResolver,
{
    Callable::new(instantiator).as_provider()
}

/// Wrapper to create an instantiator that just returns a clone of the passed value.
/// It can be used when the value was created outside the injector.
#[inline]
#[must_use]
pub fn instance<T: Clone + Send + Sync + 'static>(val: T) -> impl Instantiator<(), Provides = T, Error = InstantiateErrorKind> {
    move || Ok::<_, InstantiateErrorKind>(val.clone())
}

#[cfg(test)]
mod tests {
    use super::{boxed_instantiator, callable, instance, provider, DependencyResolver, InstantiateErrorKind, Instantiator};
    use crate::{
        args::Args,
        dependency::Dependency,
        errors::{InstantiatorErrorKind, InstantiatorResult},
        inject::{Arg, Inject},
        injectable::{Injectable, Recipe},
        Injector, TypeInfo,
    };

    use std::sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    };
    use tracing::debug;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Request(bool);

    impl Injectable for Request {
        fn recipe() -> Recipe<Self> {
            Recipe::construct(|| Ok::<_, InstantiateErrorKind>(Request(true)))
        }
    }

    struct Response(bool);

    #[test]
    #[allow(dead_code)]
    fn test_factory_helper() {
        fn resolver<Deps: DependencyResolver, F: Instantiator<Deps>>(_f: F) {}
        fn resolver_with_dep<Dep: Injectable>() {
            resolver(|| Ok::<_, InstantiateErrorKind>(()));
            resolver(|_: Inject<Dep>| Ok::<_, InstantiateErrorKind>(()));
            resolver(|_: Inject<Dep>, _: Arg<u8>| Ok::<_, InstantiateErrorKind>(()));
        }
    }

    #[test]
    #[traced_test]
    fn test_boxed_instantiator() {
        let call_count = Arc::new(AtomicU8::new(0));

        let instantiator_response = boxed_instantiator({
            let call_count = call_count.clone();
            move |Inject(request_1): Inject<Request>, Inject(request_2): Inject<Request>| {
                assert_eq!(request_1.0, request_2.0);
                assert!(!Arc::ptr_eq(&request_1, &request_2));

                call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call instantiator response");
                Ok::<_, InstantiateErrorKind>(Response(request_1.0))
            }
        });

        let injector = Injector::new();
        let response_1 = instantiator_response(&injector, &Args::new()).unwrap();
        let response_2 = instantiator_response(&injector, &Args::new()).unwrap();

        assert!(response_1.downcast::<Response>().unwrap().0);
        assert!(response_2.downcast::<Response>().unwrap().0);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_boxed_instantiator_errors() {
        let injector = Injector::new();

        let missing = boxed_instantiator(|_: Arg<u8>| Ok::<_, InstantiateErrorKind>(()));
        assert!(matches!(missing(&injector, &Args::new()), Err(InstantiatorErrorKind::Deps(_))));

        let failing = boxed_instantiator(|| Err::<(), _>(InstantiateErrorKind::from(anyhow::anyhow!("boom"))));
        match failing(&injector, &Args::new()) {
            Err(InstantiatorErrorKind::Factory(err)) => assert_eq!(err.to_string(), "boom"),
            _ => panic!("expected factory error"),
        }
    }

    #[test]
    fn test_callable_describes_itself() {
        let f = callable(|_: Inject<Request>, _: Option<Arg<u8>>| Ok::<_, InstantiateErrorKind>(Response(true)));

        assert_eq!(f.output(), TypeInfo::of::<Response>());
        assert_eq!(f.dependencies(), &[Dependency::injected::<Request>(), Dependency::optional::<u8>()]);
        assert!(!f.metadata().is_provider());
        assert!(!f.metadata().is_singleton());
    }

    #[test]
    #[traced_test]
    fn test_fn_item_with_result_alias() {
        fn request(Inject(request): Inject<Request>) -> InstantiatorResult<Response> {
            Ok(Response(request.0))
        }

        let f = provider(request);
        assert_eq!(f.output(), TypeInfo::of::<Response>());

        let response = f.invoke(&Injector::new(), &Args::new()).unwrap();
        assert!(response.downcast::<Response>().unwrap().0);
    }

    #[test]
    fn test_provider_metadata_accumulates() {
        let f = provider(instance(5u32)).singleton();

        assert_eq!(f.metadata().produces(), Some(TypeInfo::of::<u32>()));
        assert!(f.metadata().is_singleton());

        let f = callable(instance(5u32)).singleton().as_provider();
        assert!(f.metadata().is_singleton());
        assert!(f.metadata().is_provider());
    }
}
