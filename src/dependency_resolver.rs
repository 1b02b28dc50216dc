use super::errors::ResolveErrorKind;
use crate::{args::Args, dependency::Dependency, Injector};

/// A parameter (or tuple of parameters) the injector knows how to fill.
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn resolve(injector: &Injector, args: &Args) -> Result<Self, Self::Error>;

    /// Declared parameters, in order.
    #[must_use]
    fn dependencies() -> Vec<Dependency>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(injector: &Injector, args: &Args) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(injector, args).map_err(Into::into)?,)*))
            }

            fn dependencies() -> Vec<Dependency> {
                let mut dependencies = Vec::new();
                $( dependencies.extend($ty::dependencies()); )*
                dependencies
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    use super::DependencyResolver;
    use crate::{
        args::Args,
        dependency::{Dependency, DependencyKind},
        inject::{Arg, Inject},
        injectable::{Injectable, Recipe},
        Injector, ResolveErrorKind,
    };

    use std::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    static CONSTRUCTED: AtomicU8 = AtomicU8::new(0);

    #[derive(Default, Debug)]
    struct Request;

    impl Injectable for Request {
        fn recipe() -> Recipe<Self> {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Recipe::from_default()
        }
    }

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: Injectable>() {
            resolver::<Inject<Dep>>();
            resolver::<Arg<Dep>>();
            resolver::<Option<Arg<Dep>>>();
            resolver::<(Inject<Dep>, Arg<Dep>, Option<Arg<Dep>>)>();
        }
    }

    #[test]
    fn test_tuple_dependencies_in_order() {
        let dependencies = <(Inject<Request>, Arg<u8>, Option<Arg<String>>)>::dependencies();

        assert_eq!(
            dependencies,
            vec![
                Dependency::injected::<Request>(),
                Dependency::supplied::<u8>(),
                Dependency::optional::<String>(),
            ]
        );
        assert_eq!(dependencies[1].kind, DependencyKind::Supplied);
        assert!(<()>::dependencies().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_tuple_resolve() {
        let injector = Injector::new();
        let args = Args::new().with(7u8);

        let before = CONSTRUCTED.load(Ordering::SeqCst);
        let (Inject(_request), Arg(number), absent) =
            <(Inject<Request>, Arg<u8>, Option<Arg<String>>)>::resolve(&injector, &args).unwrap();

        assert_eq!(*number, 7);
        assert!(absent.is_none());
        assert!(CONSTRUCTED.load(Ordering::SeqCst) > before);
    }

    #[test]
    #[traced_test]
    fn test_tuple_resolve_stops_on_missing_argument() {
        let injector = Injector::new();

        let err = <(Inject<Request>, Arg<u8>)>::resolve(&injector, &Args::new()).unwrap_err();
        assert!(matches!(err, ResolveErrorKind::MissingArgument { .. }));
    }
}
