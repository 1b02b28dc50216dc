macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
    };
}

/// Marks types as resolvable only through registrations.
///
/// The generated [`crate::Injectable`] impl uses [`crate::Recipe::Opaque`], so
/// `get` succeeds for these types only when an instance, factory or provider is registered.
///
/// # Examples
/// ```rust
/// use autowire::{opaque_injectable, Injector};
///
/// struct DatabaseUrl(String);
///
/// opaque_injectable!(DatabaseUrl);
///
/// let injector = Injector::new();
/// assert!(injector.get::<DatabaseUrl>().is_err());
///
/// injector.set_instance(DatabaseUrl("postgres://localhost".to_owned()), false).unwrap();
/// assert_eq!(injector.get::<DatabaseUrl>().unwrap().0, "postgres://localhost");
/// ```
#[macro_export]
macro_rules! opaque_injectable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Injectable for $ty {}
        )+
    };
}
