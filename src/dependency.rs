use crate::any::TypeInfo;

/// How a declared parameter gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DependencyKind {
    /// Caller-supplied value if present, otherwise resolved by the injector.
    Injected,
    /// Caller-supplied value only.
    Supplied,
    /// Caller-supplied value if present, otherwise left to the callable.
    Optional,
}

/// One declared parameter of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Dependency {
    pub type_info: TypeInfo,
    pub kind: DependencyKind,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub fn injected<T: 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: DependencyKind::Injected,
        }
    }

    #[inline]
    #[must_use]
    pub fn supplied<T: 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: DependencyKind::Supplied,
        }
    }

    #[inline]
    #[must_use]
    pub fn optional<T: 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: DependencyKind::Optional,
        }
    }
}
