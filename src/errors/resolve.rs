use std::{
    any::TypeId,
    fmt::{self, Display, Formatter},
};

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::any::TypeInfo;

/// Errors raised at resolution time by `get` and `call`.
#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Cannot resolve {type_info}: no instance, factory or provider registered and the type has no recipe")]
    Unresolvable { type_info: TypeInfo },
    #[error("Argument of type {type_info} must be supplied by the caller")]
    MissingArgument { type_info: TypeInfo },
    #[error("Cyclic dependency detected: {}", Path(path))]
    CyclicDependency { path: Box<[TypeInfo]> },
    #[error("Resolution depth {depth} exceeded while resolving {type_info}")]
    DepthExceeded { type_info: TypeInfo, depth: usize },
    #[error("Incorrect provides type. Actual: {actual:?}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}

impl ResolveErrorKind {
    /// Follows nested dependency failures down to the error that started them.
    ///
    /// A failure deep in a dependency graph reaches the caller wrapped once per level
    /// in [`InstantiatorErrorKind::Deps`].
    #[must_use]
    pub fn root_cause(&self) -> &ResolveErrorKind {
        let mut current = self;
        while let Self::Instantiator(InstantiatorErrorKind::Deps(inner)) = current {
            current = inner;
        }
        current
    }
}

impl From<InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>> for ResolveErrorKind {
    fn from(err: InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>) -> Self {
        match err {
            InstantiatorErrorKind::Deps(err) => Self::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))),
            InstantiatorErrorKind::Factory(err) => Self::Instantiator(InstantiatorErrorKind::Factory(err)),
        }
    }
}

struct Path<'a>(&'a [TypeInfo]);

impl Display for Path<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, type_info) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", type_info.short_name())?;
        }
        Ok(())
    }
}
