mod configuration;
mod instantiate;
mod instantiator;
mod resolve;

pub use configuration::ConfigurationErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use resolve::ResolveErrorKind;

#[allow(type_alias_bounds)]
pub type InstantiatorResult<T, Err: Into<InstantiateErrorKind> = InstantiateErrorKind> = Result<T, Err>;
