use crate::any::TypeInfo;

/// Errors raised at registration time.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationErrorKind {
    #[error("Callable {name} is not a provider")]
    NotAProvider { name: &'static str },
    #[error("Instance for {type_info} already exists")]
    InstanceExists { type_info: TypeInfo },
    #[error("Factory for {type_info} already exists")]
    FactoryExists { type_info: TypeInfo },
    #[error("Provider for {type_info} already exists")]
    ProviderExists { type_info: TypeInfo },
    #[error("Callable {name} provides {actual}, expected: {expected}")]
    IncorrectType {
        name: &'static str,
        expected: TypeInfo,
        actual: TypeInfo,
    },
}
