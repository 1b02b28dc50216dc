/// Config for an injector
/// ## Fields
/// - `replace_providers`:
///   If `true`, registering a provider for a type that already has one replaces it.
///   Otherwise the registration fails with [`crate::ConfigurationErrorKind::ProviderExists`].
///
/// - `max_depth`:
///   Maximum number of nested resolutions on one thread before
///   [`crate::ResolveErrorKind::DepthExceeded`] is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub replace_providers: bool,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replace_providers: false,
            max_depth: 128,
        }
    }
}
