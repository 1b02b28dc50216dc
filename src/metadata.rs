use std::collections::BTreeMap;

use crate::any::TypeInfo;

/// Resolution facts attached to a callable, plugin method or constructor.
///
/// Records merge: a field set by a later attachment wins, an unset field keeps the earlier value,
/// and injection targets accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    produces: Option<TypeInfo>,
    singleton: Option<bool>,
    inject: BTreeMap<&'static str, TypeInfo>,
}

impl Metadata {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            produces: None,
            singleton: None,
            inject: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_provides(mut self, type_info: TypeInfo) -> Self {
        self.produces = Some(type_info);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_singleton(mut self, singleton: bool) -> Self {
        self.singleton = Some(singleton);
        self
    }

    /// Declares an extra named attribute of the given type, set after construction.
    #[inline]
    #[must_use]
    pub fn with_inject(mut self, name: &'static str, type_info: TypeInfo) -> Self {
        self.inject.insert(name, type_info);
        self
    }

    pub fn merge(&mut self, other: Metadata) {
        if other.produces.is_some() {
            self.produces = other.produces;
        }
        if other.singleton.is_some() {
            self.singleton = other.singleton;
        }
        self.inject.extend(other.inject);
    }

    #[inline]
    #[must_use]
    pub const fn produces(&self) -> Option<TypeInfo> {
        self.produces
    }

    #[inline]
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        self.produces.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.singleton.unwrap_or(false)
    }

    pub fn injection_targets(&self) -> impl Iterator<Item = (&'static str, TypeInfo)> + '_ {
        self.inject.iter().map(|(name, type_info)| (*name, *type_info))
    }
}

#[cfg(test)]
mod tests {
    use super::Metadata;
    use crate::any::TypeInfo;

    struct A;
    struct B;

    #[test]
    fn test_defaults() {
        let metadata = Metadata::new();

        assert!(!metadata.is_provider());
        assert!(!metadata.is_singleton());
        assert_eq!(metadata.injection_targets().count(), 0);
        assert_eq!(metadata, Metadata::default());
    }

    #[test]
    fn test_merge_keeps_unrelated_fields() {
        let mut metadata = Metadata::new().with_inject("a", TypeInfo::of::<A>());
        metadata.merge(Metadata::new().with_singleton(true));
        metadata.merge(Metadata::new().with_provides(TypeInfo::of::<B>()));

        assert!(metadata.is_singleton());
        assert_eq!(metadata.produces(), Some(TypeInfo::of::<B>()));
        assert_eq!(metadata.injection_targets().collect::<Vec<_>>(), vec![("a", TypeInfo::of::<A>())]);
    }

    #[test]
    fn test_merge_overrides_set_fields() {
        let mut metadata = Metadata::new().with_singleton(true).with_inject("a", TypeInfo::of::<A>());
        metadata.merge(
            Metadata::new()
                .with_singleton(false)
                .with_inject("a", TypeInfo::of::<B>())
                .with_inject("b", TypeInfo::of::<B>()),
        );

        assert!(!metadata.is_singleton());
        assert_eq!(
            metadata.injection_targets().collect::<Vec<_>>(),
            vec![("a", TypeInfo::of::<B>()), ("b", TypeInfo::of::<B>())]
        );
    }
}
