//! Type-driven dependency injection.
//!
//! An [`Injector`] resolves a type by looking, in order, at instances set with
//! [`Injector::set_instance`], factories set with [`Injector::set_factory`], providers
//! registered with [`Injector::register_provider`], and finally the type's own [`Recipe`].
//!
//! ```rust
//! use autowire::{provider, Inject, Injectable, InstantiateErrorKind, Injector, Recipe};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! autowire::opaque_injectable!(Database);
//!
//! struct Repository {
//!     database: Arc<Database>,
//! }
//!
//! impl Injectable for Repository {
//!     fn recipe() -> Recipe<Self> {
//!         Recipe::construct(|Inject(database): Inject<Database>| Ok::<_, InstantiateErrorKind>(Repository { database }))
//!     }
//! }
//!
//! let injector = Injector::new();
//! injector
//!     .register_provider(
//!         provider(|| {
//!             Ok::<_, InstantiateErrorKind>(Database {
//!                 url: "postgres://localhost".to_owned(),
//!             })
//!         })
//!         .singleton(),
//!     )
//!     .unwrap();
//!
//! let first = injector.get::<Repository>().unwrap();
//! let second = injector.get::<Repository>().unwrap();
//!
//! assert_eq!(first.database.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&first.database, &second.database));
//! ```

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod args;
pub(crate) mod config;
pub(crate) mod dependency;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod guard;
pub(crate) mod inject;
pub(crate) mod injectable;
pub(crate) mod injector;
pub(crate) mod instantiator;
pub(crate) mod metadata;
pub(crate) mod plugin;
pub(crate) mod registry;

pub use any::TypeInfo;
pub use args::Args;
pub use config::Config;
pub use dependency::{Dependency, DependencyKind};
pub use dependency_resolver::DependencyResolver;
pub use errors::{
    ConfigurationErrorKind, InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, ResolveErrorKind,
};
pub use inject::{Arg, Inject};
pub use injectable::{Constructor, Injectable, Recipe};
pub use injector::Injector;
pub use instantiator::{callable, instance, provider, Callable, Instantiator};
pub use metadata::Metadata;
pub use plugin::{Method, MethodInstantiator, Plugin};
