//! Type registry for defstack.
//!
//! Maps the discriminator names found in documents (`"$type": "game.MainDef"`)
//! to factories producing empty, fillable defs. The set of constructible
//! types is closed: it is the [`TypeCatalog`] assembled at startup.
//! [`TypeRegistry`] memoizes lookups against it.

use defstack_model::{Def, DefError, DefResult};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Produces a new, empty def.
pub type Factory = fn() -> Box<dyn Def>;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("type already registered: {0}")]
    DuplicateType(String),

    #[error("invalid type name: {0:?}")]
    InvalidName(String),
}

/// A constructible type: its discriminator name and factory.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    name: &'static str,
    factory: Factory,
}

impl TypeHandle {
    /// Discriminator name this type is registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name).finish()
    }
}

fn construct_default<T: Def + Default>() -> Box<dyn Def> {
    Box::new(T::default())
}

/// The closed list of types a loader may instantiate.
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    entries: Vec<TypeHandle>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its fully-qualified discriminator `name`.
    pub fn register<T: Def + Default>(&mut self, name: &'static str) -> Result<(), RegistryError> {
        self.register_factory(name, construct_default::<T>)
    }

    /// Registers a custom factory, for defs whose empty state is not `Default`.
    pub fn register_factory(&mut self, name: &'static str, factory: Factory) -> Result<(), RegistryError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.to_owned()));
        }
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::DuplicateType(name.to_owned()));
        }
        self.entries.push(TypeHandle { name, factory });
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T: Def + Default>(mut self, name: &'static str) -> Result<Self, RegistryError> {
        self.register::<T>(name)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    fn find(&self, name: &str) -> Option<TypeHandle> {
        self.entries.iter().find(|entry| entry.name == name).copied()
    }
}

/// Resolves discriminator names to type handles, caching each hit.
#[derive(Debug)]
pub struct TypeRegistry {
    catalog: TypeCatalog,
    resolved: HashMap<String, TypeHandle>,
}

impl TypeRegistry {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            resolved: HashMap::new(),
        }
    }

    /// Looks up `type_name`, scanning the catalog on the first request.
    pub fn resolve(&mut self, type_name: &str) -> DefResult<TypeHandle> {
        if let Some(handle) = self.resolved.get(type_name) {
            return Ok(*handle);
        }

        let handle = self
            .catalog
            .find(type_name)
            .ok_or_else(|| DefError::UnknownType(type_name.to_owned()))?;
        trace!(type_name, "Resolved def type");
        self.resolved.insert(type_name.to_owned(), handle);
        Ok(handle)
    }

    /// A new, empty instance of the resolved type.
    pub fn construct(&self, handle: TypeHandle) -> Box<dyn Def> {
        (handle.factory)()
    }

    /// Whether `type_name` has been resolved before.
    pub fn is_resolved(&self, type_name: &str) -> bool {
        self.resolved.contains_key(type_name)
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }
}
