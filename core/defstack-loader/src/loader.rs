//! The loader: path-cached materialization of defs from a document store.

use crate::config::LoaderConfig;
use crate::index::{EntryState, ResourceIndex};
use crate::store::{DirStore, DocumentStore};
use defstack_model::{DefError, DefKind, DefRef, DefResult, Resources};
use defstack_registry::{TypeCatalog, TypeRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Lazily materializes defs from a document store, at most once per path.
///
/// A resource document is either an object carrying the discriminator key,
/// which is instantiated and filled, or a string naming another resource,
/// which makes the path an alias of that resource. References inside defs
/// go through the same cache, so every holder of a path shares one
/// instance.
pub struct Loader {
    store: Box<dyn DocumentStore>,
    index: ResourceIndex,
    registry: TypeRegistry,
    discriminator: String,
    /// Paths currently being materialized, outermost first.
    active: Vec<String>,
}

impl Loader {
    /// Indexes the directory named by `config`.
    pub fn open(config: &LoaderConfig, catalog: TypeCatalog) -> DefResult<Self> {
        let store = DirStore::new(&config.root, &config.extension);
        let loader = Self::with_store(store, catalog, &config.discriminator)?;
        info!(
            root = %config.root.display(),
            resources = loader.index.len(),
            types = loader.registry.catalog().len(),
            "Indexed definition resources"
        );
        Ok(loader)
    }

    /// Indexes an arbitrary store.
    pub fn with_store(
        store: impl DocumentStore + 'static,
        catalog: TypeCatalog,
        discriminator: impl Into<String>,
    ) -> DefResult<Self> {
        let index = ResourceIndex::build(&store)?;
        Ok(Self {
            store: Box::new(store),
            index,
            registry: TypeRegistry::new(catalog),
            discriminator: discriminator.into(),
            active: Vec::new(),
        })
    }

    /// Loads `path` and narrows it to `K`.
    ///
    /// `K` is a concrete def, a family trait object, or `dyn Def`.
    pub fn fetch<K: DefKind + ?Sized>(&mut self, path: &str) -> DefResult<Arc<K>> {
        let def = self.load_def(path)?;
        let found = def.def_type_name();
        K::cast(def).ok_or_else(|| {
            DefError::TypeMismatch {
                expected: K::kind_name().to_owned(),
                found: found.to_owned(),
            }
            .in_resource(path)
        })
    }

    /// Loads `path` through the cache without narrowing it.
    pub fn load_def(&mut self, path: &str) -> DefResult<DefRef> {
        match self.index.state(path) {
            None => return Err(DefError::ResourceNotFound(path.to_owned())),
            Some(EntryState::Loaded(def)) => {
                trace!(path, "Resource cache hit");
                return Ok(Arc::clone(def));
            }
            Some(EntryState::Loading) => {
                let start = self.active.iter().position(|p| p == path).unwrap_or(0);
                let mut chain = self.active[start..].to_vec();
                chain.push(path.to_owned());
                return Err(DefError::CyclicReference(chain));
            }
            Some(EntryState::Unloaded) => {}
        }

        debug!(path, depth = self.active.len(), "Loading resource");
        self.index.begin(path);
        self.active.push(path.to_owned());
        let result = self.materialize(path);
        self.active.pop();

        match result {
            Ok(def) => {
                debug!(path, def_type = def.def_type_name(), "Resource loaded");
                self.index.finish(path, Arc::clone(&def));
                Ok(def)
            }
            Err(e) => {
                debug!(path, error = %e, "Resource load failed");
                self.index.abandon(path);
                Err(e.in_resource(path))
            }
        }
    }

    /// Loads every indexed resource, stopping at the first failure.
    ///
    /// Returns the number of resources in the index.
    pub fn load_all(&mut self) -> DefResult<usize> {
        let paths: Vec<String> = self.index.paths().into_iter().map(str::to_owned).collect();
        for path in &paths {
            self.load_def(path)?;
        }
        Ok(paths.len())
    }

    /// Whether `path` has been materialized.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.index.state(path).is_some_and(EntryState::is_loaded)
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    fn materialize(&mut self, path: &str) -> DefResult<DefRef> {
        let document = self.store.read(path)?;
        match &document {
            Value::Object(_) => self.instantiate(&document),
            Value::String(target) => {
                debug!(path, target = target.as_str(), "Following resource alias");
                self.load_def(target)
            }
            other => Err(DefError::type_mismatch("object or resource path", other)),
        }
    }
}

impl Resources for Loader {
    fn load(&mut self, path: &str) -> DefResult<DefRef> {
        self.load_def(path)
    }

    fn instantiate(&mut self, source: &Value) -> DefResult<DefRef> {
        let type_name = match source.get(self.discriminator.as_str()) {
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(DefError::type_mismatch("type name string", other)
                    .in_field(self.discriminator.as_str()));
            }
            None => {
                return Err(DefError::MissingDiscriminator {
                    key: self.discriminator.clone(),
                });
            }
        };

        let handle = self.registry.resolve(type_name)?;
        let mut def = self.registry.construct(handle);
        def.fill(source, self)?;
        Ok(Arc::from(def))
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("index", &self.index)
            .field("registry", &self.registry)
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}
