use crate::{DefError, DefRef, DefResult, Field};
use serde_json::Value;

/// The collaborator a def pulls its fields through.
///
/// Implemented by the loader; `fill` only ever sees `&mut dyn Resources`,
/// which keeps defs independent of how documents are stored or cached.
pub trait Resources {
    /// Resolves a resource path through the cache, loading it on first use.
    fn load(&mut self, path: &str) -> DefResult<DefRef>;

    /// Builds a fresh def from an inline object carrying a discriminator.
    fn instantiate(&mut self, source: &Value) -> DefResult<DefRef>;
}

impl dyn Resources + '_ {
    /// Reads `field` from the object `source` as a `T`.
    ///
    /// A missing key yields `T::absent()`. Decoding errors are wrapped with
    /// the field name.
    pub fn get<T: Field>(&mut self, source: &Value, field: &str) -> DefResult<T> {
        let Some(object) = source.as_object() else {
            return Err(DefError::type_mismatch("object", source).in_field(field));
        };

        match object.get(field) {
            None => Ok(T::absent()),
            Some(token) => T::decode(token, self).map_err(|e| e.in_field(field)),
        }
    }
}
