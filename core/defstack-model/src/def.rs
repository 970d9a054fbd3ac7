use crate::{DefResult, Resources};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a loaded def. The resource cache owns one per path.
pub type DefRef = Arc<dyn Def>;

/// Upcast support for downcasting loaded defs to their concrete type.
///
/// Implemented for every sized `Any + Send + Sync` type; never implement it
/// by hand.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A data-driven type populated from a document token.
///
/// `fill` is called exactly once, on a freshly constructed default
/// instance, and pulls each field through [`Resources::get`]. Most defs
/// implement it with [`impl_def!`](crate::impl_def).
pub trait Def: AsAny + fmt::Debug {
    fn fill(&mut self, source: &Value, resources: &mut dyn Resources) -> DefResult<()>;

    /// Rust type name of the concrete def, used in diagnostics.
    fn def_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Erases a def handle to `Any` so it can be downcast.
pub fn erase(def: DefRef) -> Arc<dyn Any + Send + Sync> {
    AsAny::into_any(def)
}

impl dyn Def {
    /// Borrows the def as a concrete type.
    pub fn downcast_ref<T: Def>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// The capability a polymorphic field asks for.
///
/// Every concrete [`Def`] is its own kind. `dyn Def` accepts anything, and
/// family traits get an impl from [`def_family!`](crate::def_family).
pub trait DefKind: Send + Sync + 'static {
    /// Name shown in shapes and mismatch errors.
    fn kind_name() -> &'static str;

    /// Narrows a loaded def to this kind, `None` if it does not qualify.
    fn cast(def: DefRef) -> Option<Arc<Self>>;
}

impl<T: Def> DefKind for T {
    fn kind_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn cast(def: DefRef) -> Option<Arc<Self>> {
        erase(def).downcast::<T>().ok()
    }
}

impl DefKind for dyn Def {
    fn kind_name() -> &'static str {
        "dyn Def"
    }

    fn cast(def: DefRef) -> Option<Arc<Self>> {
        Some(def)
    }
}

/// Implements [`Def`] by pulling each listed field from its wire key.
///
/// ```ignore
/// impl_def!(MainDef { int_field: "intField", ints: "ints" });
/// impl_def!(SideADef: base { label: "label" });
/// ```
///
/// The `: base` form fills the embedded `base` def first, from the same
/// token.
#[macro_export]
macro_rules! impl_def {
    ($ty:ty { $($field:ident : $key:literal),* $(,)? }) => {
        impl $crate::Def for $ty {
            fn fill(
                &mut self,
                source: &$crate::serde_json::Value,
                resources: &mut dyn $crate::Resources,
            ) -> $crate::DefResult<()> {
                let _ = (&source, &resources);
                $( self.$field = resources.get(source, $key)?; )*
                Ok(())
            }
        }
    };
    ($ty:ty : $base:ident { $($field:ident : $key:literal),* $(,)? }) => {
        impl $crate::Def for $ty {
            fn fill(
                &mut self,
                source: &$crate::serde_json::Value,
                resources: &mut dyn $crate::Resources,
            ) -> $crate::DefResult<()> {
                $crate::Def::fill(&mut self.$base, source, resources)?;
                $( self.$field = resources.get(source, $key)?; )*
                Ok(())
            }
        }
    };
}

/// Implements [`DefKind`] for a family trait object from its closed member
/// list. The family trait must have [`Def`] as a supertrait.
///
/// ```ignore
/// pub trait SideDef: Def {}
/// def_family!(dyn SideDef => SideADef, SideBDef);
/// ```
#[macro_export]
macro_rules! def_family {
    (dyn $family:path => $($member:ty),+ $(,)?) => {
        impl $crate::DefKind for dyn $family {
            fn kind_name() -> &'static str {
                stringify!($family)
            }

            fn cast(def: $crate::DefRef) -> Option<::std::sync::Arc<Self>> {
                let any = $crate::erase(def);
                $(
                    let any = match any.downcast::<$member>() {
                        Ok(member) => return Some(member as ::std::sync::Arc<Self>),
                        Err(any) => any,
                    };
                )+
                drop(any);
                None
            }
        }
    };
}
