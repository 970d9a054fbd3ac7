//! Definition model for defstack.
//!
//! Defines the contract between data-driven definition types and the loader
//! that populates them:
//! - [`Def`]: a type filled from a document token (`fill`)
//! - [`DefKind`]: the capability a polymorphic field requests
//! - [`Field`]: how a field's static type decodes a token, described by [`Shape`]
//! - [`Array2`] / [`Array3`]: rectangular grids for 2D/3D array fields
//! - [`Resources`]: the loader seam `fill` pulls fields through
//! - [`DefError`]: the error taxonomy shared by every stage
//!
//! Tokens are [`serde_json::Value`]; the model never sees document text.

mod def;
mod error;
mod field;
mod grid;
mod resources;
mod shape;
mod token;

pub use def::{AsAny, Def, DefKind, DefRef, erase};
pub use error::{DefError, DefResult};
pub use field::{Field, parse_time_span};
pub use grid::{Array2, Array3};
pub use resources::Resources;
pub use shape::{ScalarKind, Shape};
pub use token::TokenKind;

#[doc(hidden)]
pub use serde_json;
