use std::fmt;

/// Primitive kinds a scalar field can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    /// RFC 3339 timestamp string.
    DateTime,
    /// `[-][d.]hh:mm:ss[.fffffff]` duration string.
    TimeSpan,
    /// Hyphenated or simple UUID string.
    Guid,
}

impl ScalarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::TimeSpan => "timespan",
            Self::Guid => "guid",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a requested field type is read from a token.
///
/// Derived from the field's static type through [`Field::shape`](crate::Field::shape).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    /// A def reference or inline def satisfying the named capability.
    Polymorphic(&'static str),
    Array1(Box<Shape>),
    Array2(Box<Shape>),
    Array3(Box<Shape>),
}

impl Shape {
    /// Array rank, `0` for scalars and polymorphic values.
    pub fn rank(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Polymorphic(_) => 0,
            Self::Array1(_) => 1,
            Self::Array2(_) => 2,
            Self::Array3(_) => 3,
        }
    }

    /// Element shape of an array, `None` otherwise.
    pub fn element(&self) -> Option<&Shape> {
        match self {
            Self::Array1(inner) | Self::Array2(inner) | Self::Array3(inner) => Some(inner),
            Self::Scalar(_) | Self::Polymorphic(_) => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Polymorphic(name) => write!(f, "def {name}"),
            Self::Array1(inner) => write!(f, "[{inner}]"),
            Self::Array2(inner) => write!(f, "[{inner}; 2d]"),
            Self::Array3(inner) => write!(f, "[{inner}; 3d]"),
        }
    }
}
