//! Rectangular 2D and 3D arrays.
//!
//! Documents store them as nested arrays, outermost first: a 2D grid is a
//! list of rows (`y`), each a list of cells (`x`). Width and height come
//! from the first row; every other row must match.

use crate::field::expect_array;
use crate::{DefError, DefResult, Field, Resources, Shape, TokenKind};
use serde_json::Value;
use std::ops::Index;

/// A `width × height` grid indexed by `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array2<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Array2<T> {
    /// Builds a grid from row-major cells. Returns `None` when the cell
    /// count does not match the dimensions.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (width.checked_mul(height)? == cells.len()).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.width && y < self.height).then(|| &self.cells[y * self.width + x])
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.height).map(move |y| &self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Row-major cells.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Default for Array2<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        self.get(x, y).unwrap_or_else(|| {
            panic!("index ({x}, {y}) out of bounds for {}x{} grid", self.width, self.height)
        })
    }
}

impl<T: Field> Field for Array2<T> {
    fn shape() -> Shape {
        Shape::Array2(Box::new(T::shape()))
    }

    fn absent() -> Self {
        Self::default()
    }

    fn decode(token: &Value, resources: &mut dyn Resources) -> DefResult<Self> {
        let rows = expect_array::<Self>(token)?;
        let height = rows.len();
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let width = row_len::<Self>(first, "[0]".to_owned())?;

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = uniform_row::<Self>(row, width, format!("[{y}]"))?;
            for (x, cell) in row.iter().enumerate() {
                cells.push(T::decode(cell, resources).map_err(|e| e.in_element(format!("[{x}, {y}]")))?);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

/// A `width × height × depth` grid indexed by `(x, y, z)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array3<T> {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<T>,
}

impl<T> Array3<T> {
    /// Builds a grid from cells ordered plane by plane, then row by row.
    pub fn from_vec(width: usize, height: usize, depth: usize, cells: Vec<T>) -> Option<Self> {
        (width.checked_mul(height)?.checked_mul(depth)? == cells.len()).then_some(Self {
            width,
            height,
            depth,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        (x < self.width && y < self.height && z < self.depth).then(|| &self.cells[self.offset(x, y, z)])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }
}

impl<T> Default for Array3<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            depth: 0,
            cells: Vec::new(),
        }
    }
}

impl<T> Index<(usize, usize, usize)> for Array3<T> {
    type Output = T;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        self.get(x, y, z).unwrap_or_else(|| {
            panic!(
                "index ({x}, {y}, {z}) out of bounds for {}x{}x{} grid",
                self.width, self.height, self.depth
            )
        })
    }
}

impl<T: Field> Field for Array3<T> {
    fn shape() -> Shape {
        Shape::Array3(Box::new(T::shape()))
    }

    fn absent() -> Self {
        Self::default()
    }

    fn decode(token: &Value, resources: &mut dyn Resources) -> DefResult<Self> {
        let planes = expect_array::<Self>(token)?;
        let depth = planes.len();
        let Some(first_plane) = planes.first() else {
            return Ok(Self::default());
        };
        let height = row_len::<Self>(first_plane, "[0]".to_owned())?;
        let Some(first_row) = first_plane.as_array().and_then(|rows| rows.first()) else {
            return Ok(Self::default());
        };
        let width = row_len::<Self>(first_row, row_at(0, 0))?;

        let mut cells = Vec::with_capacity(width * height * depth);
        for (z, plane) in planes.iter().enumerate() {
            let plane = uniform_row::<Self>(plane, height, format!("[{z}]"))?;
            for (y, row) in plane.iter().enumerate() {
                let row = uniform_row::<Self>(row, width, row_at(z, y))?;
                for (x, cell) in row.iter().enumerate() {
                    cells.push(
                        T::decode(cell, resources).map_err(|e| e.in_element(format!("[{x}, {y}, {z}]")))?,
                    );
                }
            }
        }

        Ok(Self {
            width,
            height,
            depth,
            cells,
        })
    }
}

fn row_at(outer: usize, inner: usize) -> String {
    format!("[{outer}][{inner}]")
}

/// Length of a nested array token, failing with the shape of `F`.
fn row_len<F: Field>(token: &Value, at: String) -> DefResult<usize> {
    token
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| DefError::shape_mismatch(F::shape().to_string(), TokenKind::of(token).to_string()).in_element(at))
}

/// Borrows a nested array token and checks it has exactly `len` items.
fn uniform_row<F: Field>(token: &Value, len: usize, at: String) -> DefResult<&Vec<Value>> {
    let Some(items) = token.as_array() else {
        return Err(DefError::shape_mismatch(F::shape().to_string(), TokenKind::of(token).to_string()).in_element(at));
    };
    if items.len() != len {
        return Err(DefError::shape_mismatch(
            format!("{len} items"),
            format!("{} items", items.len()),
        )
        .in_element(at));
    }
    Ok(items)
}
