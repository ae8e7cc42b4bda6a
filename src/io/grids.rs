//! Binary wire format for sampled orbital grids.
//!
//! All multi-byte fields are little-endian, irrespective of the platform.
//!
//! Single-orbital buffer layout:
//! - 3 × `i32`: grid size along x, y, z;
//! - 6 × `f32`: minimum bound x, y, z, then maximum bound x, y, z;
//! - `nx·ny·nz` × `f32`: amplitudes in row-major `(x, y, z)` order, x varying slowest.
//!
//! Batch buffer layout:
//! - 1 × `i32`: orbital count `n`;
//! - 3 × `i32`: grid size along x, y, z (shared by all orbitals);
//! - `n` × `i32`: the orbital indices, in caller order;
//! - 6 × `f32`: shared min/max bounds;
//! - `n` consecutive grid blocks of `nx·ny·nz` × `f32` each, in index-list order.
//!
//! There is no padding and no length prefix on the data sections; the dimension triplet and the
//! fixed four-byte stride determine the data length. Decoding mirrors encoding exactly for the
//! header scalars and the `f32` data; the 64-bit to 32-bit rounding applied when grids are
//! sampled is one-way lossy and is *not* undone here.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array3;
use thiserror::Error;

use crate::grid::GridBounds;

#[cfg(test)]
#[path = "grids_tests.rs"]
mod grids_tests;

/// Errors raised when encoding or decoding grid buffers.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The buffer ended before the advertised data, or an in-memory write failed.
    #[error("malformed grid buffer: {0}")]
    Io(#[from] std::io::Error),

    /// A decoded dimension or count was not positive.
    #[error("non-positive field in grid header: {0}")]
    NonPositiveField(i32),

    /// A dimension was too large to represent in the wire format.
    #[error("grid dimension {0} overflows the wire format")]
    DimensionOverflow(usize),

    /// The buffer continued past the advertised data.
    #[error("{0} trailing bytes after grid data")]
    TrailingBytes(usize),

    /// The grids of a batch did not share one shape.
    #[error("mismatched grid shapes in batch: {0:?} vs {1:?}")]
    MismatchedShapes((usize, usize, usize), (usize, usize, usize)),

    /// The index list and grid list of a batch had different lengths.
    #[error("index count ({indices}) does not match grid count ({grids})")]
    MismatchedCounts { indices: usize, grids: usize },
}

/// A decoded batch buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBatch {
    /// The orbital indices, in buffer order.
    pub indices: Vec<i32>,

    /// The bounds shared by all grids in the batch.
    pub bounds: GridBounds,

    /// The grids, in index-list order.
    pub grids: Vec<Array3<f32>>,
}

fn write_dims(buf: &mut Vec<u8>, dim: (usize, usize, usize)) -> Result<(), CodecError> {
    for extent in [dim.0, dim.1, dim.2] {
        let extent_i32 =
            i32::try_from(extent).map_err(|_| CodecError::DimensionOverflow(extent))?;
        buf.write_i32::<LittleEndian>(extent_i32)?;
    }
    Ok(())
}

fn write_bounds(buf: &mut Vec<u8>, bounds: &GridBounds) -> Result<(), CodecError> {
    for axis in 0..3 {
        buf.write_f32::<LittleEndian>(bounds.min[axis] as f32)?;
    }
    for axis in 0..3 {
        buf.write_f32::<LittleEndian>(bounds.max[axis] as f32)?;
    }
    Ok(())
}

fn write_data(buf: &mut Vec<u8>, grid: &Array3<f32>) -> Result<(), CodecError> {
    for &value in grid.iter() {
        buf.write_f32::<LittleEndian>(value)?;
    }
    Ok(())
}

fn read_dims(cursor: &mut Cursor<&[u8]>) -> Result<(usize, usize, usize), CodecError> {
    let mut dims = [0usize; 3];
    for dim in dims.iter_mut() {
        let extent = cursor.read_i32::<LittleEndian>()?;
        if extent <= 0 {
            return Err(CodecError::NonPositiveField(extent));
        }
        *dim = extent as usize;
    }
    Ok((dims[0], dims[1], dims[2]))
}

fn read_bounds(cursor: &mut Cursor<&[u8]>) -> Result<GridBounds, CodecError> {
    let mut min = [0f64; 3];
    let mut max = [0f64; 3];
    for value in min.iter_mut() {
        *value = f64::from(cursor.read_f32::<LittleEndian>()?);
    }
    for value in max.iter_mut() {
        *value = f64::from(cursor.read_f32::<LittleEndian>()?);
    }
    Ok(GridBounds { min, max })
}

fn read_data(
    cursor: &mut Cursor<&[u8]>,
    dim: (usize, usize, usize),
) -> Result<Array3<f32>, CodecError> {
    let n_values = dim.0 * dim.1 * dim.2;
    let mut data = Vec::with_capacity(n_values);
    for _ in 0..n_values {
        data.push(cursor.read_f32::<LittleEndian>()?);
    }
    Ok(Array3::from_shape_vec(dim, data)
        .expect("A vector of matching length always reshapes into its dimensions."))
}

/// Encodes a single sampled grid with its bounds into a self-describing binary buffer.
pub fn encode_grid(grid: &Array3<f32>, bounds: &GridBounds) -> Result<Vec<u8>, CodecError> {
    let dim = grid.dim();
    let mut buf = Vec::with_capacity((3 + 6) * 4 + grid.len() * 4);
    write_dims(&mut buf, dim)?;
    write_bounds(&mut buf, bounds)?;
    write_data(&mut buf, grid)?;
    Ok(buf)
}

/// Decodes a single-orbital buffer produced by [`encode_grid`].
pub fn decode_grid(buf: &[u8]) -> Result<(Array3<f32>, GridBounds), CodecError> {
    let mut cursor = Cursor::new(buf);
    let dim = read_dims(&mut cursor)?;
    let bounds = read_bounds(&mut cursor)?;
    let grid = read_data(&mut cursor, dim)?;
    let remaining = buf.len() - usize::try_from(cursor.position()).unwrap_or(buf.len());
    if remaining > 0 {
        return Err(CodecError::TrailingBytes(remaining));
    }
    Ok((grid, bounds))
}

/// Encodes a batch of grids sampled on one shared grid geometry.
///
/// The grid blocks follow the order of `indices`, which is preserved verbatim in the header.
pub fn encode_batch(
    indices: &[i32],
    grids: &[Array3<f32>],
    bounds: &GridBounds,
) -> Result<Vec<u8>, CodecError> {
    if indices.len() != grids.len() {
        return Err(CodecError::MismatchedCounts {
            indices: indices.len(),
            grids: grids.len(),
        });
    }
    let dim = grids
        .first()
        .map(|grid| grid.dim())
        .ok_or(CodecError::NonPositiveField(0))?;
    for grid in grids {
        if grid.dim() != dim {
            return Err(CodecError::MismatchedShapes(dim, grid.dim()));
        }
    }
    let n = i32::try_from(indices.len()).map_err(|_| CodecError::DimensionOverflow(indices.len()))?;
    let data_len = dim.0 * dim.1 * dim.2;
    let mut buf = Vec::with_capacity((4 + indices.len() + 6) * 4 + grids.len() * data_len * 4);
    buf.write_i32::<LittleEndian>(n)?;
    write_dims(&mut buf, dim)?;
    for &index in indices {
        buf.write_i32::<LittleEndian>(index)?;
    }
    write_bounds(&mut buf, bounds)?;
    for grid in grids {
        write_data(&mut buf, grid)?;
    }
    Ok(buf)
}

/// Decodes a batch buffer produced by [`encode_batch`].
pub fn decode_batch(buf: &[u8]) -> Result<GridBatch, CodecError> {
    let mut cursor = Cursor::new(buf);
    let n = cursor.read_i32::<LittleEndian>()?;
    if n <= 0 {
        return Err(CodecError::NonPositiveField(n));
    }
    let dim = read_dims(&mut cursor)?;
    let indices = (0..n)
        .map(|_| cursor.read_i32::<LittleEndian>())
        .collect::<Result<Vec<_>, _>>()?;
    let bounds = read_bounds(&mut cursor)?;
    let grids = (0..n)
        .map(|_| read_data(&mut cursor, dim))
        .collect::<Result<Vec<_>, _>>()?;
    let remaining = buf.len() - usize::try_from(cursor.position()).unwrap_or(buf.len());
    if remaining > 0 {
        return Err(CodecError::TrailingBytes(remaining));
    }
    Ok(GridBatch {
        indices,
        bounds,
        grids,
    })
}
