use ndarray::{Array3, ShapeBuilder};
use proptest::prelude::*;

use crate::grid::GridBounds;
use crate::io::grids::{decode_batch, decode_grid, encode_batch, encode_grid, CodecError};

fn test_bounds() -> GridBounds {
    GridBounds {
        min: [-5.0, -5.757, -5.0],
        max: [5.0, 5.757, 5.587],
    }
}

fn ramp_grid(size: usize, offset: f32) -> Array3<f32> {
    let data = (0..size * size * size)
        .map(|i| offset + i as f32 * 0.25)
        .collect::<Vec<_>>();
    Array3::from_shape_vec((size, size, size), data).unwrap()
}

#[test]
fn test_grids_single_roundtrip() {
    let grid = ramp_grid(3, -1.0);
    let bounds = test_bounds();
    let buf = encode_grid(&grid, &bounds).unwrap();
    assert_eq!(buf.len(), 3 * 4 + 6 * 4 + 27 * 4);
    let (decoded, decoded_bounds) = decode_grid(&buf).unwrap();
    assert_eq!(decoded, grid);
    for axis in 0..3 {
        assert_eq!(decoded_bounds.min[axis], f64::from(bounds.min[axis] as f32));
        assert_eq!(decoded_bounds.max[axis], f64::from(bounds.max[axis] as f32));
    }
    // Re-encoding the decoded buffer is byte-identical.
    assert_eq!(encode_grid(&decoded, &decoded_bounds).unwrap(), buf);
}

#[test]
fn test_grids_single_header_layout() {
    let grid = ramp_grid(2, 0.0);
    let buf = encode_grid(&grid, &test_bounds()).unwrap();
    // Little-endian dimension triplet.
    assert_eq!(&buf[0..4], &2i32.to_le_bytes());
    assert_eq!(&buf[4..8], &2i32.to_le_bytes());
    assert_eq!(&buf[8..12], &2i32.to_le_bytes());
    assert_eq!(&buf[12..16], &(-5.0f32).to_le_bytes());
    assert_eq!(&buf[16..20], &(-5.757f32).to_le_bytes());
}

#[test]
fn test_grids_data_order_is_row_major() {
    // Values laid out with x varying slowest must serialise in logical (x, y, z) order even if
    // the array's memory layout differs.
    let size = 2;
    let f_order = Array3::from_shape_vec(
        (size, size, size).f(),
        vec![0.0f32, 4.0, 2.0, 6.0, 1.0, 5.0, 3.0, 7.0],
    )
    .unwrap();
    let buf = encode_grid(&f_order, &test_bounds()).unwrap();
    let (decoded, _) = decode_grid(&buf).unwrap();
    for (flat, expected) in (0..8).zip([0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]) {
        let (ix, iy, iz) = (flat / 4, (flat / 2) % 2, flat % 2);
        assert_eq!(decoded[[ix, iy, iz]], expected);
    }
}

#[test]
fn test_grids_single_truncated() {
    let grid = ramp_grid(3, 0.0);
    let buf = encode_grid(&grid, &test_bounds()).unwrap();
    assert!(matches!(
        decode_grid(&buf[..buf.len() - 1]),
        Err(CodecError::Io(_))
    ));
}

#[test]
fn test_grids_single_trailing_bytes() {
    let grid = ramp_grid(2, 0.0);
    let mut buf = encode_grid(&grid, &test_bounds()).unwrap();
    buf.extend_from_slice(&[0u8; 3]);
    assert!(matches!(
        decode_grid(&buf),
        Err(CodecError::TrailingBytes(3))
    ));
}

#[test]
fn test_grids_batch_byte_lengths() {
    let bounds = test_bounds();
    for n in [1usize, 3, 6] {
        for size in [8usize, 16] {
            let indices = (0..n as i32).collect::<Vec<_>>();
            let grids = (0..n)
                .map(|i| ramp_grid(size, i as f32))
                .collect::<Vec<_>>();
            let buf = encode_batch(&indices, &grids, &bounds).unwrap();
            let expected = (4 + n) * 4 + 6 * 4 + n * size * size * size * 4;
            assert_eq!(buf.len(), expected);
        }
    }
}

#[test]
fn test_grids_batch_roundtrip() {
    let bounds = test_bounds();
    let indices = vec![4, 0, 9];
    let grids = vec![ramp_grid(4, 0.0), ramp_grid(4, -3.0), ramp_grid(4, 7.5)];
    let buf = encode_batch(&indices, &grids, &bounds).unwrap();
    let batch = decode_batch(&buf).unwrap();
    // Index order is preserved verbatim.
    assert_eq!(batch.indices, indices);
    assert_eq!(batch.grids, grids);
    assert_eq!(
        encode_batch(&batch.indices, &batch.grids, &batch.bounds).unwrap(),
        buf
    );
}

#[test]
fn test_grids_batch_mismatched_shapes() {
    let bounds = test_bounds();
    let grids = vec![ramp_grid(4, 0.0), ramp_grid(3, 0.0)];
    assert!(matches!(
        encode_batch(&[0, 1], &grids, &bounds),
        Err(CodecError::MismatchedShapes(..))
    ));
}

#[test]
fn test_grids_batch_mismatched_counts() {
    let bounds = test_bounds();
    let grids = vec![ramp_grid(4, 0.0)];
    assert!(matches!(
        encode_batch(&[0, 1], &grids, &bounds),
        Err(CodecError::MismatchedCounts { .. })
    ));
}

proptest! {
    #[test]
    fn test_grids_single_roundtrip_prop(
        size in 1usize..=8,
        seed in proptest::collection::vec(-1.0e6f32..1.0e6f32, 512),
    ) {
        let n_values = size * size * size;
        let data = (0..n_values).map(|i| seed[i % seed.len()]).collect::<Vec<_>>();
        let grid = Array3::from_shape_vec((size, size, size), data).unwrap();
        let buf = encode_grid(&grid, &test_bounds()).unwrap();
        prop_assert_eq!(buf.len(), (3 + 6 + n_values) * 4);
        let (decoded, decoded_bounds) = decode_grid(&buf).unwrap();
        prop_assert_eq!(&decoded, &grid);
        prop_assert_eq!(encode_grid(&decoded, &decoded_bounds).unwrap(), buf);
    }
}
