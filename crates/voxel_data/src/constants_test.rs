use super::*;

#[test]
fn test_leaf_size_is_power_of_two() {
  assert!(LEAF_SIZE.is_power_of_two());
  assert_eq!(LEAF_SIZE, 16);
  assert_eq!(LEAF_VOLUME, 4096);
}

#[test]
fn test_coord_to_index_roundtrip() {
  for x in 0..LEAF_SIZE {
    for y in 0..LEAF_SIZE {
      for z in 0..LEAF_SIZE {
        let idx = coord_to_index(x, y, z);
        let (rx, ry, rz) = index_to_coord(idx);
        assert_eq!(
          (x, y, z),
          (rx, ry, rz),
          "Roundtrip failed for ({}, {}, {})",
          x,
          y,
          z
        );
      }
    }
  }
}

/// Every index in 0..4096 decodes to a coordinate that encodes back to it.
#[test]
fn test_index_to_coord_covers_whole_leaf() {
  for idx in 0..LEAF_VOLUME {
    let (x, y, z) = index_to_coord(idx);
    assert_eq!(coord_to_index(x, y, z), idx);
  }
}

#[test]
fn test_index_strides() {
  assert_eq!(coord_to_index(1, 0, 0), 1);
  assert_eq!(coord_to_index(0, 1, 0), LEAF_SIZE);
  assert_eq!(coord_to_index(0, 0, 1), LEAF_SIZE_SQ);
  assert_eq!(coord_to_index(15, 15, 15), LEAF_VOLUME - 1);
}

#[test]
fn test_node_size_doubles_per_depth() {
  assert_eq!(node_size(0), 16);
  assert_eq!(node_size(1), 32);
  assert_eq!(node_size(2), 64);
  assert_eq!(node_size(MAX_DEPTH), 16 << 20);
}
