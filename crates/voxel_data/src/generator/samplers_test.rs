use glam::{IVec3, Vec3};

use super::*;

/// Region output must equal point-wise output at every sampled coordinate.
fn assert_region_matches_points<G: WorldGenerator>(generator: &G, query: &RegionQuery) {
  let mut values = vec![f32::NAN; query.dest_len()];
  let mut materials = vec![u8::MAX; query.dest_len()];
  generator.sample_region(Some(&mut values), Some(&mut materials), query);

  query.for_each_local(|local| {
    let index = query.dest_index(local);
    let (value, material) = generator.sample_point(query.start + local);
    assert_eq!(values[index], value, "Value mismatch at {:?}", local);
    assert_eq!(materials[index], material, "Material mismatch at {:?}", local);
  });
}

fn queries() -> [RegionQuery; 3] {
  [
    RegionQuery::new(IVec3::new(-8, -8, -8), IVec3::splat(16)),
    RegionQuery::new(IVec3::new(3, -20, 7), IVec3::new(5, 30, 2)),
    RegionQuery::new(IVec3::new(-16, -16, -16), IVec3::splat(32))
      .with_step(4)
      .with_offset(IVec3::new(2, 0, 1))
      .with_array_size(IVec3::new(34, 32, 33)),
  ]
}

// =========================================================================
// ConstantGenerator
// =========================================================================

#[test]
fn test_constant_generator() {
  let generator = ConstantGenerator::new(-2.5, 7);
  assert_eq!(generator.sample_point(IVec3::new(100, -3, 9)), (-2.5, 7));
  for query in &queries() {
    assert_region_matches_points(&generator, query);
  }
}

/// Omitted outputs are skipped without touching the other one.
#[test]
fn test_constant_generator_materials_only() {
  let generator = ConstantGenerator::new(1.0, 3);
  let query = RegionQuery::new(IVec3::ZERO, IVec3::splat(2));
  let mut materials = vec![0u8; query.dest_len()];
  generator.sample_region(None, Some(&mut materials), &query);
  assert!(materials.iter().all(|&m| m == 3));
}

// =========================================================================
// GroundPlaneGenerator
// =========================================================================

#[test]
fn test_ground_plane_sign_and_material() {
  let generator = GroundPlaneGenerator::new(4.0).with_materials(9, 0);

  assert_eq!(generator.sample_point(IVec3::new(0, 0, 0)), (-4.0, 9));
  assert_eq!(generator.sample_point(IVec3::new(50, 4, -50)), (0.0, 0));
  assert_eq!(generator.sample_point(IVec3::new(0, 10, 0)), (6.0, 0));
}

#[test]
fn test_ground_plane_region_matches_points() {
  let generator = GroundPlaneGenerator::new(-2.5);
  for query in &queries() {
    assert_region_matches_points(&generator, query);
  }
}

// =========================================================================
// SphereGenerator
// =========================================================================

#[test]
fn test_sphere_sign() {
  let generator = SphereGenerator::new(10.0).with_center(Vec3::new(5.0, 0.0, 0.0));

  let (inside, material) = generator.sample_point(IVec3::new(5, 0, 0));
  assert_eq!(inside, -10.0);
  assert_eq!(material, 1);

  let (surface, _) = generator.sample_point(IVec3::new(15, 0, 0));
  assert!(surface.abs() < 1e-6);

  let (outside, material) = generator.sample_point(IVec3::new(5, 30, 0));
  assert!(outside > 0.0);
  assert_eq!(material, 0);
}

#[test]
fn test_sphere_region_matches_points() {
  let generator = SphereGenerator::default();
  for query in &queries() {
    assert_region_matches_points(&generator, query);
  }
}

// =========================================================================
// NoiseTerrain
// =========================================================================

#[test]
fn test_noise_terrain_is_deterministic() {
  let a = NoiseTerrain::new(1337);
  let b = NoiseTerrain::new(1337);
  for p in [IVec3::ZERO, IVec3::new(17, -4, 90), IVec3::new(-300, 12, 5)] {
    assert_eq!(a.sample_point(p), b.sample_point(p));
  }
}

/// Far below the surface is rock, far above is air.
#[test]
fn test_noise_terrain_layers() {
  let generator = NoiseTerrain::new(7).with_amplitude(4.0);

  let (deep, material) = generator.sample_point(IVec3::new(3, -50, 3));
  assert!(deep < 0.0);
  assert_eq!(material, ROCK_MATERIAL);

  let (sky, material) = generator.sample_point(IVec3::new(3, 50, 3));
  assert!(sky > 0.0);
  assert_eq!(material, 0);
}

#[test]
fn test_noise_terrain_region_matches_points() {
  let generator = NoiseTerrain::with_frequency(99, 0.05).with_base_height(3.0);
  for query in &queries() {
    assert_region_matches_points(&generator, query);
  }
}

// =========================================================================
// Blanket impls
// =========================================================================

#[test]
fn test_boxed_and_shared_generators_forward() {
  let boxed: Box<dyn WorldGenerator> = Box::new(GroundPlaneGenerator::default());
  let shared = Arc::new(SphereGenerator::default());
  let p = IVec3::new(1, -2, 3);

  assert_eq!(boxed.sample_point(p), GroundPlaneGenerator::default().sample_point(p));
  assert_eq!(shared.sample_point(p), SphereGenerator::default().sample_point(p));
  assert_region_matches_points(&boxed, &queries()[1]);
  assert_region_matches_points(&shared, &queries()[2]);
}
