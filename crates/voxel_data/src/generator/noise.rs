//! FastNoiseLite-based terrain generator.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::IVec3;

use super::WorldGenerator;
use crate::types::{MaterialId, VoxelValue};

/// Material of solid voxels close to the surface.
pub const TOPSOIL_MATERIAL: MaterialId = 1;

/// Material of solid voxels deeper than [`NoiseTerrain::topsoil_depth`].
pub const ROCK_MATERIAL: MaterialId = 2;

/// Height field terrain perturbed by 3D noise.
///
/// Density formula: `value = (y - base_height) + noise(x, y, z) * amplitude`
///
/// Where `value < 0` is solid and `value > 0` is air. Noise is evaluated per
/// voxel, so region and point sampling agree by construction.
pub struct NoiseTerrain {
  noise: FastNoiseLite,
  /// Height of the unperturbed surface (default: 0.0)
  pub base_height: f32,
  /// Multiplier for noise output (default: 12.0)
  /// FastNoiseLite outputs [-1, 1], so this is the maximum surface offset.
  pub amplitude: f32,
  /// Solid voxels within this distance of the surface are topsoil.
  pub topsoil_depth: f32,
  pub seed: i32,
}

impl NoiseTerrain {
  /// Create a terrain generator with default shape.
  pub fn new(seed: i32) -> Self {
    Self::with_frequency(seed, 0.02)
  }

  /// Create a terrain generator sampling noise at `frequency`.
  ///
  /// Smaller values = larger terrain features.
  pub fn with_frequency(seed: i32, frequency: f32) -> Self {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(3));
    noise.set_frequency(Some(frequency));
    Self {
      noise,
      base_height: 0.0,
      amplitude: 12.0,
      topsoil_depth: 4.0,
      seed,
    }
  }

  pub fn with_base_height(mut self, base_height: f32) -> Self {
    self.base_height = base_height;
    self
  }

  pub fn with_amplitude(mut self, amplitude: f32) -> Self {
    self.amplitude = amplitude;
    self
  }
}

impl WorldGenerator for NoiseTerrain {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    let p = position.as_vec3();
    let noise = self.noise.get_noise_3d(p.x, p.y, p.z);
    let value = (p.y - self.base_height) + noise * self.amplitude;

    let material = if value >= 0.0 {
      0
    } else if value > -self.topsoil_depth {
      TOPSOIL_MATERIAL
    } else {
      ROCK_MATERIAL
    };
    (value, material)
  }
}
