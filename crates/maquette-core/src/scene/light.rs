// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Light descriptors handed to renderer back-ends.
//!
//! There is deliberately no common base type: each light kind carries its own
//! parameter set, and each back-end exposes one writer per kind. Positions
//! and directions are in the host frame (Z up, right-handed); back-ends
//! convert to their renderer's frame when writing.

use crate::math::{Placement, Srgba, Vec3};
use std::path::PathBuf;

/// A point light emitting uniformly in all directions.
///
/// `power` is handed to back-ends unconverted; renderers that want a
/// different photometric quantity rescale it themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Position of the light, host frame.
    pub position: Vec3,
    /// Color of the light, document (sRGB) space.
    pub color: Srgba,
    /// Emitted power.
    pub power: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Srgba::WHITE,
            power: 60.0,
        }
    }
}

/// A rectangular area light.
///
/// The rectangle spans `[-size_u, +size_u] x [-size_v, +size_v]` in its local
/// XY plane and emits along its local +Z; `placement` carries it into the
/// scene.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    /// Placement of the emitting rectangle.
    pub placement: Placement,
    /// Half-extent along the local U (X) axis.
    pub size_u: f32,
    /// Half-extent along the local V (Y) axis.
    pub size_v: f32,
    /// Color of the light, document (sRGB) space.
    pub color: Srgba,
    /// Total emitted power; back-ends derive radiance from it and the area.
    pub power: f32,
    /// Whether the emitting surface is see-through from behind.
    pub transparent: bool,
}

impl Default for AreaLight {
    fn default() -> Self {
        Self {
            placement: Placement::IDENTITY,
            size_u: 1.0,
            size_v: 1.0,
            color: Srgba::WHITE,
            power: 100.0,
            transparent: false,
        }
    }
}

/// A distant (directional) light, such as a sun without a sky model.
#[derive(Debug, Clone, PartialEq)]
pub struct DistantLight {
    /// Direction the light travels, host frame. Not necessarily normalized.
    pub direction: Vec3,
    /// Color of the light, document (sRGB) space.
    pub color: Srgba,
    /// Emitted power.
    pub power: f32,
    /// Apparent angular diameter of the source, in degrees.
    pub angle: f32,
}

impl Default for DistantLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Srgba::WHITE,
            power: 1.0,
            // The solar disc seen from earth.
            angle: 0.53,
        }
    }
}

/// A physically-modeled sun and sky.
#[derive(Debug, Clone, PartialEq)]
pub struct SunSkyLight {
    /// Direction *towards* the sun, host frame.
    pub direction: Vec3,
    /// Distance to the sun. Kept in the descriptor for completeness; most
    /// sky models, including OSPRay's, ignore it.
    pub distance: f32,
    /// Atmospheric turbidity (haziness), typically 1-10.
    pub turbidity: f32,
    /// Ground albedo in `[0, 1]`.
    pub albedo: f32,
    /// Scale factor on the sun contribution.
    pub sun_intensity: f32,
    /// Scale factor on the sky contribution. Not every back-end supports it.
    pub sky_intensity: f32,
}

impl Default for SunSkyLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-1.0, -1.0, -1.0),
            distance: 1.0,
            turbidity: 2.0,
            albedo: 0.3,
            sun_intensity: 1.0,
            sky_intensity: 1.0,
        }
    }
}

/// An image-based (environment) light.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageLight {
    /// Path to the environment image (HDR or LDR) on disk.
    pub image: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_point_light_default() {
        let light = PointLight::default();
        assert_eq!(light.color, Srgba::WHITE);
        assert!(approx_eq(light.power, 60.0));
    }

    #[test]
    fn test_area_light_default_is_unit_square() {
        let light = AreaLight::default();
        assert!(approx_eq(light.size_u, 1.0));
        assert!(approx_eq(light.size_v, 1.0));
        assert!(!light.transparent);
    }

    #[test]
    fn test_distant_light_default_points_down() {
        let light = DistantLight::default();
        assert!(light.direction.z < 0.0);
        assert!(light.angle > 0.0);
    }

    #[test]
    fn test_sun_sky_default_intensities() {
        let light = SunSkyLight::default();
        assert!(approx_eq(light.sun_intensity, 1.0));
        assert!(approx_eq(light.sky_intensity, 1.0));
    }
}
