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

//! Placements: position, orientation and scale of scene objects.
//!
//! A [`Placement`] is a semantic wrapper around a [`Mat4`] that is expected to
//! hold an affine transform (translation * rotation * scale). Renderer
//! back-ends decompose placements into the translation / quaternion / scale
//! triple their scene-description formats want, after composing them with a
//! coordinate-frame conversion. Composition always produces a new value;
//! placements are never mutated in place.

use super::{Mat4, Quaternion, Vec3};
use std::ops::Mul;

/// An affine transform placing an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Placement(pub Mat4);

impl Placement {
    /// The identity placement.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Wraps a matrix. The caller is responsible for it being affine.
    #[inline]
    pub const fn from_matrix(m: Mat4) -> Self {
        Self(m)
    }

    /// Creates a placement from a translation vector.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self(Mat4::from_translation(v))
    }

    /// Creates a placement from a rotation quaternion.
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        Self(Mat4::from_quat(q))
    }

    /// Builds a placement as translation * rotation * scale.
    pub fn from_parts(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self(
            Mat4::from_translation(translation) * Mat4::from_quat(rotation)
                * Mat4::from_scale(scale),
        )
    }

    /// Returns the underlying matrix.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    /// Extracts the translation component.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.0.get(0, 3), self.0.get(1, 3), self.0.get(2, 3))
    }

    /// Extracts the per-axis scale as the lengths of the linear columns.
    pub fn scale_vector(&self) -> Vec3 {
        Vec3::new(
            self.0.linear_col(0).length(),
            self.0.linear_col(1).length(),
            self.0.linear_col(2).length(),
        )
    }

    /// Extracts the rotation component as a quaternion.
    ///
    /// The linear columns are normalized by the scale first, so uniform and
    /// non-uniform (but axis-aligned) scales are tolerated.
    pub fn rotation(&self) -> Quaternion {
        let scale = self.scale_vector();
        let sx = if scale.x > f32::EPSILON { scale.x } else { 1.0 };
        let sy = if scale.y > f32::EPSILON { scale.y } else { 1.0 };
        let sz = if scale.z > f32::EPSILON { scale.z } else { 1.0 };

        let c0 = self.0.linear_col(0) * (1.0 / sx);
        let c1 = self.0.linear_col(1) * (1.0 / sy);
        let c2 = self.0.linear_col(2) * (1.0 / sz);

        let m = Mat4::from_rows(
            super::Vec4::new(c0.x, c1.x, c2.x, 0.0),
            super::Vec4::new(c0.y, c1.y, c2.y, 0.0),
            super::Vec4::new(c0.z, c1.z, c2.z, 0.0),
            super::Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        Quaternion::from_rotation_matrix(&m)
    }

    /// Applies the full placement (rotation, scale and translation) to a point.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.0.transform_point(p)
    }

    /// Applies the linear part only, for directions.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.0.transform_vector(v)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Placement {
    type Output = Self;

    /// Composes two placements: `a * b` applies `b` first, then `a`.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}
