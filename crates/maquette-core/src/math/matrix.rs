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

//! Row-major 4x4 matrices.
//!
//! Matrices act on column vectors (`p' = M * p`) but are *stored* by rows,
//! matching the convention of the host CAD kernel. The translation part of an
//! affine matrix therefore lives in the last column, i.e. the `w` component
//! of the first three rows.

use super::{Quaternion, Vec3, Vec4};
use std::ops::Mul;

/// A 4x4 matrix stored as four rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// The rows of the matrix, top to bottom.
    pub rows: [Vec4; 4],
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    );

    /// Creates a matrix from four rows, top to bottom.
    #[inline]
    pub const fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            rows: [r0, r1, r2, r3],
        }
    }

    /// Creates a pure translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_rows(
            Vec4::new(1.0, 0.0, 0.0, v.x),
            Vec4::new(0.0, 1.0, 0.0, v.y),
            Vec4::new(0.0, 0.0, 1.0, v.z),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Creates a pure non-uniform scale matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_rows(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Creates a rotation matrix from a (unit) quaternion.
    pub fn from_quat(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let x2 = x + x;
        let y2 = y + y;
        let z2 = z + z;
        let xx = x * x2;
        let xy = x * y2;
        let xz = x * z2;
        let yy = y * y2;
        let yz = y * z2;
        let zz = z * z2;
        let wx = w * x2;
        let wy = w * y2;
        let wz = w * z2;

        Self::from_rows(
            Vec4::new(1.0 - (yy + zz), xy - wz, xz + wy, 0.0),
            Vec4::new(xy + wz, 1.0 - (xx + zz), yz - wx, 0.0),
            Vec4::new(xz - wy, yz + wx, 1.0 - (xx + yy), 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Returns the element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        let r = self.rows[row];
        match col {
            0 => r.x,
            1 => r.y,
            2 => r.z,
            3 => r.w,
            _ => panic!("Mat4 column index out of bounds: {col}"),
        }
    }

    /// Returns the given column of the upper-left 3x3 block.
    #[inline]
    pub fn linear_col(&self, col: usize) -> Vec3 {
        Vec3::new(
            self.get(0, col),
            self.get(1, col),
            self.get(2, col),
        )
    }

    /// Transforms a point, applying the translation part.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v = Vec4::new(p.x, p.y, p.z, 1.0);
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    /// Transforms a direction with the linear 3x3 block only.
    #[inline]
    pub fn transform_vector(&self, p: Vec3) -> Vec3 {
        let v = Vec4::new(p.x, p.y, p.z, 0.0);
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut rows = [Vec4::default(); 4];
        for (i, row) in rows.iter_mut().enumerate() {
            *row = Vec4::new(
                (0..4).map(|k| self.get(i, k) * rhs.get(k, 0)).sum(),
                (0..4).map(|k| self.get(i, k) * rhs.get(k, 1)).sum(),
                (0..4).map(|k| self.get(i, k) * rhs.get(k, 2)).sum(),
                (0..4).map(|k| self.get(i, k) * rhs.get(k, 3)).sum(),
            );
        }
        Mat4 { rows }
    }
}
