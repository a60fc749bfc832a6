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

//! Conversion from the host frame to OSPRay's frame.
//!
//! The host scene is Z-up, right-handed; OSPRay is Y-up:
//!
//! ```text
//!  host (z up):            ospray (y up):
//!
//!   z  y                      y
//!   | /                       |
//!   .--x                      .--x
//!                            /
//!                           z
//! ```
//!
//! The conversion maps (x, y, z) to (x, z, -y). It is applied exactly once
//! per write call: left-multiplied onto placements, or alone on bare
//! directions. It is never accumulated.

use maquette_core::math::{Mat4, Placement, Vec3, Vec4};

/// The host-to-OSPRay frame conversion.
pub const HOST_TO_OSP: Placement = Placement::from_matrix(Mat4::from_rows(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
));

/// Converts a placement into OSPRay's frame.
#[inline]
pub fn convert_placement(placement: Placement) -> Placement {
    HOST_TO_OSP * placement
}

/// Converts a bare direction into OSPRay's frame.
#[inline]
pub fn convert_vector(v: Vec3) -> Vec3 {
    HOST_TO_OSP.transform_vector(v)
}

/// Converts a bare position into OSPRay's frame.
#[inline]
pub fn convert_point(p: Vec3) -> Vec3 {
    HOST_TO_OSP.transform_point(p)
}
