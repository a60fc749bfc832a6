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

//! The camera description handed to renderer back-ends.

use crate::math::{Placement, Vec3};

/// A perspective camera.
///
/// `placement` fully determines position and orientation; `up` and `target`
/// are also provided because some scene-description languages are written in
/// look-at terms rather than transform terms. Back-ends use whichever
/// formulation their format wants.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Position and orientation, host frame.
    pub placement: Placement,
    /// Up direction, host frame.
    pub up: Vec3,
    /// Point the camera looks at, host frame.
    pub target: Vec3,
    /// Vertical field of view, in degrees.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            placement: Placement::IDENTITY,
            up: Vec3::Z,
            target: Vec3::ZERO,
            fov: 45.0,
        }
    }
}
