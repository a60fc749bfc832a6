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

//! Scene-object descriptors consumed by renderer back-ends.

mod camera;
mod light;
mod mesh;

pub use camera::Camera;
pub use light::{AreaLight, DistantLight, ImageLight, PointLight, SunSkyLight};
pub use mesh::Mesh;

use std::fmt;
use std::path::PathBuf;

/// An error while materializing a scene object on disk.
#[derive(Debug)]
pub enum SceneError {
    /// A file could not be written.
    Io {
        /// The path of the file that failed to be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io { path, source } => {
                write!(f, "Failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io { source, .. } => Some(source),
        }
    }
}
