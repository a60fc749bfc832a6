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

//! Errors of the OSPRay Studio back-end.

use std::path::PathBuf;
use thiserror::Error;

/// An error while writing scene assets or preparing a render.
#[derive(Debug, Error)]
pub enum OsprayError {
    /// A file could not be read or written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The scene description file is not valid JSON.
    #[error("Scene description is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A node the post-processing passes rely on is missing.
    #[error("Scene description has no usable '{0}' node")]
    MissingNode(&'static str),

    /// The host-side mesh export failed.
    #[error(transparent)]
    Scene(#[from] maquette_core::scene::SceneError),
}
