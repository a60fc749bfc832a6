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

//! Project-level plumbing shared by all renderer back-ends.
//!
//! The render pipeline driver collects one scene-description fragment per
//! scene object, merges them into a renderer template, writes the result to
//! the project directory and asks the back-end for an invocation command.
//! This module holds the pieces of that flow that are back-end agnostic:
//! export directories, rendering parameters and template instantiation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder line marking where object fragments go in a template.
const CONTENT_MARKER: &str = "RaytracingContent";
/// Placeholder line marking where the default camera goes in a template.
const CAMERA_MARKER: &str = "RaytracingCamera";

/// The directories a back-end writes into.
///
/// Fragment files (OBJ, MTL, glTF...) go to `object_directory`; paths
/// embedded in the scene description are made relative to
/// `project_directory`, where the instantiated template lives.
#[derive(Debug, Clone)]
pub struct ExportDirs {
    /// The project directory, holding the instantiated scene description.
    pub project_directory: PathBuf,
    /// The per-project directory receiving one file per exported object.
    pub object_directory: PathBuf,
}

impl ExportDirs {
    /// Derives the standard layout: objects go to a subdirectory of the
    /// project directory named after the project.
    pub fn new(project_directory: impl Into<PathBuf>, project_name: &str) -> Self {
        let project_directory = project_directory.into();
        let object_directory = project_directory.join(project_name);
        Self {
            project_directory,
            object_directory,
        }
    }

    /// Creates the object directory if it does not exist yet.
    pub fn ensure_object_directory(&self) -> std::io::Result<()> {
        if !self.object_directory.exists() {
            fs::create_dir_all(&self.object_directory)?;
        }
        Ok(())
    }
}

/// Parameters of one rendering run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Path of the output image requested by the user.
    pub output: PathBuf,
    /// Rendered image width, in pixels.
    pub width: u32,
    /// Rendered image height, in pixels.
    pub height: u32,
    /// Whether to run the renderer in batch (console) mode.
    pub batch: bool,
    /// Maximum samples per pixel (halt condition); 0 lets the renderer run.
    pub spp: u32,
    /// Whether to run the renderer's denoiser.
    pub denoise: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.png"),
            width: 800,
            height: 600,
            batch: false,
            spp: 32,
            denoise: false,
        }
    }
}

impl RenderParams {
    /// Checks the parameters are renderable.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.width == 0 || self.height == 0 {
            return Err(ProjectError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Reads a rendering template from disk.
pub fn load_template(path: &Path) -> Result<String, ProjectError> {
    fs::read_to_string(path).map_err(|_| ProjectError::TemplateNotFound(path.to_path_buf()))
}

/// Merges object fragments and the default camera into a template.
///
/// If the template carries a line containing `RaytracingCamera`, that line is
/// replaced by `defaultcam` and the content is the fragments alone; otherwise
/// the camera is prepended to the fragments. The line containing
/// `RaytracingContent` is then replaced by the content.
pub fn instantiate_template(template: &str, objstrings: &[String], defaultcam: &str) -> String {
    let renderobjs = objstrings.join("\n");

    let has_camera_marker = template.lines().any(|l| l.contains(CAMERA_MARKER));
    let content = if has_camera_marker {
        renderobjs
    } else {
        format!("{defaultcam}\n{renderobjs}")
    };

    let mut out = Vec::new();
    for line in template.lines() {
        if line.contains(CONTENT_MARKER) {
            out.push(content.clone());
        } else if has_camera_marker && line.contains(CAMERA_MARKER) {
            out.push(defaultcam.to_string());
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

/// A blocking error in the project-level rendering flow.
#[derive(Debug)]
pub enum ProjectError {
    /// The rendering template could not be found.
    TemplateNotFound(PathBuf),
    /// Render width and/or height are unusable.
    InvalidDimensions {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::TemplateNotFound(path) => {
                write!(f, "Template not found ('{}')", path.display())
            }
            ProjectError::InvalidDimensions { width, height } => {
                write!(
                    f,
                    "Invalid render dimensions ({width}x{height}): cannot render"
                )
            }
        }
    }
}

impl std::error::Error for ProjectError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = RenderParams::default();
        assert_eq!((params.width, params.height), (800, 600));
        assert_eq!(params.spp, 32);
        assert!(!params.batch);
        assert!(!params.denoise);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        let params = RenderParams {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ProjectError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_instantiate_without_camera_marker_prepends_camera() {
        let template = "header\n  // RaytracingContent\nfooter";
        let objs = vec!["obj1".to_string(), "obj2".to_string()];
        let out = instantiate_template(template, &objs, "cam");
        assert_eq!(out, "header\ncam\nobj1\nobj2\nfooter");
    }

    #[test]
    fn test_instantiate_with_camera_marker_replaces_it() {
        let template = "a\n// RaytracingCamera\nb\n// RaytracingContent\nc";
        let objs = vec!["obj".to_string()];
        let out = instantiate_template(template, &objs, "cam");
        assert_eq!(out, "a\ncam\nb\nobj\nc");
    }

    #[test]
    fn test_export_dirs_layout() {
        let dirs = ExportDirs::new("/tmp/project", "Scene");
        assert_eq!(dirs.object_directory, PathBuf::from("/tmp/project/Scene"));
    }
}
