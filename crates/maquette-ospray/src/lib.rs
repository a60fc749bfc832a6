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

//! # Maquette OSPRay back-end
//!
//! Translates Maquette scene objects into OSPRay Studio's scene-description
//! language (a JSON dialect) and auxiliary assets, and builds the command
//! line invoking the renderer.
//!
//! No official description of the `.sg` format exists; the conventions here
//! are reverse-engineered from how OSPRay Studio reads scene files. Two of
//! its gaps are worked around with small glTF assets: per-camera field of
//! view, and image-based lighting.
//!
//! The write functions each return one fragment of SDL text, terminated by
//! a comma: the render pipeline concatenates fragments into an array slot
//! of a scene template, then calls [`render`] once to post-process the
//! assembled file and obtain the renderer invocation.

#![warn(missing_docs)]

pub mod camera;
pub mod coords;
pub mod error;
pub mod fields;
pub mod lights;
pub mod material;
pub mod mesh;
mod objfile;
pub mod render;

pub use camera::write_camera;
pub use error::OsprayError;
pub use fields::OspraySdl;
pub use lights::{
    write_arealight, write_distantlight, write_imagelight, write_pointlight, write_sunskylight,
};
pub use material::write_material;
pub use mesh::write_mesh;
pub use render::{render, test_cmdline, RenderJob};

/// The file filter for OSPRay scene templates.
pub const TEMPLATE_FILTER: &str = "Ospray templates (ospray_*.sg)";

/// Renders a JSON value as one comma-terminated SDL fragment.
pub(crate) fn fragment(value: &serde_json::Value) -> String {
    let text = serde_json::to_string_pretty(value)
        .expect("a JSON value tree always serializes");
    format!("{text},\n")
}
