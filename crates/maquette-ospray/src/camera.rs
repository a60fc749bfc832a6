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

//! The camera writer.
//!
//! OSPRay Studio's scene graph cannot take a vertical field of view on a
//! camera node, so the camera is shipped as a one-camera glTF asset instead
//! (glTF *can* express `yfov`), referenced by an importer fragment. The
//! fragment carries a `freecadtype` tag so the render-time deduplication
//! pass can recognize camera nodes among the world children.

use crate::coords::convert_placement;
use crate::error::OsprayError;
use crate::fragment;
use crate::objfile::new_object_file_path;
use maquette_core::math::DEG_TO_RAD;
use maquette_core::project::ExportDirs;
use maquette_core::scene::Camera;
use serde_json::json;
use std::fs;

/// Writes `camera` as a glTF asset and returns the fragment referencing it.
pub fn write_camera(
    name: &str,
    camera: &Camera,
    resolution: (u32, u32),
    dirs: &ExportDirs,
) -> Result<String, OsprayError> {
    let plc = convert_placement(camera.placement);
    let base = plc.translation();
    let rot = plc.rotation();
    let fov = camera.fov * DEG_TO_RAD;
    let (width, height) = resolution;
    let aratio = width as f32 / height as f32;

    let gltf = json!({
        "asset": {
            "generator": "Maquette Render Workbench",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [
            {
                "name": "scene",
                "nodes": [0]
            }
        ],
        "cameras": [
            {
                "name": name,
                "type": "perspective",
                "perspective": {
                    "yfov": fov,
                    "znear": 0.0,
                    "aspectRatio": aratio
                }
            }
        ],
        "nodes": [
            {
                "translation": [base.x, base.y, base.z],
                "rotation": [rot.x, rot.y, rot.z, rot.w],
                "camera": 0
            }
        ]
    });

    let (gltf_file, gltf_file_rel) = new_object_file_path(name, "gltf", dirs);
    let text = serde_json::to_string_pretty(&gltf)?;
    fs::write(&gltf_file, text).map_err(|source| OsprayError::Io {
        path: gltf_file.clone(),
        source,
    })?;

    let snippet = json!({
        "name": name,
        "type": "IMPORTER",
        "filename": gltf_file_rel,
        "freecadtype": "camera"
    });
    Ok(fragment(&snippet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maquette_core::math::{Placement, Vec3, PI};
    use serde_json::Value;

    #[test]
    fn test_camera_asset_and_fragment() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = ExportDirs::new(tmp.path(), "Scene");
        dirs.ensure_object_directory().unwrap();

        let camera = Camera {
            placement: Placement::from_translation(Vec3::new(0.0, -10.0, 2.0)),
            fov: 90.0,
            ..Default::default()
        };
        let out = write_camera("Camera", &camera, (1920, 1080), &dirs).unwrap();

        let v: Value = serde_json::from_str(out.trim_end().trim_end_matches(',')).unwrap();
        assert_eq!(v["type"], "IMPORTER");
        assert_eq!(v["freecadtype"], "camera");
        assert_eq!(v["filename"], "Scene/Camera.gltf");

        let gltf: Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("Scene/Camera.gltf")).unwrap())
                .unwrap();
        // 90 degrees, in radians.
        let yfov = gltf["cameras"][0]["perspective"]["yfov"].as_f64().unwrap();
        assert!((yfov - (PI / 2.0) as f64).abs() < 1e-5);
        let aratio = gltf["cameras"][0]["perspective"]["aspectRatio"]
            .as_f64()
            .unwrap();
        assert!((aratio - 1920.0 / 1080.0).abs() < 1e-5);
        // Host position (0, -10, 2) lands at (0, 2, 10) in OSPRay's frame.
        let t = gltf["nodes"][0]["translation"].as_array().unwrap();
        assert!((t[0].as_f64().unwrap()).abs() < 1e-5);
        assert!((t[1].as_f64().unwrap() - 2.0).abs() < 1e-5);
        assert!((t[2].as_f64().unwrap() - 10.0).abs() < 1e-5);
    }
}
