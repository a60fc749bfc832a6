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

//! The light writers, one per light kind.
//!
//! Point, distant and sun-sky lights are plain fragments, wrapped in a
//! `LIGHTS` group that the render-time flattening pass later re-parents
//! under the lights manager. Area lights become a luminous quad mesh on
//! disk; image lights become a glTF asset carrying a background-image
//! extension block, since OSPRay Studio's scene graph cannot load a plain
//! texture as an environment.

use crate::coords::{convert_placement, convert_point, convert_vector};
use crate::error::OsprayError;
use crate::fragment;
use crate::objfile::{new_object_file_path, relative_path};
use maquette_core::diag::DiagnosticSink;
use maquette_core::math::Vec3;
use maquette_core::project::ExportDirs;
use maquette_core::scene::{AreaLight, DistantLight, ImageLight, PointLight, SunSkyLight};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Writes a point light as a sphere-light fragment.
pub fn write_pointlight(name: &str, light: &PointLight) -> String {
    let color = light.color.to_linear();
    let position = convert_point(light.position);

    let snippet = json!({
        "name": "lights",
        "type": "LIGHTS",
        "subType": "lights",
        "children": [
            {
                "name": name,
                "type": "LIGHT",
                "subType": "sphere",
                "children": [
                    {
                        "name": "visible",
                        "description": "whether the light can be seen directly",
                        "sgOnly": false,
                        "subType": "bool",
                        "type": "PARAMETER",
                        "value": true
                    },
                    {
                        "name": "intensity",
                        "description": "intensity of the light (a factor)",
                        "sgOnly": false,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": light.power
                    },
                    {
                        "name": "color",
                        "description": "color of the light",
                        "sgOnly": false,
                        "subType": "rgb",
                        "type": "PARAMETER",
                        "value": [color.r, color.g, color.b]
                    },
                    {
                        "name": "position",
                        "description": "position of the light",
                        "sgOnly": false,
                        "subType": "vec3f",
                        "type": "PARAMETER",
                        "value": [position.x, position.y, position.z]
                    }
                ]
            }
        ]
    });
    fragment(&snippet)
}

/// Writes an area light as a luminous quad mesh plus an importer fragment.
///
/// OSPRay's luminous material expects a radiance, not a power; the divisor
/// 1000 on top of the per-area conversion is an empirical constant matching
/// OSPRay's unit conventions and must not be re-derived.
pub fn write_arealight(
    name: &str,
    light: &AreaLight,
    dirs: &ExportDirs,
) -> Result<String, OsprayError> {
    // Power to radiance.
    let radiance = light.power / (light.size_u * light.size_v) / 1000.0;
    let transparency: f32 = if light.transparent { 1.0 } else { 0.0 };
    let lcol = light.color.to_linear();

    // Material file.
    let mtl = format!(
        "# Created by Maquette\n\
         newmtl material\n\
         type luminous\n\
         color {} {} {}\n\
         intensity {radiance}\n\
         transparency {transparency:.1}\n",
        lcol.r, lcol.g, lcol.b
    );
    let (mtl_file, _) = new_object_file_path(name, "mtl", dirs);
    fs::write(&mtl_file, mtl).map_err(|source| OsprayError::Io {
        path: mtl_file.clone(),
        source,
    })?;

    // Geometry file: one quad, transformed by the converted placement.
    let osp_pos = convert_placement(light.placement);
    let corners = [
        Vec3::new(-light.size_u, -light.size_v, 0.0),
        Vec3::new(light.size_u, -light.size_v, 0.0),
        Vec3::new(light.size_u, light.size_v, 0.0),
        Vec3::new(-light.size_u, light.size_v, 0.0),
    ];
    let verts: Vec<String> = corners
        .iter()
        .map(|v| {
            let p = osp_pos.transform_point(*v);
            format!("v {} {} {}", p.x, p.y, p.z)
        })
        .collect();
    let normal = osp_pos.transform_point(Vec3::Z);

    let mtl_basename = mtl_file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let obj = format!(
        "# Created by Maquette\n\
         mtllib {mtl_basename}\n\
         {}\n\
         vn {} {} {}\n\
         o {name}\n\
         usemtl material\n\
         f 1//1 2//1 3//1 4//1\n",
        verts.join("\n"),
        normal.x,
        normal.y,
        normal.z
    );
    let (obj_file, obj_file_rel) = new_object_file_path(name, "obj", dirs);
    fs::write(&obj_file, obj).map_err(|source| OsprayError::Io {
        path: obj_file.clone(),
        source,
    })?;

    let snippet = json!({
        "name": name,
        "type": "IMPORTER",
        "filename": obj_file_rel
    });
    Ok(fragment(&snippet))
}

/// Writes a distant (directional) light fragment.
pub fn write_distantlight(name: &str, light: &DistantLight) -> String {
    let color = light.color.to_linear();
    let direction = convert_vector(light.direction);

    let snippet = json!({
        "name": "lights",
        "type": "LIGHTS",
        "subType": "lights",
        "children": [
            {
                "name": name,
                "type": "LIGHT",
                "subType": "distant",
                "children": [
                    {
                        "name": "visible",
                        "description": "whether the light can be seen directly",
                        "sgOnly": false,
                        "subType": "bool",
                        "type": "PARAMETER",
                        "value": true
                    },
                    {
                        "name": "intensity",
                        "description": "intensity of the light (a factor)",
                        "sgOnly": false,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": light.power
                    },
                    {
                        "name": "color",
                        "description": "color of the light",
                        "sgOnly": false,
                        "subType": "rgb",
                        "type": "PARAMETER",
                        "value": [color.r, color.g, color.b]
                    },
                    {
                        "name": "angularDiameter",
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": light.angle
                    },
                    {
                        "name": "direction",
                        "subType": "vec3f",
                        "type": "PARAMETER",
                        "value": [direction.x, direction.y, direction.z]
                    }
                ]
            }
        ]
    });
    fragment(&snippet)
}

/// Writes a sun-sky light fragment.
///
/// Angles are computed in OSPRay's frame, where up is +Y and north is +Z:
/// elevation is the angle to the horizon, azimuth the angle to north,
/// both emitted in degrees. The sky intensity cannot be encoded; any value
/// other than 1.0 is ignored with a warning.
pub fn write_sunskylight(name: &str, light: &SunSkyLight, sink: &dyn DiagnosticSink) -> String {
    let dir = convert_vector(light.direction);
    let elevation = (dir.y / dir.length()).asin();
    let azimuth = dir.x.atan2(dir.z);
    let intensity = light.sun_intensity * 0.05;
    if light.sky_intensity != 1.0 {
        sink.warning(
            "[Maquette] [Ospray] - WARNING: sunsky light - sky intensity is not supported \
             (should be kept at 1.0).",
        );
    }

    let snippet = json!({
        "description": "Lights",
        "name": "lights",
        "subType": "lights",
        "type": "LIGHTS",
        "children": [
            {
                "name": name,
                "description": "Sunsky light",
                "type": "LIGHT",
                "subType": "sunSky",
                "children": [
                    {
                        "description": "whether the light can be seen directly",
                        "name": "visible",
                        "sgOnly": false,
                        "subType": "bool",
                        "type": "PARAMETER",
                        "value": true
                    },
                    {
                        "description": "intensity of the light (a factor)",
                        "name": "intensity",
                        "sgOnly": false,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": intensity
                    },
                    {
                        "description": "color of the light",
                        "name": "color",
                        "sgOnly": false,
                        "subType": "rgb",
                        "type": "PARAMETER",
                        "value": [1.0, 1.0, 1.0]
                    },
                    {
                        "description": "OSPRay light type",
                        "name": "type",
                        "sgOnly": true,
                        "subType": "string",
                        "type": "PARAMETER",
                        "value": "sunSky"
                    },
                    {
                        "description": "Up direction",
                        "name": "up",
                        "sgOnly": false,
                        "subType": "vec3f",
                        "type": "PARAMETER",
                        "value": [0.0, 1.0, 0.0]
                    },
                    {
                        "description": "Right direction",
                        "name": "right",
                        "sgOnly": true,
                        "subType": "vec3f",
                        "type": "PARAMETER",
                        "value": [1.0, 0.0, 0.0]
                    },
                    {
                        "description": "Angle to horizon",
                        "name": "elevation",
                        "sgOnly": true,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": elevation.to_degrees()
                    },
                    {
                        "description": "Angle to North",
                        "name": "azimuth",
                        "sgOnly": true,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": azimuth.to_degrees()
                    },
                    {
                        "description": "Turbidity",
                        "name": "turbidity",
                        "sgOnly": false,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": light.turbidity
                    },
                    {
                        "description": "Ground albedo",
                        "name": "albedo",
                        "sgOnly": false,
                        "subType": "float",
                        "type": "PARAMETER",
                        "value": light.albedo
                    }
                ]
            }
        ]
    });
    fragment(&snippet)
}

/// Writes an image-based light as a glTF asset plus an importer fragment.
///
/// The image path inside the asset must be relative to the asset's own
/// directory, not to the project directory: that is where OSPRay's glTF
/// importer resolves it from. The fixed quarter-turn about Y aligns the
/// environment map convention with the scene frame.
pub fn write_imagelight(
    name: &str,
    light: &ImageLight,
    dirs: &ExportDirs,
) -> Result<String, OsprayError> {
    let (gltf_file, gltf_file_rel) = new_object_file_path(name, "gltf", dirs);
    let gltf_dir = gltf_file.parent().unwrap_or_else(|| Path::new(""));
    let image_relpath = relative_path(&light.image, gltf_dir);

    let gltf = json!({
        "asset": {
            "generator": "Maquette Render Workbench",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [
            {
                "name": "scene",
                "nodes": []
            }
        ],
        "extensions": {
            "BIT_scene_background": {
                "background-uri": image_relpath.to_string_lossy(),
                "rotation": [0.0, 0.707_106_781_186_547_5, 0.0, 0.707_106_781_186_547_5]
            }
        }
    });
    let text = serde_json::to_string_pretty(&gltf)?;
    fs::write(&gltf_file, text).map_err(|source| OsprayError::Io {
        path: gltf_file.clone(),
        source,
    })?;

    let snippet = json!({
        "name": name,
        "type": "IMPORTER",
        "filename": gltf_file_rel
    });
    Ok(fragment(&snippet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maquette_core::diag::MemorySink;
    use maquette_core::math::{approx_eq, Placement, Srgba};
    use serde_json::Value;

    fn parse_fragment(s: &str) -> Value {
        serde_json::from_str(s.trim_end().trim_end_matches(',')).unwrap()
    }

    fn light_children(v: &Value) -> &Value {
        &v["children"][0]["children"]
    }

    fn child<'a>(children: &'a Value, name: &str) -> &'a Value {
        children
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == name)
            .unwrap_or_else(|| panic!("no child named '{name}'"))
    }

    #[test]
    fn test_pointlight_fields() {
        let light = PointLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: Srgba::WHITE,
            power: 60.0,
        };
        let v = parse_fragment(&write_pointlight("bulb", &light));

        assert_eq!(v["type"], "LIGHTS");
        assert_eq!(v["children"][0]["subType"], "sphere");
        let children = light_children(&v);
        assert_eq!(child(children, "visible")["value"], true);
        assert_eq!(child(children, "intensity")["value"], 60.0);
        assert_eq!(
            child(children, "color")["value"].as_array().unwrap().len(),
            3
        );
        // Host (1, 2, 3) lands at (1, 3, -2).
        let p = child(children, "position")["value"].as_array().unwrap();
        assert!((p[0].as_f64().unwrap() - 1.0).abs() < 1e-5);
        assert!((p[1].as_f64().unwrap() - 3.0).abs() < 1e-5);
        assert!((p[2].as_f64().unwrap() + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_arealight_radiance() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = ExportDirs::new(tmp.path(), "Scene");
        dirs.ensure_object_directory().unwrap();

        let light = AreaLight {
            placement: Placement::IDENTITY,
            size_u: 1.0,
            size_v: 1.0,
            color: Srgba::WHITE,
            power: 1000.0,
            transparent: false,
        };
        let v = parse_fragment(&write_arealight("panel", &light, &dirs).unwrap());
        assert_eq!(v["type"], "IMPORTER");
        assert_eq!(v["filename"], "Scene/panel.obj");

        // power / (size_u * size_v) / 1000 with power 1000 and a unit
        // rectangle gives a radiance of exactly 1.
        let mtl = fs::read_to_string(tmp.path().join("Scene/panel.mtl")).unwrap();
        assert!(mtl.contains("type luminous"));
        assert!(mtl.contains("intensity 1\n"));
        assert!(mtl.contains("transparency 0.0"));

        let obj = fs::read_to_string(tmp.path().join("Scene/panel.obj")).unwrap();
        assert_eq!(obj.matches("\nv ").count(), 4);
        assert!(obj.contains("f 1//1 2//1 3//1 4//1"));
        assert!(obj.contains("mtllib panel.mtl"));
    }

    #[test]
    fn test_arealight_transparent_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = ExportDirs::new(tmp.path(), "Scene");
        dirs.ensure_object_directory().unwrap();

        let light = AreaLight {
            transparent: true,
            ..Default::default()
        };
        write_arealight("panel", &light, &dirs).unwrap();
        let mtl = fs::read_to_string(tmp.path().join("Scene/panel.mtl")).unwrap();
        assert!(mtl.contains("transparency 1.0"));
    }

    #[test]
    fn test_distantlight_fields() {
        let light = DistantLight {
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Srgba::WHITE,
            power: 2.5,
            angle: 0.53,
        };
        let v = parse_fragment(&write_distantlight("sun", &light));
        let children = light_children(&v);
        assert_eq!(v["children"][0]["subType"], "distant");
        assert!(approx_eq(
            child(children, "angularDiameter")["value"].as_f64().unwrap() as f32,
            0.53
        ));
        // Host -Z (downwards) becomes OSPRay -Y.
        let d = child(children, "direction")["value"].as_array().unwrap();
        assert!((d[1].as_f64().unwrap() + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sunsky_straight_up() {
        let sink = MemorySink::new();
        let light = SunSkyLight {
            // Host straight up: +Z, i.e. OSPRay +Y.
            direction: Vec3::Z,
            sun_intensity: 2.0,
            ..Default::default()
        };
        let v = parse_fragment(&write_sunskylight("sky", &light, &sink));
        let children = light_children(&v);

        let elevation = child(children, "elevation")["value"].as_f64().unwrap();
        let azimuth = child(children, "azimuth")["value"].as_f64().unwrap();
        assert!((elevation - 90.0).abs() < 1e-3);
        assert!(azimuth.abs() < 1e-3);
        // intensity = sun_intensity * 0.05
        let intensity = child(children, "intensity")["value"].as_f64().unwrap();
        assert!((intensity - 0.1).abs() < 1e-6);
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_sunsky_warns_on_unsupported_sky_intensity() {
        let sink = MemorySink::new();
        let light = SunSkyLight {
            sky_intensity: 2.0,
            ..Default::default()
        };
        write_sunskylight("sky", &light, &sink);
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].contains("sky intensity"));
    }

    #[test]
    fn test_imagelight_paths_are_asset_relative() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = ExportDirs::new(tmp.path(), "Scene");
        dirs.ensure_object_directory().unwrap();

        let light = ImageLight {
            image: tmp.path().join("textures/env.hdr"),
        };
        let v = parse_fragment(&write_imagelight("env", &light, &dirs).unwrap());
        assert_eq!(v["filename"], "Scene/env.gltf");

        let gltf: Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("Scene/env.gltf")).unwrap(),
        )
        .unwrap();
        let background = &gltf["extensions"]["BIT_scene_background"];
        // Relative to the glTF file's own directory, not the project root.
        assert_eq!(background["background-uri"], "../textures/env.hdr");
        let rot = background["rotation"].as_array().unwrap();
        assert!((rot[1].as_f64().unwrap() - 0.7071067811865475).abs() < 1e-12);
        assert!((rot[3].as_f64().unwrap() - 0.7071067811865475).abs() < 1e-12);
    }
}
