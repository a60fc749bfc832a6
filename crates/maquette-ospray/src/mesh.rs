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

//! The geometry writer: one OBJ file plus one importer fragment per mesh.

use crate::coords::convert_placement;
use crate::error::OsprayError;
use crate::fields::OspraySdl;
use crate::fragment;
use crate::material::write_material;
use crate::objfile::unicode_escape;
use maquette_core::diag::DiagnosticSink;
use maquette_core::material::ShaderSpec;
use maquette_core::project::ExportDirs;
use maquette_core::scene::Mesh;
use serde_json::json;

/// Writes `mesh` as an OBJ file and returns the SDL fragment referencing it.
///
/// The mesh placement, composed with the frame conversion, is decomposed
/// into translation / rotation / scale on a nested transform node. The
/// `_importer` and `_rootXfm` node names derive from the OBJ base name and
/// must stay exactly as produced: OSPRay's importer resolves them by name.
pub fn write_mesh(
    name: &str,
    mesh: &Mesh,
    material: &ShaderSpec,
    dirs: &ExportDirs,
    sink: &dyn DiagnosticSink,
) -> Result<String, OsprayError> {
    // Material values, formatted by this back-end's callbacks.
    let matval = material.material_values(name, &OspraySdl, dirs, sink);

    // The OBJ file, with the material inlined as its MTL body.
    let mtl_content = write_material(name, &matval, sink);
    let objfile = mesh.write_obj_file(name, &dirs.object_directory, &mtl_content)?;

    // Placement in OSPRay's frame.
    let osp_placement = convert_placement(mesh.placement);
    let translation = osp_placement.translation();
    let rotation = osp_placement.rotation();
    let scale = osp_placement.scale_vector();

    let stem = objfile
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = unicode_escape(&stem);
    let nodename = format!("{stem}_importer");
    let transform_name = format!("{stem}_rootXfm");

    let snippet = json!({
        "name": nodename,
        "type": "IMPORTER",
        "filename": objfile.to_string_lossy(),
        "children": [
            {
                "name": transform_name,
                "type": "TRANSFORM",
                "subType": "transform",
                "value": {
                    "linear": {
                        "x": [1.0, 0.0, 0.0],
                        "y": [0.0, 1.0, 0.0],
                        "z": [0.0, 0.0, 1.0]
                    },
                    "affine": [0.0, 0.0, 0.0]
                },
                "children": [
                    {
                        "name": "translation",
                        "type": "PARAMETER",
                        "subType": "vec3f",
                        "sgOnly": false,
                        "value": [translation.x, translation.y, translation.z]
                    },
                    {
                        "name": "rotation",
                        "type": "PARAMETER",
                        "subType": "quaternionf",
                        "sgOnly": false,
                        "value": {
                            "i": rotation.x,
                            "j": rotation.y,
                            "k": rotation.z,
                            "r": rotation.w
                        }
                    },
                    {
                        "name": "scale",
                        "type": "PARAMETER",
                        "subType": "vec3f",
                        "sgOnly": false,
                        "value": [scale.x, scale.y, scale.z]
                    }
                ]
            }
        ]
    });
    Ok(fragment(&snippet))
}
