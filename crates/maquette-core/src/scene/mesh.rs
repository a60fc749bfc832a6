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

//! Triangle meshes and their export to Wavefront OBJ.
//!
//! Back-ends that cannot consume geometry inline reference an OBJ file
//! written into the per-project object directory. The companion MTL body is
//! supplied by the back-end's material dispatcher; this module only wraps it
//! with the `newmtl` header and wires `mtllib`/`usemtl` up.

use crate::math::{Placement, Vec2, Vec3};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::SceneError;

/// A triangle mesh with an attached placement.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions, local frame.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, parallel to `positions` when present.
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex texture coordinates, parallel to `positions` when present.
    pub tex_coords: Option<Vec<Vec2>>,
    /// Triangle indices into the vertex arrays, three per face.
    pub indices: Vec<u32>,
    /// Placement of the mesh in the scene, host frame.
    pub placement: Placement,
}

impl Mesh {
    /// Writes this mesh as `<name>.obj` in `object_directory`, with a
    /// companion `<name>.mtl` holding `mtl_content` as its single material.
    ///
    /// Returns the path of the OBJ file.
    pub fn write_obj_file(
        &self,
        name: &str,
        object_directory: &Path,
        mtl_content: &str,
    ) -> Result<PathBuf, SceneError> {
        let mtl_path = object_directory.join(format!("{name}.mtl"));
        let obj_path = object_directory.join(format!("{name}.obj"));

        let mtl = format!("# Created by Maquette\nnewmtl material\n{mtl_content}\n");
        fs::write(&mtl_path, mtl).map_err(|source| SceneError::Io {
            path: mtl_path.clone(),
            source,
        })?;

        let mut obj = String::from("# Created by Maquette\n");
        let _ = writeln!(obj, "mtllib {name}.mtl");
        let _ = writeln!(obj, "o {name}");
        for p in &self.positions {
            let _ = writeln!(obj, "v {} {} {}", p.x, p.y, p.z);
        }
        if let Some(tex_coords) = &self.tex_coords {
            for t in tex_coords {
                let _ = writeln!(obj, "vt {} {}", t.x, t.y);
            }
        }
        if let Some(normals) = &self.normals {
            for n in normals {
                let _ = writeln!(obj, "vn {} {} {}", n.x, n.y, n.z);
            }
        }
        obj.push_str("usemtl material\n");
        for face in self.indices.chunks_exact(3) {
            obj.push('f');
            for &index in face {
                // OBJ indices are 1-based; vertex, texture and normal arrays
                // are parallel here, so one index serves all three slots.
                let i = index + 1;
                match (&self.tex_coords, &self.normals) {
                    (Some(_), Some(_)) => {
                        let _ = write!(obj, " {i}/{i}/{i}");
                    }
                    (Some(_), None) => {
                        let _ = write!(obj, " {i}/{i}");
                    }
                    (None, Some(_)) => {
                        let _ = write!(obj, " {i}//{i}");
                    }
                    (None, None) => {
                        let _ = write!(obj, " {i}");
                    }
                }
            }
            obj.push('\n');
        }
        fs::write(&obj_path, obj).map_err(|source| SceneError::Io {
            path: obj_path.clone(),
            source,
        })?;

        Ok(obj_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: Some(vec![Vec3::Z; 4]),
            tex_coords: None,
            indices: vec![0, 1, 2, 0, 2, 3],
            placement: Placement::IDENTITY,
        }
    }

    #[test]
    fn test_write_obj_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let obj_path = quad()
            .write_obj_file("panel", dir.path(), "type principled\nbaseColor 1 0 0")
            .unwrap();

        let obj = fs::read_to_string(&obj_path).unwrap();
        assert!(obj.contains("mtllib panel.mtl"));
        assert!(obj.contains("o panel"));
        assert!(obj.contains("usemtl material"));
        assert_eq!(obj.matches("\nv ").count(), 4);
        assert_eq!(obj.matches("\nf ").count(), 2);
        // Normals only: the v//n face format.
        assert!(obj.contains("f 1//1 2//2 3//3"));

        let mtl = fs::read_to_string(dir.path().join("panel.mtl")).unwrap();
        assert!(mtl.starts_with("# Created by Maquette\nnewmtl material\n"));
        assert!(mtl.contains("type principled"));
    }
}
