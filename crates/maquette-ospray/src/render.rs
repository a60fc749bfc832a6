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

//! Render invocation: scene post-processing and command assembly.
//!
//! Before handing the scene file to OSPRay Studio, two rewrites are
//! required for it to load correctly:
//!
//! * all camera nodes but one are removed, and the surviving one is moved in
//!   front of the other world children (the importer fails otherwise);
//! * light groups scattered under `world` are flattened into the lights
//!   manager node, the only place the renderer looks for lights.
//!
//! OSPRay also renames the image it writes, so the actual output path is
//! reconstructed here rather than trusted from the request.

use crate::error::OsprayError;
use maquette_core::diag::DiagnosticSink;
use maquette_core::prefs::Preferences;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A ready-to-run renderer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// The shell command to start the renderer.
    pub command: String,
    /// The image file the renderer will actually produce.
    pub output_image: PathBuf,
}

/// Post-processes the scene file and builds the renderer command.
///
/// Returns `Ok(None)` when no renderer path is configured; the problem is
/// reported on `sink` and there is nothing to run.
#[allow(clippy::too_many_arguments)]
pub fn render(
    prefs: &Preferences,
    cache_directory: &Path,
    input_file: &Path,
    output_file: Option<&Path>,
    width: u32,
    height: u32,
    batch: bool,
    spp: u32,
    denoise: bool,
    sink: &dyn DiagnosticSink,
) -> Result<Option<RenderJob>, OsprayError> {
    // Read the scene description back as a JSON tree.
    let text = fs::read_to_string(input_file).map_err(|source| OsprayError::Io {
        path: input_file.to_path_buf(),
        source,
    })?;
    let mut scene_graph: Value = serde_json::from_str(&text)?;

    // Keep only the last camera.
    keep_one_camera(&mut scene_graph)?;

    // Merge light groups into the lights manager.
    merge_light_groups(&mut scene_graph)?;

    // Write the reformatted scene description back.
    let text = serde_json::to_string_pretty(&scene_graph)?;
    fs::write(input_file, text).map_err(|source| OsprayError::Io {
        path: input_file.to_path_buf(),
        source,
    })?;

    // OSPRay renames the output file when writing: ask it to write a known
    // stem and reconstruct the name it will actually use.
    let outfile_for_osp = cache_directory.join("ospray_out");
    let suffix = if batch {
        ".Camera_1.00000.png"
    } else {
        ".00000.png"
    };
    let outfile_actual = PathBuf::from(format!("{}{suffix}", outfile_for_osp.display()));

    // A stale output from a previous run would make OSPRay pick yet another
    // name; absence is not an error.
    if let Err(err) = fs::remove_file(&outfile_actual) {
        if err.kind() != std::io::ErrorKind::NotFound {
            return Err(OsprayError::Io {
                path: outfile_actual,
                source: err,
            });
        }
    }

    // Command line arguments.
    let mut prefix = prefs.get_string("Prefix", "");
    if !prefix.is_empty() {
        prefix.push(' ');
    }
    let rpath = prefs.get_string("OspPath", "");

    let mut args = String::new();
    if batch {
        args.push_str("\"batch\" ");
        args.push_str(" --camera 1 ");
    }
    args.push_str(&prefs.get_string("OspParameters", ""));
    args.push_str(&format!(" --resolution {width}x{height} "));
    if output_file.is_some() {
        args.push_str(&format!("  --image \"{}\"", outfile_for_osp.display()));
        if !batch {
            args.push_str("  --saveImageOnExit");
        }
    }
    if spp > 0 {
        args.push_str(&format!("  --accumLimit {spp} --spp 1 "));
    }
    if denoise {
        args.push_str(" --denoiser ");
        if spp > 0 {
            args.push_str(" --denoiseFinalFrame ");
        }
    }

    if rpath.is_empty() {
        sink.error(
            "Unable to locate renderer executable. Please set the correct path in \
             Edit -> Preferences -> Render",
        );
        return Ok(None);
    }
    let rpath = enclose_rpath(&rpath);

    let command = format!("{prefix}{rpath} {args} \"{}\"", input_file.display());
    Ok(Some(RenderJob {
        command,
        output_image: outfile_actual,
    }))
}

/// Builds the command line checking the renderer settings.
pub fn test_cmdline(prefs: &Preferences) -> Vec<String> {
    vec![prefs.get_string("OspPath", ""), "--help".to_string()]
}

/// Encloses a renderer path in double quotes, unless already quoted.
fn enclose_rpath(rpath: &str) -> String {
    let first = rpath.chars().next();
    let last = rpath.chars().last();
    if rpath.len() >= 2
        && ((first == Some('"') && last == Some('"'))
            || (first == Some('\'') && last == Some('\'')))
    {
        rpath.to_string()
    } else {
        format!("\"{rpath}\"")
    }
}

fn world_children<'a>(scene_graph: &'a mut Value) -> Result<&'a mut Vec<Value>, OsprayError> {
    scene_graph
        .get_mut("world")
        .and_then(|w| w.get_mut("children"))
        .and_then(Value::as_array_mut)
        .ok_or(OsprayError::MissingNode("world"))
}

/// Keeps only the last camera node and moves it in front of the world
/// children, then points the scene's camera descriptor at it.
fn keep_one_camera(scene_graph: &mut Value) -> Result<(), OsprayError> {
    let children = world_children(scene_graph)?;

    // Collect camera-tagged nodes, in reverse order.
    let mut cameras = Vec::new();
    let mut index = children.len();
    while index > 0 {
        index -= 1;
        let is_camera =
            children[index].get("freecadtype").and_then(Value::as_str) == Some("camera");
        if is_camera {
            cameras.push(children.remove(index));
        }
    }
    // The first one found in reverse order is the last one written; the
    // importer wants the active camera before every other world child.
    if let Some(camera) = cameras.into_iter().next() {
        children.insert(0, camera);
    }

    scene_graph["camera"] = json!({
        "cameraIdx": 1,
        "cameraToWorld": {
            "affine": [0.0, 0.0, 0.0],
            "linear": {
                "x": [1.0, 0.0, 0.0],
                "y": [0.0, 1.0, 0.0],
                "z": [0.0, 0.0, 1.0]
            }
        }
    });
    Ok(())
}

/// Re-parents the children of every `LIGHTS` group under the lights manager;
/// OSPRay only recognizes lights placed there.
fn merge_light_groups(scene_graph: &mut Value) -> Result<(), OsprayError> {
    let children = world_children(scene_graph)?;

    let is_lights =
        |c: &Value| c.get("type").and_then(Value::as_str) == Some("LIGHTS");

    // Stable sort: light groups last, everything else keeps its order.
    children.sort_by_key(is_lights);

    let mut lights = Vec::new();
    while children.last().map(&is_lights).unwrap_or(false) {
        if let Some(mut group) = children.pop() {
            if let Some(group_children) =
                group.get_mut("children").and_then(Value::as_array_mut)
            {
                lights.append(group_children);
            }
        }
    }

    let manager_children = scene_graph
        .get_mut("lightsManager")
        .and_then(|m| m.get_mut("children"))
        .and_then(Value::as_array_mut)
        .ok_or(OsprayError::MissingNode("lightsManager"))?;
    manager_children.extend(lights);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maquette_core::diag::MemorySink;

    fn camera_node(name: &str) -> Value {
        json!({"name": name, "type": "IMPORTER", "freecadtype": "camera"})
    }

    fn light_group(light_names: &[&str]) -> Value {
        let children: Vec<Value> = light_names
            .iter()
            .map(|n| json!({"name": n, "type": "LIGHT"}))
            .collect();
        json!({"name": "lights", "type": "LIGHTS", "children": children})
    }

    fn scene(world_children: Vec<Value>) -> Value {
        json!({
            "world": {"children": world_children},
            "lightsManager": {"children": []}
        })
    }

    #[test]
    fn test_keep_one_camera() {
        let mut graph = scene(vec![
            json!({"name": "mesh1", "type": "IMPORTER"}),
            camera_node("cam1"),
            json!({"name": "mesh2", "type": "IMPORTER"}),
            camera_node("cam2"),
            camera_node("cam3"),
        ]);
        keep_one_camera(&mut graph).unwrap();

        let children = graph["world"]["children"].as_array().unwrap();
        let cameras: Vec<&Value> = children
            .iter()
            .filter(|c| c["freecadtype"] == "camera")
            .collect();
        // Exactly one camera remains: the last one, now in front.
        assert_eq!(cameras.len(), 1);
        assert_eq!(children[0]["name"], "cam3");
        assert_eq!(graph["camera"]["cameraIdx"], 1);
    }

    #[test]
    fn test_keep_one_camera_without_cameras() {
        let mut graph = scene(vec![json!({"name": "mesh", "type": "IMPORTER"})]);
        keep_one_camera(&mut graph).unwrap();
        assert_eq!(graph["world"]["children"].as_array().unwrap().len(), 1);
        assert_eq!(graph["camera"]["cameraIdx"], 1);
    }

    #[test]
    fn test_merge_light_groups() {
        let mut graph = scene(vec![
            light_group(&["key"]),
            json!({"name": "mesh", "type": "IMPORTER"}),
            light_group(&["fill", "rim"]),
        ]);
        merge_light_groups(&mut graph).unwrap();

        let children = graph["world"]["children"].as_array().unwrap();
        // No LIGHTS node remains under world.
        assert!(children.iter().all(|c| c["type"] != "LIGHTS"));
        assert_eq!(children[0]["name"], "mesh");

        // All lights ended up under the lights manager.
        let manager = graph["lightsManager"]["children"].as_array().unwrap();
        let names: Vec<&str> = manager.iter().map(|l| l["name"].as_str().unwrap()).collect();
        assert_eq!(manager.len(), 3);
        assert!(names.contains(&"key"));
        assert!(names.contains(&"fill"));
        assert!(names.contains(&"rim"));
    }

    #[test]
    fn test_missing_world_is_an_error() {
        let mut graph = json!({"lightsManager": {"children": []}});
        assert!(matches!(
            keep_one_camera(&mut graph),
            Err(OsprayError::MissingNode("world"))
        ));
    }

    fn write_scene_file(dir: &Path) -> PathBuf {
        let input = dir.join("scene.sg");
        let graph = scene(vec![camera_node("cam"), light_group(&["key"])]);
        fs::write(&input, serde_json::to_string_pretty(&graph).unwrap()).unwrap();
        input
    }

    #[test]
    fn test_render_without_renderer_path() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_scene_file(tmp.path());
        let sink = MemorySink::new();

        let job = render(
            &Preferences::new(),
            tmp.path(),
            &input,
            Some(Path::new("/tmp/out.png")),
            800,
            600,
            false,
            32,
            false,
            &sink,
        )
        .unwrap();
        assert!(job.is_none());
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].contains("renderer executable"));
    }

    #[test]
    fn test_render_batch_output_path_and_command() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_scene_file(tmp.path());
        let sink = MemorySink::new();
        let mut prefs = Preferences::new();
        prefs.set_string("OspPath", "/opt/ospray/ospStudio");

        let job = render(
            &prefs,
            tmp.path(),
            &input,
            Some(Path::new("/tmp/out.png")),
            1920,
            1080,
            true,
            64,
            true,
            &sink,
        )
        .unwrap()
        .expect("command expected");

        assert_eq!(
            job.output_image,
            tmp.path().join("ospray_out.Camera_1.00000.png")
        );
        assert!(job.command.starts_with("\"/opt/ospray/ospStudio\""));
        assert!(job.command.contains("\"batch\""));
        assert!(job.command.contains("--camera 1"));
        assert!(job.command.contains("--resolution 1920x1080"));
        assert!(job.command.contains("--accumLimit 64 --spp 1"));
        assert!(job.command.contains("--denoiser"));
        assert!(job.command.contains("--denoiseFinalFrame"));
        assert!(job.command.ends_with(&format!("\"{}\"", input.display())));

        // The scene file was rewritten with the post-processing applied.
        let rewritten: Value =
            serde_json::from_str(&fs::read_to_string(&input).unwrap()).unwrap();
        assert_eq!(rewritten["camera"]["cameraIdx"], 1);
        assert_eq!(
            rewritten["lightsManager"]["children"].as_array().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_render_interactive_output_path() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_scene_file(tmp.path());
        let sink = MemorySink::new();
        let mut prefs = Preferences::new();
        prefs.set_string("OspPath", "/opt/ospray/ospStudio");

        let job = render(
            &prefs, tmp.path(), &input, None, 800, 600, false, 0, false, &sink,
        )
        .unwrap()
        .expect("command expected");

        assert_eq!(job.output_image, tmp.path().join("ospray_out.00000.png"));
        // No requested output file: no --image, no --saveImageOnExit.
        assert!(!job.command.contains("--image"));
        assert!(!job.command.contains("--saveImageOnExit"));
        assert!(!job.command.contains("--accumLimit"));
    }

    #[test]
    fn test_prefix_and_quoted_rpath() {
        assert_eq!(enclose_rpath("/usr/bin/osp"), "\"/usr/bin/osp\"");
        assert_eq!(enclose_rpath("\"/usr/bin/osp\""), "\"/usr/bin/osp\"");
        assert_eq!(enclose_rpath("'/usr/bin/osp'"), "'/usr/bin/osp'");
    }

    #[test]
    fn test_test_cmdline() {
        let mut prefs = Preferences::new();
        prefs.set_string("OspPath", "/opt/ospray/ospStudio");
        assert_eq!(
            test_cmdline(&prefs),
            vec!["/opt/ospray/ospStudio".to_string(), "--help".to_string()]
        );
    }
}
