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

//! Per-property formatting for OSPRay's line-oriented material syntax.
//!
//! [`OspraySdl`] implements the three [`SdlFormat`] callbacks. A static
//! rename table translates abstract property names into OSPRay material
//! fields; properties OSPRay cannot express are dropped with a warning.

use crate::objfile::relative_path;
use maquette_core::diag::DiagnosticSink;
use maquette_core::material::{PropertyContext, PropertyKind, PropertyValue, SdlFormat};

/// Field renames from abstract shader properties to OSPRay material fields,
/// keyed by (shader type, property name). Only non-trivial renames are
/// listed: an absent pair keeps its name. `None` drops the property
/// entirely; `Some("")` marks a property consumed by a composite elsewhere.
static FIELD_MAPPING: &[((&str, &str), Option<&str>)] = &[
    (("Diffuse", "color"), Some("baseColor")),
    (("Diffuse", "bump"), None),
    (("Diffuse", "displacement"), None),
    (("Substance_PBR", "basecolor"), Some("baseColor")),
    (("Substance_PBR", "bump"), None),
    (("Disney", "basecolor"), Some("baseColor")),
    (("Disney", "subsurface"), Some("")),
    (("Disney", "speculartint"), Some("")),
    (("Disney", "anisotropic"), Some("anisotropy")),
    (("Disney", "sheentint"), Some("sheenTint")),
    (("Disney", "clearcoat"), Some("coat")),
    (("Disney", "clearcoatgloss"), Some("coatRoughness")),
    (("Disney", "bump"), None),
    (("Disney", "displacement"), None),
    (("Glass", "color"), Some("transmissionColor")),
    (("Glass", "ior"), Some("ior")),
    (("Glass", "bump"), None),
    (("Glass", "displacement"), None),
    (("Carpaint", "basecolor"), Some("baseColor")),
    (("Mixed", "transparency"), Some("transmission")),
    (("Mixed", "diffuse"), Some("")),
    (("Mixed", "shader"), Some("")),
    (("Mixed", "glass"), Some("")),
    (("Mixed", "bump"), None),
    (("Mixed", "displacement"), None),
    (("glass", "color"), Some("transmissionColor")),
    (("diffuse", "color"), Some("baseColor")),
    (("Emission", "power"), Some("intensity")),
    (("Passthrough", "string"), Some("")),
    (("Passthrough", "renderer"), Some("")),
];

/// Properties OSPRay cannot texture-map; a texture bound to one of these is
/// dropped and the scalar default is written instead.
const UNSUPPORTED_TEXTURES: [&str; 6] = [
    "clearcoatgloss",
    "ior",
    "subsurface",
    "speculartint",
    "bump",
    "displacement",
];

/// Resolves the OSPRay field name of a property.
///
/// `None` means the property must be dropped; `Some("")` that it is consumed
/// by a composite and produces no direct output.
fn mapped_field<'a>(shadertype: &str, propname: &'a str) -> Option<&'a str> {
    for ((stype, pname), field) in FIELD_MAPPING {
        if *stype == shadertype && *pname == propname {
            return *field;
        }
    }
    Some(propname)
}

/// Formats a float with 8 significant digits, OSPRay's scalar convention.
pub(crate) fn fmt_sig(v: f32) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return "0.0".to_string();
    }
    let exponent = v.abs().log10().floor() as i32;
    let decimals = (7 - exponent).clamp(0, 30) as usize;
    let s = format!("{v:.decimals$}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0');
    match trimmed.strip_suffix('.') {
        Some(t) => format!("{t}.0"),
        None => trimmed.to_string(),
    }
}

/// The OSPRay property formatters handed to the material evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct OspraySdl;

impl SdlFormat for OspraySdl {
    fn write_texture(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> (String, String) {
        let propname = ctx.propname.to_string();
        let PropertyValue::Texture(tex) = ctx.value else {
            // Only texture-bound properties reach this callback.
            panic!("write_texture called for non-texture property '{propname}'");
        };

        let field = match mapped_field(ctx.shadertype, ctx.propname) {
            None | Some("") => return (propname, String::new()),
            Some(field) => field,
        };
        if UNSUPPORTED_TEXTURES.contains(&ctx.propname) {
            sink.warning(&format!(
                "[Maquette] [Ospray] [{}] Warning: texture for '{}::{}' is not supported by \
                 Ospray. Falling back to default value.",
                ctx.objname, ctx.shadertype, ctx.propname
            ));
            return (propname, String::new());
        }

        let lines = match ctx.kind {
            PropertyKind::Rgb
            | PropertyKind::Float
            | PropertyKind::TexOnly
            | PropertyKind::TexScalar => {
                let filename = relative_path(&tex.file, &ctx.dirs.object_directory);
                let filename = filename.to_string_lossy();
                [
                    format!("# Texture {field}"),
                    format!("map_{field} {filename}"),
                    format!("map_{field}.rotation {}", tex.rotation),
                    format!("map_{field}.scale {0} {0}", tex.scale),
                    format!(
                        "map_{field}.translation {} {}",
                        tex.translation_u, tex.translation_v
                    ),
                ]
                .join("\n")
            }
            PropertyKind::Node => String::new(),
            kind => panic!("texture of kind {kind:?} is not representable ('{propname}')"),
        };
        (propname, lines)
    }

    fn write_value(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> String {
        let field = match mapped_field(ctx.shadertype, ctx.propname) {
            None => {
                sink.warning(&format!(
                    "[Maquette] [Ospray] [{}] Warning: '{}::{}' is not supported by Ospray. \
                     Skipping...",
                    ctx.objname, ctx.shadertype, ctx.propname
                ));
                return String::new();
            }
            Some("") => return String::new(),
            Some(field) => field,
        };

        match ctx.value {
            PropertyValue::Float(val) => {
                let mut val = *val;
                // OSPRay stores coat gloss as a roughness, so invert.
                if ctx.propname == "clearcoatgloss" {
                    val = 1.0 - val;
                }
                // OSPRay principled shows no reflection when metallic is
                // active but specular is zero, so force a nonzero specular.
                if ctx.propname == "specular" && val <= 0.0 {
                    if let Some(metallic) = ctx.shader.property("metallic") {
                        match &metallic.value {
                            PropertyValue::Texture(_) => val = 1.0,
                            PropertyValue::Float(m) if *m != 0.0 => val = *m,
                            _ => {}
                        }
                    }
                }
                format!("{field} {}", fmt_sig(val))
            }
            PropertyValue::Rgb(color) => {
                let lcol = color.to_linear();
                format!(
                    "{field} {} {} {}",
                    fmt_sig(lcol.r),
                    fmt_sig(lcol.g),
                    fmt_sig(lcol.b)
                )
            }
            PropertyValue::Rgba(color) => {
                let lcol = color.to_linear();
                format!(
                    "{field} {} {} {} {}",
                    fmt_sig(lcol.r),
                    fmt_sig(lcol.g),
                    fmt_sig(lcol.b),
                    fmt_sig(lcol.a)
                )
            }
            PropertyValue::Str(s) => format!("{field} {s}"),
            PropertyValue::Node => String::new(),
            PropertyValue::Texture(_) => {
                panic!("write_value called for texture property '{}'", ctx.propname)
            }
        }
    }

    fn write_texref(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> String {
        let field = match mapped_field(ctx.shadertype, ctx.propname) {
            None => {
                sink.warning(&format!(
                    "[Maquette] [Ospray] [{}] Warning: '{}::{}' is not supported by Ospray. \
                     Skipping...",
                    ctx.objname, ctx.shadertype, ctx.propname
                ));
                return String::new();
            }
            Some("") => return String::new(),
            Some(field) => field,
        };
        // These two are dropped as textures; write a usable scalar instead.
        if ctx.propname == "clearcoatgloss" {
            return format!("{field} 1.0");
        }
        if ctx.propname == "ior" {
            return format!("{field} 1.5");
        }

        match ctx.kind {
            PropertyKind::Rgb => format!("{field} 1.0 1.0 1.0"),
            PropertyKind::Float | PropertyKind::Node => format!("{field} 1.0"),
            PropertyKind::Rgba => format!("{field} 1.0 1.0 1.0 1.0"),
            PropertyKind::TexOnly => {
                if ctx.propname == "normal" {
                    format!("{field} 4.0")
                } else {
                    format!("{field} 1.0")
                }
            }
            PropertyKind::TexScalar => {
                let factor = match ctx.value {
                    PropertyValue::Texture(tex) => tex.factor,
                    _ => 1.0,
                };
                format!("{field} {factor}")
            }
            PropertyKind::Str => {
                panic!("texture reference of kind Str is not representable ('{}')", ctx.propname)
            }
        }
    }
}
