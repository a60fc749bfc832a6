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

//! Material templates for OSPRay's MTL-flavoured material syntax.
//!
//! One template per abstract shader type, dispatched by name. Dispatch never
//! fails: an unknown shader type degrades to a flat diffuse material built
//! from the material's default color, with a warning.

use maquette_core::diag::DiagnosticSink;
use maquette_core::material::MaterialValues;
use maquette_core::math::Srgba;

/// The IOR OSPRay's principled material expects for Disney-style shaders.
const DISNEY_IOR: f32 = 1.5;

/// Formats a material in OSPRay's material syntax.
///
/// This function never fails: unrecognized shader types produce a fallback
/// material and a warning on `sink`.
pub fn write_material(name: &str, matval: &MaterialValues, sink: &dyn DiagnosticSink) -> String {
    let snippet = match matval.shadertype() {
        "Passthrough" => write_passthrough(matval),
        "Glass" => write_glass(matval),
        "Disney" => write_disney(matval),
        "Diffuse" => write_diffuse(matval),
        "Mixed" => match write_mixed(matval) {
            Some(snippet) => snippet,
            None => {
                sink.warning(&format!(
                    "'{name}' - Mixed material without sub-materials, using fallback material"
                ));
                return write_fallback(matval.default_color());
            }
        },
        "Carpaint" => write_carpaint(matval),
        "Substance_PBR" => write_pbr(name, matval),
        "Emission" => write_emission(name, matval),
        unknown => {
            sink.warning(&format!(
                "'{name}' - Material '{unknown}' unknown by renderer, using fallback material"
            ));
            return write_fallback(matval.default_color());
        }
    };
    format!("{snippet}{}", matval.write_textures())
}

fn normal_line(matval: &MaterialValues) -> &str {
    if matval.has_normal() {
        matval.get("normal")
    } else {
        ""
    }
}

fn write_passthrough(matval: &MaterialValues) -> String {
    format!("\n# Passthrough\n{}", matval.passthrough().unwrap_or(""))
}

fn write_glass(matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Glass\n\
         type principled\n\
         {ior}\n\
         {color}\n\
         transmission 1\n\
         specular 1\n\
         metallic 0\n\
         diffuse 0\n\
         opacity 1\n\
         {normal}\n",
        ior = matval.get("ior"),
        color = matval.get("color"),
        normal = normal_line(matval),
    )
}

fn write_disney(matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Disney\n\
         type principled\n\
         {basecolor}\n\
         # No subsurface scattering (Ospray limitation)\n\
         {metallic}\n\
         {specular}\n\
         # No specular tint (Ospray limitation)\n\
         {roughness}\n\
         {anisotropic}\n\
         {sheen}\n\
         {sheentint}\n\
         {clearcoat}\n\
         {clearcoatgloss}\n\
         {normal}\n\
         ior {ior}\n\
         coatIor {ior}\n",
        basecolor = matval.get("basecolor"),
        metallic = matval.get("metallic"),
        specular = matval.get("specular"),
        roughness = matval.get("roughness"),
        anisotropic = matval.get("anisotropic"),
        sheen = matval.get("sheen"),
        sheentint = matval.get("sheentint"),
        clearcoat = matval.get("clearcoat"),
        clearcoatgloss = matval.get("clearcoatgloss"),
        normal = normal_line(matval),
        ior = DISNEY_IOR,
    )
}

fn write_pbr(name: &str, matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Pbr ('{name}')\n\
         type principled\n\
         {basecolor}\n\
         # No subsurface scattering (Ospray limitation)\n\
         {metallic}\n\
         {specular}\n\
         {roughness}\n\
         {normal}\n",
        basecolor = matval.get("basecolor"),
        metallic = matval.get("metallic"),
        specular = matval.get("specular"),
        roughness = matval.get("roughness"),
        normal = normal_line(matval),
    )
}

fn write_diffuse(matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Diffuse\n\
         type principled\n\
         {color}\n\
         metallic 0\n\
         specular 0\n\
         diffuse 1\n\
         {normal}\n",
        color = matval.get("color"),
        normal = normal_line(matval),
    )
}

/// Blends the glass and diffuse sub-materials by the transparency factor.
/// Returns `None` when the bundle carries no sub-materials.
fn write_mixed(matval: &MaterialValues) -> Option<String> {
    let submat_g = matval.mixed_submat("glass")?;
    let submat_d = matval.mixed_submat("diffuse")?;
    let transparency = matval.mixed_transparency()?;

    let snippet = format!(
        "\n\
         # Mixed\n\
         type principled\n\
         {dcolor}\n\
         {gior}\n\
         transmission {transparency}\n\
         {gcolor}\n\
         opacity {opacity}\n\
         specular 0.5\n\
         {normal}\n\
         {dtex}{gtex}",
        dcolor = submat_d.get("color"),
        gior = submat_g.get("ior"),
        gcolor = submat_g.get("color"),
        opacity = 1.0 - transparency,
        normal = normal_line(matval),
        dtex = submat_d.write_textures(),
        gtex = submat_g.write_textures(),
    );
    Some(snippet)
}

fn write_carpaint(matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Carpaint\n\
         type carPaint\n\
         {basecolor}\n\
         {normal}\n",
        basecolor = matval.get("basecolor"),
        normal = normal_line(matval),
    )
}

fn write_emission(name: &str, matval: &MaterialValues) -> String {
    format!(
        "\n\
         # Emission ('{name}')\n\
         type luminous\n\
         {color}\n\
         {power}\n\
         transparency 0.0\n",
        color = matval.get("color"),
        power = matval.get("power"),
    )
}

/// The fallback: a flat diffuse material from the default color.
fn write_fallback(color: Srgba) -> String {
    let lcol = color.to_linear();
    let (red, grn, blu) = if [lcol.r, lcol.g, lcol.b].iter().all(|c| c.is_finite()) {
        (
            lcol.r.clamp(0.0, 1.0),
            lcol.g.clamp(0.0, 1.0),
            lcol.b.clamp(0.0, 1.0),
        )
    } else {
        (1.0, 1.0, 1.0)
    };
    format!(
        "\n\
         # Fallback\n\
         type obj\n\
         kd {red} {grn} {blu}\n\
         ns 2\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::OspraySdl;
    use maquette_core::diag::MemorySink;
    use maquette_core::material::{
        MixedSpec, PropertyKind, PropertyValue, ShaderProperty, ShaderSpec,
    };
    use maquette_core::project::ExportDirs;

    fn dirs() -> ExportDirs {
        ExportDirs::new("/tmp/project", "Scene")
    }

    fn evaluate(spec: &ShaderSpec, sink: &MemorySink) -> MaterialValues {
        spec.material_values("obj", &OspraySdl, &dirs(), sink)
    }

    #[test]
    fn test_unknown_shader_type_falls_back() {
        let spec = ShaderSpec::new("Velvet", Srgba::rgb(2.0, -1.0, 0.5));
        let sink = MemorySink::new();
        let matval = evaluate(&spec, &sink);

        let out = write_material("obj", &matval, &sink);
        assert!(out.contains("# Fallback"));
        assert!(out.contains("type obj"));
        assert!(out.contains("ns 2"));
        assert_eq!(sink.warnings().len(), 1);
        // Out-of-range channels are clamped into [0, 1].
        let kd: Vec<f32> = out
            .lines()
            .find(|l| l.starts_with("kd "))
            .unwrap()
            .split_whitespace()
            .skip(1)
            .map(|t| t.parse().unwrap())
            .collect();
        assert!(kd.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_glass_template() {
        let mut spec = ShaderSpec::new("Glass", Srgba::WHITE);
        spec.properties.push(ShaderProperty::new(
            "ior",
            PropertyKind::Float,
            PropertyValue::Float(1.52),
        ));
        spec.properties.push(ShaderProperty::new(
            "color",
            PropertyKind::Rgb,
            PropertyValue::Rgb(Srgba::WHITE),
        ));
        let sink = MemorySink::new();
        let out = write_material("obj", &evaluate(&spec, &sink), &sink);

        assert!(out.contains("type principled"));
        assert!(out.contains("ior 1.52"));
        assert!(out.contains("transmissionColor 1.0 1.0 1.0"));
        assert!(out.contains("transmission 1"));
        assert!(out.contains("opacity 1"));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_emission_power_maps_to_intensity() {
        let mut spec = ShaderSpec::new("Emission", Srgba::WHITE);
        spec.properties.push(ShaderProperty::new(
            "color",
            PropertyKind::Rgb,
            PropertyValue::Rgb(Srgba::WHITE),
        ));
        spec.properties.push(ShaderProperty::new(
            "power",
            PropertyKind::Float,
            PropertyValue::Float(40.0),
        ));
        let sink = MemorySink::new();
        let out = write_material("lamp", &evaluate(&spec, &sink), &sink);

        assert!(out.contains("type luminous"));
        assert!(out.contains("intensity 40"));
        assert!(out.contains("transparency 0.0"));
    }

    #[test]
    fn test_mixed_blends_opacity_and_transmission() {
        let mut glass = ShaderSpec::new("glass", Srgba::WHITE);
        glass.properties.push(ShaderProperty::new(
            "ior",
            PropertyKind::Float,
            PropertyValue::Float(1.5),
        ));
        glass.properties.push(ShaderProperty::new(
            "color",
            PropertyKind::Rgb,
            PropertyValue::Rgb(Srgba::WHITE),
        ));
        let mut diffuse = ShaderSpec::new("diffuse", Srgba::WHITE);
        diffuse.properties.push(ShaderProperty::new(
            "color",
            PropertyKind::Rgb,
            PropertyValue::Rgb(Srgba::rgb(0.0, 0.0, 1.0)),
        ));
        let mut spec = ShaderSpec::new("Mixed", Srgba::WHITE);
        spec.mixed = Some(MixedSpec {
            transparency: 0.25,
            glass: Box::new(glass),
            diffuse: Box::new(diffuse),
        });

        let sink = MemorySink::new();
        let out = write_material("pane", &evaluate(&spec, &sink), &sink);

        assert!(out.contains("transmission 0.25"));
        assert!(out.contains("opacity 0.75"));
        assert!(out.contains("specular 0.5"));
        // The diffuse sub-shader's color, renamed by the lowercase row.
        assert!(out.contains("baseColor 0.0 0.0 1.0"));
        // The glass sub-shader's color.
        assert!(out.contains("transmissionColor 1.0 1.0 1.0"));
    }

    #[test]
    fn test_disney_carries_fixed_ior() {
        let spec = ShaderSpec::new("Disney", Srgba::WHITE);
        let sink = MemorySink::new();
        let out = write_material("obj", &evaluate(&spec, &sink), &sink);
        assert!(out.contains("ior 1.5"));
        assert!(out.contains("coatIor 1.5"));
    }
}
