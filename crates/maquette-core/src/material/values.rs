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

//! Evaluation of a [`ShaderSpec`] into pre-formatted material values.

use super::{PropertyContext, PropertyValue, SdlFormat, ShaderSpec};
use crate::diag::DiagnosticSink;
use crate::math::Srgba;
use crate::project::ExportDirs;
use std::collections::BTreeMap;

/// The evaluated material bundle a back-end's templates consume.
///
/// Every entry is a string already formatted by the back-end's own
/// [`SdlFormat`] callbacks; indexed access never fails, a property that was
/// dropped or never declared reads as the empty string.
#[derive(Debug, Clone, Default)]
pub struct MaterialValues {
    shadertype: String,
    objname: String,
    default_color: Srgba,
    values: BTreeMap<String, String>,
    textures: String,
    has_normal: bool,
    passthrough: Option<String>,
    mixed_transparency: Option<f32>,
    submats: BTreeMap<String, MaterialValues>,
}

impl ShaderSpec {
    /// Evaluates this spec for `objname` with a back-end's formatters.
    ///
    /// Texture-bound properties produce an out-of-line texture description
    /// (accumulated, see [`MaterialValues::write_textures`]) plus an in-line
    /// reference stored under the property name; all other properties store
    /// their formatted value directly. For "Mixed" shaders both sub-shaders
    /// are evaluated as well, under `<objname>_glass` / `<objname>_diffuse`.
    pub fn material_values(
        &self,
        objname: &str,
        format: &dyn SdlFormat,
        dirs: &ExportDirs,
        sink: &dyn DiagnosticSink,
    ) -> MaterialValues {
        let mut values = BTreeMap::new();
        let mut textures = String::new();
        let mut has_normal = false;

        for prop in &self.properties {
            let ctx = PropertyContext {
                objname,
                shadertype: &self.shadertype,
                propname: &prop.name,
                kind: prop.kind,
                value: &prop.value,
                shader: self,
                dirs,
            };
            match &prop.value {
                PropertyValue::Texture(_) => {
                    if prop.name == "normal" {
                        has_normal = true;
                    }
                    let (_, tex) = format.write_texture(&ctx, sink);
                    if !tex.is_empty() {
                        textures.push_str(&tex);
                        textures.push('\n');
                    }
                    values.insert(prop.name.clone(), format.write_texref(&ctx, sink));
                }
                _ => {
                    values.insert(prop.name.clone(), format.write_value(&ctx, sink));
                }
            }
        }

        let mut submats = BTreeMap::new();
        let mixed_transparency = self.mixed.as_ref().map(|mixed| {
            submats.insert(
                "glass".to_string(),
                mixed
                    .glass
                    .material_values(&format!("{objname}_glass"), format, dirs, sink),
            );
            submats.insert(
                "diffuse".to_string(),
                mixed
                    .diffuse
                    .material_values(&format!("{objname}_diffuse"), format, dirs, sink),
            );
            mixed.transparency
        });

        MaterialValues {
            shadertype: self.shadertype.clone(),
            objname: objname.to_string(),
            default_color: self.default_color,
            values,
            textures,
            has_normal,
            passthrough: self.passthrough.clone(),
            mixed_transparency,
            submats,
        }
    }
}

impl MaterialValues {
    /// The abstract shader type name this bundle was evaluated from.
    pub fn shadertype(&self) -> &str {
        &self.shadertype
    }

    /// The object name the bundle was evaluated for.
    pub fn objname(&self) -> &str {
        &self.objname
    }

    /// The formatted value or texture reference of a property.
    ///
    /// Reads as the empty string for dropped or undeclared properties.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// All out-of-line texture descriptions, concatenated.
    pub fn write_textures(&self) -> &str {
        &self.textures
    }

    /// Whether the shader carries a normal map.
    pub fn has_normal(&self) -> bool {
        self.has_normal
    }

    /// The fallback color of the material.
    pub fn default_color(&self) -> Srgba {
        self.default_color
    }

    /// The pre-rendered SDL text of a "Passthrough" material.
    pub fn passthrough(&self) -> Option<&str> {
        self.passthrough.as_deref()
    }

    /// The blend factor of a "Mixed" material.
    pub fn mixed_transparency(&self) -> Option<f32> {
        self.mixed_transparency
    }

    /// A pre-evaluated sub-bundle of a "Mixed" material (`"glass"` or
    /// `"diffuse"`).
    pub fn mixed_submat(&self, kind: &str) -> Option<&MaterialValues> {
        self.submats.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;
    use crate::material::{MixedSpec, PropertyKind, ShaderProperty, TextureSpec};
    use std::path::PathBuf;

    /// A formatter that spells out what it was called with.
    struct EchoFormat;

    impl SdlFormat for EchoFormat {
        fn write_texture(
            &self,
            ctx: &PropertyContext,
            _sink: &dyn DiagnosticSink,
        ) -> (String, String) {
            (ctx.propname.to_string(), format!("tex:{}", ctx.propname))
        }

        fn write_value(&self, ctx: &PropertyContext, _sink: &dyn DiagnosticSink) -> String {
            format!("val:{}:{}", ctx.shadertype, ctx.propname)
        }

        fn write_texref(&self, ctx: &PropertyContext, _sink: &dyn DiagnosticSink) -> String {
            format!("ref:{}", ctx.propname)
        }
    }

    fn dirs() -> ExportDirs {
        ExportDirs::new(PathBuf::from("/tmp/project"), "Scene")
    }

    #[test]
    fn test_plain_and_textured_properties() {
        let mut spec = ShaderSpec::new("Diffuse", Srgba::WHITE);
        spec.properties.push(ShaderProperty::new(
            "color",
            PropertyKind::Rgb,
            PropertyValue::Rgb(Srgba::rgb(1.0, 0.0, 0.0)),
        ));
        spec.properties.push(ShaderProperty::new(
            "normal",
            PropertyKind::TexOnly,
            PropertyValue::Texture(TextureSpec::default()),
        ));

        let sink = MemorySink::new();
        let matval = spec.material_values("box", &EchoFormat, &dirs(), &sink);

        assert_eq!(matval.get("color"), "val:Diffuse:color");
        assert_eq!(matval.get("normal"), "ref:normal");
        assert!(matval.write_textures().contains("tex:normal"));
        assert!(matval.has_normal());
        // Undeclared properties read as empty.
        assert_eq!(matval.get("nonexistent"), "");
    }

    #[test]
    fn test_mixed_evaluates_both_submaterials() {
        let glass = ShaderSpec::new("glass", Srgba::WHITE);
        let diffuse = ShaderSpec::new("diffuse", Srgba::WHITE);
        let mut spec = ShaderSpec::new("Mixed", Srgba::WHITE);
        spec.mixed = Some(MixedSpec {
            transparency: 0.25,
            glass: Box::new(glass),
            diffuse: Box::new(diffuse),
        });

        let sink = MemorySink::new();
        let matval = spec.material_values("pane", &EchoFormat, &dirs(), &sink);

        assert_eq!(matval.mixed_transparency(), Some(0.25));
        assert_eq!(matval.mixed_submat("glass").unwrap().objname(), "pane_glass");
        assert_eq!(
            matval.mixed_submat("diffuse").unwrap().objname(),
            "pane_diffuse"
        );
        assert!(matval.mixed_submat("plastic").is_none());
    }
}
