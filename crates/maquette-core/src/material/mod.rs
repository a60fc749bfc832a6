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

//! The material contract between the render pipeline and its back-ends.
//!
//! Materials are described by a [`ShaderSpec`]: an abstract shader type name
//! ("Disney", "Glass", ...) plus an ordered list of typed properties. A
//! back-end never walks that list itself. Instead it implements the three
//! [`SdlFormat`] callbacks, and the pipeline evaluates the spec into a
//! [`MaterialValues`] bundle of pre-formatted strings the back-end's material
//! templates then assemble. This keeps renderer syntax entirely on the
//! back-end side and property iteration entirely on this side.

mod values;

pub use values::MaterialValues;

use crate::diag::DiagnosticSink;
use crate::math::Srgba;
use crate::project::ExportDirs;
use std::path::PathBuf;

/// The type of a shader property, as seen by the low-level formatters.
///
/// A back-end receiving a kind it has no syntax for in a given position must
/// treat it as a contract violation (the host never produces it there), not
/// as user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// An RGB color.
    Rgb,
    /// An RGBA color.
    Rgba,
    /// A scalar.
    Float,
    /// A verbatim string.
    Str,
    /// A node reference, expanded elsewhere.
    Node,
    /// A texture slot with no meaningful scalar fallback (e.g. normal maps).
    TexOnly,
    /// A texture slot whose in-line reference is a strength scalar.
    TexScalar,
}

/// The value carried by a shader property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A scalar value.
    Float(f32),
    /// An RGB color (alpha ignored).
    Rgb(Srgba),
    /// An RGBA color.
    Rgba(Srgba),
    /// A verbatim string.
    Str(String),
    /// A texture bound to this property.
    Texture(TextureSpec),
    /// A node reference.
    Node,
}

/// A texture bound to a shader property.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSpec {
    /// Path of the image file on disk.
    pub file: PathBuf,
    /// Uniform UV scale.
    pub scale: f32,
    /// UV rotation, in degrees.
    pub rotation: f32,
    /// UV translation along U.
    pub translation_u: f32,
    /// UV translation along V.
    pub translation_v: f32,
    /// Strength factor, used by normal/bump slots.
    pub factor: f32,
}

impl Default for TextureSpec {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            scale: 1.0,
            rotation: 0.0,
            translation_u: 0.0,
            translation_v: 0.0,
            factor: 1.0,
        }
    }
}

/// One named, typed property of a shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProperty {
    /// The property name, lowercase ("basecolor", "roughness", ...).
    pub name: String,
    /// The property type.
    pub kind: PropertyKind,
    /// The property value.
    pub value: PropertyValue,
}

impl ShaderProperty {
    /// Convenience constructor.
    pub fn new(name: &str, kind: PropertyKind, value: PropertyValue) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value,
        }
    }

    /// Whether this property carries a texture.
    pub fn is_texture(&self) -> bool {
        matches!(self.value, PropertyValue::Texture(_))
    }
}

/// The two sub-shaders of a blended ("Mixed") material.
///
/// Sub-shader type names are lowercase (`glass` / `diffuse`); the per-field
/// rename tables of the back-ends key on them.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedSpec {
    /// Blend factor: 0.0 is fully diffuse, 1.0 fully glass.
    pub transparency: f32,
    /// The glass-like sub-shader.
    pub glass: Box<ShaderSpec>,
    /// The diffuse-like sub-shader.
    pub diffuse: Box<ShaderSpec>,
}

/// An abstract material description, independent of any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSpec {
    /// The abstract shader type name ("Disney", "Glass", "Diffuse", ...).
    pub shadertype: String,
    /// The color to fall back to when a back-end cannot use the shader.
    pub default_color: Srgba,
    /// The shader properties, in declaration order.
    pub properties: Vec<ShaderProperty>,
    /// Sub-shaders, present only for the "Mixed" shader type.
    pub mixed: Option<MixedSpec>,
    /// Pre-rendered SDL text, present only for the "Passthrough" type.
    pub passthrough: Option<String>,
}

impl ShaderSpec {
    /// Creates a spec with no properties.
    pub fn new(shadertype: &str, default_color: Srgba) -> Self {
        Self {
            shadertype: shadertype.to_string(),
            default_color,
            properties: Vec::new(),
            mixed: None,
            passthrough: None,
        }
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&ShaderProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Everything a formatting callback may need about one property.
#[derive(Clone, Copy)]
pub struct PropertyContext<'a> {
    /// Name of the object whose material is being formatted.
    pub objname: &'a str,
    /// Shader type name the property belongs to.
    pub shadertype: &'a str,
    /// Name of the property.
    pub propname: &'a str,
    /// Type of the property.
    pub kind: PropertyKind,
    /// Value of the property.
    pub value: &'a PropertyValue,
    /// The owning shader, for sibling-property lookups.
    pub shader: &'a ShaderSpec,
    /// Export directories, for relative texture paths.
    pub dirs: &'a ExportDirs,
}

/// The formatting callbacks a renderer back-end provides.
///
/// The pipeline calls these once per property while evaluating a
/// [`ShaderSpec`] into [`MaterialValues`]; the back-end's material templates
/// then pick the results up by property name.
pub trait SdlFormat {
    /// Formats the out-of-line description of a texture-bound property.
    ///
    /// Returns the property name and the texture description (empty when the
    /// back-end cannot texture-map the property).
    fn write_texture(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> (String, String);

    /// Formats a plain property value.
    fn write_value(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> String;

    /// Formats the in-line reference of a texture-bound property.
    fn write_texref(&self, ctx: &PropertyContext, sink: &dyn DiagnosticSink) -> String;
}
