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

//! # Maquette Core
//!
//! Foundational crate of the Maquette render workbench: math primitives,
//! scene-object descriptors, the material contract between the pipeline and
//! its renderer back-ends, and project-level plumbing (export directories,
//! preferences, template instantiation).
//!
//! Renderer back-ends (e.g. `maquette-ospray`) consume these types and turn
//! them into the scene-description language of one external renderer.

#![warn(missing_docs)]

pub mod diag;
pub mod material;
pub mod math;
pub mod prefs;
pub mod project;
pub mod scene;

pub use diag::{DiagnosticSink, LogSink, MemorySink};
pub use prefs::Preferences;
pub use project::ExportDirs;
