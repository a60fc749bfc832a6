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

//! Object file path derivation and escaping.
//!
//! Every exported object gets one file in the object directory, named after
//! the object. Paths embedded in the scene description are relative to the
//! project directory, with non-ASCII characters escaped: OSPRay's importer
//! chokes on raw non-ASCII bytes in file names.

use maquette_core::project::ExportDirs;
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

/// Computes the absolute path of a new object file, plus the escaped path
/// relative to the project directory for embedding in the scene description.
pub(crate) fn new_object_file_path(
    basename: &str,
    extension: &str,
    dirs: &ExportDirs,
) -> (PathBuf, String) {
    let filename = format!("{basename}.{extension}");
    let abspath = dirs.object_directory.join(filename);
    let relpath = relative_path(&abspath, &dirs.project_directory);
    let escaped = unicode_escape(&relpath.to_string_lossy());
    (abspath, escaped)
}

/// Computes `path` relative to `base`, inserting `..` components as needed.
///
/// Both paths must be either absolute or relative to the same root; no
/// filesystem access is performed.
pub(crate) fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path_comps: Vec<Component> = path.components().collect();
    let base_comps: Vec<Component> = base.components().collect();

    let mut common = 0;
    while common < path_comps.len()
        && common < base_comps.len()
        && path_comps[common] == base_comps[common]
    {
        common += 1;
    }

    let mut out = PathBuf::new();
    for _ in common..base_comps.len() {
        out.push("..");
    }
    for comp in &path_comps[common..] {
        out.push(comp);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Escapes non-ASCII characters as `\xNN` / `\uNNNN` / `\UNNNNNNNN`.
///
/// ASCII printable characters pass through unchanged (backslash itself is
/// doubled, so the result is unambiguous).
pub(crate) fn unicode_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let code = c as u32;
        if c == '\\' {
            out.push_str("\\\\");
        } else if (0x20..0x7f).contains(&code) {
            out.push(c);
        } else if code < 0x100 {
            let _ = write!(out, "\\x{code:02x}");
        } else if code < 0x10000 {
            let _ = write!(out, "\\u{code:04x}");
        } else {
            let _ = write!(out, "\\U{code:08x}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_inside_base() {
        let rel = relative_path(
            Path::new("/tmp/project/Scene/box.obj"),
            Path::new("/tmp/project"),
        );
        assert_eq!(rel, PathBuf::from("Scene/box.obj"));
    }

    #[test]
    fn test_relative_path_outside_base() {
        let rel = relative_path(Path::new("/home/user/env.hdr"), Path::new("/tmp/project"));
        assert_eq!(rel, PathBuf::from("../../home/user/env.hdr"));
    }

    #[test]
    fn test_unicode_escape_ascii_is_untouched() {
        assert_eq!(unicode_escape("Scene/box_01.obj"), "Scene/box_01.obj");
    }

    #[test]
    fn test_unicode_escape_non_ascii() {
        assert_eq!(unicode_escape("béton"), "b\\xe9ton");
        assert_eq!(unicode_escape("光"), "\\u5149");
    }

    #[test]
    fn test_object_file_path_is_project_relative() {
        let dirs = ExportDirs::new("/tmp/project", "Scene");
        let (abs, rel) = new_object_file_path("box", "obj", &dirs);
        assert_eq!(abs, PathBuf::from("/tmp/project/Scene/box.obj"));
        assert_eq!(rel, "Scene/box.obj");
    }
}
