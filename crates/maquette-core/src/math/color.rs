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

//! Color types and the sRGB <-> linear transfer functions.
//!
//! Colors authored in the host document are sRGB ([`Srgba`]); every external
//! renderer this workbench drives expects linear radiometric values
//! ([`LinearRgba`]), so back-ends convert at the moment a color is written
//! out, never earlier.

/// Converts an sRGB component to linear space.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts a linear component to sRGB space.
#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// A color in sRGB space, as stored in the host document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgba {
    /// The red component, in `[0, 1]`.
    pub r: f32,
    /// The green component, in `[0, 1]`.
    pub g: f32,
    /// The blue component, in `[0, 1]`.
    pub b: f32,
    /// The alpha component, in `[0, 1]`.
    pub a: f32,
}

impl Srgba {
    /// An opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// An opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates a new color from the given components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Converts to linear space, preserving alpha.
    #[inline]
    pub fn to_linear(&self) -> LinearRgba {
        LinearRgba {
            r: srgb_to_linear(self.r),
            g: srgb_to_linear(self.g),
            b: srgb_to_linear(self.b),
            a: self.a,
        }
    }
}

impl Default for Srgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A color in linear RGB space, the space renderers compute in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgba {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha component.
    pub a: f32,
}

impl LinearRgba {
    /// An opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Creates a new color from the given components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Converts back to sRGB components.
    #[inline]
    pub fn to_srgb(&self) -> Srgba {
        Srgba {
            r: linear_to_srgb(self.r),
            g: linear_to_srgb(self.g),
            b: linear_to_srgb(self.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_black_and_white_are_fixed_points() {
        let w = Srgba::WHITE.to_linear();
        assert!(approx_eq(w.r, 1.0) && approx_eq(w.g, 1.0) && approx_eq(w.b, 1.0));
        let b = Srgba::BLACK.to_linear();
        assert!(approx_eq(b.r, 0.0) && approx_eq(b.g, 0.0) && approx_eq(b.b, 0.0));
    }

    #[test]
    fn test_midtone_is_darkened() {
        // sRGB 0.5 sits around 0.214 in linear space.
        let c = Srgba::rgb(0.5, 0.5, 0.5).to_linear();
        approx::assert_abs_diff_eq!(c.r, 0.2140411, epsilon = 1e-4);
    }

    #[test]
    fn test_round_trip() {
        let c = Srgba::new(0.25, 0.5, 0.75, 0.5);
        let back = c.to_linear().to_srgb();
        assert!(approx_eq(c.r, back.r));
        assert!(approx_eq(c.g, back.g));
        assert!(approx_eq(c.b, back.b));
        assert!(approx_eq(c.a, back.a));
    }
}
