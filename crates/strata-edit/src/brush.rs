//! Height brushes: localized raise, lower, smooth and flatten edits.

use std::fmt;
use std::str::FromStr;

use strata_heightfield::HeightField;

use crate::footprint::Footprint;

/// Smallest accepted brush radius, in world units.
pub const MIN_RADIUS: f32 = 0.1;

/// Per-application height delta for raise/lower at full strength and falloff.
const RAISE_STEP: f32 = 0.1;

/// What a brush does to the heights it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushKind {
    /// Add height.
    #[default]
    Raise,
    /// Remove height.
    Lower,
    /// Blend toward the 3×3 neighborhood average.
    Smooth,
    /// Blend toward a target height.
    Flatten,
}

/// Shape of the influence curve from center (1) to rim (0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Falloff {
    /// `t`
    Linear,
    /// Smoothstep, `t²(3 − 2t)`.
    #[default]
    Smooth,
    /// `t³`
    Sharp,
}

impl Falloff {
    /// Shape a linear falloff `t` in `[0, 1]`.
    pub fn shape(self, t: f32) -> f32 {
        match self {
            Falloff::Linear => t,
            Falloff::Smooth => t * t * (3.0 - 2.0 * t),
            Falloff::Sharp => t * t * t,
        }
    }
}

/// Unknown brush or falloff name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what} `{name}`")]
pub struct ParseBrushError {
    what: &'static str,
    name: String,
}

impl BrushKind {
    /// Lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Raise => "raise",
            BrushKind::Lower => "lower",
            BrushKind::Smooth => "smooth",
            BrushKind::Flatten => "flatten",
        }
    }
}

impl FromStr for BrushKind {
    type Err = ParseBrushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raise" => Ok(BrushKind::Raise),
            "lower" => Ok(BrushKind::Lower),
            "smooth" => Ok(BrushKind::Smooth),
            "flatten" => Ok(BrushKind::Flatten),
            _ => Err(ParseBrushError {
                what: "brush kind",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Falloff {
    type Err = ParseBrushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Falloff::Linear),
            "smooth" => Ok(Falloff::Smooth),
            "sharp" => Ok(Falloff::Sharp),
            _ => Err(ParseBrushError {
                what: "falloff",
                name: s.to_string(),
            }),
        }
    }
}

/// Brush settings. Holds no reference to the field it edits.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightBrush {
    kind: BrushKind,
    radius: f32,
    strength: f32,
    falloff: Falloff,
    target_height: f32,
}

impl Default for HeightBrush {
    fn default() -> Self {
        Self {
            kind: BrushKind::Raise,
            radius: 5.0,
            strength: 0.5,
            falloff: Falloff::Smooth,
            target_height: 0.0,
        }
    }
}

impl HeightBrush {
    /// Create a brush of `kind` with default settings.
    pub fn new(kind: BrushKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Builder form of [`HeightBrush::set_radius`].
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.set_radius(radius);
        self
    }

    /// Builder form of [`HeightBrush::set_strength`].
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.set_strength(strength);
        self
    }

    /// Builder form of [`HeightBrush::set_falloff`].
    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Builder form of [`HeightBrush::set_target_height`].
    pub fn with_target_height(mut self, target_height: f32) -> Self {
        self.target_height = target_height;
        self
    }

    /// The current operation.
    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: BrushKind) {
        self.kind = kind;
    }

    /// Radius in world units.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius, clamped to at least [`MIN_RADIUS`].
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(MIN_RADIUS);
    }

    /// Strength in `0.0..=1.0`.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Set the strength, clamped to `[0, 1]`.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.clamp(0.0, 1.0);
    }

    /// Edge attenuation curve.
    pub fn falloff(&self) -> Falloff {
        self.falloff
    }

    pub fn set_falloff(&mut self, falloff: Falloff) {
        self.falloff = falloff;
    }

    /// Height that [`BrushKind::Flatten`] pulls toward.
    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    pub fn set_target_height(&mut self, target_height: f32) {
        self.target_height = target_height;
    }

    /// Apply one stamp centered at `(world_x, world_z)`.
    ///
    /// Cells outside the field are skipped. Smoothing reads neighbors that
    /// earlier cells of the same stamp may already have changed.
    pub fn apply(&self, field: &mut HeightField, world_x: f32, world_z: f32) {
        let footprint = Footprint::new(field, world_x, world_z, self.radius);
        let mut touched = 0usize;

        for cell in footprint.cells() {
            let t = 1.0 - cell.distance.min(1.0);
            let weight = self.strength * self.falloff.shape(t);
            if weight <= 0.0 {
                continue;
            }

            let current = field.height_at(cell.x, cell.z);
            let updated = match self.kind {
                BrushKind::Raise => current + weight * RAISE_STEP,
                BrushKind::Lower => current - weight * RAISE_STEP,
                BrushKind::Smooth => {
                    let average = neighborhood_average(field, cell.x, cell.z);
                    current + (average - current) * weight
                }
                BrushKind::Flatten => current + (self.target_height - current) * weight,
            };
            field.set_height(cell.x, cell.z, updated);
            touched += 1;
        }

        tracing::trace!(
            kind = %self.kind,
            world_x,
            world_z,
            radius = self.radius,
            touched,
            "height brush applied"
        );
    }
}

/// Mean of the in-bounds cells of the 3×3 block around `(x, z)`.
fn neighborhood_average(field: &HeightField, x: usize, z: usize) -> f32 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for nz in z.saturating_sub(1)..=(z + 1).min(field.depth() - 1) {
        for nx in x.saturating_sub(1)..=(x + 1).min(field.width() - 1) {
            sum += field.height_at(nx, nz);
            count += 1;
        }
    }
    sum / count as f32
}
