//! Splat painting: per-texel blend weights for up to four texture layers.
//!
//! Weights live in a dense `width × depth × 4` grid owned by the painter.
//! After every edit each touched texel is renormalized so its four channels
//! sum to 1 and each lies in `[0, 1]`.

use strata_heightfield::HeightField;

use crate::footprint::Footprint;

/// Number of splat channels per texel.
pub const MAX_LAYERS: usize = 4;

/// Channel index of a registered layer, in `0..MAX_LAYERS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerIndex(u8);

impl LayerIndex {
    /// Channel index as `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors from layer registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplatError {
    /// All four channels are already assigned.
    #[error("cannot register layer `{name}`: all {MAX_LAYERS} splat channels are in use")]
    CapacityExceeded {
        /// The rejected layer name.
        name: String,
    },

    /// The name is already bound to a channel.
    #[error("layer `{name}` is already registered on channel {}", index.index())]
    DuplicateLayer {
        /// The duplicated name.
        name: String,
        /// Its existing channel.
        index: LayerIndex,
    },
}

/// Fixed-capacity map from layer name to channel.
///
/// Stores names only; texture data is resolved elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerRegistry {
    names: [Option<String>; MAX_LAYERS],
}

impl LayerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the next free channel.
    ///
    /// # Errors
    ///
    /// [`SplatError::CapacityExceeded`] once four layers exist,
    /// [`SplatError::DuplicateLayer`] if `name` is already registered.
    pub fn register(&mut self, name: &str) -> Result<LayerIndex, SplatError> {
        if let Some(index) = self.lookup(name) {
            return Err(SplatError::DuplicateLayer {
                name: name.to_string(),
                index,
            });
        }
        let slot = self
            .names
            .iter()
            .position(Option::is_none)
            .ok_or_else(|| SplatError::CapacityExceeded {
                name: name.to_string(),
            })?;
        self.names[slot] = Some(name.to_string());
        Ok(LayerIndex(slot as u8))
    }

    /// Channel bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<LayerIndex> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(|i| LayerIndex(i as u8))
    }

    /// Name bound to `index`, if any.
    pub fn name(&self, index: LayerIndex) -> Option<&str> {
        self.names.get(index.index())?.as_deref()
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.names.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owns the splat weight grid for one height field and paints into it.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatPainter {
    width: usize,
    depth: usize,
    weights: Vec<f32>,
    layers: LayerRegistry,
}

impl SplatPainter {
    /// Weight grid matching `field`'s resolution, fully on channel 0.
    pub fn for_field(field: &HeightField) -> Self {
        let (width, depth) = (field.width(), field.depth());
        let mut weights = vec![0.0; width * depth * MAX_LAYERS];
        for texel in weights.chunks_exact_mut(MAX_LAYERS) {
            texel[0] = 1.0;
        }
        Self {
            width,
            depth,
            weights,
            layers: LayerRegistry::new(),
        }
    }

    /// Register a named layer on the next free channel.
    ///
    /// # Errors
    ///
    /// See [`LayerRegistry::register`].
    pub fn register_layer(&mut self, name: &str) -> Result<LayerIndex, SplatError> {
        let index = self.layers.register(name)?;
        tracing::debug!(name, channel = index.index(), "splat layer registered");
        Ok(index)
    }

    /// Registered layer names and their channels.
    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    /// The raw weight grid, 4 channels per texel, row-major.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Four channel weights at `(x, z)`, or `None` outside the grid.
    pub fn weights_at(&self, x: usize, z: usize) -> Option<[f32; MAX_LAYERS]> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        let i = (z * self.width + x) * MAX_LAYERS;
        let mut out = [0.0; MAX_LAYERS];
        out.copy_from_slice(&self.weights[i..i + MAX_LAYERS]);
        Some(out)
    }

    /// Push `layer` toward full coverage around `(world_x, world_z)`.
    ///
    /// Unknown layer names are ignored.
    pub fn paint(
        &mut self,
        field: &HeightField,
        world_x: f32,
        world_z: f32,
        layer: &str,
        radius: f32,
        strength: f32,
    ) {
        self.stroke(field, world_x, world_z, layer, radius, strength, |w, amount| {
            w + amount * (1.0 - w)
        });
    }

    /// Pull `layer` toward zero around `(world_x, world_z)`.
    ///
    /// Unknown layer names are ignored.
    pub fn erase(
        &mut self,
        field: &HeightField,
        world_x: f32,
        world_z: f32,
        layer: &str,
        radius: f32,
        strength: f32,
    ) {
        self.stroke(field, world_x, world_z, layer, radius, strength, |w, amount| {
            w * (1.0 - amount)
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn stroke(
        &mut self,
        field: &HeightField,
        world_x: f32,
        world_z: f32,
        layer: &str,
        radius: f32,
        strength: f32,
        update: impl Fn(f32, f32) -> f32,
    ) {
        let Some(channel) = self.layers.lookup(layer) else {
            tracing::trace!(layer, "ignoring stroke on unregistered splat layer");
            return;
        };
        if field.width() != self.width || field.depth() != self.depth {
            tracing::warn!(
                field_width = field.width(),
                field_depth = field.depth(),
                splat_width = self.width,
                splat_depth = self.depth,
                "splat grid does not match height field"
            );
            return;
        }

        let strength = strength.clamp(0.0, 1.0);
        let footprint = Footprint::new(field, world_x, world_z, radius);
        for cell in footprint.cells() {
            let falloff = (1.0 - cell.distance) * (1.0 - cell.distance);
            let i = (cell.z * self.width + cell.x) * MAX_LAYERS;
            let texel = &mut self.weights[i..i + MAX_LAYERS];
            let w = &mut texel[channel.index()];
            *w = update(*w, strength * falloff).clamp(0.0, 1.0);
            renormalize(texel);
        }
    }
}

/// Scale `texel` to sum to 1; an all-zero texel becomes uniform.
fn renormalize(texel: &mut [f32]) {
    let sum: f32 = texel.iter().sum();
    if sum > f32::EPSILON {
        for w in texel.iter_mut() {
            *w /= sum;
        }
    } else {
        texel.fill(1.0 / texel.len() as f32);
    }
}
