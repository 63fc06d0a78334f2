//! Biome enumeration and the height/moisture/temperature decision tree.

/// One of the eight biome classes. The discriminant is the stable integer code.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Biome {
    Ocean = 0,
    Beach = 1,
    Plains = 2,
    Forest = 3,
    Desert = 4,
    Tundra = 5,
    Mountain = 6,
    SnowPeak = 7,
}

impl Biome {
    /// All biomes in code order.
    pub const ALL: [Biome; 8] = [
        Biome::Ocean,
        Biome::Beach,
        Biome::Plains,
        Biome::Forest,
        Biome::Desert,
        Biome::Tundra,
        Biome::Mountain,
        Biome::SnowPeak,
    ];

    /// Integer code in `0..8`.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Biome::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Lowercase identifier, e.g. `"snow_peak"`.
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Beach => "beach",
            Biome::Plains => "plains",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Mountain => "mountain",
            Biome::SnowPeak => "snow_peak",
        }
    }

    /// Display color used by map previews.
    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [20, 50, 180],
            Biome::Beach => [230, 210, 140],
            Biome::Plains => [100, 180, 60],
            Biome::Forest => [30, 120, 30],
            Biome::Desert => [220, 190, 80],
            Biome::Tundra => [200, 210, 220],
            Biome::Mountain => [130, 110, 90],
            Biome::SnowPeak => [250, 250, 255],
        }
    }
}

/// Width of the beach band above the water level, in normalized height.
const BEACH_BAND: f32 = 0.05;

/// Classify one texel. `height` is normalized (`h / height_scale`); `moisture`
/// and `temperature` are in `[0, 1]`. The first matching rule wins.
pub fn classify(height: f32, moisture: f32, temperature: f32, water_level: f32) -> Biome {
    if height < water_level {
        return Biome::Ocean;
    }
    if height < water_level + BEACH_BAND {
        return Biome::Beach;
    }

    if height > 0.7 {
        return if temperature < 0.3 {
            Biome::SnowPeak
        } else {
            Biome::Mountain
        };
    }

    if height > 0.5 {
        return if temperature < 0.4 {
            Biome::Tundra
        } else if moisture > 0.5 {
            Biome::Forest
        } else {
            Biome::Mountain
        };
    }

    if temperature < 0.3 {
        Biome::Tundra
    } else if temperature > 0.7 && moisture < 0.3 {
        Biome::Desert
    } else if moisture > 0.6 {
        Biome::Forest
    } else {
        Biome::Plains
    }
}
