use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour ramps
// ---------------------------------------------------------------------------

/// Hues of the per-sample ramps: purples, reds, greens, oranges.
pub const SAMPLE_HUES: [f32; 4] = [270.0, 0.0, 120.0, 30.0];

/// Leading ramp entries that are too pale to read on white.
pub const PALE_SKIP: usize = 3;

const LIGHTEST: f32 = 0.97;
const DARKEST: f32 = 0.25;

/// `n` shades of one hue from near-white to dark, as `#rrggbb`.
pub fn sequential_ramp(hue: f32, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let step = if n > 1 {
        (LIGHTEST - DARKEST) / (n - 1) as f32
    } else {
        0.0
    };
    (0..n)
        .map(|i| {
            let lightness = LIGHTEST - step * i as f32;
            let hsl = Hsl::new(hue, 0.65, lightness);
            let rgb: Srgb = hsl.into_color();
            to_hex(rgb)
        })
        .collect()
}

fn to_hex(rgb: Srgb) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb.red),
        channel(rgb.green),
        channel(rgb.blue)
    )
}

// ---------------------------------------------------------------------------
// Assemblage colour mapping
// ---------------------------------------------------------------------------

/// Maps the assemblages of one sample to distinct shades of the sample's hue.
#[derive(Debug, Clone)]
pub struct AssemblageColors {
    mapping: BTreeMap<String, String>,
}

impl AssemblageColors {
    /// `panel` selects the hue; assemblages get successive shades after
    /// skipping the palest ones.
    pub fn new<'a>(panel: usize, assemblages: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = assemblages.into_iter().collect();
        let hue = SAMPLE_HUES[panel % SAMPLE_HUES.len()];
        let ramp = sequential_ramp(hue, names.len() + PALE_SKIP);
        let mapping = names
            .into_iter()
            .zip(ramp.into_iter().skip(PALE_SKIP))
            .map(|(name, color)| (name.to_string(), color))
            .collect();
        AssemblageColors { mapping }
    }

    pub fn color_for(&self, assemblage: &str) -> Option<&str> {
        self.mapping.get(assemblage).map(String::as_str)
    }
}
