use tracing::{info, warn};

use crate::document::DocumentRoot;
use crate::rng::RandomSource;

pub use presets::PRESETS;

mod presets;

/// Range the roughness is drawn from when nothing in the table matches.
pub const FALLBACK_ROUGHNESS: (f64, f64) = (0.3, 0.9);
/// Range the metallic factor is drawn from when nothing in the table matches.
pub const FALLBACK_METALLIC: (f64, f64) = (0.0, 0.5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturePreset {
    pub name: &'static str,
    pub roughness: f64,
    pub metallic: f64,
}

impl TexturePreset {
    pub const fn new(name: &'static str, roughness: f64, metallic: f64) -> Self {
        Self { name, roughness, metallic }
    }
}

/// How to choose between several presets matching the same description.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MatchStrategy {
    /// The first preset in table order. Short keys shadow longer ones
    /// declared after them.
    #[default]
    FirstDeclared,
    /// The longest matching key, ties going to table order.
    LongestKey,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureResolution {
    /// The preset used, or `None` when the values were drawn at random.
    pub preset: Option<&'static str>,
    pub roughness: f64,
    pub metallic: f64,
}

impl From<&TexturePreset> for TextureResolution {
    fn from(preset: &TexturePreset) -> Self {
        Self {
            preset: Some(preset.name),
            roughness: preset.roughness,
            metallic: preset.metallic,
        }
    }
}

fn pick<'a>(
    table: &'a [TexturePreset],
    strategy: MatchStrategy,
    matches: impl Fn(&TexturePreset) -> bool,
) -> Option<&'a TexturePreset> {
    let mut candidates = table.iter().filter(|preset| matches(preset));
    match strategy {
        MatchStrategy::FirstDeclared => candidates.next(),
        // max_by_key keeps the last maximum, so walk backwards to let ties
        // go to the earlier entry.
        MatchStrategy::LongestKey => candidates.rev().max_by_key(|preset| preset.name.len()),
    }
}

/// Looks `description` up in `table`: first by whole key, then by any single
/// word of a key. Returns `None` if neither finds anything.
pub fn find_preset<'a>(
    table: &'a [TexturePreset],
    description: &str,
    strategy: MatchStrategy,
) -> Option<&'a TexturePreset> {
    let description = description.to_lowercase();
    pick(table, strategy, |preset| description.contains(preset.name)).or_else(|| {
        pick(table, strategy, |preset| {
            preset
                .name
                .split_whitespace()
                .any(|word| description.contains(word))
        })
    })
}

/// Resolves a free-text description to roughness and metallic factors,
/// falling back to random values when the description matches no preset.
pub fn resolve_texture(
    description: &str,
    strategy: MatchStrategy,
    rng: &mut dyn RandomSource,
) -> TextureResolution {
    if let Some(preset) = find_preset(PRESETS, description, strategy) {
        info!(preset = preset.name, "matched texture preset");
        return preset.into();
    }

    let roughness = rng.uniform(FALLBACK_ROUGHNESS.0, FALLBACK_ROUGHNESS.1);
    let metallic = rng.uniform(FALLBACK_METALLIC.0, FALLBACK_METALLIC.1);
    warn!(description, roughness, metallic, "no texture preset found, using random values");
    TextureResolution {
        preset: None,
        roughness,
        metallic,
    }
}

/// Writes the resolved factors into every material that has a
/// metallic-roughness block. Returns how many materials were changed.
pub fn apply_texture(root: &mut DocumentRoot, resolution: &TextureResolution) -> usize {
    let mut changed = 0;
    for material in root.materials_mut() {
        if let Some(pbr) = material.pbr_metallic_roughness.as_mut() {
            pbr.roughness_factor = Some(resolution.roughness);
            pbr.metallic_factor = Some(resolution.metallic);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use crate::document::{Material, PbrMetallicRoughness};
    use crate::rng::Rng64;

    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn resolve(description: &str) -> TextureResolution {
        resolve_texture(description, MatchStrategy::FirstDeclared, &mut Fixed(0.0))
    }

    #[test]
    fn test_table_is_complete_and_unique() {
        assert_eq!(PRESETS.len(), 80);
        for (i, preset) in PRESETS.iter().enumerate() {
            assert!(PRESETS[..i].iter().all(|p| p.name != preset.name), "{}", preset.name);
            assert!((0.0..=1.0).contains(&preset.roughness));
            assert!((0.0..=1.0).contains(&preset.metallic));
            assert_eq!(preset.name, preset.name.to_lowercase());
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let resolution = resolve("Shiny CHROME trim");
        assert_eq!(resolution.preset, Some("chrome"));
        assert_eq!((resolution.roughness, resolution.metallic), (0.1, 1.0));
    }

    #[test]
    fn test_exact_match_beats_word_overlap() {
        // "granite" is a whole key; "rough granite" would only match later.
        let resolution = resolve("a slab of granite with brushed edges");
        assert_eq!(resolution.preset, Some("granite"));

        // "brushed aluminum" overlaps "brushed metal" by a word, but
        // "aluminum" itself is a full key and is declared first.
        let resolution = resolve("brushed aluminum");
        assert_eq!(resolution.preset, Some("aluminum"));
    }

    #[test]
    fn test_first_declared_shadows_longer_keys() {
        let resolution = resolve("a soft velvet red floral cushion");
        assert_eq!(resolution.preset, Some("velvet"));
        assert_eq!((resolution.roughness, resolution.metallic), (0.9, 0.0));

        assert_eq!(resolve("polished chrome metal").preset, Some("metal"));
    }

    #[test]
    fn test_longest_key_prefers_specific_presets() {
        let preset = find_preset(PRESETS, "a soft velvet red floral cushion", MatchStrategy::LongestKey);
        assert_eq!(preset.map(|p| (p.name, p.roughness, p.metallic)), Some(("velvet red floral", 0.9, 0.05)));

        let preset = find_preset(PRESETS, "Brushed Aluminum panel", MatchStrategy::LongestKey);
        assert_eq!(preset.map(|p| p.name), Some("brushed aluminum"));
    }

    #[test]
    fn test_word_overlap_fallback() {
        // No full key appears, but "paint" is a word of "matte paint".
        let resolution = resolve("paint it");
        assert_eq!(resolution.preset, Some("matte paint"));
        assert_eq!((resolution.roughness, resolution.metallic), (0.9, 0.0));
    }

    #[test]
    fn test_substring_matching_is_not_word_bound() {
        // "ice" is found inside "nice".
        assert_eq!(resolve("something nice").preset, Some("ice"));
    }

    #[test]
    fn test_random_fallback_uses_injected_source() {
        let low = resolve_texture("zzz", MatchStrategy::FirstDeclared, &mut Fixed(0.0));
        assert_eq!(low.preset, None);
        assert_eq!((low.roughness, low.metallic), (0.3, 0.0));

        let mid = resolve_texture("zzz", MatchStrategy::FirstDeclared, &mut Fixed(0.5));
        assert!((mid.roughness - 0.6).abs() < 1e-12);
        assert!((mid.metallic - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_random_fallback_is_reproducible_with_seed() {
        let a = resolve_texture("zzz", MatchStrategy::FirstDeclared, &mut Rng64::new(9));
        let b = resolve_texture("zzz", MatchStrategy::FirstDeclared, &mut Rng64::new(9));
        assert_eq!(a, b);
        assert!((0.3..0.9).contains(&a.roughness));
        assert!((0.0..0.5).contains(&a.metallic));
    }

    #[test]
    fn test_apply_skips_materials_without_pbr() {
        let mut root = DocumentRoot {
            materials: Some(vec![
                Material {
                    pbr_metallic_roughness: Some(PbrMetallicRoughness::default()),
                    ..Default::default()
                },
                Material::default(),
            ]),
            ..Default::default()
        };
        let resolution = resolve("oak");
        assert_eq!(apply_texture(&mut root, &resolution), 1);

        let materials = root.materials.unwrap();
        let pbr = materials[0].pbr_metallic_roughness.as_ref().unwrap();
        assert_eq!(pbr.roughness_factor, Some(0.8));
        assert_eq!(pbr.metallic_factor, Some(0.0));
        assert_eq!(materials[1], Material::default());
    }
}
