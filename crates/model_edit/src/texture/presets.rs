use super::TexturePreset;

/// Known material descriptions, in match priority order.
///
/// Lookups take the first entry that matches, so a short key listed early
/// (`"velvet"`) wins over a longer one listed later (`"velvet red floral"`)
/// unless [`MatchStrategy::LongestKey`](super::MatchStrategy::LongestKey) is
/// used.
pub static PRESETS: &[TexturePreset] = &[
    // Basic materials
    TexturePreset::new("velvet", 0.9, 0.0),
    TexturePreset::new("leather", 0.7, 0.1),
    TexturePreset::new("metal", 0.2, 0.9),
    TexturePreset::new("steel", 0.2, 0.9),
    TexturePreset::new("wood", 0.8, 0.0),

    // Metals
    TexturePreset::new("chrome", 0.1, 1.0),
    TexturePreset::new("gold", 0.2, 1.0),
    TexturePreset::new("silver", 0.15, 0.95),
    TexturePreset::new("copper", 0.25, 0.9),
    TexturePreset::new("brass", 0.3, 0.85),
    TexturePreset::new("bronze", 0.35, 0.8),
    TexturePreset::new("aluminum", 0.3, 0.9),
    TexturePreset::new("brushed metal", 0.5, 0.85),
    TexturePreset::new("rusted metal", 0.8, 0.7),

    // Woods
    TexturePreset::new("oak", 0.8, 0.0),
    TexturePreset::new("pine", 0.75, 0.0),
    TexturePreset::new("mahogany", 0.7, 0.05),
    TexturePreset::new("walnut", 0.65, 0.0),
    TexturePreset::new("ebony", 0.6, 0.0),
    TexturePreset::new("bamboo", 0.7, 0.0),
    TexturePreset::new("polished wood", 0.4, 0.1),
    TexturePreset::new("distressed wood", 0.9, 0.0),

    // Fabrics
    TexturePreset::new("silk", 0.7, 0.0),
    TexturePreset::new("cotton", 0.8, 0.0),
    TexturePreset::new("linen", 0.85, 0.0),
    TexturePreset::new("wool", 0.9, 0.0),
    TexturePreset::new("satin", 0.6, 0.1),
    TexturePreset::new("denim", 0.85, 0.0),
    TexturePreset::new("canvas", 0.9, 0.0),

    // Stone and minerals
    TexturePreset::new("marble", 0.5, 0.1),
    TexturePreset::new("granite", 0.7, 0.05),
    TexturePreset::new("sandstone", 0.8, 0.0),
    TexturePreset::new("limestone", 0.75, 0.0),
    TexturePreset::new("quartz", 0.4, 0.2),
    TexturePreset::new("slate", 0.8, 0.0),
    TexturePreset::new("obsidian", 0.3, 0.2),
    TexturePreset::new("jade", 0.6, 0.1),

    // Glass and ceramics
    TexturePreset::new("glass", 0.1, 0.0),
    TexturePreset::new("frosted glass", 0.5, 0.0),
    TexturePreset::new("ceramic", 0.4, 0.0),
    TexturePreset::new("porcelain", 0.3, 0.0),
    TexturePreset::new("terracotta", 0.8, 0.0),

    // Synthetic materials
    TexturePreset::new("plastic", 0.5, 0.0),
    TexturePreset::new("rubber", 0.9, 0.0),
    TexturePreset::new("vinyl", 0.6, 0.0),
    TexturePreset::new("carbon fiber", 0.4, 0.3),
    TexturePreset::new("nylon", 0.7, 0.0),

    // Natural elements
    TexturePreset::new("water", 0.1, 0.3),
    TexturePreset::new("ice", 0.2, 0.2),
    TexturePreset::new("snow", 0.9, 0.0),
    TexturePreset::new("sand", 0.8, 0.0),
    TexturePreset::new("mud", 0.95, 0.0),
    TexturePreset::new("grass", 0.9, 0.0),
    TexturePreset::new("bark", 0.95, 0.0),

    // Processed materials
    TexturePreset::new("concrete", 0.8, 0.0),
    TexturePreset::new("brick", 0.85, 0.0),
    TexturePreset::new("asphalt", 0.9, 0.0),
    TexturePreset::new("paper", 0.8, 0.0),
    TexturePreset::new("cardboard", 0.85, 0.0),
    TexturePreset::new("leather worn", 0.8, 0.05),
    TexturePreset::new("leather polished", 0.5, 0.15),

    // Specialty finishes
    TexturePreset::new("matte paint", 0.9, 0.0),
    TexturePreset::new("glossy paint", 0.2, 0.0),
    TexturePreset::new("metallic paint", 0.3, 0.5),
    TexturePreset::new("rust", 0.95, 0.3),
    TexturePreset::new("patina", 0.7, 0.4),
    TexturePreset::new("weathered", 0.85, 0.1),
    TexturePreset::new("polished", 0.2, 0.3),
    TexturePreset::new("brushed", 0.6, 0.2),
    TexturePreset::new("hammered", 0.7, 0.4),

    // Composite descriptive textures
    TexturePreset::new("velvet red floral", 0.9, 0.05),
    TexturePreset::new("worn brown leather", 0.8, 0.05),
    TexturePreset::new("polished chrome metal", 0.1, 1.0),
    TexturePreset::new("oak wood grain", 0.8, 0.0),
    TexturePreset::new("distressed denim", 0.9, 0.0),
    TexturePreset::new("italian marble", 0.5, 0.1),
    TexturePreset::new("brushed aluminum", 0.5, 0.9),
    TexturePreset::new("aged copper", 0.6, 0.7),
    TexturePreset::new("wet concrete", 0.7, 0.1),
    TexturePreset::new("rough granite", 0.8, 0.05),
];
