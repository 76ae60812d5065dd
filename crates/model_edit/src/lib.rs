//! Cosmetic edits for glTF 2.0 assets: recoloring materials, rescaling nodes
//! and assigning metallic-roughness factors from a text description.
//!
//! Edits are applied to the asset file in place. Before the first edit an
//! asset gets a `<file>.backup` copy, and a request that fails part way puts
//! the file back exactly as it was.

pub use backup::{backup_path, BackupGuard};
pub use color::Color;
pub use customize::{
    AppliedEdit, Customization, CustomizeReport, Customizer, CustomizerConfig, CycleMode, Edit,
};
pub use document::AssetDocument;
pub use error::{EditError, ErrorKind};
pub use rng::{RandomSource, Rng64};
pub use scale::ScaleFactor;
pub use texture::{MatchStrategy, TextureResolution};

pub mod backup;
pub mod color;
pub mod document;
pub mod lock;
pub mod rng;
pub mod scale;
pub mod texture;

mod customize;
mod error;
