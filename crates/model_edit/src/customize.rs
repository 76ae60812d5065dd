use std::path::Path;

use tracing::{error, info, warn};

use crate::backup::{self, BackupGuard};
use crate::color::{apply_color, Color};
use crate::document::{write_atomic, AssetDocument, DocumentRoot};
use crate::error::{EditError, Result};
use crate::lock::PathLocks;
use crate::rng::{RandomSource, Rng64};
use crate::scale::{apply_scale, ScaleFactor};
use crate::texture::{apply_texture, resolve_texture, MatchStrategy, TextureResolution};

/// How edits of one request map onto document loads and saves.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CycleMode {
    /// Load once, apply every edit, save once.
    #[default]
    Shared,
    /// Load, apply and save separately for each edit.
    PerEdit,
}

#[derive(Debug, Clone, Default)]
pub struct CustomizerConfig {
    pub cycle_mode: CycleMode,
    pub match_strategy: MatchStrategy,
    /// Seeds the random texture fallback. Drawn from the clock when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Colorize(Color),
    Scale(ScaleFactor),
    Texture(String),
}

/// The edits requested for one asset, in the order they are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customization {
    edits: Vec<Edit>,
}

impl Customization {
    /// Color, then scale, then texture, skipping whichever is absent.
    pub fn new(color: Option<Color>, scale: Option<ScaleFactor>, texture_prompt: Option<String>) -> Self {
        let edits = color
            .map(Edit::Colorize)
            .into_iter()
            .chain(scale.map(Edit::Scale))
            .chain(texture_prompt.map(Edit::Texture))
            .collect();
        Self { edits }
    }

    pub fn with_edits(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppliedEdit {
    Colorized { color: Color, materials: usize },
    Scaled { factor: ScaleFactor, nodes: usize },
    Textured { resolution: TextureResolution, materials: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizeReport {
    pub applied: Vec<AppliedEdit>,
    /// Whether this request wrote the asset's first backup.
    pub created_backup: bool,
}

/// Applies customizations to asset files.
///
/// Every request either lands completely or leaves the asset exactly as it
/// found it. Requests for the same file are serialized.
#[derive(Default)]
pub struct Customizer {
    config: CustomizerConfig,
    locks: PathLocks,
}

impl Customizer {
    pub fn new(config: CustomizerConfig) -> Self {
        Self {
            config,
            locks: PathLocks::new(),
        }
    }

    pub fn config(&self) -> &CustomizerConfig {
        &self.config
    }

    pub fn customize(&self, path: &Path, customization: &Customization) -> Result<CustomizeReport> {
        let mut rng = match self.config.seed {
            Some(seed) => Rng64::new(seed),
            None => Rng64::from_entropy(),
        };
        self.customize_with_rng(path, customization, &mut rng)
    }

    pub fn customize_with_rng(
        &self,
        path: &Path,
        customization: &Customization,
        rng: &mut dyn RandomSource,
    ) -> Result<CustomizeReport> {
        let _lock = self.locks.lock(path);
        if !path.is_file() {
            return Err(EditError::NotFound { path: path.to_owned() });
        }
        if customization.is_empty() {
            return Ok(CustomizeReport::default());
        }

        let guard = BackupGuard::take(path)?;
        let result = match self.config.cycle_mode {
            CycleMode::Shared => self.run_shared(path, customization, rng),
            CycleMode::PerEdit => self.run_per_edit(path, customization, rng),
        };

        match result {
            Ok(applied) => {
                let created_backup = guard.created_backup();
                guard.commit();
                info!(path = %path.display(), edits = applied.len(), "customized asset");
                Ok(CustomizeReport { applied, created_backup })
            }
            Err(err) => {
                warn!(path = %path.display(), "customization failed: {}", err);
                if let Err(restore_err) = guard.restore() {
                    error!(path = %path.display(), "asset could not be restored: {}", restore_err);
                    return Err(restore_err);
                }
                Err(err)
            }
        }
    }

    /// Puts the asset back the way it was before its first edit. Returns
    /// false when it has never been edited.
    pub fn revert(&self, path: &Path) -> Result<bool> {
        let _lock = self.locks.lock(path);
        if !path.is_file() {
            return Err(EditError::NotFound { path: path.to_owned() });
        }
        backup::restore(path)
    }

    /// Replaces the asset at `path` with newly uploaded bytes. Any backup of
    /// the previous file is discarded, since it no longer describes this one.
    pub fn install(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let _lock = self.locks.lock(path);
        write_atomic(path, bytes).map_err(|source| EditError::Persist {
            path: path.to_owned(),
            source,
        })?;
        backup::discard(path)?;
        info!(path = %path.display(), bytes = bytes.len(), "installed asset");
        Ok(())
    }

    fn run_shared(
        &self,
        path: &Path,
        customization: &Customization,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<AppliedEdit>> {
        let mut document = AssetDocument::load(path)?;
        let applied = customization
            .edits()
            .iter()
            .map(|edit| self.apply(&mut document.root, edit, rng))
            .collect::<Result<Vec<_>>>()?;
        document.save(path)?;
        Ok(applied)
    }

    fn run_per_edit(
        &self,
        path: &Path,
        customization: &Customization,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<AppliedEdit>> {
        let mut applied = Vec::with_capacity(customization.edits().len());
        for edit in customization.edits() {
            let mut document = AssetDocument::load(path)?;
            applied.push(self.apply(&mut document.root, edit, rng)?);
            document.save(path)?;
        }
        Ok(applied)
    }

    fn apply(&self, root: &mut DocumentRoot, edit: &Edit, rng: &mut dyn RandomSource) -> Result<AppliedEdit> {
        let applied = match edit {
            Edit::Colorize(color) => AppliedEdit::Colorized {
                color: *color,
                materials: apply_color(root, *color),
            },
            Edit::Scale(factor) => AppliedEdit::Scaled {
                factor: *factor,
                nodes: apply_scale(root, *factor)?,
            },
            Edit::Texture(prompt) => {
                let resolution = resolve_texture(prompt, self.config.match_strategy, rng);
                AppliedEdit::Textured {
                    materials: apply_texture(root, &resolution),
                    resolution,
                }
            }
        };
        info!("applied {:?}", applied);
        Ok(applied)
    }
}
