use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use gltf::Glb;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EditError, Result};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;

/// The metallic-roughness block of a material.
///
/// Only the factors the editors touch are typed, everything else (textures,
/// extensions, extras) is carried through `other` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic_factor: Option<f64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The JSON part of an asset, with every top-level array other than
/// `materials` and `nodes` kept as raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRoot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<Material>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DocumentRoot {
    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.iter_mut().flatten()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut().flatten()
    }
}

/// How the document was stored on disk.
#[derive(Clone, Debug, PartialEq)]
pub enum Container {
    /// A `.glb` file; the binary chunk is written back verbatim.
    Binary { bin: Option<Vec<u8>> },
    /// A `.gltf` JSON file.
    Text,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssetDocument {
    pub root: DocumentRoot,
    container: Container,
}

impl AssetDocument {
    pub fn new(root: DocumentRoot, container: Container) -> Self {
        Self { root, container }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let (json, container) = if bytes.starts_with(GLB_MAGIC) {
            let glb = Glb::from_slice(bytes)?;
            let bin = glb.bin.map(Cow::into_owned);
            (glb.json.into_owned(), Container::Binary { bin })
        } else {
            (bytes.to_vec(), Container::Text)
        };

        // Reject anything that is not a glTF 2.0 document before we start
        // treating it as one.
        let schema = gltf::json::deserialize::from_slice::<gltf::json::Root>(&json)
            .map_err(gltf::Error::from)?;
        if schema.asset.version.split('.').next() != Some("2") {
            return Err(EditError::UnsupportedVersion(schema.asset.version));
        }
        debug!(
            materials = schema.materials.len(),
            nodes = schema.nodes.len(),
            meshes = schema.meshes.len(),
            buffers = schema.buffers.len(),
            "decoded glTF document"
        );

        let root = serde_json::from_slice::<DocumentRoot>(&json)?;
        Ok(Self { root, container })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        match &self.container {
            Container::Text => serde_json::to_vec_pretty(&self.root)
                .map_err(|err| EditError::Encode(err.into())),
            Container::Binary { bin } => {
                let json = serde_json::to_vec(&self.root)
                    .map_err(|err| EditError::Encode(err.into()))?;

                let mut length = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN + align4(json.len());
                if let Some(bin) = bin {
                    length += GLB_CHUNK_HEADER_LEN + align4(bin.len());
                }
                let length = u32::try_from(length).map_err(|_| {
                    EditError::Encode(gltf::Error::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "document exceeds the GLB size limit",
                    )))
                })?;

                let glb = Glb {
                    header: gltf::binary::Header {
                        magic: *GLB_MAGIC,
                        version: 2,
                        length,
                    },
                    json: Cow::Owned(json),
                    bin: bin.as_deref().map(Cow::Borrowed),
                };
                glb.to_vec().map_err(EditError::Encode)
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => EditError::NotFound { path: path.to_owned() },
            _ => EditError::Read { path: path.to_owned(), source },
        })?;
        Self::from_slice(&bytes)
    }

    /// Overwrites `path` with the encoded document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_vec()?;
        write_atomic(path, &bytes).map_err(|source| EditError::Persist {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}

fn align4(len: usize) -> usize {
    (len + 3) & !3
}

/// Replaces `path` with `bytes` through a temporary sibling file, so a crash
/// mid-write never leaves a truncated asset behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions())?;
    }
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
