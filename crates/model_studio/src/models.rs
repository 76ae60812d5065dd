use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use model_api::ModelEntry;

pub const ALLOWED_EXTENSIONS: &[&str] = &["glb", "gltf"];
pub const MODELS_URL_PREFIX: &str = "/static/models";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The directory uploaded models live in.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
    default_model: String,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>, default_model: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_model: default_model.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file name a request refers to, falling back to the default model.
    pub fn file_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.default_model,
        }
    }

    /// Joins `name` onto the models directory. Returns `None` for anything
    /// that is not a single plain file name.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.dir.join(name)),
            _ => None,
        }
    }

    pub fn list(&self) -> io::Result<Vec<ModelEntry>> {
        let mut models = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_allowed(&name) {
                models.push(ModelEntry {
                    url: model_url(&name),
                    name,
                });
            }
        }
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }
}

pub fn model_url(name: &str) -> String {
    format!("{}/{}", MODELS_URL_PREFIX, utf8_percent_encode(name, PATH_SEGMENT))
}

/// Whether `name` has one of the accepted model extensions.
pub fn is_allowed(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Reduces an uploaded file name to a safe ASCII name without directories.
/// May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_owned()
}
