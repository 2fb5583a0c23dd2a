use std::fs;
use std::path::{Path, PathBuf};

use log::*;

use crate::document::{module_name, serialize, RenderOptions, ANIM_DIR};
use crate::error::{Error, Result};
use crate::keyframes::extract_keyframes;
use crate::pose::PoseSource;
use crate::{Action, BONE_ORDER};

/// Where Slashblade expects the animation text for `clip`.
pub fn output_path(project_root: &Path, clip: &str) -> PathBuf {
    let mut path = project_root.to_path_buf();
    path.extend(ANIM_DIR.split('/'));
    path.push(format!("{}.txt", module_name(clip)));
    path
}

/// Converts `action` as posed by `source` and writes it under `project_root`.
///
/// Nothing is written unless the whole document could be built.
pub fn export<S: PoseSource + ?Sized>(
    action: &Action,
    source: &mut S,
    project_root: &Path,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let frames = extract_keyframes(action);
    let doc = serialize(&frames, source, &BONE_ORDER, &action.name)?;
    let text = doc.render(options)?;

    let path = output_path(project_root, &action.name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, text).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "exported `{}` ({} keyframes) to {}",
        action.name,
        frames.len(),
        path.display()
    );
    Ok(path)
}
