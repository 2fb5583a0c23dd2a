use log::*;
use serde::{Deserialize, Serialize};
use slashblade::bvh::BvhOptions;
use slashblade::{RenderOptions, BONE_ORDER};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub project_root: Option<PathBuf>,
    pub start_frame: i32,
    /// XYZ degrees
    pub armature_rotation: [f32; 3],
    pub annotate_bones: bool,
    pub rename: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let bvh = BvhOptions::default();
        Self {
            project_root: None,
            start_frame: bvh.start_frame,
            armature_rotation: bvh.world_rotation,
            annotate_bones: false,
            rename: bvh.rename,
        }
    }
}

impl Config {
    /// A missing file means defaults; a malformed one is reported and ignored.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                debug!("no config at {}: {}", path.display(), e);
                return Default::default();
            }
        };
        match toml::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                Default::default()
            }
        }
    }

    pub fn bvh_options(&self) -> BvhOptions {
        BvhOptions {
            start_frame: self.start_frame,
            world_rotation: self.armature_rotation,
            rename: self.rename.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        if self.annotate_bones {
            RenderOptions::annotated(&BONE_ORDER)
        } else {
            RenderOptions::default()
        }
    }
}
