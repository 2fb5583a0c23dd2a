use anyhow::{Context, Result};
use log::*;
use slashblade::bvh::load_bvh;
use slashblade::rig::Scene;
use slashblade::*;
use structopt::StructOpt;

use std::fs;
use std::path::{Path, PathBuf};

mod descriptor;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "slashblade",
    about = "exports keyframed armature animation as slashblade anim text"
)]
enum Opt {
    /// Convert a BVH capture into slashblade_project/anim/<name>.txt
    Export {
        #[structopt(parse(from_os_str))]
        bvh: PathBuf,

        /// Animation name, defaults to the file stem
        #[structopt(short, long)]
        name: Option<String>,

        /// Directory holding slashblade_project, defaults to the capture's directory
        #[structopt(short, long, parse(from_os_str))]
        project_root: Option<PathBuf>,

        /// Print the animation instead of writing it
        #[structopt(long)]
        stdout: bool,

        #[structopt(short, long, parse(from_os_str), default_value = "slashblade.toml")]
        config: PathBuf,
    },
    /// Summarise an exported animation
    Info {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Opt::from_args() {
        Opt::Export {
            bvh,
            name,
            project_root,
            stdout,
            config,
        } => {
            let config = descriptor::Config::load(&config);
            debug!("{:?}", config);
            let name = match name {
                Some(n) => n,
                None => clip_name(&bvh)?,
            };

            let data = fs::read(&bvh).context("failed to open bvh")?;
            let options = config.bvh_options();
            let (armature, action) = load_bvh(&data, &name, &options)?;
            info!(
                "loaded {} bone(s), {} channel(s)",
                armature.bones.len(),
                action.channels.len()
            );
            let mut scene = Scene::new(armature, action.clone(), options.start_frame);
            let render = config.render_options();

            if stdout {
                let frames = extract_keyframes(&action);
                let doc = serialize(&frames, &mut scene, &BONE_ORDER, &name)?;
                print!("{}", doc.render(&render)?);
                return Ok(());
            }

            let root = match project_root.or(config.project_root) {
                Some(root) => root,
                None => bvh
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            };
            let written = export(&action, &mut scene, &root, &render)
                .with_context(|| format!("Export failed for '{}'", name))?;
            println!("Exported '{}' to: {}", name, written.display());
        }
        Opt::Info { input } => {
            let text = fs::read_to_string(&input).context("failed to open animation")?;
            let doc = AnimDocument::parse(&text)
                .with_context(|| format!("failed to read {}", input.display()))?;
            print_info(&doc);
        }
    }

    Ok(())
}

fn clip_name(bvh: &Path) -> Result<String> {
    let stem = bvh
        .file_stem()
        .context("capture path has no file name")?;
    Ok(stem.to_string_lossy().into_owned())
}

fn print_info(doc: &AnimDocument) {
    let length: i32 = doc.blocks.iter().map(|b| b.hold).sum();
    println!("{} ({})", doc.table_name, doc.module_path);
    println!("{} keyframe(s), {} frame(s)", doc.blocks.len(), length);
    for (i, block) in doc.blocks.iter().enumerate() {
        println!(
            "#{:03}: hold {:>3}, sword {}",
            i,
            block.hold,
            if block.sword_out { "out" } else { "sheathed" }
        );
        for (slot, angle) in block.angles.iter().enumerate() {
            let bone = BONE_ORDER.get(slot).copied().unwrap_or("?");
            println!(
                "    {:<18} {:>11.6} {:>11.6} {:>11.6}",
                bone, angle.x, angle.y, angle.z
            );
        }
    }
}
