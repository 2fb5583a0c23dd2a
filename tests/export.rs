//! End to end: keyed armature -> animation text on disk.

use std::fs;

use cgmath::{Deg, Matrix3, Matrix4, Rad};
use slashblade::rig::{Armature, Scene};
use slashblade::{
    export, output_path, AnimDocument, Action, Angle, Axis, Channel, Error, Keyframe, PoseSource,
    Property, RenderOptions,
};
use tempfile::tempdir;

fn key(frame: f32, degrees: f32) -> Keyframe {
    Keyframe {
        frame,
        value: Rad::from(Deg(degrees)).0,
    }
}

fn torso_only(action: Action) -> Scene {
    let mut armature = Armature {
        world: Matrix4::from(Matrix3::from_angle_x(Deg(90f32))),
        bones: vec![],
    };
    armature.push("Torso", None).unwrap();
    Scene::new(armature, action, 24)
}

fn slash_combo() -> Action {
    let mut action = Action::new("Slash Combo 1");
    action.channels.push(Channel::new(
        "Torso",
        Property::Rotation(Axis::Z),
        vec![key(0., 0.), key(10., 30.)],
    ));
    action
}

#[test]
fn writes_the_document_under_the_project_root() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut scene = torso_only(slash_combo());
    let action = scene.action().clone();

    let path = export(&action, &mut scene, dir.path(), &RenderOptions::default()).unwrap();
    assert_eq!(path, output_path(dir.path(), "Slash Combo 1"));
    assert!(path.ends_with("slashblade_project/anim/slash_combo_1.txt"));
    assert_eq!(scene.current_frame(), 24);

    let text = fs::read_to_string(&path).expect("Failed to read export");
    assert!(text.starts_with(
        "--@name slashblade_project/anim/slash_combo_1\nSLASH_COMBO_1={\n{\n"
    ));
    assert_eq!(text.matches("true").count(), 2);
    assert_eq!(text.lines().filter(|l| l.starts_with("Angle(")).count(), 18);

    let doc = AnimDocument::parse(&text).unwrap();
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(doc.blocks[0].hold, 10);
    assert_eq!(doc.blocks[1].hold, 1);
    let torso = doc.blocks[1].angles[0];
    assert!(torso.x.abs() < 1e-3 && (torso.y + 30.).abs() < 1e-3, "{:?}", torso);
    for block in &doc.blocks {
        assert_eq!(block.angles.len(), 9);
        assert!(block.sword_out);
        assert!(block.angles[1..].iter().all(|a| *a == Angle::ZERO));
    }
}

#[test]
fn exporting_twice_is_byte_identical() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut scene = torso_only(slash_combo());
    let action = scene.action().clone();

    let path = export(&action, &mut scene, dir.path(), &RenderOptions::default()).unwrap();
    let first = fs::read(&path).unwrap();
    export(&action, &mut scene, dir.path(), &RenderOptions::default()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn unkeyed_action_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut scene = torso_only(Action::new("Idle"));
    let action = scene.action().clone();

    match export(&action, &mut scene, dir.path(), &RenderOptions::default()) {
        Err(Error::NoKeyframes { clip }) => assert_eq!(clip, "Idle"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!dir.path().join("slashblade_project").exists());
    assert_eq!(scene.current_frame(), 24);
}

#[test]
fn unwritable_root_is_an_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    let mut scene = torso_only(slash_combo());
    let action = scene.action().clone();

    match export(&action, &mut scene, &blocker, &RenderOptions::default()) {
        Err(Error::Io { .. }) => {}
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(scene.current_frame(), 24);
}
