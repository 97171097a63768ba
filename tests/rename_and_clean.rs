//! Integration tests for the rename commands and `clean`.

use std::fs;
use std::path::PathBuf;

use ipm::commands::{run, Command};
use ipm::config::Config;
use ipm::ewarm::workspace::{clean, rename, rename_project, rename_workspace};
use ipm::ewarm::EwarmError;
use tempfile::TempDir;

const WORKSPACE: &str = r#"<?xml version="1.0" encoding="iso-8859-1"?>
<workspace>
  <project>
    <path>$WS_DIR$\template.ewp</path>
  </project>
  <batchBuild/>
</workspace>
"#;

const PROJECT: &str = "<project>\n  <name>template.ewp</name>\n</project>\n";

/// `EWARM/{template.eww, template.ewp}` in a fresh temporary directory.
fn ewarm() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ewarm = dir.path().join("EWARM");
    fs::create_dir(&ewarm).unwrap();
    let eww = ewarm.join("template.eww");
    let ewp = ewarm.join("template.ewp");
    fs::write(&eww, WORKSPACE).unwrap();
    fs::write(&ewp, PROJECT).unwrap();
    (dir, eww, ewp)
}

// =============================================================================
// Rename
// =============================================================================

#[test]
fn rename_both_descriptors() {
    let (_dir, eww, ewp) = ewarm();
    let folder = eww.parent().unwrap().to_path_buf();

    let (project, workspace) = rename(&ewp, &eww, "Blinky").unwrap();
    assert_eq!(project, folder.join("Blinky.ewp"));
    assert_eq!(workspace, folder.join("Blinky.eww"));
    assert!(!ewp.exists());
    assert!(!eww.exists());

    let text = fs::read_to_string(&workspace).unwrap();
    assert!(text.contains(r"<path>$WS_DIR$\Blinky.ewp</path>"));
    assert!(!text.contains("template.ewp"));

    // Project contents are never rewritten.
    assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
}

#[test]
fn rename_project_only_touches_the_reference() {
    let (_dir, eww, ewp) = ewarm();

    let project = rename_project(&ewp, &eww, "Motor").unwrap();
    assert!(project.ends_with("Motor.ewp"));
    assert!(eww.is_file());

    let text = fs::read_to_string(&eww).unwrap();
    assert_eq!(text, WORKSPACE.replace("template.ewp", "Motor.ewp"));
}

#[test]
fn rename_workspace_keeps_contents() {
    let (_dir, eww, _ewp) = ewarm();

    let workspace = rename_workspace(&eww, "Board").unwrap();
    assert!(workspace.ends_with("Board.eww"));
    assert_eq!(fs::read_to_string(&workspace).unwrap(), WORKSPACE);
}

#[test]
fn renaming_twice_follows_the_reference() {
    let (_dir, eww, ewp) = ewarm();

    let (ewp, eww) = rename(&ewp, &eww, "first").unwrap();
    let (_, eww) = rename(&ewp, &eww, "second").unwrap();

    let text = fs::read_to_string(&eww).unwrap();
    assert!(text.contains(r"$WS_DIR$\second.ewp"));
    assert!(!text.contains("first"));
}

#[test]
fn rename_onto_existing_file_fails() {
    let (_dir, eww, ewp) = ewarm();
    let taken = ewp.with_file_name("Blinky.ewp");
    fs::write(&taken, "other").unwrap();

    let result = rename_project(&ewp, &eww, "Blinky");
    assert!(matches!(result, Err(EwarmError::AlreadyExists { .. })));
    assert!(ewp.is_file());
    assert_eq!(fs::read_to_string(&taken).unwrap(), "other");
    assert_eq!(fs::read_to_string(&eww).unwrap(), WORKSPACE);
}

#[test]
fn swapped_arguments_are_rejected() {
    let (_dir, eww, ewp) = ewarm();

    let result = rename_project(&eww, &ewp, "Blinky");
    match result {
        Err(EwarmError::WrongExtension { path, expected }) => {
            assert_eq!(path, eww);
            assert_eq!(expected, "ewp");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let result = rename_workspace(&ewp, "Blinky");
    assert!(matches!(result, Err(EwarmError::WrongExtension { .. })));
}

#[test]
fn missing_descriptors_are_reported() {
    let (dir, eww, ewp) = ewarm();
    let ghost = dir.path().join("EWARM/ghost.ewp");

    let result = rename_project(&ghost, &eww, "Blinky");
    assert!(matches!(result, Err(EwarmError::FileNotFound { path }) if path == ghost));

    let ghost_ws = dir.path().join("EWARM/ghost.eww");
    let result = rename(&ewp, &ghost_ws, "Blinky");
    assert!(matches!(result, Err(EwarmError::FileNotFound { path }) if path == ghost_ws));
    assert!(ewp.is_file());
}

#[test]
fn rename_through_dispatch() {
    let (_dir, eww, ewp) = ewarm();
    let folder = eww.parent().unwrap().to_path_buf();

    let command = Command::Rename {
        project: ewp,
        workspace: eww,
        name: "Scope".to_string(),
    };
    run(&command, &Config::default()).unwrap();

    assert!(folder.join("Scope.ewp").is_file());
    assert!(folder.join("Scope.eww").is_file());
}

// =============================================================================
// Clean
// =============================================================================

#[test]
fn clean_keeps_only_descriptors() {
    let (_dir, eww, ewp) = ewarm();
    let folder = eww.parent().unwrap().to_path_buf();
    fs::write(folder.join("template.dep"), "").unwrap();
    fs::write(folder.join("template.ewd"), "").unwrap();
    fs::write(folder.join("other.ewp"), "").unwrap();
    fs::create_dir_all(folder.join("Debug/Exe")).unwrap();
    fs::write(folder.join("Debug/Exe/template.out"), "").unwrap();
    fs::create_dir(folder.join("settings.eww")).unwrap();

    let removed = clean(&eww).unwrap();
    assert_eq!(removed, 4);

    let mut left: Vec<_> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, ["other.ewp", "template.eww", "template.ewp"]);
    assert!(ewp.is_file());
}

#[test]
fn clean_on_clean_folder_removes_nothing() {
    let (_dir, eww, _ewp) = ewarm();
    assert_eq!(clean(&eww).unwrap(), 0);
    assert_eq!(clean(&eww).unwrap(), 0);
}

#[test]
fn clean_requires_a_workspace() {
    let (dir, _eww, ewp) = ewarm();
    fs::write(dir.path().join("EWARM/keep.dep"), "").unwrap();

    let result = clean(&ewp);
    assert!(matches!(result, Err(EwarmError::WrongExtension { .. })));
    assert!(dir.path().join("EWARM/keep.dep").is_file());

    let result = clean(&dir.path().join("EWARM/none.eww"));
    assert!(matches!(result, Err(EwarmError::FileNotFound { .. })));
}

#[test]
fn dot_named_workspace_is_treated_like_any_other() {
    let (dir, _eww, _ewp) = ewarm();
    let folder = dir.path().join("EWARM");
    let hidden = folder.join(".eww");
    fs::write(&hidden, WORKSPACE).unwrap();
    fs::write(folder.join("app.dep"), "").unwrap();

    assert_eq!(clean(&hidden).unwrap(), 1);
    assert!(hidden.is_file());
    assert!(!folder.join("app.dep").exists());
}

#[test]
fn clean_through_dispatch() {
    let (_dir, eww, _ewp) = ewarm();
    let obj = eww.parent().unwrap().join("Debug/Obj");
    fs::create_dir_all(&obj).unwrap();

    run(
        &Command::Clean {
            workspace: eww.clone(),
        },
        &Config::default(),
    )
    .unwrap();
    assert!(!obj.exists());
    assert!(eww.is_file());
}
