use sitekit_core::{SceneError, SnapshotError};
use sitekit_layout::{
    EquipmentTemplate, InstanceId, LoadMode, Point, RealWorldSize, SceneEditor, SceneSnapshot,
    Viewport,
};
use tempfile::TempDir;

fn populated() -> (SceneEditor, Viewport, InstanceId) {
    let mut editor = SceneEditor::default();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
        .unwrap();
    let id = editor
        .place(
            &EquipmentTemplate::rectangle("pump", "Pump", 5.0, 3.0).with_min_spacing(1.0),
            Point::new(10.0, 20.0),
        )
        .placed_id()
        .cloned()
        .unwrap();
    editor.rotate(&id, 30.0);
    editor.add_measurement(Point::new(0.0, 100.0), Point::new(40.0, 100.0));

    let mut viewport = Viewport::default();
    viewport.set_scale(2.5);
    viewport.set_offset(Point::new(-40.0, 12.0));
    (editor, viewport, id)
}

#[test]
fn test_json_round_trip() {
    let (editor, viewport, _) = populated();
    let snapshot = SceneSnapshot::capture(&editor, &viewport);
    let json = snapshot.to_json().unwrap();
    let loaded = SceneSnapshot::from_json(&json).unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.viewport.scale, 2.5);
    assert_eq!(loaded.scene.instances.len(), 1);
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("site.json");
    let (editor, viewport, _) = populated();

    let snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.save_to_file(&path).unwrap();
    let loaded = SceneSnapshot::load_from_file(&path).unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = SceneSnapshot::load_from_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(sitekit_core::Error::Io(_))));
}

#[test]
fn test_version_mismatch() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.version = 99;
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(matches!(
        SceneSnapshot::from_json(&json),
        Err(SnapshotError::VersionMismatch { found: 99, .. })
    ));
}

#[test]
fn test_duplicate_ids_rejected() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    let copy = snapshot.scene.instances[0].clone();
    snapshot.scene.instances.push(copy);
    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::Scene(SceneError::DuplicateId { .. }))
    ));
}

#[test]
fn test_inconsistent_calibration_rejected() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    if let Some(line) = snapshot.scene.calibration.as_mut() {
        line.units_per_pixel = 7.0;
    }
    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::Corrupt { .. })
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        SceneSnapshot::from_json("{not json"),
        Err(SnapshotError::Json(_))
    ));
}

#[test]
fn test_replace_restores_scene_and_drops_history() {
    let (source, viewport, id) = populated();
    let snapshot = SceneSnapshot::capture(&source, &viewport);

    let mut editor = SceneEditor::default();
    editor.place(
        &EquipmentTemplate::rectangle("other", "Other", 10.0, 10.0),
        Point::new(500.0, 500.0),
    );
    editor.restore(&snapshot, LoadMode::Replace).unwrap();

    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.units_per_pixel(), 2.0);
    let instance = editor.scene().instance(&id).unwrap();
    assert_eq!((instance.width, instance.height), (10.0, 6.0));
    assert_eq!(instance.rotation, 30.0);
    assert_eq!(editor.scene().measurements().len(), 1);
    assert!(!editor.can_undo());
    assert!(!editor.is_modified());
}

#[test]
fn test_merge_is_one_undoable_action() {
    let (source, viewport, id) = populated();
    let snapshot = SceneSnapshot::capture(&source, &viewport);

    let mut editor = SceneEditor::default();
    editor.restore(&snapshot, LoadMode::Merge).unwrap();

    assert_eq!(editor.scene().len(), 1);
    let merged = &editor.scene().instances()[0];
    assert_ne!(merged.id, id);
    // Rescaled to this scene's uncalibrated ratio.
    assert_eq!(merged.width, 5.0);
    assert!(editor.scene().calibration().is_none());

    assert!(editor.undo());
    assert!(editor.scene().is_empty());
}

#[test]
fn test_failed_restore_leaves_scene_untouched() {
    let (mut editor, viewport, _) = populated();
    let before = editor.scene().clone();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.scene.instances[0].width = -1.0;

    assert!(editor.restore(&snapshot, LoadMode::Replace).is_err());
    assert_eq!(editor.scene(), &before);
    assert!(editor.can_undo());
}

#[test]
fn test_non_positive_real_size_rejected_on_load() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.scene.instances[0].real_size = RealWorldSize::Rectangle {
        width: 0.0,
        height: -5.0,
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(matches!(
        SceneSnapshot::from_json(&json),
        Err(SnapshotError::Scene(SceneError::InvalidGeometry { .. }))
    ));
}

#[test]
fn test_non_finite_real_size_rejected() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.scene.instances[0].real_size = RealWorldSize::Rectangle {
        width: f64::NAN,
        height: 3.0,
    };
    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::Scene(SceneError::InvalidGeometry { .. }))
    ));
}

#[test]
fn test_out_of_range_rotation_rejected_on_load() {
    let (editor, viewport, _) = populated();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.scene.instances[0].rotation = 720.0;
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(matches!(
        SceneSnapshot::from_json(&json),
        Err(SnapshotError::Scene(SceneError::InvalidGeometry { .. }))
    ));
}

#[test]
fn test_restore_refuses_bad_real_size_and_rotation() {
    let (mut editor, viewport, _) = populated();
    let before = editor.scene().clone();
    let mut snapshot = SceneSnapshot::capture(&editor, &viewport);
    snapshot.scene.instances[0].real_size = RealWorldSize::Rectangle {
        width: 0.0,
        height: -5.0,
    };
    snapshot.scene.instances[0].rotation = 720.0;

    assert!(editor.restore(&snapshot, LoadMode::Replace).is_err());
    assert!(editor.restore(&snapshot, LoadMode::Merge).is_err());
    assert_eq!(editor.scene(), &before);
}
