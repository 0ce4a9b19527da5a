use sitekit_core::EngineTuning;
use sitekit_layout::{
    ActionKind, CalibrationLine, Clearance, EquipmentInstance, EquipmentTemplate, InstanceId,
    MeasurementLine, Perimeter, Point, SceneEditor,
};

type SceneState = (
    Vec<EquipmentInstance>,
    Option<CalibrationLine>,
    Option<Perimeter>,
    Vec<MeasurementLine>,
);

fn state(editor: &SceneEditor) -> SceneState {
    let scene = editor.scene();
    (
        scene.instances().to_vec(),
        scene.calibration().cloned(),
        scene.perimeter().cloned(),
        scene.measurements().to_vec(),
    )
}

fn seeded() -> (SceneEditor, InstanceId, InstanceId) {
    let mut editor = SceneEditor::default();
    let pump = EquipmentTemplate::rectangle("pump", "Pump", 20.0, 10.0);
    let silo = EquipmentTemplate::circle("silo", "Silo", 8.0);
    let a = editor
        .place(&pump, Point::new(0.0, 0.0))
        .placed_id()
        .cloned()
        .unwrap();
    let b = editor
        .place(&silo, Point::new(100.0, 100.0))
        .placed_id()
        .cloned()
        .unwrap();
    editor.add_measurement(Point::new(0.0, 200.0), Point::new(50.0, 200.0));
    editor.copy(&[a.clone()]);
    (editor, a, b)
}

/// Runs `op`, then checks undo restores the prior state and redo the
/// post state.
fn assert_inverse(name: &str, op: impl FnOnce(&mut SceneEditor, &InstanceId, &InstanceId)) {
    let (mut editor, a, b) = seeded();
    let before = state(&editor);
    let depth = editor.history().undo_depth();

    op(&mut editor, &a, &b);
    let after = state(&editor);
    assert_ne!(before, after, "{name} changed nothing");
    assert_eq!(editor.history().undo_depth(), depth + 1, "{name} logged wrongly");

    assert!(editor.undo());
    assert_eq!(state(&editor), before, "{name} undo");
    assert!(editor.redo());
    assert_eq!(state(&editor), after, "{name} redo");
}

#[test]
fn test_every_operation_undoes_and_redoes() {
    assert_inverse("place", |e, _, _| {
        let t = EquipmentTemplate::rectangle("tank", "Tank", 10.0, 10.0);
        assert!(e.place(&t, Point::new(300.0, 0.0)).is_placed());
    });
    assert_inverse("move_by", |e, a, b| {
        assert!(e.move_by(&[a.clone(), b.clone()], Point::new(7.0, 3.0)));
    });
    assert_inverse("move_to", |e, a, _| {
        assert!(e.move_to(a, Point::new(400.0, 400.0)));
    });
    assert_inverse("rotate", |e, a, _| {
        assert!(e.rotate(a, 135.0));
    });
    assert_inverse("resize", |e, a, _| {
        assert!(e.resize(a, 60.0, 30.0));
    });
    assert_inverse("resize_real_world", |e, _, b| {
        assert!(e.resize_real_world(b, 40.0, 40.0));
    });
    assert_inverse("remove", |e, a, b| {
        assert!(e.remove(&[a.clone(), b.clone()]));
    });
    assert_inverse("paste", |e, _, _| {
        assert_eq!(e.paste(Some(Point::new(500.0, 500.0))).len(), 1);
    });
    assert_inverse("toggle_visibility", |e, _, b| {
        assert!(e.toggle_visibility(b));
    });
    assert_inverse("rename", |e, a, _| {
        assert!(e.rename(a, "Booster"));
    });
    assert_inverse("set_color", |e, a, _| {
        assert!(e.set_color(a, "#123456"));
    });
    assert_inverse("set_clearance", |e, _, b| {
        assert!(e.set_clearance(b, Clearance::Radius { radius: 3.0 }));
    });
    assert_inverse("set_min_spacing", |e, a, _| {
        assert!(e.set_min_spacing(a, 4.0));
    });
    assert_inverse("bring_to_front", |e, a, _| {
        assert!(e.bring_to_front(a));
    });
    assert_inverse("calibrate", |e, _, _| {
        e.calibrate(Point::new(0.0, 0.0), Point::new(80.0, 0.0), 20.0)
            .unwrap();
    });
    assert_inverse("set_perimeter", |e, _, _| {
        let p = Perimeter::new(vec![
            Point::new(0.0, 0.0),
            Point::new(500.0, 0.0),
            Point::new(250.0, 400.0),
        ])
        .unwrap();
        assert!(e.set_perimeter(p));
    });
    assert_inverse("add_measurement", |e, _, _| {
        assert!(e
            .add_measurement(Point::new(5.0, 5.0), Point::new(5.0, 50.0))
            .is_some());
    });
    assert_inverse("clear_measurements", |e, _, _| {
        assert!(e.clear_measurements());
    });
}

#[test]
fn test_clear_calibration_round_trips() {
    let (mut editor, a, _) = seeded();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(50.0, 0.0), 10.0)
        .unwrap();
    let calibrated = state(&editor);

    assert!(editor.clear_calibration());
    assert_eq!(editor.scene().instance(&a).unwrap().width, 20.0);
    editor.undo();
    assert_eq!(state(&editor), calibrated);
}

#[test]
fn test_new_action_clears_redo() {
    let (mut editor, a, _) = seeded();
    editor.rotate(&a, 90.0);
    editor.undo();
    assert!(editor.can_redo());

    editor.rotate(&a, 45.0);
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_empty_stacks() {
    let mut editor = SceneEditor::default();
    assert!(!editor.can_undo());
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert!(editor.history().last().is_none());
}

#[test]
fn test_depth_is_bounded() {
    let tuning = EngineTuning {
        history_depth: 3,
        ..EngineTuning::default()
    };
    let mut editor = SceneEditor::new(&tuning);
    let t = EquipmentTemplate::rectangle("pump", "Pump", 10.0, 10.0);
    let id = editor
        .place(&t, Point::new(0.0, 0.0))
        .placed_id()
        .cloned()
        .unwrap();
    for step in 1..=5 {
        editor.move_to(&id, Point::new(step as f64 * 10.0, 0.0));
    }

    assert_eq!(editor.history().undo_depth(), 3);
    assert_eq!(editor.history().max_depth(), 3);
    while editor.undo() {}
    // The placement and the first two moves fell off the bottom.
    assert_eq!(editor.scene().instance(&id).unwrap().x, 20.0);
}

#[test]
fn test_entries_carry_kind_and_description() {
    let (mut editor, a, _) = seeded();
    editor.rotate(&a, 90.0);

    let last = editor.history().last().unwrap();
    assert_eq!(last.kind(), ActionKind::Rotate);
    assert_eq!(last.description, "Rotate to 90°");
    assert_eq!(editor.history().undo_description(), Some("Rotate to 90°"));

    editor.undo();
    assert_eq!(editor.history().redo_description(), Some("Rotate to 90°"));
    assert_eq!(editor.history().redo_depth(), 1);
}

#[test]
fn test_undo_prunes_selection() {
    let mut editor = SceneEditor::default();
    let t = EquipmentTemplate::rectangle("pump", "Pump", 10.0, 10.0);
    let id = editor
        .place(&t, Point::new(0.0, 0.0))
        .placed_id()
        .cloned()
        .unwrap();
    editor.select_only(&id);
    editor.undo();
    assert!(editor.scene().selection().is_empty());
}

#[test]
fn test_clear_history_keeps_scene() {
    let (mut editor, _, _) = seeded();
    let before = state(&editor);
    editor.clear_history();
    assert!(!editor.can_undo());
    assert_eq!(state(&editor), before);
}
