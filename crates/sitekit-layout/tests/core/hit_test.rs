use sitekit_layout::{
    pick, pick_calibration_point, pick_instance, rotation_handle_position, CalibrationEnd,
    EquipmentTemplate, InstanceId, PickTarget, Point, SceneEditor,
};

fn place(editor: &mut SceneEditor, template: &EquipmentTemplate, x: f64, y: f64) -> InstanceId {
    editor
        .place(template, Point::new(x, y))
        .placed_id()
        .cloned()
        .unwrap()
}

fn tank() -> EquipmentTemplate {
    EquipmentTemplate::rectangle("tank", "Tank", 100.0, 20.0)
}

#[test]
fn test_topmost_instance_wins() {
    let mut editor = SceneEditor::default();
    let square = EquipmentTemplate::rectangle("sq", "Square", 20.0, 20.0);
    let lower = place(&mut editor, &square, 0.0, 0.0);
    let upper = place(&mut editor, &square, 50.0, 0.0);
    // Moves are not spacing-checked, so this stacks the two.
    editor.move_to(&upper, Point::new(10.0, 10.0));

    let hit = pick_instance(editor.scene(), Point::new(15.0, 15.0)).unwrap();
    assert_eq!(hit.id, upper);

    editor.bring_to_front(&lower);
    let hit = pick_instance(editor.scene(), Point::new(15.0, 15.0)).unwrap();
    assert_eq!(hit.id, lower);
}

#[test]
fn test_rotated_body_picking() {
    let mut editor = SceneEditor::default();
    let id = place(&mut editor, &tank(), 0.0, 40.0);

    assert!(pick_instance(editor.scene(), Point::new(50.0, 5.0)).is_none());
    assert!(pick_instance(editor.scene(), Point::new(5.0, 50.0)).is_some());

    editor.rotate(&id, 90.0);
    assert!(pick_instance(editor.scene(), Point::new(50.0, 5.0)).is_some());
    assert!(pick_instance(editor.scene(), Point::new(5.0, 50.0)).is_none());
}

#[test]
fn test_circle_picking_uses_radius() {
    let mut editor = SceneEditor::default();
    place(&mut editor, &EquipmentTemplate::circle("silo", "Silo", 10.0), 0.0, 0.0);

    assert!(pick_instance(editor.scene(), Point::new(10.0, 10.0)).is_some());
    assert!(pick_instance(editor.scene(), Point::new(1.0, 1.0)).is_none());
}

#[test]
fn test_hidden_instances_are_not_pickable() {
    let mut editor = SceneEditor::default();
    let id = place(&mut editor, &tank(), 0.0, 0.0);
    editor.toggle_visibility(&id);
    assert_eq!(pick(editor.scene(), Point::new(50.0, 10.0), 20.0, 8.0), PickTarget::Empty);
}

#[test]
fn test_handle_follows_rotation() {
    let mut editor = SceneEditor::default();
    let id = place(&mut editor, &tank(), 0.0, 40.0);

    let handle = rotation_handle_position(editor.scene().instance(&id).unwrap(), 20.0);
    assert!(handle.distance_to(&Point::new(50.0, 20.0)) < 1e-9);

    editor.rotate(&id, 90.0);
    let handle = rotation_handle_position(editor.scene().instance(&id).unwrap(), 20.0);
    assert!(handle.distance_to(&Point::new(80.0, 50.0)) < 1e-9);
}

#[test]
fn test_handle_only_for_selected() {
    let mut editor = SceneEditor::default();
    let id = place(&mut editor, &tank(), 0.0, 40.0);
    let near_handle = Point::new(52.0, 21.0);

    assert_eq!(pick(editor.scene(), near_handle, 20.0, 8.0), PickTarget::Empty);

    editor.select_only(&id);
    assert_eq!(
        pick(editor.scene(), near_handle, 20.0, 8.0),
        PickTarget::RotationHandle(id.clone())
    );
    assert_eq!(
        pick(editor.scene(), Point::new(50.0, 50.0), 20.0, 8.0),
        PickTarget::Instance(id)
    );
    assert_eq!(
        pick(editor.scene(), Point::new(50.0, 30.0), 20.0, 8.0),
        PickTarget::Empty
    );
}

#[test]
fn test_calibration_end_points() {
    let mut editor = SceneEditor::default();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0)
        .unwrap();
    let line = editor.scene().calibration().unwrap();

    assert_eq!(
        pick_calibration_point(line, Point::new(3.0, 4.0), 8.0),
        Some(CalibrationEnd::Start)
    );
    assert_eq!(
        pick_calibration_point(line, Point::new(100.0, 7.0), 8.0),
        Some(CalibrationEnd::End)
    );
    assert_eq!(pick_calibration_point(line, Point::new(50.0, 0.0), 8.0), None);
}
