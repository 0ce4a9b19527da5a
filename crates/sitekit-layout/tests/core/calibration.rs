use sitekit_core::CalibrationError;
use sitekit_layout::{
    CalibrationSession, CalibrationStep, EquipmentTemplate, Point, SceneEditor,
};

#[test]
fn test_two_click_protocol() {
    let mut session = CalibrationSession::default();
    assert!(session.is_idle());

    assert_eq!(session.click(Point::new(0.0, 0.0)), Ok(CalibrationStep::Started));
    assert!(session.start_point().is_some());

    let step = session.click(Point::new(100.0, 0.0)).unwrap();
    assert_eq!(step, CalibrationStep::LengthRequested { pixel_distance: 100.0 });
    assert!(session.is_awaiting_length());

    let line = session.confirm(50.0).unwrap();
    assert_eq!(line.units_per_pixel, 2.0);
    assert_eq!(line.real_world_distance, 50.0);
    assert!(session.is_idle());
}

#[test]
fn test_zero_length_second_click_keeps_start() {
    let mut session = CalibrationSession::default();
    session.click(Point::new(5.0, 5.0)).unwrap();
    assert_eq!(
        session.click(Point::new(5.0, 5.0)),
        Err(CalibrationError::ZeroLength)
    );
    assert!(!session.is_awaiting_length());
    assert_eq!(
        session.start_point().map(|p| p.position()),
        Some(Point::new(5.0, 5.0))
    );
}

#[test]
fn test_non_positive_length_keeps_candidate() {
    let mut session = CalibrationSession::default();
    session.click(Point::new(0.0, 0.0)).unwrap();
    session.click(Point::new(0.0, 30.0)).unwrap();

    assert_eq!(
        session.confirm(0.0),
        Err(CalibrationError::NonPositiveDistance { distance: 0.0 })
    );
    assert!(matches!(
        session.confirm(-3.0),
        Err(CalibrationError::NonPositiveDistance { .. })
    ));
    assert!(session.is_awaiting_length());

    let line = session.confirm(10.0).unwrap();
    assert_eq!(line.units_per_pixel, 3.0);
}

#[test]
fn test_begin_overwrites_pending_start() {
    let mut session = CalibrationSession::default();
    session.begin(Point::new(1.0, 1.0));
    session.begin(Point::new(9.0, 9.0));
    assert_eq!(
        session.start_point().map(|p| p.position()),
        Some(Point::new(9.0, 9.0))
    );
}

#[test]
fn test_clicks_ignored_while_awaiting_length() {
    let mut session = CalibrationSession::default();
    session.click(Point::new(0.0, 0.0)).unwrap();
    session.click(Point::new(10.0, 0.0)).unwrap();
    assert_eq!(session.click(Point::new(50.0, 50.0)), Ok(CalibrationStep::Ignored));
    assert_eq!(
        session.end_point().map(|p| p.position()),
        Some(Point::new(10.0, 0.0))
    );
}

#[test]
fn test_confirm_without_candidate() {
    let mut session = CalibrationSession::default();
    assert_eq!(session.confirm(10.0), Err(CalibrationError::NothingPending));
    session.click(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(session.confirm(10.0), Err(CalibrationError::NothingPending));
}

#[test]
fn test_cancel_returns_to_idle() {
    let mut session = CalibrationSession::default();
    session.click(Point::new(0.0, 0.0)).unwrap();
    session.click(Point::new(10.0, 0.0)).unwrap();
    session.cancel();
    assert!(session.is_idle());
    assert!(session.start_point().is_none());
}

fn editor_with_box() -> (SceneEditor, sitekit_layout::InstanceId) {
    let mut editor = SceneEditor::default();
    let template = EquipmentTemplate::rectangle("box", "Box", 5.0, 3.0);
    let id = editor
        .place(&template, Point::new(20.0, 30.0))
        .placed_id()
        .cloned()
        .unwrap();
    (editor, id)
}

#[test]
fn test_calibration_rescales_all_instances_in_one_action() {
    let (mut editor, id) = editor_with_box();
    let template = EquipmentTemplate::circle("silo", "Silo", 2.0);
    let silo = editor
        .place(&template, Point::new(100.0, 100.0))
        .placed_id()
        .cloned()
        .unwrap();
    let depth = editor.history().undo_depth();

    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
        .unwrap();

    assert_eq!(editor.units_per_pixel(), 2.0);
    assert_eq!(editor.history().undo_depth(), depth + 1);

    let instance = editor.scene().instance(&id).unwrap();
    assert_eq!((instance.width, instance.height), (10.0, 6.0));
    assert_eq!((instance.x, instance.y), (20.0, 30.0));

    let silo = editor.scene().instance(&silo).unwrap();
    assert_eq!((silo.width, silo.height), (8.0, 8.0));
}

#[test]
fn test_undo_calibration_restores_ratio_and_sizes() {
    let (mut editor, id) = editor_with_box();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(0.0, 40.0), 10.0)
        .unwrap();
    assert_eq!(editor.scene().instance(&id).unwrap().width, 20.0);

    assert!(editor.undo());
    assert_eq!(editor.units_per_pixel(), 1.0);
    assert!(editor.scene().calibration().is_none());
    assert_eq!(editor.scene().instance(&id).unwrap().width, 5.0);

    assert!(editor.redo());
    assert_eq!(editor.units_per_pixel(), 4.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 20.0);
}

#[test]
fn test_new_calibration_replaces_old() {
    let (mut editor, id) = editor_with_box();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
        .unwrap();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(30.0, 40.0), 5.0)
        .unwrap();
    assert_eq!(editor.units_per_pixel(), 10.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 50.0);

    editor.undo();
    assert_eq!(editor.units_per_pixel(), 2.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 10.0);
}

#[test]
fn test_rejected_calibration_changes_nothing() {
    let (mut editor, id) = editor_with_box();
    let depth = editor.history().undo_depth();
    assert_eq!(
        editor.calibrate(Point::new(3.0, 3.0), Point::new(3.0, 3.0), 10.0),
        Err(CalibrationError::ZeroLength)
    );
    assert!(editor
        .calibrate(Point::new(0.0, 0.0), Point::new(10.0, 0.0), -1.0)
        .is_err());
    assert_eq!(editor.history().undo_depth(), depth);
    assert_eq!(editor.units_per_pixel(), 1.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 5.0);
}

#[test]
fn test_recalibrate_and_clear() {
    let (mut editor, id) = editor_with_box();
    assert_eq!(
        editor.recalibrate(10.0),
        Err(CalibrationError::NothingPending)
    );
    assert!(!editor.clear_calibration());

    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
        .unwrap();
    editor.recalibrate(25.0).unwrap();
    assert_eq!(editor.units_per_pixel(), 4.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 20.0);

    assert!(editor.clear_calibration());
    assert_eq!(editor.units_per_pixel(), 1.0);
    assert_eq!(editor.scene().instance(&id).unwrap().width, 5.0);

    editor.undo();
    assert_eq!(editor.units_per_pixel(), 4.0);
}

#[test]
fn test_placement_after_calibration_uses_ratio() {
    let mut editor = SceneEditor::default();
    editor
        .calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
        .unwrap();
    let template = EquipmentTemplate::rectangle("box", "Box", 5.0, 3.0);
    let id = editor
        .place(&template, Point::new(0.0, 0.0))
        .placed_id()
        .cloned()
        .unwrap();
    let instance = editor.scene().instance(&id).unwrap();
    assert_eq!((instance.width, instance.height), (10.0, 6.0));
}
