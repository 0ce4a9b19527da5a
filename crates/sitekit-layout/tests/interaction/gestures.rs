use sitekit_layout::{Feedback, Key, KeyEvent, Modifiers, Point};

use crate::{click, controller, down, place, position, rotation};

#[test]
fn test_drag_commits_one_move() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);

    down(&mut c, 110.0, 105.0);
    assert_eq!(c.pointer_move(Point::new(130.0, 125.0)), Feedback::Updated);
    assert_eq!(c.pointer_move(Point::new(160.0, 155.0)), Feedback::Updated);
    // Live positions are not logged.
    assert_eq!(c.editor().history().undo_depth(), 1);
    assert_eq!(c.pointer_up(Point::new(160.0, 155.0)), Feedback::Committed);

    assert_eq!(position(&c, &tank), Point::new(150.0, 150.0));
    assert_eq!(c.editor().history().undo_depth(), 2);

    assert!(c.undo());
    assert_eq!(position(&c, &tank), Point::new(100.0, 100.0));
}

#[test]
fn test_jitter_below_threshold_does_not_move() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);

    down(&mut c, 110.0, 105.0);
    assert_eq!(c.pointer_move(Point::new(111.0, 105.0)), Feedback::Ignored);
    c.pointer_up(Point::new(111.0, 105.0));
    assert_eq!(position(&c, &tank), Point::new(100.0, 100.0));
    assert_eq!(c.editor().history().undo_depth(), 1);
}

#[test]
fn test_group_drag_moves_by_same_delta() {
    let mut c = controller();
    let a = place(&mut c, "tank", 100.0, 100.0);
    let b = place(&mut c, "tank", 200.0, 100.0);
    c.editor_mut().select_all();

    down(&mut c, 110.0, 105.0);
    c.pointer_move(Point::new(130.0, 125.0));
    assert_eq!(c.pointer_up(Point::new(130.0, 125.0)), Feedback::Committed);

    assert_eq!(position(&c, &a), Point::new(120.0, 120.0));
    assert_eq!(position(&c, &b), Point::new(220.0, 120.0));
    assert_eq!(c.editor().history().undo_description(), Some("Move 2 items"));
}

#[test]
fn test_escape_cancels_drag_without_history() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);

    down(&mut c, 110.0, 105.0);
    c.pointer_move(Point::new(180.0, 180.0));
    assert_ne!(position(&c, &tank), Point::new(100.0, 100.0));

    assert_eq!(c.key_down(KeyEvent::plain(Key::Escape)), Feedback::Updated);
    assert_eq!(position(&c, &tank), Point::new(100.0, 100.0));
    assert!(!c.is_gesture_active());
    assert_eq!(c.pointer_up(Point::new(180.0, 180.0)), Feedback::Ignored);
    assert_eq!(c.editor().history().undo_depth(), 1);
}

#[test]
fn test_rotation_handle_gesture() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);

    // Center (120, 110), half height 10, handle 20 beyond the top edge.
    assert_eq!(down(&mut c, 120.0, 80.0), Feedback::Updated);
    assert!(c.is_gesture_active());
    c.pointer_move(Point::new(170.0, 110.0));
    assert!((rotation(&c, &tank) - 90.0).abs() < 1e-9);
    assert_eq!(c.editor().history().undo_depth(), 1);

    assert_eq!(c.pointer_up(Point::new(170.0, 110.0)), Feedback::Committed);
    assert_eq!(c.editor().history().undo_depth(), 2);

    c.undo();
    assert_eq!(rotation(&c, &tank), 0.0);
}

#[test]
fn test_rotation_snaps_near_multiples_of_45() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);
    down(&mut c, 120.0, 80.0);

    // 87 degrees snaps to 90.
    let dy = 50.0 * 3.0_f64.to_radians().tan();
    c.pointer_move(Point::new(170.0, 110.0 - dy));
    assert_eq!(rotation(&c, &tank), 90.0);

    // 60 degrees is left alone.
    let (sin, cos) = 30.0_f64.to_radians().sin_cos();
    c.pointer_move(Point::new(120.0 + 50.0 * cos, 110.0 - 50.0 * sin));
    assert!((rotation(&c, &tank) - 60.0).abs() < 1e-9);
    c.pointer_up(Point::new(120.0 + 50.0 * cos, 110.0 - 50.0 * sin));
}

#[test]
fn test_escape_cancels_rotation() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);
    down(&mut c, 120.0, 80.0);
    c.pointer_move(Point::new(70.0, 110.0));
    assert!((rotation(&c, &tank) - 270.0).abs() < 1e-9);

    c.key_down(KeyEvent::plain(Key::Escape));
    assert_eq!(rotation(&c, &tank), 0.0);
    assert_eq!(c.editor().history().undo_depth(), 1);
}

#[test]
fn test_wheel_rotates_selection() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);

    assert_eq!(
        c.wheel(Point::new(110.0, 105.0), 1.0, Modifiers::NONE),
        Feedback::Committed
    );
    assert_eq!(rotation(&c, &tank), 5.0);
    assert_eq!(c.viewport().scale(), 1.0);

    c.wheel(Point::new(110.0, 105.0), -2.0, Modifiers::NONE);
    assert_eq!(rotation(&c, &tank), 355.0);
    assert_eq!(c.editor().history().undo_depth(), 3);
}

#[test]
fn test_wheel_rotation_passes_through_snap_points() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);

    for _ in 0..10 {
        c.wheel(Point::new(0.0, 0.0), 1.0, Modifiers::NONE);
    }
    assert_eq!(rotation(&c, &tank), 50.0);
}

#[test]
fn test_wheel_zooms_without_selection() {
    let mut c = controller();
    let cursor = Point::new(300.0, 200.0);
    let world = c.viewport().screen_to_world(cursor);

    assert_eq!(c.wheel(cursor, 1.0, Modifiers::NONE), Feedback::Updated);
    assert!((c.viewport().scale() - 1.05).abs() < 1e-12);
    assert!(c.viewport().screen_to_world(cursor).distance_to(&world) < 1e-9);
}

#[test]
fn test_ctrl_wheel_zooms_with_selection() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    click(&mut c, 110.0, 105.0);

    c.wheel(Point::new(0.0, 0.0), 1.0, Modifiers::CTRL);
    assert_eq!(rotation(&c, &tank), 0.0);
    assert!((c.viewport().scale() - 1.05).abs() < 1e-12);
}

#[test]
fn test_wheel_zooms_in_pan_mode() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    c.set_mode(sitekit_layout::ToolMode::Pan);
    c.editor_mut().select_all();

    c.wheel(Point::new(0.0, 0.0), -1.0, Modifiers::NONE);
    assert_eq!(rotation(&c, &tank), 0.0);
    assert!((c.viewport().scale() - 0.95).abs() < 1e-12);
}

#[test]
fn test_undo_during_drag_cancels_it_first() {
    let mut c = controller();
    let tank = place(&mut c, "tank", 100.0, 100.0);
    down(&mut c, 110.0, 105.0);
    c.pointer_move(Point::new(200.0, 200.0));

    assert!(c.undo());
    assert!(!c.is_gesture_active());
    assert!(c.editor().scene().instance(&tank).is_none());
}
