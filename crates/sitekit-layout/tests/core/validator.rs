use sitekit_layout::{
    find_conflicts, validate_placement, Bounds, EquipmentTemplate, InstanceId, PlacementCandidate,
    PlacementOutcome, Point, SceneEditor,
};

fn editor_with(template: EquipmentTemplate) -> (SceneEditor, InstanceId) {
    let mut editor = SceneEditor::default();
    let id = editor
        .place(&template, Point::new(0.0, 0.0))
        .placed_id()
        .cloned()
        .unwrap();
    (editor, id)
}

fn candidate(x: f64, min_spacing: f64) -> PlacementCandidate {
    PlacementCandidate {
        bounds: Bounds::from_rect(x, 0.0, 10.0, 10.0),
        min_spacing,
    }
}

#[test]
fn test_touching_boxes_do_not_conflict() {
    let (editor, _) = editor_with(EquipmentTemplate::rectangle("a", "A", 10.0, 10.0));
    let existing = editor.scene().instances();
    assert!(validate_placement(&candidate(10.0, 0.0), existing, &[], 1.0).is_ok());
    assert!(validate_placement(&candidate(9.5, 0.0), existing, &[], 1.0).is_err());
}

#[test]
fn test_candidate_spacing_is_enforced() {
    let (editor, id) = editor_with(EquipmentTemplate::rectangle("a", "A", 10.0, 10.0));
    let existing = editor.scene().instances();

    assert!(validate_placement(&candidate(10.5, 0.0), existing, &[], 1.0).is_ok());
    let rejection = validate_placement(&candidate(10.5, 1.0), existing, &[], 1.0).unwrap_err();
    assert_eq!(rejection.conflicting_id, id);
    assert_eq!(rejection.required_spacing_px, 1.0);
    assert_eq!(rejection.to_string(), "Too close to A (needs 1.0 px clearance)");
}

#[test]
fn test_larger_spacing_wins() {
    let (editor, _) =
        editor_with(EquipmentTemplate::rectangle("a", "A", 10.0, 10.0).with_min_spacing(2.0));
    let existing = editor.scene().instances();

    assert!(validate_placement(&candidate(11.5, 0.0), existing, &[], 1.0).is_err());
    assert!(validate_placement(&candidate(12.5, 0.0), existing, &[], 1.0).is_ok());
}

#[test]
fn test_spacing_scales_with_calibration() {
    let (editor, _) =
        editor_with(EquipmentTemplate::rectangle("a", "A", 10.0, 10.0).with_min_spacing(2.0));
    let existing = editor.scene().instances();
    // Two units at three pixels per unit.
    let rejection = validate_placement(&candidate(15.0, 0.0), existing, &[], 3.0).unwrap_err();
    assert_eq!(rejection.required_spacing_px, 6.0);
}

#[test]
fn test_ignored_ids_are_skipped() {
    let (editor, id) = editor_with(EquipmentTemplate::rectangle("a", "A", 10.0, 10.0));
    let existing = editor.scene().instances();
    assert!(validate_placement(&candidate(0.0, 0.0), existing, &[id], 1.0).is_ok());
}

#[test]
fn test_overlap_message_without_spacing() {
    let mut editor = SceneEditor::default();
    let t = EquipmentTemplate::rectangle("a", "A", 10.0, 10.0);
    editor.place(&t, Point::new(0.0, 0.0));
    match editor.place(&t, Point::new(5.0, 5.0)) {
        PlacementOutcome::Rejected(rejection) => assert_eq!(rejection.to_string(), "Overlaps A"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_find_conflicts_reports_pairs_once() {
    let mut editor = SceneEditor::default();
    let t = EquipmentTemplate::rectangle("a", "A", 10.0, 10.0);
    let ids: Vec<InstanceId> = [0.0, 20.0, 40.0]
        .iter()
        .map(|x| {
            editor
                .place(&t, Point::new(*x, 0.0))
                .placed_id()
                .cloned()
                .unwrap()
        })
        .collect();
    assert!(find_conflicts(editor.scene().instances(), 1.0).is_empty());

    editor.move_to(&ids[2], Point::new(5.0, 0.0));
    let conflicts = find_conflicts(editor.scene().instances(), 1.0);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].first, ids[0]);
    assert_eq!(conflicts[0].second, ids[2]);
}
