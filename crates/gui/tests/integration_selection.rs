//! End-to-end scene and selection scenarios through the headless harness.

use scene_viewer_lib::harness::TestHarness;
use shared::PrimitiveKind;

#[test]
fn test_pick_select_then_delete() {
    let mut h = TestHarness::new();
    let id = h.add(PrimitiveKind::Cube);
    h.tick();

    // Picked through the center of wherever the cube spawned
    let (x, y) = h.screen_point_of(&id).expect("cube projects on screen");
    assert_eq!(h.pick_at(x, y), Some(id.clone()));
    assert_eq!(h.click(x, y), Some(id.clone()));
    assert_eq!(h.selection(), Some(&id));

    assert!(h.delete(&id));
    assert!(h.objects().iter().all(|o| o.id != id));
    assert!(h.selection().is_none());
    assert!(!h.state.selection().has_snapshot());
}

#[test]
fn test_switching_selection_restores_previous() {
    let mut h = TestHarness::new();
    let a = h.add(PrimitiveKind::Sphere);
    let b = h.add(PrimitiveKind::Cone);
    let a_material = h.object(&a).unwrap().material.clone();
    let b_material = h.object(&b).unwrap().material.clone();

    h.select(&a);
    assert!(h.object(&a).unwrap().material.is_highlighted());

    h.select(&b);
    assert_eq!(h.object(&a).unwrap().material, a_material);
    assert!(h.object(&b).unwrap().material.is_highlighted());
    assert_eq!(h.highlighted_count(), 1);

    h.clear_selection();
    assert_eq!(h.object(&b).unwrap().material, b_material);
    assert_eq!(h.highlighted_count(), 0);
}

#[test]
fn test_reselect_is_idempotent() {
    let mut h = TestHarness::new();
    let id = h.add(PrimitiveKind::Torus);
    let original = h.object(&id).unwrap().material.clone();

    h.select(&id);
    let highlighted = h.object(&id).unwrap().material.clone();
    h.select(&id);
    h.select(&id);

    assert_eq!(h.object(&id).unwrap().material, highlighted);
    h.clear_selection();
    assert_eq!(h.object(&id).unwrap().material, original);
}

#[test]
fn test_select_missing_id_clears() {
    let mut h = TestHarness::new();
    let id = h.add(PrimitiveKind::Cube);
    h.select(&id);
    assert_eq!(h.select("no-such-object"), None);
    assert!(h.selection().is_none());
    assert_eq!(h.highlighted_count(), 0);
}

#[test]
fn test_deleting_other_object_keeps_selection() {
    let mut h = TestHarness::new();
    let keep = h.add(PrimitiveKind::Cube);
    let drop = h.add(PrimitiveKind::Cylinder);
    h.select(&keep);

    assert!(h.delete(&drop));
    assert_eq!(h.selection(), Some(&keep));
    assert!(h.object(&keep).unwrap().material.is_highlighted());
}

#[test]
fn test_recolor_selected_survives_deselect() {
    let mut h = TestHarness::new();
    let id = h.add(PrimitiveKind::Sphere);
    h.select(&id);
    assert!(h.state.set_color(&id, [0.1, 0.2, 0.3]));
    assert!(h.object(&id).unwrap().material.is_highlighted());

    h.clear_selection();
    let material = &h.object(&id).unwrap().material;
    assert_eq!(material.color, [0.1, 0.2, 0.3]);
    assert!(!material.is_highlighted());
}

#[test]
fn test_duplicate_copies_unhighlighted_material() {
    let mut h = TestHarness::new();
    let id = h.add(PrimitiveKind::Cube);
    let original = h.object(&id).unwrap().material.clone();
    h.select(&id);

    let copy = h.duplicate(&id).expect("duplicate");
    assert_ne!(copy, id);
    assert_eq!(h.object(&copy).unwrap().material, original);
    assert_eq!(h.object(&copy).unwrap().name, format!("{} Copy", h.object(&id).unwrap().name));
    assert_eq!(h.object_count(), 2);
}

#[test]
fn test_hidden_object_cannot_be_picked_but_stays_selected() {
    let mut h = TestHarness::new();
    let id = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    let (x, y) = h.screen_point_of(&id).unwrap();
    h.select(&id);

    assert!(h.hide(&id));
    assert_eq!(h.pick_at(x, y), None);
    assert_eq!(h.selection(), Some(&id));

    assert!(h.show(&id));
    assert_eq!(h.pick_at(x, y), Some(id));
}

#[test]
fn test_nearest_object_wins_pick() {
    let mut h = TestHarness::new();
    let far = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    let (x, y) = h.screen_point_of(&far).unwrap();

    // Halfway between the target and the default camera position
    let near = h.add_at(PrimitiveKind::Cube, [3.0, 2.5, 4.0]);
    let (nx, ny) = h.screen_point_of(&near).unwrap();
    assert!((nx - x).abs() < 1.0 && (ny - y).abs() < 1.0);

    assert_eq!(h.pick_at(x, y), Some(near.clone()));
    h.state.scene.set_selectable(&near, false);
    assert_eq!(h.pick_at(x, y), Some(far));
}

#[test]
fn test_coincident_objects_pick_first_inserted() {
    let mut h = TestHarness::new();
    let first = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    let _second = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    let (x, y) = h.screen_point_of(&first).unwrap();

    for _ in 0..5 {
        assert_eq!(h.pick_at(x, y), Some(first.clone()));
    }
}

#[test]
fn test_click_empty_space_clears_selection() {
    let mut h = TestHarness::new();
    let id = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    h.select(&id);
    assert_eq!(h.click(1.0, 1.0), None);
    assert!(h.selection().is_none());
}
