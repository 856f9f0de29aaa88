//! JSON command batches against the headless harness.

use scene_viewer_lib::command::execute_json_batch;
use scene_viewer_lib::harness::TestHarness;

#[test]
fn test_batch_add_select_delete() {
    let mut h = TestHarness::new();
    let responses = execute_json_batch(
        &mut h,
        r#"[
            {"command": "add_object", "kind": "cube", "transform": {"position": [0, 0, 0]}},
            {"command": "add_object", "kind": "sphere"},
            {"command": "select", "id": "obj-1"},
            {"command": "delete_object", "id": "obj-1"},
            {"command": "get_selection"},
            {"command": "list_objects"}
        ]"#,
    )
    .unwrap();

    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[2].data.as_ref().unwrap()["selected"], "obj-1");
    assert!(responses[4].data.as_ref().unwrap()["selected"].is_null());
    let list = responses[5].data.as_ref().unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["objects"][0]["id"], "obj-2");
}

#[test]
fn test_batch_pointer_zoom_and_tick() {
    let mut h = TestHarness::new();
    h.state.settings.camera.damping_enabled = false;
    h.viewport.configure(&h.state.settings.camera);
    let before = h.camera_radius();

    let responses = execute_json_batch(
        &mut h,
        r#"[
            {"command": "pointer", "action": "wheel", "delta_y": -1},
            {"command": "pointer", "action": "wheel", "delta_y": -1},
            {"command": "tick"}
        ]"#,
    )
    .unwrap();

    let tick = responses[2].data.as_ref().unwrap();
    assert_eq!(tick["moving"], false);
    let radius = tick["radius"].as_f64().unwrap() as f32;
    assert!((radius - before * 0.95 * 0.95).abs() < 1e-3);
}

#[test]
fn test_batch_pick_does_not_select() {
    let mut h = TestHarness::new();
    let id = h.add_at(shared::PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    let (x, y) = h.screen_point_of(&id).unwrap();

    let responses = execute_json_batch(
        &mut h,
        &format!(r#"[{{"command": "pick", "x": {x}, "y": {y}}}, {{"command": "get_selection"}}]"#),
    )
    .unwrap();

    assert_eq!(responses[0].data.as_ref().unwrap()["hit"], id.as_str());
    assert!(responses[1].data.as_ref().unwrap()["selected"].is_null());
}

#[test]
fn test_batch_export_into_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut h = TestHarness::new();
    let json = serde_json::json!([
        {"command": "add_object", "kind": "torus"},
        {"command": "export_frame", "dir": dir.path(), "multiplier": 1.0}
    ])
    .to_string();

    let responses = execute_json_batch(&mut h, &json).unwrap();
    assert!(responses[1].success, "{:?}", responses[1].error);
    let path = responses[1].data.as_ref().unwrap()["path"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&path).is_file());
}

#[test]
fn test_batch_errors_do_not_stop_the_batch() {
    let mut h = TestHarness::new();
    let responses = execute_json_batch(
        &mut h,
        r#"[
            {"command": "set_color", "id": "ghost", "color": [1, 0, 0]},
            {"command": "add_object", "kind": "cone"}
        ]"#,
    )
    .unwrap();
    assert!(!responses[0].success);
    assert!(responses[1].success);
    assert_eq!(h.object_count(), 1);
}

#[test]
fn test_batch_rejects_unknown_command() {
    let mut h = TestHarness::new();
    assert!(execute_json_batch(&mut h, r#"[{"command": "explode"}]"#).is_err());
}
