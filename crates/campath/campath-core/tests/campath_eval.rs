use approx::assert_abs_diff_eq;
use campath_core::{
    euler_to_quaternion, CamPath, CamPathError, Keyframe, RotationInterp, ScalarInterp,
    UnitQuaternion, Vector3,
};

fn kf(time: f64, x: f64, yaw: f64, fov: f64) -> Keyframe {
    Keyframe::new(
        time,
        Vector3::new(x, 2.0 * x, -x),
        euler_to_quaternion(0.0, yaw, 0.0),
        fov,
    )
}

fn four_keyframe_path() -> CamPath {
    let mut path = CamPath::new();
    path.set_keyframes(vec![
        kf(0.0, 0.0, 0.0, 90.0),
        kf(1.0, 10.0, 45.0, 80.0),
        kf(2.5, 15.0, 100.0, 70.0),
        kf(4.0, 30.0, 170.0, 75.0),
    ])
    .unwrap();
    path
}

fn set_linear(path: &mut CamPath) {
    path.set_position_interpolation(ScalarInterp::Linear);
    path.set_fov_interpolation(ScalarInterp::Linear);
    path.set_rotation_interpolation(RotationInterp::SLinear);
}

#[test]
fn defaults_to_cubic_family() {
    let path = CamPath::new();
    assert_eq!(path.position_interpolation(), ScalarInterp::Cubic);
    assert_eq!(path.fov_interpolation(), ScalarInterp::Cubic);
    assert_eq!(path.rotation_interpolation(), RotationInterp::SCubic);
}

#[test]
fn clamps_to_boundary_samples_in_both_modes() {
    for linear in [false, true] {
        let mut path = four_keyframe_path();
        if linear {
            set_linear(&mut path);
        }
        let first = path.keyframes()[0].clone();
        let last = path.keyframes()[3].clone();

        let before = path.evaluate(-100.0).unwrap();
        assert_eq!(before.position, first.position);
        assert_eq!(before.fov, first.fov);
        assert_abs_diff_eq!(before.rotation.angle_to(&first.rotation), 0.0, epsilon = 1e-6);
        assert_eq!(before, path.evaluate(0.0).unwrap());

        let after = path.evaluate(100.0).unwrap();
        assert_eq!(after.position, last.position);
        assert_eq!(after.fov, last.fov);
        assert_abs_diff_eq!(after.rotation.angle_to(&last.rotation), 0.0, epsilon = 1e-6);
        assert_eq!(after, path.evaluate(4.0).unwrap());
    }
}

#[test]
fn cubic_needs_four_keyframes() {
    let mut path = CamPath::new();
    for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
        path.add_keyframe(t, Vector3::zeros(), UnitQuaternion::identity(), 90.0 + i as f64)
            .unwrap();
    }
    assert!(!path.can_evaluate());
    assert_eq!(
        path.evaluate(0.5),
        Err(CamPathError::InsufficientKeyframes {
            channel: "position".into(),
            required: 4,
            available: 3,
        })
    );

    path.add_keyframe(3.0, Vector3::zeros(), UnitQuaternion::identity(), 95.0)
        .unwrap();
    assert!(path.can_evaluate());
    assert!(path.evaluate(0.5).is_ok());
}

#[test]
fn rotation_mode_alone_can_block_evaluation() {
    let mut path = four_keyframe_path();
    path.remove_keyframe(3).unwrap();
    path.set_position_interpolation(ScalarInterp::Linear);
    path.set_fov_interpolation(ScalarInterp::Linear);
    match path.evaluate(1.0) {
        Err(CamPathError::InsufficientKeyframes { channel, .. }) => assert_eq!(channel, "rotation"),
        other => panic!("expected rotation shortfall, got {other:?}"),
    }
    path.set_rotation_interpolation(RotationInterp::SLinear);
    assert!(path.can_evaluate());
}

#[test]
fn near_duplicate_times_keep_the_later_keyframe() {
    let mut path = CamPath::new();
    set_linear(&mut path);
    path.add_keyframe(0.0, Vector3::zeros(), UnitQuaternion::identity(), 90.0)
        .unwrap();
    path.add_keyframe(5.0, Vector3::new(1.0, 0.0, 0.0), UnitQuaternion::identity(), 60.0)
        .unwrap();
    path.add_keyframe(5.0000001, Vector3::new(2.0, 0.0, 0.0), UnitQuaternion::identity(), 50.0)
        .unwrap();

    assert_eq!(path.len(), 2);
    assert!(path.can_evaluate());
    let end = path.evaluate(6.0).unwrap();
    assert_eq!(end.fov, 50.0);
    assert_eq!(end.position.x, 2.0);
}

#[test]
fn near_duplicates_do_not_count_towards_cubic_minimum() {
    let mut path = CamPath::new();
    path.set_keyframes(vec![
        kf(0.0, 0.0, 0.0, 90.0),
        kf(1.0, 1.0, 10.0, 90.0),
        kf(1.0000001, 2.0, 20.0, 90.0),
        kf(2.0, 3.0, 30.0, 90.0),
    ])
    .unwrap();
    assert_eq!(path.len(), 3);
    assert!(!path.can_evaluate());
}

#[test]
fn cubic_and_linear_agree_on_knots_but_not_between() {
    let mut cubic = four_keyframe_path();
    let mut linear = four_keyframe_path();
    set_linear(&mut linear);

    for t in [0.0, 1.0, 2.5, 4.0] {
        let a = cubic.evaluate(t).unwrap();
        let b = linear.evaluate(t).unwrap();
        assert_abs_diff_eq!(a.position, b.position, epsilon = 1e-9);
        assert_abs_diff_eq!(a.fov, b.fov, epsilon = 1e-9);
        assert_abs_diff_eq!(a.rotation.angle_to(&b.rotation), 0.0, epsilon = 1e-6);
    }
    let a = cubic.evaluate(1.7).unwrap();
    let b = linear.evaluate(1.7).unwrap();
    assert!((a.position - b.position).norm() > 1e-3);
}

#[test]
fn deserialized_non_unit_rotations_evaluate_unit_norm() {
    let json = r#"[
        { "time": 0.0, "position": [0, 0, 0], "rotation": [0, 0, 0, 2], "fov": 60 },
        { "time": 1.0, "position": [1, 0, 0], "rotation": [0, 0, 3, 3], "fov": 60 },
        { "time": 2.0, "position": [2, 0, 0], "rotation": [0, 0, 0, 2], "fov": 60 },
        { "time": 3.0, "position": [3, 0, 0], "rotation": [0, 0.5, 0, 0.5], "fov": 60 }
    ]"#;
    let keyframes: Vec<Keyframe> = serde_json::from_str(json).unwrap();
    let mut path = CamPath::new();
    path.set_keyframes(keyframes).unwrap();
    for t in [-1.0, 0.0, 0.5, 1.0, 2.0, 2.5, 3.0, 4.0] {
        let sample = path.evaluate(t).unwrap();
        assert_abs_diff_eq!(sample.rotation.quaternion().norm(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn samples_stay_unit_norm() {
    let mut path = four_keyframe_path();
    for step in 0..=80 {
        let sample = path.evaluate(step as f64 * 0.05).unwrap();
        assert_abs_diff_eq!(sample.rotation.quaternion().norm(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn mutations_and_mode_changes_mark_dirty() {
    let mut path = four_keyframe_path();
    assert!(path.is_dirty());
    path.evaluate(1.0).unwrap();
    assert!(!path.is_dirty());

    path.set_fov_interpolation(ScalarInterp::Cubic);
    assert!(!path.is_dirty(), "unchanged mode leaves the build alone");
    path.set_fov_interpolation(ScalarInterp::Linear);
    assert!(path.is_dirty());
    path.evaluate(1.0).unwrap();

    path.add_keyframe(5.0, Vector3::zeros(), UnitQuaternion::identity(), 60.0)
        .unwrap();
    assert!(path.is_dirty());
    let sample = path.evaluate(10.0).unwrap();
    assert_eq!(sample.fov, 60.0);

    path.clear();
    assert!(path.is_dirty());
    assert!(!path.can_evaluate());
}

#[test]
fn offset_shifts_path_time() {
    let mut path = four_keyframe_path();
    let local = path.evaluate(1.5).unwrap();
    path.set_offset(8.0).unwrap();

    assert_eq!(path.lower_bound(), Some(8.0));
    assert_eq!(path.upper_bound(), Some(12.0));
    assert_eq!(path.duration(), Some(4.0));
    assert_eq!(path.evaluate(9.5).unwrap(), local);

    path.add_keyframe(13.0, Vector3::zeros(), UnitQuaternion::identity(), 60.0)
        .unwrap();
    assert_eq!(path.keyframes().last().map(|k| k.time), Some(5.0));
    assert!(path.set_offset(f64::INFINITY).is_err());
}

#[test]
fn empty_path_has_no_bounds() {
    let mut path = CamPath::new();
    assert_eq!(path.lower_bound(), None);
    assert_eq!(path.duration(), None);
    assert!(path.evaluate(0.0).is_err());
}

#[test]
fn nan_time_is_rejected() {
    let mut path = four_keyframe_path();
    assert!(matches!(
        path.evaluate(f64::NAN),
        Err(CamPathError::InvalidTime { .. })
    ));
    assert!(matches!(
        path.add_keyframe(f64::NAN, Vector3::zeros(), UnitQuaternion::identity(), 1.0),
        Err(CamPathError::InvalidTime { .. })
    ));
}

#[test]
fn selected_flag_follows_and_rule() {
    let mut path = four_keyframe_path();
    path.set_selected(1, true).unwrap();
    path.set_selected(2, true).unwrap();
    assert!(!path.evaluate(0.5).unwrap().selected);
    assert!(path.evaluate(1.0).unwrap().selected);
    assert!(path.evaluate(2.0).unwrap().selected);
    assert!(!path.evaluate(3.0).unwrap().selected);
}

#[test]
fn angular_velocity_is_zero_at_rest_ends() {
    let mut path = four_keyframe_path();
    assert_abs_diff_eq!(path.angular_velocity(0.0).unwrap(), Vector3::zeros(), epsilon = 1e-12);
    assert_abs_diff_eq!(path.angular_velocity(4.0).unwrap(), Vector3::zeros(), epsilon = 1e-9);
    assert!(path.angular_velocity(2.0).unwrap().z > 0.0);
}

#[test]
fn selection_edits_only_touch_the_selection() {
    let mut path = four_keyframe_path();
    assert_eq!(path.select_range(0.5, 2.5), 2);
    assert_eq!(path.select_range(0.0, 2.5), 1);
    assert_eq!(path.selected_count(), 3);

    path.select_none();
    path.set_selected(3, true).unwrap();
    path.set_fov(45.0);
    let fovs: Vec<f64> = path.keyframes().iter().map(|k| k.fov).collect();
    assert_eq!(fovs, vec![90.0, 80.0, 70.0, 45.0]);

    path.set_start(6.0).unwrap();
    assert_eq!(path.upper_bound(), Some(6.0));

    path.select_invert();
    assert_eq!(path.selected_count(), 3);
    assert_eq!(path.remove_selected(), 3);
    assert_eq!(path.len(), 1);
}

#[test]
fn bulk_time_edits_rescale_everything_without_selection() {
    let mut path = four_keyframe_path();
    path.set_duration(8.0).unwrap();
    let times: Vec<f64> = path.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 2.0, 5.0, 8.0]);

    path.set_start(1.0).unwrap();
    assert_eq!(path.lower_bound(), Some(1.0));
    assert_eq!(path.duration(), Some(8.0));
    assert!(path.set_duration(-1.0).is_err());

    path.set_rotation(UnitQuaternion::identity());
    path.set_position(Vector3::new(1.0, 2.0, 3.0));
    let sample = path.evaluate(3.3).unwrap();
    assert_abs_diff_eq!(sample.position, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-9);
    assert_abs_diff_eq!(sample.rotation.angle(), 0.0, epsilon = 1e-6);
}
