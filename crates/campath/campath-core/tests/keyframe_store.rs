use campath_core::{CamPathError, Keyframe, KeyframeStore, UnitQuaternion, Vector3};

fn kf(time: f64, fov: f64) -> Keyframe {
    Keyframe::new(time, Vector3::zeros(), UnitQuaternion::identity(), fov)
}

fn times(store: &KeyframeStore) -> Vec<f64> {
    store.keyframes().iter().map(|k| k.time).collect()
}

#[test]
fn insert_replaces_neighbour_on_either_side() {
    let mut store = KeyframeStore::default();
    store.replace_all(vec![kf(0.0, 1.0), kf(1.0, 2.0), kf(2.0, 3.0)]).unwrap();

    // Just below an existing time.
    assert_eq!(store.insert(kf(0.9999999, 20.0)).unwrap(), 1);
    // Just above one.
    assert_eq!(store.insert(kf(2.0000005, 30.0)).unwrap(), 2);

    assert_eq!(store.len(), 3);
    let fovs: Vec<f64> = store.keyframes().iter().map(|k| k.fov).collect();
    assert_eq!(fovs, vec![1.0, 20.0, 30.0]);
    assert_eq!(times(&store), vec![0.0, 0.9999999, 2.0000005]);
}

#[test]
fn insert_never_leaves_times_within_epsilon() {
    let mut store = KeyframeStore::default();
    store.insert(kf(0.0, 1.0)).unwrap();
    store.insert(kf(1.5e-6, 2.0)).unwrap();
    store.insert(kf(5.0, 3.0)).unwrap();
    assert_eq!(store.len(), 3);

    // Within epsilon of both 0.0 and 1.5e-6.
    assert_eq!(store.insert(kf(0.8e-6, 4.0)).unwrap(), 0);
    assert_eq!(times(&store), vec![0.8e-6, 5.0]);
    assert_eq!(store.keyframes()[0].fov, 4.0);
    for pair in store.keyframes().windows(2) {
        assert!(pair[1].time - pair[0].time >= store.epsilon());
    }
}

#[test]
fn replace_all_sorts_and_later_entries_win() {
    let mut store = KeyframeStore::default();
    store
        .replace_all(vec![kf(3.0, 1.0), kf(1.0, 2.0), kf(3.0000001, 3.0), kf(2.0, 4.0)])
        .unwrap();
    assert_eq!(times(&store), vec![1.0, 2.0, 3.0000001]);
    assert_eq!(store.keyframes()[2].fov, 3.0);
}

#[test]
fn replace_all_rejects_bad_times_without_touching_the_store() {
    let mut store = KeyframeStore::default();
    store.insert(kf(1.0, 1.0)).unwrap();
    let revision = store.revision();
    assert!(matches!(
        store.replace_all(vec![kf(0.0, 0.0), kf(f64::INFINITY, 0.0)]),
        Err(CamPathError::InvalidTime { .. })
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.revision(), revision);
}

#[test]
fn remove_out_of_range_is_an_error() {
    let mut store = KeyframeStore::default();
    store.insert(kf(1.0, 1.0)).unwrap();
    assert_eq!(
        store.remove(3),
        Err(CamPathError::KeyframeOutOfRange { index: 3, len: 1 })
    );
    assert_eq!(store.remove(0).unwrap().fov, 1.0);
    assert!(store.is_empty());
    assert_eq!(store.time_range(), None);
}

#[test]
fn every_mutation_bumps_revision() {
    let mut store = KeyframeStore::default();
    let mut last = store.revision();
    let mut bumped = |store: &KeyframeStore| {
        let changed = store.revision() != last;
        last = store.revision();
        changed
    };

    store.insert(kf(0.0, 1.0)).unwrap();
    assert!(bumped(&store));
    store.insert(kf(1.0, 1.0)).unwrap();
    assert!(bumped(&store));
    store.select_all();
    assert!(bumped(&store));
    store.set_selected(0, true).unwrap();
    assert!(!bumped(&store), "no-op selection keeps the revision");
    store.set_fov(10.0);
    assert!(bumped(&store));
    store.clear();
    assert!(bumped(&store));
}

#[test]
fn time_edits_that_collide_are_coalesced() {
    let mut store = KeyframeStore::default();
    store
        .replace_all(vec![kf(0.0, 1.0), kf(1.0, 2.0), kf(2.0, 3.0)])
        .unwrap();
    store.set_selected(2, true).unwrap();
    store.set_start(1.0).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.keyframes()[1].fov, 3.0);
}

#[test]
fn set_duration_scales_selection_about_its_start() {
    let mut store = KeyframeStore::default();
    store
        .replace_all(vec![kf(0.0, 1.0), kf(2.0, 2.0), kf(3.0, 3.0), kf(4.0, 4.0)])
        .unwrap();
    store.select_range(2.0, 4.0);
    store.set_duration(1.0).unwrap();
    assert_eq!(times(&store), vec![0.0, 2.0, 2.5, 3.0]);

    // Zero-span edit sets are left alone.
    store.select_none();
    store.set_selected(0, true).unwrap();
    store.set_duration(5.0).unwrap();
    assert_eq!(times(&store), vec![0.0, 2.0, 2.5, 3.0]);
}

#[test]
fn changing_epsilon_recoalesces() {
    let mut store = KeyframeStore::default();
    store
        .replace_all(vec![kf(0.0, 1.0), kf(0.01, 2.0), kf(1.0, 3.0)])
        .unwrap();
    assert_eq!(store.len(), 3);
    store.set_epsilon(0.1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.keyframes()[0].fov, 2.0);
}
