//! Multi-viewer grids.

use neuroscope_rs::*;

fn neurite(entity: &str, x: f32) -> Visual {
    Visual::new(
        Part::Body,
        Geometry::polyline(vec![Vec3::new(x, 0.0, 0.0), Vec3::new(x, 1.0, 0.0)]),
    )
    .with_entity(entity)
}

fn soma(entity: &str, x: f32) -> Visual {
    Visual::new(
        Part::Soma,
        Geometry::Points {
            positions: vec![Vec3::new(x, 0.0, 0.0)],
            size: 4.0,
        },
    )
    .with_entity(entity)
}

fn grid(rows: usize, cols: usize, linked: bool) -> Browser {
    Browser::new(rows, cols, linked, || Viewer::headless(120, 90)).unwrap()
}

fn entities(browser: &Browser, index: usize) -> Vec<EntityId> {
    browser.viewer(index).unwrap().registry().entity_ids()
}

#[test]
fn test_grid_layout() {
    let browser = grid(2, 3, false);
    assert_eq!(browser.len(), 6);
    assert_eq!(browser.grid(), (2, 3));
    assert_eq!(browser.cell(4), Some((1, 1)));
    assert_eq!(browser.cell(6), None);

    assert!(matches!(
        Browser::new(0, 2, false, || Viewer::headless(10, 10)),
        Err(ViewerError::InvalidInput(_))
    ));
}

#[test]
fn test_add_to_single_viewer() {
    let mut browser = grid(1, 2, false);
    browser
        .add(vec![neurite("A", 0.0)], 1, &AddOptions::default())
        .unwrap();
    assert!(browser.get_visuals(0).unwrap().is_empty());
    assert_eq!(browser.get_visuals(1).unwrap().len(), 1);
    assert!(browser.add(vec![neurite("B", 0.0)], 5, &AddOptions::default()).is_err());
    assert!(browser.get_visuals(5).is_err());
}

#[test]
fn test_add_to_all_duplicates_visuals() {
    let mut browser = grid(1, 3, false);
    browser
        .add_to_all(&[neurite("A", 0.0), soma("A", 0.0)], &AddOptions::default())
        .unwrap();

    for i in 0..3 {
        assert_eq!(browser.get_visuals(i).unwrap().len(), 2);
    }
    let first = browser.get_visuals(0).unwrap()[0].object_id();
    let second = browser.get_visuals(1).unwrap()[0].object_id();
    assert_ne!(first, second);

    assert!(matches!(
        browser.add_to_all(&[], &AddOptions::default()),
        Err(ViewerError::NoVisualsGenerated)
    ));
}

#[test]
fn test_add_and_divide_keeps_entities_together() {
    let mut browser = grid(1, 2, false);
    browser
        .add_and_divide(
            vec![
                neurite("A", 0.0),
                neurite("B", 1.0),
                soma("A", 0.0),
                neurite("C", 2.0),
            ],
            &AddOptions::default(),
        )
        .unwrap();

    assert_eq!(
        entities(&browser, 0),
        vec![EntityId::from("A"), EntityId::from("C")]
    );
    assert_eq!(entities(&browser, 1), vec![EntityId::from("B")]);
    assert_eq!(browser.get_visuals(0).unwrap().len(), 3);
}

#[test]
fn test_linked_cameras_follow_first() {
    let mut browser = grid(1, 2, true);
    browser
        .add(vec![neurite("A", 0.0)], 0, &AddOptions::default())
        .unwrap();
    browser
        .navigate(0, |camera| camera.set_view(ViewPreset::Yz))
        .unwrap();

    let first = browser.viewer(0).unwrap().camera().state();
    let second = browser.viewer(1).unwrap().camera().state();
    assert_eq!(first, second);
}

#[test]
fn test_linked_navigation_propagates_orbit_and_zoom() {
    let mut browser = grid(1, 3, true);
    browser
        .add(vec![neurite("A", 0.0)], 0, &AddOptions::default())
        .unwrap();
    let before = browser.viewer(2).unwrap().camera().state();
    browser
        .navigate(1, |camera| {
            camera.orbit(0.3, 0.1);
            camera.zoom(1.0);
            camera.pan(0.05, 0.0);
        })
        .unwrap();

    let moved = browser.viewer(1).unwrap().camera().state();
    assert_ne!(moved, before);
    assert!(moved.distance < before.distance);
    for i in [0, 2] {
        assert_eq!(browser.viewer(i).unwrap().camera().state(), moved);
    }
}

#[test]
fn test_unlinked_cameras_are_independent() {
    let mut browser = grid(1, 2, false);
    let before = browser.viewer(1).unwrap().camera().state();
    browser
        .navigate(0, |camera| camera.set_view(ViewPreset::Yz))
        .unwrap();
    assert_eq!(browser.viewer(1).unwrap().camera().state(), before);

    browser.set_linked(true);
    assert!(browser.is_linked());
    assert_eq!(
        browser.viewer(1).unwrap().camera().state(),
        browser.viewer(0).unwrap().camera().state()
    );
}

#[test]
fn test_clear_empties_every_viewer() {
    let mut browser = grid(2, 1, false);
    browser
        .add_to_all(&[neurite("A", 0.0)], &AddOptions::default())
        .unwrap();
    browser.center_camera(1).unwrap();
    browser.clear();
    assert!(entities(&browser, 0).is_empty());
    assert!(entities(&browser, 1).is_empty());
}
