//! End-to-end manipulator tests: raw input through the widget's dispatcher
//! into viewer state.

use std::cell::RefCell;
use std::rc::Rc;

use antigenic_map_viewer::config::{KEY_H, KEY_R};
use antigenic_map_viewer::controls::default_bindings;
use antigenic_map_viewer::gesture::MouseButton;
use antigenic_map_viewer::render::HeadlessBackend;
use antigenic_map_viewer::{
    Dimensionality, ManipulatorConfig, MapObject, MapWidget, ModifierKeys, ObjectSet, PlotData,
    RawInput,
};
use glam::{DVec2, DVec3};

const CANVAS: DVec2 = DVec2::new(400.0, 400.0);

fn widget(dimensionality: Dimensionality) -> MapWidget {
    antigenic_map_viewer::init_native_logging();
    let objects = ObjectSet::new(vec![
        MapObject::at(DVec3::new(-2.0, -2.0, 0.0)),
        MapObject::at(DVec3::new(2.0, 2.0, 0.0)),
        MapObject::at(DVec3::new(0.0, 0.0, 0.0)).with_size(2.0),
    ]);
    let mut widget = MapWidget::new(ManipulatorConfig::default(), dimensionality, objects, CANVAS);
    widget.bind_manipulators();
    widget.attach_backend(Box::new(HeadlessBackend::default()));
    widget
}

fn press(x: f64, y: f64, modifiers: ModifierKeys) -> RawInput {
    RawInput::ButtonDown {
        position: DVec2::new(x, y),
        button: MouseButton::Left,
        modifiers,
    }
}

fn release(x: f64, y: f64) -> RawInput {
    RawInput::ButtonUp {
        position: DVec2::new(x, y),
        button: MouseButton::Left,
        modifiers: ModifierKeys::NONE,
    }
}

fn move_to(x: f64, y: f64, modifiers: ModifierKeys) -> RawInput {
    RawInput::PointerMove {
        position: DVec2::new(x, y),
        modifiers,
    }
}

fn wheel(dy: f64, modifiers: ModifierKeys) -> RawInput {
    RawInput::Wheel {
        delta: DVec2::new(0.0, dy),
        modifiers,
    }
}

fn key(code: u32) -> RawInput {
    RawInput::KeyPress {
        key_code: code,
        modifiers: ModifierKeys::NONE,
    }
}

#[test]
fn default_gestures_are_bound_once_ready() {
    let widget = widget(Dimensionality::Two);
    let names = widget.dispatcher().borrow().gesture_names();
    assert_eq!(names.len(), default_bindings(Dimensionality::Two).len());
    assert!(names.contains(&"wheel:shift:amv".to_string()));
    assert!(names.contains(&"move::amv".to_string()));
}

#[test]
fn drag_pans_2d_viewport() {
    let widget = widget(Dimensionality::Two);
    let viewer = widget.viewer().unwrap();
    let start = viewer.borrow().viewport().unwrap().center;
    let size = viewer.borrow().viewport().unwrap().size;

    widget.handle_input(press(100.0, 100.0, ModifierKeys::NONE));
    widget.handle_input(move_to(140.0, 100.0, ModifierKeys::NONE));
    widget.handle_input(release(140.0, 100.0));
    // Moving after release must not pan
    widget.handle_input(move_to(300.0, 300.0, ModifierKeys::NONE));

    let center = viewer.borrow().viewport().unwrap().center;
    let expected = start + DVec2::new(-40.0 * size.x / CANVAS.x, 0.0);
    assert!((center - expected).length() < 1e-9);
}

#[test]
fn modifier_filter_is_exact() {
    let widget = widget(Dimensionality::Three);
    let viewer = widget.viewer().unwrap();
    let before = viewer.borrow().camera().clone();

    // drag:shift pans, drag with shift+ctrl matches neither binding
    let both = ModifierKeys::new(true, true, false, false);
    widget.handle_input(press(100.0, 100.0, both));
    widget.handle_input(move_to(150.0, 120.0, both));
    widget.handle_input(release(150.0, 120.0));
    assert_eq!(*viewer.borrow().camera(), before);

    widget.handle_input(press(100.0, 100.0, ModifierKeys::SHIFT));
    widget.handle_input(move_to(150.0, 100.0, ModifierKeys::SHIFT));
    widget.handle_input(release(150.0, 100.0));
    let after = viewer.borrow().camera().clone();
    // Pan keeps the viewing direction and distance
    assert!((after.forward() - before.forward()).length() < 1e-9);
    assert!((after.distance() - before.distance()).abs() < 1e-9);
    assert!(after.target.x < 0.0);
}

#[test]
fn wheel_zoom_direction() {
    let widget = widget(Dimensionality::Three);
    let viewer = widget.viewer().unwrap();

    widget.handle_input(wheel(100.0, ModifierKeys::NONE));
    assert!((viewer.borrow().distance() - 9.5).abs() < 1e-9);
    assert!((viewer.borrow().objects().scale() - 0.95).abs() < 1e-12);

    widget.handle_input(wheel(-100.0, ModifierKeys::NONE));
    assert!((viewer.borrow().distance() - 10.0).abs() < 1e-9);
    assert!((viewer.borrow().objects().scale() - 1.0).abs() < 1e-12);

    let generation = viewer.borrow().pose_generation();
    widget.handle_input(wheel(0.0, ModifierKeys::NONE));
    assert_eq!(viewer.borrow().pose_generation(), generation);
}

#[test]
fn shift_wheel_scales_with_x_only_device_quirk() {
    let widget = widget(Dimensionality::Two);
    let viewer = widget.viewer().unwrap();
    widget.handle_input(RawInput::Wheel {
        delta: DVec2::new(100.0, 0.0),
        modifiers: ModifierKeys::SHIFT,
    });
    assert!((viewer.borrow().objects().scale() - 0.95).abs() < 1e-12);
}

#[test]
fn flip_then_reset() {
    let widget = widget(Dimensionality::Two);
    let viewer = widget.viewer().unwrap();
    widget.handle_input(wheel(100.0, ModifierKeys::NONE));
    widget.handle_input(key(KEY_H));
    assert_eq!(
        viewer.borrow().objects().get(0).unwrap().position,
        DVec3::new(2.0, -2.0, 0.0)
    );

    widget.handle_input(key(KEY_R));
    let viewer = viewer.borrow();
    let viewport = viewer.viewport().unwrap();
    assert_eq!(viewport.rotation, 0.0);
    assert!((viewport.size.x - viewer.objects().diameter()).abs() < 1e-9);
}

#[test]
fn hover_reports_changes_only() {
    let widget = widget(Dimensionality::Three);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    widget.on_hover_changed(move |hits| sink.borrow_mut().push(hits.to_vec()));

    // canvas center looks at the origin
    widget.handle_input(move_to(200.0, 200.0, ModifierKeys::NONE));
    widget.handle_input(move_to(201.0, 200.0, ModifierKeys::NONE));
    widget.handle_input(move_to(0.0, 0.0, ModifierKeys::NONE));

    assert_eq!(*seen.borrow(), vec![vec![2], vec![]]);
    assert!(widget.hovered().is_empty());
}

#[test]
fn render_frame_sees_latest_pose() {
    let widget = widget(Dimensionality::Three);
    assert!(widget.render_frame());
    widget.handle_input(wheel(100.0, ModifierKeys::NONE));
    assert!(widget.render_frame());
}

#[test]
fn plot_data_widget_uses_viewport_hint() {
    antigenic_map_viewer::init_native_logging();
    let plot = PlotData::from_json(
        r#"{"layout": [[0, 0], [1, 1]], "viewport_origin": [-5, -5], "viewport_size": [10, 10]}"#,
    )
    .unwrap();
    let mut widget = MapWidget::from_plot_data(ManipulatorConfig::default(), &plot, CANVAS).unwrap();
    widget.attach_backend(Box::new(HeadlessBackend::default()));
    let viewer = widget.viewer().unwrap();
    let viewer = viewer.borrow();
    assert_eq!(viewer.viewport().unwrap().center, DVec2::ZERO);
    assert_eq!(viewer.viewport().unwrap().size, DVec2::splat(10.0));
}
