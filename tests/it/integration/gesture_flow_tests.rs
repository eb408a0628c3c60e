//! Full-pipeline tests: raw widget events through scheduler, adapter,
//! dispatcher, and the built-in handlers against the mock view.

use panview::events::WidgetEvent;
use panview::handlers::{
    DragPanHandler, DragSpinHandler, DragZoomHandler, HoverPanHandler, MapClickConfig,
    MapClickHandler, PanConfig, WheelZoomHandler,
};
use panview::input::{shared, GestureDispatcher};
use panview::mapping::MapMode;
use panview::types::{CursorKind, MouseButton, Point};

use crate::helpers::{EventLog, Rig};

fn emit_press(rig: &Rig, button: MouseButton, at: Point) {
    rig.source.emit(&WidgetEvent::ButtonPress { button, at });
}

fn emit_release(rig: &Rig, button: MouseButton, at: Point) {
    rig.source.emit(&WidgetEvent::ButtonRelease { button, at });
}

fn emit_motion(rig: &Rig, at: Point) {
    rig.source.emit(&WidgetEvent::Motion { at });
}

#[test]
fn drag_pan_moves_the_view_and_manages_the_cursor() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let handler = shared(DragPanHandler::new(PanConfig {
        speed: -1.0,
        relative_speed: false,
    }));
    dispatcher.add(&handler);
    dispatcher.attach(&rig.adapter);

    emit_press(&rig, MouseButton::Left, Point::new(100.0, 100.0));
    emit_motion(&rig, Point::new(110.0, 105.0));
    emit_motion(&rig, Point::new(120.0, 110.0));
    rig.scheduler.dispatch_idle();

    {
        let view = rig.view.borrow();
        assert_eq!(view.cursor, Some(CursorKind::Move));
        // Drag spans the batch: (120,110) back from (110,105), negated.
        assert_eq!(view.hadjust.value, 490.0);
        assert_eq!(view.vadjust.value, 495.0);
    }

    emit_release(&rig, MouseButton::Left, Point::new(120.0, 110.0));
    assert_eq!(rig.view.borrow().cursor, None);
}

#[test]
fn full_gesture_emits_the_canonical_event_sequence() {
    let rig = Rig::standard();
    let log = EventLog::attach(&rig.adapter);

    emit_press(&rig, MouseButton::Left, Point::new(100.0, 100.0));
    emit_motion(&rig, Point::new(110.0, 105.0));
    emit_motion(&rig, Point::new(120.0, 110.0));
    rig.scheduler.dispatch_idle();
    emit_motion(&rig, Point::new(130.0, 115.0));
    rig.scheduler.dispatch_idle();
    emit_release(&rig, MouseButton::Left, Point::new(130.0, 115.0));

    insta::assert_debug_snapshot!(log.names(), @r###"
    [
        "pression",
        "start-drag",
        "pression",
        "motion",
        "drag",
        "pression",
        "motion",
        "drag",
        "stop-drag",
        "click",
    ]
    "###);
}

#[test]
fn concurrent_spin_and_zoom_gestures_on_different_buttons() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let spin = shared(DragSpinHandler::default());
    let zoom = shared(DragZoomHandler::default());
    dispatcher.add(&spin);
    dispatcher.add(&zoom);
    dispatcher.attach(&rig.adapter);

    // Middle and right pressed together: the first batch starts both
    // gestures, the second drives them.
    emit_press(&rig, MouseButton::Middle, Point::new(250.0, 150.0));
    emit_press(&rig, MouseButton::Right, Point::new(250.0, 150.0));
    emit_motion(&rig, Point::new(260.0, 150.0));
    emit_motion(&rig, Point::new(200.0, 250.0));
    rig.scheduler.dispatch_idle();
    emit_motion(&rig, Point::new(400.0, 150.0));
    rig.scheduler.dispatch_idle();

    let view = rig.view.borrow();
    // Zoom pivot is the widget center: (400,150) sits at distance 200
    // where the gesture started at distance 100.
    assert!((view.magnification - 2.0).abs() < 1e-9);
    assert!(view.rotation != 0.0);
}

#[test]
fn hover_pan_yields_to_a_dragging_button() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let hover = shared(HoverPanHandler::new(PanConfig {
        speed: 1.0,
        relative_speed: false,
    }));
    let drag = shared(DragPanHandler::new(PanConfig {
        speed: -1.0,
        relative_speed: false,
    }));
    dispatcher.add(&hover);
    dispatcher.add(&drag);
    dispatcher.attach(&rig.adapter);

    // Hovering: positive speed pans with the pointer.
    emit_motion(&rig, Point::new(10.0, 10.0));
    emit_motion(&rig, Point::new(20.0, 10.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 510.0);

    // Dragging: the hover handler goes quiet, the drag handler wins.
    emit_press(&rig, MouseButton::Left, Point::new(20.0, 10.0));
    emit_motion(&rig, Point::new(30.0, 10.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 500.0);
}

#[test]
fn map_click_and_wheel_zoom_share_one_dispatcher() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let map = shared(MapClickHandler::new(MapClickConfig {
        margin: 24.0,
        mode: MapMode::Raw,
    }));
    let zoom = shared(WheelZoomHandler::default());
    dispatcher.add(&map);
    dispatcher.add(&zoom);
    dispatcher.attach(&rig.adapter);

    // Click the center of the mapping rectangle.
    emit_press(&rig, MouseButton::Left, Point::new(200.0, 150.0));
    {
        let view = rig.view.borrow();
        assert!((view.hadjust.value - 2300.0).abs() < 1e-9);
        assert!((view.vadjust.value - 1350.0).abs() < 1e-9);
    }
    emit_release(&rig, MouseButton::Left, Point::new(200.0, 150.0));

    // Wheel in: magnification doubles, the map handler stays silent.
    rig.source.emit(&WidgetEvent::Scroll {
        at: Point::new(200.0, 150.0),
        delta: Point::new(0.0, -1.0),
    });
    assert!((rig.view.borrow().magnification - 2.0).abs() < 1e-9);
}

#[test]
fn frozen_adapter_holds_handlers_back() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let drag = shared(DragPanHandler::new(PanConfig {
        speed: -1.0,
        relative_speed: false,
    }));
    dispatcher.add(&drag);
    dispatcher.attach(&rig.adapter);

    rig.adapter.freeze();
    emit_press(&rig, MouseButton::Left, Point::new(100.0, 100.0));
    emit_motion(&rig, Point::new(110.0, 100.0));
    emit_motion(&rig, Point::new(120.0, 100.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 500.0);
    assert_eq!(rig.view.borrow().cursor, None);
    rig.adapter.thaw();
}

#[test]
fn detaching_mid_gesture_stops_dispatch_cleanly() {
    let rig = Rig::standard();
    let dispatcher = GestureDispatcher::new();
    let drag = shared(DragPanHandler::new(PanConfig {
        speed: -1.0,
        relative_speed: false,
    }));
    dispatcher.add(&drag);
    dispatcher.attach(&rig.adapter);

    emit_press(&rig, MouseButton::Left, Point::new(100.0, 100.0));
    emit_motion(&rig, Point::new(110.0, 100.0));
    emit_motion(&rig, Point::new(120.0, 100.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 490.0);

    dispatcher.detach(&rig.adapter);
    emit_motion(&rig, Point::new(140.0, 100.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 490.0);
}
