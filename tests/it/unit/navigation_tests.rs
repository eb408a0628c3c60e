//! Navigator tests: drag-to-scroll with margin rolling, the roll sphere,
//! and absolute map positioning.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use panview::events::{EventSource, WidgetEvent};
use panview::mapping::MapMode;
use panview::navigation::{
    DragNavigator, DragNavigatorConfig, MapNavigator, MapNavigatorConfig, Navigator,
    RollNavigator, RollNavigatorConfig,
};
use panview::prefs::MemoryStore;
use panview::scheduling::LocalScheduler;
use panview::types::{CursorKind, MouseButton, Point};
use panview::View;

use crate::helpers::MockView;

struct NaviRig {
    scheduler: Rc<LocalScheduler>,
    view: Rc<RefCell<MockView>>,
    source: EventSource<WidgetEvent>,
}

impl NaviRig {
    fn new() -> Self {
        let view = Rc::new(RefCell::new(MockView::new(400.0, 300.0, 5000.0, 3000.0)));
        view.borrow_mut().set_scroll(500.0, 500.0);
        Self {
            scheduler: LocalScheduler::new(),
            view,
            source: EventSource::new(),
        }
    }

    fn point_at(&self, at: Point) {
        self.view.borrow_mut().pointer = Some(at);
        self.source.emit(&WidgetEvent::Motion { at });
    }
}

#[test]
fn margin_band_attaches_and_detaches_the_roll_timer() {
    let rig = NaviRig::new();
    let config = DragNavigatorConfig {
        speed: 0.0,
        relative_speed: false,
        require_click: false,
        margin: 24.0,
        roll_speed: 600.0,
    };
    let _navigator = DragNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    // Pointer deep in the left margin band: the roll timer attaches and a
    // west cursor appears.
    rig.point_at(Point::new(5.0, 150.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.scheduler.timer_count(), 1);
    assert_eq!(rig.view.borrow().cursor, Some(CursorKind::West));

    // Two ticks of continuous left scrolling, proportional to time.
    let before = rig.view.borrow().hadjust.value;
    rig.scheduler.advance(Duration::from_millis(66));
    let after = rig.view.borrow().hadjust.value;
    assert!((before - after - 600.0 * 0.066).abs() < 1e-6);

    // Pointer leaves the band: the next tick detaches and resets.
    rig.point_at(Point::new(200.0, 150.0));
    rig.scheduler.dispatch_idle();
    rig.scheduler.advance(Duration::from_millis(33));
    assert_eq!(rig.scheduler.timer_count(), 0);
    assert_eq!(rig.view.borrow().cursor, None);
    // The whole cursor history: west on entry, reset on departure.
    assert_eq!(
        rig.view.borrow().cursor_log,
        vec![Some(CursorKind::West), None]
    );
}

#[test]
fn corner_band_rolls_diagonally() {
    let rig = NaviRig::new();
    let config = DragNavigatorConfig {
        speed: 0.0,
        require_click: false,
        relative_speed: false,
        margin: 24.0,
        roll_speed: 100.0,
    };
    let _navigator = DragNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    rig.point_at(Point::new(5.0, 40.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().cursor, Some(CursorKind::NorthWest));

    rig.scheduler.advance(Duration::from_millis(33));
    let view = rig.view.borrow();
    assert!(view.hadjust.value < 500.0);
    assert!(view.vadjust.value < 500.0);
}

#[test]
fn require_click_gates_motion_panning() {
    let rig = NaviRig::new();
    let config = DragNavigatorConfig {
        speed: 1.0,
        relative_speed: false,
        require_click: true,
        ..DragNavigatorConfig::default()
    };
    let _navigator = DragNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    rig.point_at(Point::new(100.0, 100.0));
    rig.scheduler.dispatch_idle();
    rig.point_at(Point::new(150.0, 120.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 500.0);

    rig.source.emit(&WidgetEvent::ButtonPress {
        button: MouseButton::Left,
        at: Point::new(150.0, 120.0),
    });
    rig.point_at(Point::new(180.0, 140.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 530.0);
    assert_eq!(rig.view.borrow().vadjust.value, 520.0);

    rig.source.emit(&WidgetEvent::ButtonRelease {
        button: MouseButton::Left,
        at: Point::new(180.0, 140.0),
    });
    rig.point_at(Point::new(100.0, 100.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 530.0);
}

#[test]
fn motion_panning_clamps_to_content_bounds() {
    let rig = NaviRig::new();
    let config = DragNavigatorConfig {
        speed: 100.0,
        relative_speed: false,
        require_click: false,
        ..DragNavigatorConfig::default()
    };
    let _navigator = DragNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    rig.point_at(Point::new(100.0, 100.0));
    rig.scheduler.dispatch_idle();
    rig.point_at(Point::new(399.0, 299.0));
    rig.scheduler.dispatch_idle();

    let view = rig.view.borrow();
    assert_eq!(view.hadjust.value, 4600.0);
    assert_eq!(view.vadjust.value, 2700.0);
}

#[test]
fn drag_navigator_detach_cancels_everything() {
    let rig = NaviRig::new();
    let config = DragNavigatorConfig {
        require_click: false,
        ..DragNavigatorConfig::default()
    };
    let navigator = DragNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    rig.point_at(Point::new(5.0, 150.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.scheduler.timer_count(), 1);

    // Schedule another batch, then detach before it runs.
    rig.point_at(Point::new(6.0, 150.0));
    navigator.detach();
    assert_eq!(rig.scheduler.timer_count(), 0);
    assert_eq!(rig.scheduler.idle_count(), 0);
    assert_eq!(rig.view.borrow().cursor, None);

    // Raw events no longer reach the navigator.
    rig.point_at(Point::new(5.0, 150.0));
    assert_eq!(rig.scheduler.idle_count(), 0);
}

#[test]
fn dropping_a_navigator_detaches_it() {
    let rig = NaviRig::new();
    {
        let _navigator = DragNavigator::attach(
            rig.view.clone(),
            &rig.source,
            rig.scheduler.clone(),
            DragNavigatorConfig {
                require_click: false,
                ..DragNavigatorConfig::default()
            },
        );
        rig.point_at(Point::new(5.0, 150.0));
        rig.scheduler.dispatch_idle();
        assert_eq!(rig.scheduler.timer_count(), 1);
    }
    assert_eq!(rig.scheduler.timer_count(), 0);
}

#[test]
fn roll_navigator_scrolls_along_the_center_offset() {
    let rig = NaviRig::new();
    let config = RollNavigatorConfig {
        speed: 500.0,
        relative_speed: false,
        margin: 24.0,
        threshold: 32.0,
    };
    let _navigator = RollNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    // Right of center, past the threshold: rolls east.
    rig.view.borrow_mut().pointer = Some(Point::new(350.0, 150.0));
    rig.source.emit(&WidgetEvent::Motion {
        at: Point::new(350.0, 150.0),
    });
    assert_eq!(rig.scheduler.timer_count(), 1);
    assert_eq!(rig.view.borrow().cursor, Some(CursorKind::East));

    rig.scheduler.advance(Duration::from_millis(99));
    let view = rig.view.borrow();
    assert!(view.hadjust.value > 500.0);
    assert_eq!(view.vadjust.value, 500.0);
}

#[test]
fn roll_navigator_ignores_the_dead_zone() {
    let rig = NaviRig::new();
    let _navigator = RollNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        RollNavigatorConfig::default(),
    );

    rig.source.emit(&WidgetEvent::Motion {
        at: Point::new(210.0, 160.0),
    });
    assert_eq!(rig.scheduler.timer_count(), 0);
    assert_eq!(rig.view.borrow().cursor, None);
}

#[test]
fn roll_navigator_speed_grows_with_offset() {
    let rig = NaviRig::new();
    let config = RollNavigatorConfig {
        speed: 500.0,
        relative_speed: false,
        margin: 24.0,
        threshold: 32.0,
    };
    let _navigator = RollNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );

    let mut travelled = Vec::new();
    for x in [260.0, 320.0, 380.0] {
        rig.view.borrow_mut().set_scroll(500.0, 500.0);
        rig.view.borrow_mut().pointer = Some(Point::new(x, 150.0));
        rig.source.emit(&WidgetEvent::Motion {
            at: Point::new(x, 150.0),
        });
        rig.scheduler.advance(Duration::from_millis(33));
        travelled.push(rig.view.borrow().hadjust.value - 500.0);
    }
    assert!(travelled[0] < travelled[1]);
    assert!(travelled[1] < travelled[2]);
}

#[test]
fn leaving_the_widget_cancels_rolling_immediately() {
    let rig = NaviRig::new();
    let _navigator = RollNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        RollNavigatorConfig::default(),
    );

    rig.view.borrow_mut().pointer = Some(Point::new(380.0, 150.0));
    rig.source.emit(&WidgetEvent::Motion {
        at: Point::new(380.0, 150.0),
    });
    assert_eq!(rig.scheduler.timer_count(), 1);

    rig.view.borrow_mut().pointer = None;
    rig.source.emit(&WidgetEvent::Leave);
    assert_eq!(rig.scheduler.timer_count(), 0);
    assert_eq!(rig.view.borrow().cursor, None);
}

#[test]
fn map_navigator_positions_absolutely() {
    let rig = NaviRig::new();
    let config = MapNavigatorConfig {
        mode: MapMode::Raw,
        margin: 24.0,
        require_click: false,
    };
    let _navigator = MapNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        config,
    );
    assert_eq!(rig.view.borrow().cursor, Some(CursorKind::Crosshair));

    // Center of the margin-adjusted rectangle: scrollable midpoint.
    rig.point_at(Point::new(200.0, 150.0));
    rig.scheduler.dispatch_idle();
    let (h, v) = {
        let view = rig.view.borrow();
        (view.hadjust.value, view.vadjust.value)
    };
    assert!((h - 2300.0).abs() < 1e-9);
    assert!((v - 1350.0).abs() < 1e-9);

    // Top-left corner pins the range start.
    rig.point_at(Point::new(0.0, 0.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 0.0);
    assert_eq!(rig.view.borrow().vadjust.value, 0.0);
}

#[test]
fn map_navigator_refreshes_on_layout_changes() {
    let rig = NaviRig::new();
    let _navigator = MapNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        MapNavigatorConfig {
            mode: MapMode::Raw,
            margin: 24.0,
            require_click: false,
        },
    );

    rig.point_at(Point::new(200.0, 150.0));
    rig.scheduler.dispatch_idle();

    // The content doubles; the same pointer position must remap.
    {
        let mut view = rig.view.borrow_mut();
        view.hadjust.upper = 10000.0;
    }
    rig.source.emit(&WidgetEvent::LayoutChanged);
    rig.scheduler.dispatch_idle();
    assert!((rig.view.borrow().hadjust.value - 4800.0).abs() < 1e-9);
}

#[test]
fn map_navigator_require_click_tracks_only_while_held() {
    let rig = NaviRig::new();
    let _navigator = MapNavigator::attach(
        rig.view.clone(),
        &rig.source,
        rig.scheduler.clone(),
        MapNavigatorConfig {
            mode: MapMode::Raw,
            margin: 24.0,
            require_click: true,
        },
    );

    rig.point_at(Point::new(200.0, 150.0));
    rig.scheduler.dispatch_idle();
    assert_eq!(rig.view.borrow().hadjust.value, 500.0);

    rig.source.emit(&WidgetEvent::ButtonPress {
        button: MouseButton::Left,
        at: Point::new(200.0, 150.0),
    });
    rig.scheduler.dispatch_idle();
    assert!((rig.view.borrow().hadjust.value - 2300.0).abs() < 1e-9);
}

#[test]
fn map_navigator_drop_restores_the_cursor() {
    let rig = NaviRig::new();
    {
        let _navigator = MapNavigator::attach(
            rig.view.clone(),
            &rig.source,
            rig.scheduler.clone(),
            MapNavigatorConfig::default(),
        );
        assert_eq!(rig.view.borrow().cursor, Some(CursorKind::Crosshair));
    }
    assert_eq!(rig.view.borrow().cursor, None);
}

#[test]
fn navigator_configs_round_trip_through_the_store() {
    let mut store = MemoryStore::new();

    let drag = DragNavigatorConfig {
        speed: 2.5,
        relative_speed: false,
        require_click: false,
        margin: 40.0,
        roll_speed: 750.0,
    };
    drag.save(&mut store);
    assert_eq!(DragNavigatorConfig::load(&store), drag);

    let roll = RollNavigatorConfig {
        speed: 123.0,
        relative_speed: false,
        margin: 10.0,
        threshold: 64.0,
    };
    roll.save(&mut store);
    assert_eq!(RollNavigatorConfig::load(&store), roll);

    let map = MapNavigatorConfig {
        mode: MapMode::Square,
        margin: 16.0,
        require_click: true,
    };
    map.save(&mut store);
    assert_eq!(MapNavigatorConfig::load(&store), map);
}

#[test]
fn navigator_configs_default_when_the_store_is_empty() {
    let store = MemoryStore::new();
    assert_eq!(DragNavigatorConfig::load(&store), DragNavigatorConfig::default());
    assert_eq!(RollNavigatorConfig::load(&store), RollNavigatorConfig::default());
    assert_eq!(MapNavigatorConfig::load(&store), MapNavigatorConfig::default());
}
