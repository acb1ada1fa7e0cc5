// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional navigation against an in-memory document.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use understory_xy_dom::{Dom, ElementData, ElementId, Outbox};
use understory_xy_focus::{
    Direction, Document, ElementState, FocusChanged, FocusError, FocusConfig, IntRect, KeyCodeMap,
    NavigationContext, NavigationOptions, Outcome, keys,
};

fn button(x: f64, y: f64) -> ElementData {
    ElementData::new("button").bounds(x, y, 50.0, 50.0)
}

/// Three 50×50 buttons at x = 0, 100, 200.
fn row() -> (Dom, [ElementId; 3]) {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let a = dom.insert(Some(body), button(0.0, 0.0).id("a"));
    let b = dom.insert(Some(body), button(100.0, 0.0).id("b"));
    let c = dom.insert(Some(body), button(200.0, 0.0).id("c"));
    (dom, [a, b, c])
}

fn step(cx: &mut NavigationContext<Dom>, dom: &mut Dom, direction: Direction) -> bool {
    let mut outbox = Outbox::top_level();
    cx.xy_focus(dom, &mut outbox, direction, None, None, true)
        .unwrap()
}

#[test]
fn moves_along_a_row() {
    let (mut dom, [a, b, c]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    dom.focus(a);

    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(b));
    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(c));
    assert!(!step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(c));
    assert!(step(&mut cx, &mut dom, Direction::Left));
    assert_eq!(dom.active_element(), Some(b));
}

#[test]
fn no_reference_starts_from_the_top_left() {
    let (mut dom, [a, ..]) = row();
    let cx = NavigationContext::<Dom>::default();
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::default())
        .unwrap();
    assert_eq!(next, Some(a));

    // The body is never used as a reference element.
    let body = dom.body();
    dom.set_active(Some(body));
    let next = cx
        .find_next_focus_element(&dom, Direction::Down, &NavigationOptions::default())
        .unwrap();
    assert_eq!(next, Some(a));
}

#[test]
fn never_returns_the_reference() {
    let (dom, ids) = row();
    let cx = NavigationContext::<Dom>::default();
    for id in ids {
        for direction in Direction::ALL {
            let next = cx
                .find_next_focus_element(&dom, direction, &NavigationOptions::from_element(id))
                .unwrap();
            assert_ne!(next, Some(id), "{direction} from {id:?}");
        }
    }
}

#[test]
fn skips_unfocusable_elements() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(Some(body), button(0.0, 0.0));
    dom.insert(
        Some(body),
        button(60.0, 0.0).state(ElementState::DISPLAY_NONE),
    );
    dom.insert(
        Some(body),
        button(70.0, 0.0).state(ElementState::VISIBILITY_HIDDEN),
    );
    dom.insert(Some(body), button(80.0, 0.0).state(ElementState::DISABLED));
    dom.insert(
        Some(body),
        ElementData::new("div")
            .state(ElementState::CONTROL_DISABLED)
            .attr("tabindex", "0")
            .bounds(90.0, 0.0, 50.0, 50.0),
    );
    dom.insert(Some(body), button(100.0, 0.0).attr("tabindex", "-1"));
    dom.insert(
        Some(body),
        ElementData::new("div").bounds(110.0, 0.0, 50.0, 50.0),
    );
    dom.insert(Some(body), button(120.0, 0.0).bounds(120.0, 0.0, 0.0, 50.0));
    dom.insert(
        Some(body),
        ElementData::new("iframe").bounds(130.0, 0.0, 50.0, 50.0),
    );
    let div = dom.insert(
        Some(body),
        ElementData::new("div")
            .class("xyfocus-focusable")
            .bounds(300.0, 0.0, 50.0, 50.0),
    );

    let cx = NavigationContext::<Dom>::default();
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(div));
}

#[test]
fn tabindex_makes_any_element_a_candidate() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(Some(body), button(0.0, 0.0));
    let span = dom.insert(
        Some(body),
        ElementData::new("span")
            .attr("tabindex", "0")
            .bounds(100.0, 0.0, 50.0, 50.0),
    );
    let cx = NavigationContext::<Dom>::default();
    assert!(cx.is_focusable(&dom, span));
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(span));
}

#[test]
fn ties_go_to_document_order() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(Some(body), button(0.0, 0.0));
    let first = dom.insert(Some(body), button(100.0, 0.0));
    let _second = dom.insert(Some(body), button(100.0, 0.0));
    let cx = NavigationContext::<Dom>::default();
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(first));
}

#[test]
fn staggered_neighbor_is_reachable() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(
        Some(body),
        ElementData::new("button").bounds(0.0, 0.0, 100.0, 50.0),
    );
    let staggered = dom.insert(
        Some(body),
        ElementData::new("button").bounds(60.0, 60.0, 100.0, 50.0),
    );
    let _far = dom.insert(Some(body), button(300.0, 60.0));
    let cx = NavigationContext::<Dom>::default();
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(staggered));
}

#[test]
fn focus_root_limits_the_search() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(Some(body), button(0.0, 0.0));
    let _outside = dom.insert(Some(body), button(100.0, 0.0));
    let panel = dom.insert(Some(body), ElementData::new("div"));
    let inside = dom.insert(Some(panel), button(300.0, 0.0));

    let mut cx = NavigationContext::<Dom>::default();
    cx.set_focus_root(Some(panel));
    assert_eq!(cx.focus_root(&dom), panel);
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(inside));

    cx.set_focus_root(None);
    assert_eq!(cx.focus_root(&dom), body);

    // Per-call options win over the context.
    let options = NavigationOptions {
        focus_root: Some(panel),
        ..NavigationOptions::from_element(start)
    };
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &options)
        .unwrap();
    assert_eq!(next, Some(inside));
}

#[test]
fn explicit_reference_handling() {
    let (mut dom, [a, b, c]) = row();
    let cx = NavigationContext::<Dom>::default();
    dom.focus(c);

    // An explicit element beats the active element.
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(a))
        .unwrap();
    assert_eq!(next, Some(b));

    // An explicit rectangle is used when there is no element.
    let options = NavigationOptions::from_rect(IntRect::from_origin_size(-100, 0, 50, 50));
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &options)
        .unwrap();
    assert_eq!(next, Some(a));

    // An opted-out element falls back to the active element.
    dom.set_attribute(a, "tabindex", "-1");
    let next = cx
        .find_next_focus_element(&dom, Direction::Left, &NavigationOptions::from_element(a))
        .unwrap();
    assert_eq!(next, Some(b));
}

#[test]
fn override_beats_geometry() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let _near = dom.insert(Some(body), button(0.0, 0.0));
    let start = dom.insert(
        Some(body),
        button(100.0, 0.0).attr("data-xyfocus", "{left: '#target'}"),
    );
    let target = dom.insert(Some(body), button(500.0, 400.0).id("target"));
    dom.focus(start);

    let mut cx = NavigationContext::<Dom>::default();
    assert!(step(&mut cx, &mut dom, Direction::Left));
    assert_eq!(dom.active_element(), Some(target));
}

#[test]
fn override_keys_accept_title_case() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(
        Some(body),
        button(100.0, 0.0).attr("data-xyfocus", r##"{ "Up": "#target" }"##),
    );
    let target = dom.insert(Some(body), button(500.0, 400.0).id("target"));
    let cx = NavigationContext::<Dom>::default();
    let next = cx
        .find_next_focus_element(&dom, Direction::Up, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(target));
}

#[test]
fn override_edge_cases() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let near = dom.insert(Some(body), button(0.0, 0.0));
    let start = dom.insert(Some(body), button(100.0, 0.0).id("start"));
    dom.focus(start);
    let cx = NavigationContext::<Dom>::default();
    let from = NavigationOptions::from_element(start);

    // A selector that matches nothing falls through to geometry.
    dom.set_attribute(start, "data-xyfocus", "{left: '#missing'}");
    let next = cx.find_next_focus_element(&dom, Direction::Left, &from).unwrap();
    assert_eq!(next, Some(near));

    // A different direction is unaffected.
    let next = cx.find_next_focus_element(&dom, Direction::Right, &from).unwrap();
    assert_eq!(next, None);

    // Pointing at the focused element yields nothing.
    dom.set_attribute(start, "data-xyfocus", "{left: '#start'}");
    let next = cx.find_next_focus_element(&dom, Direction::Left, &from).unwrap();
    assert_eq!(next, None);

    // Malformed attributes are reported.
    dom.set_attribute(start, "data-xyfocus", "{left: }");
    let err = cx.find_next_focus_element(&dom, Direction::Left, &from);
    assert!(matches!(err, Err(FocusError::Override(_))));
}

#[test]
fn override_attribute_name_is_configurable() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let start = dom.insert(
        Some(body),
        button(100.0, 0.0).attr("data-nav", "{down: '#target'}"),
    );
    let target = dom.insert(Some(body), button(500.0, 0.0).id("target"));
    let config = FocusConfig {
        override_attribute: "data-nav".into(),
        ..FocusConfig::default()
    };
    let cx = NavigationContext::<Dom>::new(config);
    let next = cx
        .find_next_focus_element(&dom, Direction::Down, &NavigationOptions::from_element(start))
        .unwrap();
    assert_eq!(next, Some(target));
}

#[test]
fn history_keeps_moves_aligned() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let a = dom.insert(Some(body), button(0.0, 100.0));
    let tall = dom.insert(
        Some(body),
        ElementData::new("button").bounds(100.0, 0.0, 50.0, 200.0),
    );
    let top = dom.insert(Some(body), button(200.0, 0.0));
    let middle = dom.insert(Some(body), button(200.0, 100.0));
    let mut cx = NavigationContext::<Dom>::default();

    // Without history the two right-hand buttons tie.
    let next = cx
        .find_next_focus_element(&dom, Direction::Right, &NavigationOptions::from_element(tall))
        .unwrap();
    assert_eq!(next, Some(top));

    dom.focus(a);
    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(tall));
    let history = cx.history().history_rect().unwrap();
    assert_eq!((history.top, history.bottom), (100, 150));
    assert_eq!((history.left, history.right), (i32::MIN, i32::MAX));
    assert_eq!(cx.history().last_target(), Some(tall));

    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(middle));
}

#[test]
fn explicit_reference_rect_resets_history() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let a = dom.insert(Some(body), button(0.0, 100.0));
    let tall = dom.insert(
        Some(body),
        ElementData::new("button").bounds(100.0, 0.0, 50.0, 200.0),
    );
    let top = dom.insert(Some(body), button(200.0, 0.0));
    let _middle = dom.insert(Some(body), button(200.0, 100.0));
    let mut cx = NavigationContext::<Dom>::default();
    let mut outbox = Outbox::top_level();

    dom.focus(a);
    assert!(step(&mut cx, &mut dom, Direction::Right));
    let rect = IntRect::from_rect(dom.bounding_rect(tall));
    assert!(
        cx.xy_focus(&mut dom, &mut outbox, Direction::Right, None, Some(rect), true)
            .unwrap()
    );
    assert_eq!(dom.active_element(), Some(top));
}

#[test]
fn moved_last_target_resets_history() {
    let mut dom = Dom::new(800.0, 600.0);
    let body = dom.body();
    let a = dom.insert(Some(body), button(0.0, 100.0));
    let tall = dom.insert(
        Some(body),
        ElementData::new("button").bounds(100.0, 0.0, 50.0, 200.0),
    );
    let top = dom.insert(Some(body), button(200.0, 0.0));
    let _middle = dom.insert(Some(body), button(200.0, 100.0));
    let mut cx = NavigationContext::<Dom>::default();

    dom.focus(a);
    assert!(step(&mut cx, &mut dom, Direction::Right));
    dom.set_rect(tall, Rect::new(101.0, 0.0, 151.0, 200.0));
    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(top));
}

#[test]
fn focus_changing_precedes_focus_changed() {
    let (mut dom, [a, b, _]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    cx.add_focus_changing_listener(move |_, ev| {
        l.borrow_mut().push(("changing", Some(ev.next_focus_element)));
        Outcome::Continue
    });
    let l = Rc::clone(&log);
    cx.add_focus_changed_listener(move |_, ev: &FocusChanged<ElementId>| {
        l.borrow_mut().push(("changed", ev.previous_focus_element));
        Outcome::Continue
    });

    dom.focus(a);
    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(
        *log.borrow(),
        [("changing", Some(b)), ("changed", Some(a))]
    );
}

#[test]
fn canceled_move_leaves_focus_alone() {
    let (mut dom, [a, ..]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    let changed = Rc::new(RefCell::new(0));

    let id = cx.add_focus_changing_listener(|_, ev| {
        ev.default_prevented = true;
        Outcome::Continue
    });
    let c = Rc::clone(&changed);
    cx.add_focus_changed_listener(move |_, _| {
        *c.borrow_mut() += 1;
        Outcome::Continue
    });

    dom.focus(a);
    assert!(!step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(a));
    assert_eq!(*changed.borrow(), 0);

    assert!(cx.remove_listener(id));
    assert!(step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(*changed.borrow(), 1);
}

#[test]
fn changing_listener_can_redirect_through_the_document() {
    let (mut dom, [a, b, c]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    cx.add_focus_changing_listener(move |doc: &mut Dom, ev| {
        if ev.next_focus_element == b {
            doc.focus(c);
            ev.default_prevented = true;
        }
        Outcome::Continue
    });

    dom.focus(a);
    assert!(!step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(c));
    assert_eq!(cx.history().last_target(), None);
}

#[test]
fn focus_that_does_not_stick_is_not_a_move() {
    let (mut dom, [a, b, c]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    dom.focus(a);
    dom.redirect_focus(b, Some(c));

    assert!(!step(&mut cx, &mut dom, Direction::Right));
    assert_eq!(dom.active_element(), Some(c));
    assert_eq!(cx.history().last_target(), None);
}

#[test]
fn move_focus_reports_the_new_element() {
    let (mut dom, [a, b, _]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    let key = Rc::new(RefCell::new(None));
    let k = Rc::clone(&key);
    cx.add_focus_changed_listener(move |_, ev| {
        *k.borrow_mut() = Some(ev.key_code);
        Outcome::Continue
    });

    dom.focus(a);
    let moved = cx
        .move_focus(&mut dom, Direction::Right, &NavigationOptions::default())
        .unwrap();
    assert_eq!(moved, Some(b));
    assert_eq!(dom.active_element(), Some(b));
    assert_eq!(*key.borrow(), Some(None));
    // The API path leaves history alone.
    assert_eq!(cx.history().last_target(), None);

    let moved = cx
        .move_focus(&mut dom, Direction::Up, &NavigationOptions::default())
        .unwrap();
    assert_eq!(moved, None);
}

#[test]
fn key_presses_drive_navigation() {
    let (mut dom, [a, b, _]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    let mut outbox = Outbox::top_level();
    let key = Rc::new(RefCell::new(None));
    let k = Rc::clone(&key);
    cx.add_focus_changed_listener(move |_, ev| {
        *k.borrow_mut() = ev.key_code;
        Outcome::Continue
    });
    dom.focus(a);

    // Arrow keys are not bound by default.
    assert!(!cx.handle_key_down(&mut dom, &mut outbox, keys::ARROW_RIGHT).unwrap());
    assert_eq!(dom.active_element(), Some(a));

    assert!(
        cx.handle_key_down(&mut dom, &mut outbox, keys::GAMEPAD_DPAD_RIGHT)
            .unwrap()
    );
    assert_eq!(dom.active_element(), Some(b));
    assert_eq!(*key.borrow(), Some(keys::GAMEPAD_DPAD_RIGHT));

    cx.config_mut().key_codes = KeyCodeMap::with_arrow_keys();
    assert!(cx.handle_key_down(&mut dom, &mut outbox, keys::ARROW_LEFT).unwrap());
    assert_eq!(dom.active_element(), Some(a));

    // Nothing further left: not handled.
    assert!(!cx.handle_key_down(&mut dom, &mut outbox, keys::ARROW_LEFT).unwrap());
}

#[test]
fn accept_clicks_and_cancel_is_ignored_at_rest() {
    let (mut dom, [a, ..]) = row();
    let mut cx = NavigationContext::<Dom>::default();
    let mut outbox = Outbox::top_level();
    dom.focus(a);

    assert!(cx.handle_key_down(&mut dom, &mut outbox, keys::GAMEPAD_A).unwrap());
    assert_eq!(dom.clicks(), [a]);
    assert!(!cx.handle_key_down(&mut dom, &mut outbox, keys::GAMEPAD_B).unwrap());
    assert_eq!(dom.clicks(), [a]);
}

#[test]
fn platform_marker_is_opt_in() {
    let (mut dom, _) = row();
    let body = dom.body();

    let cx = NavigationContext::<Dom>::default();
    cx.apply_platform_marker(&mut dom);
    assert!(!dom.has_class(body, "xyfocus-directional-host"));

    let config = FocusConfig {
        directional_host: true,
        ..FocusConfig::default()
    };
    let cx = NavigationContext::<Dom>::new(config);
    cx.apply_platform_marker(&mut dom);
    assert!(dom.has_class(body, "xyfocus-directional-host"));
}
