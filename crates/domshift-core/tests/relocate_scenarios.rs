#![forbid(unsafe_code)]

//! End-to-end relocation scenarios against the in-memory document.
//!
//! Run:
//!   cargo test -p domshift-core --test relocate_scenarios

use core::time::Duration;

use domshift_core::announce::HELPER_ID;
use domshift_core::memory::{MemoryDom, NodeId};
use domshift_core::viewport::SimulatedViewport;
use domshift_core::{
    Activation, ActivationState, Debouncer, Diagnostic, DomTree, Placement, RelocateOptions,
    RelocateSettings, Relocator, Transition,
};
use pretty_assertions::assert_eq;

struct Layout {
    dom: MemoryDom,
    header: NodeId,
    logo: NodeId,
    menu: NodeId,
    search: NodeId,
    sidebar: NodeId,
    container_a: NodeId,
}

/// body(header(logo, menu, search), sidebar, containerA(first))
fn layout() -> Layout {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let header = dom.append_new_with_id(body, "header", "header").unwrap();
    let logo = dom.append_new_with_id(header, "a", "logo").unwrap();
    let menu = dom.append_new_with_id(header, "ul", "menu").unwrap();
    let search = dom.append_new_with_id(header, "form", "search").unwrap();
    let sidebar = dom.append_new_with_id(body, "aside", "sidebar").unwrap();
    let container_a = dom.append_new_with_id(body, "section", "a").unwrap();
    dom.append_new_with_id(container_a, "p", "first").unwrap();
    Layout {
        dom,
        header,
        logo,
        menu,
        search,
        sidebar,
        container_a,
    }
}

#[test]
fn append_to_container_at_1024_then_back_at_600() {
    let mut l = layout();
    let mut viewport = SimulatedViewport::new(1024.0);
    let mut relocator = Relocator::new(
        &mut l.dom,
        &viewport,
        RelocateOptions::new(l.menu, Placement::AppendTo(l.container_a)).with_threshold(800.0),
    )
    .unwrap();

    assert_eq!(relocator.state(), ActivationState::Moved);
    assert_eq!(l.dom.children(l.container_a).last(), Some(&l.menu));
    assert_eq!(l.dom.outline(l.header), "header#header(a#logo,form#search)");

    viewport.set_width(600.0);
    let t = relocator.observe_width(&mut l.dom, viewport.width).unwrap();
    assert_eq!(t, Transition::Reset);
    assert_eq!(l.dom.parent(&l.menu), Some(l.header));
    assert_eq!(l.dom.index_in_parent(l.menu), Some(1));
    assert_eq!(
        l.dom.outline(l.header),
        "header#header(a#logo,ul#menu,form#search)"
    );
}

#[test]
fn media_query_matching_at_setup_moves_immediately() {
    let mut l = layout();
    let viewport = SimulatedViewport::new(1024.0);
    let relocator = Relocator::new(
        &mut l.dom,
        &viewport,
        RelocateOptions::new(l.menu, Placement::Before(l.logo))
            .with_media_query("(min-width: 800px)"),
    )
    .unwrap();
    assert_eq!(
        relocator.activation(),
        &Activation::MediaQuery("(min-width: 800px)".into())
    );
    assert!(relocator.is_moved());
    assert_eq!(l.dom.next_sibling(&l.menu), Some(l.logo));
}

#[test]
fn media_query_not_matching_at_setup_leaves_tree_alone() {
    let mut l = layout();
    let before_setup = l.dom.mutations();
    let mut relocator = Relocator::new(
        &mut l.dom,
        &SimulatedViewport::new(500.0),
        RelocateOptions::new(l.menu, Placement::After(l.search))
            .with_media_query("(min-width: 800px)"),
    )
    .unwrap();
    // Only the accessibility notice was inserted.
    assert_eq!(l.dom.mutations(), before_setup + 1);
    assert!(!relocator.is_moved());

    assert_eq!(
        relocator.observe_media_match(&mut l.dom, true),
        Ok(Transition::Moved)
    );
    assert_eq!(l.dom.children(l.header).last(), Some(&l.menu));
    assert_eq!(
        relocator.observe_media_match(&mut l.dom, false),
        Ok(Transition::Reset)
    );
    assert_eq!(l.dom.next_sibling(&l.menu), Some(l.search));
}

#[test]
fn invalid_media_query_falls_back_to_threshold() {
    let mut l = layout();
    let relocator = Relocator::new(
        &mut l.dom,
        &SimulatedViewport::new(1024.0),
        RelocateOptions::new(l.menu, Placement::PrependTo(l.sidebar))
            .with_media_query("only screen and (orientation: sideways)")
            .with_threshold(900.0),
    )
    .unwrap();
    assert_eq!(relocator.activation(), &Activation::MinWidth(900.0));
    assert!(matches!(
        relocator.diagnostics(),
        [Diagnostic::InvalidMediaQuery { .. }]
    ));
    assert!(relocator.is_moved());
    assert_eq!(l.dom.first_child(&l.sidebar), Some(l.menu));
}

#[test]
fn priority_order_from_candidates() {
    let mut l = layout();
    let placement = Placement::from_candidates(
        Some(l.logo),
        Some(l.search),
        Some(l.sidebar),
        Some(l.container_a),
    )
    .unwrap();
    Relocator::new(
        &mut l.dom,
        &SimulatedViewport::new(0.0),
        RelocateOptions::new(l.menu, placement),
    )
    .unwrap();
    assert_eq!(l.dom.next_sibling(&l.menu), Some(l.logo));
}

#[test]
fn repeated_setups_share_one_announcement() {
    let mut l = layout();
    for target in [l.sidebar, l.container_a, l.sidebar] {
        Relocator::new(
            &mut l.dom,
            &SimulatedViewport::new(1200.0),
            RelocateOptions::new(l.search, Placement::AppendTo(target)),
        )
        .unwrap();
    }
    assert_eq!(l.dom.all_by_id(HELPER_ID).len(), 1);
    let body = l.dom.body_id();
    assert_eq!(
        l.dom.attribute(&body, "aria-describedby").as_deref(),
        Some(HELPER_ID)
    );
}

#[test]
fn settings_from_json_drive_width_mode() {
    let mut l = layout();
    let settings =
        RelocateSettings::from_json(r#"{"activationThreshold": 768, "debounceIntervalMs": 50}"#)
            .unwrap();
    let relocator = Relocator::new(
        &mut l.dom,
        &SimulatedViewport::new(768.0),
        RelocateOptions::new(l.logo, Placement::AppendTo(l.sidebar)).with_settings(settings),
    )
    .unwrap();
    assert_eq!(relocator.debounce_interval(), Duration::from_millis(50));
    assert!(!relocator.is_moved(), "threshold is exclusive");
}

/// Host loop: resize notifications go through the debouncer; the relocator
/// only sees the width once the burst has settled.
#[test]
fn debounced_resize_burst_evaluates_once() {
    let mut l = layout();
    let mut viewport = SimulatedViewport::new(600.0);
    let mut relocator = Relocator::new(
        &mut l.dom,
        &viewport,
        RelocateOptions::new(l.menu, Placement::AppendTo(l.sidebar)).with_threshold(800.0),
    )
    .unwrap();
    let mut debouncer = Debouncer::new(relocator.debounce_interval());
    let ms = Duration::from_millis;

    let mut evaluations = 0;
    let mut transitions = Vec::new();
    let widths = [650.0, 700.0, 820.0, 900.0, 1000.0];
    for (idx, width) in widths.into_iter().enumerate() {
        let now = ms(idx as u64 * 100);
        viewport.set_width(width);
        debouncer.signal(now);
        if debouncer.poll(now) {
            evaluations += 1;
        }
    }
    assert_eq!(evaluations, 0);
    assert!(!relocator.is_moved());

    assert!(!debouncer.poll(ms(599)));
    assert!(debouncer.poll(ms(600)));
    evaluations += 1;
    transitions.push(relocator.observe_width(&mut l.dom, viewport.width).unwrap());

    assert_eq!(evaluations, 1);
    assert_eq!(transitions, vec![Transition::Moved]);
    assert_eq!(l.dom.children(l.sidebar), &[l.menu]);
}
