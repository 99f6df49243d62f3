#![forbid(unsafe_code)]

//! Property tests for relocation and debounce invariants.
//!
//! Run:
//!   cargo test -p domshift-core --test proptest_relocate_invariants

use core::time::Duration;

use domshift_core::memory::{MemoryDom, NodeId};
use domshift_core::viewport::SimulatedViewport;
use domshift_core::{
    ActivationState, Debouncer, DomTree, Placement, RelocateOptions, Relocator, Transition,
};
use proptest::prelude::*;

/// A body with two sections: the source section holds `source_len` children
/// (the element sits at `element_at`), the target section holds
/// `target_len` children.
struct Fixture {
    dom: MemoryDom,
    source: NodeId,
    target: NodeId,
    element: NodeId,
    target_children: Vec<NodeId>,
}

fn fixture(source_len: usize, element_at: usize, target_len: usize, text_gaps: bool) -> Fixture {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let source = dom.append_new(body, "section").unwrap();
    let target = dom.append_new(body, "section").unwrap();
    let mut element = None;
    for idx in 0..source_len {
        if text_gaps {
            let gap = dom.create_text("\n");
            dom.append_child(&source, &gap).unwrap();
        }
        let child = dom.append_new(source, "div").unwrap();
        if idx == element_at {
            element = Some(child);
        }
    }
    let target_children = (0..target_len)
        .map(|_| dom.append_new(target, "span").unwrap())
        .collect();
    Fixture {
        dom,
        source,
        target,
        element: element.unwrap(),
        target_children,
    }
}

fn placement_for(f: &Fixture, kind: u8, ref_at: usize) -> Placement<NodeId> {
    let reference = f.target_children.get(ref_at).copied();
    match (kind % 4, reference) {
        (0, Some(r)) => Placement::Before(r),
        (1, Some(r)) => Placement::After(r),
        (2, _) => Placement::PrependTo(f.target),
        _ => Placement::AppendTo(f.target),
    }
}

fn assert_placed(f: &Fixture, placement: &Placement<NodeId>) {
    let dom = &f.dom;
    match placement {
        Placement::Before(r) => assert_eq!(dom.next_sibling(&f.element), Some(*r)),
        Placement::After(r) => assert_eq!(dom.next_sibling(r), Some(f.element)),
        Placement::PrependTo(c) => assert_eq!(dom.first_child(c), Some(f.element)),
        Placement::AppendTo(c) => assert_eq!(dom.children(*c).last(), Some(&f.element)),
    }
    let occurrences = dom
        .children(f.target)
        .iter()
        .filter(|&&c| c == f.element)
        .count();
    assert_eq!(occurrences, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn move_then_reset_restores_exact_position(
        source_len in 1usize..6,
        element_pick in 0usize..6,
        target_len in 0usize..4,
        ref_pick in 0usize..4,
        kind in 0u8..4,
        text_gaps in any::<bool>(),
    ) {
        let element_at = element_pick % source_len;
        let mut f = fixture(source_len, element_at, target_len, text_gaps);
        let original_children = f.dom.children(f.source).to_vec();
        let original_next = f.dom.next_sibling(&f.element);
        let placement = placement_for(&f, kind, ref_pick % target_len.max(1));

        let mut relocator = Relocator::new(
            &mut f.dom,
            &SimulatedViewport::new(1000.0),
            RelocateOptions::new(f.element, placement.clone()).with_threshold(500.0),
        )
        .unwrap();
        prop_assert!(relocator.is_moved());
        assert_placed(&f, &placement);

        prop_assert_eq!(relocator.reset(&mut f.dom), Ok(Transition::Reset));
        prop_assert_eq!(f.dom.children(f.source), original_children.as_slice());
        prop_assert_eq!(f.dom.next_sibling(&f.element), original_next);
        prop_assert!(relocator.original_position().holds(&f.dom, &f.element));
    }

    #[test]
    fn width_state_tracks_threshold_without_redundant_writes(
        threshold in 320.0f64..1600.0,
        widths in prop::collection::vec(0.0f64..2000.0, 1..24),
    ) {
        let mut f = fixture(3, 1, 2, false);
        let mut relocator = Relocator::new(
            &mut f.dom,
            &SimulatedViewport::new(widths[0]),
            RelocateOptions::new(f.element, Placement::AppendTo(f.target))
                .with_threshold(threshold),
        )
        .unwrap();

        let mut state = relocator.state();
        for &width in &widths {
            for _ in 0..3 {
                let before = f.dom.mutations();
                let transition = relocator.observe_width(&mut f.dom, width).unwrap();
                let expected = ActivationState::from_condition(width > threshold);
                prop_assert_eq!(relocator.state(), expected);
                if expected == state {
                    prop_assert_eq!(transition, Transition::Unchanged);
                    prop_assert_eq!(f.dom.mutations(), before);
                } else {
                    prop_assert_eq!(f.dom.mutations(), before + 1);
                }
                state = expected;
            }
        }
    }

    #[test]
    fn burst_within_interval_yields_one_evaluation(
        interval_ms in 1u64..500,
        gaps in prop::collection::vec(0u64..500, 1..32),
    ) {
        let interval = Duration::from_millis(interval_ms);
        let mut debouncer = Debouncer::new(interval);
        let mut now = Duration::ZERO;
        let mut fired = 0;
        for (idx, gap) in gaps.iter().enumerate() {
            if idx > 0 {
                // Keep every gap strictly inside the interval.
                now += Duration::from_millis(gap % interval_ms);
            }
            debouncer.signal(now);
            if debouncer.poll(now) {
                fired += 1;
            }
        }
        let last = now;
        prop_assert_eq!(fired, 0);
        prop_assert!(!debouncer.poll(last + interval - Duration::from_nanos(1)));
        prop_assert!(debouncer.poll(last + interval));
        prop_assert!(!debouncer.poll(last + interval * 4));
    }
}
