use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scriptide_primitives::Position;

use super::*;

fn at(line: u32) -> Position {
	Position::new(line, 0)
}

fn lines(history: &NavigationHistory) -> Vec<u32> {
	history.checkpoints().iter().map(|p| p.line).collect()
}

#[test]
fn nearby_moves_coalesce_into_one_checkpoint() {
	let mut h = NavigationHistory::default();
	assert_eq!(h.record_position(at(10)), RecordOutcome::Checkpoint(0));
	assert_eq!(h.record_position(at(10)), RecordOutcome::Coalesced);
	assert_eq!(h.record_position(at(11)), RecordOutcome::Coalesced);
	assert_eq!(h.record_position(at(50)), RecordOutcome::Checkpoint(1));

	assert_eq!(lines(&h), vec![11, 50]);
	assert_eq!(h.pointer_current(), Some(1));
	assert_eq!(h.pointer_end(), Some(1));
}

#[test]
fn coalescing_tracks_last_line_not_checkpoint_origin() {
	let mut h = NavigationHistory::default();
	h.record_position(at(10));
	// Creeping one line at a time never leaves the neighborhood.
	for line in 11..=20 {
		assert_eq!(h.record_position(at(line)), RecordOutcome::Coalesced);
	}
	assert_eq!(lines(&h), vec![20]);
}

#[test]
fn empty_history_navigation_is_noop() {
	let mut h = NavigationHistory::default();
	assert_eq!(h.go_back(), None);
	assert_eq!(h.go_forward(), None);
	assert!(h.is_empty());
	assert_eq!(h.state(), NavState::default());
}

#[test]
fn back_twice_forward_twice_returns_to_latest() {
	let mut h = NavigationHistory::default();
	h.record_position(at(5));
	h.record_position(at(40));
	h.record_position(at(90));
	let before = h.current();

	assert_eq!(h.go_back(), Some(at(40)));
	h.record_position(at(40));
	assert_eq!(h.go_back(), Some(at(5)));
	h.record_position(at(5));
	assert_eq!(h.go_back(), None);
	assert_eq!(h.go_forward(), Some(at(40)));
	h.record_position(at(40));
	assert_eq!(h.go_forward(), Some(at(90)));
	h.record_position(at(90));
	assert_eq!(h.go_forward(), None);

	assert_eq!(h.current(), before);
	assert_eq!(h.pointer_current(), h.pointer_end());
}

#[test]
fn replayed_jump_is_not_recorded() {
	let mut h = NavigationHistory::default();
	h.record_position(at(5));
	h.record_position(at(40));
	h.go_back();
	assert_eq!(h.next_change(), PositionChange::NoStore);
	assert_eq!(h.record_position(at(5)), RecordOutcome::Skipped);
	assert_eq!(lines(&h), vec![5, 40]);
	assert_eq!(h.pointer_current(), Some(0));
}

#[test]
fn new_checkpoint_after_back_cuts_redo_horizon() {
	let mut h = NavigationHistory::default();
	h.record_position(at(5));
	h.record_position(at(40));
	h.record_position(at(90));
	h.go_back();
	h.go_back();
	h.mark_next(PositionChange::Record);

	assert_eq!(h.record_position(at(200)), RecordOutcome::Checkpoint(1));
	assert_eq!(lines(&h), vec![5, 200]);
	assert_eq!(h.state(), NavState {
		back_enabled: true,
		forward_enabled: false
	});
	assert_eq!(h.go_forward(), None);
}

#[test]
fn moves_near_replayed_checkpoint_coalesce_into_it() {
	let mut h = NavigationHistory::default();
	h.record_position(at(5));
	h.record_position(at(40));
	h.go_back();
	h.record_position(at(5));
	// last line is now the replayed checkpoint's line.
	assert_eq!(h.record_position(at(6)), RecordOutcome::Coalesced);
	assert_eq!(lines(&h), vec![6, 40]);
	assert!(h.state().forward_enabled);
}

#[test]
fn override_current_replaces_checkpoint() {
	let mut h = NavigationHistory::default();
	h.record_position(at(5));
	h.record_position(at(40));
	h.mark_next(PositionChange::OverrideCurrent);
	assert_eq!(h.record_position(at(300)), RecordOutcome::Overridden);
	assert_eq!(lines(&h), vec![5, 300]);
	assert_eq!(h.next_change(), PositionChange::Record);
}

#[test]
fn override_on_empty_history_is_skipped() {
	let mut h = NavigationHistory::default();
	h.mark_next(PositionChange::OverrideCurrent);
	assert_eq!(h.record_position(at(3)), RecordOutcome::Skipped);
	assert!(h.is_empty());
	assert_eq!(h.record_position(at(3)), RecordOutcome::Checkpoint(0));
}

#[test]
fn disabled_recording_persists_until_reenabled() {
	let mut h = NavigationHistory::default();
	h.record_position(at(1));
	h.set_recording(false);
	for line in [50, 100, 150] {
		assert_eq!(h.record_position(at(line)), RecordOutcome::Disabled);
	}
	h.record_position(at(1));
	assert!(!h.is_recording());
	h.set_recording(true);
	assert_eq!(h.record_position(at(80)), RecordOutcome::Checkpoint(1));
}

#[test]
fn wider_coalescing_radius() {
	let mut h = NavigationHistory::new(3);
	h.record_position(at(10));
	assert_eq!(h.record_position(at(13)), RecordOutcome::Coalesced);
	assert_eq!(h.record_position(at(17)), RecordOutcome::Checkpoint(1));
}

#[test]
fn first_move_to_line_zero_is_recorded() {
	let mut h = NavigationHistory::default();
	assert_eq!(h.record_position(at(0)), RecordOutcome::Checkpoint(0));
	assert_eq!(h.record_position(at(1)), RecordOutcome::Coalesced);
}

#[test]
fn should_create_checkpoint_decision() {
	assert!(should_create_checkpoint(None, 0, 1));
	assert!(!should_create_checkpoint(Some(10), 11, 1));
	assert!(!should_create_checkpoint(Some(10), 9, 1));
	assert!(should_create_checkpoint(Some(10), 12, 1));
	assert!(should_create_checkpoint(Some(10), 8, 1));
}

#[test]
fn nav_state_is_pure_function_of_pointers() {
	assert_eq!(NavState::from_pointers(None, None), NavState::default());
	assert_eq!(NavState::from_pointers(Some(0), Some(0)), NavState {
		back_enabled: false,
		forward_enabled: false
	});
	assert_eq!(NavState::from_pointers(Some(1), Some(3)), NavState {
		back_enabled: true,
		forward_enabled: true
	});
}

#[test]
fn clear_resets_everything() {
	let mut h = NavigationHistory::default();
	h.record_position(at(1));
	h.record_position(at(20));
	h.set_recording(false);
	h.clear();
	assert!(h.is_empty());
	assert!(h.is_recording());
	assert_eq!(h.record_position(at(21)), RecordOutcome::Checkpoint(0));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of bounds")]
fn bounds_violation_asserts_in_debug() {
	let mut h = NavigationHistory::default();
	h.record_position(at(1));
	h.corrupt_for_test(4, 7);
	h.go_back();
}

#[test]
#[cfg(not(debug_assertions))]
fn bounds_violation_is_clamped_in_release() {
	let mut h = NavigationHistory::default();
	h.record_position(at(1));
	h.record_position(at(20));
	h.corrupt_for_test(4, 7);
	assert_eq!(h.go_back(), Some(at(1)));
	assert!(h.validate().is_ok());
}

#[test]
fn drifted_pointers_over_empty_list_read_as_empty() {
	let mut h = NavigationHistory::default();
	h.corrupt_for_test(2, 5);
	assert!(h.checkpoints().is_empty());
	assert_eq!(h.len(), 0);
	assert_eq!(h.current(), None);
}

#[derive(Debug, Clone)]
enum Op {
	Record(u32),
	Back,
	Forward,
	NoStore,
	Override,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		4 => (0u32..200).prop_map(Op::Record),
		2 => Just(Op::Back),
		2 => Just(Op::Forward),
		1 => Just(Op::NoStore),
		1 => Just(Op::Override),
	]
}

proptest! {
	#[test]
	fn pointers_stay_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
		let mut h = NavigationHistory::default();
		for op in ops {
			match op {
				Op::Record(line) => { h.record_position(at(line)); }
				Op::Back => { h.go_back(); }
				Op::Forward => { h.go_forward(); }
				Op::NoStore => h.mark_next(PositionChange::NoStore),
				Op::Override => h.mark_next(PositionChange::OverrideCurrent),
			}
			prop_assert!(h.validate().is_ok());
			let state = h.state();
			match (h.pointer_current(), h.pointer_end()) {
				(Some(cur), Some(end)) => {
					prop_assert!(cur <= end);
					prop_assert!(end < h.len());
					prop_assert_eq!(state.back_enabled, cur > 0);
					prop_assert_eq!(state.forward_enabled, cur < end);
				}
				(None, None) => prop_assert!(h.is_empty()),
				other => prop_assert!(false, "mismatched pointers {:?}", other),
			}
		}
	}

	#[test]
	fn back_then_forward_round_trips(targets in prop::collection::vec(0u32..1000, 1..16), steps in 0usize..16) {
		let mut h = NavigationHistory::new(0);
		let mut last = None;
		for line in targets {
			if last != Some(line) {
				h.record_position(at(line));
				last = Some(line);
			}
		}
		let before = h.current();
		let mut taken = 0;
		for _ in 0..steps {
			if h.go_back().is_some() {
				taken += 1;
			}
		}
		for _ in 0..taken {
			prop_assert!(h.go_forward().is_some());
		}
		prop_assert_eq!(h.current(), before);
	}
}
