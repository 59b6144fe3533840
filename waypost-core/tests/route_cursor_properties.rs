//! Property-based tests for the route cursor.
//!
//! # Invariants tested
//!
//! - **Monotonic cursor:** `current_index` never decreases.
//! - **Bounded cursor:** `current_index` never exceeds `waypoints.len() - 1`.
//! - **Completion is sticky:** once complete, a route stays complete and
//!   reports no next waypoint.

use proptest::prelude::*;
use waypost_core::{Coordinates, Route};

fn waypoints(count: usize) -> Vec<Coordinates> {
    (0..count)
        .map(|i| {
            let offset = f64::from(u32::try_from(i).expect("small index")) * 0.0005;
            Coordinates::from_degrees(-23.55 + offset, -46.63 + offset).expect("valid coordinates")
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the cursor is non-decreasing and bounded by the last index.
    #[test]
    fn cursor_is_monotonic_and_bounded(
        count in 2_usize..40,
        steps in proptest::collection::vec(0_usize..8, 0..60),
    ) {
        let mut route = Route::new(waypoints(count)).expect("valid route");
        let mut previous = route.current_index();
        for step in steps {
            route.advance(step);
            let current = route.current_index();
            prop_assert!(current >= previous, "cursor moved back from {} to {}", previous, current);
            prop_assert!(current <= count - 1, "cursor {} passed last index {}", current, count - 1);
            previous = current;
        }
    }

    /// Property: completion is reached exactly at the last index and sticks.
    #[test]
    fn completion_is_sticky(
        count in 2_usize..20,
        extra in 0_usize..10,
    ) {
        let mut route = Route::new(waypoints(count)).expect("valid route");
        route.advance(count - 1);
        prop_assert!(route.is_complete());
        prop_assert!(route.next_waypoint().is_none());
        route.advance(extra);
        prop_assert!(route.is_complete());
        prop_assert_eq!(route.current_index(), count - 1);
    }
}
