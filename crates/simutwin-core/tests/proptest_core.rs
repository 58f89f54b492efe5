//! Property-based tests for the SimuTwin line engine.
//!
//! Uses proptest to generate random lines and run lengths, then verify the
//! structural invariants hold after every tick.

use simutwin_core::HandoffPolicy;
use simutwin_core::machine::MachineState;
use simutwin_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Processing times for a line of 1..=max_machines machines.
fn arb_times(max_machines: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1..=6u32, 1..=max_machines)
}

fn arb_policy() -> impl Strategy<Value = HandoffPolicy> {
    prop_oneof![Just(HandoffPolicy::Drop), Just(HandoffPolicy::Block)]
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Busy machines always have time left; idle machines hold nothing;
    /// blocked machines hold a product with no time left.
    #[test]
    fn machine_state_consistent(times in arb_times(6), policy in arb_policy(), ticks in 1..60usize) {
        let mut sim = chain(&times, policy);
        for _ in 0..ticks {
            sim.step();
            for m in sim.line().machines() {
                match m.state() {
                    MachineState::Idle => {
                        prop_assert!(m.current_product().is_none());
                        prop_assert_eq!(m.time_remaining(), 0);
                    }
                    MachineState::Busy { .. } => {
                        prop_assert!(m.current_product().is_some());
                        prop_assert!(m.time_remaining() > 0);
                    }
                    MachineState::Blocked { .. } => {
                        prop_assert_eq!(policy, HandoffPolicy::Block);
                        prop_assert_eq!(m.time_remaining(), 0);
                    }
                }
            }
        }
    }

    /// Under the drop policy a machine holds a product iff it has time left.
    #[test]
    fn drop_policy_product_iff_time_left(times in arb_times(6), ticks in 1..60usize) {
        let mut sim = chain(&times, HandoffPolicy::Drop);
        for _ in 0..ticks {
            sim.step();
            for m in sim.line().machines() {
                prop_assert_eq!(m.current_product().is_none(), m.time_remaining() == 0);
            }
        }
    }

    /// The finished counter never decreases and grows by at most the
    /// number of machines per tick.
    #[test]
    fn finished_count_monotonic(times in arb_times(6), policy in arb_policy(), ticks in 1..80usize) {
        let mut sim = chain(&times, policy);
        let mut previous = 0;
        for _ in 0..ticks {
            let finished = sim.step().snapshot.total_products_finished;
            prop_assert!(finished >= previous);
            prop_assert!(finished - previous <= times.len() as u64);
            previous = finished;
        }
    }

    /// The bottleneck set is exactly the machines at the maximum time.
    #[test]
    fn bottleneck_set_is_max_set(times in arb_times(8), ticks in 1..30usize) {
        let mut sim = chain(&times, HandoffPolicy::Drop);
        let max = *times.iter().max().unwrap();
        for _ in 0..ticks {
            let snapshot = sim.step().snapshot;
            for (status, machine) in snapshot.machines.iter().zip(sim.line().machines()) {
                prop_assert_eq!(&status.id, machine.id());
                prop_assert_eq!(status.is_bottleneck, machine.processing_time() == max);
            }
        }
    }

    /// Every admitted product is finished, dropped, or still registered,
    /// and every registered product is held by exactly one machine.
    #[test]
    fn products_are_conserved(times in arb_times(6), policy in arb_policy(), ticks in 1..80usize) {
        let mut sim = chain(&times, policy);
        for _ in 0..ticks {
            let snapshot = sim.step().snapshot;
            prop_assert_eq!(
                sim.total_admitted(),
                sim.total_finished() + sim.total_dropped() + sim.in_flight() as u64
            );
            prop_assert_eq!(snapshot.products.len(), sim.line().occupied());
            for p in &snapshot.products {
                let holder = sim.line().holder_of(p.id);
                prop_assert!(holder.is_some(), "{} has no machine", p.id);
                let (x, y) = holder.unwrap().center();
                prop_assert_eq!((p.x, p.y), (x, y));
            }
            if policy == HandoffPolicy::Block {
                prop_assert_eq!(sim.total_dropped(), 0);
            }
        }
    }

    /// Registered ids are strictly increasing and never exceed the number
    /// of admitted products.
    #[test]
    fn ids_increase_without_gaps(times in arb_times(5), policy in arb_policy(), ticks in 1..60usize) {
        let mut sim = chain(&times, policy);
        for _ in 0..ticks {
            sim.step();
        }
        let ids: Vec<u64> = sim.snapshot().products.iter().map(|p| p.id.0).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ids.iter().all(|&n| n >= 1 && n <= sim.total_admitted()));
    }
}
