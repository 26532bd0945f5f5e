//! Property-based tests for the graph registry and transition pipeline.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use ladon::core::{Context, LoadStrategy, StateDefinition, StateType};
use ladon::fsm::{FiniteStateMachine, FirstMatch, ModelError, ModelPolicy};
use ladon::graph::Graph;
use ladon::transition::Transition;
use ladon::{model_state, Config};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SPOKES: usize = 6;

static LOOP_LOADS: AtomicUsize = AtomicUsize::new(0);

model_state! {
    /// Hub whose spoke `i` is valid when the context flag `spoke{i}` is set.
    struct Hub;
    transitions: (0..SPOKES)
        .map(|i| {
            let key = format!("spoke{i}");
            Transition::builder()
                .from::<Hub>()
                .to::<Hub>()
                .when_context(move |ctx| ctx.flag(&key))
                .build()
                .unwrap()
        })
        .collect();
}

model_state! {
    /// Counts how often its transitions are declared.
    struct Loop;
    transitions: {
        LOOP_LOADS.fetch_add(1, Ordering::SeqCst);
        vec![Transition::builder().from::<Loop>().to::<Loop>().build().unwrap()]
    };
}

model_state! {
    /// Only used by the prefilter properties.
    struct Junction;
    transitions: Vec::new();
}

fn spokes(count: usize) -> Vec<Arc<Transition>> {
    (0..count)
        .map(|i| {
            Arc::new(
                Transition::builder()
                    .from::<Junction>()
                    .to_name(format!("Spoke{i}"))
                    .build()
                    .unwrap(),
            )
        })
        .collect()
}

fn arbitrary_strategy() -> impl Strategy<Value = LoadStrategy> {
    prop_oneof![
        Just(LoadStrategy::Lazy),
        Just(LoadStrategy::Eager),
        Just(LoadStrategy::Connected),
    ]
}

prop_compose! {
    fn arbitrary_context()(flags in prop::collection::vec(any::<bool>(), SPOKES)) -> Context {
        flags
            .into_iter()
            .enumerate()
            .fold(Context::new(), |context, (i, flag)| context.with(format!("spoke{i}"), flag))
    }
}

proptest! {
    #[test]
    fn prefilter_keeps_order_and_subset(
        caller_mask in prop::collection::vec(any::<bool>(), 0..12),
        model_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let options = spokes(caller_mask.len());
        let model_allowed: HashSet<String> = (0..options.len())
            .filter(|i| model_mask[*i])
            .map(|i| format!("Spoke{i}"))
            .collect();
        let caller_allowed: HashSet<String> = (0..options.len())
            .filter(|i| caller_mask[*i])
            .map(|i| format!("Spoke{i}"))
            .collect();

        let fsm = FiniteStateMachine::new(Config::new())
            .with_policy(FirstMatch.with_prefilter(move |t: &Transition| {
                model_allowed.contains(t.target_name())
            }));
        let filter = |t: &Transition| caller_allowed.contains(t.target_name());

        let kept: Vec<String> = fsm
            .prefiltered_transitions(&options, Some(&filter))
            .iter()
            .map(|t| t.target_name().to_string())
            .collect();
        let expected: Vec<String> = (0..options.len())
            .filter(|i| caller_mask[*i] && model_mask[*i])
            .map(|i| format!("Spoke{i}"))
            .collect();

        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn prefilter_without_predicates_keeps_everything(count in 0..12usize) {
        let options = spokes(count);
        let fsm = FiniteStateMachine::new(Config::new());

        let kept = fsm.prefiltered_transitions(&options, None);

        prop_assert_eq!(kept.len(), count);
        for (transition, original) in kept.iter().zip(options.iter()) {
            prop_assert!(Arc::ptr_eq(transition, original));
        }
    }

    #[test]
    fn transitions_load_once_whatever_the_strategies(
        strategies in prop::collection::vec(arbitrary_strategy(), 1..6),
    ) {
        let looped = StateType::of::<Loop>();
        let mut graph = Graph::new(Config::new());

        let before = LOOP_LOADS.load(Ordering::SeqCst);
        for strategy in &strategies {
            graph.load_state_type(looped, *strategy).unwrap();
            graph.load_transitions(looped, *strategy).unwrap();
        }

        prop_assert_eq!(LOOP_LOADS.load(Ordering::SeqCst) - before, 1);
        prop_assert!(graph.state_loaded(&looped));
        prop_assert_eq!(graph.transitions_for(&looped).len(), 1);
    }

    #[test]
    fn no_current_state_always_fails(
        context in arbitrary_context(),
        strategy in arbitrary_strategy(),
    ) {
        let mut fsm = FiniteStateMachine::new(Config::new()).with_policy(FirstMatch);

        prop_assert!(matches!(
            fsm.valid_transitions(&[], &context),
            Err(ModelError::NoCurrentState)
        ));
        prop_assert!(matches!(
            fsm.make_transition(strategy, &context, None),
            Err(ModelError::NoCurrentState)
        ));
    }

    #[test]
    fn base_policy_never_selects(context in arbitrary_context()) {
        let mut fsm = FiniteStateMachine::new(Config::new());
        fsm.use_state_type(StateType::of::<Hub>(), LoadStrategy::Lazy).unwrap();

        let result = fsm.make_transition(LoadStrategy::Lazy, &context, None);

        prop_assert!(
            matches!(result, Err(ModelError::MissingImplementation { hook: "selection_strategy" })),
            "expected MissingImplementation"
        );
    }

    #[test]
    fn validated_set_matches_guards(context in arbitrary_context()) {
        let mut fsm = FiniteStateMachine::new(Config::new());
        let hub = StateType::of::<Hub>();
        fsm.use_state_type(hub, LoadStrategy::Eager).unwrap();

        let options = fsm.graph().transitions_for(&hub).to_vec();
        let valid = fsm.valid_transitions(&options, &context).unwrap();

        let expected = (0..SPOKES)
            .filter(|i| context.flag(&format!("spoke{i}")))
            .count();
        prop_assert_eq!(valid.len(), expected);
    }
}

#[test]
fn junction_declares_nothing() {
    assert!(Junction::transitions().is_empty());
}
