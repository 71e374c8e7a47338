//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_variant() -> impl Strategy<Value = DialogueVariant> {
    prop_oneof![Just(DialogueVariant::SinglePath), Just(DialogueVariant::TwoPath)]
}

fn arb_context() -> impl Strategy<Value = DialogueContext> {
    arb_variant().prop_map(DialogueContext::new)
}

fn arb_method() -> impl Strategy<Value = Option<Method>> {
    prop_oneof![
        Just(None),
        Just(Some(Method::Both)),
        Just(Some(Method::MhrOnly)),
    ]
}

fn arb_bpm() -> impl Strategy<Value = i64> {
    prop_oneof![
        3 => -50i64..400,
        1 => any::<i64>(),
        1 => prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(-1i64), Just(0i64)],
    ]
}

fn arb_state() -> impl Strategy<Value = DialogueState> {
    prop_oneof![
        Just(DialogueState::Idle),
        Just(DialogueState::ChoosingMethod),
        arb_method().prop_map(|method| DialogueState::AskMhr { method }),
        arb_bpm().prop_map(|mhr| DialogueState::AskRhr { mhr }),
    ]
}

fn arb_active_state() -> impl Strategy<Value = DialogueState> {
    arb_state().prop_filter("not idle", |s| !s.is_idle())
}

fn arb_non_numeric_text() -> impl Strategy<Value = String> {
    "[a-zA-Z .,!?-]{0,20}".prop_filter("must not parse", |s| parse_bpm(s).is_none())
}

fn arb_text_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_bpm().prop_map(|n| Event::TextInput(n.to_string())),
        arb_non_numeric_text().prop_map(Event::TextInput),
    ]
}

fn arb_button_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(ButtonToken::Both),
        Just(ButtonToken::MhrOnly),
        Just(ButtonToken::Restart),
    ]
    .prop_map(Event::ButtonSelect)
}

fn arb_command_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Cancel),
        "[a-z]{1,8}".prop_map(Command::Other),
    ]
    .prop_map(Event::Command)
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => arb_text_event(),
        2 => arb_button_event(),
        1 => arb_command_event(),
    ]
}

// ============================================================================
// Effect Validity Checker
// ============================================================================

fn effects_are_valid(effects: &[Effect], new_state: &DialogueState) -> bool {
    let persists = effects.contains(&Effect::PersistSession);
    let discards = effects.contains(&Effect::DiscardSession);

    // A session is only stored while a conversation is in progress
    if persists && new_state.is_idle() {
        return false;
    }
    if discards && !new_state.is_idle() {
        return false;
    }
    !(persists && discards)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: Effects agree with the state they lead to
    #[test]
    fn prop_transitions_produce_consistent_effects(
        ctx in arb_context(),
        events in proptest::collection::vec(arb_event(), 0..20)
    ) {
        let mut state = DialogueState::Idle;

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                prop_assert!(
                    effects_are_valid(&result.effects, &result.new_state),
                    "Invalid effects for state {:?}: {:?}",
                    result.new_state,
                    result.effects
                );
                state = result.new_state;
            }
        }
    }

    // Invariant 2: Every state change keeps the session store in sync
    #[test]
    fn prop_state_changes_touch_store(
        ctx in arb_context(),
        state in arb_state(),
        event in arb_event()
    ) {
        if let Ok(result) = transition(&state, &ctx, event) {
            if result.new_state != state {
                prop_assert!(
                    result.effects.iter().any(|e| matches!(e, Effect::PersistSession | Effect::DiscardSession)),
                    "State changed but store untouched: {:?} -> {:?}",
                    state,
                    result.new_state
                );
            }
        }
    }

    // Invariant 3: Malformed numbers re-prompt without changing anything
    #[test]
    fn prop_invalid_number_keeps_state(
        ctx in arb_context(),
        method in arb_method(),
        mhr in arb_bpm(),
        text in arb_non_numeric_text(),
    ) {
        for state in [DialogueState::AskMhr { method }, DialogueState::AskRhr { mhr }] {
            let result = transition(&state, &ctx, Event::TextInput(text.clone()));
            prop_assert!(result.is_ok(), "Invalid input should re-prompt: {:?}", result);
            let result = result.unwrap();
            prop_assert_eq!(result.new_state, state);
            prop_assert_eq!(result.effects.len(), 1);
            prop_assert!(result.effects[0].message().is_some());
        }
    }

    // Invariant 4: Cancel always ends the conversation, and again is a no-op
    #[test]
    fn prop_cancel_reaches_idle(ctx in arb_context(), state in arb_active_state()) {
        let result = transition(&state, &ctx, Event::Command(Command::Cancel));
        prop_assert!(result.is_ok(), "Cancel failed: {:?}", result);
        let result = result.unwrap();
        prop_assert_eq!(result.new_state, DialogueState::Idle);
        prop_assert!(result.effects.contains(&Effect::DiscardSession));

        let again = transition(&result.new_state, &ctx, Event::Command(Command::Cancel)).unwrap();
        prop_assert_eq!(again.new_state, DialogueState::Idle);
        prop_assert!(again.effects.is_empty());
    }

    // Invariant 5: A valid RHR always completes with a five-zone table
    #[test]
    fn prop_rhr_completes(ctx in arb_context(), mhr in arb_bpm(), rhr in arb_bpm()) {
        let result = transition(
            &DialogueState::AskRhr { mhr },
            &ctx,
            Event::TextInput(rhr.to_string()),
        ).unwrap();
        prop_assert_eq!(result.new_state, DialogueState::Idle);
        let table = result.effects.iter().find_map(Effect::message).unwrap();
        prop_assert!(table.text.starts_with(HRR_HEADER));
        prop_assert_eq!(table.text.matches(" BPM").count(), 5);
    }

    // Invariant 6: Start is accepted from every state
    #[test]
    fn prop_start_always_accepted(ctx in arb_context(), state in arb_state()) {
        let result = transition(&state, &ctx, Event::Command(Command::Start));
        prop_assert!(result.is_ok(), "Start rejected: {:?}", result);
        let new_state = result.unwrap().new_state;
        prop_assert!(
            matches!(
                new_state,
                DialogueState::ChoosingMethod | DialogueState::AskMhr { method: Some(Method::Both) }
            ),
            "Unexpected state after start: {:?}",
            new_state
        );
    }

    // Invariant 7: Nothing is accepted while idle except start, cancel and restart
    #[test]
    fn prop_idle_ignores_input(ctx in arb_context(), event in arb_text_event()) {
        let result = transition(&DialogueState::Idle, &ctx, event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::NoConversation);
    }
}
