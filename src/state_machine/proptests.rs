//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::{ChatContext, ChatState};
use super::transition::transition;
use super::{Effect, Event, GenerationOutcome};
use proptest::prelude::*;

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![
        Just(ChatState::Idle),
        "[a-z]{1,10}\\.[a-z]{2,4}".prop_map(|host| ChatState::AwaitingSize {
            url: format!("https://{host}"),
        }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z]{0,12}".prop_map(|name| Event::Command { name }),
        ".{0,40}".prop_map(|text| Event::Text { text }),
        ".{0,20}".prop_map(|token| Event::SizeSelected { token }),
        "[a-z]{1,10}\\.[a-z]{2,4}".prop_map(|host| Event::Generated {
            url: format!("https://{host}"),
            outcome: GenerationOutcome::Failed,
        }),
    ]
}

proptest! {
    #[test]
    fn transition_never_panics(state in arb_state(), event in arb_event()) {
        let _ = transition(&state, &ChatContext::new(1), event);
    }

    #[test]
    fn unrecognized_tokens_never_generate(state in arb_state(), token in ".{0,20}") {
        prop_assume!(!matches!(token.as_str(), "small" | "medium" | "large"));

        let result = transition(
            &state,
            &ChatContext::new(1),
            Event::SizeSelected { token },
        );

        prop_assert_eq!(result.new_state, state);
        let generated = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Generate { .. }));
        prop_assert!(!generated);
    }

    #[test]
    fn accepted_text_always_pends_a_schemed_url(
        state in arb_state(),
        host in "[a-z]{1,10}\\.[a-z]{2,4}",
    ) {
        let result = transition(
            &state,
            &ChatContext::new(1),
            Event::Text { text: host },
        );

        match result.new_state {
            ChatState::AwaitingSize { url } => {
                prop_assert!(url.starts_with("https://"));
            }
            ChatState::Idle => prop_assert!(false, "valid host did not pend"),
        }
    }

    #[test]
    fn failed_generation_never_moves_state(state in arb_state(), host in "[a-z]{1,10}\\.[a-z]{2,4}") {
        let result = transition(
            &state,
            &ChatContext::new(1),
            Event::Generated {
                url: format!("https://{host}"),
                outcome: GenerationOutcome::Failed,
            },
        );
        prop_assert_eq!(result.new_state, state);
    }

    #[test]
    fn commands_never_move_state(state in arb_state(), name in "[a-z]{0,12}") {
        let result = transition(
            &state,
            &ChatContext::new(1),
            Event::Command { name },
        );
        prop_assert_eq!(result.new_state, state);
    }
}
