// Host-side tests for the audio unlock state machine.

use eye_core::{AudioUnlock, InputKind, ResumePolicy, UnlockState, UnlockStep, UnlockTrigger};

fn unlock() -> AudioUnlock {
    AudioUnlock::new(UnlockTrigger::first_interaction(), ResumePolicy::default())
}

fn policy() -> ResumePolicy {
    ResumePolicy {
        timeout_sec: 3.0,
        retry_delay_sec: 1.0,
        max_attempts: 4,
    }
}

#[test]
fn starts_locked() {
    let u = unlock();
    assert_eq!(u.state(), UnlockState::Locked);
    assert_eq!(u.attempts(), 0);
}

#[test]
fn racing_inputs_issue_a_single_resume() {
    let mut u = unlock();
    let steps: Vec<_> = [
        InputKind::PointerMove,
        InputKind::PointerDown,
        InputKind::KeyDown,
        InputKind::PointerMove,
    ]
    .into_iter()
    .filter_map(|k| u.handle_input(k, 0.0))
    .collect();
    assert_eq!(steps, [UnlockStep::Resume { attempt: 1 }]);
    assert_eq!(u.state(), UnlockState::Unlocking);
}

#[test]
fn active_only_after_confirmation() {
    let mut u = unlock();
    u.handle_input(InputKind::KeyDown, 0.0);
    assert_eq!(u.poll(1.0), None);
    assert_eq!(u.state(), UnlockState::Unlocking);
    assert!(u.resume_succeeded(1));
    assert_eq!(u.state(), UnlockState::Active);
}

#[test]
fn state_never_moves_backward() {
    let mut u = unlock();
    u.handle_input(InputKind::PointerDown, 0.0);
    u.resume_succeeded(1);
    assert_eq!(u.handle_input(InputKind::PointerDown, 1.0), None);
    assert_eq!(u.resume_failed(1, 2.0), None);
    assert_eq!(u.poll(100.0), None);
    assert_eq!(u.retry_now(101.0), None);
    assert!(!u.resume_succeeded(1));
    assert_eq!(u.state(), UnlockState::Active);
}

#[test]
fn confirmation_without_a_request_is_ignored() {
    let mut u = unlock();
    assert!(!u.resume_succeeded(1));
    assert_eq!(u.state(), UnlockState::Locked);
}

#[test]
fn pending_resume_waits_until_timeout() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    u.handle_input(InputKind::PointerMove, 0.0);
    for i in 0..179 {
        assert_eq!(u.poll(i as f64 / 60.0), None);
    }
    assert_eq!(u.state(), UnlockState::Unlocking);
}

#[test]
fn hung_resumes_retry_then_stall() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    assert_eq!(
        u.handle_input(InputKind::PointerMove, 0.0),
        Some(UnlockStep::Resume { attempt: 1 })
    );
    assert_eq!(u.poll(3.0), Some(UnlockStep::Resume { attempt: 2 }));
    assert_eq!(u.poll(6.0), Some(UnlockStep::Resume { attempt: 3 }));
    assert_eq!(u.poll(9.0), Some(UnlockStep::Resume { attempt: 4 }));
    assert_eq!(u.poll(12.0), Some(UnlockStep::Stalled));
    assert!(u.is_stalled());
    assert_eq!(u.poll(1000.0), None);
    assert_eq!(u.state(), UnlockState::Unlocking);
}

#[test]
fn rejected_resume_retries_after_delay() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    u.handle_input(InputKind::KeyDown, 0.0);
    assert_eq!(u.resume_failed(1, 0.5), None);
    assert_eq!(u.poll(1.0), None);
    assert_eq!(u.poll(1.5), Some(UnlockStep::Resume { attempt: 2 }));
}

#[test]
fn stale_failure_reports_are_ignored() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    u.handle_input(InputKind::KeyDown, 0.0);
    assert_eq!(u.poll(3.0), Some(UnlockStep::Resume { attempt: 2 }));
    assert_eq!(u.resume_failed(1, 3.1), None);
    // attempt 2 is still the one in flight
    assert_eq!(u.poll(4.0), None);
    assert_eq!(u.poll(6.0), Some(UnlockStep::Resume { attempt: 3 }));
}

#[test]
fn late_success_of_a_timed_out_attempt_still_activates() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    u.handle_input(InputKind::KeyDown, 0.0);
    u.poll(3.0);
    assert!(u.resume_succeeded(1));
    assert_eq!(u.state(), UnlockState::Active);
    assert_eq!(u.poll(10.0), None);
}

#[test]
fn fallback_retry_starts_a_new_series() {
    let mut u = AudioUnlock::new(UnlockTrigger::first_interaction(), policy());
    u.handle_input(InputKind::KeyDown, 0.0);
    for t in [3.0, 6.0, 9.0, 12.0] {
        u.poll(t);
    }
    assert!(u.is_stalled());
    assert_eq!(u.retry_now(20.0), Some(UnlockStep::Resume { attempt: 5 }));
    assert!(!u.is_stalled());
    assert_eq!(u.poll(23.0), Some(UnlockStep::Resume { attempt: 6 }));
}

#[test]
fn retry_now_is_ignored_while_an_attempt_is_in_flight() {
    let mut u = unlock();
    u.handle_input(InputKind::KeyDown, 0.0);
    assert_eq!(u.retry_now(0.5), None);
    assert_eq!(u.attempts(), 1);
}

#[test]
fn input_after_stall_rearms() {
    let mut u = AudioUnlock::new(
        UnlockTrigger::first_interaction(),
        ResumePolicy {
            max_attempts: 1,
            ..policy()
        },
    );
    u.handle_input(InputKind::KeyDown, 0.0);
    assert_eq!(u.poll(3.0), Some(UnlockStep::Stalled));
    assert_eq!(
        u.handle_input(InputKind::PointerDown, 4.0),
        Some(UnlockStep::Resume { attempt: 2 })
    );
}

#[test]
fn click_to_enter_ignores_other_inputs() {
    let mut u = AudioUnlock::new(UnlockTrigger::click_to_enter(), policy());
    assert_eq!(u.handle_input(InputKind::PointerMove, 0.0), None);
    assert_eq!(u.handle_input(InputKind::KeyDown, 0.0), None);
    assert_eq!(u.state(), UnlockState::Locked);
    assert_eq!(
        u.handle_input(InputKind::Click, 0.1),
        Some(UnlockStep::Resume { attempt: 1 })
    );
}
