//! End-to-end orchestrator tests against a scripted in-process backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use oob_core::context::keys;
use oob_core::expiry::{compute_expiry, parse_deadline};
use oob_core::{CollectedInput, Context, Outcome, StepConfig, StepError, StepResult};
use oob_remote::{RemoteClient, RemoteFailure, RemoteReply, RemoteRequest, RemoteResponse};
use oob_steps::{step_for, Step, StepKind};

/// Scripted backend: pops one reply per call and counts invocations.
struct MockClient {
    replies: Mutex<VecDeque<StepResult<RemoteReply>>>,
    calls: AtomicUsize,
}

impl MockClient {
    fn scripted(replies: Vec<StepResult<RemoteReply>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn unreachable_backend() -> Arc<Self> {
        Self::scripted(vec![Err(StepError::Transport(
            "connection refused".to_string(),
        ))])
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteClient for MockClient {
    async fn send(&self, _request: &RemoteRequest) -> StepResult<RemoteReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StepError::Transport("no scripted reply".to_string())))
    }
}

fn approved_reply() -> StepResult<RemoteReply> {
    Ok(RemoteReply::Ok(RemoteResponse {
        retcode: "0".to_string(),
        session_id: Some("s-42".to_string()),
        request_id: Some("r-42".to_string()),
        command: Some("approve-login".to_string()),
        challenge: Some("PAYLOAD".to_string()),
        risk_response_code: Some(500),
        ..RemoteResponse::default()
    }))
}

fn status_reply(status: &str) -> StepResult<RemoteReply> {
    Ok(RemoteReply::Ok(RemoteResponse {
        retcode: "0".to_string(),
        session_status: Some(status.to_string()),
        ..RemoteResponse::default()
    }))
}

fn login_context() -> Context {
    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    ctx.set(keys::FINGERPRINT_RAW, "raw-fp");
    ctx.set(keys::FINGERPRINT_HASH, "hash-fp");
    ctx
}

fn polling_context(timeout_seconds: i64) -> Context {
    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    ctx.set(keys::SESSION_ID, "s-42");
    ctx.set(keys::REQUEST_ID, "r-42");
    ctx.set(keys::EVENT_EXPIRY_DATE, compute_expiry(timeout_seconds));
    ctx
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_backend() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let step = step_for(StepKind::Login, StepConfig::new(), client.clone());

    let mut ctx = Context::new();
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Error));
    assert_eq!(client.call_count(), 0);
    assert!(ctx.get_str(keys::ERROR_MESSAGE).unwrap().contains("username"));
}

#[tokio::test]
async fn empty_context_errors_on_every_step_requiring_username() {
    for kind in [
        StepKind::RegisterDevice,
        StepKind::Login,
        StepKind::ValidateEvent,
        StepKind::ValidateTransaction,
        StepKind::CheckActivation,
        StepKind::CheckSessionStatus,
    ] {
        let client = MockClient::scripted(vec![approved_reply()]);
        let step = step_for(kind, StepConfig::new(), client.clone());

        let mut ctx = Context::new();
        let output = step.process(&mut ctx, &CollectedInput::new()).await;

        assert_eq!(output.outcome, Some(Outcome::Error), "step {kind}");
        assert_eq!(client.call_count(), 0, "step {kind}");
    }
}

#[tokio::test]
async fn expired_deadline_times_out_without_backend_contact() {
    // Backend unreachable on purpose: the timeout must not depend on it.
    let client = MockClient::unreachable_backend();
    let step = step_for(StepKind::CheckSessionStatus, StepConfig::new(), client.clone());

    let mut ctx = polling_context(-10);
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Timeout));
    assert_eq!(client.call_count(), 0);
    assert!(ctx.contains(keys::ERROR_MESSAGE));
}

#[tokio::test]
async fn pending_poll_leaves_the_deadline_untouched() {
    let client = MockClient::scripted(vec![status_reply("pending")]);
    let step = step_for(StepKind::CheckSessionStatus, StepConfig::new(), client.clone());

    let mut ctx = polling_context(300);
    let before = ctx.clone();
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Pending));
    assert_eq!(client.call_count(), 1);
    assert_eq!(ctx, before);
}

#[tokio::test]
async fn approved_initiation_steps_up_with_a_fresh_deadline() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let step = step_for(StepKind::Login, StepConfig::new(), client.clone());

    let mut ctx = login_context();
    ctx.set(keys::EVENT_EXPIRY_DATE, "1000");
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::StepUp));
    assert_eq!(ctx.get_str(keys::SESSION_ID), Some("s-42"));
    assert_eq!(ctx.get_str(keys::REQUEST_ID), Some("r-42"));
    assert_eq!(ctx.get_str(keys::CHALLENGE_MESSAGE), Some("PAYLOAD"));
    assert_eq!(ctx.get_str(keys::IRM_RESPONSE), Some("500"));

    let deadline = parse_deadline(ctx.get_str(keys::EVENT_EXPIRY_DATE).unwrap()).unwrap();
    assert!(deadline > 1000, "deadline must be strictly newer");
}

#[tokio::test]
async fn unmatched_username_on_status_check_is_unknown() {
    let client = MockClient::scripted(vec![status_reply("unknown")]);
    let step = step_for(StepKind::CheckActivation, StepConfig::new(), client.clone());

    let mut ctx = polling_context(300);
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Unknown));
}

#[tokio::test]
async fn accepted_activation_poll_succeeds() {
    let response = RemoteResponse {
        retcode: "0".to_string(),
        session_status: Some("accepted".to_string()),
        device_status: Some("activated".to_string()),
        serial_number: Some("DP0123456".to_string()),
        risk_response_code: Some(0),
        ..RemoteResponse::default()
    };
    let client = MockClient::scripted(vec![Ok(RemoteReply::Ok(response))]);
    let step = step_for(StepKind::CheckActivation, StepConfig::new(), client.clone());

    let mut ctx = polling_context(300);
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Success));
    assert_eq!(ctx.get_str(keys::DEVICE_STATUS), Some("activated"));
}

#[tokio::test]
async fn status_check_is_idempotent_across_polls() {
    let client = MockClient::scripted(vec![status_reply("pending"), status_reply("pending")]);
    let step = step_for(StepKind::CheckSessionStatus, StepConfig::new(), client.clone());

    let mut ctx = polling_context(300);
    let first = step.process(&mut ctx, &CollectedInput::new()).await;
    let after_first = ctx.clone();
    let second = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(ctx, after_first);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn transport_failure_surfaces_as_error_with_message() {
    let client = MockClient::unreachable_backend();
    let step = step_for(StepKind::Login, StepConfig::new(), client.clone());

    let mut ctx = login_context();
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Error));
    assert!(ctx
        .get_str(keys::ERROR_MESSAGE)
        .unwrap()
        .contains("connection refused"));
    // Only the error key is written on failure.
    assert_eq!(ctx.get_str(keys::SESSION_ID), None);
}

#[tokio::test]
async fn failed_initiation_does_not_retain_the_collected_credential() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let config = StepConfig::new().with_credential_key("pin");
    let step = step_for(StepKind::Login, config, client.clone());

    // Fingerprints missing, so the request build fails before any send.
    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    let input = CollectedInput::new().with_credential("123456");
    let output = step.process(&mut ctx, &input).await;

    assert_eq!(output.outcome, Some(Outcome::Error));
    assert_eq!(client.call_count(), 0);
    assert!(!ctx.contains("pin"), "credential must not survive a failure");
    assert!(ctx.contains(keys::ERROR_MESSAGE));
}

#[tokio::test]
async fn backend_refusal_is_an_error_on_initiation() {
    let client = MockClient::scripted(vec![Ok(RemoteReply::Refused(RemoteFailure {
        retcode: "500".to_string(),
        business_retcode: "1010".to_string(),
        message: "user suspended".to_string(),
    }))]);
    let step = step_for(StepKind::Login, StepConfig::new(), client.clone());

    let mut ctx = login_context();
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Error));
    assert_eq!(ctx.get_str(keys::ERROR_MESSAGE), Some("user suspended"));
}

#[tokio::test]
async fn transaction_validation_forwards_mapped_attributes() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let config = StepConfig::new()
        .with_attribute("amount", "txAmount")
        .with_attribute("currency", "txCurrency")
        .with_attribute("creditorIBAN", "txIban");
    let step = step_for(StepKind::ValidateTransaction, config, client.clone());

    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    ctx.set("txAmount", "250.00");
    ctx.set("txCurrency", "EUR");
    ctx.set("txIban", "DE89370400440532013000");
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::StepUp));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn transaction_validation_with_missing_attribute_never_calls_out() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let config = StepConfig::new().with_attribute("amount", "txAmount");
    let step = step_for(StepKind::ValidateTransaction, config, client.clone());

    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::Error));
    assert_eq!(client.call_count(), 0);
    assert!(ctx.get_str(keys::ERROR_MESSAGE).unwrap().contains("amount"));
}

#[tokio::test]
async fn dynamic_event_type_is_read_from_the_context() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let step = step_for(StepKind::ValidateEvent, StepConfig::new(), client.clone());

    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");
    ctx.set(keys::EVENT_TYPE, "PasswordReset");
    let output = step.process(&mut ctx, &CollectedInput::new()).await;

    assert_eq!(output.outcome, Some(Outcome::StepUp));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn collector_feeds_a_following_initiation_step() {
    let client = MockClient::scripted(vec![approved_reply()]);
    let collect_config = StepConfig::new()
        .with_required_input(keys::FINGERPRINT_RAW)
        .with_required_input(keys::FINGERPRINT_HASH);
    let collector = step_for(StepKind::Collect, collect_config, client.clone());

    let mut ctx = Context::new();
    ctx.set(keys::USERNAME, "tyler4");

    // First pass: nothing collected yet, prompts re-emitted, no backend
    // contact.
    let output = collector.process(&mut ctx, &CollectedInput::new()).await;
    assert!(!output.is_complete());
    assert_eq!(client.call_count(), 0);

    // Second pass with the inputs present.
    let input = CollectedInput::new()
        .with_field(keys::FINGERPRINT_RAW, "raw-fp")
        .with_field(keys::FINGERPRINT_HASH, "hash-fp");
    let output = collector.process(&mut ctx, &input).await;
    assert_eq!(output.outcome, Some(Outcome::Continue));

    // The login step now finds everything it needs in the context.
    let login = step_for(StepKind::Login, StepConfig::new(), client.clone());
    let output = login.process(&mut ctx, &CollectedInput::new()).await;
    assert_eq!(output.outcome, Some(Outcome::StepUp));
}

#[tokio::test]
async fn registry_returns_the_requested_kind() {
    let client = MockClient::scripted(vec![]);
    for kind in [
        StepKind::RegisterDevice,
        StepKind::Login,
        StepKind::ValidateEvent,
        StepKind::ValidateTransaction,
        StepKind::CheckActivation,
        StepKind::CheckSessionStatus,
        StepKind::Collect,
    ] {
        let step = step_for(kind, StepConfig::new(), client.clone());
        assert_eq!(step.kind(), kind);
    }
}
