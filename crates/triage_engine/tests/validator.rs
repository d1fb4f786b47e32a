mod common;

use std::sync::Arc;

use common::{init_logging, FakeForm, RecordingNotifier, ScriptedCaller, ScriptedPrompt};
use triage_core::{MALFORMED_HASH_PROMPT, MALFORMED_URL_PROMPT, TRUSTED_URL_PROMPT};
use triage_engine::{
    CallError, FailureKind, HttpMethod, InputValidator, Precheck, RemoteResponse, RequestBody,
    SubmitDecision, SAFETY_CHECK_PATH,
};

fn json(body: &str) -> Result<RemoteResponse, CallError> {
    Ok(RemoteResponse {
        status: 200,
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    })
}

fn validator(
    caller: &Arc<ScriptedCaller>,
    prompt: &Arc<ScriptedPrompt>,
    notifier: &Arc<RecordingNotifier>,
) -> InputValidator {
    InputValidator::new(caller.clone(), prompt.clone(), notifier.clone())
}

#[tokio::test]
async fn valid_hash_passes_silently() {
    init_logging();
    let caller = ScriptedCaller::new();
    let prompt = ScriptedPrompt::answering(&[]);
    let notifier = RecordingNotifier::new();
    let form = FakeForm::hash(&"ab".repeat(20));

    let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;

    assert_eq!(decision, SubmitDecision::Proceed);
    assert!(prompt.asked().is_empty());
    assert!(caller.requests().is_empty());
}

#[tokio::test]
async fn malformed_hash_prompts_and_decline_cancels() {
    init_logging();
    let caller = ScriptedCaller::new();
    let notifier = RecordingNotifier::new();

    for (hash, answer, expected) in [
        ("a".repeat(41), false, SubmitDecision::Cancel),
        (format!("{}q", "a".repeat(39)), false, SubmitDecision::Cancel),
        ("a".repeat(41), true, SubmitDecision::Proceed),
    ] {
        let prompt = ScriptedPrompt::answering(&[answer]);
        let form = FakeForm::hash(&hash);
        let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;
        assert_eq!(decision, expected, "{hash}");
        assert_eq!(prompt.asked(), vec![MALFORMED_HASH_PROMPT.to_string()]);
    }
    assert!(caller.requests().is_empty());
}

#[tokio::test]
async fn schemeless_url_defers_to_safety_check_with_raw_value() {
    init_logging();
    let caller = ScriptedCaller::new();
    caller.push(json(r#"{"is_safe": false}"#));
    let prompt = ScriptedPrompt::answering(&[]);
    let notifier = RecordingNotifier::new();
    let form = FakeForm::url("example.com/x");
    let validator = validator(&caller, &prompt, &notifier);

    assert_eq!(
        validator.precheck(&form),
        Precheck::Deferred("example.com/x".to_string())
    );
    let decision = validator.on_submit(&form).await;

    assert_eq!(decision, SubmitDecision::Resubmitted);
    assert_eq!(form.resubmits(), 1);
    assert!(prompt.asked().is_empty());
    let requests = caller.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, SAFETY_CHECK_PATH);
    assert_eq!(
        requests[0].body,
        RequestBody::Form(vec![("url".to_string(), "example.com/x".to_string())])
    );
}

#[tokio::test]
async fn trusted_url_needs_second_confirmation() {
    init_logging();
    let notifier = RecordingNotifier::new();

    for (answer, expected, resubmits) in [
        (true, SubmitDecision::Resubmitted, 1),
        (false, SubmitDecision::Held, 0),
    ] {
        let caller = ScriptedCaller::new();
        caller.push(json(r#"{"is_safe": true}"#));
        let prompt = ScriptedPrompt::answering(&[answer]);
        let form = FakeForm::url("https://intranet.corp.example/");

        let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;

        assert_eq!(decision, expected);
        assert_eq!(form.resubmits(), resubmits);
        assert_eq!(prompt.asked(), vec![TRUSTED_URL_PROMPT.to_string()]);
    }
}

#[tokio::test]
async fn malformed_url_prompts_without_request() {
    init_logging();
    let caller = ScriptedCaller::new();
    let notifier = RecordingNotifier::new();

    let prompt = ScriptedPrompt::answering(&[false]);
    let form = FakeForm::url("ftp://files.example.com/x");
    let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;
    assert_eq!(decision, SubmitDecision::Cancel);

    let prompt = ScriptedPrompt::answering(&[true]);
    let form = FakeForm::url("intranet");
    let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;
    assert_eq!(decision, SubmitDecision::Proceed);
    assert_eq!(prompt.asked(), vec![MALFORMED_URL_PROMPT.to_string()]);

    assert!(caller.requests().is_empty());
    assert_eq!(form.resubmits(), 0);
}

#[tokio::test]
async fn failed_safety_check_holds_submission_and_notifies() {
    init_logging();
    let caller = ScriptedCaller::new();
    caller.push(Err(CallError::new(FailureKind::Network, "down")));
    let prompt = ScriptedPrompt::answering(&[]);
    let notifier = RecordingNotifier::new();
    let form = FakeForm::url("http://example.com");

    let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;

    assert_eq!(decision, SubmitDecision::Held);
    assert_eq!(form.resubmits(), 0);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn untabbed_form_is_not_validated() {
    init_logging();
    let caller = ScriptedCaller::new();
    let prompt = ScriptedPrompt::answering(&[]);
    let notifier = RecordingNotifier::new();
    let form = FakeForm {
        url: "garbage".to_string(),
        hash: "garbage".to_string(),
        ..FakeForm::default()
    };

    let decision = validator(&caller, &prompt, &notifier).on_submit(&form).await;

    assert_eq!(decision, SubmitDecision::Proceed);
    assert!(prompt.asked().is_empty());
}
