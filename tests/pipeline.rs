//! Pipeline-level tests with a stub completion client.

mod common;

use common::{analyzer_with, contract_text, sample_output, StubClient};
use contractguard::{
    Analyzer, AnalyzerConfig, ErrorKind, PipelineError, PromptVariant, UnavailableReason,
    UploadedArtifact,
};
use std::time::Duration;

fn txt(text: &str) -> UploadedArtifact {
    UploadedArtifact::new("contract.txt", "text/plain", text.as_bytes().to_vec())
}

#[tokio::test]
async fn well_formed_reply_yields_result_with_metadata() {
    let client = StubClient::replying(sample_output(PromptVariant::ACTIVE).to_string());
    let analyzer = analyzer_with(client.clone());
    let text = contract_text();

    let result = analyzer.analyze(Some(txt(&text))).await.unwrap();

    assert_eq!(client.calls(), 1);
    assert_eq!(result.file_size(), Some(text.len() as u64));
    assert_eq!(result.file_name(), Some("contract.txt"));
    assert!(result.analysis_timestamp().is_some());
    for name in PromptVariant::ACTIVE.schema().field_names() {
        assert!(result.get(name).is_some(), "missing {name}");
    }
}

#[tokio::test]
async fn user_message_carries_contract_text() {
    let client = StubClient::replying(sample_output(PromptVariant::ACTIVE).to_string());
    let analyzer = analyzer_with(client.clone());
    let text = contract_text();

    analyzer.analyze(Some(txt(&text))).await.unwrap();

    let user = client.last_user_message().unwrap();
    assert!(user.starts_with(PromptVariant::ACTIVE.user_preamble()));
    assert!(user.contains(text.trim_end()));
}

#[tokio::test]
async fn missing_credential_makes_no_call() {
    let client = StubClient::replying("{}");
    let analyzer = Analyzer::with_client(AnalyzerConfig::default(), client.clone());

    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert_eq!(err.status(), 500);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn oversized_upload_makes_no_call() {
    let client = StubClient::replying("{}");
    let analyzer = analyzer_with(client.clone());
    let big = UploadedArtifact::new(
        "big.txt",
        "text/plain",
        vec![b'a'; 10 * 1024 * 1024 + 1],
    );

    let err = analyzer.analyze(Some(big)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn validation_failures_make_no_call() {
    let client = StubClient::replying("{}");
    let analyzer = analyzer_with(client.clone());

    let cases = [
        (None, ErrorKind::MissingFile),
        (
            Some(UploadedArtifact::new("c.pdf", "application/pdf", contract_text().into_bytes())),
            ErrorKind::UnsupportedType,
        ),
        (Some(txt("Too short.")), ErrorKind::TextTooShort),
        (Some(txt(&"x".repeat(50_001))), ErrorKind::TextTooLong),
    ];

    for (artifact, expected) in cases {
        let err = analyzer.analyze(artifact).await.unwrap_err();
        assert_eq!(err.kind(), expected);
        assert_eq!(err.status(), 400);
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn non_json_reply_is_malformed() {
    let analyzer = analyzer_with(StubClient::replying("I could not analyse this contract."));
    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    assert_eq!(err.status(), 500);
}

#[tokio::test]
async fn partial_reply_is_incomplete() {
    let analyzer = analyzer_with(StubClient::replying(r#"{"overall_risk":"Low"}"#));
    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();
    match err {
        PipelineError::IncompleteOutput { missing } => {
            assert!(!missing.is_empty());
            assert!(!missing.iter().any(|m| m == "overall_risk"));
            assert!(missing.iter().any(|m| m == "contract_type"));
        }
        other => panic!("expected IncompleteOutput, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failures_pass_through_typed() {
    let analyzer = analyzer_with(StubClient::failing(|| PipelineError::UpstreamRateLimited {
        detail: "HTTP 429".into(),
    }));
    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();
    assert_eq!(err.status(), 429);

    let analyzer = analyzer_with(StubClient::failing(|| PipelineError::Upstream {
        detail: "HTTP 418: teapot".into(),
    }));
    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unclassified);
    assert!(!err.user_message().contains("teapot"));
}

#[tokio::test(start_paused = true)]
async fn slow_upstream_times_out_as_unavailable() {
    let client = StubClient::slow(Duration::from_secs(600));
    let analyzer = analyzer_with(client.clone());

    let err = analyzer.analyze(Some(txt(&contract_text()))).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::UpstreamUnavailable {
            reason: UnavailableReason::Timeout,
            ..
        }
    ));
    assert_eq!(err.status(), 503);
    assert_eq!(client.calls(), 1);
}
