use async_trait::async_trait;
use gemba_core::{ParsedAnswer, Prompt};
use gemba_metrics::{lookup, AnswerValidator, ResponseFormat};
use gemba_workflow::{
    AnswerRequester, CacheKey, Choice, CompletionRequest, FinishReason, InMemoryCache,
    LlmProvider, ProviderError, RequestConfig, RequestOptions, ResponseCache, WorkflowError,
};
use mockall::{mock, predicate};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Provider {}

    #[async_trait]
    impl LlmProvider for Provider {
        async fn complete(&self, request: &CompletionRequest) -> Result<Vec<Choice>, ProviderError>;
    }
}

fn prompt() -> Prompt {
    Prompt::Text("Score the following translation: ".to_string())
}

fn da_validator() -> AnswerValidator {
    lookup("GEMBA-DA").unwrap().final_stage().validator.clone()
}

fn config() -> RequestConfig {
    RequestConfig::new("test-model").with_transient_retries(2, Duration::ZERO)
}

fn requester(mock: MockProvider) -> AnswerRequester {
    AnswerRequester::new(Arc::new(mock), config())
}

fn budget(max_tokens: u32) -> RequestOptions {
    RequestOptions {
        max_tokens: Some(max_tokens),
        response_format: None,
    }
}

// ===== Happy path =====

#[tokio::test]
async fn test_first_answer_parses() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .withf(|req| req.temperature == 0 && req.model == "test-model")
        .times(1)
        .returning(|_| Ok(vec![Choice::stop(" 85 ")]));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(85)));
    assert_eq!(records[0].temperature, 0);
    assert_eq!(records[0].answer_id, Some(0));
    assert_eq!(records[0].finish_reason, Some(FinishReason::Stop));
    assert_eq!(records[0].model, "test-model");
}

#[tokio::test]
async fn test_response_format_is_forwarded() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .withf(|req| req.response_format == Some(ResponseFormat::Score))
        .times(1)
        .returning(|_| Ok(vec![Choice::stop(r#"{"score": 91}"#)]));

    let options = RequestOptions {
        max_tokens: Some(500),
        response_format: Some(ResponseFormat::Score),
    };
    let records = requester(mock)
        .request(&prompt(), &da_validator(), options)
        .await
        .unwrap();
    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(91)));
}

#[tokio::test]
async fn test_duplicate_answers_collapse() {
    let mut mock = MockProvider::new();
    mock.expect_complete().times(1).returning(|_| {
        Ok(vec![
            Choice::stop("85"),
            Choice::stop("85"),
            Choice::stop("90"),
        ])
    });

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    let answers: Vec<_> = records.iter().map(|r| r.answer.clone()).collect();
    assert_eq!(
        answers,
        vec![Some(ParsedAnswer::Score(85)), Some(ParsedAnswer::Score(90))]
    );
    assert_eq!(records[1].answer_id, Some(1));
}

// ===== Temperature escalation =====

#[tokio::test]
async fn test_unparseable_answer_raises_temperature() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .withf(|req| req.temperature == 0)
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("I cannot judge this.")]));
    mock.expect_complete()
        .withf(|req| req.temperature == 1 && req.max_tokens == Some(500))
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("Score: 70")]));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), budget(500))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].temperature, 1);
    assert_eq!(records[0].answer_id, Some(1));
    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(70)));
}

#[tokio::test]
async fn test_gives_up_after_last_temperature_step() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(11)
        .returning(|_| Ok(vec![Choice::stop("no score here")]));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, None);
    assert_eq!(records[0].temperature, 11);
    assert_eq!(records[0].answer_id, Some(10));
    assert_eq!(records[0].finish_reason, None);
}

#[tokio::test]
async fn test_out_of_range_answer_is_retried() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .withf(|req| req.temperature == 0)
        .returning(|_| Ok(vec![Choice::stop("150")]));
    mock.expect_complete()
        .withf(|req| req.temperature == 1)
        .returning(|_| Ok(vec![Choice::stop("95")]));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(95)));
}

// ===== Empty answer sets =====

#[tokio::test]
async fn test_content_filter_yields_absent_answer() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Err(ProviderError::ContentFilter("content_filter".to_string())));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, None);
    assert_eq!(records[0].answer_id, None);
    assert_eq!(records[0].temperature, 0);
}

#[tokio::test]
async fn test_invalid_model_output_yields_absent_answer() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Err(ProviderError::InvalidModelOutput("invalid_model_output".to_string())));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(records[0].answer, None);
}

#[tokio::test]
async fn test_missing_content_yields_absent_answer() {
    let mut mock = MockProvider::new();
    mock.expect_complete().times(1).returning(|_| {
        Ok(vec![
            Choice::stop("85"),
            Choice {
                content: None,
                finish_reason: FinishReason::Stop,
            },
        ])
    });

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(records[0].answer, None);
}

// ===== Truncation =====

#[tokio::test]
async fn test_truncated_answer_grows_budget() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .withf(|req| req.max_tokens == Some(500))
        .times(1)
        .returning(|_| Ok(vec![Choice::truncated("Critical:\nno-error\nMaj")]));
    mock.expect_complete()
        .withf(|req| req.max_tokens == Some(700))
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("Critical:\nno-error\nMajor:\nno-error\nMinor:\nstyle/awkward - x")]));

    let validator = AnswerValidator::Mqm { list_errors: false };
    let records = requester(mock)
        .request(&prompt(), &validator, budget(500))
        .await
        .unwrap();

    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(-1)));
    assert_eq!(records[0].temperature, 0);
}

#[tokio::test]
async fn test_truncated_answer_without_budget_is_absent() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Ok(vec![Choice::truncated("8")]));

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(records[0].answer, None);
}

// ===== Provider failures =====

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let mut mock = MockProvider::new();
    let mut calls = 0;
    mock.expect_complete().times(3).returning(move |_| {
        calls += 1;
        if calls < 3 {
            Err(ProviderError::Transient("rate limited".to_string()))
        } else {
            Ok(vec![Choice::stop("60")])
        }
    });

    let records = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(60)));
}

#[tokio::test]
async fn test_transient_retry_limit() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(3)
        .returning(|_| Err(ProviderError::Transient("timeout".to_string())));

    let err = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::RetriesExhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_fatal_error_propagates() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Err(ProviderError::Fatal("model not found".to_string())));

    let err = requester(mock)
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Provider(ProviderError::Fatal(ref m)) if m == "model not found"
    ));
}

// ===== Cache =====

#[tokio::test]
async fn test_cached_answers_are_reused() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("85")]));

    let cache = Arc::new(InMemoryCache::new());
    let requester = requester(mock).with_cache(cache.clone());

    let first = requester
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();
    let second = requester
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_empty_cached_answers_are_refetched() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("42")]));

    let cache = Arc::new(InMemoryCache::new());
    let key = CacheKey::new(&prompt(), "test-model", 0).unwrap();
    cache.put(key.clone(), Vec::new());

    let records = requester(mock)
        .with_cache(cache.clone())
        .request(&prompt(), &da_validator(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(records[0].answer, Some(ParsedAnswer::Score(42)));
    assert_eq!(cache.get(&key).map(|answers| answers.len()), Some(1));
}

#[tokio::test]
async fn test_cache_is_keyed_by_prompt() {
    let mut mock = MockProvider::new();
    mock.expect_complete()
        .with(predicate::function(|req: &CompletionRequest| {
            req.prompt == Prompt::Text("a".to_string())
        }))
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("10")]));
    mock.expect_complete()
        .with(predicate::function(|req: &CompletionRequest| {
            req.prompt == Prompt::Text("b".to_string())
        }))
        .times(1)
        .returning(|_| Ok(vec![Choice::stop("20")]));

    let requester = requester(mock);
    let validator = da_validator();
    for _ in 0..2 {
        let a = requester
            .request(&Prompt::Text("a".to_string()), &validator, RequestOptions::default())
            .await
            .unwrap();
        let b = requester
            .request(&Prompt::Text("b".to_string()), &validator, RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(a[0].answer, Some(ParsedAnswer::Score(10)));
        assert_eq!(b[0].answer, Some(ParsedAnswer::Score(20)));
    }
}

// ===== Request body =====

#[test]
fn test_chat_body() {
    let request = CompletionRequest {
        prompt: prompt(),
        model: "gpt-4".to_string(),
        temperature: 3,
        max_tokens: Some(500),
        response_format: Some(ResponseFormat::Score),
    };
    let body = request.to_chat_body();

    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["response_format"]["json_schema"]["name"], "score_response");
}
