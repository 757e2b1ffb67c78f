//! Tests for the fake chat models used as pipeline collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};

use chain_core::language_models::{FakeFunctionCallModel, FakeListChatModel};
use chain_core::messages::{BaseMessage, HumanMessage, SystemMessage};
use chain_core::outputs::{LanguageModelResult, accumulate, collect_and_merge_stream};
use chain_core::runnables::{ConfigOrList, Runnable, RunnableConfig, RunnableLambda, map_input};

fn prompt_chain() -> impl Runnable<Input = HashMap<String, Value>, Output = LanguageModelResult> {
    map_input(|vars: HashMap<String, Value>| {
        let topic = vars.get("topic").and_then(Value::as_str).unwrap_or("nothing").to_string();
        vec![
            BaseMessage::from(SystemMessage::new("You are a comedian.")),
            BaseMessage::from(HumanMessage::new(format!("Tell me a joke about {}", topic))),
        ]
    })
    .pipe(FakeListChatModel::new(vec![
        "Bears never get lost. They always follow the bear necessities.".to_string(),
    ]))
}

#[tokio::test]
async fn test_prompt_model_parser_pipeline() {
    let chain = prompt_chain().map_output(|result: LanguageModelResult| result.text());
    let vars = HashMap::from([("topic".to_string(), json!("bears"))]);

    let joke = chain.invoke(vars, None).await.unwrap();
    assert!(joke.starts_with("Bears never get lost."));
    assert_eq!(chain.step_count(), 3);
}

#[tokio::test]
async fn test_streamed_pipeline_folds_to_invoke() {
    let chain = prompt_chain();
    let vars = HashMap::from([("topic".to_string(), json!("bears"))]);

    let invoked = chain.invoke(vars.clone(), None).await.unwrap();
    let streamed = collect_and_merge_stream(chain.stream(vars.clone(), None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(streamed.text(), invoked.text());
    assert_eq!(streamed.usage, invoked.usage);
    assert_eq!(streamed.finish_reason.as_deref(), Some("stop"));

    let totals: Vec<String> = accumulate(chain.stream(vars, None))
        .map(|total| total.unwrap().text())
        .collect()
        .await;
    assert_eq!(totals.first().map(String::as_str), Some("Bears"));
    assert_eq!(totals.last(), Some(&invoked.text()));
}

#[tokio::test]
async fn test_stream_error_mid_generation() {
    let model = FakeListChatModel::new(vec!["one two three".to_string()]).with_error_on_chunk(2);
    let chunks: Vec<_> = model
        .stream(vec![HumanMessage::new("count").into()], None)
        .collect()
        .await;

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].as_ref().unwrap().text(), "one");
    assert_eq!(chunks[1].as_ref().unwrap().text(), " ");
    assert!(chunks[2].as_ref().unwrap_err().is_execution());
}

#[tokio::test]
async fn test_model_batch_with_concurrency_cap() {
    let model = FakeListChatModel::new(vec!["a".to_string(), "b".to_string()])
        .with_sleep(Duration::from_millis(5));
    let inputs: Vec<Vec<BaseMessage>> = (0..4)
        .map(|i| vec![HumanMessage::new(format!("q{}", i)).into()])
        .collect();

    let config = RunnableConfig::new().with_max_concurrency(1);
    let outputs = model
        .batch(inputs, Some(ConfigOrList::from(config)))
        .await
        .unwrap();
    let texts: Vec<String> = outputs.iter().map(LanguageModelResult::text).collect();
    assert_eq!(texts, vec!["a", "b", "a", "b"]);
}

#[tokio::test]
async fn test_function_call_model_in_pipeline() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let arguments = json!({"city": "Oslo"}).as_object().cloned().unwrap_or_default();

    let chain = FakeFunctionCallModel::new("get_weather", arguments).pipe(RunnableLambda::new(
        move |result: LanguageModelResult| {
            counter.fetch_add(1, Ordering::SeqCst);
            let call = result
                .message()
                .and_then(|m| m.function_call.clone())
                .ok_or_else(|| chain_core::Error::execution("no function call"))?;
            let args = call.parse_arguments()?;
            Ok(format!("{}({})", call.name, args["city"]))
        },
    ));

    let output = chain
        .invoke(vec![HumanMessage::new("weather?").into()], None)
        .await
        .unwrap();
    assert_eq!(output, r#"get_weather("Oslo")"#);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
