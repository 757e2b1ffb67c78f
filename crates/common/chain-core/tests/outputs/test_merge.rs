//! Tests for folding streamed generation results.

use futures::StreamExt;
use serde_json::json;

use chain_core::error::{Error, Result};
use chain_core::messages::AIMessage;
use chain_core::outputs::{
    LanguageModelResult, TokenUsage, accumulate, collect_and_merge_stream, merge_chunks,
};

fn chunk(text: &str) -> LanguageModelResult {
    LanguageModelResult::builder()
        .output(AIMessage::builder().content(text).build())
        .streaming(true)
        .build()
}

#[test]
fn test_merge_chunks_empty_is_none() {
    assert!(merge_chunks(Vec::<LanguageModelResult>::new()).is_none());
}

#[test]
fn test_merge_chunks_metadata_and_usage() {
    let mut first = chunk("The ");
    first.id = Some("gen-1".into());
    first.metadata.insert("model".into(), json!("fake"));

    let mut last = chunk("end");
    last.finish_reason = Some("stop".into());
    last.usage = TokenUsage::new(4, 2);
    last.metadata.insert("model".into(), json!("fake-2"));

    let merged = merge_chunks(vec![first, chunk("the "), last]).unwrap();
    assert_eq!(merged.text(), "The the end");
    assert_eq!(merged.id.as_deref(), Some("gen-1"));
    assert_eq!(merged.finish_reason.as_deref(), Some("stop"));
    assert_eq!(merged.metadata["model"], json!("fake-2"));
    assert_eq!(merged.usage.total_tokens, Some(6));
}

#[tokio::test]
async fn test_collect_and_merge_matches_merge_chunks() {
    let chunks = vec![chunk("a"), chunk("b"), chunk("c")];
    let from_stream = collect_and_merge_stream(futures::stream::iter(
        chunks.clone().into_iter().map(Ok::<_, Error>),
    ))
    .await
    .unwrap();
    assert_eq!(from_stream, merge_chunks(chunks));
}

#[tokio::test]
async fn test_accumulate_running_totals() {
    let chunks: Vec<Result<LanguageModelResult>> = vec![Ok(chunk("Hel")), Ok(chunk("lo")), Ok(chunk("!"))];
    let totals: Vec<String> = accumulate(futures::stream::iter(chunks))
        .map(|total| total.unwrap().text())
        .collect()
        .await;
    assert_eq!(totals, vec!["Hel", "Hello", "Hello!"]);
}
