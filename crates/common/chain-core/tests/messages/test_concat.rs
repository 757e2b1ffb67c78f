//! Tests for the message concatenation algebra.

use serde_json::json;

use chain_core::error::Error;
use chain_core::messages::{
    AIMessage, BaseMessage, Concat, CustomMessage, FunctionCall, FunctionMessage, HumanMessage,
    ImageReference, MessageContent, SystemMessage,
};
use chain_core::outputs::merge_chunks;

fn ai(content: &str) -> BaseMessage {
    AIMessage::builder().content(content).build().into()
}

#[test]
fn test_text_content_concat() {
    let merged = MessageContent::text("Hello").concat(&MessageContent::text(" world"));
    assert_eq!(merged, MessageContent::text("Hello world"));
}

#[test]
fn test_fold_is_left_associative_concat() {
    let chunks = vec![ai("Once "), ai("upon "), ai("a time")];
    let folded = merge_chunks(chunks.clone()).unwrap();
    let by_hand = chunks[0].concat(&chunks[1]).concat(&chunks[2]);
    assert_eq!(folded, by_hand);
    assert_eq!(folded.text(), "Once upon a time");
}

#[test]
fn test_function_call_fragments() {
    let first = FunctionCall::fragment("ca", r#"{"x":1"#);
    let second = FunctionCall::fragment("lc", "}");

    let merged = first + second;
    assert_eq!(merged.name, "calc");
    assert_eq!(merged.raw_arguments, r#"{"x":1}"#);
    assert_eq!(merged.parse_arguments().unwrap()["x"], json!(1));
}

#[test]
fn test_partial_arguments_do_not_parse() {
    let partial = FunctionCall::fragment("calc", r#"{"x":"#);
    assert!(matches!(partial.parse_arguments(), Err(Error::Json(_))));
}

#[test]
fn test_ai_chunks_with_function_call() {
    let chunks = vec![
        AIMessage::builder().id("msg-1").build(),
        AIMessage::builder()
            .function_call(FunctionCall::fragment("get_", r#"{"city":"#))
            .build(),
        AIMessage::builder()
            .id("msg-2")
            .function_call(FunctionCall::fragment("weather", r#""Oslo"}"#))
            .build(),
    ];

    let merged = merge_chunks(chunks).unwrap();
    assert_eq!(merged.id.as_deref(), Some("msg-1"));
    let call = merged.function_call.unwrap();
    assert_eq!(call.name, "get_weather");
    assert_eq!(call.parse_arguments().unwrap()["city"], json!("Oslo"));
}

#[test]
fn test_cross_variant_concat_keeps_left() {
    let pairs: Vec<(BaseMessage, BaseMessage)> = vec![
        (SystemMessage::new("s").into(), HumanMessage::new("h").into()),
        (HumanMessage::new("h").into(), ai("a")),
        (ai("a"), FunctionMessage::new("f", "r").into()),
        (FunctionMessage::new("f", "r").into(), CustomMessage::new("critic", "c").into()),
    ];

    for (left, right) in pairs {
        assert_eq!(left.concat(&right), left);
        assert!(matches!(
            left.try_concat(&right),
            Err(Error::Concatenation { .. })
        ));
    }
}

#[test]
fn test_custom_roles_must_match() {
    let critic: BaseMessage = CustomMessage::new("critic", "a").into();
    let editor: BaseMessage = CustomMessage::new("editor", "b").into();
    assert_eq!(critic.concat(&editor), critic);

    let more: BaseMessage = CustomMessage::new("critic", "b").into();
    assert_eq!(critic.concat(&more).text(), "ab");
}

#[test]
fn test_human_multi_part_concat() {
    let left = HumanMessage::with_content(
        MessageContent::multi_part(vec![
            MessageContent::text("Describe "),
            MessageContent::image("https://example.com/bear.png"),
        ])
        .unwrap(),
    );
    let right = HumanMessage::new(" briefly");

    let merged = BaseMessage::from(left).concat(&BaseMessage::from(right));
    assert_eq!(merged.text(), "Describe  briefly");
    match merged {
        BaseMessage::Human(message) => assert!(message.content.has_images()),
        other => panic!("expected a human message, got {:?}", other.message_type()),
    }

    let image = HumanMessage::with_content(ImageReference::new("cat.png"));
    let text = HumanMessage::new("caption");
    assert!(image.try_concat(&text).is_err());
}
