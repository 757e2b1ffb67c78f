//! Chat messages and the concatenation algebra used to fold streamed chunks.

pub mod ai;
pub mod base;
pub mod concat;
pub mod content;
pub mod custom;
pub mod function;
pub mod function_call;
pub mod human;
pub mod system;

pub use ai::AIMessage;
pub use base::BaseMessage;
pub use concat::Concat;
pub use content::{ContentPart, ImageDetail, ImageReference, MessageContent};
pub use custom::CustomMessage;
pub use function::FunctionMessage;
pub use function_call::FunctionCall;
pub use human::HumanMessage;
pub use system::SystemMessage;

concat::impl_add_via_concat!(
    AIMessage,
    BaseMessage,
    CustomMessage,
    FunctionCall,
    FunctionMessage,
    HumanMessage,
    MessageContent,
    SystemMessage,
);
