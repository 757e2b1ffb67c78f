//! Language model collaborators.

pub mod fake;

pub use fake::{FakeFunctionCallModel, FakeListChatModel};
