//! Course-creator agent with tool calling.
//!
//! The agent chats with an administrator about a new course and can call a
//! lesson-generation tool. When it does, the generated lesson is threaded
//! back to the caller next to the text reply.

mod runner;
mod session;
mod tools;

pub use runner::{CourseCreatorAgent, CreatorAgentOutput, CreatorTurn, Role, ToolCallRecord};
pub use session::CreatorSession;
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, GENERATE_LESSON_TOOL};
