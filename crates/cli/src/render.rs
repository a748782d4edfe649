//! Terminal output.

use colored::Colorize;
use gk_protocol::graph_models::GraphSpec;
use gk_protocol::message_models::{Message, Role};
use gk_protocol::state_models::State;
use std::io::Write;

pub fn heading(text: &str) {
    println!("{}", text.bold());
}

pub fn graph_line(spec: &GraphSpec, shadowed: bool) {
    let name = if shadowed {
        format!("{} (overridden by configuration)", spec.name).dimmed()
    } else {
        spec.name.green()
    };
    if spec.description.is_empty() {
        println!("  {name}");
    } else {
        println!("  {name}  {}", spec.description);
    }
}

/// Show a suspension prompt and leave the cursor on the same line.
pub fn prompt(text: &str) {
    print!("{} {} ", "?".yellow().bold(), text.bold());
    let _ = std::io::stdout().flush();
}

fn role_label(role: Role) -> colored::ColoredString {
    match role {
        Role::System => "system".yellow(),
        Role::Human => "human".green(),
        Role::Ai => "ai".cyan(),
        Role::Tool => "tool".magenta(),
    }
}

fn message_line(message: &Message) -> String {
    let mut line = format!("[{}] {}", role_label(message.role), message.content);
    if let Some(call_id) = &message.tool_call_id {
        line.push_str(&format!(" {}", format!("(call {call_id})").dimmed()));
    }
    for call in &message.tool_calls {
        let args = serde_json::Value::Object(call.args.clone());
        line.push_str(&format!("\n    -> {}({}) {}", call.name, args, call.id.dimmed()));
    }
    line
}

/// Print the final conversation.
pub fn conversation(state: &State) {
    println!();
    heading("Conversation");
    for message in state.messages() {
        println!("{}", message_line(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gk_protocol::message_models::ToolCall;

    #[test]
    fn test_message_line_includes_tool_calls() {
        colored::control::set_override(false);

        let message = Message::ai_with_tool_calls(
            "",
            vec![ToolCall::new("sample_tool_1").with_id("123123123").with_arg("number", 4)],
        );
        let line = message_line(&message);

        assert!(line.starts_with("[ai] "));
        assert!(line.contains("-> sample_tool_1({\"number\":4}) 123123123"));
    }

    #[test]
    fn test_message_line_for_tool_result() {
        colored::control::set_override(false);

        let line = message_line(&Message::tool("42", "abc"));
        assert_eq!(line, "[tool] 42 (call abc)");
    }
}
