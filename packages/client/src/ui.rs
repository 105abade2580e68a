//! UI utilities for the client.

use std::io::Write;

/// Prompt shown by the input thread.
pub const PROMPT: &str = "cursors> ";

/// Print `text` and redisplay the prompt after it
pub fn print_above_prompt(text: &str) {
    print!("{}", text);
    redisplay_prompt();
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
