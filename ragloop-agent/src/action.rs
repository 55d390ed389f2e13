//! Parsing of `Thought:` / `Action:` model output into typed actions.
//!
//! This is the only place that looks at raw model text; everything downstream
//! works with [`Action`].

use std::fmt;

const THOUGHT_PREFIX: &str = "Thought:";
const ACTION_PREFIX: &str = "Action:";

/// What the model asked to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Look something up; the argument is trimmed and may be empty.
    Search(String),
    /// Finish with this trimmed answer.
    Answer(String),
    /// The output did not follow the protocol; holds the whole raw output.
    Unparsed(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search(query) => write!(f, "Search[{query}]"),
            Action::Answer(_) | Action::Unparsed(_) => f.write_str("Answer"),
        }
    }
}

/// One model output split into its thought and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Text of the last `Thought:` line, trimmed; empty when there is none.
    pub thought: String,
    /// The classified action.
    pub action: Action,
}

/// Split raw model output into a thought and an action.
///
/// The last line starting with `Thought:` and the last line starting with
/// `Action:` win (both prefixes are case-sensitive and must start the line).
/// An action of the form `Search[...]` or `Answer[...]` is extracted; a missing
/// or unrecognised action yields [`Action::Unparsed`] with the full output.
pub fn parse_response(output: &str) -> ParsedResponse {
    let mut thought = None;
    let mut action = None;
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix(THOUGHT_PREFIX) {
            thought = Some(rest.trim());
        }
        if let Some(rest) = line.strip_prefix(ACTION_PREFIX) {
            action = Some(rest.trim());
        }
    }

    ParsedResponse {
        thought: thought.unwrap_or_default().to_string(),
        action: action.and_then(classify).unwrap_or_else(|| Action::Unparsed(output.to_string())),
    }
}

fn classify(action: &str) -> Option<Action> {
    if let Some(arg) = bracketed(action, "Search[") {
        return Some(Action::Search(arg.to_string()));
    }
    bracketed(action, "Answer[").map(|arg| Action::Answer(arg.to_string()))
}

fn bracketed<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    text.strip_prefix(open)?.strip_suffix(']').map(str::trim)
}
