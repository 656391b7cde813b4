//! One-shot prompt wrapping.
//!
//! The daemon hosts an interactive agent. Prompts submitted through the
//! stateless call path get a fixed instruction block appended so the agent
//! finishes in one response instead of asking follow-up questions.

const ONE_SHOT_INSTRUCTIONS: &str = "IMPORTANT: This is a non-interactive, one-shot execution. You must:
- Complete the entire task in a single response
- Do NOT ask clarifying questions—make reasonable assumptions and state them
- Do NOT wait for confirmation—proceed with the most sensible approach
- If multiple interpretations exist, pick the most likely one and note your choice
- Provide complete, working output rather than partial solutions";

/// Append the one-shot instruction block to `prompt`.
pub fn wrap_one_shot(prompt: &str) -> String {
    format!("{prompt}\n\n---\n{ONE_SHOT_INSTRUCTIONS}")
}
