//! Prompt assembly for the external text generator.
//!
//! The generator itself is not called here; callers send the
//! [`GenerationPrompt`] to whatever model they use.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
}

const LEGAL_STYLE: &str = "\
Characteristics of a legal email:
1. The email must contain a clear and concise subject line.
2. Use a professional salutation, such as 'Dear Sir/Madam,' or 'Hello Mr. X,'.
3. Favor a medium-length structure: avoid bullet points, organize content into paragraphs and line breaks.
4. Body: adopt a formal, direct tone; use sophisticated or technical language; optionally cite laws or articles; avoid emotional expressions.
5. Use formal valedictions such as 'Kind regards,' or 'Yours sincerely.'
6. Include a complete signature.
7. Use abbreviations and acronyms that signal professionalism, such as references to codes, articles or legal citations.
";

/// Fixed instructions for a legal-register email, usable in place of a
/// compiled profile.
pub fn legal_style_instructions() -> &'static str {
    LEGAL_STYLE
}

/// Prompt asking for an email that follows `instructions` and covers `facts`.
pub fn build_prompt(instructions: &str, facts: &str) -> GenerationPrompt {
    let system = format!(
        "You are a professional writing assistant.\n\
         You will receive style instructions and a list of facts.\n\
         Write an email in the style described by the instructions.\n\
         \n\
         Style instructions:\n\
         {}\n\
         \n\
         Constraints:\n\
         1. Follow the style instructions carefully.\n\
         2. Use the facts provided to shape the content of the email.\n\
         3. Write in English.",
        instructions.trim_end()
    );
    let user = format!(
        "Please write an email using the following facts:\n\n{}",
        facts.trim_end()
    );
    GenerationPrompt { system, user }
}
