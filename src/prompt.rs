//! Style-conditioned prompt construction.

use crate::SummaryStyle;

pub const EXECUTIVE_INSTRUCTION: &str = "Write a concise executive summary of the following document for a leadership audience. \
Focus on the key outcomes, decisions and business impact in a few short paragraphs.";

pub const RISKS_INSTRUCTION: &str = "Identify and summarize the key risks, concerns and open issues raised in the following document. \
Present them as a prioritized list with a short explanation for each.";

pub const ACTIONS_INSTRUCTION: &str = "Extract the action items, decisions and next steps from the following document. \
Present them as a bulleted list and include owners or deadlines when they are mentioned.";

pub const TECHNICAL_INSTRUCTION: &str = "Write a technical summary of the following document. \
Focus on implementation details, architecture and specifications.";

pub const GENERIC_INSTRUCTION: &str = "Provide a concise summary of the following document.";

/// Separates the instruction block from the document body.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Instruction text for a style. `None` selects the generic instruction.
pub fn style_instruction(style: Option<SummaryStyle>) -> &'static str {
    match style {
        Some(SummaryStyle::Executive) => EXECUTIVE_INSTRUCTION,
        Some(SummaryStyle::Risks) => RISKS_INSTRUCTION,
        Some(SummaryStyle::Actions) => ACTIONS_INSTRUCTION,
        Some(SummaryStyle::Technical) => TECHNICAL_INSTRUCTION,
        None => GENERIC_INSTRUCTION,
    }
}

/// Build the prompt sent to the chat provider.
///
/// The layout is: style instruction, an optional `Document title:` block
/// (omitted when the title is absent or whitespace-only), the separator,
/// then `text` verbatim.
pub fn build_prompt(text: &str, style: Option<SummaryStyle>, title: Option<&str>) -> String {
    let instruction = style_instruction(style);
    let title = title.filter(|t| !t.trim().is_empty());

    let mut prompt = String::with_capacity(instruction.len() + text.len() + 64);
    prompt.push_str(instruction);
    if let Some(title) = title {
        prompt.push_str("\n\nDocument title: ");
        prompt.push_str(title);
    }
    prompt.push_str(DOCUMENT_SEPARATOR);
    prompt.push_str(text);
    prompt
}
