//! Prompt shaping and response cleanup. These come in pairs: a backend that
//! expects conversational turn markers also tends to echo them back, so the
//! cleaner for a style undoes the artifacts that style invites.

use crate::models::GenerationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Flat instruction block for text-to-text models.
    Instruction,
    /// Single `User:`/`Assistant:` exchange for chat-tuned models.
    Conversation,
}

pub fn build_prompt(style: PromptStyle, request: &GenerationRequest) -> String {
    match style {
        PromptStyle::Instruction => instruction_prompt(request),
        PromptStyle::Conversation => conversation_prompt(request),
    }
}

fn instruction_prompt(request: &GenerationRequest) -> String {
    format!(
        "Generate a compelling product description for the following product:\n\n\
         Product Name: {name}\n\
         Product Type: {ptype}\n\
         Target Audience: {audience}\n\
         Features: {features}\n\
         Tone: {tone}\n\n\
         Please create a professional, engaging product description that:\n\
         - Highlights the key benefits and features\n\
         - Uses persuasive language\n\
         - Is appropriate for e-commerce\n\
         - Is between 100-200 words\n\
         - Includes relevant keywords naturally\n\
         - Ends with a call-to-action\n\
         - Matches the specified tone: {tone}\n\n\
         Product Description:",
        name = request.product_name,
        ptype = request.product_type(),
        audience = request.target_audience(),
        features = request.features(),
        tone = request.tone(),
    )
}

fn conversation_prompt(request: &GenerationRequest) -> String {
    format!(
        "User: Write a compelling e-commerce product description for {name}. \
         Product type: {ptype}. Target audience: {audience}. Key features: {features}. \
         Tone: {tone}. Keep it between 100 and 200 words, lead with the benefits, \
         and end with a call to action.\nAssistant:",
        name = request.product_name,
        ptype = request.product_type(),
        audience = request.target_audience(),
        features = request.features(),
        tone = request.tone(),
    )
}

const ECHO_LABELS: &[&str] = &["product description:", "description:"];
const ROLE_MARKERS: &[&str] = &["assistant:", "user:", "system:", "bot:", "ai:"];

/// Cleanup for flat-instruction backends: drop a stray code fence and any
/// echoed `Product Description:` label.
pub fn clean_instruction_output(raw: &str) -> String {
    let unfenced = strip_code_fence(raw);
    strip_echo_labels(&unfenced).trim().to_string()
}

/// Cleanup for conversational backends: keep only the final assistant turn,
/// drop per-line role markers, then apply the generic label strip.
pub fn clean_conversation_output(raw: &str) -> String {
    let unfenced = strip_code_fence(raw);
    let tail = match unfenced.rfind("Assistant:") {
        Some(idx) => &unfenced[idx + "Assistant:".len()..],
        None => unfenced.as_str(),
    };
    let without_roles = strip_role_markers(tail);
    strip_echo_labels(&without_roles).trim().to_string()
}

fn strip_code_fence(input: &str) -> String {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // drop the info string, keep everything up to the closing fence
    let body = rest.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
    let body = body.rsplit_once("```").map(|(head, _)| head).unwrap_or(body);
    body.trim().to_string()
}

fn strip_echo_labels(input: &str) -> &str {
    let mut text = input;
    loop {
        text = text.trim_start();
        let Some(label) = ECHO_LABELS.iter().find(|label| {
            text.get(..label.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(label))
        }) else {
            return text;
        };
        text = &text[label.len()..];
    }
}

fn strip_role_markers(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            ROLE_MARKERS
                .iter()
                .find_map(|marker| {
                    trimmed
                        .get(..marker.len())
                        .filter(|head| head.eq_ignore_ascii_case(marker))
                        .map(|_| trimmed[marker.len()..].trim_start())
                })
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
