//! Tone lookups. Pure data: two tables keyed by the exact (trimmed) tone
//! string, each with a documented default for tones not in the table. The
//! placeholder tone ("Professional and engaging") has its own entry so absent
//! tones land on the professional phrasing rather than the generic default.

/// Adjective phrase used when the tone is not in [`TONE_ADJECTIVES`].
pub const DEFAULT_TONE_ADJECTIVES: &str = "dependable, engaging quality";

/// Call to action used when the tone is not in [`TONE_CALLS_TO_ACTION`].
pub const DEFAULT_CALL_TO_ACTION: &str = "Order yours today and see the difference for yourself.";

const TONE_ADJECTIVES: &[(&str, &str)] = &[
    ("Professional", "polished, dependable performance"),
    ("Professional and engaging", "polished, dependable performance"),
    ("Casual", "laid-back, everyday comfort"),
    ("Friendly", "warm, approachable charm"),
    ("Playful", "fun, lighthearted energy"),
    ("Luxury", "refined, indulgent craftsmanship"),
    ("Bold", "confident, head-turning character"),
];

const TONE_CALLS_TO_ACTION: &[(&str, &str)] = &[
    ("Professional", "Order today and put it to work."),
    ("Professional and engaging", "Order today and put it to work."),
    ("Casual", "Go on, treat yourself."),
    ("Friendly", "Come see why people keep recommending it."),
    ("Playful", "Grab yours and join the fun."),
    ("Luxury", "Treat yourself to it today."),
    ("Bold", "Make the statement. Get yours now."),
];

pub fn adjectives_for(tone: &str) -> &'static str {
    lookup(TONE_ADJECTIVES, tone).unwrap_or(DEFAULT_TONE_ADJECTIVES)
}

pub fn call_to_action_for(tone: &str) -> &'static str {
    lookup(TONE_CALLS_TO_ACTION, tone).unwrap_or(DEFAULT_CALL_TO_ACTION)
}

fn lookup(table: &'static [(&str, &str)], tone: &str) -> Option<&'static str> {
    let tone = tone.trim();
    table
        .iter()
        .find(|(key, _)| *key == tone)
        .map(|(_, phrase)| *phrase)
}
