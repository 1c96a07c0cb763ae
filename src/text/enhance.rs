//! Enhancement composer: appends one randomly chosen marketing suffix to an
//! accepted, normalized base text. Deliberately non-deterministic unless the
//! caller pins the RNG.

use crate::models::GenerationRequest;
use crate::text::normalize::normalize;
use crate::text::tone;
use rand::Rng;

const SUFFIX_TEMPLATE_COUNT: u32 = 4;

/// Extend `base` with an audience/feature/tone-aware closing passage. The base
/// is guaranteed a terminal period before concatenation and the joined result
/// goes through the normalizer again, so awkward joins cannot survive.
pub fn enhance<R: Rng + ?Sized>(base: &str, request: &GenerationRequest, rng: &mut R) -> String {
    let mut seeded = base.trim().to_string();
    if !seeded.ends_with(['.', '!', '?']) {
        seeded.push('.');
    }

    let adjectives = tone::adjectives_for(request.tone());
    let cta = tone::call_to_action_for(request.tone());
    let audience = request.target_audience();
    let features = request.features();
    let ptype = request.product_type();

    let suffix = match rng.random_range(0..SUFFIX_TEMPLATE_COUNT) {
        0 => format!(
            "Designed with {audience} in mind, it brings {adjectives} to every use. {cta}"
        ),
        1 => format!(
            "From {features} to its overall feel, this {ptype} delivers {adjectives}. {cta}"
        ),
        2 => format!(
            "{audience} will appreciate {features}, wrapped in {adjectives}. {cta}"
        ),
        _ => format!(
            "It pairs {features} with {adjectives}, an easy pick for {audience}. {cta}"
        ),
    };

    normalize(&format!("{seeded} {suffix}"))
}
