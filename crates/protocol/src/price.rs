//! Emerald price shorthand
//!
//! The trade market only accepts a plain emerald count. Players think in
//! currency tiers instead, so shorthand like `1stx 2le 3eb 4e`, `1.5le`,
//! `2k` or `64*3` is converted here.
//!
//! # Units
//!
//! | unit  | emeralds |
//! |-------|----------|
//! | `e`   | 1        |
//! | `eb`  | 64       |
//! | `le`  | 4096     |
//! | `stx` | 262144   |
//! | `k`   | 1000     |
//! | `m`   | 1000000  |

use regex::Regex;
use std::sync::OnceLock;

pub const EMERALDS_PER_BLOCK: u64 = 64;
pub const EMERALDS_PER_LIQUID: u64 = 64 * 64;
pub const EMERALDS_PER_STACK: u64 = 64 * 64 * 64;

static TERM_REGEX: OnceLock<Regex> = OnceLock::new();
static PRODUCT_REGEX: OnceLock<Regex> = OnceLock::new();

fn term_regex() -> &'static Regex {
    TERM_REGEX.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*(stx|le|eb|e|k|m)").expect("Invalid price term regex")
    })
}

fn product_regex() -> &'static Regex {
    PRODUCT_REGEX
        .get_or_init(|| Regex::new(r"^(\d+)\s*\*\s*(\d+)$").expect("Invalid price product regex"))
}

fn unit_value(unit: &str) -> u64 {
    match unit {
        "stx" => EMERALDS_PER_STACK,
        "le" => EMERALDS_PER_LIQUID,
        "eb" => EMERALDS_PER_BLOCK,
        "k" => 1_000,
        "m" => 1_000_000,
        _ => 1,
    }
}

/// Convert price shorthand into a plain emerald count
///
/// # Returns
/// `None` when the input is already a plain number or is not price shorthand
/// at all; in both cases the message should be sent unchanged.
pub fn convert_emerald_price(input: &str) -> Option<u64> {
    let input = input.trim().to_ascii_lowercase();
    if input.is_empty() || input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Some(caps) = product_regex().captures(&input) {
        let left: u64 = caps[1].parse().ok()?;
        let right: u64 = caps[2].parse().ok()?;
        return left.checked_mul(right);
    }

    let mut total = 0f64;
    let mut covered = 0usize;
    for caps in term_regex().captures_iter(&input) {
        let amount: f64 = caps[1].parse().ok()?;
        total += amount * unit_value(&caps[2]) as f64;
        covered += caps[0].chars().filter(|c| !c.is_whitespace()).count();
    }

    // Anything besides terms and whitespace means this was not a price
    let significant = input.chars().filter(|c| !c.is_whitespace()).count();
    if covered == 0 || covered != significant {
        tracing::trace!("Not price shorthand: {:?}", input);
        return None;
    }

    Some(total.round() as u64)
}
