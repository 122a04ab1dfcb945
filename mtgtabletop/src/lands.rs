use rand::Rng;
use rand::seq::SliceRandom;

pub const BASIC_LANDS: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// Exact, case-sensitive match against the five basic land names.
pub fn is_basic_land(name: &str) -> bool {
    BASIC_LANDS.contains(&name)
}

/// Picks one artwork per physical copy, uniformly and with replacement.
///
/// Returns `None` for an empty pool.
pub fn draw_variants<'a, R>(pool: &'a [String], copies: u32, rng: &mut R) -> Option<Vec<&'a str>>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    (0..copies)
        .map(|_| pool.choose(rng).map(String::as_str))
        .collect()
}
