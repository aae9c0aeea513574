//! Text filter over the loaded unit gallery.

use crate::fetcher::catalog::UnitCard;
use crate::utils::text::digits_only;

/// Case-insensitive match against the fields a gallery card shows.
///
/// Prices match on their digits, so `1250000` finds a card priced
/// `1,250,000`. Empty text matches every card.
pub fn card_matches(card: &UnitCard, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(&card.title)
        || contains(&card.details)
        || digits_only(&card.price_label()).contains(&needle)
        || contains(&card.project_name)
        || card.location.as_deref().is_some_and(contains)
        || contains(&card.unit_type)
        || card.area_label().contains(&needle)
}
