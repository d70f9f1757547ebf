//! Deterministic keyword-scoring fallback classifier.

use tracing::debug;

use super::CategoryLabel;

// Keyword phrase lists per category. Substring matched against lower-cased
// text; multi-word phrases score 2 x word count, single words score 1.

const FOOD_BEVERAGE: &[&str] = &[
    // Restaurants & fast food
    "kfc", "mcdonald", "burger king", "pizza hut", "domino", "subway", "starbucks", "coffee bean",
    "old town", "kopitiam", "mamak", "restaurant", "cafe", "bistro", "diner", "eatery", "kitchen",
    // Food types
    "food", "meal", "lunch", "dinner", "breakfast", "brunch", "drink", "beverages", "coffee",
    "tea", "juice", "water", "beer", "wine", "alcohol", "bar", "pub", "lounge",
    // Food shopping
    "grocery", "supermarket", "market", "hypermarket", "mart", "giant", "tesco", "aeon",
    "jaya grocer", "cold storage", "bakery", "pastry", "bread", "cake", "dessert",
    // Malaysian staples
    "nasi", "mee", "char kuey teow", "roti", "teh tarik", "kopi",
];

const UTILITIES: &[&str] = &[
    // Electricity & power
    "electric", "electricity", "power", "energy", "tnb", "tenaga", "electric bill", "power bill",
    "utility bill",
    // Water
    "water", "air", "syabas", "pba", "sab", "water bill",
    // Gas
    "gas", "lpg", "natural gas", "petronas gas",
    // Internet & telco
    "internet", "broadband", "wifi", "telekom", "tm", "unifi", "maxis", "celcom", "digi",
    "u mobile", "yes", "time", "phone", "mobile", "postpaid", "prepaid", "data plan",
    // General
    "utility", "utilities", "bill", "monthly bill",
];

const TRANSPORTATION: &[&str] = &[
    // Ride hailing
    "grab", "uber", "gojek", "taxi", "e-hailing",
    // Public transport
    "bus", "train", "mrt", "lrt", "kl monorail", "rapidkl", "ktm", "ets", "klia ekspres",
    "public transport",
    // Fuel
    "petrol", "gasoline", "diesel", "fuel", "gas station", "petronas", "shell", "esso", "bhp",
    "caltex",
    // Parking & tolls
    "parking", "toll", "highway", "plus", "smart tag", "touch n go", "parking fee", "toll fee",
    // Vehicle services
    "car wash", "service center", "workshop", "mechanic", "vehicle", "automotive", "motorcycle",
    "motor",
    // Air travel
    "flight", "airline", "airport", "airasia", "mas", "malindo", "firefly", "aviation",
    "boarding",
];

const OFFICE_SUPPLIES: &[&str] = &[
    // Stationery
    "office", "stationery", "stationary", "paper", "pen", "pencil", "marker", "highlighter",
    "stapler", "clip", "folder", "notebook", "notepad", "file", "binder", "envelope",
    // Technology
    "computer", "laptop", "desktop", "monitor", "keyboard", "mouse", "printer", "scanner",
    "toner", "ink", "cartridge", "software", "hardware", "it equipment", "electronics",
    // Furniture
    "desk", "chair", "table", "cabinet", "shelf", "furniture", "office furniture", "ergonomic",
    "workstation",
    // Supplies
    "supplies", "equipment", "materials", "tools",
    // Office stores
    "popular bookstore", "mph", "office depot", "staples",
];

/// Categories with their keyword lists, in tie-breaking priority order.
const TIERS: [(CategoryLabel, &[&str]); 4] = [
    (CategoryLabel::FoodBeverage, FOOD_BEVERAGE),
    (CategoryLabel::Utilities, UTILITIES),
    (CategoryLabel::Transportation, TRANSPORTATION),
    (CategoryLabel::OfficeSupplies, OFFICE_SUPPLIES),
];

/// Classify text by keyword scoring.
///
/// The strictly highest-scoring category wins; ties keep the earlier
/// category in declaration order. No matches at all means `Others`.
pub fn keyword_guess(text: &str) -> CategoryLabel {
    if text.is_empty() {
        return CategoryLabel::Others;
    }

    let lower = text.to_lowercase();
    let mut best = CategoryLabel::Others;
    let mut best_score = 0u32;

    for (label, phrases) in TIERS {
        let score = score_phrases(&lower, phrases);
        if score > best_score {
            best = label;
            best_score = score;
        }
    }

    if best_score > 0 {
        debug!(category = best.as_str(), score = best_score, "keyword classification");
    }
    best
}

fn score_phrases(lower: &str, phrases: &[&str]) -> u32 {
    phrases
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| {
            let words = phrase.split_whitespace().count() as u32;
            if words > 1 { 2 * words } else { 1 }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_starbucks_is_food_beverage() {
        assert_eq!(
            keyword_guess("STARBUCKS COFFEE\nGrande Latte 18.50"),
            CategoryLabel::FoodBeverage
        );
    }

    #[test]
    fn test_utilities_bill() {
        assert_eq!(
            keyword_guess("TNB electricity bill for March"),
            CategoryLabel::Utilities
        );
    }

    #[test]
    fn test_transportation() {
        assert_eq!(
            keyword_guess("Grab ride to airport, toll included"),
            CategoryLabel::Transportation
        );
    }

    #[test]
    fn test_office_supplies() {
        assert_eq!(
            keyword_guess("toner cartridge and A4 paper, stapler refill"),
            CategoryLabel::OfficeSupplies
        );
    }

    #[test]
    fn test_no_keywords_is_others() {
        assert_eq!(keyword_guess("xyzzy plugh 42"), CategoryLabel::Others);
        assert_eq!(keyword_guess(""), CategoryLabel::Others);
    }

    #[test]
    fn test_multi_word_phrases_outweigh_single_words() {
        // "data plan" scores 4, a lone "food" scores 1.
        assert_eq!(
            keyword_guess("food court data plan renewal"),
            CategoryLabel::Utilities
        );
    }

    #[test]
    fn test_tie_keeps_declaration_order() {
        // One single-word hit each for food ("cafe") and transport ("bus");
        // the earlier declared category wins the tie.
        assert_eq!(keyword_guess("cafe bus"), CategoryLabel::FoodBeverage);
    }
}
