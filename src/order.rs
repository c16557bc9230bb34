//! Product and quantity extraction from ordering utterances

use serde::Serialize;

/// Structured order line pulled out of a free-form utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

struct Product {
    name: &'static str,
    keywords: &'static [&'static str],
    unit_price: f64,
}

/// Small fixed catalog. Keyword containment decides the category; anything
/// unrecognized falls back to a generic drink.
const CATALOG: &[Product] = &[
    Product {
        name: "beer",
        keywords: &["beer", "beers", "lager", "ale", "ipa", "pint"],
        unit_price: 6.99,
    },
    Product {
        name: "wine",
        keywords: &["wine", "wines", "merlot", "chardonnay", "riesling"],
        unit_price: 8.99,
    },
    Product {
        name: "cocktail",
        keywords: &["cocktail", "cocktails", "margarita", "mojito", "martini", "negroni"],
        unit_price: 9.99,
    },
];

const DEFAULT_PRODUCT: &str = "drink";
const DEFAULT_UNIT_PRICE: f64 = 5.49;

/// Number words transcribers commonly emit instead of digits
fn word_number(token: &str) -> Option<u32> {
    let n = match token {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

#[derive(Default)]
pub struct ProductOrderExtractor;

impl ProductOrderExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract product and quantity from an ordering utterance. Never
    /// fails: unrecognized products degrade to the default category and a
    /// missing quantity defaults to 1.
    pub fn extract(&self, text: &str) -> OrderDetails {
        let lower = text.to_lowercase();

        let quantity = lower
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .find_map(|t| t.parse::<u32>().ok().or_else(|| word_number(t)))
            .unwrap_or(1);

        let (product_name, unit_price) = CATALOG
            .iter()
            .find(|p| p.keywords.iter().any(|k| lower.contains(k)))
            .map(|p| (p.name, p.unit_price))
            .unwrap_or((DEFAULT_PRODUCT, DEFAULT_UNIT_PRICE));

        OrderDetails {
            product_name: product_name.to_string(),
            quantity,
            unit_price,
            total_price: quantity as f64 * unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> OrderDetails {
        ProductOrderExtractor::new().extract(text)
    }

    #[test]
    fn test_digit_quantity_and_beer_price() {
        let order = extract("add 3 beers");
        assert_eq!(order.quantity, 3);
        assert_eq!(order.product_name, "beer");
        assert!((order.unit_price - 6.99).abs() < 1e-9);
        assert!((order.total_price - 20.97).abs() < 1e-9);
    }

    #[test]
    fn test_word_quantity() {
        let order = extract("i want two glasses of wine");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.product_name, "wine");
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let order = extract("add a margarita");
        assert_eq!(order.quantity, 1);
        assert_eq!(order.product_name, "cocktail");
    }

    #[test]
    fn test_unknown_product_falls_back() {
        let order = extract("add 2 mystery things");
        assert_eq!(order.product_name, "drink");
        assert_eq!(order.quantity, 2);
        assert!((order.total_price - 2.0 * 5.49).abs() < 1e-9);
    }

    #[test]
    fn test_punctuated_quantity() {
        let order = extract("add 4, beers please");
        assert_eq!(order.quantity, 4);
    }
}
