//! Discount evaluation and the record acceptance predicate

/// Markup applied to an offer price to obtain its reference price
///
/// Listing pages do not expose a list price, so the reference price is
/// synthetic. Every non-zero offer therefore evaluates to the same discount
/// (33.33%), and the threshold only filters when it is at least that value.
pub const SYNTHETIC_MARKUP: f64 = 1.5;

/// Computes discounts and decides whether a record is accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountEvaluator {
    threshold: f64,
}

impl DiscountEvaluator {
    /// Creates an evaluator accepting discounts strictly above `threshold` percent
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Computes `100 * (canonical - offer) / canonical`, rounded to 2 decimals
    ///
    /// Thousands separators are ignored. Returns 0 if either price does not
    /// parse, the canonical price is zero, or the result is not finite.
    /// Malformed prices must never stop a crawl.
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_harvester::crawler::DiscountEvaluator;
    ///
    /// assert_eq!(DiscountEvaluator::evaluate("1,000", "750"), 25.0);
    /// assert_eq!(DiscountEvaluator::evaluate("0", "10"), 0.0);
    /// assert_eq!(DiscountEvaluator::evaluate("abc", "5"), 0.0);
    /// ```
    pub fn evaluate(canonical: &str, offer: &str) -> f64 {
        let (Some(canonical), Some(offer)) = (parse_price(canonical), parse_price(offer)) else {
            return 0.0;
        };

        if canonical == 0.0 {
            return 0.0;
        }

        let discount = 100.0 * (canonical - offer) / canonical;
        if !discount.is_finite() {
            return 0.0;
        }

        (discount * 100.0).round() / 100.0
    }

    /// Reference price used for an offer under the current pricing policy
    pub fn reference_price(offer: f64) -> f64 {
        offer * SYNTHETIC_MARKUP
    }

    /// Discount of an offer against its synthetic reference price
    pub fn offer_discount(offer_text: &str, offer: f64) -> f64 {
        Self::evaluate(&Self::reference_price(offer).to_string(), offer_text)
    }

    /// The acceptance predicate
    pub fn accepts(&self, discount: f64) -> bool {
        discount > self.threshold
    }
}

fn parse_price(text: &str) -> Option<f64> {
    text.replace(',', "").trim().parse::<f64>().ok()
}
