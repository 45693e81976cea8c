//! Best-effort normalization of scraped fee text.
//!
//! Fee cells come in many shapes: `"€2.50m"`, `"Loan fee:€500k"`, `"free transfer"`,
//! `"loan transfer"`, `"-"`, `"?"`. Anything that cannot be read degrades to a zero
//! amount instead of failing the row.

use crate::model::Fee;

const LOAN_FEE_PREFIX: &str = "loan fee:";

/// Outcome of [`parse`]. `degraded` is set when numeric text was present but could not
/// be read, which is how a zero from garbage differs from a zero from a free transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeParse {
    pub fee: Fee,
    pub degraded: bool,
}

impl FeeParse {
    fn exact(amount: f64, is_loan: bool) -> Self {
        Self {
            fee: Fee::new(amount, is_loan),
            degraded: false,
        }
    }

    fn degraded(is_loan: bool) -> Self {
        Self {
            fee: Fee::new(0.0, is_loan),
            degraded: true,
        }
    }
}

/// Normalize fee text to an amount in euros and a loan flag. Never fails.
pub fn normalize(text: &str) -> Fee {
    parse(text).fee
}

pub fn parse(text: &str) -> FeeParse {
    let lower = text.trim().to_lowercase();

    if lower.is_empty() || lower == "-" || lower == "?" {
        return FeeParse::exact(0.0, false);
    }
    if lower.contains("free transfer") {
        return FeeParse::exact(0.0, false);
    }

    // The loan fee branch continues on the lower-cased text, every other branch on the
    // text as scraped.
    let (numeric, is_loan) = if lower.contains("loan fee") {
        (lower.replace(LOAN_FEE_PREFIX, ""), true)
    } else if lower.contains("loan transfer") {
        return FeeParse::exact(0.0, true);
    } else {
        (text.to_string(), false)
    };

    parse_amount(&numeric, is_loan)
}

fn parse_amount(text: &str, is_loan: bool) -> FeeParse {
    let mut digits = text.replace(['€', '$'], "").trim().to_string();

    // Unanchored containment, checked in this order. Historical output depends on it.
    let multiplier = if digits.contains("th.") || digits.contains('k') {
        digits = digits.replace("th.", "").replace('k', "");
        1_000.0
    } else if digits.contains('m') {
        digits = digits.replace('m', "");
        1_000_000.0
    } else if digits.contains("bn") || digits.contains('b') {
        digits = digits.replace("bn", "").replace('b', "");
        1_000_000_000.0
    } else {
        1.0
    };

    let digits = digits.replace(',', ".").replace(' ', "");
    if digits.is_empty() {
        return FeeParse::degraded(is_loan);
    }

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => {
            FeeParse::exact(value * multiplier, is_loan)
        }
        _ => FeeParse::degraded(is_loan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_free() {
        for text in ["", "   ", "-", "?", " - "] {
            let parsed = parse(text);
            assert_eq!(parsed.fee, Fee::FREE, "{text:?}");
            assert!(!parsed.degraded);
        }
    }

    #[test]
    fn free_transfer_in_any_case() {
        assert_eq!(normalize("free transfer"), Fee::FREE);
        assert_eq!(normalize("Free Transfer"), Fee::FREE);
    }

    #[test]
    fn loan_fee_keeps_amount() {
        assert_eq!(normalize("Loan fee:€2.5m"), Fee::new(2_500_000.0, true));
        assert_eq!(normalize("loan fee:€300k"), Fee::new(300_000.0, true));
        assert_eq!(normalize("Loan fee:€1,5m"), Fee::new(1_500_000.0, true));
    }

    #[test]
    fn loan_transfer_short_circuits() {
        let parsed = parse("loan transfer");
        assert_eq!(parsed.fee, Fee::new(0.0, true));
        assert!(!parsed.degraded);
        assert_eq!(normalize("End of loan transfer"), Fee::new(0.0, true));
    }

    #[test]
    fn magnitude_suffixes() {
        assert_eq!(normalize("€75.00k"), Fee::new(75_000.0, false));
        assert_eq!(normalize("€500th."), Fee::new(500_000.0, false));
        assert_eq!(normalize("€12.00m"), Fee::new(12_000_000.0, false));
        assert_eq!(normalize("$1bn"), Fee::new(1_000_000_000.0, false));
        assert_eq!(normalize("€2b"), Fee::new(2_000_000_000.0, false));
        assert_eq!(normalize("€ 1 250"), Fee::new(1_250.0, false));
    }

    #[test]
    fn suffix_matching_is_case_sensitive_outside_loan_fees() {
        // Upper-case markers are left in place, so the number does not parse.
        let parsed = parse("€2.5M");
        assert_eq!(parsed.fee, Fee::new(0.0, false));
        assert!(parsed.degraded);
    }

    #[test]
    fn garbage_degrades_and_keeps_loan_flag() {
        let parsed = parse("Loan fee:undisclosed");
        assert_eq!(parsed.fee, Fee::new(0.0, true));
        assert!(parsed.degraded);

        let parsed = parse("draft pick");
        assert_eq!(parsed.fee, Fee::FREE);
        assert!(parsed.degraded);
    }

    #[test]
    fn zero_from_free_differs_from_zero_from_garbage() {
        assert!(!parse("free transfer").degraded);
        assert!(parse("€").degraded);
    }

    #[test]
    fn amounts_are_never_negative() {
        for text in ["-5", "€-1.2m", "-inf", "NaN", "€-0.5k"] {
            let fee = normalize(text);
            assert!(fee.amount >= 0.0 && fee.amount.is_finite(), "{text:?}");
        }
    }
}
