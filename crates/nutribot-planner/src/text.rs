//! Small number-extraction helpers shared by the free-text parsers.

/// Every run of ASCII digits in `text`, in order.  Runs too long for `u32`
/// are skipped.
pub fn integers(text: &str) -> Vec<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// Every decimal number (`"1.5"`, `".5"`, `"2"`) in `text`, in order.
pub fn decimals(text: &str) -> Vec<f64> {
    text.split(|c: char| !c.is_ascii_digit() && c != '.')
        .map(|run| run.trim_matches('.'))
        .filter(|run| run.chars().any(|c| c.is_ascii_digit()))
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_runs() {
        assert_eq!(integers("between 300 and 500 kcal"), vec![300, 500]);
        assert_eq!(integers("300-500"), vec![300, 500]);
        assert!(integers("no digits").is_empty());
    }

    #[test]
    fn decimal_runs() {
        assert_eq!(decimals("1.5 x 2"), vec![1.5, 2.0]);
        assert_eq!(decimals("about 2. cups"), vec![2.0]);
        assert!(decimals("...").is_empty());
    }

    #[test]
    fn rounding() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(0.06), 0.1);
    }
}
