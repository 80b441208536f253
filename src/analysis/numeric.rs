/// `part / total * 100`, defined as 0 when `total` is 0.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total <= 0.0 || !part.is_finite() || !total.is_finite() {
        return 0.0;
    }
    part / total * 100.0
}

/// Round half-up to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Splits 100.0 across `values` in tenths of a percent so the rounded shares
/// add up to exactly 100.0. Leftover tenths go to the largest remainders,
/// lowest index first on ties.
pub fn apportion_percentages(values: &[u64]) -> Vec<f64> {
    let total: u128 = values.iter().map(|&v| v as u128).sum();
    if total == 0 {
        return vec![0.0; values.len()];
    }

    const TENTHS: u128 = 1000;
    let mut tenths: Vec<u128> = Vec::with_capacity(values.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(values.len());

    for (i, &v) in values.iter().enumerate() {
        let scaled = v as u128 * TENTHS;
        tenths.push(scaled / total);
        remainders.push((i, scaled % total));
    }

    let assigned: u128 = tenths.iter().sum();
    let leftover = (TENTHS - assigned) as usize;

    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for &(i, _) in remainders.iter().take(leftover) {
        tenths[i] += 1;
    }

    tenths.into_iter().map(|t| t as f64 / 10.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_one_decimal(33.25), 33.3);
        assert_eq!(round_one_decimal(33.24), 33.2);
        assert_eq!(round_one_decimal(f64::NAN), 0.0);
    }

    #[test]
    fn test_apportion_sums_to_hundred() {
        let shares = apportion_percentages(&[1; 17]);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum was {}", sum);
        assert!(shares.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_apportion_tie_goes_to_lowest_index() {
        assert_eq!(apportion_percentages(&[1, 1, 1]), vec![33.4, 33.3, 33.3]);
        assert_eq!(apportion_percentages(&[0, 0]), vec![0.0, 0.0]);
    }
}
