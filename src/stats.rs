// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// The median of `data`: the middle value once sorted, or the mean of the two
/// middle values for an even count. `None` for empty input. The input is
/// left untouched.
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|x, y| x.total_cmp(y));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_count_averages_middle_pair() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn odd_count_takes_middle() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[7.25]), Some(7.25));
    }

    #[test]
    fn empty_has_no_median() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn input_is_not_reordered() {
        let data = vec![9.0, 2.0, 4.0, 1.0];
        assert_eq!(median(&data), Some(3.0));
        assert_eq!(data, vec![9.0, 2.0, 4.0, 1.0]);
    }
}
