/// Round half away from zero to an integer.
pub fn round(value: f64) -> i64 {
    value.round() as i64
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `round(100 * part / whole)`, zero when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    round(100.0 * part / whole)
}

/// `round(sum / count)`, zero when `count` is not positive.
pub fn average(sum: f64, count: f64) -> i64 {
    if count <= 0.0 {
        return 0;
    }
    round(sum / count)
}

fn largest(values: &[i64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Remove any excess over 100 from the largest element (the first one on ties).
pub fn cap_at_hundred(values: &mut [i64]) {
    let mut excess = values.iter().sum::<i64>() - 100;
    while excess > 0 {
        let Some(idx) = largest(values) else {
            return;
        };
        let taken = excess.min(values[idx]);
        if taken == 0 {
            return;
        }
        values[idx] -= taken;
        excess -= taken;
    }
}

/// Donut shares: capped at 100, and any rounding deficit goes to the largest
/// element so a non-empty donut sums to exactly 100.
pub fn normalize_donut(values: &mut [i64]) {
    let sum: i64 = values.iter().sum();
    if sum == 0 {
        return;
    }
    cap_at_hundred(values);
    let deficit = 100 - values.iter().sum::<i64>();
    if deficit > 0 {
        if let Some(idx) = largest(values) {
            values[idx] += deficit;
        }
    }
}

/// Percent shares of `counts`, normalized as a donut.
pub fn donut_shares(counts: &[i64]) -> Vec<i64> {
    let total: i64 = counts.iter().sum();
    let mut shares: Vec<i64> = counts
        .iter()
        .map(|&c| percentage(c as f64, total as f64))
        .collect();
    normalize_donut(&mut shares);
    shares
}
