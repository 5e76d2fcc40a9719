//! Descriptive statistics over plain `f64` slices.

pub fn sum(data: &[f64]) -> f64 {
    data.iter().copied().sum::<f64>()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(sum(data) / data.len() as f64)
}

/// Population standard deviation (divides by `n`), `None` for an empty slice.
pub fn standard_deviation(data: &[f64]) -> Option<f64> {
    let mean = mean(data)?;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    Some(var.sqrt())
}
