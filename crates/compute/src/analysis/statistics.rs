use catalog::PerformanceSummary;

pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for &v in values {
            sum += v;
        }
        Some(sum / values.len() as f64)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }

    /// `None` for an empty slice.
    pub fn summarize(values: &[f64]) -> Option<PerformanceSummary> {
        let mean = Self::mean(values)?;
        let (min, max) = Self::min_max(values)?;
        Some(PerformanceSummary {
            count: values.len(),
            mean,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Statistics;

    #[test]
    fn mean_works() {
        let m = Statistics::mean(&[1.0, 2.0, 3.0]).unwrap();
        assert!((m - 2.0).abs() < 1e-9);
    }

    #[test]
    fn summarize_reports_extremes() {
        let s = Statistics::summarize(&[4.0, -1.0, 9.0]).unwrap();
        assert_eq!((s.count, s.min, s.max), (3, -1.0, 9.0));
        assert!((s.mean - 4.0).abs() < 1e-9);
        assert!(Statistics::summarize(&[]).is_none());
    }
}
