// core/src/baseline.rs
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::models::Session;

/// Nedre/øvre robuste persentil for normalisering.
pub const P_LOW: f64 = 0.10;
pub const P_HIGH: f64 = 0.90;

/// Filtrerer bort ikke-endelige verdier og sorterer stigende.
fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut xs: Vec<OrderedFloat<f64>> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .collect();
    xs.sort();
    xs.into_iter().map(|x| x.into_inner()).collect()
}

/// Lineær interpolasjon på indeks `(n-1)*p`. Tom liste → `None`.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let xs = sorted_finite(values);
    let n = xs.len();
    match n {
        0 => None,
        1 => Some(xs[0]),
        _ => {
            let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.5 };
            let idx = (n - 1) as f64 * p;
            let lo = idx.floor() as usize;
            let hi = idx.ceil() as usize;
            let frac = idx - lo as f64;
            Some(xs[lo] + (xs[hi] - xs[lo]) * frac)
        }
    }
}

/// Klassisk median (snitt av de to midterste ved partall).
pub fn median(values: &[f64]) -> Option<f64> {
    let xs = sorted_finite(values);
    let n = xs.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(xs[n / 2])
    } else {
        Some((xs[n / 2 - 1] + xs[n / 2]) / 2.0)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    let xs: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Statistikkbunt for én metrikk i én kohort. Lever kun ett scoringspass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub median: Option<f64>,
    pub p10: Option<f64>,
    pub p90: Option<f64>,
    pub n: usize,
}

impl Baseline {
    pub fn of(values: &[f64]) -> Self {
        Self {
            median: median(values),
            p10: percentile(values, P_LOW),
            p90: percentile(values, P_HIGH),
            n: values.iter().filter(|v| v.is_finite()).count(),
        }
    }

    /// Baseline for `metric` over et utvalg økter (manglende verdier hoppes over).
    pub fn of_metric<'a, I, F>(sessions: I, metric: F) -> Self
    where
        I: IntoIterator<Item = &'a Session>,
        F: Fn(&Session) -> Option<f64>,
    {
        let vals: Vec<f64> = sessions.into_iter().filter_map(|s| metric(s)).collect();
        Self::of(&vals)
    }

    /// Null-baselines betyr "metrikk utilgjengelig", aldri null.
    pub fn is_available(&self) -> bool {
        self.p10.is_some() && self.p90.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_reference_values() {
        let v = [40.0, 10.0, 30.0, 20.0];
        assert_eq!(percentile(&v, 0.5), Some(25.0));
        assert!((percentile(&v, 0.10).unwrap() - 13.0).abs() < 1e-12);
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[7.0], 0.9), Some(7.0));
    }

    #[test]
    fn median_filters_non_finite() {
        assert_eq!(median(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(median(&[f64::INFINITY]), None);
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn empty_baseline_is_unavailable() {
        let b = Baseline::of(&[]);
        assert!(!b.is_available());
        assert_eq!(b.median, None);
    }
}
