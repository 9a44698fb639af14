use std::fmt::Display;
use std::str::FromStr;

use crate::stats::f64_from_usize;
use crate::EnrichError;

/// Method to adjust p-values for multiple testing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PAdjustMethod {
    /// Benjamini & Hochberg false discovery rate
    #[default]
    BenjaminiHochberg,
    /// Bonferroni family-wise error rate
    Bonferroni,
    /// No adjustment
    None,
}

impl PAdjustMethod {
    /// Returns the adjusted p-values, in the same order as `pvalues`
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::stats::PAdjustMethod;
    ///
    /// let adjusted = PAdjustMethod::Bonferroni.adjust(&[0.01, 0.5]);
    /// assert_eq!(adjusted, vec![0.02, 1.0]);
    /// ```
    pub fn adjust(&self, pvalues: &[f64]) -> Vec<f64> {
        match self {
            PAdjustMethod::None => pvalues.to_vec(),
            PAdjustMethod::Bonferroni => {
                let n = f64_from_usize(pvalues.len());
                pvalues.iter().map(|p| (p * n).min(1.0)).collect()
            }
            PAdjustMethod::BenjaminiHochberg => benjamini_hochberg(pvalues),
        }
    }
}

/// `p_adj(i) = min_{j >= i} (n / j * p(j))` over p-values sorted ascending
fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| pvalues[*a].total_cmp(&pvalues[*b]));

    let mut adjusted = vec![0.0; n];
    let mut running_min = 1.0f64;
    for (rank, idx) in order.iter().enumerate().rev() {
        let value = pvalues[*idx] * f64_from_usize(n) / f64_from_usize(rank + 1);
        running_min = running_min.min(value);
        adjusted[*idx] = running_min;
    }
    adjusted
}

impl Display for PAdjustMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PAdjustMethod::BenjaminiHochberg => write!(f, "BH"),
            PAdjustMethod::Bonferroni => write!(f, "bonferroni"),
            PAdjustMethod::None => write!(f, "none"),
        }
    }
}

impl FromStr for PAdjustMethod {
    type Err = EnrichError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bh" | "fdr" => Ok(PAdjustMethod::BenjaminiHochberg),
            "bonferroni" => Ok(PAdjustMethod::Bonferroni),
            "none" => Ok(PAdjustMethod::None),
            _ => Err(EnrichError::InvalidInput(format!(
                "unknown p-value adjustment: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{x} != {y}");
        }
    }

    #[test]
    fn bh_matches_reference() {
        // reference values from R: p.adjust(c(0.01, 0.04, 0.03, 0.2), "BH")
        let adjusted = PAdjustMethod::BenjaminiHochberg.adjust(&[0.01, 0.04, 0.03, 0.2]);
        assert_close(&adjusted, &[0.04, 0.04 * 4.0 / 3.0, 0.04 * 4.0 / 3.0, 0.2]);
    }

    #[test]
    fn bh_is_capped() {
        let adjusted = PAdjustMethod::BenjaminiHochberg.adjust(&[0.9, 0.8]);
        assert_close(&adjusted, &[0.9, 0.9]);
    }

    #[test]
    fn empty_input() {
        assert!(PAdjustMethod::BenjaminiHochberg.adjust(&[]).is_empty());
        assert!(PAdjustMethod::Bonferroni.adjust(&[]).is_empty());
    }

    #[test]
    fn no_adjustment() {
        assert_close(&PAdjustMethod::None.adjust(&[0.3, 0.1]), &[0.3, 0.1]);
    }

    #[test]
    fn parse_method() {
        assert_eq!("BH".parse::<PAdjustMethod>().unwrap(), PAdjustMethod::BenjaminiHochberg);
        assert_eq!("fdr".parse::<PAdjustMethod>().unwrap(), PAdjustMethod::BenjaminiHochberg);
        assert_eq!("Bonferroni".parse::<PAdjustMethod>().unwrap(), PAdjustMethod::Bonferroni);
        assert!("holm".parse::<PAdjustMethod>().is_err());
    }
}
