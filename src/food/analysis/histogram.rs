use super::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Equal-width bins spanning the observed range of the values.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Bins are half-open except the last, which also takes the maximum.
    /// A single distinct value is spread over `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[f64], bin_count: usize) -> Result<Self, AnalysisError> {
        if bin_count == 0 {
            return Err(AnalysisError::InvalidBinCount);
        }

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (mut lo, mut hi) = finite
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(AnalysisError::EmptyInput)?;

        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bin_count as f64;
        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bin_count { hi } else { lo + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for v in finite {
            // the estimate can land one bin off the reported edges
            let mut index = (((v - lo) / width) as usize).min(bin_count - 1);
            while index > 0 && v < bins[index].lower {
                index -= 1;
            }
            while index + 1 < bin_count && v >= bins[index].upper {
                index += 1;
            }
            bins[index].count += 1;
        }

        Ok(Self { bins })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin_width(&self) -> f64 {
        self.bins.first().map(|b| b.upper - b.lower).unwrap_or(0.0)
    }

    pub fn range(&self) -> (f64, f64) {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 0.0),
        }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
