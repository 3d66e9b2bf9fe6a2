//! Parameter layouts of the random-coefficient distributions that generate `beta`.
//!
//! Drawing `beta` is left to the estimator. The table only needs each
//! distribution to configure itself from the attribute layout and report how
//! many free parameters it carries.

use serde::{Deserialize, Serialize};

use crate::error::{DcmError, Result};

/// A distribution over taste coefficients `beta`.
pub trait Distribution: Send + Sync {
    /// Configures the parameterization for attribute vectors made of
    /// components with the given widths.
    fn init(&mut self, attribute_dimensions: &[usize]) -> Result<()>;

    /// Number of free parameters once initialized.
    fn num_parameters(&self) -> usize;
}

/// Validates an attribute layout and returns the total attribute width.
fn total_dimension(attribute_dimensions: &[usize]) -> Result<usize> {
    if attribute_dimensions.is_empty() {
        return Err(DcmError::invalid_distribution(
            "at least one attribute component is required",
        ));
    }
    if let Some(component) = attribute_dimensions.iter().position(|&width| width == 0) {
        return Err(DcmError::invalid_distribution(format!(
            "attribute component {component} has zero width"
        )));
    }
    Ok(attribute_dimensions.iter().sum())
}

/// Degenerate distribution: `beta` is a fixed vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantDistribution {
    dimension: usize,
}

impl Distribution for ConstantDistribution {
    fn init(&mut self, attribute_dimensions: &[usize]) -> Result<()> {
        self.dimension = total_dimension(attribute_dimensions)?;
        Ok(())
    }

    fn num_parameters(&self) -> usize {
        self.dimension
    }
}

/// Independent normal coefficients: a mean and a scale per coordinate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagonalGaussianDistribution {
    dimension: usize,
}

impl Distribution for DiagonalGaussianDistribution {
    fn init(&mut self, attribute_dimensions: &[usize]) -> Result<()> {
        self.dimension = total_dimension(attribute_dimensions)?;
        Ok(())
    }

    fn num_parameters(&self) -> usize {
        2 * self.dimension
    }
}

/// Correlated normal coefficients: a mean plus the lower-triangular Cholesky
/// factor of the covariance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaussianDistribution {
    dimension: usize,
}

impl Distribution for GaussianDistribution {
    fn init(&mut self, attribute_dimensions: &[usize]) -> Result<()> {
        self.dimension = total_dimension(attribute_dimensions)?;
        Ok(())
    }

    fn num_parameters(&self) -> usize {
        self.dimension + self.dimension * (self.dimension + 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_counts_follow_layout() {
        let dims = [2, 1];

        let mut constant = ConstantDistribution::default();
        constant.init(&dims).unwrap();
        assert_eq!(constant.num_parameters(), 3);

        let mut diagonal = DiagonalGaussianDistribution::default();
        diagonal.init(&dims).unwrap();
        assert_eq!(diagonal.num_parameters(), 6);

        let mut full = GaussianDistribution::default();
        full.init(&dims).unwrap();
        assert_eq!(full.num_parameters(), 3 + 6);
    }

    #[test]
    fn empty_or_zero_width_layouts_are_rejected() {
        let mut constant = ConstantDistribution::default();
        assert!(matches!(
            constant.init(&[]),
            Err(DcmError::InvalidDistribution { .. })
        ));
        assert!(matches!(
            constant.init(&[3, 0]),
            Err(DcmError::InvalidDistribution { .. })
        ));
    }
}
