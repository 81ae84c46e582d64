//! Distribution traits: summary statistics and continuous-distribution
//! evaluation, with scalar and tensor (batch) method families.

use crate::error::{StatsError, StatsResult};
use numr::dtype::DType;
use numr::error::{Error, Result};
use numr::ops::{CompareOps, ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

/// Summary statistics shared by all distributions.
pub trait Distribution {
    /// Expected value.
    fn mean(&self) -> f64;

    /// Variance.
    fn var(&self) -> f64;

    /// Standard deviation.
    fn std(&self) -> f64 {
        self.var().sqrt()
    }

    /// Median (50th percentile).
    fn median(&self) -> f64;

    /// Mode (location of the density maximum).
    fn mode(&self) -> f64;

    /// Skewness (third standardized moment).
    fn skewness(&self) -> f64;

    /// Excess kurtosis (fourth standardized moment minus 3).
    fn kurtosis(&self) -> f64;
}

/// Continuous distribution evaluation.
///
/// Scalar methods operate on `f64`; the `*_tensor` methods evaluate
/// element-wise over a numr tensor on any `Runtime`, and default to
/// `NotImplemented` so implementors can opt in per method.
pub trait ContinuousDistribution {
    /// Probability density function.
    fn pdf(&self, x: f64) -> f64;

    /// Natural log of the density.
    fn log_pdf(&self, x: f64) -> f64 {
        self.pdf(x).ln()
    }

    /// Cumulative distribution function.
    fn cdf(&self, x: f64) -> f64;

    /// Survival function: 1 - CDF(x).
    fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Natural log of the CDF.
    fn log_cdf(&self, x: f64) -> f64 {
        self.cdf(x).ln()
    }

    /// Quantile function (inverse CDF).
    fn ppf(&self, p: f64) -> StatsResult<f64>;

    /// Inverse survival function: ppf(1 - p).
    fn isf(&self, p: f64) -> StatsResult<f64> {
        self.ppf(1.0 - p)
    }

    /// Central interval carrying probability mass `alpha`.
    fn interval(&self, alpha: f64) -> StatsResult<(f64, f64)> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(StatsError::InvalidProbability { value: alpha });
        }
        let tail = 0.5 * (1.0 - alpha);
        Ok((self.ppf(tail)?, self.ppf(1.0 - tail)?))
    }

    // ========================================================================
    // Tensor methods - element-wise over numr tensors, any Runtime
    // ========================================================================

    /// Element-wise PDF over a tensor.
    fn pdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let _ = (x, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::pdf_tensor",
        })
    }

    /// Element-wise log-PDF over a tensor.
    fn log_pdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let _ = (x, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::log_pdf_tensor",
        })
    }

    /// Element-wise CDF over a tensor.
    fn cdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let _ = (x, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::cdf_tensor",
        })
    }

    /// Element-wise survival function over a tensor.
    fn sf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let _ = (x, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::sf_tensor",
        })
    }

    /// Element-wise log-CDF over a tensor.
    fn log_cdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let _ = (x, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::log_cdf_tensor",
        })
    }

    /// Element-wise quantile over a tensor.
    fn ppf_tensor<R: Runtime<DType = DType>, C>(&self, p: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
    {
        let _ = (p, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::ppf_tensor",
        })
    }

    /// Element-wise inverse survival function over a tensor.
    fn isf_tensor<R: Runtime<DType = DType>, C>(&self, p: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
    {
        let _ = (p, client);
        Err(Error::NotImplemented {
            feature: "ContinuousDistribution::isf_tensor",
        })
    }
}
