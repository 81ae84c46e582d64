//! 3D Navarro-Frenk-White (NFW) radial profile distribution.

use crate::distribution::{ContinuousDistribution, Distribution};
use crate::error::{StatsError, StatsResult};
use crate::helpers::map_unary;
use crate::special::lambertw0_scalar;
use numr::dtype::DType;
use numr::error::Result;
use numr::ops::{CompareOps, RandomOps, ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;
use rand::Rng;

/// Unnormalized enclosed mass of the NFW profile at y = q·c:
///
/// u(y) = ln(1+y) - y/(1+y)
///
/// No domain handling; out-of-domain y propagates NaN/Inf.
fn enclosed_mass(y: f64) -> f64 {
    y.ln_1p() - y / (1.0 + y)
}

/// 3D NFW radial profile distribution over x = R/Rvir ∈ (0, 1].
///
/// The Navarro-Frenk-White profile ρ(r) ∝ 1/[(r/rs)(1+r/rs)²] describes the
/// mass distribution of dark-matter halos. In the normalized radius
/// x = R/Rvir with concentration c = Rvir/Rs, the radial PDF is
///
/// f(x; c) = x·c² / [(xc+1)² · (ln(1+c) - c/(1+c))]  for 0 < x ≤ 1
///
/// and zero elsewhere. The quantile function inverts the CDF in closed form
/// through the principal branch of the Lambert W function, so sampling is a
/// single inverse-transform step per deviate rather than accept/reject.
///
/// # Examples
///
/// ```ignore
/// use nfwdist::{Nfw, ContinuousDistribution, Distribution};
///
/// let halo = Nfw::new(5.0).unwrap();
/// assert!((halo.cdf(1.0) - 1.0).abs() < 1e-12);
/// let r = halo.ppf(0.5).unwrap();
/// assert!((halo.cdf(r) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Nfw {
    /// Concentration parameter (c = Rvir/Rs)
    con: f64,
    /// Total enclosed mass at the virial radius: u(c) = ln(1+c) - c/(1+c)
    norm: f64,
}

impl Nfw {
    /// Create an NFW distribution with the given concentration.
    ///
    /// # Arguments
    ///
    /// * `con` - Concentration parameter c = Rvir/Rs (must be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if `con` is not finite and positive.
    pub fn new(con: f64) -> StatsResult<Self> {
        if !con.is_finite() || con <= 0.0 {
            return Err(StatsError::InvalidParameter {
                name: "con".to_string(),
                value: con,
                reason: "must be finite and positive".to_string(),
            });
        }
        Ok(Self {
            con,
            norm: enclosed_mass(con),
        })
    }

    /// The conventional reference profile with concentration 5.
    pub fn standard() -> Self {
        Self {
            con: 5.0,
            norm: enclosed_mass(5.0),
        }
    }

    /// Get the concentration parameter.
    pub fn con(&self) -> f64 {
        self.con
    }

    /// Quantile with clamping: p > 1 acts as 1, p ≤ 0 acts as 0, and the
    /// endpoints are exact fixed points. NaN propagates.
    ///
    /// Solves ln(1+qc) - qc/(1+qc) = p·u(c) for q in closed form:
    ///
    /// q = (-1/W₀(-e^(-p·u(c)-1)) - 1) / c
    ///
    /// For p in [0, 1] the W₀ argument always lies in [-1/e, 0), inside the
    /// principal branch's real domain.
    fn quantile(&self, p: f64) -> f64 {
        let p = if p > 1.0 {
            1.0
        } else if p <= 0.0 {
            0.0
        } else {
            p
        };
        if p == 0.0 {
            return 0.0;
        }
        if p == 1.0 {
            return 1.0;
        }
        let target = p * self.norm;
        let w = lambertw0_scalar(-(-target - 1.0).exp());
        (-1.0 / w - 1.0) / self.con
    }

    /// Quantile from a log-probability: `ppf(exp(logp))` without the caller
    /// exponentiating first.
    pub fn ppf_logp(&self, logp: f64) -> f64 {
        self.quantile(logp.exp())
    }

    /// k-th raw moment E[x^k] for k in 1..=4.
    ///
    /// The integrals ∫₀^c y^(k+1)/(1+y)² dy are elementary, so every raw
    /// moment reduces to polynomials in c plus ln(1+c) and 1/(1+c).
    fn raw_moment(&self, k: i32) -> f64 {
        let c = self.con;
        let l = c.ln_1p();
        let r = 1.0 / (1.0 + c);
        let num = match k {
            1 => c - 2.0 * l - r + 1.0,
            2 => 0.5 * c * c - 2.0 * c + 3.0 * l + r - 1.0,
            3 => c * c * c / 3.0 - c * c + 3.0 * c - 4.0 * l - r + 1.0,
            4 => 0.25 * c.powi(4) - 2.0 * c.powi(3) / 3.0 + 1.5 * c * c - 4.0 * c + 5.0 * l + r
                - 1.0,
            _ => return f64::NAN,
        };
        num / (c.powi(k) * self.norm)
    }

    /// Draw `n` radii by inverse-transform sampling.
    ///
    /// Uniform deviates in [0, 1) come from the caller-supplied generator,
    /// so sampling is reproducible and concurrent callers keep generator
    /// state to themselves.
    pub fn rvs<G: Rng + ?Sized>(&self, rng: &mut G, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.quantile(rng.random::<f64>())).collect()
    }

    /// Draw `n` radii as an F64 tensor, using the client's uniform source.
    pub fn rvs_tensor<R: Runtime<DType = DType>, C>(&self, n: usize, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + RandomOps<R> + RuntimeClient<R>,
    {
        let u = client.rand(&[n], DType::F64)?;
        self.ppf_tensor(&u, client)
    }
}

impl Default for Nfw {
    fn default() -> Self {
        Self::standard()
    }
}

impl Distribution for Nfw {
    fn mean(&self) -> f64 {
        self.raw_moment(1)
    }

    fn var(&self) -> f64 {
        let m1 = self.raw_moment(1);
        self.raw_moment(2) - m1 * m1
    }

    fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    fn mode(&self) -> f64 {
        // Density peaks at x = 1/c; for c < 1 the peak sits past the virial
        // radius so the supported maximum is at x = 1.
        (1.0 / self.con).min(1.0)
    }

    fn skewness(&self) -> f64 {
        let m1 = self.raw_moment(1);
        let m2 = self.raw_moment(2);
        let m3 = self.raw_moment(3);
        let var = m2 - m1 * m1;
        let mu3 = m3 - 3.0 * m1 * m2 + 2.0 * m1.powi(3);
        mu3 / var.powf(1.5)
    }

    fn kurtosis(&self) -> f64 {
        let m1 = self.raw_moment(1);
        let m2 = self.raw_moment(2);
        let m3 = self.raw_moment(3);
        let m4 = self.raw_moment(4);
        let var = m2 - m1 * m1;
        let mu4 = m4 - 4.0 * m1 * m3 + 6.0 * m1 * m1 * m2 - 3.0 * m1.powi(4);
        mu4 / (var * var) - 3.0 // Excess kurtosis
    }
}

impl ContinuousDistribution for Nfw {
    fn pdf(&self, x: f64) -> f64 {
        // Zero density outside (0, 1]
        if x <= 0.0 || x > 1.0 {
            return 0.0;
        }
        let c = self.con;
        x * c * c / ((x * c + 1.0).powi(2) * self.norm)
    }

    fn log_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 || x > 1.0 {
            return f64::NEG_INFINITY;
        }
        let c = self.con;
        x.ln() + 2.0 * c.ln() - 2.0 * (x * c).ln_1p() - self.norm.ln()
    }

    fn cdf(&self, q: f64) -> f64 {
        if q <= 0.0 {
            return 0.0;
        }
        if q > 1.0 {
            return 1.0;
        }
        enclosed_mass(q * self.con) / self.norm
    }

    fn sf(&self, q: f64) -> f64 {
        if q <= 0.0 {
            return 1.0;
        }
        if q > 1.0 {
            return 0.0;
        }
        1.0 - enclosed_mass(q * self.con) / self.norm
    }

    fn ppf(&self, p: f64) -> StatsResult<f64> {
        // Out-of-range probabilities clamp to the nearest bound rather than
        // erroring; see quantile().
        Ok(self.quantile(p))
    }

    // ========================================================================
    // Tensor methods - on-device except the Lambert W step of the quantile
    // ========================================================================

    fn pdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let c = self.con;
        // x c² / ((xc + 1)² u(c))
        let y = client.mul_scalar(x, c)?;
        let yp1 = client.add_scalar(&y, 1.0)?;
        let denom = client.mul_scalar(&client.square(&yp1)?, self.norm)?;
        let num = client.mul_scalar(x, c * c)?;
        let d = client.div(&num, &denom)?;

        // Zero density outside (0, 1]
        let zero = Tensor::<R>::full_scalar(x.shape(), x.dtype(), 0.0, client.device());
        let one = Tensor::<R>::full_scalar(x.shape(), x.dtype(), 1.0, client.device());
        let inside = client.mul(&client.gt(x, &zero)?, &client.le(x, &one)?)?;
        client.where_cond(&inside, &d, &zero)
    }

    fn log_pdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        // log of the clamped density; ln(0) = -inf outside the support
        let d = self.pdf_tensor(x, client)?;
        client.log(&d)
    }

    fn cdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        // u(xc) / u(c)
        let y = client.mul_scalar(x, self.con)?;
        let yp1 = client.add_scalar(&y, 1.0)?;
        let u = client.sub(&client.log1p(&y)?, &client.div(&y, &yp1)?)?;
        let p = client.mul_scalar(&u, 1.0 / self.norm)?;

        // Exactly 1 past the virial radius, exactly 0 at and below the
        // origin. The raw ratio is positive for negative x, so a min/max
        // clamp is not enough.
        let zero = Tensor::<R>::full_scalar(x.shape(), x.dtype(), 0.0, client.device());
        let one = Tensor::<R>::full_scalar(x.shape(), x.dtype(), 1.0, client.device());
        let p = client.where_cond(&client.gt(x, &one)?, &one, &p)?;
        client.where_cond(&client.le(x, &zero)?, &zero, &p)
    }

    fn sf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let cdf = self.cdf_tensor(x, client)?;
        client.rsub_scalar(&cdf, 1.0)
    }

    fn log_cdf_tensor<R: Runtime<DType = DType>, C>(&self, x: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
    {
        let cdf = self.cdf_tensor(x, client)?;
        client.log(&cdf)
    }

    fn ppf_tensor<R: Runtime<DType = DType>, C>(&self, p: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
    {
        // Clamp to [0, 1]
        let zero = Tensor::<R>::full_scalar(p.shape(), p.dtype(), 0.0, client.device());
        let one = Tensor::<R>::full_scalar(p.shape(), p.dtype(), 1.0, client.device());
        let p = client.minimum(&client.maximum(p, &zero)?, &one)?;

        // -exp(-p u(c) - 1), then W₀ on the host
        let target = client.mul_scalar(&p, self.norm)?;
        let arg = client.neg(&client.exp(&client.sub_scalar(&client.neg(&target)?, 1.0)?)?)?;
        let w = map_unary(&arg, client, lambertw0_scalar)?;

        // q = (-1/w - 1) / c
        let q = client.sub_scalar(&client.neg(&client.recip(&w)?)?, 1.0)?;
        client.mul_scalar(&q, 1.0 / self.con)
    }

    fn isf_tensor<R: Runtime<DType = DType>, C>(&self, p: &Tensor<R>, client: &C) -> Result<Tensor<R>>
    where
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
    {
        let flipped = client.rsub_scalar(p, 1.0)?;
        self.ppf_tensor(&flipped, client)
    }
}
