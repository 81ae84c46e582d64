//! Profile evaluation over a sequence of concentrations.
//!
//! Each function takes a 1-D input tensor of length k and a 1-D
//! concentration tensor of length m and returns a [k, m] tensor where
//! entry (i, j) evaluates input i against concentration j. A length-1
//! concentration tensor degenerates to a [k, 1] column; no shape branching
//! is needed at call sites.
//!
//! Concentration entries are not validated; non-positive values propagate
//! NaN through the arithmetic.

use crate::helpers::map_unary;
use crate::special::lambertw0_scalar;
use numr::dtype::DType;
use numr::error::{Error, Result};
use numr::ops::{CompareOps, RandomOps, ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

fn check_1d<R: Runtime>(t: &Tensor<R>, arg: &'static str) -> Result<()> {
    if t.ndim() != 1 {
        return Err(Error::InvalidArgument {
            arg,
            reason: format!("expected a 1-D tensor, got {} dims", t.ndim()),
        });
    }
    Ok(())
}

/// Total enclosed mass u(c) = ln(1+c) - c/(1+c), element-wise over a
/// concentration tensor.
fn mass_norm<R: Runtime<DType = DType>, C>(client: &C, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    let cp1 = client.add_scalar(con, 1.0)?;
    client.sub(&client.log1p(con)?, &client.div(con, &cp1)?)
}

/// Density grid: entry (i, j) is the NFW density of `x[i]` at
/// concentration `con[j]`, zeroed outside (0, 1].
pub fn pdf_grid<R: Runtime<DType = DType>, C>(client: &C, x: &Tensor<R>, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
{
    check_1d(x, "x")?;
    check_1d(con, "con")?;

    // x c² / ((xc + 1)² u(c)), with [k,1] broadcasting against [m]
    let x2 = x.unsqueeze(1)?;
    let y = client.mul(&x2, con)?;
    let yp1 = client.add_scalar(&y, 1.0)?;
    let num = client.mul(&x2, &client.square(con)?)?;
    let denom = client.mul(&client.square(&yp1)?, &mass_norm(client, con)?)?;
    let d = client.div(&num, &denom)?;

    // Zero density outside (0, 1], judged on the radius axis
    let shape = d.shape();
    let zero = Tensor::<R>::full_scalar(shape, d.dtype(), 0.0, client.device());
    let one = Tensor::<R>::full_scalar(shape, d.dtype(), 1.0, client.device());
    let xb = x2.broadcast_to(shape)?;
    let inside = client.mul(&client.gt(&xb, &zero)?, &client.le(&xb, &one)?)?;
    client.where_cond(&inside, &d, &zero)
}

/// Log-density grid: `ln` of [`pdf_grid`], with -inf outside the support.
pub fn log_pdf_grid<R: Runtime<DType = DType>, C>(client: &C, x: &Tensor<R>, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
{
    let d = pdf_grid(client, x, con)?;
    client.log(&d)
}

/// CDF grid: entry (i, j) is u(q[i]·con[j]) / u(con[j]), clamped to exactly
/// 0 for q ≤ 0 and exactly 1 for q > 1.
pub fn cdf_grid<R: Runtime<DType = DType>, C>(client: &C, q: &Tensor<R>, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
{
    check_1d(q, "q")?;
    check_1d(con, "con")?;

    let q2 = q.unsqueeze(1)?;
    let y = client.mul(&q2, con)?;
    let yp1 = client.add_scalar(&y, 1.0)?;
    let u = client.sub(&client.log1p(&y)?, &client.div(&y, &yp1)?)?;
    let p = client.div(&u, &mass_norm(client, con)?)?;

    let shape = p.shape();
    let zero = Tensor::<R>::full_scalar(shape, p.dtype(), 0.0, client.device());
    let one = Tensor::<R>::full_scalar(shape, p.dtype(), 1.0, client.device());
    let qb = q2.broadcast_to(shape)?;
    let p = client.where_cond(&client.gt(&qb, &one)?, &one, &p)?;
    client.where_cond(&client.le(&qb, &zero)?, &zero, &p)
}

/// Log-probability grid: `ln` of [`cdf_grid`].
pub fn log_cdf_grid<R: Runtime<DType = DType>, C>(client: &C, q: &Tensor<R>, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
{
    let p = cdf_grid(client, q, con)?;
    client.log(&p)
}

/// Quantile grid: entry (i, j) solves the CDF at concentration `con[j]` for
/// probability `p[i]`, clamped to [0, 1] first.
pub fn ppf_grid<R: Runtime<DType = DType>, C>(client: &C, p: &Tensor<R>, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    check_1d(p, "p")?;
    check_1d(con, "con")?;

    // Clamp probabilities before spreading over the concentration axis
    let zero = Tensor::<R>::full_scalar(p.shape(), p.dtype(), 0.0, client.device());
    let one = Tensor::<R>::full_scalar(p.shape(), p.dtype(), 1.0, client.device());
    let pc = client.minimum(&client.maximum(p, &zero)?, &one)?;

    // P = p·u(c), then q = (-1/W₀(-e^(-P-1)) - 1)/c
    let p2 = pc.unsqueeze(1)?;
    let target = client.mul(&p2, &mass_norm(client, con)?)?;
    let arg = client.neg(&client.exp(&client.sub_scalar(&client.neg(&target)?, 1.0)?)?)?;
    let w = map_unary(&arg, client, lambertw0_scalar)?;
    let q = client.sub_scalar(&client.neg(&client.recip(&w)?)?, 1.0)?;
    client.div(&q, con)
}

/// Quantile grid from log-probabilities: exponentiates, then [`ppf_grid`].
pub fn ppf_logp_grid<R: Runtime<DType = DType>, C>(
    client: &C,
    logp: &Tensor<R>,
    con: &Tensor<R>,
) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    check_1d(logp, "logp")?;
    let p = client.exp(logp)?;
    ppf_grid(client, &p, con)
}

/// Draw `n` radii per concentration by inverse-transform sampling of the
/// client's uniform source; returns an [n, m] tensor whose column j holds
/// samples at concentration `con[j]`.
pub fn rvs_grid<R: Runtime<DType = DType>, C>(client: &C, n: usize, con: &Tensor<R>) -> Result<Tensor<R>>
where
    C: TensorOps<R> + ScalarOps<R> + RandomOps<R> + RuntimeClient<R>,
{
    check_1d(con, "con")?;
    let u = client.rand(&[n], con.dtype())?;
    ppf_grid(client, &u, con)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ContinuousDistribution;
    use crate::nfw::Nfw;
    use numr::runtime::cpu::{CpuDevice, CpuRuntime};

    fn close(a: f64, b: f64, tol: f64) -> bool {
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        (a - b).abs() < tol
    }

    #[test]
    fn test_pdf_grid_matches_scalar() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let xs = [-0.5, 0.0, 0.1, 0.5, 1.0, 1.5];
        let cons = [0.5, 5.0, 20.0];
        let x = Tensor::<CpuRuntime>::from_slice(&xs, &[xs.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let d = pdf_grid(&client, &x, &con).unwrap();
        assert_eq!(d.shape(), &[6, 3]);

        let data: Vec<f64> = d.to_vec();
        for (i, &xi) in xs.iter().enumerate() {
            for (j, &cj) in cons.iter().enumerate() {
                let expected = Nfw::new(cj).unwrap().pdf(xi);
                assert!(
                    close(data[i * 3 + j], expected, 1e-12),
                    "pdf_grid[{},{}] = {} vs {}",
                    i,
                    j,
                    data[i * 3 + j],
                    expected
                );
            }
        }
    }

    #[test]
    fn test_cdf_grid_matches_scalar() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let qs = [-0.2, 0.0, 0.25, 0.5, 1.0, 1.5];
        let cons = [0.5, 5.0, 20.0];
        let q = Tensor::<CpuRuntime>::from_slice(&qs, &[qs.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let p = cdf_grid(&client, &q, &con).unwrap();
        assert_eq!(p.shape(), &[6, 3]);

        let data: Vec<f64> = p.to_vec();
        for (i, &qi) in qs.iter().enumerate() {
            for (j, &cj) in cons.iter().enumerate() {
                let expected = Nfw::new(cj).unwrap().cdf(qi);
                assert!(
                    close(data[i * 3 + j], expected, 1e-12),
                    "cdf_grid[{},{}] = {} vs {}",
                    i,
                    j,
                    data[i * 3 + j],
                    expected
                );
            }
        }
        // Clamped rows are exact across every concentration
        for j in 0..3 {
            assert_eq!(data[j], 0.0); // q = -0.2
            assert_eq!(data[3 + j], 0.0); // q = 0.0
            assert_eq!(data[5 * 3 + j], 1.0); // q = 1.5
        }
    }

    #[test]
    fn test_ppf_grid_roundtrip() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let ps = [0.05, 0.25, 0.5, 0.75, 0.95];
        let cons = [0.5, 5.0, 20.0];
        let p = Tensor::<CpuRuntime>::from_slice(&ps, &[ps.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let q = ppf_grid(&client, &p, &con).unwrap();
        assert_eq!(q.shape(), &[5, 3]);

        let data: Vec<f64> = q.to_vec();
        for (i, &pi) in ps.iter().enumerate() {
            for (j, &cj) in cons.iter().enumerate() {
                let n = Nfw::new(cj).unwrap();
                assert!(
                    (n.cdf(data[i * 3 + j]) - pi).abs() < 1e-9,
                    "roundtrip failed at p={}, con={}",
                    pi,
                    cj
                );
            }
        }
    }

    #[test]
    fn test_ppf_grid_clamping() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let ps = [-0.1, 1.5];
        let cons = [5.0, 10.0];
        let p = Tensor::<CpuRuntime>::from_slice(&ps, &[ps.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let data: Vec<f64> = ppf_grid(&client, &p, &con).unwrap().to_vec();
        // p ≤ 0 maps to the origin, p > 1 to the virial radius
        for j in 0..2 {
            assert!(data[j].abs() < 1e-6);
            assert!((data[2 + j] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_log_grids_match_linear() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let xs = [0.0, 0.3, 0.8, 1.0];
        let cons = [5.0, 10.0];
        let x = Tensor::<CpuRuntime>::from_slice(&xs, &[xs.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let d: Vec<f64> = pdf_grid(&client, &x, &con).unwrap().to_vec();
        let ld: Vec<f64> = log_pdf_grid(&client, &x, &con).unwrap().to_vec();
        let p: Vec<f64> = cdf_grid(&client, &x, &con).unwrap().to_vec();
        let lp: Vec<f64> = log_cdf_grid(&client, &x, &con).unwrap().to_vec();

        for i in 0..d.len() {
            assert!(close(ld[i], d[i].ln(), 1e-12));
            assert!(close(lp[i], p[i].ln(), 1e-12));
        }
        // x = 0 row is -inf in log space
        assert_eq!(ld[0], f64::NEG_INFINITY);
        assert_eq!(lp[0], f64::NEG_INFINITY);
    }

    #[test]
    fn test_ppf_logp_grid() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let ps = [0.1, 0.5, 0.9];
        let logps: Vec<f64> = ps.iter().map(|p: &f64| p.ln()).collect();
        let cons = [5.0];
        let p = Tensor::<CpuRuntime>::from_slice(&ps, &[ps.len()], &device);
        let lp = Tensor::<CpuRuntime>::from_slice(&logps, &[logps.len()], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let direct: Vec<f64> = ppf_grid(&client, &p, &con).unwrap().to_vec();
        let via_log: Vec<f64> = ppf_logp_grid(&client, &lp, &con).unwrap().to_vec();

        for i in 0..direct.len() {
            assert!((direct[i] - via_log[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rvs_grid() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let cons = [0.5, 5.0, 20.0];
        let con = Tensor::<CpuRuntime>::from_slice(&cons, &[cons.len()], &device);

        let draws = rvs_grid(&client, 200, &con).unwrap();
        assert_eq!(draws.shape(), &[200, 3]);

        let data: Vec<f64> = draws.to_vec();
        for &x in &data {
            assert!((0.0..=1.0).contains(&x), "draw {} outside [0, 1]", x);
        }
    }

    #[test]
    fn test_grid_rejects_non_1d() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let x = Tensor::<CpuRuntime>::from_slice(&[0.1, 0.2, 0.3, 0.4], &[2, 2], &device);
        let con = Tensor::<CpuRuntime>::from_slice(&[5.0], &[1], &device);

        assert!(pdf_grid(&client, &x, &con).is_err());
        assert!(cdf_grid(&client, &x, &con).is_err());
        assert!(ppf_grid(&client, &x, &con).is_err());
    }
}
