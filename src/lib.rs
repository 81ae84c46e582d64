//! nfwdist - Statistics of the 3D Navarro-Frenk-White profile
//!
//! Density, distribution function, quantile function, and random generation
//! for the 3D NFW profile in the normalized radius x = R/Rvir ∈ (0, 1],
//! parameterized by the concentration c = Rvir/Rs.
//!
//! The quantile function inverts the NFW cumulative distribution in closed
//! form through the principal branch of the Lambert W function, so random
//! generation is plain inverse-transform sampling - no accept/reject loop
//! and no iterative root-finding per deviate. This is the useful primitive
//! for populating halos with tracers (e.g. in an HOD pipeline).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     nfwdist                              │
//! │   (Nfw distribution, Lambert W, concentration grids)    │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ uses
//! ┌──────────────────────────▼──────────────────────────────┐
//! │                       numr                               │
//! │     (tensors, elementwise ops, broadcasting, RNG)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Scalar methods work on plain `f64`. The `*_tensor` methods and the
//! [`grid`] functions are generic over numr's `Runtime`, so batch
//! evaluation runs on any backend a numr client exists for.
//!
//! # Example
//!
//! ```ignore
//! use nfwdist::{ContinuousDistribution, Distribution, Nfw};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let halo = Nfw::new(5.0)?;
//!
//! // Density, CDF, and quantile at a radius
//! let d = halo.pdf(0.5);
//! let p = halo.cdf(0.5);
//! let r = halo.ppf(p)?; // back to 0.5
//!
//! // Seeded sampling by inverse transform
//! let mut rng = StdRng::seed_from_u64(42);
//! let radii = halo.rvs(&mut rng, 1000);
//! ```
//!
//! # Concentration grids
//!
//! To evaluate a k-vector of inputs against an m-vector of concentrations
//! in one shot, the [`grid`] functions broadcast to a [k, m] tensor:
//!
//! ```ignore
//! use nfwdist::grid;
//! use numr::runtime::cpu::{CpuDevice, CpuRuntime};
//! use numr::tensor::Tensor;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let x = Tensor::<CpuRuntime>::from_slice(&[0.25, 0.5, 0.75], &[3], &device);
//! let con = Tensor::<CpuRuntime>::from_slice(&[5.0, 10.0], &[2], &device);
//! let d = grid::pdf_grid(&client, &x, &con)?; // shape [3, 2]
//! ```

mod distribution;
mod error;
pub mod grid;
mod helpers;
mod nfw;
mod special;

// Public API: distribution traits and the profile itself
pub use distribution::{ContinuousDistribution, Distribution};
pub use error::{StatsError, StatsResult};
pub use nfw::Nfw;

// Public API: special functions
pub use special::lambertw0_scalar;
