//! Host-side helpers for tensor operations with no device kernel.

use numr::dtype::DType;
use numr::error::{Error, Result};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

/// Apply a scalar f64 function element-wise via a host round-trip.
///
/// F32 tensors are widened to f64 for the evaluation and narrowed back.
/// Works with any Runtime backend.
pub fn map_unary<R, C, F>(t: &Tensor<R>, client: &C, f: F) -> Result<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: RuntimeClient<R>,
    F: Fn(f64) -> f64,
{
    let t = t.contiguous()?;
    match t.dtype() {
        DType::F32 => {
            let data: Vec<f32> = t.to_vec();
            let out: Vec<f32> = data.iter().map(|&v| f(v as f64) as f32).collect();
            Ok(Tensor::<R>::from_slice(&out, t.shape(), client.device()))
        }
        DType::F64 => {
            let data: Vec<f64> = t.to_vec();
            let out: Vec<f64> = data.iter().map(|&v| f(v)).collect();
            Ok(Tensor::<R>::from_slice(&out, t.shape(), client.device()))
        }
        dtype => Err(Error::UnsupportedDType {
            dtype,
            op: "map_unary",
        }),
    }
}
