use ndarray::{Array, Array1, ArrayView1};

mod simulation;

pub use simulation::{
    run, HeatConfig, HeatEquation, PlotBounds, ProfileSink, Seeded, Snapshot, SnapshotColor,
    Solved, DISPLAY_BOUNDS,
};

/// Fourier number `dt / dx^2` of one step of [`laplacian`] with unit diffusivity.
///
/// With `dt = dx^2` the increment `(left + right - 2u) / 2` is the FTCS update
/// with this ratio, which sits exactly on the explicit-scheme stability limit.
pub const MESH_RATIO: f64 = 0.5;

/// Smooth bump with compact support on `(-1, 1)`, peaking at `exp(-1)`.
pub fn bump(x: f64) -> f64 {
    if x <= -1.0 || x >= 1.0 {
        0.0
    } else {
        (-1.0 / (1.0 - x * x)).exp()
    }
}

/// Initial temperature profile sampled on `xx`.
pub fn initial_profile(xx: ArrayView1<f64>) -> Array1<f64> {
    xx.mapv(bump)
}

/// Per-step increment of the explicit scheme.
///
/// Samples outside `u` are treated as zero, so a single-element row
/// decays to `-u[0]`.
pub fn laplacian(u: ArrayView1<f64>) -> Array1<f64> {
    let n = u.len();

    Array::from_shape_fn(n, |i| {
        let left = if i > 0 { u[i - 1] } else { 0.0 };
        let right = if i + 1 < n { u[i + 1] } else { 0.0 };

        (left + right - 2.0 * u[i]) * MESH_RATIO
    })
}

/// Amount of `sum(u)` lost through the zero padding in one step.
pub fn boundary_leakage(u: ArrayView1<f64>) -> f64 {
    let n = u.len();

    if n == 0 {
        0.0
    } else {
        (u[0] + u[n - 1]) / 2.0
    }
}
