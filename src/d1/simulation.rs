use std::marker::PhantomData;

use ndarray::{Array, Array1, Array2, ArrayView1};

use super::{initial_profile, laplacian};

/// Ratios within this relative distance of an integer are snapped to it
/// before flooring, so `10.0 / 0.05^2` gives 4000 rather than 3999.
const RATIO_TOLERANCE: f64 = 1e-9;

fn sample_count(span: f64, step: f64) -> usize {
    let ratio = span / step;
    let nearest = ratio.round();

    if (ratio - nearest).abs() <= RATIO_TOLERANCE * nearest.abs().max(1.0) {
        nearest as usize
    } else {
        ratio.floor() as usize
    }
}

/// Parameters of a bar simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatConfig {
    /// Half-width of the bar; the grid spans `[-w, w]`.
    pub w: f64,
    /// Spatial step.
    pub dx: f64,
    /// Total simulated time.
    pub t: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            w: 10.0,
            dx: 0.05,
            t: 10.0,
        }
    }
}

impl HeatConfig {
    /// Time step, tied to the spatial step as `dx^2`.
    pub fn dt(&self) -> f64 {
        self.dx * self.dx
    }

    /// Number of stored time rows, `floor(t / dt)`.
    pub fn steps(&self) -> usize {
        sample_count(self.t, self.dt())
    }

    /// Number of grid points, `floor(2w / dx)`.
    pub fn points(&self) -> usize {
        sample_count(2.0 * self.w, self.dx)
    }
}

/// Phase marker: row 0 holds the initial profile, later rows are zero.
#[derive(Debug)]
pub enum Seeded {}

/// Phase marker: every row of the history has been computed.
#[derive(Debug)]
pub enum Solved {}

/// Display window as `[x_min, x_max] x [y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

pub const DISPLAY_BOUNDS: PlotBounds = PlotBounds {
    x_min: -10.0,
    x_max: 10.0,
    y_min: 0.0,
    y_max: 0.4,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotColor {
    Red,
    Blue,
    Black,
    Green,
    Yellow,
    Magenta,
}

const SNAPSHOT_COLORS: [SnapshotColor; 6] = [
    SnapshotColor::Red,
    SnapshotColor::Blue,
    SnapshotColor::Black,
    SnapshotColor::Green,
    SnapshotColor::Yellow,
    SnapshotColor::Magenta,
];

/// One history row selected for display.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub row: usize,
    pub time: f64,
    pub color: SnapshotColor,
    pub profile: ArrayView1<'a, f64>,
}

/// Receives the profiles picked by [`HeatEquation::show`].
pub trait ProfileSink {
    type Error;

    fn display(
        &mut self,
        xx: ArrayView1<f64>,
        curves: &[Snapshot],
        bounds: PlotBounds,
    ) -> Result<(), Self::Error>;
}

/// Heat equation on `[-w, w]`, integrated with forward Euler.
///
/// `u[[t, i]]` is the temperature at `xx[i]` after `t` steps.
#[derive(Debug)]
pub struct HeatEquation<Phase> {
    config: HeatConfig,
    dt: f64,
    steps: usize,
    xx: Array1<f64>,
    u: Array2<f64>,
    _phase: PhantomData<Phase>,
}

impl HeatEquation<Seeded> {
    pub fn new(config: HeatConfig) -> Self {
        let dt = config.dt();
        let steps = config.steps();
        let xx = Array::linspace(-config.w, config.w, config.points());

        let mut u = Array::zeros((steps, xx.len()));
        if steps > 0 {
            u.row_mut(0).assign(&initial_profile(xx.view()));
        }

        Self {
            config,
            dt,
            steps,
            xx,
            u,
            _phase: PhantomData,
        }
    }

    pub fn solve(self) -> HeatEquation<Solved> {
        self.solve_with(|_| {})
    }

    /// Like [`solve`](Self::solve), calling `on_step` after each new row.
    pub fn solve_with<F>(mut self, mut on_step: F) -> HeatEquation<Solved>
    where
        F: FnMut(usize),
    {
        for step in 0..self.steps.saturating_sub(1) {
            let next = &self.u.row(step) + &laplacian(self.u.row(step));
            self.u.row_mut(step + 1).assign(&next);

            on_step(step + 1);
        }

        HeatEquation {
            config: self.config,
            dt: self.dt,
            steps: self.steps,
            xx: self.xx,
            u: self.u,
            _phase: PhantomData,
        }
    }
}

impl<Phase> HeatEquation<Phase> {
    pub fn config(&self) -> &HeatConfig {
        &self.config
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn xx(&self) -> ArrayView1<f64> {
        self.xx.view()
    }

    pub fn history(&self) -> &Array2<f64> {
        &self.u
    }

    pub fn row(&self, t: usize) -> ArrayView1<f64> {
        self.u.row(t)
    }

    /// Simulated time of row `t`.
    pub fn time(&self, t: usize) -> f64 {
        t as f64 * self.dt
    }

    /// Discrete integral of row `t` over the bar.
    pub fn heat_content(&self, t: usize) -> f64 {
        self.u.row(t).sum() * self.config.dx
    }
}

impl HeatEquation<Solved> {
    /// Rows at 0, 1/5, 2/5, 3/5 and 4/5 of the run, plus the last one.
    pub fn snapshot_rows(&self) -> [usize; 6] {
        let n = self.steps;

        [
            0,
            n / 5,
            2 * n / 5,
            3 * n / 5,
            4 * n / 5,
            n.saturating_sub(1),
        ]
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshot_rows()
            .iter()
            .zip(SNAPSHOT_COLORS.iter())
            .map(|(&row, &color)| Snapshot {
                row,
                time: self.time(row),
                color,
                profile: self.u.row(row),
            })
            .collect()
    }

    /// Hands the snapshot profiles to `sink` with the fixed display window.
    pub fn show<S: ProfileSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.display(self.xx(), &self.snapshots(), DISPLAY_BOUNDS)
    }
}

/// Builds and solves a simulation for `config`.
pub fn run(config: HeatConfig) -> HeatEquation<Solved> {
    HeatEquation::new(config).solve()
}
