use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use cgmath::{vec2, Vector2};
use heat::d1::{PlotBounds, ProfileSink, Snapshot, SnapshotColor};
use image::{Rgb, RgbImage};
use ndarray::{Array2, ArrayView1};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Writes the whole space-time history as a grayscale image, time running down.
pub fn save_history<P: AsRef<Path>>(path: P, u: &Array2<f64>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let (steps, points) = u.dim();

    let peak = u.iter().fold(0.0f64, |a, &b| a.max(b));
    let scale = if peak > 0.0 { 255.0 / peak } else { 0.0 };

    let mut img = RgbImage::new(points as u32, steps as u32);

    for ((t, i), &e) in u.indexed_iter() {
        let l = (e * scale).max(0.0).min(255.0) as u8;
        img.put_pixel(i as u32, t as u32, Rgb([l, l, l]));
    }

    img.save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;

    Ok(())
}

fn rgb(color: SnapshotColor) -> [u8; 3] {
    match color {
        SnapshotColor::Red => [255, 0, 0],
        SnapshotColor::Blue => [0, 0, 255],
        SnapshotColor::Black => [0, 0, 0],
        SnapshotColor::Green => [0, 128, 0],
        SnapshotColor::Yellow => [191, 191, 0],
        SnapshotColor::Magenta => [191, 0, 191],
    }
}

/// Maps data coordinates inside `bounds` onto a pixel rectangle.
struct Frame {
    origin: Vector2<f32>,
    size: Vector2<f32>,
    bounds: PlotBounds,
}

impl Frame {
    fn new(width: u32, height: u32, margin: f32, bounds: PlotBounds) -> Self {
        Self {
            origin: vec2(margin, margin),
            size: vec2(width as f32 - 2.0 * margin, height as f32 - 2.0 * margin),
            bounds,
        }
    }

    /// Values outside the window are clamped onto its edge.
    fn to_pixel(&self, x: f64, y: f64) -> Vector2<f32> {
        let b = &self.bounds;

        let x = x.max(b.x_min).min(b.x_max);
        let y = y.max(b.y_min).min(b.y_max);

        let s = ((x - b.x_min) / (b.x_max - b.x_min)) as f32;
        let t = ((y - b.y_min) / (b.y_max - b.y_min)) as f32;

        self.origin + vec2(s * self.size.x, (1.0 - t) * self.size.y)
    }

    fn corners(&self) -> [Vector2<f32>; 4] {
        let b = &self.bounds;

        [
            self.to_pixel(b.x_min, b.y_min),
            self.to_pixel(b.x_max, b.y_min),
            self.to_pixel(b.x_max, b.y_max),
            self.to_pixel(b.x_min, b.y_max),
        ]
    }
}

/// Line plot of temperature profiles, saved as a PNG on every `display`.
#[derive(Debug, Clone)]
pub struct ProfilePlot {
    path: PathBuf,
    width: u32,
    height: u32,
    margin: f32,
}

impl ProfilePlot {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            width: 800,
            height: 480,
            margin: 40.0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileSink for ProfilePlot {
    type Error = anyhow::Error;

    fn display(
        &mut self,
        xx: ArrayView1<f64>,
        curves: &[Snapshot],
        bounds: PlotBounds,
    ) -> anyhow::Result<()> {
        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| anyhow!("invalid plot size {}x{}", self.width, self.height))?;
        pixmap.fill(Color::WHITE);

        let frame = Frame::new(self.width, self.height, self.margin, bounds);
        let stroke = Stroke {
            width: 1.5,
            ..Stroke::default()
        };

        for curve in curves {
            let mut pb = PathBuilder::new();

            for (i, (&x, &y)) in xx.iter().zip(curve.profile.iter()).enumerate() {
                let p = frame.to_pixel(x, y);
                if i == 0 {
                    pb.move_to(p.x, p.y);
                } else {
                    pb.line_to(p.x, p.y);
                }
            }

            // Fewer than two points make no path.
            if let Some(path) = pb.finish() {
                let [r, g, b] = rgb(curve.color);
                let mut paint = Paint::default();
                paint.set_color_rgba8(r, g, b, 255);
                paint.anti_alias = true;

                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        let [c0, c1, c2, c3] = frame.corners();
        let mut pb = PathBuilder::new();
        pb.move_to(c0.x, c0.y);
        pb.line_to(c1.x, c1.y);
        pb.line_to(c2.x, c2.y);
        pb.line_to(c3.x, c3.y);
        pb.close();

        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color_rgba8(0, 0, 0, 255);

            pixmap.stroke_path(
                &path,
                &paint,
                &Stroke::default(),
                Transform::identity(),
                None,
            );
        }

        pixmap
            .save_png(&self.path)
            .with_context(|| format!("failed to save {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use heat::d1::{run, HeatConfig, DISPLAY_BOUNDS};
    use ndarray::array;

    #[test]
    fn test_frame_to_pixel() {
        let frame = Frame::new(120, 100, 10.0, DISPLAY_BOUNDS);

        assert_eq!(frame.to_pixel(-10.0, 0.0), vec2(10.0, 90.0));
        assert_eq!(frame.to_pixel(10.0, 0.4), vec2(110.0, 10.0));
        assert_eq!(frame.to_pixel(0.0, 0.2), vec2(60.0, 50.0));

        // Clamped onto the window edge.
        assert_eq!(frame.to_pixel(20.0, -1.0), vec2(110.0, 90.0));
        assert_eq!(frame.to_pixel(-20.0, 1.0), vec2(10.0, 10.0));
    }

    #[test]
    fn test_display_writes_png() {
        let dir = std::env::temp_dir().join("plot-util-test");
        std::fs::create_dir_all(&dir).unwrap();

        let heat = run(HeatConfig {
            w: 10.0,
            dx: 0.5,
            t: 10.0,
        });
        let mut plot = ProfilePlot::new(dir.join("profiles.png")).with_size(200, 120);
        heat.show(&mut plot).unwrap();

        let img = image::open(plot.path()).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (200, 120));
    }

    #[test]
    fn test_save_history() {
        let dir = std::env::temp_dir().join("plot-util-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.png");

        let u = array![[0.0, 2.0, 0.0], [0.5, 1.0, 0.5]];
        save_history(&path, &u).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([127, 127, 127]));
    }
}
