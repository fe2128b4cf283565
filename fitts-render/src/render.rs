use anyhow::{Result, anyhow};
use fitts_core::{HOME_PRESSED_SCALE, Point, TargetSurface};
use fitts_timing::{HighPrecisionTimer, Timer};
use std::collections::HashMap;
use std::time::Duration;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

const BACKGROUND: [u8; 4] = [24, 24, 28, 255];
const HOME: [u8; 4] = [90, 140, 230, 255];
const HOME_PRESSED: [u8; 4] = [60, 100, 190, 255];
const TARGET: [u8; 4] = [230, 80, 70, 255];

/// What the lab area should show this frame, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scene {
    pub home_pressed: bool,
    pub show_home: bool,
    /// Placement point and diameter.
    pub target: Option<(Point, f64)>,
}

pub struct FrameStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawnTarget {
    placed: Point,
    diameter: f64,
    origin: (i32, i32),
    size: u32,
}

/// Draws home and target circles into an offscreen canvas and copies it into
/// the RGBA frame buffer.
///
/// The canvas is sized in physical pixels; scenes and reported centers are in
/// logical pixels, converted with the scale factor. Circles are rasterised once
/// per pixel size and blitted at whole-pixel origins, so the drawn center can
/// sit up to a pixel away from the requested one. [`TargetSurface`] reports the
/// drawn center.
pub struct LabRenderer {
    width: u32,
    height: u32,
    scale_factor: f64,
    home_diameter: f64,
    canvas: Pixmap,
    circle_cache: HashMap<(u32, [u8; 4]), Pixmap>,
    drawn_target: Option<DrawnTarget>,
    timer: HighPrecisionTimer,
}

impl LabRenderer {
    pub fn new(width: u32, height: u32, home_diameter: f64) -> Result<Self> {
        let canvas = Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| anyhow!("cannot allocate a {width}x{height} canvas"))?;
        Ok(Self {
            width,
            height,
            scale_factor: 1.0,
            home_diameter,
            canvas,
            circle_cache: HashMap::new(),
            drawn_target: None,
            timer: HighPrecisionTimer::new(),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<()> {
        self.canvas = Pixmap::new(new_width.max(1), new_height.max(1))
            .ok_or_else(|| anyhow!("cannot allocate a {new_width}x{new_height} canvas"))?;
        self.width = new_width;
        self.height = new_height;
        self.drawn_target = None;
        Ok(())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 && scale_factor != self.scale_factor {
            self.scale_factor = scale_factor;
            self.drawn_target = None;
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Canvas size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Canvas center in logical pixels.
    pub fn center(&self) -> Point {
        Point::new(
            self.width as f64 / self.scale_factor / 2.0,
            self.height as f64 / self.scale_factor / 2.0,
        )
    }

    pub fn render_frame(&mut self, scene: &Scene, frame_buffer: &mut [u8]) -> Result<FrameStats> {
        let t_draw = {
            let t = self.timer.now();
            self.draw_scene(scene)?;
            self.timer.elapsed(t)
        };

        let t_copy = {
            let t = self.timer.now();
            let data = self.canvas.data();
            if frame_buffer.len() != data.len() {
                return Err(anyhow!(
                    "frame buffer holds {} bytes, canvas {}",
                    frame_buffer.len(),
                    data.len()
                ));
            }
            // Everything drawn is opaque, so premultiplied RGBA equals straight RGBA.
            frame_buffer.copy_from_slice(data);
            self.timer.elapsed(t)
        };

        Ok(FrameStats {
            draw: t_draw,
            copy: t_copy,
            total: t_draw + t_copy,
        })
    }

    fn draw_scene(&mut self, scene: &Scene) -> Result<()> {
        let [r, g, b, a] = BACKGROUND;
        self.canvas.fill(Color::from_rgba8(r, g, b, a));

        if scene.show_home {
            let (diameter, color) = if scene.home_pressed {
                (self.home_diameter * HOME_PRESSED_SCALE, HOME_PRESSED)
            } else {
                (self.home_diameter, HOME)
            };
            let (center, diameter) = self.to_physical(self.center(), diameter);
            self.blit_circle(center, diameter, color)?;
        }

        self.drawn_target = match scene.target {
            Some((placed, diameter)) => {
                let (center, physical_diameter) = self.to_physical(placed, diameter);
                let (origin, size) = self.blit_circle(center, physical_diameter, TARGET)?;
                Some(DrawnTarget {
                    placed,
                    diameter,
                    origin,
                    size,
                })
            }
            None => None,
        };
        Ok(())
    }

    fn to_physical(&self, center: Point, diameter: f64) -> (Point, f64) {
        let s = self.scale_factor;
        (Point::new(center.x * s, center.y * s), diameter * s)
    }

    /// Logical center of a circle blitted at `origin` with pixel `size`.
    fn drawn_center(&self, origin: (i32, i32), size: u32) -> Point {
        let half = size as f64 / 2.0;
        Point::new(
            (origin.0 as f64 + half) / self.scale_factor,
            (origin.1 as f64 + half) / self.scale_factor,
        )
    }

    /// Top-left pixel and pixel size for a circle centered on `center`.
    fn circle_origin(center: Point, diameter: f64) -> ((i32, i32), u32) {
        let size = diameter.ceil().max(1.0) as u32;
        let half = size as f64 / 2.0;
        let x0 = (center.x - half).floor() as i32;
        let y0 = (center.y - half).floor() as i32;
        ((x0, y0), size)
    }

    fn blit_circle(
        &mut self,
        center: Point,
        diameter: f64,
        color: [u8; 4],
    ) -> Result<((i32, i32), u32)> {
        let (origin, size) = Self::circle_origin(center, diameter);
        let key = (size, color);
        if !self.circle_cache.contains_key(&key) {
            let pixmap = render_circle_pixmap(size, color)?;
            self.circle_cache.insert(key, pixmap);
        }
        if let Some(pixmap) = self.circle_cache.get(&key) {
            self.canvas.draw_pixmap(
                origin.0,
                origin.1,
                pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        Ok((origin, size))
    }
}

impl TargetSurface for LabRenderer {
    fn rendered_target_center(&self, placed: Point, diameter: f64) -> Point {
        match self.drawn_target {
            Some(t) if t.placed == placed && t.diameter == diameter => {
                self.drawn_center(t.origin, t.size)
            }
            // Not drawn yet (press and release inside one frame): predict the blit.
            _ => {
                let (center, diameter) = self.to_physical(placed, diameter);
                let (origin, size) = Self::circle_origin(center, diameter);
                self.drawn_center(origin, size)
            }
        }
    }
}

pub fn render_circle_pixmap(size: u32, color: [u8; 4]) -> Result<Pixmap> {
    let mut pixmap =
        Pixmap::new(size, size).ok_or_else(|| anyhow!("cannot allocate a {size}px circle"))?;
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);

    let r = size as f32 / 2.0;
    let path = PathBuilder::from_circle(r, r, r)
        .ok_or_else(|| anyhow!("degenerate circle of size {size}"))?;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn draws_home_and_target() {
        let mut r = LabRenderer::new(200, 100, 40.0).unwrap();
        let mut frame = vec![0u8; 200 * 100 * 4];
        let scene = Scene {
            home_pressed: false,
            show_home: true,
            target: Some((Point::new(160.0, 50.0), 20.0)),
        };
        r.render_frame(&scene, &mut frame).unwrap();

        assert_eq!(pixel(&frame, 200, 100, 50), HOME);
        assert_eq!(pixel(&frame, 200, 160, 50), TARGET);
        assert_eq!(pixel(&frame, 200, 2, 2), BACKGROUND);
    }

    #[test]
    fn fractional_placement_snaps_to_pixels() {
        let mut r = LabRenderer::new(200, 100, 40.0).unwrap();
        let mut frame = vec![0u8; 200 * 100 * 4];
        let placed = Point::new(60.6, 50.25);
        let scene = Scene {
            show_home: true,
            target: Some((placed, 30.0)),
            ..Default::default()
        };
        r.render_frame(&scene, &mut frame).unwrap();
        assert_eq!(r.rendered_target_center(placed, 30.0), Point::new(60.0, 50.0));
        assert_eq!(
            r.rendered_target_center(Point::new(10.9, 20.1), 30.0),
            Point::new(10.0, 20.0)
        );
    }

    #[test]
    fn undrawn_odd_target_is_predicted_where_it_will_be_drawn() {
        let mut r = LabRenderer::new(400, 200, 40.0).unwrap();
        let mut frame = vec![0u8; 400 * 200 * 4];
        let placed = Point::new(300.0, 100.0);
        let predicted = r.rendered_target_center(placed, 25.0);

        let scene = Scene {
            show_home: true,
            target: Some((placed, 25.0)),
            ..Default::default()
        };
        r.render_frame(&scene, &mut frame).unwrap();
        let drawn = r.rendered_target_center(placed, 25.0);
        assert_eq!(predicted, drawn);
        assert_eq!(drawn, Point::new(299.5, 99.5));

        let predicted = r.rendered_target_center(placed, 30.4);
        assert_eq!(predicted, Point::new(299.5, 99.5));
    }

    #[test]
    fn scale_factor_draws_logical_sizes() {
        let mut r = LabRenderer::new(400, 200, 40.0).unwrap();
        r.set_scale_factor(2.0);
        assert_eq!(r.center(), Point::new(100.0, 50.0));

        let placed = Point::new(60.6, 25.3);
        let predicted = r.rendered_target_center(placed, 20.0);
        let mut frame = vec![0u8; 400 * 200 * 4];
        let scene = Scene {
            show_home: true,
            target: Some((placed, 20.0)),
            ..Default::default()
        };
        r.render_frame(&scene, &mut frame).unwrap();

        // 40 px home and 20 px target, both doubled on the physical canvas.
        assert_eq!(pixel(&frame, 400, 235, 100), HOME);
        assert_eq!(pixel(&frame, 400, 121, 50), TARGET);
        assert_eq!(pixel(&frame, 400, 138, 50), TARGET);
        assert_eq!(pixel(&frame, 400, 145, 50), BACKGROUND);

        let drawn = r.rendered_target_center(placed, 20.0);
        assert_eq!(drawn, Point::new(60.5, 25.0));
        assert_eq!(predicted, drawn);
    }

    #[test]
    fn mismatched_frame_buffer_is_an_error() {
        let mut r = LabRenderer::new(10, 10, 4.0).unwrap();
        let mut frame = vec![0u8; 16];
        assert!(r.render_frame(&Scene::default(), &mut frame).is_err());

        r.resize(2, 2).unwrap();
        assert!(r.render_frame(&Scene::default(), &mut frame).is_ok());
        assert_eq!(r.size(), (2, 2));
    }
}
