use std::collections::HashMap;

use image::{DynamicImage, GenericImageView, Pixel, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{grid::Point, nodemap::NodeMap, solve::Solution};

/// Linear color ramp from the start of the path to its end
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub from: [u8; 3],
    pub to: [u8; 3],
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            from: [255, 0, 0],
            to: [0, 0, 255],
        }
    }
}

impl Gradient {
    pub fn color_at(&self, progress: f64) -> Rgb<u8> {
        let t = progress.clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (i, c) in channels.iter_mut().enumerate() {
            let from = self.from[i] as f64;
            let to = self.to[i] as f64;
            *c = (from + (to - from) * t).round() as u8;
        }
        Rgb(channels)
    }
}

/// Anything that accepts the rendered pixels
pub trait PixelSink {
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>);
}

impl PixelSink for RgbImage {
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        self.put_pixel(x, y, color);
    }
}

/// How far along the solved path every path cell lies, from 0 at the start to 1 at the end
#[derive(Debug, Clone, Default)]
pub struct PathProgress {
    cells: HashMap<Point, f64>,
    length: usize,
}

impl PathProgress {
    pub fn new(map: &NodeMap, solution: &Solution) -> Self {
        let path = solution.path();
        let length = solution.length(map);
        let total = length.max(1) as f64;

        let mut cells = HashMap::new();
        let mut walked = 0;

        for pair in path.windows(2) {
            let Some(connection) = map.connection_between(pair[0], pair[1]) else {
                continue;
            };
            let parent = map.node(connection.parent);

            for step in 0..connection.length {
                cells.insert(
                    parent.offset_at(connection, step),
                    (walked + step) as f64 / total,
                );
            }
            walked += connection.length;
        }

        // the last node is never the parent of a walked connection
        if let Some(last) = path.last() {
            cells.insert(map.node(*last).position, walked as f64 / total);
        }

        Self { cells, length }
    }

    pub fn get(&self, position: Point) -> Option<f64> {
        self.cells.get(&position).copied()
    }

    /// Number of cells covered by the path
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Length of the path in grid steps
    pub fn length(&self) -> usize {
        self.length
    }
}

/// The source image with the solved path painted over it
pub struct SolutionImage<'a> {
    source: &'a DynamicImage,
    progress: PathProgress,
    gradient: Gradient,
}

impl<'a> SolutionImage<'a> {
    pub fn new(
        source: &'a DynamicImage,
        map: &NodeMap,
        solution: &Solution,
        gradient: Gradient,
    ) -> Self {
        Self {
            source,
            progress: PathProgress::new(map, solution),
            gradient,
        }
    }

    pub fn progress(&self) -> &PathProgress {
        &self.progress
    }

    pub fn color_at(&self, x: u32, y: u32) -> Rgb<u8> {
        match self.progress.get(Point::new(x as usize, y as usize)) {
            Some(progress) => self.gradient.color_at(progress),
            None => self.source.get_pixel(x, y).to_rgb(),
        }
    }

    /// Writes every pixel of the image into `sink`
    pub fn render_into<S: PixelSink>(&self, sink: &mut S) {
        for y in 0..self.source.height() {
            for x in 0..self.source.width() {
                sink.set_pixel(x, y, self.color_at(x, y));
            }
        }
    }

    pub fn to_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.source.width(), self.source.height());
        self.render_into(&mut out);
        out
    }
}
