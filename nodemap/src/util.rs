use image::{DynamicImage, GenericImageView, Pixel};

use crate::{Cell, MazeGrid};

/// Pixels darker than `wall_threshold` become walls, everything else is open
pub fn parse_img(img: &DynamicImage, wall_threshold: u8) -> Result<MazeGrid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut cells = vec![vec![Cell::Wall; width]; height];

    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            let p = img.get_pixel(col as u32, row as u32).to_luma();

            *cell = if p.0[0] < wall_threshold {
                Cell::Wall
            } else {
                Cell::Open
            }
        }
    }

    Ok(MazeGrid {
        rows: height,
        columns: width,
        cells,
    })
}
