use image::{DynamicImage, GenericImageView};

use crate::error::GridError;
use crate::grid::{Cell, Grid};

/// Builds a maze from a bitmap image, one cell per pixel.
///
/// Pixels with a leading channel below 128 become walls; everything else
/// becomes an open cell of cost 1.
pub fn parse_img(img: &DynamicImage) -> Result<Grid, GridError> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut cells = vec![vec![Cell::Wall; width]; height];

    for row in 0..height {
        for col in 0..width {
            let p = img.get_pixel(col as u32, row as u32);

            cells[row][col] = if p.0[0] < 128 {
                Cell::Wall
            } else {
                Cell::Open(1)
            }
        }
    }

    Grid::from_cells(cells)
}
