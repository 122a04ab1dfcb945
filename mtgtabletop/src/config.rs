use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::Error;

pub const DEFAULT_ROWS: u32 = 7;
pub const DEFAULT_COLS: u32 = 10;
pub const DEFAULT_CELL_WIDTH: u32 = 312;
pub const DEFAULT_CELL_HEIGHT: u32 = 445;
pub const DEFAULT_JPEG_QUALITY: u8 = 100;
pub const DEFAULT_CARDBACK: &str = "http://itszn.com/mtg/cardback.jpg";

/// Grid geometry and output settings of the exported deck faces.
///
/// Every field is optional in a configuration file. A missing
/// `sheet_capacity` is derived from the grid, which keeps one cell free for
/// the hidden card.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_cell_width")]
    pub cell_width: u32,
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    #[serde(default)]
    pub sheet_capacity: Option<u32>,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_cardback")]
    pub cardback: String,
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

fn default_cols() -> u32 {
    DEFAULT_COLS
}

fn default_cell_width() -> u32 {
    DEFAULT_CELL_WIDTH
}

fn default_cell_height() -> u32 {
    DEFAULT_CELL_HEIGHT
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_cardback() -> String {
    DEFAULT_CARDBACK.to_string()
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            sheet_capacity: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            cardback: DEFAULT_CARDBACK.to_string(),
        }
    }
}

impl SheetConfig {
    pub fn from_file(path: &Path) -> Result<SheetConfig, Error> {
        let read_error = |reason: String| Error::ReadConfig {
            path: path.to_path_buf(),
            reason,
        };
        let f = File::open(path).map_err(|e| read_error(e.to_string()))?;
        let config: SheetConfig =
            serde_json::from_reader(f).map_err(|e| read_error(e.to_string()))?;
        config.validated()
    }

    pub fn cells(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    pub fn capacity(&self) -> u32 {
        self.sheet_capacity
            .unwrap_or_else(|| self.cells().saturating_sub(1))
    }

    pub fn sheet_width(&self) -> u32 {
        self.cols * self.cell_width
    }

    pub fn sheet_height(&self) -> u32 {
        self.rows * self.cell_height
    }

    /// Top left corner of the cell with the given row-major index.
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        (
            (index % self.cols) * self.cell_width,
            (index / self.cols) * self.cell_height,
        )
    }

    pub fn validated(self) -> Result<SheetConfig, Error> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::Config(format!(
                "the grid needs at least one row and one column, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(Error::Config(format!(
                "cells need a positive size, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        let fits = |a: u32, b: u32| a.checked_mul(b).is_some();
        if !fits(self.rows, self.cols)
            || !fits(self.cols, self.cell_width)
            || !fits(self.rows, self.cell_height)
        {
            return Err(Error::Config(format!(
                "a {}x{} grid of {}x{} cells is too large",
                self.cols, self.rows, self.cell_width, self.cell_height
            )));
        }
        if self.cells() < 2 {
            return Err(Error::Config(
                "the grid needs room for one card and the hidden card".to_string(),
            ));
        }
        let capacity = self.capacity();
        if capacity == 0 || capacity >= self.cells() {
            return Err(Error::Config(format!(
                "sheet capacity must be between 1 and {}, got {}",
                self.cells() - 1,
                capacity
            )));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::Config(format!(
                "jpeg quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(self)
    }
}
