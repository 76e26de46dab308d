use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::panel::{Panel, PanelSink, Region};
use crate::error::{PlotError, Result};

/// Result of a plotters drawing call on backend `DB`.
pub type DrawResult<T, DB> =
    std::result::Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// A chart that knows how to draw itself onto any plotters drawing area.
pub trait Renderable {
    fn render<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<(), DB>;
}

fn drawing_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Drawing(err.to_string())
}

// ---------------------------------------------------------------------------
// BitmapCanvas – in-memory RGB raster
// ---------------------------------------------------------------------------

/// White RGB canvas that panels are rasterized into, then saved as PNG.
pub struct BitmapCanvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl BitmapCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        BitmapCanvas {
            width,
            height,
            buffer: vec![255; width as usize * height as usize * 3],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes, row-major from the top-left pixel.
    #[cfg(test)]
    pub(crate) fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// Draw `item` clipped to `region`.
    pub fn draw<R: Renderable>(&mut self, region: Region, item: &R) -> Result<()> {
        let size = (self.width, self.height);
        let root = BitMapBackend::with_buffer(&mut self.buffer, size).into_drawing_area();
        let area = root.clone().shrink(
            (region.x as i32, region.y as i32),
            (region.width as i32, region.height as i32),
        );
        item.render(&area).map_err(drawing_error)?;
        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Encode the canvas as PNG at `path`, creating parent directories.
    ///
    /// The image is fully encoded before the file is touched, then written to a
    /// sibling temporary file and renamed over `path`. A failure leaves any
    /// existing file at `path` as it was.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let image = RgbImage::from_raw(self.width, self.height, self.buffer.clone())
            .ok_or_else(|| PlotError::Drawing("canvas buffer has the wrong size".to_string()))?;

        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(source) => PlotError::io(path, source),
                other => PlotError::Image(other),
            })?;

        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        let mut staging = path.as_os_str().to_owned();
        staging.push(".partial");
        let staging = PathBuf::from(staging);
        if let Err(e) = fs::write(&staging, &encoded) {
            let _ = fs::remove_file(&staging);
            return Err(PlotError::io(&staging, e));
        }
        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            PlotError::io(path, e)
        })?;

        log::info!("wrote {}×{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl PanelSink for BitmapCanvas {
    fn draw_panel(&mut self, region: Region, panel: &Panel) -> Result<()> {
        self.draw(region, panel)
    }
}

/// Create `dir` and its parents; an existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| PlotError::io(dir, e))
}
