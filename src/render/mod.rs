//! Barcode rendering.
//!
//! The pipeline's obligation ends at a validated [`BarcodePayload`]. Turning a
//! payload into a printable artifact is the job of a [`BarcodeRenderer`]; the
//! export layer only depends on the trait.

pub mod pdf;

use crate::common::Result;
use crate::pipeline::barcode::BarcodePayload;

/// Turns a payload into the bytes of a printable artifact.
pub trait BarcodeRenderer: Send + Sync {
    /// Render `payload`.
    fn render(&self, payload: &BarcodePayload) -> Result<Vec<u8>>;

    /// File extension of rendered artifacts, without the dot.
    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// A two-dimensional grid of dark and light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    width: usize,
    height: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Create an all-light grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            modules: vec![false; width * height],
        }
    }

    /// Build a grid from the coordinates of its dark modules.
    pub fn from_dark_modules<I>(width: usize, height: usize, dark: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new(width, height);
        for (x, y) in dark {
            grid.set(x, y, true);
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Set module `(x, y)`; coordinates outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x < self.width && y < self.height {
            self.modules[y * self.width + x] = dark;
        }
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.modules[y * self.width + x]
    }

    /// Coordinates of dark modules, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(|(i, _)| (i % self.width, i / self.width))
    }
}

/// Physical placement of the symbol on the page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Width of the symbol box, quiet zone included
    pub symbol_width_mm: f64,
    /// Height of the symbol box, quiet zone included
    pub symbol_height_mm: f64,
    /// Margin around the symbol box
    pub margin_mm: f64,
    /// Light modules around the symbol inside the box
    pub quiet_zone: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        // Sized for the label stock used on the binding line
        Self {
            symbol_width_mm: 17.0 * 1.10,
            symbol_height_mm: 6.0 * 1.27,
            margin_mm: 10.0,
            quiet_zone: 2,
        }
    }
}

impl PageLayout {
    #[inline]
    pub fn page_width_mm(&self) -> f64 {
        self.symbol_width_mm + 2.0 * self.margin_mm
    }

    #[inline]
    pub fn page_height_mm(&self) -> f64 {
        self.symbol_height_mm + 2.0 * self.margin_mm
    }
}

/// Renders payloads as rectangular ECC200 DataMatrix symbols on a PDF page.
#[cfg(feature = "render")]
#[derive(Debug, Clone, Default)]
pub struct DataMatrixPdfRenderer {
    pub layout: PageLayout,
}

#[cfg(feature = "render")]
impl DataMatrixPdfRenderer {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// Encode `payload` into a module grid.
    pub fn symbol(payload: &BarcodePayload) -> Result<ModuleGrid> {
        use datamatrix::{DataMatrix, SymbolList};

        let symbol = DataMatrix::encode(
            payload.as_str().as_bytes(),
            SymbolList::default().enforce_rectangular(),
        )
        .map_err(|e| crate::common::Error::Render(format!("{:?}", e)))?;
        let bitmap = symbol.bitmap();
        Ok(ModuleGrid::from_dark_modules(
            bitmap.width(),
            bitmap.height(),
            bitmap.pixels(),
        ))
    }
}

#[cfg(feature = "render")]
impl BarcodeRenderer for DataMatrixPdfRenderer {
    fn render(&self, payload: &BarcodePayload) -> Result<Vec<u8>> {
        let grid = Self::symbol(payload)?;
        Ok(pdf::write_grid_pdf(&grid, &self.layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_grid() {
        let grid = ModuleGrid::from_dark_modules(3, 2, [(0, 0), (2, 1), (5, 5)]);
        assert!(grid.is_dark(0, 0));
        assert!(grid.is_dark(2, 1));
        assert!(!grid.is_dark(1, 0));
        assert_eq!(grid.dark_modules().collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn test_default_layout() {
        let layout = PageLayout::default();
        assert!((layout.page_width_mm() - 38.7).abs() < 1e-9);
        assert!((layout.page_height_mm() - 27.62).abs() < 1e-9);
    }

    #[cfg(feature = "render")]
    #[test]
    fn test_datamatrix_symbol_is_rectangular() {
        let payload = BarcodePayload::new(format!("9780000000002{}", "0".repeat(24))).unwrap();
        let grid = DataMatrixPdfRenderer::symbol(&payload).unwrap();
        assert!(grid.width() > grid.height());
        assert!(grid.dark_modules().count() > 0);
    }

    #[cfg(feature = "render")]
    #[test]
    fn test_render_pdf() {
        let payload = BarcodePayload::new(format!("9780000000002{}", "0".repeat(24))).unwrap();
        let bytes = DataMatrixPdfRenderer::default().render(&payload).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}
