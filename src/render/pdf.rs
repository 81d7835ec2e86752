//! Minimal single-page PDF output for module grids.
//!
//! Dark modules are drawn as filled rectangles in one content stream; the
//! file carries no fonts or images.

use std::fmt::Write as _;

use super::{ModuleGrid, PageLayout};

/// PDF user-space points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

fn pt(mm: f64) -> String {
    format!("{:.3}", mm * PT_PER_MM)
}

/// Build the drawing operators for `grid` placed according to `layout`.
fn content_stream(grid: &ModuleGrid, layout: &PageLayout) -> String {
    let cols = grid.width() + 2 * layout.quiet_zone;
    let rows = grid.height() + 2 * layout.quiet_zone;
    let module_w = layout.symbol_width_mm / cols as f64;
    let module_h = layout.symbol_height_mm / rows as f64;
    let left = (layout.page_width_mm() - layout.symbol_width_mm) / 2.0;
    let top = layout.margin_mm;
    let page_h = layout.page_height_mm();

    let mut ops = String::from("0 g\n");
    for (x, y) in grid.dark_modules() {
        let col = x + layout.quiet_zone;
        let row = y + layout.quiet_zone;
        let x_mm = left + col as f64 * module_w;
        // PDF origin is bottom-left
        let y_mm = page_h - top - (row + 1) as f64 * module_h;
        let _ = writeln!(ops, "{} {} {} {} re", pt(x_mm), pt(y_mm), pt(module_w), pt(module_h));
    }
    ops.push_str("f\n");
    ops
}

/// Serialize `grid` as a one-page PDF document.
pub fn write_grid_pdf(grid: &ModuleGrid, layout: &PageLayout) -> Vec<u8> {
    let content = content_stream(grid, layout);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << >> /Contents 4 0 R >>",
            pt(layout.page_width_mm()),
            pt(layout.page_height_mm())
        ),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
    ];

    let mut out: Vec<u8> = Vec::with_capacity(content.len() + 512);
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_start = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    );
    out.extend_from_slice(xref.as_bytes());
    out
}
