use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::data::raster::Raster;

/// Writes the raster as a 16-bit binary PGM (`P5`, big-endian samples).
pub fn write_pgm(raster: &Raster, mut out: impl Write) -> std::io::Result<()> {
    // at least 256 so readers always expect two bytes per sample
    let max_value = raster.samples().iter().copied().max().unwrap_or(0).max(256);

    writeln!(out, "P5")?;
    writeln!(out, "{} {}", raster.width(), raster.height())?;
    writeln!(out, "{max_value}")?;

    for sample in raster.samples() {
        out.write_all(&sample.to_be_bytes())?;
    }

    out.flush()
}

pub fn write_pgm_file(raster: &Raster, filepath: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(filepath)?;

    write_pgm(raster, BufWriter::new(file))
}
