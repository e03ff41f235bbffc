//! ESRI ASCII grid scene format.
//!
//! Archive scenes are stored as `.asc` grids: header lines (`ncols`, `nrows`,
//! `xllcorner`, `yllcorner`, `cellsize`, optional `NODATA_value`) followed by
//! whitespace-separated cell rows from the north row down.

use std::fs;
use std::path::Path;

use crate::error::{Result, VerdinError};
use crate::models::Raster;

/// Value written for nodata cells
const NODATA_OUT: &str = "-9999";

/// Read a raster from an ESRI ASCII grid file
pub fn read_grid(path: &Path) -> Result<Raster> {
    let content = fs::read_to_string(path)?;
    parse_grid(&content).map_err(|reason| VerdinError::FormatInvalid {
        format: "ASCII grid".to_string(),
        reason: format!("{}: {}", path.display(), reason),
    })
}

/// Write a raster as an ESRI ASCII grid file
pub fn write_grid(path: &Path, raster: &Raster) -> Result<()> {
    let mut out = String::new();
    out.push_str(&format!("ncols {}\n", raster.width));
    out.push_str(&format!("nrows {}\n", raster.height));
    out.push_str(&format!("xllcorner {}\n", raster.west));
    out.push_str(&format!("yllcorner {}\n", raster.south()));
    out.push_str(&format!("cellsize {}\n", raster.cell_deg));
    out.push_str(&format!("NODATA_value {}\n", NODATA_OUT));

    for row in 0..raster.height {
        let cells: Vec<String> = (0..raster.width)
            .map(|col| {
                let value = raster.get(col, row);
                if value.is_nan() {
                    NODATA_OUT.to_string()
                } else {
                    value.to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(())
}

fn parse_grid(content: &str) -> std::result::Result<Raster, String> {
    let mut ncols: Option<usize> = None;
    let mut nrows: Option<usize> = None;
    let mut xllcorner: Option<f64> = None;
    let mut yllcorner: Option<f64> = None;
    let mut cellsize: Option<f64> = None;
    let mut nodata: f64 = -9999.0;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(first) = parts.next() else { continue };

        if first.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            let key = first.to_ascii_lowercase();
            let value = parts.next().ok_or_else(|| format!("header {} has no value", key))?;
            match key.as_str() {
                "ncols" => ncols = Some(parse_count(value, "ncols")?),
                "nrows" => nrows = Some(parse_count(value, "nrows")?),
                "xllcorner" => xllcorner = Some(parse_number(value, "xllcorner")?),
                "yllcorner" => yllcorner = Some(parse_number(value, "yllcorner")?),
                "cellsize" => cellsize = Some(parse_number(value, "cellsize")?),
                "nodata_value" => nodata = parse_number(value, "NODATA_value")?,
                other => return Err(format!("unknown header key '{}'", other)),
            }
        } else {
            data_lines.push(trimmed);
        }
    }

    let ncols = ncols.ok_or("missing ncols header")?;
    let nrows = nrows.ok_or("missing nrows header")?;
    let xllcorner = xllcorner.ok_or("missing xllcorner header")?;
    let yllcorner = yllcorner.ok_or("missing yllcorner header")?;
    let cellsize = cellsize.ok_or("missing cellsize header")?;
    if cellsize <= 0.0 {
        return Err(format!("cellsize must be positive, got {}", cellsize));
    }

    let mut values = Vec::with_capacity(ncols * nrows);
    for line in data_lines {
        for token in line.split_whitespace() {
            let value: f64 =
                token.parse().map_err(|_| format!("bad cell value '{}'", token))?;
            values.push(if value == nodata { f32::NAN } else { value as f32 });
        }
    }

    if values.len() != ncols * nrows {
        return Err(format!("expected {} cells, got {}", ncols * nrows, values.len()));
    }

    Ok(Raster {
        west: xllcorner,
        north: yllcorner + cellsize * nrows as f64,
        cell_deg: cellsize,
        width: ncols,
        height: nrows,
        values,
    })
}

fn parse_count(value: &str, key: &str) -> std::result::Result<usize, String> {
    value.parse().map_err(|_| format!("bad {} '{}'", key, value))
}

fn parse_number(value: &str, key: &str) -> std::result::Result<f64, String> {
    value.parse().map_err(|_| format!("bad {} '{}'", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
ncols 3
nrows 2
xllcorner -122.0
yllcorner 47.0
cellsize 0.5
NODATA_value -9999
0.1 0.2 0.3
0.4 -9999 0.6
";

    #[test]
    fn test_parse_grid() {
        let raster = parse_grid(GRID).unwrap();

        assert_eq!(raster.width, 3);
        assert_eq!(raster.height, 2);
        assert_eq!(raster.west, -122.0);
        // North edge is the corner plus the grid height
        assert!((raster.north - 48.0).abs() < 1e-9);
        assert_eq!(raster.cell_deg, 0.5);
        assert_eq!(raster.get(0, 0), 0.1);
        assert_eq!(raster.get(2, 1), 0.6);
        assert!(raster.get(1, 1).is_nan());
    }

    #[test]
    fn test_header_keys_case_insensitive() {
        let upper = GRID.replace("ncols", "NCOLS").replace("cellsize", "CELLSIZE");
        let raster = parse_grid(&upper).unwrap();
        assert_eq!(raster.width, 3);
    }

    #[test]
    fn test_missing_header() {
        let broken = GRID.replace("cellsize 0.5\n", "");
        assert!(parse_grid(&broken).is_err());
    }

    #[test]
    fn test_cell_count_mismatch() {
        let truncated = GRID.replace("0.4 -9999 0.6\n", "0.4 -9999\n");
        let err = parse_grid(&truncated).unwrap_err();
        assert!(err.contains("expected 6 cells"));
    }

    #[test]
    fn test_bad_cell_value() {
        let broken = GRID.replace("0.2", "abc");
        assert!(parse_grid(&broken).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.asc");

        let mut raster = Raster::nodata(-122.0, 48.0, 0.5, 3, 2);
        raster.set(0, 0, 0.25);
        raster.set(2, 1, 0.75);
        write_grid(&path, &raster).unwrap();

        let read = read_grid(&path).unwrap();
        assert_eq!(read.width, 3);
        assert_eq!(read.height, 2);
        assert_eq!(read.get(0, 0), 0.25);
        assert_eq!(read.get(2, 1), 0.75);
        assert!(read.get(1, 0).is_nan());
        assert!((read.north - raster.north).abs() < 1e-9);
    }
}
