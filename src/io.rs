//! Delimited-text input and output for point records.
//!
//! Records are one point per line, three comma-separated floating-point
//! fields: `x,y,weight`. Reading fails fast on the first malformed record;
//! writing emits each core point's record followed by the records of its
//! cached neighbors.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::point::{Point, PointId};

/// Parse point records from a reader. Blank lines are skipped; anything else
/// must be exactly three numeric fields.
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        points.push(parse_record(record, idx + 1)?);
    }
    log::debug!("read {} point records", points.len());
    Ok(points)
}

/// Read point records from a file.
pub fn read_points_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    read_points(BufReader::new(File::open(path)?))
}

fn parse_record(record: &str, line: usize) -> Result<Point> {
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() != 3 {
        return Err(Error::Parse {
            line,
            message: format!("expected 3 fields, found {}", fields.len()),
        });
    }

    let mut values = [0.0_f64; 3];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field.trim().parse().map_err(|_| Error::Parse {
            line,
            message: format!("non-numeric field `{}`", field.trim()),
        })?;
    }
    Ok(Point::new(values[0], values[1], values[2]))
}

/// Write each core point's record followed by its stored neighbors' records,
/// one `x,y,weight` record per line.
pub fn write_clusters<W: Write>(
    mut writer: W,
    points: &[Point],
    cores: &[PointId],
) -> Result<()> {
    for &core in cores {
        write_record(&mut writer, &points[core])?;
        for &neighbor in points[core].neighbors() {
            write_record(&mut writer, &points[neighbor])?;
        }
    }
    Ok(())
}

/// Write cluster results to a file.
pub fn write_clusters_to_path<P: AsRef<Path>>(
    path: P,
    points: &[Point],
    cores: &[PointId],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_clusters(&mut writer, points, cores)?;
    writer.flush()?;
    Ok(())
}

fn write_record<W: Write>(writer: &mut W, point: &Point) -> Result<()> {
    writeln!(writer, "{},{},{}", point.x(), point.y(), point.weight())?;
    Ok(())
}
