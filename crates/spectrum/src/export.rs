//! CSV spectrum files.
//!
//! Format: one comment header line, then `wavelength,value` rows.
//!
//! ```text
//! # Wavelength (nm), Count
//! 400.0,1234.5
//! 400.5,1240.1
//! ```

use crate::display::DisplayMode;
use crate::error::{SpectrumError, SpectrumResult};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// A spectrum loaded back from a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSpectrum {
    pub wavelengths: Vec<f64>,
    pub values: Vec<f64>,
}

/// Write a spectrum to `path`.
pub fn write_csv<P: AsRef<Path>>(
    path: P,
    wavelengths: &[f64],
    values: &[f64],
    mode: DisplayMode,
) -> SpectrumResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv_to(file, wavelengths, values, mode)?;
    info!(?path, pixels = values.len(), mode = mode.label(), "Spectrum exported");
    Ok(())
}

/// Write a spectrum to any writer.
pub fn write_csv_to<W: Write>(
    writer: W,
    wavelengths: &[f64],
    values: &[f64],
    mode: DisplayMode,
) -> SpectrumResult<()> {
    if wavelengths.len() != values.len() {
        return Err(SpectrumError::LengthMismatch {
            what: "values",
            expected: wavelengths.len(),
            actual: values.len(),
        });
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let label = format!(" {}", mode.label());
    wtr.write_record(["# Wavelength (nm)", label.as_str()])?;
    for (x, y) in wavelengths.iter().zip(values) {
        wtr.write_record([x.to_string(), y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a spectrum file written by [`write_csv`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> SpectrumResult<ExportedSpectrum> {
    let path = path.as_ref();
    let spectrum = read_csv_from(File::open(path)?)?;
    debug!(?path, pixels = spectrum.values.len(), "Spectrum file loaded");
    Ok(spectrum)
}

/// Read a spectrum from any reader.
pub fn read_csv_from<R: Read>(reader: R) -> SpectrumResult<ExportedSpectrum> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut wavelengths = Vec::new();
    let mut values = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.len() != 2 {
            return Err(SpectrumError::Malformed {
                line,
                message: format!("expected 2 columns, found {}", record.len()),
            });
        }
        let parse = |field: &str| {
            field.parse::<f64>().map_err(|e| SpectrumError::Malformed {
                line,
                message: format!("'{}': {}", field, e),
            })
        };
        wavelengths.push(parse(&record[0])?);
        values.push(parse(&record[1])?);
    }

    if values.is_empty() {
        return Err(SpectrumError::Empty);
    }

    Ok(ExportedSpectrum {
        wavelengths,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[400.0, 400.5], &[12.5, 13.0], DisplayMode::Raw).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# Wavelength (nm), Count"));
        assert_eq!(lines.next(), Some("400,12.5"));
        assert_eq!(lines.next(), Some("400.5,13"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_absorbance_header() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[1.0], &[0.5], DisplayMode::Absorbance).unwrap();
        assert!(String::from_utf8(buf)
            .unwrap()
            .starts_with("# Wavelength (nm), Absorbance\n"));
    }

    #[test]
    fn test_file_roundtrip_keeps_non_finite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");

        write_csv(&path, &[500.0, 501.0], &[f64::INFINITY, 0.25], DisplayMode::Absorbance).unwrap();
        let loaded = read_csv(&path).unwrap();

        assert_eq!(loaded.wavelengths, vec![500.0, 501.0]);
        assert!(loaded.values[0].is_infinite());
        assert_eq!(loaded.values[1], 0.25);
    }

    #[test]
    fn test_malformed_row() {
        let input = "# Wavelength (nm), Count\n400,abc\n";
        let err = read_csv_from(input.as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::Malformed { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let err = write_csv_to(Vec::new(), &[1.0, 2.0], &[1.0], DisplayMode::Raw).unwrap_err();
        assert!(matches!(err, SpectrumError::LengthMismatch { .. }));
    }
}
