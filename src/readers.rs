//! Readers for the tabular text formats produced by supported instruments.
//!
//! Each reader hands back plain owned arrays and nothing else: the OpenRAMAN
//! reader yields intensities still indexed by sensor pixel (the instrument
//! does not calibrate its own axis), while the Horiba, Renishaw, and Wasatch
//! formats carry a factory-calibrated wavenumber axis alongside the
//! intensities. None of the parsing here participates in calibration.
use std::fs;
use std::path::Path;

use log::debug;

use thiserror::Error;

/// All the ways reading an instrument file can fail
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("I/O error reading spectrum file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Missing expected column {0:?}")]
    MissingColumn(&'static str),
    #[error("Malformed numeric value {value:?} on line {line}")]
    MalformedValue { value: String, line: usize },
}

fn parse_float(value: &str, line: usize) -> Result<f64, ReaderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ReaderError::MalformedValue {
            value: value.to_string(),
            line,
        })
}

/// Read intensities from a CSV file output by the OpenRAMAN.
///
/// The spectral range is not calibrated by the instrument, so only the
/// intensity column is meaningful; the axis must be reconstructed with
/// [`crate::calibrate::Calibrator`] afterwards.
pub fn read_openraman_csv<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, ReaderError> {
    let mut reader = csv::Reader::from_path(path)?;
    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == "Intensity (a.u.)")
        .ok_or(ReaderError::MissingColumn("Intensity (a.u.)"))?;

    let mut intensities = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let value = record.get(column).unwrap_or("");
        intensities.push(parse_float(value, row + 2)?);
    }
    debug!("Read {} OpenRAMAN samples", intensities.len());
    Ok(intensities)
}

/// Number of metadata lines preceding the data block in a Horiba MacroRam
/// text export
const HORIBA_HEADER_LINES: usize = 32;

/// Read a spectrum from a text file output by the Horiba MacroRam.
///
/// The instrument calibrates its own axis but writes it in descending
/// wavenumber order, so both arrays are reversed on load. The header block
/// is not valid UTF-8 in the wild, hence the lossy decode.
pub fn read_horiba_txt<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, Vec<f64>), ReaderError> {
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);

    let mut wavenumbers_cm1 = Vec::new();
    let mut intensities = Vec::new();
    for (offset, line) in text.lines().skip(HORIBA_HEADER_LINES).enumerate() {
        let line_no = HORIBA_HEADER_LINES + offset + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let wavenumber = fields
            .next()
            .ok_or(ReaderError::MissingColumn("wavenumber"))?;
        let intensity = fields
            .next()
            .ok_or(ReaderError::MissingColumn("intensity"))?;
        wavenumbers_cm1.push(parse_float(wavenumber, line_no)?);
        intensities.push(parse_float(intensity, line_no)?);
    }
    wavenumbers_cm1.reverse();
    intensities.reverse();
    debug!("Read {} Horiba samples", intensities.len());
    Ok((wavenumbers_cm1, intensities))
}

/// Read a spectrum from a two-column CSV file output by a Renishaw
/// instrument, wavenumber first, no header row.
pub fn read_renishaw_csv<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, Vec<f64>), ReaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut wavenumbers_cm1 = Vec::new();
    let mut intensities = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let wavenumber = record.get(0).ok_or(ReaderError::MissingColumn("wavenumber"))?;
        let intensity = record.get(1).ok_or(ReaderError::MissingColumn("intensity"))?;
        wavenumbers_cm1.push(parse_float(wavenumber, row + 1)?);
        intensities.push(parse_float(intensity, row + 1)?);
    }
    debug!("Read {} Renishaw samples", intensities.len());
    Ok((wavenumbers_cm1, intensities))
}

/// Read a spectrum from a CSV file exported by Wasatch ENLIGHTEN software.
///
/// The export opens with a free-form metadata preamble; the data block
/// starts at the header row naming a `Wavenumber` column, with processed
/// intensities in the `Processed` column.
pub fn read_wasatch_csv<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, Vec<f64>), ReaderError> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines().enumerate();

    let (_, header) = lines
        .by_ref()
        .find(|(_, line)| line.split(',').any(|field| field.trim() == "Wavenumber"))
        .ok_or(ReaderError::MissingColumn("Wavenumber"))?;
    let columns: Vec<&str> = header.split(',').map(|field| field.trim()).collect();
    let wavenumber_idx = columns
        .iter()
        .position(|c| *c == "Wavenumber")
        .ok_or(ReaderError::MissingColumn("Wavenumber"))?;
    let intensity_idx = columns
        .iter()
        .position(|c| *c == "Processed")
        .ok_or(ReaderError::MissingColumn("Processed"))?;

    let mut wavenumbers_cm1 = Vec::new();
    let mut intensities = Vec::new();
    for (offset, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let line_no = offset + 1;
        let wavenumber = fields
            .get(wavenumber_idx)
            .ok_or(ReaderError::MissingColumn("Wavenumber"))?;
        let intensity = fields
            .get(intensity_idx)
            .ok_or(ReaderError::MissingColumn("Processed"))?;
        wavenumbers_cm1.push(parse_float(wavenumber, line_no)?);
        intensities.push(parse_float(intensity, line_no)?);
    }
    debug!("Read {} Wasatch samples", intensities.len());
    Ok((wavenumbers_cm1, intensities))
}
