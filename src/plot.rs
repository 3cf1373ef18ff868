/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use csv::Writer;

use crate::buffer::SampleBuffer;
use crate::error::{DspError, Result};

/// Writes amplitude over time for one or more buffers to a CSV file.
///
/// Columns are `time_s` followed by one column per label. Rows run to the
/// longest buffer; shorter tracks leave their cells empty. All buffers must
/// share one sample rate.
pub fn write_waveform_csv(path: &str, tracks: &[(&str, &SampleBuffer)]) -> Result<()> {
    let Some((_, first)) = tracks.first() else {
        return Err(DspError::invalid("no tracks to export"));
    };
    let sample_rate = first.sample_rate();
    if let Some((label, _)) = tracks.iter().find(|(_, b)| b.sample_rate() != sample_rate) {
        return Err(DspError::invalid(format!(
            "track '{}' does not run at {} Hz",
            label, sample_rate
        )));
    }

    let export = |source| DspError::Export {
        path: path.to_string(),
        source,
    };
    let mut writer = Writer::from_path(path).map_err(export)?;

    let mut header = vec!["time_s"];
    header.extend(tracks.iter().map(|(label, _)| *label));
    writer.write_record(&header).map_err(export)?;

    let rows = tracks.iter().map(|(_, b)| b.len()).max().unwrap_or(0);
    for i in 0..rows {
        let mut record = Vec::with_capacity(tracks.len() + 1);
        record.push(format!("{:.6}", i as f64 / sample_rate as f64));
        for (_, b) in tracks {
            record.push(b.samples().get(i).map(|s| s.to_string()).unwrap_or_default());
        }
        writer.write_record(&record).map_err(export)?;
    }

    writer.flush().map_err(|e| export(e.into()))?;
    log::debug!("exported {} rows x {} tracks to '{}'", rows, tracks.len(), path);
    Ok(())
}
