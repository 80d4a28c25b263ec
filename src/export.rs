//! CSV export of the marker list

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::types::{MarkerId, MarkerRecord};

/// Separator between diseases inside the `diseases` column
pub const DISEASE_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: MarkerId,
    latitude: f64,
    longitude: f64,
    diseases: &'a str,
}

/// Writes `markers` as `id,latitude,longitude,diseases` rows, with a header
pub fn write_csv<W: Write>(markers: &[MarkerRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for marker in markers {
        let diseases = marker.diseases.join(DISEASE_SEPARATOR);
        writer.serialize(Row {
            id: marker.id,
            latitude: marker.position.latitude,
            longitude: marker.position.longitude,
            diseases: &diseases,
        })?;
    }
    writer.flush()?;
    Ok(())
}
