// Binary layout - the text header as fixed-width little-endian fields
//
// Layout, in order:
//   string   culture line
//   f64      start time (OLE automation date)
//   f64      end time (OLE automation date)
//   i32 x5   elapsed days, hours, minutes, seconds, milliseconds
//   i32      series count (always 1)
//   i32      sample count
//   f64      sample frequency
//   f64 x10  average, maximum, minimum, fractal dimension, fractal variance,
//            approximate, sample, Shannon, bit and ideal entropy
//   string   "<time label>\t<series name>"
//   (f64 timestamp, f64 value) per sample
//
// Strings are UTF-8 prefixed with their byte length as a 7-bit varint.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::NaiveDateTime;

use super::{ExportSettings, SeriesExport};
use crate::analysis::Results;

/// OLE automation date of 1970-01-01T00:00:00
const OA_UNIX_EPOCH: f64 = 25_569.0;
const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Days since 1899-12-30 as a fractional `f64`
pub fn to_oa_date(timestamp: NaiveDateTime) -> f64 {
    OA_UNIX_EPOCH + timestamp.and_utc().timestamp_millis() as f64 / MILLISECONDS_PER_DAY
}

/// Write the binary layout
pub fn write_binary<W: Write>(
    out: &mut W,
    results: &Results,
    series: &SeriesExport<'_>,
    settings: &ExportSettings,
) -> io::Result<()> {
    let elapsed = series.elapsed()?;
    let stats = &results.statistics;
    let desc = &results.descriptors;

    write_string(out, &settings.culture_line())?;
    out.write_f64::<LittleEndian>(to_oa_date(series.start_time()?))?;
    out.write_f64::<LittleEndian>(to_oa_date(series.end_time()?))?;
    for component in [
        elapsed.days,
        elapsed.hours,
        elapsed.minutes,
        elapsed.seconds,
        elapsed.milliseconds,
    ] {
        out.write_i32::<LittleEndian>(component)?;
    }
    out.write_i32::<LittleEndian>(1)?;
    out.write_i32::<LittleEndian>(checked_i32(series.data.len())?)?;
    out.write_f64::<LittleEndian>(series.sample_frequency)?;
    for value in [
        stats.average,
        stats.maximum,
        stats.minimum,
        desc.fractal_dimension,
        desc.fractal_variance,
        desc.approximate_entropy,
        desc.sample_entropy,
        desc.shannon_entropy,
        desc.entropy_bit,
        desc.ideal_entropy,
    ] {
        out.write_f64::<LittleEndian>(value)?;
    }
    write_string(
        out,
        &format!("{}\t{}", settings.labels.time, series.series_name),
    )?;

    for (index, &value) in series.data.iter().enumerate() {
        out.write_f64::<LittleEndian>(to_oa_date(series.timestamp(index)?))?;
        out.write_f64::<LittleEndian>(value)?;
    }

    Ok(())
}

/// Length-prefixed UTF-8 string
fn write_string<W: Write>(out: &mut W, value: &str) -> io::Result<()> {
    let bytes = value.as_bytes();
    let mut length = bytes.len();
    while length >= 0x80 {
        out.write_u8((length as u8 & 0x7f) | 0x80)?;
        length >>= 7;
    }
    out.write_u8(length as u8)?;
    out.write_all(bytes)
}

fn checked_i32(value: usize) -> io::Result<i32> {
    i32::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not fit the 32-bit sample count field", value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_oa_date_reference_points() {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(to_oa_date(epoch), 0.0);

        let noon = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(to_oa_date(noon), 25_569.5);
    }

    #[test]
    fn test_string_length_prefix() {
        let mut short = Vec::new();
        write_string(&mut short, "abc").unwrap();
        assert_eq!(short, vec![3, b'a', b'b', b'c']);

        let long = "x".repeat(200);
        let mut out = Vec::new();
        write_string(&mut out, &long).unwrap();
        // 200 = 0b1_1001000 -> 0xC8, 0x01
        assert_eq!(&out[..2], &[0xC8, 0x01]);
        assert_eq!(out.len(), 202);
    }
}
