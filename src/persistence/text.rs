// Text layouts: labelled series, compact "sig", and results table

use std::io::{self, Write};

use super::{ExportSettings, SeriesExport};
use crate::analysis::Results;

/// Fractional digits of the results spectrum table
const SPECTRUM_DECIMALS: usize = 8;

/// Write the labelled text layout
///
/// Header lines in fixed order, a blank line, a `Time\t<series>` line, then
/// one `timestamp\tvalue` row per sample.
pub fn write_text<W: Write>(
    out: &mut W,
    results: &Results,
    series: &SeriesExport<'_>,
    settings: &ExportSettings,
) -> io::Result<()> {
    let labels = &settings.labels;
    let elapsed = series.elapsed()?;

    writeln!(out, "{}", settings.culture_line())?;
    writeln!(
        out,
        "{}: {}",
        labels.start_time,
        settings.format_timestamp(series.start_time()?)?
    )?;
    writeln!(
        out,
        "{}: {}",
        labels.end_time,
        settings.format_timestamp(series.end_time()?)?
    )?;
    writeln!(
        out,
        "{}: {} {}, {} {}, {} {}, {} {} {} {} {}",
        labels.total_time,
        elapsed.days,
        labels.days,
        elapsed.hours,
        labels.hours,
        elapsed.minutes,
        labels.minutes,
        elapsed.seconds,
        labels.seconds,
        labels.and,
        elapsed.milliseconds,
        labels.milliseconds
    )?;
    writeln!(out, "{}: 1", labels.series_count)?;
    writeln!(out, "{}: {}", labels.sample_count, series.data.len())?;
    writeln!(
        out,
        "{}: {}",
        labels.sample_frequency,
        settings.format_number(series.sample_frequency)
    )?;
    write_scalar_lines(out, results, settings)?;
    writeln!(out)?;
    writeln!(out, "{}\t{}", labels.time, series.series_name)?;

    for (index, &value) in series.data.iter().enumerate() {
        writeln!(
            out,
            "{}\t{}",
            settings.format_timestamp(series.timestamp(index)?)?,
            settings.format_data(value)
        )?;
    }

    Ok(())
}

/// Write the compact "sig" layout: short header, series name, raw values
pub fn write_sig<W: Write>(
    out: &mut W,
    series: &SeriesExport<'_>,
    settings: &ExportSettings,
) -> io::Result<()> {
    let labels = &settings.labels;

    writeln!(out, "{}", settings.culture_line())?;
    writeln!(out, "{}: 1", labels.series_count)?;
    writeln!(out, "{}: {}", labels.sample_count, series.data.len())?;
    writeln!(
        out,
        "{}: {}",
        labels.sample_frequency,
        settings.format_number(series.sample_frequency)
    )?;
    writeln!(out)?;
    writeln!(out, "{}", series.series_name)?;

    for &value in series.data {
        writeln!(out, "{}", settings.format_data(value))?;
    }

    Ok(())
}

/// Write the results file: summary block, blank line, spectrum table
pub fn write_results<W: Write>(
    out: &mut W,
    results: &Results,
    settings: &ExportSettings,
) -> io::Result<()> {
    let labels = &settings.labels;

    writeln!(out, "{}", settings.culture_line())?;
    writeln!(out, "{}: {}", labels.sample_count, results.sample_count)?;
    writeln!(
        out,
        "{}: {}",
        labels.sample_frequency,
        settings.format_number(results.sample_frequency)
    )?;
    write_scalar_lines(out, results, settings)?;
    writeln!(out)?;
    writeln!(
        out,
        "{}\t{}\t{}",
        labels.frequency, labels.magnitude, labels.power
    )?;

    for (frequency, magnitude, power) in results.spectrum.bins() {
        writeln!(
            out,
            "{}\t{}\t{}",
            settings.format_fixed(frequency, SPECTRUM_DECIMALS),
            settings.format_fixed(magnitude, SPECTRUM_DECIMALS),
            settings.format_fixed(power, SPECTRUM_DECIMALS)
        )?;
    }

    Ok(())
}

/// `Label: value` lines for the statistics and descriptors, in file order
fn write_scalar_lines<W: Write>(
    out: &mut W,
    results: &Results,
    settings: &ExportSettings,
) -> io::Result<()> {
    let labels = &settings.labels;
    let stats = &results.statistics;
    let desc = &results.descriptors;

    let lines = [
        (&labels.average, stats.average),
        (&labels.maximum, stats.maximum),
        (&labels.minimum, stats.minimum),
        (&labels.fractal_dimension, desc.fractal_dimension),
        (&labels.fractal_variance, desc.fractal_variance),
        (&labels.approximate_entropy, desc.approximate_entropy),
        (&labels.sample_entropy, desc.sample_entropy),
        (&labels.shannon_entropy, desc.shannon_entropy),
        (&labels.entropy_bit, desc.entropy_bit),
        (&labels.ideal_entropy, desc.ideal_entropy),
    ];
    for (label, value) in lines {
        writeln!(out, "{}: {}", label, settings.format_number(value))?;
    }

    Ok(())
}
