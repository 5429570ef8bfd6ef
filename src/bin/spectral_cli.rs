use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use spectral_prep::error::{log_analysis_error, log_window_error};
use spectral_prep::persistence::{save_results, save_series, SaveFormat, SaveOutcome, SeriesExport};
use spectral_prep::window::{self, ShapeParameter, WindowKind, WindowSpec};
use spectral_prep::{AppConfig, ExportSettings, SignalAnalyzer, Statistics};

#[derive(Parser, Debug)]
#[command(
    name = "spectral_cli",
    about = "Window functions and spectrum pre-processing for sampled signals"
)]
struct Cli {
    /// JSON configuration file (defaults to assets/spectral_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every window kind with its description and shape parameter
    List,
    /// Print the coefficients of one window as JSON
    Window {
        #[arg(long)]
        kind: WindowKind,
        #[arg(long)]
        size: usize,
        #[arg(long)]
        normalize: bool,
        #[arg(long)]
        parameter: Option<f64>,
    },
    /// Window a signal, compute its spectrum and optionally save it
    Analyze {
        /// WAV file, or a text file with one value per line
        #[arg(long, conflicts_with = "synthetic", required_unless_present = "synthetic")]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        synthetic: Option<Synthetic>,
        /// Sampling frequency in Hz (WAV files carry their own)
        #[arg(long)]
        sample_rate: Option<f64>,
        /// Length of a synthetic signal
        #[arg(long, default_value_t = 1024)]
        samples: usize,
        /// Frequency of the synthetic sine in Hz
        #[arg(long, default_value_t = 50.0)]
        frequency: f64,
        /// Seed for the synthetic noise
        #[arg(long)]
        seed: Option<u64>,
        /// Window kind (overrides the configured window)
        #[arg(long)]
        kind: Option<WindowKind>,
        /// Normalize the window, whether given by --kind or by the config
        #[arg(long)]
        normalize: bool,
        /// Shape parameter, applied to the --kind or configured window
        #[arg(long)]
        parameter: Option<f64>,
        /// Analyze the raw segment without a window
        #[arg(long, conflicts_with_all = ["kind", "normalize", "parameter"])]
        raw: bool,
        /// Series file; the layout follows the extension (.txt, .sig, .bin)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Results file with the summary and the spectrum table
        #[arg(long)]
        results: Option<PathBuf>,
        #[arg(long, default_value = "Signal")]
        series_name: String,
        /// Culture tag for exported files (overrides the configured culture)
        #[arg(long)]
        culture: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Synthetic {
    Sine,
    Noise,
}

const DEFAULT_SAMPLE_RATE: f64 = 1_000.0;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::List => run_list(),
        Commands::Window {
            kind,
            size,
            normalize,
            parameter,
        } => run_window(kind, size, normalize, parameter),
        Commands::Analyze {
            input,
            synthetic,
            sample_rate,
            samples,
            frequency,
            seed,
            kind,
            normalize,
            parameter,
            raw,
            output,
            results,
            series_name,
            culture,
        } => {
            let signal = match (input, synthetic) {
                (Some(path), _) => load_signal(&path, sample_rate)?,
                (None, Some(kind)) => synthesize(
                    kind,
                    samples,
                    sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
                    frequency,
                    seed,
                ),
                (None, None) => bail!("either --input or --synthetic is required"),
            };

            let window = if raw {
                None
            } else {
                match kind {
                    Some(kind) => Some(WindowSpec {
                        kind,
                        size: signal.samples.len(),
                        normalize,
                        parameter,
                    }),
                    None => config.window.to_spec(signal.samples.len()).map(|spec| WindowSpec {
                        normalize: spec.normalize || normalize,
                        parameter: parameter.or(spec.parameter),
                        ..spec
                    }),
                }
            };

            let mut export = config.export;
            if let Some(culture) = culture {
                export = ExportSettings {
                    labels: export.labels,
                    ..ExportSettings::for_culture(&culture)
                };
            }

            run_analyze(
                &signal,
                window.as_ref(),
                &export,
                &series_name,
                output.as_deref(),
                results.as_deref(),
            )
        }
    }
}

fn run_list() -> Result<ExitCode> {
    let entries: Vec<KindPayload> = WindowKind::ALL
        .iter()
        .map(|&kind| {
            let info = window::describe(kind);
            KindPayload {
                kind,
                name: info.name,
                description: info.description,
                shape_parameter: kind.shape_parameter(),
            }
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(ExitCode::from(0))
}

fn run_window(
    kind: WindowKind,
    size: usize,
    normalize: bool,
    parameter: Option<f64>,
) -> Result<ExitCode> {
    let spec = WindowSpec {
        kind,
        size,
        normalize,
        parameter,
    };
    let coefficients = window::create(&spec).map_err(|err| {
        log_window_error(&err, "spectral_cli window");
        anyhow!(err)
    })?;

    let payload = WindowPayload {
        spec,
        coefficients: &coefficients,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_analyze(
    signal: &Signal,
    window: Option<&WindowSpec>,
    export: &ExportSettings,
    series_name: &str,
    output: Option<&Path>,
    results_path: Option<&Path>,
) -> Result<ExitCode> {
    let analyzer = SignalAnalyzer::new();
    let results = analyzer
        .analyze(&signal.samples, signal.sample_frequency, window)
        .map_err(|err| {
            log_analysis_error(&err, "spectral_cli analyze");
            anyhow!(err)
        })
        .with_context(|| format!("analyzing {}", signal.source))?;

    let mut saves = Vec::new();
    if let Some(path) = output {
        let series = SeriesExport::new(
            series_name,
            &signal.samples,
            signal.start,
            signal.sample_frequency,
        );
        saves.push(save_series(
            path,
            SaveFormat::from_path(path),
            &results,
            &series,
            export,
        ));
    }
    if let Some(path) = results_path {
        saves.push(save_results(path, &results, export));
    }

    let report = AnalysisReport {
        source: &signal.source,
        sample_count: results.sample_count,
        sample_frequency: results.sample_frequency,
        window,
        statistics: &results.statistics,
        bins: results.spectrum.len(),
        peak_frequency: results.spectrum.peak_frequency(),
        saves: &saves,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if saves.iter().all(|outcome| outcome.success) {
        Ok(ExitCode::from(0))
    } else {
        for outcome in saves.iter().filter(|outcome| !outcome.success) {
            eprintln!("{}", outcome.message);
        }
        Ok(ExitCode::from(2))
    }
}

struct Signal {
    source: String,
    samples: Vec<f64>,
    sample_frequency: f64,
    start: NaiveDateTime,
}

fn load_signal(path: &Path, sample_rate: Option<f64>) -> Result<Signal> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    let (samples, file_rate) = if is_wav {
        let (samples, rate) = read_wav(path)?;
        (samples, Some(f64::from(rate)))
    } else {
        (read_text(path)?, None)
    };

    let sample_frequency = sample_rate.or(file_rate).unwrap_or(DEFAULT_SAMPLE_RATE);
    let start = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|modified| chrono::DateTime::<Local>::from(modified).naive_local())
        .unwrap_or_else(|_| Local::now().naive_local());

    Ok(Signal {
        source: path.display().to_string(),
        samples,
        sample_frequency,
        start,
    })
}

/// First channel of a WAV file, scaled to [-1, 1]
fn read_wav(path: &Path) -> Result<(Vec<f64>, u32)> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map(f64::from).map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<f64>>>()?,
        hound::SampleFormat::Int => {
            if !(8..=32).contains(&spec.bits_per_sample) {
                bail!(
                    "Unsupported bits per sample {} in {}",
                    spec.bits_per_sample,
                    path.display()
                );
            }
            let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f64;
            reader
                .samples::<i32>()
                .map(|sample| {
                    sample
                        .map(|value| f64::from(value) / max)
                        .map_err(|err| anyhow!(err))
                })
                .collect::<Result<Vec<f64>>>()?
        }
    };

    if channels > 1 {
        log::debug!(
            "[spectral_cli] {} has {} channels, analyzing the first",
            path.display(),
            channels
        );
    }
    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok((samples, spec.sample_rate))
}

/// One value per line; blank lines are skipped and `,` is read as a decimal point
fn read_text(path: &Path) -> Result<Vec<f64>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            line.trim()
                .replace(',', ".")
                .parse::<f64>()
                .with_context(|| format!("{}:{}: not a number", path.display(), number + 1))
        })
        .collect()
}

fn synthesize(
    kind: Synthetic,
    count: usize,
    sample_frequency: f64,
    frequency: f64,
    seed: Option<u64>,
) -> Signal {
    let samples = match kind {
        Synthetic::Sine => (0..count)
            .map(|i| (2.0 * PI * frequency * i as f64 / sample_frequency).sin())
            .collect(),
        Synthetic::Noise => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            (0..count).map(|_| rng.gen_range(-1.0..1.0)).collect()
        }
    };

    Signal {
        source: format!("synthetic {:?}", kind).to_lowercase(),
        samples,
        sample_frequency,
        start: Local::now().naive_local(),
    }
}

#[derive(Serialize)]
struct KindPayload {
    kind: WindowKind,
    name: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shape_parameter: Option<ShapeParameter>,
}

#[derive(Serialize)]
struct WindowPayload<'a> {
    #[serde(flatten)]
    spec: WindowSpec,
    coefficients: &'a [f64],
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    source: &'a str,
    sample_count: usize,
    sample_frequency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<&'a WindowSpec>,
    statistics: &'a Statistics,
    bins: usize,
    peak_frequency: Option<f64>,
    #[serde(skip_serializing_if = "slice_empty")]
    saves: &'a [SaveOutcome],
}

fn slice_empty(saves: &&[SaveOutcome]) -> bool {
    saves.is_empty()
}
