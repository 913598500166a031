//! An executable that fabricates a dynamically refined AMR dataset, one VTK file per timestep,
//! for exercising visualization pipelines.

use amrgen::prelude::*;
use amrgen_app::{file, progress};
use clap::{ArgMatches, Command, arg, value_parser};
use console::style;
use datasize::DataSize;
use eyre::Context as _;
use indicatif::{HumanBytes, HumanDuration, MultiProgress, ProgressBar};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod config;
mod history;

use config::Config;
use history::{RunHistory, RunRecord};

fn main() -> eyre::Result<()> {
    // Set up nice error handing.
    color_eyre::install()?;
    // Specify cli argument parsing.
    let command = Command::new("dynamic_amr")
        .about("Writes a synthetic, randomly refined AMR dataset in VTK format")
        .version("0.1.0")
        .config_args();
    let matches = command.get_matches();

    let level = match matches.get_count("verbose") {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder().filter_level(level).init();

    // Load configuration
    let config = parse_config(&matches)?;
    config.validate()?;

    run(&config)
}

fn run(config: &Config) -> eyre::Result<()> {
    let start = Instant::now();
    // Ensure output directory exists.
    let output = config.output_dir()?;
    std::fs::create_dir_all(&output)?;
    // Save the effective configuration next to the data.
    file::export_toml(&output.join("config.toml"), config)
        .context("failed to save run configuration")?;

    // Basic info dumping
    log::info!("Run: {}", style(&config.name).green());
    log::info!("Output Directory: {}", style(output.display()).green());
    log::info!(
        "Seed: {}, Timesteps: {}, Max Level: {}",
        config.run.seed,
        config.run.timesteps,
        config.run.max_level
    );

    let mut history = if config.visualize.history {
        RunHistory::output(&output.join("history.csv"))?
    } else {
        RunHistory::empty()
    };

    let export = ExportAmrConfig {
        kind: config.visualize.kind,
        ..Default::default()
    };

    let hierarchy = Hierarchy::new(config.domain.spacing, config.domain.origin);
    let mut driver = Driver::seeded(hierarchy, config.driver_params(), config.run.seed);

    // Initial state
    let name = write_dataset(&output, config, 0, driver.hierarchy(), &export)?;
    history.write_record(RunRecord::initial(driver.hierarchy(), name))?;

    // Create progress bars
    let m = MultiProgress::new();
    let step_pb = m.add(ProgressBar::new(config.run.timesteps as u64));
    step_pb.set_style(progress::run_style());
    step_pb.set_prefix("[Step] ");
    let level_pb = m.add(ProgressBar::new(config.run.max_level as u64));
    level_pb.set_style(progress::level_style());
    level_pb.set_prefix("[Level]");

    let mut deepest = 0;

    for _ in 0..config.run.timesteps {
        let report = driver.step();
        driver.hierarchy().validate(config.run.max_level)?;

        log::info!(
            "Timestep {}: {}, number of levels: {}",
            report.timestep,
            report.action,
            report.patches
        );

        let name = write_dataset(
            &output,
            config,
            report.timestep + 1,
            driver.hierarchy(),
            &export,
        )?;
        history.write_record(RunRecord::from_report(&report, name))?;

        deepest = deepest.max(report.depth);

        level_pb.set_position(report.depth as u64);
        step_pb.inc(1);
        step_pb.set_message(format!("Levels: {}", report.patches));
    }

    m.clear()?;
    history.flush()?;

    println!(
        "Finished {} timesteps in {}",
        config.run.timesteps,
        HumanDuration(start.elapsed())
    );
    println!("Hierarchy Info...");
    println!("- Final Levels: {}", driver.hierarchy().num_levels());
    println!("- Deepest Level: {}", deepest);
    println!(
        "- RAM usage: ~{}",
        HumanBytes(driver.hierarchy().estimate_heap_size() as u64)
    );

    Ok(())
}

/// Writes the `index`th dataset of the series, returning its file name.
fn write_dataset(
    output: &Path,
    config: &Config,
    index: usize,
    hierarchy: &Hierarchy<2>,
    export: &ExportAmrConfig,
) -> eyre::Result<String> {
    let path = file::numbered(output, &config.visualize.prefix, index, "vthb");

    let summary = export_vthb(&hierarchy.snapshot(), &path, export)
        .with_context(|| format!("failed to write dataset {}", path.display()))?;

    log::debug!(
        "Wrote {} ({} blocks)",
        summary.index.display(),
        summary.blocks.len()
    );

    Ok(path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default())
}

// ******************************
// Helpers **********************
// ******************************

fn parse_config(matches: &ArgMatches) -> eyre::Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let path = file::abs_or_relative(path)?;
            file::import_toml::<Config>(&path)
                .with_context(|| format!("failed to parse config file: {:?}", path))?
        }
        None => Config::default(),
    };

    if let Some(directory) = matches.get_one::<PathBuf>("output") {
        config.directory = directory.display().to_string();
    }

    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.run.seed = seed;
    }

    if let Some(&timesteps) = matches.get_one::<usize>("timesteps") {
        config.run.timesteps = timesteps;
    }

    Ok(config)
}

/// Extension trait for defining helper methods on `clap::Command`.
trait CommandExt {
    fn config_args(self) -> Self;
}

impl CommandExt for Command {
    fn config_args(self) -> Self {
        self.arg(
            arg!(-c --config <FILE> "Sets a custom config file")
                .required(false)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-o --output <DIR> "Overrides the output directory")
                .required(false)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-s --seed <INT> "Overrides the seed of the random walk")
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(-n --timesteps <INT> "Overrides the number of timesteps")
                .required(false)
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(-v --verbose ... "Increases logging verbosity"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides() {
        let command = Command::new("dynamic_amr").config_args();
        let matches = command
            .try_get_matches_from(["dynamic_amr", "-o", "runs/a", "-s", "9", "-n", "3", "-vv"])
            .unwrap();

        assert_eq!(matches.get_count("verbose"), 2);

        let config = parse_config(&matches).unwrap();
        assert_eq!(config.directory, "runs/a");
        assert_eq!(config.run.seed, 9);
        assert_eq!(config.run.timesteps, 3);
        assert_eq!(config.run.max_level, 5);
    }

    #[test]
    fn full_run() {
        let dir = std::env::temp_dir().join(format!("dynamic-amr-run-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut config = Config::default();
        config.directory = dir.display().to_string();
        config.run.timesteps = 6;
        config.visualize.kind = AmrKind::Overlapping;

        run(&config).unwrap();

        for index in 0..=6 {
            assert!(dir.join(format!("amr_{index}.vthb")).exists());
            let blocks = dir.join(format!("amr_{index}"));
            assert!(blocks.join(format!("amr_{index}_0_0.vti")).exists());
        }
        assert!(!dir.join("amr_7.vthb").exists());
        assert!(dir.join("config.toml").exists());

        let mut reader = csv::Reader::from_path(dir.join("history.csv")).unwrap();
        let records: Vec<RunRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 7);

        // The history must replay the same walk as a fresh driver.
        let mut driver = Driver::seeded(
            Hierarchy::new([1.0, 1.0], [0.0, 0.0]),
            config.driver_params(),
            config.run.seed,
        );
        for record in &records[1..] {
            let report = driver.step();
            assert_eq!(record.depth, report.depth);
            assert_eq!(record.patches, report.patches);
            assert_eq!(record.action, report.action.name());
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
