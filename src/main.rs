//! Nick Forge - randomized Minecraft username generation
//!
//! Generates disguised usernames from seed strings and makes sure each one is
//! free in the Minecraft profile registry.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use nick_forge::{
    generator::NameGenerator,
    seed::{FixedSeed, PunishmentPageSource, SeedSource, FALLBACK_SEED},
    types::{CheckConfig, DispatchMode, GeneratedName, GeneratorConfig, SeedConfig},
    username::{ExistenceChecker, MojangChecker, OfflineChecker},
    NickForgeError, Result,
};
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

/// Parsed command line
#[derive(Debug, Default)]
struct CliOptions {
    seeds: Vec<String>,
    count: usize,
    min_length: Option<usize>,
    cascade: bool,
    offline: bool,
    output: Option<PathBuf>,
    rng_seed: Option<u64>,
    help: bool,
}

impl CliOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = CliOptions {
            count: 1,
            ..Default::default()
        };
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "-n" | "--count" => options.count = parse_value(arg, iter.next())?,
                "-m" | "--min-length" => options.min_length = Some(parse_value(arg, iter.next())?),
                "--seed-rng" => options.rng_seed = Some(parse_value(arg, iter.next())?),
                "-o" | "--output" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| NickForgeError::cli(format!("{} needs a path", arg)))?;
                    options.output = Some(PathBuf::from(path));
                }
                "--cascade" => options.cascade = true,
                "--offline" => options.offline = true,
                "--" => options.seeds.extend(iter.by_ref().cloned()),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(NickForgeError::cli(format!("Unknown option: {}", flag)));
                }
                seed => options.seeds.push(seed.to_string()),
            }
        }

        if options.count == 0 {
            return Err(NickForgeError::cli("--count must be at least 1"));
        }

        Ok(options)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    value
        .ok_or_else(|| NickForgeError::cli(format!("{} needs a value", flag)))?
        .parse()
        .map_err(|_| NickForgeError::cli(format!("Invalid value for {}", flag)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the library
    if let Err(e) = nick_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("⚠️  Logging disabled: {}", e);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match CliOptions::parse(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };

    if options.help {
        print_help();
        return Ok(());
    }

    let generated = match run_nick_forge(&options).await {
        Ok(generated) => generated,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    };

    if let Some(path) = &options.output {
        let json = serde_json::to_string_pretty(&generated)
            .context("failed to serialize generated usernames")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if generated.is_empty() {
        process::exit(1);
    }

    Ok(())
}

/// Main generation workflow
async fn run_nick_forge(options: &CliOptions) -> Result<Vec<GeneratedName>> {
    let mut config = GeneratorConfig::from_env()?;
    if let Some(min_length) = options.min_length {
        config.min_length = min_length;
    }
    if options.cascade {
        config.dispatch = DispatchMode::Cascade;
    }
    config.validate()?;

    let check_config = CheckConfig::from_env()?;
    let checker: Arc<dyn ExistenceChecker> = if options.offline {
        Arc::new(OfflineChecker)
    } else {
        Arc::new(MojangChecker::with_config(&check_config))
    };

    let mut generator = NameGenerator::with_check_config(config, &check_config, checker)?;
    if let Some(seed) = options.rng_seed {
        generator = generator.with_seed(seed);
    }

    tracing::info!(
        min_length = generator.config().min_length,
        dispatch = %generator.config().dispatch,
        offline = options.offline,
        count = options.count,
        "Starting username generation"
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Forging {} username(s)...", options.count));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let results = if options.seeds.is_empty() {
        let source: Box<dyn SeedSource> = if options.offline {
            Box::new(FixedSeed::new(FALLBACK_SEED))
        } else {
            let source = PunishmentPageSource::with_config(SeedConfig::from_env()?);
            match options.rng_seed {
                Some(seed) => Box::new(source.with_seed(seed)),
                None => Box::new(source),
            }
        };
        let mut results = Vec::with_capacity(options.count);
        for _ in 0..options.count {
            results.push(generator.generate_from_source(source.as_ref()).await);
        }
        results
    } else {
        let seeds: Vec<String> = options
            .seeds
            .iter()
            .cycle()
            .take(options.count.max(options.seeds.len()))
            .cloned()
            .collect();
        generator.bulk_generate(&seeds).await
    };

    spinner.finish_and_clear();

    let mut generated = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(name) => {
                println!("{}", name);
                generated.push(name);
            }
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }

    let metrics = generator.get_metrics_snapshot();
    eprintln!(
        "📈 {} generated, {} existence checks ({:.1} per name), {} repairs, {} failed",
        metrics.names_generated,
        metrics.existence_checks,
        metrics.checks_per_name(),
        metrics.repairs,
        metrics.convergence_failures,
    );
    if metrics.seed_fallbacks > 0 {
        eprintln!("⚠️  Seed source failed {} time(s); used '{}'", metrics.seed_fallbacks, FALLBACK_SEED);
    }

    Ok(generated)
}

/// Print help information
fn print_help() {
    println!("🔨 Nick Forge - randomized Minecraft username generation");
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    nick-forge [OPTIONS] [SEED...]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --count N         Generate N usernames (default: 1)");
    println!("    -m, --min-length N    Minimum username length, 1-15 (default: 4)");
    println!("        --cascade         Apply every transform after the drawn one");
    println!("        --offline         Skip the registry check and the seed page");
    println!("    -o, --output PATH     Also write results as JSON");
    println!("        --seed-rng N      Seed the random generator for repeatable output");
    println!("    -h, --help            Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    nick-forge                       # Seed from the punishment log");
    println!("    nick-forge CreeperNoob           # Disguise a given name");
    println!("    nick-forge -n 5 --offline Steve  # Five variants without network");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    NICK_FORGE_MIN_LENGTH          Minimum username length");
    println!("    NICK_FORGE_DISPATCH            single | cascade");
    println!("    NICK_FORGE_MAX_REPAIRS         Repair passes before giving up (default: 64)");
    println!("    NICK_FORGE_CHECK_TIMEOUT_SECS  Registry lookup timeout (default: 10)");
    println!("    NICK_FORGE_ON_CHECK_FAILURE    taken | available (default: taken)");
    println!("    NICK_FORGE_PROFILE_URL         Profile lookup endpoint");
    println!("    NICK_FORGE_SEED_URL            Punishment log page prefix");
    println!("    RUST_LOG                       Log filter, e.g. nick_forge=debug");
}
