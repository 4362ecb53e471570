use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use xol_configurator::config::{snapshot, Configuration};
use xol_configurator::manifest::{audit_assets, default_manifest, load_manifest, Manifest};
use xol_configurator::packager::{bundle, AssetCache, AssetFetcher};
use xol_configurator::resolver::{printable_parts, resolve, Resolution};

#[derive(Parser)]
#[command(name = "xolconf", version, about = "Part configurator for the Xol toolhead")]
struct Cli {
    /// Path to a custom part manifest (defaults to the embedded one).
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConfigArgs {
    /// Start from a shared snapshot instead of the defaults.
    #[arg(long)]
    snapshot: Option<String>,

    #[arg(long)]
    carriage: Option<String>,

    #[arg(long)]
    hotend: Option<String>,

    #[arg(long)]
    extruder: Option<String>,

    #[arg(long = "board")]
    toolhead_board: Option<String>,

    #[arg(long = "cutter")]
    filament_cutter: Option<String>,

    /// Multi-colour hexagon cowling files (.3mf).
    #[arg(long)]
    hex: bool,

    /// Include the optional accent parts in the download list.
    #[arg(long)]
    accents: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved parts, warnings, and disabled options.
    Show(ConfigArgs),
    /// List the output file manifest.
    Files(ConfigArgs),
    /// Fetch the resolved files and assemble a download bundle.
    Bundle {
        #[command(flatten)]
        config: ConfigArgs,
        /// Asset root: an http(s) URL or a local directory.
        #[arg(long)]
        assets: String,
        /// Bundle destination (defaults to ./xol-toolhead under Downloads).
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Print the shareable snapshot string for a configuration.
    Encode(ConfigArgs),
    /// Decode a snapshot string and print the configuration.
    Decode { snapshot: String },
    /// Validate a manifest, optionally auditing a local asset directory.
    Validate {
        /// Asset directory to sweep for missing and orphaned meshes.
        #[arg(long)]
        assets_dir: Option<PathBuf>,
    },
}

fn load(cli_manifest: &Option<PathBuf>) -> Result<Manifest> {
    match cli_manifest {
        Some(path) => {
            load_manifest(path).with_context(|| format!("Failed to load manifest {:?}", path))
        }
        None => Ok(default_manifest()),
    }
}

fn build_config(manifest: &Manifest, args: &ConfigArgs) -> Result<Configuration> {
    let mut config = match &args.snapshot {
        Some(encoded) => snapshot::decode(manifest, encoded)
            .context("Snapshot could not be decoded; check the shared link")?,
        None => Configuration::defaults(manifest),
    };

    let selections = [
        ("carriage", &args.carriage),
        ("hotend", &args.hotend),
        ("extruder", &args.extruder),
        ("toolhead_board", &args.toolhead_board),
        ("filament_cutter", &args.filament_cutter),
    ];
    for (axis, selection) in selections {
        if let Some(option) = selection {
            config
                .select(manifest, axis, option)
                .map_err(|e| anyhow!(e))?;
        }
    }
    if args.hex {
        config.hex_multicolour = true;
    }
    if args.accents {
        config.accent_parts = true;
    }
    Ok(config)
}

fn print_resolution(manifest: &Manifest, config: &Configuration, resolution: &Resolution) {
    for domain in &manifest.options {
        if let Some(value) = config.get(&domain.id) {
            println!("{}: {}", domain.label, value);
        }
    }
    println!(
        "Hexagon multi-colour: {}   Accent parts: {}",
        config.hex_multicolour, config.accent_parts
    );

    for warning in &resolution.warnings {
        println!("warning: {}", warning);
    }
    if !resolution.disabled.is_empty() {
        let listing: Vec<String> = resolution
            .disabled
            .iter()
            .map(|d| format!("{}:{}", d.axis, d.option))
            .collect();
        println!("disabled: {}", listing.join(", "));
    }

    println!();
    let mut current_category = "";
    for part in resolution.parts.iter() {
        if part.category != current_category {
            println!("{}", part.category_label);
            current_category = &part.category;
        }
        let mut line = format!("  {}x {}", part.variant.quantity, part.variant.id);
        if part.variant.visual_only {
            line.push_str(" (display only)");
        }
        if let Some(note) = &part.variant.note {
            line.push_str(&format!(" - {}", note));
        }
        println!("{}", line);
    }
}

fn parts_list(resolution: &Resolution) -> String {
    let mut lines = Vec::new();
    for part in printable_parts(&resolution.parts) {
        let mut line = format!("{}x {}", part.variant.quantity, part.variant.id);
        if let Some(note) = &part.variant.note {
            line.push_str(&format!(" ({})", note));
        }
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let manifest = load(&cli.manifest)?;

    match &cli.command {
        Command::Show(args) => {
            let config = build_config(&manifest, args)?;
            let resolution = resolve(&manifest, &config);
            print_resolution(&manifest, &config, &resolution);
        }
        Command::Files(args) => {
            let config = build_config(&manifest, args)?;
            let resolution = resolve(&manifest, &config);
            for file in &resolution.files {
                println!("{}  [{}]", file.path, file.format.extension());
            }
        }
        Command::Bundle { config, assets, dest } => {
            let config = build_config(&manifest, config)?;
            let resolution = resolve(&manifest, &config);
            for warning in &resolution.warnings {
                warn!("{}", warning);
            }

            let dest = dest.clone().unwrap_or_else(|| {
                dirs::download_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("xol-toolhead")
            });
            let fetcher = AssetFetcher::new(assets).map_err(|e| anyhow!(e))?;
            let mut cache = AssetCache::new();
            let report = bundle(&fetcher, &resolution.files, &dest, &mut cache).await?;

            std::fs::write(report.dest.join("parts list.txt"), parts_list(&resolution))
                .context("Failed to write the parts list")?;

            println!(
                "Bundled {} of {} files into {}",
                report.written.len(),
                resolution.files.len(),
                report.dest.display()
            );
            if !report.is_complete() {
                println!("Failed to fetch:");
                for failure in &report.failed {
                    println!("  {} ({})", failure.path, failure.reason);
                }
            }
        }
        Command::Encode(args) => {
            let config = build_config(&manifest, args)?;
            println!("{}", snapshot::encode(&manifest, &config));
        }
        Command::Decode { snapshot: encoded } => {
            let config = snapshot::decode(&manifest, encoded)
                .context("Snapshot could not be decoded; check the shared link")?;
            for domain in &manifest.options {
                if let Some(value) = config.get(&domain.id) {
                    println!("{}: {}", domain.id, value);
                }
            }
            println!("hex_multicolour: {}", config.hex_multicolour);
            println!("accent_parts: {}", config.accent_parts);
        }
        Command::Validate { assets_dir } => {
            // `load` already ran the integrity checks; getting here means
            // the manifest itself is sound.
            println!(
                "Manifest OK: {} axes, {} categories, {} variants",
                manifest.options.len(),
                manifest.categories.len(),
                manifest
                    .categories
                    .iter()
                    .map(|c| c.variants.len())
                    .sum::<usize>()
            );
            if let Some(dir) = assets_dir {
                let audit = audit_assets(&manifest, dir);
                for path in &audit.missing {
                    println!("missing: {}", path);
                }
                for path in &audit.orphaned {
                    println!("orphaned: {}", path);
                }
                if !audit.is_clean() {
                    std::process::exit(1);
                }
                println!("Assets OK");
            }
        }
    }

    Ok(())
}
