use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use lineprep_core::models::{EnhancementPlan, EnhancementStep, Style};

#[derive(Parser)]
#[command(name = "lineprep")]
#[command(version, about = "Photo quality analysis and enhancement for line-art generation", long_about = None)]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze image quality and characteristics
    Analyze {
        /// Input image file
        input: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze an image and conditionally enhance it
    Enhance {
        /// Input image file
        input: PathBuf,

        /// Path to save the enhanced image
        output: PathBuf,

        /// Line-art style: "contour" or "anime"
        #[arg(long, value_name = "STYLE", default_value = "contour")]
        style: String,

        /// Force gamma correction with this value (overrides auto)
        #[arg(long, value_name = "FLOAT")]
        force_gamma: Option<f32>,

        /// Force CLAHE enhancement
        #[arg(long)]
        force_clahe: bool,

        /// Force rescaling into the target dimension range
        #[arg(long)]
        force_resize: bool,

        /// Run analysis only and save the image unchanged
        #[arg(long)]
        skip_enhancement: bool,
    },

    /// Batch enhance multiple files with shared settings
    Batch {
        /// Input files
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Line-art style: "contour" or "anime"
        #[arg(long, value_name = "STYLE", default_value = "contour")]
        style: String,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    lineprep_core::config::set_verbose(cli.verbose);

    let result = match cli.command {
        Commands::Analyze { input, json } => cmd_analyze(input, json),

        Commands::Enhance {
            input,
            output,
            style,
            force_gamma,
            force_clahe,
            force_resize,
            skip_enhancement,
        } => cmd_enhance(
            input,
            output,
            style,
            force_gamma,
            force_clahe,
            force_resize,
            skip_enhancement,
        ),

        Commands::Batch {
            inputs,
            out,
            style,
            threads,
        } => cmd_batch(inputs, out, style, threads),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_analyze(input: PathBuf, json: bool) -> Result<(), String> {
    lineprep_core::config::log_config_usage();

    let decoded = lineprep_core::decoders::decode_image(&input)?;
    let defaults = &lineprep_core::config::config_handle().config.defaults;

    let report = lineprep_core::analysis::analyze_image(&decoded, defaults);

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", output);
        return Ok(());
    }

    println!("Analysis of {}:", input.display());
    println!(
        "  Resolution: {}x{}",
        report.resolution.width, report.resolution.height
    );
    println!("  Brightness: {:.2}", report.luminance.global_mean);
    println!(
        "  Lighting cells: {} dark, {} bright",
        report.luminance.dark_cells, report.luminance.bright_cells
    );
    println!("  Contrast (std dev): {:.2}", report.contrast.std_dev);
    println!(
        "  Blur: hf energy {:.2}, blurry block ratio {:.3}",
        report.blur.fft_high_freq, report.blur.blur_ratio
    );

    if report.has_warnings {
        println!("\nWarnings detected:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    } else {
        println!("\nNo warnings; image quality is acceptable.");
    }

    Ok(())
}

fn cmd_enhance(
    input: PathBuf,
    output: PathBuf,
    style: String,
    force_gamma: Option<f32>,
    force_clahe: bool,
    force_resize: bool,
    skip_enhancement: bool,
) -> Result<(), String> {
    lineprep_core::config::log_config_usage();

    let style: Style = style.parse()?;

    println!("Analyzing {}...", input.display());
    let decoded = lineprep_core::decoders::decode_image(&input)?;
    let defaults = &lineprep_core::config::config_handle().config.defaults;

    let forced = force_gamma.is_some() || force_clahe || force_resize;

    let (image, report, applied) = if forced {
        // Manual mode: build the plan from the force flags. Steps are
        // listed in the applier's fixed order for readable output.
        let report = lineprep_core::analysis::analyze_image(&decoded, defaults);

        let mut steps = Vec::new();
        if force_resize {
            steps.push(EnhancementStep::Resize);
        }
        if let Some(gamma) = force_gamma {
            steps.push(EnhancementStep::GammaCorrection { gamma });
        }
        if force_clahe {
            steps.push(EnhancementStep::Clahe);
        }
        let plan = EnhancementPlan { steps };

        let image = lineprep_core::enhance::apply_enhancements(&decoded.color, &plan, defaults);
        (image, report, plan.step_names())
    } else {
        let prepared =
            lineprep_core::pipeline::prepare_image(&decoded, style, skip_enhancement, defaults);
        (prepared.image, prepared.report, prepared.applied)
    };

    if report.has_warnings {
        println!("\nWarnings detected:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    println!(
        "\nApplied enhancements ({}):",
        if forced { "manual" } else { "automatic" }
    );
    if applied.is_empty() {
        println!("  - None (image quality is acceptable)");
    } else {
        for step in &applied {
            println!("  - {}", step);
        }
    }

    image
        .save(&output)
        .map_err(|e| format!("Failed to save {}: {}", output.display(), e))?;
    println!("\nSaved enhanced image to: {}", output.display());

    Ok(())
}

fn cmd_batch(
    inputs: Vec<PathBuf>,
    out: Option<PathBuf>,
    style: String,
    threads: Option<usize>,
) -> Result<(), String> {
    lineprep_core::config::log_config_usage();

    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let style: Style = style.parse()?;

    // Configure thread pool if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    let output_dir = out.unwrap_or_else(|| PathBuf::from("."));
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;
    }

    let defaults = &lineprep_core::config::config_handle().config.defaults;

    println!("\nProcessing {} files in parallel...\n", inputs.len());

    let processed_count = AtomicUsize::new(0);
    let total_files = inputs.len();

    let results: Vec<Result<PathBuf, String>> = inputs
        .par_iter()
        .map(|input| {
            let decoded = lineprep_core::decoders::decode_image(input)?;
            let prepared = lineprep_core::pipeline::prepare_image(&decoded, style, false, defaults);

            let output_path = batch_output_path(input, &output_dir)?;
            prepared
                .image
                .save(&output_path)
                .map_err(|e| format!("Failed to save {}: {}", output_path.display(), e))?;

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] Processed: {} -> {} ({})",
                count,
                total_files,
                input.display(),
                output_path.display(),
                if prepared.applied.is_empty() {
                    "no changes".to_string()
                } else {
                    prepared.applied.join(", ")
                }
            );

            Ok(output_path)
        })
        .collect();

    let mut success_count = 0;
    let mut errors: Vec<(PathBuf, String)> = Vec::new();

    for (input, result) in inputs.iter().zip(results.iter()) {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => errors.push((input.clone(), e.clone())),
        }
    }

    println!("\n========================================");
    println!("BATCH PROCESSING COMPLETE");
    println!("========================================");
    println!("  Successful: {}", success_count);
    println!("  Failed:     {}", errors.len());
    println!("  Output dir: {}", output_dir.display());

    if !errors.is_empty() {
        println!("\nErrors:");
        for (path, error) in &errors {
            println!("  {}: {}", path.display(), error);
        }
        return Err(format!("{} files failed to process", errors.len()));
    }

    Ok(())
}

/// Output path for one batch input: `<out_dir>/<stem>_enhanced.png`
fn batch_output_path(input: &Path, output_dir: &Path) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Invalid input file name: {}", input.display()))?;
    Ok(output_dir.join(format!("{}_enhanced.png", stem)))
}
