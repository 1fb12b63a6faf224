//! Predict command - score images for focus quality.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use miq_adapters::{default_weights_path, FsPatchSource};
use miq_core::{
    best_device, ImagePrediction, MiqConfig, ModelVariant, PatchSource, Predictor, ProgressEvent,
    ProgressSink, ResultOutput,
};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Model variant CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    /// Standard second convolution (id 0).
    Standard,
    /// Dilated second convolution (id 1).
    Dilated,
}

impl From<ModelArg> for ModelVariant {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Standard => Self::Standard,
            ModelArg::Dilated => Self::Dilated,
        }
    }
}

/// Parse and validate a patch width.
fn parse_patch_width(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid patch width"))?;
    if value >= 4 {
        Ok(value)
    } else {
        Err(format!("patch width must be at least 4, got {value}"))
    }
}

/// Parse and validate a class count.
fn parse_num_classes(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid class count"))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("number of classes must be at least 1".to_string())
    }
}

/// Shared arguments for focus-quality scoring.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct PredictArgs {
    /// Files or directories to score
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Path to the safetensors weights file
    #[arg(short, long, value_name = "FILE")]
    pub weights: Option<PathBuf>,

    /// Model variant
    #[arg(long, value_enum, conflicts_with = "model_id")]
    pub model: Option<ModelArg>,

    /// Model id (0 = standard, 1 = dilated)
    #[arg(long, value_name = "ID")]
    pub model_id: Option<u32>,

    /// Number of quality classes
    #[arg(long, value_parser = parse_num_classes)]
    pub num_classes: Option<usize>,

    /// Patch side length in pixels
    #[arg(long, value_parser = parse_patch_width)]
    pub patch_width: Option<usize>,

    /// Exit with code 2 if any image scores below this class
    #[arg(long, value_name = "CLASS")]
    pub fail_below: Option<usize>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl PredictArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        if args.weights.is_none() {
            args.weights.clone_from(&config.model.weights);
        }
        args.num_classes = args.num_classes.or(config.model.num_classes);
        args.patch_width = args.patch_width.or(config.model.patch_width);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());
        args
    }

    /// Resolve the model variant from CLI id, CLI name, or config.
    fn variant(&self) -> Result<ModelVariant> {
        if let Some(id) = self.model_id {
            return ModelVariant::from_id(id);
        }
        if let Some(model) = self.model {
            return Ok(model.into());
        }
        match self
            .config
            .as_ref()
            .and_then(|c| c.model.variant.as_deref())
        {
            Some("standard") | None => Ok(ModelVariant::Standard),
            Some("dilated") => Ok(ModelVariant::Dilated),
            Some(other) => anyhow::bail!("unsupported model variant '{other}' in config"),
        }
    }

    /// Get class count with fallback to the model default.
    fn num_classes(&self) -> usize {
        self.num_classes
            .unwrap_or(miq_core::model::DEFAULT_NUM_CLASSES)
    }

    /// Get patch width with fallback to the model default.
    fn patch_width(&self) -> usize {
        self.patch_width
            .unwrap_or(miq_core::model::DEFAULT_PATCH_WIDTH)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the predict command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct PredictResult {
    /// Number of images scored.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Number of images below the failure threshold.
    pub below_threshold: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the predict command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &PredictArgs) -> Result<PredictResult> {
    info!("Running predict command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let variant = args.variant()?;
    let num_classes = args.num_classes();
    let patch_width = args.patch_width();

    if let Some(threshold) = args.fail_below {
        if threshold >= num_classes {
            anyhow::bail!(
                "--fail-below class {threshold} is out of range for {num_classes} classes"
            );
        }
    }

    let model_config = MiqConfig {
        num_classes,
        patch_width,
        variant,
    };

    let weights = args
        .weights
        .clone()
        .unwrap_or_else(|| default_weights_path(variant));
    if !weights.is_file() {
        anyhow::bail!(
            "weights file not found: {} (pass --weights or place the checkpoint there)",
            weights.display()
        );
    }

    debug!(
        "Model: variant={variant}, num_classes={num_classes}, patch_width={patch_width}, \
         weights={}",
        weights.display()
    );

    let device = best_device();
    let predictor = Predictor::from_weights(&weights, &model_config, &device)
        .with_context(|| format!("failed to load model from {}", weights.display()))?;

    let source = FsPatchSource::new(args.paths.clone(), args.recursive, patch_width);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    score_images(&source, &predictor, &output, &progress_bar, args)
}

/// Score all images from the source.
fn score_images(
    source: &FsPatchSource,
    predictor: &Predictor,
    output: &JsonOutput,
    progress: &ProgressBar,
    args: &PredictArgs,
) -> Result<PredictResult> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut below_threshold = 0usize;
    let mut all_predictions: Vec<ImagePrediction> = Vec::new();

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                // Note: error message contains the path via anyhow context
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        let path = image.path.clone();
        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let mut prediction = match predictor.predict_image(&image) {
            Ok(p) => p,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };
        prediction.timestamp = iso_timestamp();

        if args
            .fail_below
            .is_some_and(|threshold| prediction.predicted < threshold)
        {
            below_threshold += 1;
        }

        progress.on_event(ProgressEvent::Scored {
            prediction: prediction.clone(),
        });

        match args.format() {
            OutputFormat::Jsonl => output.write(&prediction)?,
            OutputFormat::Json => all_predictions.push(prediction),
        }

        processed += 1;
    }

    if matches!(args.format(), OutputFormat::Json) {
        output.write_array(&all_predictions, args.pretty)?;
    }

    output.flush()?;
    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if below_threshold > 0 {
        ExitCode::BelowThreshold
    } else {
        ExitCode::Success
    };

    Ok(PredictResult {
        processed,
        skipped,
        below_threshold,
        exit_code,
    })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> PredictArgs {
        PredictArgs {
            paths: vec![],
            recursive: false,
            weights: None,
            model: None,
            model_id: None,
            num_classes: None,
            patch_width: None,
            fail_below: None,
            progress: false,
            quiet: false,
            format: None,
            pretty: false,
            config: None,
        }
    }

    #[test]
    fn test_defaults() {
        let args = bare_args();
        assert_eq!(args.num_classes(), 11);
        assert_eq!(args.patch_width(), 84);
        assert_eq!(args.variant().expect("variant"), ModelVariant::Standard);
    }

    #[test]
    fn test_model_id_resolution() {
        let mut args = bare_args();
        args.model_id = Some(1);
        assert_eq!(args.variant().expect("variant"), ModelVariant::Dilated);

        args.model_id = Some(9);
        assert!(args.variant().is_err());
    }

    #[test]
    fn test_parse_patch_width_bounds() {
        assert!(parse_patch_width("84").is_ok());
        assert!(parse_patch_width("4").is_ok());
        assert!(parse_patch_width("3").is_err());
        assert!(parse_patch_width("x").is_err());
    }

    #[test]
    fn test_parse_num_classes_bounds() {
        assert!(parse_num_classes("11").is_ok());
        assert!(parse_num_classes("0").is_err());
    }
}
