use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_resize::export::{self, OutputPlatform};
use pdf_resize::format::{format_file_size, format_mm, format_size_mm, parse_numeric};
use pdf_resize::geometry::{aspect_ratio, effective_size, orient_preset};
use pdf_resize::tokens::expand_filename;
use pdf_resize::{
    DocumentInfo, DownloadFolder, FilenameEditor, FilenameToken, LocalDisk, OutputSpec,
    PageSelection, PresetList, ResizeOptions, ResizeSession, SaveOutcome, SizeMode, load_pdf,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pdfr", about = "Resize PDF pages to target paper sizes", version)]
struct Cli {
    /// Print log messages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and page sizes
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write one resized PDF per output size
    Resize(ResizeArgs),

    /// Expand a file name template
    Name {
        template: String,

        /// Output width in mm
        #[arg(long)]
        width: f64,

        /// Output height in mm
        #[arg(long)]
        height: f64,

        /// Replace a size like 210x297 or A4 with the size token first
        #[arg(long)]
        replace_size: bool,

        /// Replace the first six-digit date with a date token first
        #[arg(long, value_enum)]
        replace_date: Option<DateArg>,

        /// Date used for the date tokens (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List or restore size presets
    Presets {
        /// Preset file (JSON); the built-in A-series is used when absent
        #[arg(long)]
        file: Option<PathBuf>,

        /// Restore the default presets, writing back to --file
        #[arg(long)]
        restore: bool,
    },
}

#[derive(Args)]
struct ResizeArgs {
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder (default: the input's folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Subfolder created inside the output folder
    #[arg(long)]
    subfolder: Option<String>,

    /// Output size as WIDTHxHEIGHT in mm, optionally followed by
    /// :fill, :set-width or :set-height (repeatable)
    #[arg(long = "size", value_parser = parse_size_arg)]
    sizes: Vec<OutputSpec>,

    /// Output size by preset name, oriented like the source (repeatable, after --size)
    #[arg(long = "preset")]
    presets: Vec<String>,

    /// Preset file used to resolve --preset
    #[arg(long)]
    preset_file: Option<PathBuf>,

    /// Margin trimmed from every edge, in mm
    #[arg(long)]
    trim: Option<f64>,

    /// File name template; tokens: *size*, *YYMMDD*, *DDMMYY*
    #[arg(long)]
    name: Option<String>,

    /// Page to export (1-based)
    #[arg(long, conflicts_with = "all_pages")]
    page: Option<usize>,

    /// Export every page
    #[arg(long)]
    all_pages: bool,

    /// Replace files that already exist
    #[arg(long, conflicts_with = "skip_existing")]
    overwrite: bool,

    /// Keep files that already exist and write only the new ones
    #[arg(long)]
    skip_existing: bool,

    /// Write every file into this folder without checking for existing files
    #[arg(long)]
    download_to: Option<PathBuf>,

    /// Load settings from a JSON configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the effective settings as JSON before saving
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DateArg {
    Yymmdd,
    Ddmmyy,
}

impl From<DateArg> for FilenameToken {
    fn from(arg: DateArg) -> Self {
        match arg {
            DateArg::Yymmdd => Self::Yymmdd,
            DateArg::Ddmmyy => Self::Ddmmyy,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ConflictPolicy {
    Abort,
    Overwrite,
    Skip,
}

/// Parse `WIDTHxHEIGHT[:mode]`
fn parse_size_arg(raw: &str) -> std::result::Result<OutputSpec, String> {
    let (dims, mode) = match raw.split_once(':') {
        Some((dims, mode)) => (dims, parse_mode(mode)?),
        None => (raw, SizeMode::Fill),
    };
    let (width, height) = dims
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{dims}'"))?;
    let width = parse_numeric(width.trim()).ok_or_else(|| format!("invalid width '{width}'"))?;
    let height =
        parse_numeric(height.trim()).ok_or_else(|| format!("invalid height '{height}'"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err("width and height must be positive".to_string());
    }
    Ok(OutputSpec::new(mode, width, height))
}

fn parse_mode(raw: &str) -> std::result::Result<SizeMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "fill" => Ok(SizeMode::Fill),
        "set-width" | "width" => Ok(SizeMode::SetWidth),
        "set-height" | "height" => Ok(SizeMode::SetHeight),
        other => Err(format!(
            "unknown mode '{other}' (expected fill, set-width or set-height)"
        )),
    }
}

/// Minimal `log` sink for `--verbose`
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        log::set_logger(&STDERR_LOGGER)
            .map(|()| log::set_max_level(log::LevelFilter::Debug))
            .context("Failed to install logger")?;
    }

    match cli.command {
        Commands::Info { input } => show_info(&input).await?,
        Commands::Resize(args) => resize(args).await?,
        Commands::Name {
            template,
            width,
            height,
            replace_size,
            replace_date,
            date,
        } => {
            let mut editor = FilenameEditor::new(template);
            if replace_size && !editor.replace_size() {
                eprintln!("No size pattern found");
            }
            if let Some(token) = replace_date {
                if !editor.replace_date(token.into()) {
                    eprintln!("No date pattern found");
                }
            }
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            println!("Template: {}", editor.value());
            println!(
                "File name: {}.pdf",
                expand_filename(editor.value(), width, height, date)
            );
        }
        Commands::Presets { file, restore } => {
            let mut presets = load_presets(file.as_deref()).await?;
            if restore {
                presets.restore_defaults();
                match &file {
                    Some(path) => {
                        presets.save(path).await?;
                        println!("Restored defaults → {}", path.display());
                    }
                    None => println!("Built-in presets are already the defaults"),
                }
            }
            for preset in presets.items() {
                println!(
                    "  {:<12} {}",
                    preset.name,
                    format_size_mm(preset.width, preset.height)
                );
            }
        }
    }

    Ok(())
}

async fn show_info(input: &Path) -> Result<()> {
    let doc = load_pdf(input)
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let info = DocumentInfo::from_document(&doc)?;
    let file_size = tokio::fs::metadata(input).await.map(|m| m.len()).ok();

    println!("{}", input.display());
    if let Some(bytes) = file_size {
        println!("  Size: {}", format_file_size(bytes));
    }
    println!("  Pages: {}", info.page_count());
    for (index, page) in info.pages.iter().enumerate() {
        let geometry = page.geometry();
        let rotation = if page.rotation.rem_euclid(360) != 0 {
            format!(" (rotated {}°)", page.rotation.rem_euclid(360))
        } else {
            String::new()
        };
        println!(
            "  {:>4}: {}{}",
            index + 1,
            format_size_mm(geometry.width, geometry.height),
            rotation
        );
    }
    Ok(())
}

async fn load_presets(file: Option<&Path>) -> Result<PresetList> {
    match file {
        Some(path) if tokio::fs::try_exists(path).await.unwrap_or(false) => {
            Ok(PresetList::load(path).await?)
        }
        _ => Ok(PresetList::default()),
    }
}

async fn resize(args: ResizeArgs) -> Result<()> {
    let doc = load_pdf(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let info = DocumentInfo::from_document(&doc)?;
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = ResizeSession::new();
    session.load_document(info, Some(args.input.as_path()), file_name)?;

    if let Some(page) = args.page {
        if page == 0 || page > session.page_count() {
            bail!(
                "Page {} does not exist (document has {} pages)",
                page,
                session.page_count()
            );
        }
        session.set_page(page - 1);
    }

    if let Some(trim) = args.trim {
        if !(trim.is_finite() && trim >= 0.0) {
            bail!("Trim must be zero or positive");
        }
        if args.config.is_none() {
            // The derived first output follows the trimmed page
            session.set_trim(trim);
        }
    }

    let options = effective_options(&args, &session).await?;
    options.validate()?;
    session.apply_options(&options);

    if let Some(path) = &args.save_config {
        session.to_options().save(path).await?;
        println!("Configuration saved → {}", path.display());
    }

    let policy = if args.overwrite {
        ConflictPolicy::Overwrite
    } else if args.skip_existing {
        ConflictPolicy::Skip
    } else {
        ConflictPolicy::Abort
    };

    let doc = Arc::new(doc);
    let written = match &args.download_to {
        Some(dir) => run_save(&DownloadFolder::new(dir), &mut session, doc, policy).await?,
        None => run_save(&LocalDisk, &mut session, doc, policy).await?,
    };

    for path in &written {
        println!("Saved → {}", path.display());
    }
    if written.is_empty() {
        println!("Nothing written");
    }
    Ok(())
}

/// Merge the configuration file (or the session defaults) with the command line
async fn effective_options(args: &ResizeArgs, session: &ResizeSession) -> Result<ResizeOptions> {
    let mut options = match &args.config {
        Some(path) => ResizeOptions::load(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => session.to_options(),
    };

    if let Some(trim) = args.trim {
        options.trim_mm = trim;
    }

    if !args.sizes.is_empty() || !args.presets.is_empty() {
        let mut outputs = args.sizes.clone();
        if !args.presets.is_empty() {
            let presets = load_presets(args.preset_file.as_deref()).await?;
            let aspect = session
                .page_geometry()
                .map(|page| aspect_ratio(effective_size(page, options.trim_mm)))
                .unwrap_or(1.0);
            for name in &args.presets {
                let preset = presets
                    .items()
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
                    .with_context(|| format!("Unknown preset '{name}'"))?;
                let size = orient_preset(preset.size(), aspect);
                outputs.push(OutputSpec::new(SizeMode::Fill, size.width, size.height));
            }
        }
        options.outputs = outputs;
    }

    if let Some(name) = &args.name {
        options.file_name = name.clone();
    }
    if let Some(folder) = &args.output {
        options.export_folder = Some(folder.clone());
    }
    if let Some(subfolder) = &args.subfolder {
        options.use_subfolder = true;
        options.subfolder_name = subfolder.clone();
    }
    if args.all_pages {
        options.page_selection = PageSelection::All;
    } else if args.page.is_some() {
        options.page_selection = PageSelection::Single;
    }

    for (index, output) in options.outputs.iter().enumerate() {
        log::debug!(
            "Output {}: {} × {} mm ({})",
            index + 1,
            format_mm(output.width_mm),
            format_mm(output.height_mm),
            output.mode.label()
        );
    }
    Ok(options)
}

/// Run the save workflow to completion under `policy`
async fn run_save<P: OutputPlatform>(
    platform: &P,
    session: &mut ResizeSession,
    doc: Arc<lopdf::Document>,
    policy: ConflictPolicy,
) -> Result<Vec<PathBuf>> {
    let today = chrono::Local::now().date_naive();
    let (generation, request) = session.begin_save(today)?;

    let outcome = export::save(platform, Arc::clone(&doc), &request).await;
    let conflicts = match outcome {
        Ok(SaveOutcome::Saved(paths)) => {
            session.finish_save(generation, request, Ok(SaveOutcome::Saved(paths.clone())));
            return Ok(paths);
        }
        Ok(SaveOutcome::Conflict(set)) => {
            session.finish_save(generation, request, Ok(SaveOutcome::Conflict(set.clone())));
            set
        }
        Err(e) => {
            session.fail_save(generation, e.to_string());
            return Err(e.into());
        }
    };

    match policy {
        ConflictPolicy::Abort => {
            println!("These files already exist:");
            for entry in conflicts.entries().iter().filter(|e| e.is_conflict) {
                println!("  {}", entry.original_path.display());
            }
            session.cancel_conflicts();
            bail!(
                "{} file(s) already exist; use --overwrite or --skip-existing",
                conflicts.conflict_count()
            );
        }
        ConflictPolicy::Skip => {
            for (index, entry) in conflicts.entries().iter().enumerate() {
                if entry.is_conflict && entry.should_overwrite {
                    session.toggle_conflict(index);
                    println!("Skipping {}", entry.file_name);
                }
            }
        }
        ConflictPolicy::Overwrite => {}
    }

    let (generation, request, indices) = session.resolve_conflicts()?;
    if indices.is_empty() {
        session.finish_write(generation, Ok(Vec::new()));
        return Ok(Vec::new());
    }

    let result = export::write_selected(platform, doc, &request, &indices).await;
    match result {
        Ok(paths) => {
            session.finish_write(generation, Ok(paths.clone()));
            Ok(paths)
        }
        Err(e) => {
            session.fail_save(generation, e.to_string());
            Err(e.into())
        }
    }
}
