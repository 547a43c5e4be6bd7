use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use jgrid::models::{Image, Layout};
use jgrid::scanner::{load_manifest, FileScanner, ScanConfig};
use jgrid::{
    compute_layout, render, ContainerMetrics, GridConfig, JustifiedLayout, LayoutConfig,
    RelayoutScheduler,
};

/// Justified image-grid layout
#[derive(Parser, Debug)]
#[command(name = "jgrid")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lays out images in justified rows for one or more container widths
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// JSON manifest of images ({ "_id", "href", "dimensions": { "w", "h" } })
    #[arg(long, conflicts_with = "dir", required_unless_present = "dir")]
    manifest: Option<PathBuf>,

    /// Directory of image files to lay out
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Scan subdirectories of --dir
    #[arg(long, requires = "dir")]
    recursive: bool,

    /// Maximum depth when scanning recursively (unlimited if omitted)
    #[arg(long, requires = "recursive")]
    max_depth: Option<usize>,

    /// Follow symbolic links while scanning
    #[arg(long, requires = "dir")]
    follow_symlinks: bool,

    /// Container width in pixels (repeat for several widths)
    #[arg(long, short, required = true)]
    width: Vec<f64>,

    /// Horizontal padding subtracted from each width
    #[arg(long, default_value = "0")]
    padding: f64,

    #[arg(long)]
    min_row_height: Option<f64>,

    #[arg(long)]
    max_row_height: Option<f64>,

    /// Spacing between images and between rows
    #[arg(long)]
    gutter: Option<f64>,

    /// Feed the widths through the debounced relayout as one resize burst
    #[arg(long)]
    resize_burst: bool,

    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Config file path
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Html,
}

impl LayoutArgs {
    /// Flags override the config file, which overrides the defaults.
    fn apply_overrides(&self, config: &mut GridConfig) {
        if let Some(min) = self.min_row_height {
            config.layout.min_row_height = min;
        }
        if let Some(max) = self.max_row_height {
            config.layout.max_row_height = max;
        }
        if let Some(gutter) = self.gutter {
            config.layout.gutter = gutter;
        }
    }

    /// One layout config per requested width, padding already subtracted.
    fn layout_configs(&self, config: &GridConfig) -> Vec<LayoutConfig> {
        self.width
            .iter()
            .map(|&w| config.layout_config(ContainerMetrics::new(w, self.padding).content_width()))
            .collect()
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            recursive: self.recursive,
            max_depth: self.max_depth.unwrap_or(0),
            follow_symlinks: self.follow_symlinks,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jgrid=info".parse()?),
        )
        .init();

    match Cli::parse().command {
        Command::Layout(args) => run_layout(&args),
    }
}

fn run_layout(args: &LayoutArgs) -> Result<()> {
    let mut grid_config = GridConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut grid_config);

    let images = load_images(args)?;
    let configs = args.layout_configs(&grid_config);

    if args.resize_burst {
        let rows = relayout_burst(images, &configs, &grid_config)?;
        print_layout(&rows, grid_config.layout.gutter, args.format)?;
        return Ok(());
    }

    let show_headers = configs.len() > 1 && args.format == OutputFormat::Summary;
    for config in &configs {
        if show_headers {
            println!("# width {}", config.container_width);
        }
        let rows = compute_layout(&images, config);
        print_layout(&rows, config.gutter, args.format)?;
    }

    Ok(())
}

fn load_images(args: &LayoutArgs) -> Result<Vec<Image>> {
    if let Some(manifest) = &args.manifest {
        return load_manifest(manifest);
    }

    let dir = args.dir.as_deref().context("Either --manifest or --dir is required")?;
    FileScanner::with_config(args.scan_config()).scan(dir)
}

/// Sends every width as one burst of resizes and returns the settled layout.
fn relayout_burst(
    images: Vec<Image>,
    configs: &[LayoutConfig],
    grid_config: &GridConfig,
) -> Result<Layout> {
    let Some(first) = configs.first() else {
        return Ok(Vec::new());
    };

    let (tx, rx) = flume::bounded(1);
    let mut scheduler = RelayoutScheduler::spawn(
        images,
        JustifiedLayout::from(first),
        grid_config.quiet_window(),
        move |rows| {
            let _ = tx.try_send(Layout::clone(rows));
        },
    )
    .context("Failed to start relayout worker")?;

    for config in configs {
        scheduler.notify_width(config.container_width);
    }

    let rows = rx
        .recv()
        .context("Relayout worker stopped before producing a layout")?;
    scheduler.shutdown();
    Ok(rows)
}

fn print_layout(rows: &Layout, gutter: f64, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Summary => print!("{}", render::summary(rows, gutter)),
        OutputFormat::Html => print!("{}", render::render_html(rows, gutter)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows).context("Failed to encode layout")?;
            println!("{json}");
        }
    }
    Ok(())
}
