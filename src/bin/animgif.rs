use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "animgif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble images into one animated GIF.
    Make(MakeArgs),
    /// Split an animation into numbered PNG frames.
    Split(SplitArgs),
}

#[derive(Parser, Debug)]
struct MakeArgs {
    /// Input images, in frame order. Animated inputs contribute one frame per page.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Options JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Delay for every frame, in milliseconds.
    #[arg(long, conflicts_with = "delays")]
    delay: Option<u32>,

    /// Comma-separated per-frame delays, in milliseconds.
    #[arg(long, value_delimiter = ',')]
    delays: Option<Vec<u32>>,

    /// 0 loops forever; n loops n times.
    #[arg(long)]
    repeat: Option<u16>,

    #[arg(long)]
    max_colors: Option<u16>,

    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    #[arg(long, value_enum)]
    resize_to: Option<ResizeToChoice>,

    #[arg(long, value_enum)]
    resize_type: Option<ResizeTypeChoice>,

    /// Enable 1-bit transparency.
    #[arg(long)]
    transparent: bool,

    /// Suppress per-frame progress on stderr.
    #[arg(long)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Input animation (GIF, APNG or animated WebP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `<prefix>-NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value = "frame")]
    prefix: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Rgb565,
    Rgb444,
    Rgba4444,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResizeToChoice {
    Largest,
    Smallest,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResizeTypeChoice {
    Zoom,
    Crop,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Make(args) => cmd_make(args),
        Command::Split(args) => cmd_split(args),
    }
}

fn read_options(path: Option<&Path>) -> anyhow::Result<animgif::GifOptions> {
    let Some(path) = path else {
        return Ok(animgif::GifOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Ok(animgif::GifOptions::from_json_str(&text)?)
}

fn apply_flags(opts: &mut animgif::GifOptions, args: &MakeArgs) {
    if args.width.is_some() {
        opts.width = args.width;
    }
    if args.height.is_some() {
        opts.height = args.height;
    }
    if let Some(ms) = args.delay {
        opts.delay = Some(animgif::Delay::Uniform(ms));
    }
    if let Some(list) = &args.delays {
        opts.delay = Some(animgif::Delay::PerFrame(list.clone()));
    }
    if let Some(repeat) = args.repeat {
        opts.repeat = repeat;
    }
    if let Some(max) = args.max_colors {
        opts.max_colors = max;
    }
    if let Some(format) = args.format {
        opts.format = match format {
            FormatChoice::Rgb565 => animgif::ColorFormat::Rgb565,
            FormatChoice::Rgb444 => animgif::ColorFormat::Rgb444,
            FormatChoice::Rgba4444 => animgif::ColorFormat::Rgba4444,
        };
    }
    if let Some(to) = args.resize_to {
        opts.resize_to = match to {
            ResizeToChoice::Largest => animgif::ResizeTo::Largest,
            ResizeToChoice::Smallest => animgif::ResizeTo::Smallest,
        };
    }
    if let Some(ty) = args.resize_type {
        opts.resize_type = match ty {
            ResizeTypeChoice::Zoom => animgif::ResizeType::Zoom,
            ResizeTypeChoice::Crop => animgif::ResizeType::Crop,
        };
    }
    if args.transparent {
        opts.transparent = true;
    }
}

fn cmd_make(args: MakeArgs) -> anyhow::Result<()> {
    let mut opts = read_options(args.config.as_deref())?;
    apply_flags(&mut opts, &args);

    let mut gif = animgif::Gif::new(opts)?;
    for path in &args.inputs {
        let frame = animgif::Frame::open(path)
            .with_context(|| format!("load input '{}'", path.display()))?;
        gif.add_frame(frame);
    }

    let quiet = args.quiet;
    let bytes = gif.to_buffer_with(
        &mut |p| {
            if !quiet {
                eprintln!("encoded {}/{}", p.encoded, p.total);
            }
        },
        None,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} bytes)", args.out.display(), bytes.len());
    Ok(())
}

fn cmd_split(args: SplitArgs) -> anyhow::Result<()> {
    let reader = animgif::GifReader::open(&args.in_path)
        .with_context(|| format!("read animation '{}'", args.in_path.display()))?;
    let frames = reader.to_frames()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        let path = args.out_dir.join(format!("{}-{i:04}.png", args.prefix));
        frame.save_png(&path)?;
    }

    if let Some(delays) = reader.delays() {
        tracing::info!(?delays, "source delays (ms)");
    }
    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}
