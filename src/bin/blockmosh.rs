use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use blockmosh::{
    FfmpegSink, FfmpegSinkOpts, FfmpegSource, FrameSink, FrameSource, MoshConfig, MoshSession,
    MoshSessionOpts, PngSequenceSink, TracingObserver,
};

#[derive(Parser, Debug)]
#[command(name = "blockmosh", version, about = "Difference-driven block datamoshing")]
struct Cli {
    /// Input video (anything the system `ffmpeg` can decode).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path. Defaults to the first free `outputN.mp4` in the current directory.
    #[arg(long, conflicts_with = "png_dir")]
    out: Option<PathBuf>,

    /// Write a PNG sequence into this directory instead of an MP4.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Overwrite `--out` if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge length in pixels of the finest updated blocks.
    #[arg(long)]
    division_size: Option<u32>,

    /// Target fraction of the frame refreshed per frame.
    #[arg(long)]
    budget: Option<f64>,

    /// Start from a black canvas instead of the first frame.
    #[arg(long, default_value_t = false)]
    start_blank: bool,

    /// Number of coarse-to-fine refinement passes.
    #[arg(long)]
    fractal_level: Option<u32>,

    /// Blank the canvas every N processed frames.
    #[arg(long)]
    refresh_rate: Option<u32>,

    /// Score and composite on a rayon worker pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Log every frame and refinement pass.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn mosh_config(&self) -> anyhow::Result<MoshConfig> {
        let mut cfg = match &self.config {
            Some(path) => MoshConfig::from_path(path)?,
            None => MoshConfig::default(),
        };
        if let Some(v) = self.division_size {
            cfg.division_size = v;
        }
        if let Some(v) = self.budget {
            cfg.budget = v;
        }
        if self.start_blank {
            cfg.start_blank = true;
        }
        if let Some(v) = self.fractal_level {
            cfg.fractal_level = v;
        }
        if let Some(v) = self.refresh_rate {
            cfg.refresh_rate = Some(v);
        }
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let cfg = cli.mosh_config()?;
    let session = MoshSession::new(
        cfg,
        MoshSessionOpts {
            parallel: cli.parallel,
            threads: cli.threads,
        },
    )?;

    let mut source = FfmpegSource::open(&cli.in_path)
        .with_context(|| format!("open input '{}'", cli.in_path.display()))?;
    let info = source.info();
    tracing::info!(
        width = info.width,
        height = info.height,
        fps = info.fps.as_f64(),
        "video properties"
    );

    let (mut sink, out_display): (Box<dyn FrameSink>, PathBuf) = match &cli.png_dir {
        Some(dir) => (Box::new(PngSequenceSink::new(dir)), dir.clone()),
        None => {
            let out = match &cli.out {
                Some(out) => out.clone(),
                None => blockmosh::next_free_output_path(&std::env::current_dir()?),
            };
            let opts = FfmpegSinkOpts {
                out_path: out.clone(),
                overwrite: cli.overwrite,
            };
            (Box::new(FfmpegSink::new(opts)), out)
        }
    };
    tracing::info!(path = %out_display.display(), "output path");

    let stats = session.run(&mut source, sink.as_mut(), &mut TracingObserver)?;
    eprintln!(
        "wrote {} ({} frames)",
        out_display.display(),
        stats.frames_emitted
    );
    Ok(())
}
