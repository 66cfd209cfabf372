use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "soulgem", version, about = "Wandering-soul LED strip animation")]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animation to run.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Number of souls (dance mode).
    #[arg(long)]
    souls: Option<usize>,

    /// Seed for a reproducible show.
    #[arg(long)]
    seed: Option<u64>,

    /// Pixels on the strip.
    #[arg(long)]
    strip_len: Option<usize>,

    /// Leading pixels reserved for wiring.
    #[arg(long)]
    offset: Option<usize>,

    /// Where frames go.
    #[arg(long, value_enum, default_value_t = SinkChoice::Terminal)]
    sink: SinkChoice,

    /// Terminal layout (terminal sink only).
    #[arg(long, value_enum, default_value_t = LayoutChoice::Inline)]
    layout: LayoutChoice,

    /// Stop after this many loop iterations instead of running until interrupted.
    #[arg(long)]
    iterations: Option<u64>,

    /// Log filter, e.g. `debug` or `soulgem=trace`. Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Dance,
    Cycle,
    Chase,
    Breathe,
    Traverse,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SinkChoice {
    Terminal,
    Memory,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Inline,
    Scroll,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let config = load_config(&cli)?;
    let stop = soulgem::StopHandle::default();
    for sig in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(sig, stop.flag())
            .with_context(|| format!("install handler for signal {sig}"))?;
    }

    match cli.sink {
        SinkChoice::Terminal => {
            let layout = match cli.layout {
                LayoutChoice::Inline => soulgem::TerminalLayout::Inline,
                LayoutChoice::Scroll => soulgem::TerminalLayout::Scroll,
            };
            let strip = soulgem::TerminalStrip::new(std::io::stdout(), config.strip_len, layout);
            let strip = run(config, strip, stop, cli.iterations)?;
            if layout == soulgem::TerminalLayout::Inline {
                let mut out = strip.into_inner();
                writeln!(out).context("finish terminal line")?;
            }
        }
        SinkChoice::Memory => {
            let strip = soulgem::MemoryStrip::without_history(config.strip_len);
            let strip = run(config, strip, stop, cli.iterations)?;
            tracing::info!(presents = strip.present_count(), "memory strip done");
        }
    }
    Ok(())
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("parse log filter '{f}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<soulgem::GemConfig> {
    let mut config = match &cli.config {
        Some(path) => soulgem::GemConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => soulgem::GemConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = match mode {
            ModeChoice::Dance => soulgem::Mode::Dance,
            ModeChoice::Cycle => soulgem::Mode::Cycle,
            ModeChoice::Chase => soulgem::Mode::Chase,
            ModeChoice::Breathe => soulgem::Mode::Breathe,
            ModeChoice::Traverse => soulgem::Mode::Traverse,
        };
    }
    if let Some(n) = cli.souls {
        config.souls = n;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(n) = cli.strip_len {
        config.strip_len = n;
    }
    if let Some(n) = cli.offset {
        config.offset = n;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run<S: soulgem::PixelSink>(
    config: soulgem::GemConfig,
    strip: S,
    stop: soulgem::StopHandle,
    iterations: Option<u64>,
) -> anyhow::Result<S> {
    let mut gem = soulgem::Gem::from_config(config, strip)?.with_stop_handle(stop);
    tracing::info!(
        mode = ?gem.mode(),
        souls = gem.souls().len(),
        "soulgem running; press Ctrl-C to quit"
    );
    gem.run_for(iterations)?;
    Ok(gem.into_sink())
}
