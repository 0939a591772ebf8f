use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "numroll", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how two strings align, column by column.
    Align(AlignArgs),
    /// Simulate a transition tick by tick and print each visible frame.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Starting string.
    #[arg(long)]
    from: Option<String>,

    /// Target string.
    #[arg(long)]
    to: Option<String>,

    /// Align by this unit hierarchy (most significant first, e.g. "兆亿万")
    /// instead of by character groups.
    #[arg(long)]
    units: Option<String>,

    /// Also print the pair after hole punching.
    #[arg(long)]
    punched: bool,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Starting string; counts up from zeros when omitted.
    #[arg(long)]
    from: Option<String>,

    /// Target string.
    #[arg(long)]
    to: String,

    /// Stagger mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::StartFirstArriveLast)]
    mode: ModeChoice,

    /// Animation config JSON; overrides --mode.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated render cadence.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    StartFirstArriveLast,
    StartTogetherArriveTogether,
    StartFirstArriveFirst,
    Calendar,
    Scoreboard,
}

impl From<ModeChoice> for numroll::Mode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::StartFirstArriveLast => Self::StartFirstArriveLast,
            ModeChoice::StartTogetherArriveTogether => Self::StartTogetherArriveTogether,
            ModeChoice::StartFirstArriveFirst => Self::StartFirstArriveFirst,
            ModeChoice::Calendar => Self::Calendar,
            ModeChoice::Scoreboard => Self::Scoreboard,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Align(args) => cmd_align(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<numroll::ScrollConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: numroll::ScrollConfig =
        serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(cfg)
}

fn print_pair(label: &str, pair: &numroll::AlignedPair) {
    println!("{label}: {:?} -> {:?}", pair.from_text(), pair.to_text());
    for (i, (f, t)) in pair
        .from_seq
        .iter()
        .zip(&pair.to_seq)
        .enumerate()
        .rev()
    {
        println!("  [{i}] '{}' -> '{}'", f.ch, t.ch);
    }
}

fn cmd_align(args: AlignArgs) -> anyhow::Result<()> {
    let pair = match &args.units {
        Some(units) => {
            let units: Vec<char> = units.chars().collect();
            numroll::align_with_units(args.from.as_deref(), args.to.as_deref(), &units)
        }
        None => numroll::align(args.from.as_deref(), args.to.as_deref()),
    };
    print_pair("aligned", &pair);
    if args.punched {
        print_pair("punched", &numroll::punch_holes(&pair));
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("fps must be > 0");
    }
    let config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => numroll::ScrollConfig::for_mode(args.mode.into()),
    };

    let mut row = numroll::ScrollRow::new(config)?;
    row.set_text_animated(args.from.as_deref(), Some(args.to.as_str()));

    let dt = Duration::from_millis((1000 / u64::from(args.fps)).max(1));
    let mut elapsed = Duration::ZERO;
    let mut last = String::new();
    for _ in 0..100_000u32 {
        row.tick(dt);
        elapsed += dt;
        let glyphs = row.glyphs();
        if glyphs != last {
            println!("{:>6} ms  {glyphs}", elapsed.as_millis());
            last = glyphs;
        }
        if row.is_settled() {
            let removed = row
                .drain_events()
                .iter()
                .filter(|e| matches!(e, numroll::RowEvent::RemovalRequested { .. }))
                .count();
            println!(
                "settled after {} ms ({} columns, {removed} removed)",
                elapsed.as_millis(),
                row.len()
            );
            return Ok(());
        }
    }
    anyhow::bail!("transition did not settle")
}
