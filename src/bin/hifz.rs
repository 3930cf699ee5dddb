use std::{
    collections::HashSet,
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hifz::LayoutSource as _;

#[derive(Parser, Debug)]
#[command(name = "hifz", version)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the verse-map artifact from a directory of layout documents.
    BuildMap(BuildMapArgs),
    /// Parse one layout document and print its verse inventory as JSON.
    Page(PageArgs),
    /// Print the masks for one page and a set of visible verses as JSON.
    Masks(MasksArgs),
    /// Run a drill headlessly, printing every step as a JSON line.
    Drill(DrillArgs),
}

#[derive(Parser, Debug)]
struct BuildMapArgs {
    /// Directory holding `page-NNN.json` layout documents.
    #[arg(long)]
    layouts: PathBuf,

    /// Output artifact path.
    #[arg(long)]
    out: PathBuf,

    /// First page (inclusive).
    #[arg(long, default_value_t = 1)]
    first: u32,

    /// Last page (inclusive).
    #[arg(long, default_value_t = hifz::TOTAL_PAGES)]
    last: u32,

    /// Analyze pages in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Calibration JSON to use instead of the built-in artifact layout.
    #[arg(long)]
    calibration: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Layout document to parse.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Verse-map artifact used to refine the middle verse.
    #[arg(long)]
    verse_map: Option<PathBuf>,

    /// Line treated as the middle of the page.
    #[arg(long, default_value_t = hifz::DEFAULT_TARGET_LINE)]
    target_line: u32,
}

#[derive(Parser, Debug)]
struct MasksArgs {
    /// Directory holding `page-NNN.json` layout documents.
    #[arg(long)]
    layouts: Option<PathBuf>,

    /// Page number.
    #[arg(long)]
    page: u32,

    /// Verse-map artifact; takes precedence over the layout for geometry.
    #[arg(long)]
    verse_map: Option<PathBuf>,

    /// Verses left visible (`surah:verse`, comma separated).
    #[arg(long, value_delimiter = ',')]
    visible: Vec<String>,

    /// Use the artifact's stored boxes instead of recomputing them.
    #[arg(long, default_value_t = false)]
    stored: bool,

    /// Calibration JSON to use instead of the page's odd/even calibration.
    #[arg(long)]
    calibration: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DrillArgs {
    /// Directory holding `page-NNN.json` layout documents.
    #[arg(long)]
    layouts: PathBuf,

    /// Drill to run.
    #[arg(long, default_value = "sequential-start-middle-end")]
    exercise: hifz::ExerciseId,

    /// First page of the range.
    #[arg(long)]
    start: u32,

    /// Last page of the range.
    #[arg(long)]
    end: u32,

    /// Seed for random choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Verse-map artifact.
    #[arg(long)]
    verse_map: Option<PathBuf>,

    /// Stop after this many steps.
    #[arg(long)]
    max_steps: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::BuildMap(args) => cmd_build_map(args),
        Command::Page(args) => cmd_page(args),
        Command::Masks(args) => cmd_masks(args),
        Command::Drill(args) => cmd_drill(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_verse_map(path: Option<&Path>) -> anyhow::Result<Option<hifz::VerseMap>> {
    path.map(|p| {
        hifz::VerseMap::from_path(p).with_context(|| format!("load verse map '{}'", p.display()))
    })
    .transpose()
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write JSON to stdout")?;
    writeln!(out).context("write JSON to stdout")?;
    Ok(())
}

fn cmd_build_map(args: BuildMapArgs) -> anyhow::Result<()> {
    let calibration = match &args.calibration {
        Some(p) => hifz::Calibration::from_path(p)
            .with_context(|| format!("load calibration '{}'", p.display()))?,
        None => hifz::Calibration::VERSE_MAP,
    };
    let opts = hifz::BuildOpts {
        first_page: args.first,
        last_page: args.last,
        calibration,
        parallel: args.parallel,
        threads: args.threads,
        generated_at: None,
    };

    let source = hifz::DirLayoutSource::new(&args.layouts);
    let (map, stats) = hifz::build_verse_map(&source, &opts)?;
    map.write_to_path(&args.out)
        .with_context(|| format!("write verse map '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} pages, {} skipped, {} verses)",
        args.out.display(),
        stats.pages_built,
        stats.pages_skipped,
        stats.verses_mapped
    );
    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PageReport<'a> {
    page: u32,
    verses: &'a [hifz::VersePosition],
    first_verse: Option<&'a hifz::VersePosition>,
    last_verse: Option<&'a hifz::VersePosition>,
    middle_verse: Option<&'a hifz::VersePosition>,
    warnings: &'a [hifz::LayoutWarning],
}

fn cmd_page(args: PageArgs) -> anyhow::Result<()> {
    let layout = hifz::LayoutPage::from_path(&args.in_path)
        .with_context(|| format!("load layout '{}'", args.in_path.display()))?;
    let verse_map = load_verse_map(args.verse_map.as_deref())?;

    let parsed = hifz::parse_page_verses(&layout);
    let runtime = hifz::page_verse_map(&layout, &hifz::Calibration::VERSE_MAP);
    let geometry = verse_map
        .as_ref()
        .and_then(|m| m.page(layout.page))
        .unwrap_or(&runtime);

    let report = PageReport {
        page: layout.page,
        verses: parsed.verses.verses(),
        first_verse: parsed.verses.first_verse(),
        last_verse: parsed.verses.last_verse(),
        middle_verse: hifz::middle_verse_at_line(&parsed.verses, Some(geometry), args.target_line),
        warnings: &parsed.warnings,
    };
    print_json(&report)
}

fn cmd_masks(args: MasksArgs) -> anyhow::Result<()> {
    if !hifz::is_valid_page(args.page) {
        anyhow::bail!("page must be within 1..={}, got {}", hifz::TOTAL_PAGES, args.page);
    }
    let verse_map = load_verse_map(args.verse_map.as_deref())?;
    let calibration = match &args.calibration {
        Some(p) => hifz::Calibration::from_path(p)
            .with_context(|| format!("load calibration '{}'", p.display()))?,
        None => hifz::Calibration::for_page(args.page),
    };

    let runtime = match &args.layouts {
        Some(dir) => {
            let layout = hifz::DirLayoutSource::new(dir)
                .load_page(args.page)
                .with_context(|| format!("load layout for page {}", args.page))?;
            Some(hifz::page_verse_map(&layout, &hifz::Calibration::VERSE_MAP))
        }
        None => None,
    };
    let geometry = verse_map
        .as_ref()
        .and_then(|m| m.page(args.page))
        .or(runtime.as_ref());
    if geometry.is_none() {
        tracing::warn!(page = args.page, "no verse geometry for page; nothing to mask");
    }

    let visible: HashSet<String> = args.visible.into_iter().collect();
    let masks = if args.stored {
        hifz::stored_masks(geometry, &visible)
    } else {
        hifz::compute_masks(geometry, &visible, &calibration)
    };
    print_json(&masks)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StepLine<'a> {
    round: u32,
    page: u32,
    step_index: usize,
    step: &'a hifz::Step,
    visible_verses: Vec<String>,
    masks: Vec<hifz::Mask>,
}

fn cmd_drill(args: DrillArgs) -> anyhow::Result<()> {
    let verse_map = load_verse_map(args.verse_map.as_deref())?;
    let config = hifz::ExerciseConfig {
        seed: args.seed,
        ..hifz::ExerciseConfig::new(args.exercise, args.start, args.end)
    };
    let mut session = hifz::ExerciseSession::new(config)?;
    session.start()?;

    let source = Arc::new(hifz::DirLayoutSource::new(&args.layouts));
    let cache = Arc::new(hifz::PageCache::new());
    let max_steps = args.max_steps.unwrap_or(usize::MAX);
    let mut printed = 0usize;
    let mut out = std::io::stdout().lock();

    'rounds: while printed < max_steps {
        session.prepare_round(&cache, &source, verse_map.as_ref())?;
        loop {
            if printed >= max_steps {
                break 'rounds;
            }
            if let (Some(round), Some(step)) = (session.round(), session.current_step()) {
                let line = StepLine {
                    round: round.index,
                    page: round.page,
                    step_index: round.current,
                    step,
                    visible_verses: session.visible_verses().into_iter().collect(),
                    masks: session.masks(),
                };
                serde_json::to_writer(&mut out, &line).context("write step to stdout")?;
                writeln!(out).context("write step to stdout")?;
                printed += 1;
            }
            match session.advance()? {
                hifz::Advance::Step => {}
                hifz::Advance::NextPage(_) => break,
                hifz::Advance::Completed | hifz::Advance::NoRound => break 'rounds,
            }
        }
    }

    let progress = session.progress();
    eprintln!(
        "drilled {} of {} pages ({} steps)",
        progress.pages_completed, progress.total_pages, printed
    );
    Ok(())
}
