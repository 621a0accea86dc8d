use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use yogaflow::{
    DurationOverrides, EngineConfig, Focus, GenerateRequest, PoseCatalog, PoseId, Rng64,
    Scorer, Sequence, SessionPlan, Tempo, TimingMode,
};

#[derive(Parser, Debug)]
#[command(name = "yogaflow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Pose catalog JSON (array of pose records). Defaults to the built-in library.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Log to stderr; repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a safety-checked flow.
    Generate(GenerateArgs),
    /// Apply the safety rules to a flow and report what changed.
    Check(FlowArgs),
    /// Suggest next poses or a bridging pose.
    Suggest(SuggestArgs),
    /// List poses to browse at an intensity and focus.
    Palette(PaletteArgs),
    /// Compute per-pose durations and the session length of a flow.
    Timing(TimingArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Practice length in minutes.
    #[arg(long, default_value_t = 15.0)]
    minutes: f64,

    /// Desired intensity.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    intensity: u8,

    /// Body area to emphasize.
    #[arg(long, default_value = "Full-Body")]
    focus: Focus,

    /// Random seed. Defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct FlowArgs {
    /// Comma-separated pose ids.
    #[arg(long, value_delimiter = ',', required = true)]
    flow: Vec<String>,
}

#[derive(Parser, Debug)]
struct SuggestArgs {
    /// Comma-separated flow built so far; ranks what should come next.
    #[arg(long, value_delimiter = ',', conflicts_with = "from")]
    after: Vec<String>,

    /// Pose the flow currently ends with.
    #[arg(long)]
    from: Option<String>,

    /// Pose that should follow; asks for a bridging pose between the two.
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Number of suggestions.
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Random seed. Defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Intensity to browse around.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    intensity: u8,

    /// Body area to list first.
    #[arg(long, default_value = "Full-Body")]
    focus: Focus,

    /// Maximum number of poses.
    #[arg(long, default_value_t = yogaflow::PALETTE_LIMIT)]
    limit: usize,
}

#[derive(Parser, Debug)]
struct TimingArgs {
    #[command(flatten)]
    flow: FlowArgs,

    /// Duration override as INDEX=VALUE (seconds, or breaths with --breaths).
    #[arg(long = "set", value_parser = parse_override)]
    overrides: Vec<(usize, f64)>,

    /// Playback speed, clamped to 0.25..=4.
    #[arg(long)]
    tempo: Option<f64>,

    /// Count durations in whole breaths.
    #[arg(long)]
    breaths: bool,
}

fn parse_override(s: &str) -> Result<(usize, f64), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got '{s}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("bad index '{index}': {e}"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value '{value}': {e}"))?;
    Ok((index, value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => PoseCatalog::from_path(path)
            .with_context(|| format!("load catalog '{}'", path.display()))?,
        None => PoseCatalog::builtin(),
    };
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };

    let ctx = Ctx {
        catalog,
        config,
        json: cli.json,
    };
    match cli.cmd {
        Command::Generate(args) => cmd_generate(&ctx, args),
        Command::Check(args) => cmd_check(&ctx, args),
        Command::Suggest(args) => cmd_suggest(&ctx, args),
        Command::Palette(args) => cmd_palette(&ctx, args),
        Command::Timing(args) => cmd_timing(&ctx, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct Ctx {
    catalog: PoseCatalog,
    config: EngineConfig,
    json: bool,
}

impl Ctx {
    fn pose_name(&self, id: &PoseId) -> String {
        match self.catalog.lookup(id) {
            Some(p) if !p.name.is_empty() => p.name.clone(),
            _ => id.to_string(),
        }
    }

    fn print_json(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(value).context("serialize output")?;
        println!("{text}");
        Ok(())
    }
}

fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn to_sequence(ids: &[String]) -> Sequence {
    ids.iter().map(|s| PoseId::new(s.trim())).collect()
}

fn format_seconds(total: u64) -> String {
    format!("{}m {:02}s", total / 60, total % 60)
}

fn cmd_generate(ctx: &Ctx, args: GenerateArgs) -> anyhow::Result<()> {
    let seed = seed_or_clock(args.seed);
    let request = GenerateRequest::new(args.minutes, args.intensity, args.focus);
    let cfg = &ctx.config;
    let flow = yogaflow::generate(
        &ctx.catalog,
        &cfg.safety,
        &cfg.generator,
        &request,
        &mut Rng64::new(seed),
    );
    let plan = SessionPlan::from_flow(
        &ctx.catalog,
        &flow,
        &DurationOverrides::new(),
        &cfg.timing,
    );

    let tips: Vec<_> = flow
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let prev = i.checked_sub(1).and_then(|p| flow.get(p));
            yogaflow::coach_tip(&ctx.catalog, &cfg.safety, prev, id)
        })
        .collect();

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "seed": seed,
            "request": request,
            "flow": flow,
            "tips": tips,
            "plan": plan,
            "total_seconds": plan.total_seconds(),
        }));
    }

    println!(
        "{} min, intensity {}, focus {} (seed {seed})",
        args.minutes,
        args.intensity,
        args.focus.as_tag()
    );
    for (i, id) in flow.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>4}s  {}",
            i + 1,
            ctx.pose_name(id),
            plan.durations[i],
            tips[i].message()
        );
    }
    println!("total {}", format_seconds(plan.total_seconds()));
    Ok(())
}

fn cmd_check(ctx: &Ctx, args: FlowArgs) -> anyhow::Result<()> {
    let cfg = &ctx.config;
    let flow = to_sequence(&args.flow);
    let adjusted = yogaflow::apply_safety_adjustments(&ctx.catalog, &cfg.safety, &flow);
    let unknown_in_flow: Vec<&PoseId> = flow
        .iter()
        .filter(|id| ctx.catalog.lookup(id).is_none())
        .collect();
    let unknown_in_config = cfg.unknown_pose_ids(&ctx.catalog);

    for id in &unknown_in_flow {
        tracing::warn!(pose = %id, "pose not in catalog");
    }
    for id in &unknown_in_config {
        tracing::warn!(pose = %id, "configured pose not in catalog");
    }

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "input": flow,
            "adjusted": adjusted,
            "safe": adjusted == flow,
            "unknown_poses": unknown_in_flow,
            "unknown_config_poses": unknown_in_config,
        }));
    }

    if adjusted == flow {
        println!("flow is safe as given");
    } else {
        println!(
            "inserted {} pose(s):",
            adjusted.len().saturating_sub(flow.len())
        );
        for (i, id) in adjusted.iter().enumerate() {
            println!("{:>3}. {}", i + 1, ctx.pose_name(id));
        }
    }
    Ok(())
}

fn cmd_suggest(ctx: &Ctx, args: SuggestArgs) -> anyhow::Result<()> {
    let cfg = &ctx.config;
    let scorer = Scorer::new(&cfg.scoring, &cfg.safety);

    if !args.after.is_empty() {
        let flow = to_sequence(&args.after);
        let next: Vec<&PoseId> =
            yogaflow::next_pose_suggestions(scorer, &ctx.catalog, &flow, args.count)
                .into_iter()
                .map(|p| &p.id)
                .collect();
        if ctx.json {
            return ctx.print_json(&serde_json::json!({ "after": flow, "next": next }));
        }
        for id in next {
            println!("{}", ctx.pose_name(id));
        }
        return Ok(());
    }

    let Some(from) = args.from.as_deref() else {
        let openers: Vec<&PoseId> = yogaflow::starting_pose_suggestions(&ctx.catalog, args.count)
            .into_iter()
            .map(|p| &p.id)
            .collect();
        if ctx.json {
            return ctx.print_json(&serde_json::json!({ "start": openers }));
        }
        for id in openers {
            println!("{}", ctx.pose_name(id));
        }
        return Ok(());
    };

    let from = ctx
        .catalog
        .lookup(&PoseId::new(from))
        .with_context(|| format!("unknown pose '{from}'"))?;

    if let Some(to) = args.to.as_deref() {
        let to = ctx
            .catalog
            .lookup(&PoseId::new(to))
            .with_context(|| format!("unknown pose '{to}'"))?;
        let direct = scorer.score(Some(from), Some(to));
        let bridge = yogaflow::suggest_transition_pose(
            scorer,
            Some(from),
            Some(to),
            ctx.catalog.poses(),
        );
        if ctx.json {
            return ctx.print_json(&serde_json::json!({
                "from": from.id,
                "to": to.id,
                "score": direct,
                "bridge": bridge.map(|p| &p.id),
            }));
        }
        match bridge {
            Some(p) => println!("bridge with {} (direct score {direct:.1})", ctx.pose_name(&p.id)),
            None => println!("direct transition is fine (score {direct:.1})"),
        }
        return Ok(());
    }

    let candidates: Vec<_> = ctx
        .catalog
        .poses()
        .iter()
        .filter(|p| p.id != from.id)
        .cloned()
        .collect();
    let mut rng = Rng64::new(seed_or_clock(args.seed));
    let next =
        yogaflow::select_best_transition_poses(scorer, Some(from), &candidates, args.count, &mut rng);

    if ctx.json {
        let ranked: Vec<_> = next
            .iter()
            .map(|p| serde_json::json!({ "id": p.id, "score": scorer.score(Some(from), Some(p)) }))
            .collect();
        return ctx.print_json(&serde_json::json!({ "from": from.id, "next": ranked }));
    }
    for p in &next {
        println!(
            "{:<28} {:>6.1}",
            ctx.pose_name(&p.id),
            scorer.score(Some(from), Some(p))
        );
    }
    Ok(())
}

fn cmd_palette(ctx: &Ctx, args: PaletteArgs) -> anyhow::Result<()> {
    let poses =
        yogaflow::suggestion_palette(&ctx.catalog, args.intensity, args.focus, args.limit);
    if ctx.json {
        let ids: Vec<&PoseId> = poses.iter().map(|p| &p.id).collect();
        return ctx.print_json(&serde_json::json!({ "palette": ids }));
    }
    for p in poses {
        let focused = if p.has_focus(args.focus.as_tag()) { "*" } else { "" };
        println!(
            "{:<28} {}{focused}",
            ctx.pose_name(&p.id),
            p.intensity.unwrap_or(3)
        );
    }
    Ok(())
}

fn cmd_timing(ctx: &Ctx, args: TimingArgs) -> anyhow::Result<()> {
    let mut timing = ctx.config.timing.clone();
    if args.breaths {
        timing.mode = TimingMode::Breaths;
    }
    if let Some(t) = args.tempo {
        timing.tempo = Tempo::new(t);
    }

    let flow = to_sequence(&args.flow.flow);
    let mut overrides = DurationOverrides::new();
    for (index, value) in args.overrides {
        if index >= flow.len() {
            tracing::warn!(index, len = flow.len(), "override index out of range, ignored");
            continue;
        }
        if let Some(secs) = yogaflow::override_from_input(value, &timing) {
            overrides.insert(index, secs);
        }
    }

    let plan = SessionPlan::from_flow(&ctx.catalog, &flow, &overrides, &timing);

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "flow": flow,
            "overrides": overrides,
            "plan": plan,
            "total_seconds": plan.total_seconds(),
        }));
    }

    for (i, id) in flow.iter().enumerate() {
        let mark = if overrides.get(i).is_some() { "*" } else { "" };
        println!(
            "{:>3}. {:<28} {:>4}s{mark}",
            i + 1,
            ctx.pose_name(id),
            plan.durations[i]
        );
    }
    println!(
        "transitions {}s, cooldown {}s, total {}",
        plan.transition_seconds,
        plan.cooldown_seconds,
        format_seconds(plan.total_seconds())
    );
    Ok(())
}
