// ABOUTME: Command-line interface for the clashdice combat dice roller.
// ABOUTME: Loads a face table from JSON, resolves rolls, and runs simulation loops.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clashdice::{
    FaceTable, FastRng, FixedDie, Pool, PrioritySymbol, RerollCondition, RollConfig, RollOutcome,
    SelectiveReroll, SymbolKind,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "clashdice")]
#[command(about = "A dice-pool combat roller with rerolls and state effects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single roll
    Roll {
        #[command(flatten)]
        roll: RollArgs,

        /// Print each die's face and symbols
        #[arg(long)]
        detailed: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve many rolls and histogram one symbol's aggregate count
    Sim {
        #[command(flatten)]
        roll: RollArgs,

        /// Number of trials to run
        #[arg(short, long, default_value = "10000")]
        n: usize,

        /// Symbol to histogram (hit, block, special, hollow_hit, ...)
        #[arg(long, default_value = "hit")]
        symbol: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct RollArgs {
    /// Face table JSON: { "<color>": [ { "<symbol>": count, ... } x8 ] }
    #[arg(long)]
    table: PathBuf,

    /// Dice pool, e.g. "red=3,white=2"
    #[arg(long)]
    pool: String,

    /// RNG seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Force a die's face, e.g. "red=4" (repeatable)
    #[arg(long = "fix")]
    fixed: Vec<String>,

    /// Full-reroll trigger
    #[arg(long, value_enum)]
    reroll: Option<RerollWhen>,

    /// Symbol the full-reroll trigger watches
    #[arg(long, default_value = "hit")]
    reroll_symbol: String,

    /// Threshold for the "threshold" trigger
    #[arg(long)]
    reroll_threshold: Option<u32>,

    /// Selectively reroll up to N underperforming dice
    #[arg(long, value_name = "N")]
    selective: Option<usize>,

    /// Symbol family selective rerolls chase
    #[arg(long, value_enum, default_value = "hits")]
    priority: PriorityArg,

    /// Count hollow symbols as filled when scoring dice
    #[arg(long)]
    hollow: bool,

    /// Apply the Disarmed state effect
    #[arg(long)]
    disarmed: bool,

    /// Apply the Vulnerable state effect
    #[arg(long)]
    vulnerable: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RerollWhen {
    /// Reroll when the symbol count is below the pool's expectation
    BelowExpected,
    /// Reroll when the symbol count is below --reroll-threshold
    Threshold,
    /// Reroll when the symbol is absent entirely
    Absent,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Hits,
    Blocks,
    Specials,
}

impl From<PriorityArg> for PrioritySymbol {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Hits => PrioritySymbol::Hits,
            PriorityArg::Blocks => PrioritySymbol::Blocks,
            PriorityArg::Specials => PrioritySymbol::Specials,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Roll { roll, detailed, json } => {
            let (pool, table, config, fixed, seed) = prepare(&roll);
            let mut rng = rng_from(seed);
            let outcome = clashdice::resolve_roll(&pool, &table, &config, &fixed, &mut rng);
            if json {
                print_roll_json(&outcome);
            } else {
                print_roll(&outcome, detailed);
            }
        }
        Commands::Sim { roll, n, symbol, json } => {
            let (pool, table, config, fixed, seed) = prepare(&roll);
            let symbol = parse_symbol(&symbol);
            let mut rng = rng_from(seed);

            let mut distribution: HashMap<u32, usize> = HashMap::new();
            let mut sum: u64 = 0;
            let mut sum_sq: u64 = 0;
            for _ in 0..n {
                let outcome = clashdice::resolve_roll(&pool, &table, &config, &fixed, &mut rng);
                let count = outcome.totals.get(symbol);
                *distribution.entry(count).or_insert(0) += 1;
                sum += count as u64;
                sum_sq += (count as u64) * (count as u64);
            }
            let mean = sum as f64 / n as f64;
            let variance = (sum_sq as f64 / n as f64) - mean * mean;
            let std_dev = variance.sqrt();

            if json {
                print_sim_json(symbol, n, mean, std_dev, &distribution);
            } else {
                print_sim_histogram(symbol, n, mean, std_dev, &distribution);
            }
        }
    }
}

fn prepare(args: &RollArgs) -> (Pool, FaceTable, RollConfig, Vec<FixedDie>, Option<u64>) {
    let table = load_table(&args.table);
    let pool = parse_pool(&args.pool);
    let fixed = parse_fixed(&args.fixed);
    let config = build_config(args);
    (pool, table, config, fixed, args.seed)
}

fn rng_from(seed: Option<u64>) -> FastRng {
    match seed {
        Some(seed) => FastRng::with_seed(seed),
        None => FastRng::new(),
    }
}

fn build_config(args: &RollArgs) -> RollConfig {
    let full_reroll = args.reroll.map(|when| {
        let symbol = parse_symbol(&args.reroll_symbol);
        match when {
            RerollWhen::BelowExpected => RerollCondition::BelowExpected { symbol },
            RerollWhen::Threshold => RerollCondition::MinSymbolThreshold {
                symbol,
                threshold: args.reroll_threshold.unwrap_or(0),
            },
            RerollWhen::Absent => RerollCondition::SymbolAbsent { symbol },
        }
    });

    let selective_reroll = args.selective.map(|max_dice| SelectiveReroll {
        priority: args.priority.into(),
        count_hollow_as_filled: args.hollow,
        max_dice,
    });

    RollConfig {
        full_reroll,
        selective_reroll,
        disarmed: args.disarmed,
        vulnerable: args.vulnerable,
    }
}

type RawTable = HashMap<String, Vec<HashMap<String, u32>>>;

fn load_table(path: &PathBuf) -> FaceTable {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => fail(&format!("reading {}: {}", path.display(), e)),
    };
    let raw: RawTable = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => fail(&format!("parsing {}: {}", path.display(), e)),
    };

    let mut table = FaceTable::new();
    for (color, raw_faces) in raw {
        let mut faces = Vec::with_capacity(raw_faces.len());
        for raw_face in raw_faces {
            let mut symbols = Vec::new();
            for (name, count) in raw_face {
                let kind: SymbolKind = match name.parse() {
                    Ok(kind) => kind,
                    Err(e) => fail(&format!("color '{}': {}", color, e)),
                };
                symbols.extend(std::iter::repeat(kind).take(count as usize));
            }
            faces.push(clashdice::Face::new(symbols));
        }
        if let Err(e) = table.insert(&color, faces) {
            fail(&e.to_string());
        }
    }
    table
}

fn parse_pool(input: &str) -> Pool {
    let mut pool = Pool::new();
    for entry in input.split(',').filter(|s| !s.trim().is_empty()) {
        let Some((color, count)) = entry.split_once('=') else {
            fail(&format!("pool entry '{}' is not color=count", entry));
        };
        let count: i64 = match count.trim().parse() {
            Ok(count) => count,
            Err(_) => fail(&format!("pool count '{}' is not an integer", count)),
        };
        pool.set(color, count);
    }
    pool
}

fn parse_fixed(entries: &[String]) -> Vec<FixedDie> {
    let mut fixed = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some((color, index)) = entry.split_once('=') else {
            fail(&format!("fixed die '{}' is not color=face", entry));
        };
        let index: usize = match index.trim().parse() {
            Ok(index) => index,
            Err(_) => fail(&format!("face index '{}' is not an integer", index)),
        };
        match FixedDie::new(color, index) {
            Ok(die) => fixed.push(die),
            Err(e) => fail(&e.to_string()),
        }
    }
    fixed
}

fn parse_symbol(name: &str) -> SymbolKind {
    match name.parse() {
        Ok(kind) => kind,
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn print_roll(outcome: &RollOutcome, detailed: bool) {
    if detailed {
        for die in &outcome.dice {
            println!("{}", die);
        }
        if !outcome.dice.is_empty() {
            println!();
        }
    }
    println!("totals: {}", outcome.totals);
    if outcome.stats.full_rerolls > 0 || outcome.stats.dice_rerolled > 0 {
        println!(
            "rerolls: {} full, {} dice",
            outcome.stats.full_rerolls, outcome.stats.dice_rerolled
        );
    }
}

fn print_roll_json(outcome: &RollOutcome) {
    use serde_json::json;

    let totals: HashMap<String, u32> = SymbolKind::ALL
        .into_iter()
        .map(|kind| (kind.to_string(), outcome.totals.get(kind)))
        .collect();
    let dice: Vec<_> = outcome
        .dice
        .iter()
        .map(|die| {
            let counts: HashMap<String, u32> = SymbolKind::ALL
                .into_iter()
                .map(|kind| (kind.to_string(), die.counts.get(kind)))
                .collect();
            json!({
                "color": die.color,
                "face": die.face_index,
                "counts": counts,
            })
        })
        .collect();

    let output = json!({
        "totals": totals,
        "dice": dice,
        "full_rerolls": outcome.stats.full_rerolls,
        "dice_rerolled": outcome.stats.dice_rerolled,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&e.to_string()),
    }
}

fn print_sim_json(
    symbol: SymbolKind,
    n: usize,
    mean: f64,
    std_dev: f64,
    distribution: &HashMap<u32, usize>,
) {
    use serde_json::json;

    let output = json!({
        "symbol": symbol.to_string(),
        "n": n,
        "mean": mean,
        "std_dev": std_dev,
        "distribution": distribution,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&e.to_string()),
    }
}

fn print_sim_histogram(
    symbol: SymbolKind,
    n: usize,
    mean: f64,
    std_dev: f64,
    distribution: &HashMap<u32, usize>,
) {
    println!("{} (n={})", symbol, n);
    println!();

    let mut outcomes: Vec<(u32, usize)> = distribution.iter().map(|(&k, &v)| (k, v)).collect();
    outcomes.sort_by_key(|(k, _)| *k);
    let max_count = outcomes.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let max_bar_width = 40;

    for (value, count) in outcomes {
        let pct = (count as f64 / n as f64) * 100.0;
        let bar_width = (count as f64 / max_count as f64 * max_bar_width as f64) as usize;
        let bar: String = "█".repeat(bar_width);

        println!("{:>4}: {:40} {:5.1}%", value, bar, pct);
    }

    println!();
    println!("mean: {:.2}, std: {:.2}", mean, std_dev);
}
