use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::{Path, PathBuf};

use rice_calc::config::Config;
use rice_calc::initiative::{
    AcquireReach, ConfidenceInput, EffortInput, ImpactInput, Initiative, OptimiseReach,
    ReachInput,
};
use rice_calc::output;
use rice_calc::scoring::{self, PortfolioTotals};
use rice_calc::store::{self, Store};
use rice_calc::transfer;

const EXIT_SUCCESS: i32 = 0;
const EXIT_STORE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List initiatives ranked by RICE score (default if no subcommand)
    List {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show every driver and score for one initiative
    Show {
        /// Rank of the initiative (1-based, as shown in list)
        index: usize,
    },
    /// Add a new initiative
    Add {
        #[command(flatten)]
        drivers: DriverArgs,
    },
    /// Change drivers of an existing initiative
    Edit {
        /// Rank of the initiative (1-based, as shown in list)
        index: usize,
        #[command(flatten)]
        drivers: DriverArgs,
    },
    /// Delete an initiative
    Remove {
        /// Rank of the initiative (1-based, as shown in list)
        index: usize,
    },
    /// Show or set the monthly revenue per user used for ARR uplift
    Arpu {
        /// New monthly ARPU (must be positive)
        value: Option<f64>,
    },
    /// Replace stored initiatives with the contents of an export file
    Import { file: PathBuf },
    /// Write all initiatives to a JSON export file
    Export { file: PathBuf },
    /// Add the example initiatives
    Sample,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum ReachMode {
    /// Adoption uplift within the existing user base
    Optimise,
    /// New users from a new acquisition channel
    Acquire,
}

/// Driver flags shared by `add` and `edit`. Omitted flags keep their value.
/// User counts accept k-notation ("5.1k").
#[derive(Args, Debug, Default)]
struct DriverArgs {
    #[arg(long)]
    title: Option<String>,

    /// Reach formula to use
    #[arg(long, value_enum)]
    mode: Option<ReachMode>,
    /// [optimise] Users eligible today
    #[arg(long)]
    eligible_today: Option<String>,
    /// [optimise] New eligible users per month
    #[arg(long)]
    monthly_growth: Option<String>,
    /// [optimise] Current adoption %
    #[arg(long)]
    current_adoption: Option<f64>,
    /// [acquire] New users per month in the serviceable obtainable market
    #[arg(long)]
    monthly_new_eligible: Option<String>,
    /// Target adoption % (optimise) or adoption % of newcomers (acquire)
    #[arg(long)]
    adoption: Option<f64>,
    #[arg(long)]
    reach_context: Option<String>,

    /// User value, 1-5
    #[arg(long)]
    user_value: Option<f64>,
    /// Business value, 1-5
    #[arg(long)]
    business_value: Option<f64>,
    /// Strategic fit, 1-5
    #[arg(long)]
    strategic_fit: Option<f64>,
    #[arg(long)]
    impact_context: Option<String>,

    /// Data quality %, 0-100
    #[arg(long)]
    data_quality: Option<f64>,
    /// Precedent similarity %, 0-100
    #[arg(long)]
    precedent: Option<f64>,
    /// Delivery confidence %, 0-100
    #[arg(long)]
    delivery: Option<f64>,
    #[arg(long)]
    confidence_context: Option<String>,

    /// Frontend effort in hours
    #[arg(long)]
    frontend: Option<f64>,
    /// Backend effort in hours
    #[arg(long)]
    backend: Option<f64>,
    /// Design effort in hours
    #[arg(long)]
    design: Option<f64>,
    /// Product management effort in hours
    #[arg(long)]
    pm: Option<f64>,
    #[arg(long)]
    effort_context: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "rice-calc")]
#[command(about = "RICE prioritization calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rice-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to store file (defaults to ~/.config/rice-calc/store.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Bad command-line input; exits with EXIT_CONFIG instead of EXIT_STORE
#[derive(Debug)]
struct UsageError(String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

fn usage_error(msg: impl Into<String>) -> anyhow::Error {
    UsageError(msg.into()).into()
}

struct AppContext {
    verbose: bool,
    config: Config,
    store_path: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List { tsv: false });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match rice_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = rice_calc::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let store_path = match rice_calc::config::resolve_store_path(cli.store, &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!("Store: {}", store_path.display());
        eprintln!(
            "Default ARPU: {}{}",
            config.currency(),
            output::to_fixed(config.default_arpu(), 2)
        );
    }

    let ctx = AppContext {
        verbose: cli.verbose,
        config,
        store_path,
    };

    if let Err(e) = run(&ctx, command) {
        eprintln!("Error: {:#}", e);
        if e.downcast_ref::<UsageError>().is_some() {
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_STORE);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    let mut store = store::load_store(&ctx.store_path, ctx.config.default_arpu())?;

    if ctx.verbose {
        eprintln!("Loaded {} initiatives", store.entries.len());
    }

    match command {
        Commands::List { tsv } => list(ctx, &store, tsv),
        Commands::Show { index } => {
            let ranked = scoring::rank(&store.entries);
            let entry = ranked
                .get(checked_index(index, ranked.len())?)
                .context("Initiative not found")?;
            println!(
                "{}",
                output::format_initiative_detail(index, entry, output::should_use_colors())
            );
            Ok(())
        }
        Commands::Add { drivers } => {
            let title = drivers
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| usage_error("--title is required when adding an initiative"))?;

            let mode = drivers.mode.unwrap_or(if drivers.monthly_new_eligible.is_some() {
                ReachMode::Acquire
            } else {
                ReachMode::Optimise
            });
            let reach = match mode {
                ReachMode::Optimise => ReachInput::Optimise(OptimiseReach::default()),
                ReachMode::Acquire => ReachInput::Acquire(AcquireReach::default()),
            };

            let mut initiative = Initiative::new(
                title,
                reach,
                ImpactInput::default(),
                ConfidenceInput::default(),
                EffortInput::default(),
            );
            apply_drivers(&mut initiative, &drivers)?;
            warn_out_of_range(&initiative);

            println!("Added '{}' ({})", initiative.title, initiative.short_id());
            store.add(initiative);
            save(ctx, &store)
        }
        Commands::Edit { index, drivers } => {
            let id = id_at_rank(&store, index)?;
            // Validate on a copy so a rejected flag leaves the store untouched
            let mut edited = store.get(&id).cloned().context("Initiative not found")?;
            apply_drivers(&mut edited, &drivers)?;
            warn_out_of_range(&edited);

            store.update(&id, |entry| *entry = edited);
            println!("Updated '{}'", store.get(&id).map_or("", |e| e.title.as_str()));
            save(ctx, &store)
        }
        Commands::Remove { index } => {
            let id = id_at_rank(&store, index)?;
            let title = store.get(&id).map(|e| e.title.clone()).unwrap_or_default();
            store.remove(&id);
            println!("Removed '{}'", title);
            save(ctx, &store)
        }
        Commands::Arpu { value } => {
            if let Some(value) = value {
                if !store.set_arpu(value) {
                    return Err(usage_error(format!(
                        "ARPU must be a positive number, got {}",
                        value
                    )));
                }
                save(ctx, &store)?;
            }
            println!(
                "Monthly ARPU: {}{}",
                ctx.config.currency(),
                output::to_fixed(store.arpu, 2)
            );
            Ok(())
        }
        Commands::Import { file } => import(ctx, &mut store, &file),
        Commands::Export { file } => {
            let data = transfer::export_entries(&store.entries, Utc::now());
            transfer::write_export(&file, &data)?;
            println!(
                "Exported {} initiatives to {}",
                data.entries.len(),
                file.display()
            );
            Ok(())
        }
        Commands::Sample => {
            let samples = store::sample_entries(Utc::now())?;
            let count = samples.len();
            for initiative in samples {
                store.add(initiative);
            }
            println!("Added {} sample initiatives", count);
            save(ctx, &store)
        }
    }
}

fn list(ctx: &AppContext, store: &Store, tsv: bool) -> Result<()> {
    let ranked = scoring::rank(&store.entries);

    if ctx.verbose {
        for entry in &ranked {
            if let Err(errors) = scoring::validate_initiative(entry.initiative) {
                eprintln!("'{}' has out-of-range drivers:", entry.initiative.title);
                for error in errors {
                    eprintln!("  - {}", error);
                }
            }
        }
    }

    if tsv {
        let out = output::format_tsv(&ranked);
        if !out.is_empty() {
            println!("{}", out);
        }
        return Ok(());
    }

    let totals = PortfolioTotals::from_ranked(&ranked, store.arpu);
    println!(
        "{}",
        output::format_ranked_table(
            &ranked,
            &totals,
            store.arpu,
            ctx.config.currency(),
            output::should_use_colors()
        )
    );
    Ok(())
}

fn import(ctx: &AppContext, store: &mut Store, file: &Path) -> Result<()> {
    let report = transfer::read_import(file)?;

    if ctx.verbose {
        eprintln!(
            "Import file version {}, exported {}",
            report.data.version, report.data.export_date
        );
        for warning in &report.warnings {
            eprintln!("  {}", warning);
        }
    }
    if report.skipped > 0 {
        eprintln!("Skipped {} invalid entries", report.skipped);
    }

    let count = report.data.entries.len();
    store.replace_entries(report.data.entries);
    save(ctx, store)?;
    println!("Imported {} initiatives from {}", count, file.display());
    Ok(())
}

fn save(ctx: &AppContext, store: &Store) -> Result<()> {
    store::save_store(&ctx.store_path, store)?;
    if ctx.verbose {
        eprintln!("Saved {} initiatives", store.entries.len());
    }
    Ok(())
}

fn checked_index(index: usize, len: usize) -> Result<usize> {
    if index < 1 || index > len {
        return Err(usage_error(format!(
            "Invalid index {}. Must be between 1 and {}.",
            index, len
        )));
    }
    Ok(index - 1)
}

/// Map a 1-based rank from `list` to the stored initiative's id
fn id_at_rank(store: &Store, index: usize) -> Result<String> {
    let ranked = scoring::rank(&store.entries);
    let entry = ranked
        .get(checked_index(index, ranked.len())?)
        .context("Initiative not found")?;
    Ok(entry.initiative.id.clone())
}

fn warn_out_of_range(initiative: &Initiative) {
    if let Err(errors) = scoring::validate_initiative(initiative) {
        eprintln!("Warning: some drivers are outside their expected range:");
        for error in errors {
            eprintln!("  - {}", error);
        }
    }
}

fn parse_count(flag: &str, value: &str) -> Result<f64> {
    if !output::is_valid_display_number(value) {
        return Err(usage_error(format!(
            "--{}: '{}' is not a number (k-notation like 5.1k is allowed)",
            flag, value
        )));
    }
    let count = output::parse_display_number(value);
    if !count.is_finite() {
        return Err(usage_error(format!("--{}: '{}' is out of range", flag, value)));
    }
    Ok(count)
}

impl DriverArgs {
    /// Numeric flags by name, for checks that apply to all of them
    fn numeric_flags(&self) -> [(&'static str, Option<f64>); 12] {
        [
            ("current-adoption", self.current_adoption),
            ("adoption", self.adoption),
            ("user-value", self.user_value),
            ("business-value", self.business_value),
            ("strategic-fit", self.strategic_fit),
            ("data-quality", self.data_quality),
            ("precedent", self.precedent),
            ("delivery", self.delivery),
            ("frontend", self.frontend),
            ("backend", self.backend),
            ("design", self.design),
            ("pm", self.pm),
        ]
    }
}

fn set_if_some(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn apply_drivers(initiative: &mut Initiative, args: &DriverArgs) -> Result<()> {
    // JSON has no NaN or infinity, so these would make the store unreadable
    for (flag, value) in args.numeric_flags() {
        if let Some(v) = value.filter(|v| !v.is_finite()) {
            return Err(usage_error(format!("--{}: '{}' is not a finite number", flag, v)));
        }
    }

    if let Some(ref title) = args.title {
        if title.trim().is_empty() {
            return Err(usage_error("--title must not be empty"));
        }
        initiative.title = title.clone();
    }

    // Switching mode starts the new variant fresh, keeping adoption % and context
    if let Some(mode) = args.mode {
        initiative.reach = match (mode, &initiative.reach) {
            (ReachMode::Optimise, ReachInput::Acquire(r)) => ReachInput::Optimise(OptimiseReach {
                adoption_rate_percentage: r.adoption_rate_percentage,
                context: r.context.clone(),
                ..OptimiseReach::default()
            }),
            (ReachMode::Acquire, ReachInput::Optimise(r)) => ReachInput::Acquire(AcquireReach {
                adoption_rate_percentage: r.adoption_rate_percentage,
                context: r.context.clone(),
                ..AcquireReach::default()
            }),
            (_, current) => current.clone(),
        };
    }

    match &mut initiative.reach {
        ReachInput::Optimise(r) => {
            if args.monthly_new_eligible.is_some() {
                return Err(usage_error(
                    "--monthly-new-eligible only applies to acquire mode (use --mode acquire)",
                ));
            }
            if let Some(ref v) = args.eligible_today {
                r.eligible_today = parse_count("eligible-today", v)?;
            }
            if let Some(ref v) = args.monthly_growth {
                r.monthly_growth = parse_count("monthly-growth", v)?;
            }
            set_if_some(&mut r.current_adoption_percentage, args.current_adoption);
            set_if_some(&mut r.adoption_rate_percentage, args.adoption);
            if args.reach_context.is_some() {
                r.context = args.reach_context.clone();
            }
        }
        ReachInput::Acquire(r) => {
            if args.eligible_today.is_some()
                || args.monthly_growth.is_some()
                || args.current_adoption.is_some()
            {
                return Err(usage_error(
                    "--eligible-today, --monthly-growth and --current-adoption only apply to optimise mode (use --mode optimise)",
                ));
            }
            if let Some(ref v) = args.monthly_new_eligible {
                r.monthly_new_eligible = parse_count("monthly-new-eligible", v)?;
            }
            set_if_some(&mut r.adoption_rate_percentage, args.adoption);
            if args.reach_context.is_some() {
                r.context = args.reach_context.clone();
            }
        }
    }

    let impact = &mut initiative.impact_drivers;
    set_if_some(&mut impact.user_value, args.user_value);
    set_if_some(&mut impact.business_value, args.business_value);
    set_if_some(&mut impact.strategic_fit, args.strategic_fit);
    if args.impact_context.is_some() {
        impact.context = args.impact_context.clone();
    }

    let confidence = &mut initiative.confidence_drivers;
    set_if_some(&mut confidence.data_quality, args.data_quality);
    set_if_some(&mut confidence.precedent_similarity, args.precedent);
    set_if_some(&mut confidence.delivery_confidence, args.delivery);
    if args.confidence_context.is_some() {
        confidence.context = args.confidence_context.clone();
    }

    let effort = &mut initiative.effort;
    set_if_some(&mut effort.frontend, args.frontend);
    set_if_some(&mut effort.backend, args.backend);
    set_if_some(&mut effort.design, args.design);
    set_if_some(&mut effort.pm, args.pm);
    if args.effort_context.is_some() {
        effort.context = args.effort_context.clone();
    }

    Ok(())
}
