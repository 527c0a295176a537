//! priceintel - Localized text and purchase flows for the PriceIntelligence site

use clap::{Parser, Subcommand, ValueEnum};
use libpriceintel::demo::{MetricsSnapshot, MetricsTicker};
use libpriceintel::error::{LocaleError, WizardError};
use libpriceintel::i18n::{
    interpolate, Locale, LocaleResolver, LocaleSource, StaticLanguageDetector,
};
use libpriceintel::logging::{LogFormat, LoggingConfig};
use libpriceintel::plans::PlanId;
use libpriceintel::wizard::{Submission, Transition, Wizard};
use libpriceintel::{Config, PriceIntelError, PriceIntelService, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

#[derive(Parser, Debug)]
#[command(name = "priceintel")]
#[command(about = "Localized text and purchase flows for the PriceIntelligence site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json, pretty)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Preferred languages to use instead of the environment (e.g. zh,en)
    #[arg(long, global = true, value_delimiter = ',')]
    lang_hint: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the active locale, or change it
    Locale {
        #[command(subcommand)]
        action: Option<LocaleCommand>,
    },

    /// Resolve a text key in the active locale
    T {
        /// Catalog key (e.g. nav.pricing)
        key: String,

        /// Placeholder value, NAME=VALUE (repeatable)
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,

        /// Resolve in this locale instead of the active one
        #[arg(long)]
        locale: Option<String>,
    },

    /// Report catalog keys missing from each locale
    Check,

    /// List pricing plans
    Plans,

    /// Run the purchase wizard for a plan
    Purchase {
        /// Plan name (starter, professional, enterprise)
        #[arg(long)]
        plan: String,

        /// Field value, NAME=VALUE (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },

    /// Send a message through the contact form
    Contact {
        /// Preselected reason (pricing, demo, enterprise, support, partnership, other)
        #[arg(long)]
        reason: Option<String>,

        /// Field value, NAME=VALUE (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },

    /// Print live demo metrics
    Demo {
        /// Number of snapshots to print
        #[arg(long, default_value_t = 5)]
        ticks: u64,

        /// Seed for a reproducible walk
        #[arg(long)]
        seed: Option<u64>,

        /// Compute snapshots immediately instead of waiting for each period
        #[arg(long)]
        no_wait: bool,
    },
}

#[derive(Subcommand, Debug)]
enum LocaleCommand {
    /// Switch the active locale and remember it
    Set {
        /// Locale code (en, es, zh)
        code: String,
    },

    /// List supported locales
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging = LoggingConfig::from_env();
    if let Some(format) = &cli.log_format {
        logging.format = format
            .parse::<LogFormat>()
            .map_err(PriceIntelError::InvalidInput)?;
    }
    logging.verbose = cli.verbose;
    logging.init();
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let service = if cli.lang_hint.is_empty() {
        PriceIntelService::from_config(config)?
    } else {
        let detector = StaticLanguageDetector::new(cli.lang_hint.iter().map(|l| l.trim()));
        PriceIntelService::with_detector(config, &detector)?
    };
    let format = cli.format;

    match cli.command {
        Commands::Locale { action: None } => show_locale(service.locale(), format),
        Commands::Locale {
            action: Some(LocaleCommand::Set { code }),
        } => {
            let locale = service.locale().set_locale(&code)?;
            println!("{}", locale);
            Ok(())
        }
        Commands::Locale {
            action: Some(LocaleCommand::List),
        } => list_locales(service.locale(), format),
        Commands::T { key, args, locale } => translate(service.locale(), &key, &args, locale),
        Commands::Check => check_catalogs(service.locale(), format),
        Commands::Plans => list_plans(&service, format),
        Commands::Purchase { plan, fields } => {
            let id: PlanId = plan.parse()?;
            let wizard = service.open_plan(id);
            complete_wizard(&service, &wizard, Some(id), &fields, format).await
        }
        Commands::Contact { reason, fields } => {
            let wizard = service.open_contact(reason.as_deref());
            complete_wizard(&service, &wizard, None, &fields, format).await
        }
        Commands::Demo {
            ticks,
            seed,
            no_wait,
        } => run_demo(&service, ticks, seed, no_wait, format).await,
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PriceIntelError::InvalidInput(format!("Failed to encode output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Split `NAME=VALUE`
fn parse_pair(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(PriceIntelError::InvalidInput(format!(
            "Expected NAME=VALUE, got '{}'",
            raw
        ))),
    }
}

fn source_label(source: LocaleSource) -> &'static str {
    match source {
        LocaleSource::Stored => "saved preference",
        LocaleSource::Environment => "environment",
        LocaleSource::Default => "default",
    }
}

fn show_locale(resolver: &LocaleResolver, format: OutputFormat) -> Result<()> {
    let locale = resolver.current_locale();
    let detection = resolver.detection();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "locale": locale,
            "name": locale.native_name(),
            "source": detection.source,
            "default": resolver.default_locale(),
        })),
        OutputFormat::Text => {
            println!(
                "{} ({}) from {}",
                locale,
                locale.native_name(),
                source_label(detection.source)
            );
            Ok(())
        }
    }
}

fn list_locales(resolver: &LocaleResolver, format: OutputFormat) -> Result<()> {
    let current = resolver.current_locale();

    match format {
        OutputFormat::Json => {
            let locales: Vec<serde_json::Value> = resolver
                .supported_locales()
                .iter()
                .map(|l| {
                    serde_json::json!({
                        "code": l,
                        "name": l.native_name(),
                        "active": *l == current,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(locales))
        }
        OutputFormat::Text => {
            for locale in resolver.supported_locales() {
                let marker = if *locale == current { "*" } else { " " };
                println!("{} {}  {}", marker, locale, locale.native_name());
            }
            Ok(())
        }
    }
}

fn translate(
    resolver: &LocaleResolver,
    key: &str,
    raw_args: &[String],
    locale: Option<String>,
) -> Result<()> {
    let args = raw_args
        .iter()
        .map(|raw| parse_pair(raw))
        .collect::<Result<Vec<_>>>()?;

    let template = match locale {
        Some(code) => {
            let locale: Locale = code.parse()?;
            resolver.resolve_in(locale, key)
        }
        None => resolver.resolve(key),
    };
    println!("{}", interpolate(&template, &args));
    Ok(())
}

fn check_catalogs(resolver: &LocaleResolver, format: OutputFormat) -> Result<()> {
    let report: BTreeMap<String, Vec<String>> = resolver
        .catalogs()
        .coverage_report()
        .into_iter()
        .map(|(locale, missing)| (locale.code().to_string(), missing))
        .collect();
    let total_missing: usize = report.values().map(Vec::len).sum();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "default": resolver.default_locale(),
            "missing": report,
        }))?,
        OutputFormat::Text => {
            for (code, missing) in &report {
                if missing.is_empty() {
                    println!("{}: complete", code);
                } else {
                    println!("{}: {} missing", code, missing.len());
                    for key in missing {
                        println!("  {}", key);
                    }
                }
            }
        }
    }

    if total_missing > 0 {
        return Err(LocaleError::Catalog(format!(
            "{} translation(s) missing",
            total_missing
        ))
        .into());
    }
    Ok(())
}

fn list_plans(service: &PriceIntelService, format: OutputFormat) -> Result<()> {
    let resolver = service.locale();

    match format {
        OutputFormat::Json => {
            let plans = serde_json::to_value(service.plans()).map_err(|e| {
                PriceIntelError::InvalidInput(format!("Failed to encode plans: {}", e))
            })?;
            print_json(&plans)
        }
        OutputFormat::Text => {
            for plan in service.plans() {
                let popular = if plan.popular { "  [Most Popular]" } else { "" };
                println!(
                    "{} - {}{}",
                    resolver.resolve(&plan.name_key()),
                    plan.price,
                    popular
                );
                println!("  {}", plan.description);
                for feature in plan.features {
                    println!("  + {}", feature);
                }
                println!("  > {}", plan.button_label());
            }
            Ok(())
        }
    }
}

/// Localized text for a rule message, falling back to its English form
fn field_message(resolver: &LocaleResolver, key: &str, english: &str) -> String {
    let text = resolver.resolve(key);
    if text == key {
        english.to_string()
    } else {
        text
    }
}

fn report_errors(resolver: &LocaleResolver, wizard: &Wizard) {
    let state = wizard.snapshot();
    for (name, error) in &state.validation_errors {
        let label = wizard
            .form()
            .field(name)
            .map(|f| resolver.resolve(&f.label_key))
            .unwrap_or_else(|| name.clone());
        eprintln!(
            "  {}: {}",
            label,
            field_message(resolver, &error.message_key, &error.message)
        );
    }
}

/// Fill every field, walk to the last step and submit
async fn complete_wizard(
    service: &PriceIntelService,
    wizard: &Wizard,
    plan: Option<PlanId>,
    raw_fields: &[String],
    format: OutputFormat,
) -> Result<()> {
    let resolver = service.locale();
    let kind = wizard.form().kind;

    tracing::info!(wizard = %wizard.id(), title = %service.wizard_title(kind, plan), "Opening wizard");

    for raw in raw_fields {
        let (name, value) = parse_pair(raw)?;
        wizard.set_field(name, value)?;
    }

    while wizard.current_step() < wizard.form().len() {
        match wizard.go_next() {
            Transition::Moved { .. } => {}
            Transition::Blocked { step } | Transition::Stayed { step } => {
                report_errors(resolver, wizard);
                return Err(WizardError::Incomplete { step }.into());
            }
        }
    }

    let submission = match wizard.submit().await {
        Ok(submission) => submission,
        Err(e @ PriceIntelError::Wizard(WizardError::Incomplete { .. })) => {
            report_errors(resolver, wizard);
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    match submission {
        Submission::Succeeded => {
            let message = service.success_message(kind, plan);
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "form": kind,
                    "plan": plan,
                    "submission": submission,
                    "message": message,
                }))?,
                OutputFormat::Text => println!("{}", message),
            }
            wizard.acknowledge()
        }
        Submission::Failed(reason) => {
            eprintln!(
                "{}",
                resolver.resolve_with("wizard.failed", &[("reason", &reason.to_string())])
            );
            Err(reason.into())
        }
        Submission::Idle | Submission::InFlight => Ok(()),
    }
}

fn print_snapshot(snapshot: &MetricsSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let line = serde_json::to_string(snapshot).map_err(|e| {
                PriceIntelError::InvalidInput(format!("Failed to encode snapshot: {}", e))
            })?;
            println!("{}", line);
        }
        OutputFormat::Text => println!(
            "tick {}: revenue ${} accuracy {:.1}%",
            snapshot.tick, snapshot.revenue, snapshot.accuracy
        ),
    }
    Ok(())
}

async fn run_demo(
    service: &PriceIntelService,
    ticks: u64,
    seed: Option<u64>,
    no_wait: bool,
    format: OutputFormat,
) -> Result<()> {
    if no_wait {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut snapshot = MetricsSnapshot::default();
        for _ in 0..ticks {
            snapshot = snapshot.step(&mut rng);
            print_snapshot(&snapshot, format)?;
        }
        return Ok(());
    }

    let ticker = match seed {
        Some(seed) => MetricsTicker::new(service.config().demo_interval()).with_seed(seed),
        None => service.ticker(),
    };
    let mut receiver = ticker.subscribe();
    ticker.start();

    for _ in 0..ticks {
        if receiver.changed().await.is_err() {
            break;
        }
        let snapshot = *receiver.borrow_and_update();
        print_snapshot(&snapshot, format)?;
    }
    ticker.stop();
    Ok(())
}
