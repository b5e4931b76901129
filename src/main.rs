//! naming-guard CLI - Command-line interface for naming convention checks
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like path validation, process exit codes, and terminal output
//! - Logging goes to stderr so reports on stdout stay machine-readable

use clap::{Args, Parser, Subcommand, ValueEnum};
use naming_guard::patterns::rules::{builtin_rules, find_rule, BUILTIN_RULE_IDS};
use naming_guard::target::resolve_target;
use naming_guard::{
    gate, AnalysisOptions, GuardConfig, GuardResult, NamingGuard, OutputFormat, ReportFormatter,
    ReportOptions,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

/// naming-guard - C/C++ naming convention checker
#[derive(Parser, Debug)]
#[command(name = "naming-guard")]
#[command(version)]
#[command(about = "Heuristic naming-convention checker for C and C++ source trees")]
#[command(
    long_about = "naming-guard scans .cpp and .h files line by line and reports naming convention \
                  violations. Errors (method casing, using-namespace directives) fail the run; \
                  warnings are reported but do not."
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// File or directory to check, relative to the project root (defaults to <root>/src)
    path: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Disable parallel processing
    #[arg(long)]
    no_parallel: bool,

    /// Stop at the first file that cannot be read
    #[arg(long)]
    fail_fast: bool,

    /// Show suggested names under each violation
    #[arg(long)]
    suggestions: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate (defaults to the one found in the root)
        config_file: Option<PathBuf>,
    },

    /// Check staged files for a pre-commit hook
    Gate {
        /// Staged files, relative to the project root
        files: Vec<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
enum OutputFormatArg {
    #[default]
    Human,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the error path too
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    if cli.no_color || env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> GuardResult<i32> {
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir()?,
    };
    let use_colors = !cli.no_color && env::var_os("NO_COLOR").is_none();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref(), &root)?;
            run_check(&root, config, &cli.check, use_colors)
        }
        Some(Commands::Rules { enabled_only }) => {
            let config = load_config(cli.config.as_deref(), &root)?;
            run_list_rules(&config, enabled_only)
        }
        Some(Commands::Explain { rule_id }) => {
            let config = load_config(cli.config.as_deref(), &root)?;
            run_explain(&config, &rule_id)
        }
        Some(Commands::ValidateConfig { config_file }) => {
            run_validate_config(config_file.or(cli.config), &root)
        }
        Some(Commands::Gate { files }) => {
            let config = load_config(cli.config.as_deref(), &root)?;
            run_gate(&root, config, &files, use_colors)
        }
    }
}

/// `--config` if given, else a default config file in the root, else built-in defaults
fn load_config(config_path: Option<&Path>, root: &Path) -> GuardResult<GuardConfig> {
    match config_path {
        Some(path) => GuardConfig::load_from_file(path),
        None => GuardConfig::discover(root),
    }
}

fn build_guard(
    config: GuardConfig,
    use_colors: bool,
    show_suggestions: bool,
) -> GuardResult<NamingGuard> {
    let formatter = ReportFormatter::new(ReportOptions {
        use_colors,
        warning_display_limit: config.report.warning_display_limit,
        show_suggestions,
    });
    Ok(NamingGuard::new_with_config(config)?.with_report_formatter(formatter))
}

fn run_check(
    root: &Path,
    config: GuardConfig,
    args: &CheckArgs,
    use_colors: bool,
) -> GuardResult<i32> {
    let target = resolve_target(args.path.as_deref(), root)?;
    let format = OutputFormat::from(args.format);
    let guard = build_guard(config, use_colors, args.suggestions)?;

    let options = AnalysisOptions {
        parallel: !args.no_parallel,
        fail_fast: args.fail_fast,
        exclude_patterns: args.exclude.clone(),
    };

    if format == OutputFormat::Human {
        print!("{}", ReportFormatter::default().format_header(&target));
    }

    let report = guard.validate_path(&target, &options)?;
    tracing::debug!(
        "Checked {} file(s) in {}ms",
        report.summary.files_checked,
        report.summary.execution_time_ms
    );

    let formatted = guard.format_report(&report, format)?;
    print!("{formatted}");

    Ok(report.exit_code())
}

fn run_gate(
    root: &Path,
    config: GuardConfig,
    files: &[PathBuf],
    use_colors: bool,
) -> GuardResult<i32> {
    let guard = build_guard(config, use_colors, false)?;
    let outcome = gate::check_staged_files(&guard, root, files)?;

    // Nothing we check was staged
    if outcome.report.summary.files_checked == 0 {
        return Ok(0);
    }

    println!("🔍 Checking coding style for staged files...");
    if outcome.report.has_violations() {
        print!("{}", guard.format_report(&outcome.report, OutputFormat::Human)?);
    }
    println!("{}", outcome.verdict());

    Ok(outcome.exit_code())
}

fn run_list_rules(config: &GuardConfig, enabled_only: bool) -> GuardResult<i32> {
    println!("📋 Available Rules\n");

    for rule in builtin_rules() {
        let settings = config.rule_settings(rule.id());
        if enabled_only && !settings.enabled {
            continue;
        }

        let status = if settings.enabled { "✅" } else { "❌" };
        let severity = settings.severity.unwrap_or(rule.default_severity());
        println!(
            "  {}🔍 {} [{}] - {}",
            status,
            rule.id(),
            severity.as_str(),
            rule.description()
        );
    }

    Ok(0)
}

fn run_explain(config: &GuardConfig, rule_id: &str) -> GuardResult<i32> {
    let Some(rule) = find_rule(rule_id) else {
        eprintln!("❌ Rule '{rule_id}' not found");
        println!();
        println!("Available rules:");
        for id in BUILTIN_RULE_IDS {
            println!("  - {id}");
        }
        return Ok(1);
    };

    let settings = config.rule_settings(rule.id());
    println!("📖 Rule: {}", rule.id());
    println!(
        "⚠️ Severity: {}",
        settings.severity.unwrap_or(rule.default_severity()).as_str()
    );
    println!("✅ Enabled: {}", settings.enabled);
    println!();
    println!("📝 Description:");
    println!("   {}", rule.description());
    println!();
    println!("🔎 Details:");
    println!("   {}", rule.explanation());

    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>, root: &Path) -> GuardResult<i32> {
    let Some(config_path) = config_path.or_else(|| GuardConfig::find_config_file(root)) else {
        eprintln!("❌ No configuration file found in {}", root.display());
        return Ok(1);
    };

    println!("Validating configuration: {}", config_path.display());

    match GuardConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let enabled_rules = BUILTIN_RULE_IDS
                .iter()
                .filter(|id| config.rule_settings(id).enabled)
                .count();

            println!("📊 Configuration summary:");
            println!("  Rules: {} total, {} enabled", BUILTIN_RULE_IDS.len(), enabled_rules);
            println!("  Extensions: {}", config.paths.extensions.join(", "));
            println!("  Path patterns: {}", config.paths.patterns.len());
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
