use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use expat_core::WorkerType;
use expat_core::utils::parse_decimal;
use expat_data::builtin::is_kiwisaver_rate;
use rust_decimal::Decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Relocation estimator: compare income tax, convert currencies and plan a
/// move between countries.
///
/// Starts from built-in reference tables, optionally replaced by a bracket
/// CSV and a countries JSON.
#[derive(Debug, Parser)]
#[command(name = "expat-vision", version)]
pub struct Cli {
    /// Settings file. Defaults to `expat.toml` in the working directory when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bracket CSV loaded over the built-in tables.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// Countries JSON (`{"countries": [...]}`) replacing the built-in list.
    #[arg(long, global = true)]
    pub countries: Option<PathBuf>,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Progressive income tax and take-home pay in one country.
    Tax(TaxArgs),

    /// Converts an amount between two currencies.
    Convert(ConvertArgs),

    /// Compares the tax burden of two countries for the same income.
    Compare(CompareArgs),

    /// Lists selectable countries.
    Countries {
        /// Case-insensitive filter on name, code or continent.
        #[arg(long)]
        query: Option<String>,
    },

    /// Lists selectable actions or situations.
    Options {
        kind: OptionKind,

        /// Case-insensitive filter on label or code.
        #[arg(long)]
        query: Option<String>,
    },

    /// Validates a relocation plan and previews the tax outcome.
    Plan(PlanArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionKind {
    Actions,
    Situations,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct TaxArgs {
    /// Country code (e.g. `nz`).
    #[arg(long)]
    pub country: String,

    /// Gross annual income in the country's currency.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_amount)]
    pub income: Decimal,

    /// Decides which levies apply.
    #[arg(long, default_value = "employee", value_parser = parse_worker_type)]
    pub worker_type: WorkerType,

    /// Flat amount deducted from take-home pay.
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub deduction: Decimal,

    /// Levy percentage used instead of the country's levies.
    #[arg(long, value_parser = parse_amount, conflicts_with = "kiwisaver_rate")]
    pub levy_rate: Option<Decimal>,

    /// KiwiSaver employee contribution: 3, 4, 6, 8 or 10 percent.
    #[arg(long, value_parser = parse_kiwisaver_rate)]
    pub kiwisaver_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ConvertArgs {
    /// Amount as typed; empty or unparseable text gives no result.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// Base currency (e.g. `EUR`).
    #[arg(long)]
    pub from: String,

    /// Quote currency (e.g. `NZD`).
    #[arg(long)]
    pub to: String,

    /// Treat `--amount` as the quote currency and convert back to the base.
    #[arg(long)]
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CompareArgs {
    /// Home country code. Falls back to `default_origin`.
    #[arg(long)]
    pub from: Option<String>,

    /// Destination country code. Falls back to `default_destination`.
    #[arg(long)]
    pub to: Option<String>,

    /// Gross annual income in the home currency.
    #[arg(long, value_parser = parse_amount)]
    pub income: Decimal,

    #[arg(long, default_value = "employee", value_parser = parse_worker_type)]
    pub worker_type: WorkerType,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PlanArgs {
    /// Current country. Falls back to `default_origin`.
    #[arg(long, default_value = "")]
    pub current: String,

    /// Target country. Falls back to `default_destination`.
    #[arg(long, default_value = "")]
    pub target: String,

    /// Action code (`EXPATRIATE`, `CREATE_COMPANY`, `INVEST`).
    #[arg(long, default_value = "")]
    pub action: String,

    /// Situation code (`EMPLOYEE`, `BUSINESS_FOUNDER`, `FREELANCE`, `INVESTOR`).
    #[arg(long, default_value = "")]
    pub situation: String,

    /// Gross annual income in the current country's currency, for a tax preview.
    #[arg(long, value_parser = parse_amount)]
    pub income: Option<Decimal>,
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    parse_decimal(s).map_err(|e| e.to_string())
}

fn parse_kiwisaver_rate(s: &str) -> Result<Decimal, String> {
    let rate = parse_amount(s)?;
    if is_kiwisaver_rate(rate) {
        Ok(rate)
    } else {
        Err("KiwiSaver rate must be one of 3, 4, 6, 8 or 10".to_string())
    }
}

fn parse_worker_type(s: &str) -> Result<WorkerType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tax_command() {
        let cli = Cli::try_parse_from([
            "expat-vision",
            "tax",
            "--country",
            "nz",
            "--income",
            "80,000",
            "--worker-type",
            "freelance",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Tax(TaxArgs {
                country: "nz".to_string(),
                income: dec!(80000),
                worker_type: WorkerType::Freelance,
                deduction: dec!(0),
                levy_rate: None,
                kiwisaver_rate: None,
            })
        );
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "expat-vision",
            "countries",
            "--query",
            "eu",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(
            cli.command,
            Command::Countries {
                query: Some("eu".to_string())
            }
        );
    }

    #[test]
    fn rejects_bad_income() {
        let result = Cli::try_parse_from(["expat-vision", "tax", "--country", "nz", "--income", "lots"]);

        assert!(result.is_err());
    }

    #[test]
    fn kiwisaver_rate_accepts_scheme_steps_only() {
        let args = |rate: &'static str| {
            Cli::try_parse_from([
                "expat-vision",
                "tax",
                "--country",
                "nz",
                "--income",
                "1",
                "--kiwisaver-rate",
                rate,
            ])
        };

        let Command::Tax(tax) = args("8").unwrap().command else {
            panic!("expected tax command");
        };
        assert_eq!(tax.kiwisaver_rate, Some(dec!(8)));

        let err = args("5").unwrap_err();
        assert!(err.to_string().contains("3, 4, 6, 8 or 10"), "{err}");
    }

    #[test]
    fn kiwisaver_rate_conflicts_with_levy_rate() {
        let result = Cli::try_parse_from([
            "expat-vision",
            "tax",
            "--country",
            "nz",
            "--income",
            "1",
            "--levy-rate",
            "2",
            "--kiwisaver-rate",
            "4",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn plan_fields_default_to_blank() {
        let cli = Cli::try_parse_from(["expat-vision", "plan", "--action", "INVEST"]).unwrap();

        let Command::Plan(plan) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(plan.current, "");
        assert_eq!(plan.action, "INVEST");
        assert_eq!(plan.income, None);
    }
}
