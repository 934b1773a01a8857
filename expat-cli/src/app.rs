use std::fs::File;

use anyhow::{Context, Result, anyhow};
use expat_core::calculations::common::{mul, percent_of, round_half_up};
use expat_core::calculations::{
    CurrencyConverter, Direction, ProgressiveTaxCalculator, RateTrend, TaxCalculationResult,
    TaxComparison, compare,
};
use expat_core::search::filter_options;
use expat_core::utils::parse_optional_decimal;
use expat_core::{
    Action, ExchangeRate, FormSelection, LevyCharge, ReferenceRepository, RepositoryError,
    Situation, TaxSystem, WorkerType,
};
use expat_data::builtin::KIWISAVER;
use expat_data::{BracketLoader, CountryCatalogLoader, InMemoryRepository};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::cli::{CompareArgs, Command, ConvertArgs, OptionKind, PlanArgs, TaxArgs};
use crate::config::Settings;
use crate::report;

/// Seeds the built-in reference data and layers the configured files and
/// rates on top.
pub async fn build_repository(settings: &Settings) -> Result<InMemoryRepository> {
    let repo = InMemoryRepository::seeded().context("failed to seed reference data")?;

    if let Some(path) = &settings.brackets {
        let file = File::open(path)
            .with_context(|| format!("cannot open bracket file '{}'", path.display()))?;
        let records = BracketLoader::parse(file)
            .with_context(|| format!("cannot read bracket file '{}'", path.display()))?;
        BracketLoader::load(&repo, &records)
            .await
            .with_context(|| format!("cannot load bracket file '{}'", path.display()))?;
    }

    if let Some(path) = &settings.countries {
        let file = File::open(path)
            .with_context(|| format!("cannot open countries file '{}'", path.display()))?;
        let countries = CountryCatalogLoader::parse(file)
            .with_context(|| format!("cannot read countries file '{}'", path.display()))?;
        CountryCatalogLoader::load(&repo, countries).await?;
    }

    for rate in &settings.exchange_rates {
        apply_exchange_rate(&repo, rate.clone()).await?;
    }

    Ok(repo)
}

/// Stores `rate`, reporting how it moved against the pair it replaces.
///
/// Returns `None` when the repository had no rate for the pair.
pub async fn apply_exchange_rate<R: ReferenceRepository + ?Sized>(
    repo: &R,
    rate: ExchangeRate,
) -> Result<Option<RateTrend>> {
    let trend = match repo.get_exchange_rate(rate.base(), rate.quote()).await {
        Ok(previous) => {
            let previous_rate = previous.rate();
            let trend = CurrencyConverter::new(previous).refresh(rate.clone());
            info!(
                base = rate.base(),
                quote = rate.quote(),
                previous = %previous_rate,
                rate = %rate.rate(),
                ?trend,
                "exchange rate replaced"
            );
            Some(trend)
        }
        Err(RepositoryError::NotFound(_)) => {
            debug!(base = rate.base(), quote = rate.quote(), rate = %rate.rate(), "configured exchange rate");
            None
        }
        Err(err) => return Err(err.into()),
    };

    repo.put_exchange_rate(rate).await?;
    Ok(trend)
}

/// Runs one command and returns the text to print.
pub async fn run<R: ReferenceRepository + ?Sized>(
    repo: &R,
    settings: &Settings,
    command: &Command,
) -> Result<String> {
    match command {
        Command::Tax(args) => tax(repo, args).await,
        Command::Convert(args) => convert(repo, args).await,
        Command::Compare(args) => compare_countries(repo, settings, args).await,
        Command::Countries { query } => countries(repo, query.as_deref().unwrap_or_default()).await,
        Command::Options { kind, query } => Ok(options(*kind, query.as_deref().unwrap_or_default())),
        Command::Plan(args) => plan(repo, settings, args).await,
    }
}

async fn tax<R: ReferenceRepository + ?Sized>(
    repo: &R,
    args: &TaxArgs,
) -> Result<String> {
    let mut system = repo.get_tax_system(&args.country).await?;
    if let Some(rate) = args.kiwisaver_rate {
        system.set_levy_rate(KIWISAVER, rate)?;
    }

    let mut input = system.input_for(args.worker_type, args.income, args.deduction);
    let levies = match args.levy_rate {
        Some(rate) => {
            input.levy_rate = rate;
            vec![LevyCharge {
                name: "Levy override".to_string(),
                rate,
                amount: percent_of(args.income, rate)?,
            }]
        }
        None => system.levy_charges(args.worker_type, args.income)?,
    };

    let result = ProgressiveTaxCalculator::new(&system.table).calculate(&input)?;
    info!(
        country = %system.country_code,
        income = %result.gross_income,
        tax = %result.tax_amount,
        "tax estimated"
    );

    Ok(report::render_tax(&system, args.worker_type, &result, &levies))
}

async fn convert<R: ReferenceRepository + ?Sized>(
    repo: &R,
    args: &ConvertArgs,
) -> Result<String> {
    let rate = repo.get_exchange_rate(&args.from, &args.to).await?;
    let converter = CurrencyConverter::new(rate);
    let direction = if args.reverse {
        Direction::ToBase
    } else {
        Direction::ToQuote
    };

    let output = converter.convert_input(&args.amount, direction)?;
    if output.is_none() {
        debug!(amount = %args.amount, "nothing to convert");
    }

    Ok(report::render_conversion(
        converter.rate(),
        direction,
        parse_optional_decimal(&args.amount),
        output,
    ))
}

async fn compare_countries<R: ReferenceRepository + ?Sized>(
    repo: &R,
    settings: &Settings,
    args: &CompareArgs,
) -> Result<String> {
    let from = args
        .from
        .as_deref()
        .or(settings.default_origin.as_deref())
        .context("no home country: pass --from or set default_origin")?;
    let to = args
        .to
        .as_deref()
        .or(settings.default_destination.as_deref())
        .context("no destination country: pass --to or set default_destination")?;

    let estimate = estimate_move(repo, from, to, args.income, args.worker_type).await?;
    Ok(report::render_comparison(&estimate))
}

async fn countries<R: ReferenceRepository + ?Sized>(
    repo: &R,
    query: &str,
) -> Result<String> {
    let all = repo.list_countries().await?;
    Ok(report::render_countries(&filter_options(&all, query)))
}

fn options(
    kind: OptionKind,
    query: &str,
) -> String {
    let pairs: Vec<(&str, &str)> = match kind {
        OptionKind::Actions => filter_options(Action::all(), query)
            .into_iter()
            .map(|a| (a.code(), a.label()))
            .collect(),
        OptionKind::Situations => filter_options(Situation::all(), query)
            .into_iter()
            .map(|s| (s.code(), s.label()))
            .collect(),
    };
    report::render_options(&pairs)
}

async fn plan<R: ReferenceRepository + ?Sized>(
    repo: &R,
    settings: &Settings,
    args: &PlanArgs,
) -> Result<String> {
    let selection = FormSelection {
        current_country: or_default(&args.current, settings.default_origin.as_deref()),
        target_country: or_default(&args.target, settings.default_destination.as_deref()),
        action: args.action.clone(),
        situation: args.situation.clone(),
    };
    selection.validate()?;

    let current = repo.find_country(&selection.current_country).await?;
    let target = repo.find_country(&selection.target_country).await?;
    let action = Action::parse(&selection.action)
        .ok_or_else(|| anyhow!("unknown action '{}'", selection.action.trim()))?;
    let situation = Situation::parse(&selection.situation)
        .ok_or_else(|| anyhow!("unknown situation '{}'", selection.situation.trim()))?;

    info!(
        current = %current.code,
        target = %target.code,
        action = action.code(),
        situation = situation.code(),
        "plan submitted"
    );

    let mut out = report::render_plan(&current, &target, action, situation);

    if let Some(income) = args.income {
        let preview =
            estimate_move(repo, &current.code, &target.code, income, situation.worker_type()).await;
        out.push_str("\n\n");
        match preview {
            Ok(estimate) => out.push_str(&report::render_comparison(&estimate)),
            Err(err) => {
                warn!(error = %err, "tax preview unavailable");
                out.push_str(&format!("tax preview unavailable: {err:#}"));
            }
        }
    }

    Ok(out)
}

fn or_default(
    value: &str,
    fallback: Option<&str>,
) -> String {
    if value.trim().is_empty() {
        fallback.unwrap_or_default().to_string()
    } else {
        value.to_string()
    }
}

/// Both sides of a move for one gross income.
#[derive(Debug, Clone)]
pub struct MoveEstimate {
    pub home: TaxSystem,
    pub destination: TaxSystem,

    /// `1 home currency = rate destination currency`.
    pub rate: ExchangeRate,

    /// Gross income converted to the destination currency, rounded to cents.
    pub destination_income: Decimal,

    pub home_result: TaxCalculationResult,
    pub destination_result: TaxCalculationResult,
    pub comparison: TaxComparison,
}

/// Taxes `income` (in the home currency) in both countries and compares
/// the burdens in the destination currency.
pub async fn estimate_move<R: ReferenceRepository + ?Sized>(
    repo: &R,
    from: &str,
    to: &str,
    income: Decimal,
    worker_type: WorkerType,
) -> Result<MoveEstimate> {
    let home = repo.get_tax_system(from).await?;
    let destination = repo.get_tax_system(to).await?;
    let rate = repo
        .get_exchange_rate(&home.currency, &destination.currency)
        .await?;

    let home_result = ProgressiveTaxCalculator::new(&home.table)
        .calculate(&home.input_for(worker_type, income, Decimal::ZERO))?;

    let destination_income = round_half_up(mul(income, rate.rate())?);
    let destination_result = ProgressiveTaxCalculator::new(&destination.table)
        .calculate(&destination.input_for(worker_type, destination_income, Decimal::ZERO))?;

    let comparison = compare(&home_result, &destination_result, &rate)?;
    debug!(
        from = %home.country_code,
        to = %destination.country_code,
        difference = %comparison.difference,
        saving = comparison.is_saving,
        "move estimated"
    );

    Ok(MoveEstimate {
        home,
        destination,
        rate,
        destination_income,
        home_result,
        destination_result,
        comparison,
    })
}
