//! Reference data shipped with the binary.
//!
//! Bracket tables are the 2024 published schedules; levy percentages and
//! exchange rates are the indicative figures shown on the dashboards, not
//! live quotes.

use expat_core::{
    BracketTable, BracketTableError, CountryOption, ExchangeRate, ExchangeRateError, Levy,
    TaxBracket, TaxSystem, WorkerType,
};
use rust_decimal::Decimal;

fn bracket(
    lower: i64,
    upper: Option<i64>,
    rate: Decimal,
    label: &str,
) -> TaxBracket {
    TaxBracket::new(Decimal::from(lower), upper.map(Decimal::from), rate, label)
}

/// Name of the New Zealand retirement savings levy.
pub const KIWISAVER: &str = "KiwiSaver";

/// Employee contribution rates KiwiSaver accepts, in percent. The first is the default.
pub const KIWISAVER_RATES: [u32; 5] = [3, 4, 6, 8, 10];

/// Whether `rate` is a KiwiSaver contribution rate.
pub fn is_kiwisaver_rate(rate: Decimal) -> bool {
    KIWISAVER_RATES.iter().any(|&r| Decimal::from(r) == rate)
}

/// New Zealand PAYE schedule with ACC levy, KiwiSaver and a GST estimate.
pub fn new_zealand() -> Result<TaxSystem, BracketTableError> {
    let table = BracketTable::new(vec![
        bracket(0, Some(14_000), Decimal::new(105, 1), "Low income"),
        bracket(14_000, Some(48_000), Decimal::new(175, 1), "Middle income"),
        bracket(48_000, Some(70_000), Decimal::from(30), "Upper middle"),
        bracket(70_000, Some(180_000), Decimal::from(33), "High income"),
        bracket(180_000, None, Decimal::from(39), "Top earners"),
    ])?;

    Ok(TaxSystem {
        country_code: "nz".to_string(),
        country_name: "New Zealand".to_string(),
        currency: "NZD".to_string(),
        table,
        levies: vec![
            Levy::universal("ACC levy", Decimal::new(145, 2)),
            Levy::for_workers(
                KIWISAVER,
                Decimal::from(KIWISAVER_RATES[0]),
                &[WorkerType::Employee],
            ),
            Levy::for_workers(
                "GST estimate",
                Decimal::from(15),
                &[WorkerType::BusinessOwner],
            ),
        ],
    })
}

/// French income tax bands with employee social charges.
pub fn france() -> Result<TaxSystem, BracketTableError> {
    let table = BracketTable::new(vec![
        bracket(0, Some(10_777), Decimal::ZERO, "Exempt"),
        bracket(10_777, Some(27_478), Decimal::from(11), "Band 1"),
        bracket(27_478, Some(78_570), Decimal::from(30), "Band 2"),
        bracket(78_570, Some(168_994), Decimal::from(41), "Band 3"),
        bracket(168_994, None, Decimal::from(45), "Band 4"),
    ])?;

    Ok(TaxSystem {
        country_code: "fr".to_string(),
        country_name: "France".to_string(),
        currency: "EUR".to_string(),
        table,
        levies: vec![
            Levy::universal("Social contributions", Decimal::from(22)),
            Levy::universal("CSG/CRDS", Decimal::new(97, 1)),
        ],
    })
}

pub fn tax_systems() -> Result<Vec<TaxSystem>, BracketTableError> {
    Ok(vec![new_zealand()?, france()?])
}

/// Indicative rates into NZD.
pub fn exchange_rates() -> Result<Vec<ExchangeRate>, ExchangeRateError> {
    [
        ("EUR", Decimal::new(165, 2)),
        ("GBP", Decimal::new(195, 2)),
        ("CAD", Decimal::new(122, 2)),
        ("AUD", Decimal::new(108, 2)),
        ("USD", Decimal::new(158, 2)),
        ("CHF", Decimal::new(175, 2)),
    ]
    .into_iter()
    .map(|(base, rate)| ExchangeRate::new(base, "NZD", rate))
    .collect()
}

const COUNTRIES: &[(&str, &str, &str, &str)] = &[
    ("us", "United States", "🇺🇸", "North America"),
    ("ca", "Canada", "🇨🇦", "North America"),
    ("gb", "United Kingdom", "🇬🇧", "Europe"),
    ("fr", "France", "🇫🇷", "Europe"),
    ("de", "Germany", "🇩🇪", "Europe"),
    ("es", "Spain", "🇪🇸", "Europe"),
    ("it", "Italy", "🇮🇹", "Europe"),
    ("jp", "Japan", "🇯🇵", "Asia"),
    ("au", "Australia", "🇦🇺", "Oceania"),
    ("br", "Brazil", "🇧🇷", "South America"),
    ("ch", "Switzerland", "🇨🇭", "Europe"),
    ("sg", "Singapore", "🇸🇬", "Asia"),
    ("ae", "United Arab Emirates", "🇦🇪", "Asia"),
    ("nz", "New Zealand", "🇳🇿", "Oceania"),
    ("pt", "Portugal", "🇵🇹", "Europe"),
    ("nl", "Netherlands", "🇳🇱", "Europe"),
    ("se", "Sweden", "🇸🇪", "Europe"),
    ("no", "Norway", "🇳🇴", "Europe"),
    ("fi", "Finland", "🇫🇮", "Europe"),
    ("dk", "Denmark", "🇩🇰", "Europe"),
    ("ie", "Ireland", "🇮🇪", "Europe"),
    ("mx", "Mexico", "🇲🇽", "North America"),
    ("th", "Thailand", "🇹🇭", "Asia"),
    ("vn", "Vietnam", "🇻🇳", "Asia"),
    ("id", "Indonesia", "🇮🇩", "Asia"),
    ("my", "Malaysia", "🇲🇾", "Asia"),
];

pub fn countries() -> Vec<CountryOption> {
    COUNTRIES
        .iter()
        .zip(1..)
        .map(|(&(code, name, emoji, continent), id)| CountryOption {
            id,
            name: name.to_string(),
            code: code.to_string(),
            emoji: emoji.to_string(),
            continent: continent.to_string(),
        })
        .collect()
}
