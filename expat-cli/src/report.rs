//! Plain-text rendering of command results.
//!
//! Amounts are kept exact by the calculators and rounded here, half-up to
//! cents.

use expat_core::calculations::common::round_half_up;
use expat_core::calculations::{Direction, TaxCalculationResult};
use expat_core::{
    Action, CountryOption, ExchangeRate, LevyCharge, Situation, TaxSystem, WorkerType,
};
use rust_decimal::Decimal;

use crate::app::MoveEstimate;

const LABEL_WIDTH: usize = 20;

/// `NZD 62,680.00`
pub fn format_money(
    amount: Decimal,
    currency: &str,
) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{currency} {sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `21.65%`
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate))
}

/// `1 EUR = 1.65 NZD`, rate trimmed to six places.
pub fn format_rate(rate: &ExchangeRate) -> String {
    format!(
        "1 {} = {} {}",
        rate.base(),
        rate.rate().round_dp(6).normalize(),
        rate.quote()
    )
}

fn row(
    label: &str,
    value: String,
) -> String {
    format!("{label:<LABEL_WIDTH$}{value}")
}

/// Tax summary with one indented line per bracket and per levy.
pub fn render_tax(
    system: &TaxSystem,
    worker_type: WorkerType,
    result: &TaxCalculationResult,
    levies: &[LevyCharge],
) -> String {
    let currency = system.currency.as_str();
    let mut lines = vec![
        format!(
            "{} ({currency}), {}",
            system.country_name,
            worker_type.label()
        ),
        row("Gross income", format_money(result.gross_income, currency)),
    ];

    for bracket in &result.breakdown {
        lines.push(format!(
            "  {:<18}{:>7} of {:>18} = {}",
            bracket.label,
            format_percent(bracket.rate),
            format_money(bracket.taxable_amount, currency),
            format_money(bracket.tax_amount, currency)
        ));
    }

    lines.extend([
        row("Income tax", format_money(result.tax_amount, currency)),
        row("Levies", format_money(result.levy_amount, currency)),
    ]);

    for levy in levies {
        lines.push(format!(
            "  {:<18}{:>7}  {}",
            levy.name,
            format_percent(levy.rate),
            format_money(levy.amount, currency)
        ));
    }

    lines.extend([
        row("Flat deduction", format_money(result.flat_deduction, currency)),
        row("Total deductions", format_money(result.total_deductions, currency)),
        row("Net income", format_money(result.net_income, currency)),
        row("Monthly net", format_money(result.net_income / Decimal::from(12), currency)),
        row("Weekly net", format_money(result.net_income / Decimal::from(52), currency)),
        row("Effective rate", format_percent(result.effective_rate)),
        row("Marginal rate", format_percent(result.marginal_rate)),
    ]);

    lines.join("\n")
}

/// One converter field: `input` typed on one side, `output` shown on the other.
pub fn render_conversion(
    rate: &ExchangeRate,
    direction: Direction,
    input: Option<Decimal>,
    output: Option<Decimal>,
) -> String {
    let (from, to) = match direction {
        Direction::ToQuote => (rate.base(), rate.quote()),
        Direction::ToBase => (rate.quote(), rate.base()),
    };

    let result = match (input, output) {
        (Some(input), Some(output)) => {
            format!("{} = {}", format_money(input, from), format_money(output, to))
        }
        _ => "no amount to convert".to_string(),
    };

    format!("{result}\n{}", format_rate(rate))
}

pub fn render_comparison(estimate: &MoveEstimate) -> String {
    let home = &estimate.home;
    let destination = &estimate.destination;
    let comparison = &estimate.comparison;
    let currency = destination.currency.as_str();

    let verdict = if comparison.is_saving {
        "Moving saves"
    } else if comparison.difference.is_zero() {
        "No change"
    } else {
        "Moving costs"
    };

    [
        format!("{} -> {}", home.country_name, destination.country_name),
        format_rate(&estimate.rate),
        row(
            &format!("{} burden", home.country_name),
            format!(
                "{} ({}, {})",
                format_money(estimate.home_result.total_deductions, &home.currency),
                format_money(comparison.home_burden, currency),
                format_percent(estimate.home_result.effective_rate)
            ),
        ),
        row(
            &format!("{} burden", destination.country_name),
            format!(
                "{} on {} ({})",
                format_money(comparison.destination_burden, currency),
                format_money(estimate.destination_income, currency),
                format_percent(estimate.destination_result.effective_rate)
            ),
        ),
        row(
            verdict,
            format!(
                "{} per year, {} per month",
                format_money(comparison.difference, currency),
                format_money(comparison.monthly_difference, currency)
            ),
        ),
        row(
            "Rate gap",
            format!("{} points", round_half_up(comparison.effective_rate_gap)),
        ),
    ]
    .join("\n")
}

pub fn render_countries(countries: &[&CountryOption]) -> String {
    if countries.is_empty() {
        return "no matching countries".to_string();
    }
    countries
        .iter()
        .map(|c| format!("{:<4}{:<28}{}", c.code, c.display_name(), c.continent))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `(code, label)` pairs, one per line.
pub fn render_options(options: &[(&str, &str)]) -> String {
    if options.is_empty() {
        return "no matching options".to_string();
    }
    options
        .iter()
        .map(|(code, label)| format!("{code:<18}{label}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_plan(
    current: &CountryOption,
    target: &CountryOption,
    action: Action,
    situation: Situation,
) -> String {
    format!(
        "Plan: {} from {} to {} as {}",
        action.label(),
        current.display_name(),
        target.display_name(),
        situation.label()
    )
}

#[cfg(test)]
mod tests {
    use expat_core::calculations::ProgressiveTaxCalculator;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn money_groups_thousands_and_rounds() {
        assert_eq!(format_money(dec!(62680), "NZD"), "NZD 62,680.00");
        assert_eq!(format_money(dec!(1234567.895), "EUR"), "EUR 1,234,567.90");
        assert_eq!(format_money(dec!(999.994), "EUR"), "EUR 999.99");
        assert_eq!(format_money(dec!(0), "EUR"), "EUR 0.00");
    }

    #[test]
    fn negative_money_keeps_sign() {
        assert_eq!(format_money(dec!(-1500.5), "NZD"), "NZD -1,500.50");
    }

    #[test]
    fn percent_has_two_places() {
        assert_eq!(format_percent(dec!(21.65)), "21.65%");
        assert_eq!(format_percent(dec!(33)), "33.00%");
        assert_eq!(format_percent(dec!(17.3456)), "17.35%");
    }

    #[test]
    fn rate_is_trimmed() {
        let rate = ExchangeRate::new("NZD", "AUD", dec!(1) / dec!(1.08)).unwrap();

        assert_eq!(format_rate(&rate), "1 NZD = 0.925926 AUD");
    }

    #[test]
    fn conversion_without_amount() {
        let rate = ExchangeRate::new("EUR", "NZD", dec!(1.65)).unwrap();

        let text = render_conversion(&rate, Direction::ToQuote, None, None);

        assert_eq!(text, "no amount to convert\n1 EUR = 1.65 NZD");
    }

    #[test]
    fn reverse_conversion_swaps_currencies() {
        let rate = ExchangeRate::new("EUR", "NZD", dec!(1.65)).unwrap();

        let text = render_conversion(&rate, Direction::ToBase, Some(dec!(1650)), Some(dec!(1000)));

        assert_eq!(text, "NZD 1,650.00 = EUR 1,000.00\n1 EUR = 1.65 NZD");
    }

    fn nz_employee(levies: &[LevyCharge]) -> String {
        let system = expat_data::builtin::new_zealand().unwrap();
        let input = system.input_for(WorkerType::Employee, dec!(80000), dec!(0));
        let result = ProgressiveTaxCalculator::new(&system.table)
            .calculate(&input)
            .unwrap();

        render_tax(&system, WorkerType::Employee, &result, levies)
    }

    #[test]
    fn tax_lists_each_levy_under_the_total() {
        let system = expat_data::builtin::new_zealand().unwrap();
        let levies = system.levy_charges(WorkerType::Employee, dec!(80000)).unwrap();

        let text = nz_employee(&levies);
        let lines: Vec<&str> = text.lines().collect();
        let total = lines.iter().position(|l| l.starts_with("Levies")).unwrap();

        assert_eq!(lines[total], "Levies              NZD 3,560.00");
        assert_eq!(lines[total + 1], "  ACC levy            1.45%  NZD 1,160.00");
        assert_eq!(lines[total + 2], "  KiwiSaver           3.00%  NZD 2,400.00");
        assert!(lines[total + 3].starts_with("Flat deduction"));
    }

    #[test]
    fn tax_shows_weekly_net() {
        let text = nz_employee(&[]);

        // (80,000 - 17,320 - 3,560) / 52
        assert!(text.contains("Monthly net         NZD 4,926.67"), "{text}");
        assert!(text.contains("Weekly net          NZD 1,136.92"), "{text}");
    }

    #[test]
    fn empty_lists_say_so() {
        assert_eq!(render_countries(&[]), "no matching countries");
        assert_eq!(render_options(&[]), "no matching options");
    }
}
