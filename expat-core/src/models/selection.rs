use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::WorkerType;

/// What the user wants to do in the destination country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Expatriate,
    CreateCompany,
    Invest,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[Action::Expatriate, Action::CreateCompany, Action::Invest]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Expatriate => "EXPATRIATE",
            Self::CreateCompany => "CREATE_COMPANY",
            Self::Invest => "INVEST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Expatriate => "expatriate",
            Self::CreateCompany => "create a company",
            Self::Invest => "invest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.code().eq_ignore_ascii_case(s.trim()))
    }
}

/// The user's professional situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Situation {
    Employee,
    BusinessFounder,
    Freelance,
    Investor,
}

impl Situation {
    pub fn all() -> &'static [Situation] {
        &[
            Situation::Employee,
            Situation::BusinessFounder,
            Situation::Freelance,
            Situation::Investor,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::BusinessFounder => "BUSINESS_FOUNDER",
            Self::Freelance => "FREELANCE",
            Self::Investor => "INVESTOR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::BusinessFounder => "Business Founder",
            Self::Freelance => "Freelancer",
            Self::Investor => "Investor",
        }
    }

    /// Worker type whose levies apply to this situation.
    pub fn worker_type(&self) -> WorkerType {
        match self {
            Self::Employee => WorkerType::Employee,
            Self::Freelance => WorkerType::Freelance,
            Self::BusinessFounder | Self::Investor => WorkerType::BusinessOwner,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.code().eq_ignore_ascii_case(s.trim()))
    }
}

/// Field names of [`FormSelection`], used to report missing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    CurrentCountry,
    TargetCountry,
    Action,
    Situation,
}

impl fmt::Display for SelectionField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::CurrentCountry => "current country",
            Self::TargetCountry => "target country",
            Self::Action => "action",
            Self::Situation => "situation",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection is incomplete, missing: {}", join_fields(.0))]
    Incomplete(Vec<SelectionField>),
}

fn join_fields(fields: &[SelectionField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The landing form: where the user lives, where they want to go, and how.
///
/// Fields are free strings set by direct user selection. The only rule is
/// that all four must be non-blank before the form can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormSelection {
    pub current_country: String,
    pub target_country: String,
    pub action: String,
    pub situation: String,
}

impl FormSelection {
    pub fn missing_fields(&self) -> Vec<SelectionField> {
        [
            (SelectionField::CurrentCountry, &self.current_country),
            (SelectionField::TargetCountry, &self.target_country),
            (SelectionField::Action, &self.action),
            (SelectionField::Situation, &self.situation),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// # Errors
    ///
    /// [`SelectionError::Incomplete`] listing every blank field.
    pub fn validate(&self) -> Result<(), SelectionError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SelectionError::Incomplete(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete() -> FormSelection {
        FormSelection {
            current_country: "fr".to_string(),
            target_country: "nz".to_string(),
            action: "EXPATRIATE".to_string(),
            situation: "EMPLOYEE".to_string(),
        }
    }

    #[test]
    fn complete_selection_validates() {
        let selection = complete();

        assert!(selection.is_complete());
        assert_eq!(selection.validate(), Ok(()));
    }

    #[test]
    fn default_selection_misses_everything() {
        let selection = FormSelection::default();

        assert_eq!(selection.missing_fields().len(), 4);
        assert!(!selection.is_complete());
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let mut selection = complete();
        selection.action = "   ".to_string();

        assert_eq!(
            selection.validate(),
            Err(SelectionError::Incomplete(vec![SelectionField::Action]))
        );
    }

    #[test]
    fn same_origin_and_destination_is_allowed() {
        let mut selection = complete();
        selection.target_country = selection.current_country.clone();

        assert!(selection.is_complete());
    }

    #[test]
    fn incomplete_error_lists_fields() {
        let selection = FormSelection {
            current_country: "fr".to_string(),
            ..Default::default()
        };

        assert_eq!(
            selection.validate().unwrap_err().to_string(),
            "selection is incomplete, missing: target country, action, situation"
        );
    }

    #[test]
    fn action_and_situation_parse_codes() {
        assert_eq!(Action::parse("create_company"), Some(Action::CreateCompany));
        assert_eq!(Situation::parse("BUSINESS_FOUNDER"), Some(Situation::BusinessFounder));
        assert_eq!(Situation::parse("pilot"), None);
    }

    #[test]
    fn situation_maps_to_worker_type() {
        assert_eq!(Situation::Freelance.worker_type(), WorkerType::Freelance);
        assert_eq!(Situation::Investor.worker_type(), WorkerType::BusinessOwner);
    }
}
