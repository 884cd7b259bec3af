//! Validation panel: a fixed set of presence and threshold checks over the
//! branding and the form.
//!
//! Results are advisory. Nothing here blocks data entry or navigation;
//! only section completion gates submission.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::common::parse_number;
use crate::form::ApplicationRecord;
use crate::models::{BrandConfig, Field};

/// Smallest net investment, in pounds, the product accepts.
pub const MINIMUM_NET_INVESTMENT: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Warning,
    Info,
}

impl ValidationStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
        }
    }
}

/// The outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRule {
    pub id: &'static str,
    pub category: &'static str,
    pub rule: &'static str,
    pub status: ValidationStatus,
    pub message: String,
    pub required: bool,
}

struct Check {
    id: &'static str,
    category: &'static str,
    rule: &'static str,
    required: bool,
    otherwise: ValidationStatus,
    pass_message: &'static str,
    fail_message: &'static str,
}

impl Check {
    fn evaluate(
        &self,
        passed: bool,
    ) -> ValidationRule {
        ValidationRule {
            id: self.id,
            category: self.category,
            rule: self.rule,
            status: if passed {
                ValidationStatus::Pass
            } else {
                self.otherwise
            },
            message: if passed {
                self.pass_message.to_string()
            } else {
                self.fail_message.to_string()
            },
            required: self.required,
        }
    }
}

fn filled(value: &str) -> bool {
    !value.is_empty()
}

/// Runs every check. Form checks are skipped when `record` is `None`.
pub fn run_validations(
    brand: &BrandConfig,
    record: Option<&ApplicationRecord>,
) -> ValidationReport {
    let mut rules = Vec::new();

    rules.push(
        Check {
            id: "company-name",
            category: "Branding",
            rule: "Company Name Required",
            required: true,
            otherwise: ValidationStatus::Fail,
            pass_message: "Company name provided",
            fail_message: "Company name is required for professional forms",
        }
        .evaluate(filled(&brand.company_name)),
    );

    rules.push(
        Check {
            id: "contact-info",
            category: "Branding",
            rule: "Contact Information",
            required: false,
            otherwise: ValidationStatus::Warning,
            pass_message: "Complete contact information",
            fail_message: "Phone and email recommended for client contact",
        }
        .evaluate(filled(&brand.company_phone) && filled(&brand.company_email)),
    );

    let plan_count = brand.plan_options().len();
    let mut plans = Check {
        id: "investment-plans",
        category: "Investment Plans",
        rule: "Minimum Investment Options",
        required: false,
        otherwise: ValidationStatus::Warning,
        pass_message: "",
        fail_message: "At least 2 investment plans recommended",
    }
    .evaluate(plan_count >= 2);
    if plans.status == ValidationStatus::Pass {
        plans.message = format!("{plan_count} investment plans configured");
    }
    rules.push(plans);

    rules.push(
        Check {
            id: "plan-codes",
            category: "Investment Plans",
            rule: "Plan Reference Codes",
            required: true,
            otherwise: ValidationStatus::Fail,
            pass_message: "Plan codes provided",
            fail_message: "Plan reference codes required for compliance",
        }
        .evaluate(filled(&brand.plan1_code) && filled(&brand.plan2_code)),
    );

    if let Some(record) = record {
        let net = parse_number(record.text(Field::NetInvestment));
        rules.push(
            Check {
                id: "net-investment",
                category: "Investment Details",
                rule: "Minimum Investment Amount",
                required: true,
                otherwise: ValidationStatus::Fail,
                pass_message: "Meets minimum investment requirement",
                fail_message: "Net investment must be at least £10,000",
            }
            .evaluate(net >= Decimal::from(MINIMUM_NET_INVESTMENT)),
        );

        rules.push(
            Check {
                id: "bank-details",
                category: "Banking",
                rule: "Bank Account Details",
                required: true,
                otherwise: ValidationStatus::Fail,
                pass_message: "Complete bank details provided",
                fail_message: "Bank details required for payments",
            }
            .evaluate(
                record.is_filled(Field::BankName)
                    && record.is_filled(Field::SortCode)
                    && record.is_filled(Field::AccountNumber),
            ),
        );

        rules.push(
            Check {
                id: "aml-compliance",
                category: "Compliance",
                rule: "AML Information",
                required: true,
                otherwise: ValidationStatus::Warning,
                pass_message: "AML information complete",
                fail_message: "Source of wealth and occupation required for AML compliance",
            }
            .evaluate(
                record.is_filled(Field::PrimaryWealth) && record.is_filled(Field::Occupation),
            ),
        );

        rules.push(
            Check {
                id: "adviser-details",
                category: "Regulatory",
                rule: "Financial Adviser Information",
                required: true,
                otherwise: ValidationStatus::Warning,
                pass_message: "Adviser details complete",
                fail_message: "Adviser information required for regulatory compliance",
            }
            .evaluate(record.is_filled(Field::FirmName) && record.is_filled(Field::AdviserName)),
        );
    }

    rules.push(
        Check {
            id: "closing-date",
            category: "Regulatory",
            rule: "Application Deadline",
            required: false,
            otherwise: ValidationStatus::Info,
            pass_message: "Application deadline specified",
            fail_message: "Consider adding application deadline for client clarity",
        }
        .evaluate(filled(&brand.closing_date)),
    );

    ValidationReport { rules }
}

/// Every rule result, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rules: Vec<ValidationRule>,
}

impl ValidationReport {
    fn count(
        &self,
        status: ValidationStatus,
    ) -> usize {
        self.rules.iter().filter(|r| r.status == status).count()
    }

    pub fn pass_count(&self) -> usize {
        self.count(ValidationStatus::Pass)
    }

    pub fn fail_count(&self) -> usize {
        self.count(ValidationStatus::Fail)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ValidationStatus::Warning)
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.category) {
                seen.push(rule.category);
            }
        }
        seen
    }

    pub fn in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ValidationRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Validation & Compliance  ✓ {}", self.pass_count())?;
        if self.warning_count() > 0 {
            write!(f, "  ⚠ {}", self.warning_count())?;
        }
        if self.fail_count() > 0 {
            write!(f, "  ✗ {}", self.fail_count())?;
        }
        writeln!(f)?;
        for category in self.categories() {
            writeln!(f, "{category}")?;
            for rule in self.in_category(category) {
                let required = if rule.required { " (required)" } else { "" };
                writeln!(
                    f,
                    "  {} {}{}: {}",
                    rule.status.symbol(),
                    rule.rule,
                    required,
                    rule.message
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::builtin_templates;

    fn training_brand() -> BrandConfig {
        builtin_templates().remove(0).data
    }

    fn status_of(
        report: &ValidationReport,
        id: &str,
    ) -> Option<ValidationStatus> {
        report.get(id).map(|r| r.status)
    }

    #[test]
    fn brand_only_report_skips_form_rules() {
        let report = run_validations(&training_brand(), None);

        assert_eq!(report.rules.len(), 5);
        assert_eq!(report.pass_count(), 5);
        assert!(report.get("net-investment").is_none());
    }

    #[test]
    fn empty_brand_fails_required_and_warns_optional() {
        let report = run_validations(&BrandConfig::default(), None);

        assert_eq!(status_of(&report, "company-name"), Some(ValidationStatus::Fail));
        assert_eq!(status_of(&report, "contact-info"), Some(ValidationStatus::Warning));
        assert_eq!(status_of(&report, "investment-plans"), Some(ValidationStatus::Warning));
        assert_eq!(status_of(&report, "plan-codes"), Some(ValidationStatus::Fail));
        assert_eq!(status_of(&report, "closing-date"), Some(ValidationStatus::Info));
        assert_eq!(report.fail_count(), 2);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn net_investment_threshold_is_inclusive() {
        let brand = training_brand();
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "10500");
        record.update("adviserCharge", "500");

        let at_minimum = run_validations(&brand, Some(&record));
        record.update("adviserCharge", "500.01");
        let below = run_validations(&brand, Some(&record));

        assert_eq!(status_of(&at_minimum, "net-investment"), Some(ValidationStatus::Pass));
        assert_eq!(status_of(&below, "net-investment"), Some(ValidationStatus::Fail));
    }

    #[test]
    fn negative_net_investment_fails() {
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "5000");
        record.update("adviserCharge", "8000");

        let report = run_validations(&training_brand(), Some(&record));

        assert_eq!(status_of(&report, "net-investment"), Some(ValidationStatus::Fail));
    }

    #[test]
    fn form_rules_pass_with_complete_details() {
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "50000");
        record.update("bankName", "HSBC");
        record.update("sortCode", "40-00-00");
        record.update("accountNumber", "12345678");
        record.toggle(Field::PrimaryWealth, "salary", true);
        record.update("occupation", "Engineer");
        record.update("firmName", "Wise Advice LLP");
        record.update("adviserName", "Sam Patel");

        let report = run_validations(&training_brand(), Some(&record));

        assert_eq!(report.rules.len(), 9);
        assert_eq!(report.pass_count(), 9);
    }

    #[test]
    fn aml_and_adviser_gaps_are_warnings_not_failures() {
        let record = ApplicationRecord::new();

        let report = run_validations(&training_brand(), Some(&record));

        assert_eq!(status_of(&report, "aml-compliance"), Some(ValidationStatus::Warning));
        assert_eq!(status_of(&report, "adviser-details"), Some(ValidationStatus::Warning));
        assert_eq!(status_of(&report, "bank-details"), Some(ValidationStatus::Fail));
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let report = run_validations(&training_brand(), Some(&ApplicationRecord::new()));

        assert_eq!(
            report.categories(),
            vec![
                "Branding",
                "Investment Plans",
                "Investment Details",
                "Banking",
                "Compliance",
                "Regulatory",
            ]
        );
        assert_eq!(report.in_category("Regulatory").count(), 2);
    }
}
