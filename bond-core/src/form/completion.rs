//! Section completion rules.
//!
//! Each section is complete when all of its required fields are filled
//! (non-empty text, or a checkbox group with at least one member):
//!
//! | section   | required fields |
//! |-----------|-----------------|
//! | purchaser | firstName, lastName, dateOfBirth, emailAddress, residentialAddress, initialDepositAmount, investorExperience, riskTolerance |
//! | section1  | bondProvider, bondReference |
//! | section2  | bankName, accountName, sortCode |
//! | section3  | selectedPlan, signingAuthority |
//! | section4  | totalAmount, fundingMethod |
//! | section5  | primaryWealth, primaryFunds, employmentStatus, occupation |
//! | section6  | firmName, adviserName |
//!
//! Nothing is cached; every call reads the record as it is now.

use super::record::ApplicationRecord;
use crate::models::{Field, Section};

/// Fields that must be filled for `section` to count as complete.
pub fn required_fields(section: Section) -> &'static [Field] {
    match section {
        Section::Purchaser => &[
            Field::FirstName,
            Field::LastName,
            Field::DateOfBirth,
            Field::EmailAddress,
            Field::ResidentialAddress,
            Field::InitialDepositAmount,
            Field::InvestorExperience,
            Field::RiskTolerance,
        ],
        Section::Section1 => &[Field::BondProvider, Field::BondReference],
        Section::Section2 => &[Field::BankName, Field::AccountName, Field::SortCode],
        Section::Section3 => &[Field::SelectedPlan, Field::SigningAuthority],
        Section::Section4 => &[Field::TotalAmount, Field::FundingMethod],
        Section::Section5 => &[
            Field::PrimaryWealth,
            Field::PrimaryFunds,
            Field::EmploymentStatus,
            Field::Occupation,
        ],
        Section::Section6 => &[Field::FirmName, Field::AdviserName],
    }
}

pub fn is_complete(
    section: Section,
    record: &ApplicationRecord,
) -> bool {
    required_fields(section)
        .iter()
        .all(|field| record.is_filled(*field))
}

/// Like [`is_complete`] but keyed by section name; unknown names are never
/// complete.
pub fn is_section_complete(
    name: &str,
    record: &ApplicationRecord,
) -> bool {
    Section::parse(name).is_some_and(|section| is_complete(section, record))
}

/// Required fields of `section` that are still empty.
pub fn missing_fields(
    section: Section,
    record: &ApplicationRecord,
) -> Vec<Field> {
    required_fields(section)
        .iter()
        .copied()
        .filter(|field| !record.is_filled(*field))
        .collect()
}

pub fn completed_sections(record: &ApplicationRecord) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| is_complete(*section, record))
        .collect()
}

/// `round(100 × complete / 7)`, rounding halves up.
pub fn completion_percentage(record: &ApplicationRecord) -> u8 {
    percentage_of(completed_sections(record).len())
}

fn percentage_of(complete: usize) -> u8 {
    let total = Section::COUNT;
    // (200k + n) / 2n is round-half-up of 100k / n in integer arithmetic
    ((200 * complete + total) / (2 * total)) as u8
}

pub fn is_form_complete(record: &ApplicationRecord) -> bool {
    completion_percentage(record) == 100
}
