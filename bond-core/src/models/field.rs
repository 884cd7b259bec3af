use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::section::Section;

/// Whether a field holds free text or a checkbox group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Set,
}

/// Every field the application form knows about.
///
/// The wire name (camelCase) is what the host, the exports and the
/// session scripts use to address a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Purchaser
    Title,
    FirstName,
    LastName,
    DateOfBirth,
    Nationality,
    EmailAddress,
    Telephone,
    ResidentialAddress,
    Postcode,
    InitialDepositAmount,
    InvestorExperience,
    RiskTolerance,

    // Section 1: bond provider
    BondProvider,
    BondReference,
    BondProviderAddress,

    // Section 2: bank
    BankName,
    AccountName,
    SortCode,
    AccountNumber,

    // Section 3: investment selection
    SelectedPlan,
    SigningAuthority,

    // Section 4: funding
    TotalAmount,
    AdviserCharge,
    NetInvestment,
    FundingMethod,

    // Section 5: personal circumstances
    EmploymentStatus,
    Occupation,
    EmployerName,
    PrimaryWealth,
    PrimaryFunds,

    // Section 6: adviser
    FirmName,
    AdviserName,
    AdviserReference,
    AdviserEmail,
    AdviserPhone,
}

impl Field {
    pub const ALL: [Field; 35] = [
        Self::Title,
        Self::FirstName,
        Self::LastName,
        Self::DateOfBirth,
        Self::Nationality,
        Self::EmailAddress,
        Self::Telephone,
        Self::ResidentialAddress,
        Self::Postcode,
        Self::InitialDepositAmount,
        Self::InvestorExperience,
        Self::RiskTolerance,
        Self::BondProvider,
        Self::BondReference,
        Self::BondProviderAddress,
        Self::BankName,
        Self::AccountName,
        Self::SortCode,
        Self::AccountNumber,
        Self::SelectedPlan,
        Self::SigningAuthority,
        Self::TotalAmount,
        Self::AdviserCharge,
        Self::NetInvestment,
        Self::FundingMethod,
        Self::EmploymentStatus,
        Self::Occupation,
        Self::EmployerName,
        Self::PrimaryWealth,
        Self::PrimaryFunds,
        Self::FirmName,
        Self::AdviserName,
        Self::AdviserReference,
        Self::AdviserEmail,
        Self::AdviserPhone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::DateOfBirth => "dateOfBirth",
            Self::Nationality => "nationality",
            Self::EmailAddress => "emailAddress",
            Self::Telephone => "telephone",
            Self::ResidentialAddress => "residentialAddress",
            Self::Postcode => "postcode",
            Self::InitialDepositAmount => "initialDepositAmount",
            Self::InvestorExperience => "investorExperience",
            Self::RiskTolerance => "riskTolerance",
            Self::BondProvider => "bondProvider",
            Self::BondReference => "bondReference",
            Self::BondProviderAddress => "bondProviderAddress",
            Self::BankName => "bankName",
            Self::AccountName => "accountName",
            Self::SortCode => "sortCode",
            Self::AccountNumber => "accountNumber",
            Self::SelectedPlan => "selectedPlan",
            Self::SigningAuthority => "signingAuthority",
            Self::TotalAmount => "totalAmount",
            Self::AdviserCharge => "adviserCharge",
            Self::NetInvestment => "netInvestment",
            Self::FundingMethod => "fundingMethod",
            Self::EmploymentStatus => "employmentStatus",
            Self::Occupation => "occupation",
            Self::EmployerName => "employerName",
            Self::PrimaryWealth => "primaryWealth",
            Self::PrimaryFunds => "primaryFunds",
            Self::FirmName => "firmName",
            Self::AdviserName => "adviserName",
            Self::AdviserReference => "adviserReference",
            Self::AdviserEmail => "adviserEmail",
            Self::AdviserPhone => "adviserPhone",
        }
    }

    /// Looks a field up by its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn section(&self) -> Section {
        match self {
            Self::Title
            | Self::FirstName
            | Self::LastName
            | Self::DateOfBirth
            | Self::Nationality
            | Self::EmailAddress
            | Self::Telephone
            | Self::ResidentialAddress
            | Self::Postcode
            | Self::InitialDepositAmount
            | Self::InvestorExperience
            | Self::RiskTolerance => Section::Purchaser,
            Self::BondProvider | Self::BondReference | Self::BondProviderAddress => {
                Section::Section1
            }
            Self::BankName | Self::AccountName | Self::SortCode | Self::AccountNumber => {
                Section::Section2
            }
            Self::SelectedPlan | Self::SigningAuthority => Section::Section3,
            Self::TotalAmount | Self::AdviserCharge | Self::NetInvestment | Self::FundingMethod => {
                Section::Section4
            }
            Self::EmploymentStatus
            | Self::Occupation
            | Self::EmployerName
            | Self::PrimaryWealth
            | Self::PrimaryFunds => Section::Section5,
            Self::FirmName
            | Self::AdviserName
            | Self::AdviserReference
            | Self::AdviserEmail
            | Self::AdviserPhone => Section::Section6,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::InitialDepositAmount
            | Self::InvestorExperience
            | Self::RiskTolerance
            | Self::EmploymentStatus
            | Self::PrimaryWealth
            | Self::PrimaryFunds => FieldKind::Set,
            _ => FieldKind::Text,
        }
    }

    /// `true` for fields computed from other fields and never set directly.
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::NetInvestment)
    }

    /// Human label used by the print view.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::DateOfBirth => "Date of birth",
            Self::Nationality => "Nationality",
            Self::EmailAddress => "Email address",
            Self::Telephone => "Telephone",
            Self::ResidentialAddress => "Residential address",
            Self::Postcode => "Postcode",
            Self::InitialDepositAmount => "Initial deposit amount",
            Self::InvestorExperience => "Investor experience",
            Self::RiskTolerance => "Risk tolerance",
            Self::BondProvider => "Bond provider",
            Self::BondReference => "Bond reference",
            Self::BondProviderAddress => "Provider address",
            Self::BankName => "Bank name",
            Self::AccountName => "Account name",
            Self::SortCode => "Sort code",
            Self::AccountNumber => "Account number",
            Self::SelectedPlan => "Selected plan",
            Self::SigningAuthority => "Signing authority",
            Self::TotalAmount => "Total amount",
            Self::AdviserCharge => "Adviser charge",
            Self::NetInvestment => "Net investment",
            Self::FundingMethod => "Funding method",
            Self::EmploymentStatus => "Employment status",
            Self::Occupation => "Occupation",
            Self::EmployerName => "Employer name",
            Self::PrimaryWealth => "Primary source of wealth",
            Self::PrimaryFunds => "Primary source of funds",
            Self::FirmName => "Firm name",
            Self::AdviserName => "Adviser name",
            Self::AdviserReference => "Adviser reference",
            Self::AdviserEmail => "Adviser email",
            Self::AdviserPhone => "Adviser phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value held by one field: free text or a checkbox group.
///
/// Serialised untagged, so a JSON string is text and a JSON array is a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Set(BTreeSet<String>),
}

impl FieldValue {
    /// The empty value for a field of the given kind.
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Set => Self::Set(BTreeSet::new()),
        }
    }

    /// Builds a set value; duplicate members collapse into one.
    pub fn set<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(members.into_iter().map(Into::into).collect())
    }

    /// `true` when the text is non-empty or the set has at least one member.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Set(members) => !members.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Set(_) => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Text(_) => None,
            Self::Set(members) => Some(members),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<BTreeSet<String>> for FieldValue {
    fn from(value: BTreeSet<String>) -> Self {
        Self::Set(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Set(members) => {
                let joined: Vec<&str> = members.iter().map(String::as_str).collect();
                f.write_str(&joined.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_finds_every_wire_name() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Field::parse("FirstName"), None);
        assert_eq!(Field::parse("firstname"), None);
    }

    #[test]
    fn only_net_investment_is_derived() {
        let derived: Vec<Field> = Field::ALL.into_iter().filter(Field::is_derived).collect();

        assert_eq!(derived, vec![Field::NetInvestment]);
    }

    #[test]
    fn checkbox_groups_are_set_fields() {
        for field in [
            Field::InitialDepositAmount,
            Field::InvestorExperience,
            Field::RiskTolerance,
            Field::PrimaryWealth,
            Field::PrimaryFunds,
            Field::EmploymentStatus,
        ] {
            assert_eq!(field.kind(), FieldKind::Set, "{field}");
        }
        assert_eq!(Field::FirstName.kind(), FieldKind::Text);
    }

    #[test]
    fn set_constructor_drops_duplicates() {
        let value = FieldValue::set(["low", "medium", "low"]);

        assert_eq!(value.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn json_strings_and_arrays_map_to_text_and_set() {
        let text: FieldValue = serde_json::from_str("\"Jane\"").unwrap();
        let set: FieldValue = serde_json::from_str("[\"b\", \"a\", \"b\"]").unwrap();

        assert_eq!(text, FieldValue::from("Jane"));
        assert_eq!(set, FieldValue::set(["a", "b"]));
    }

    #[test]
    fn display_joins_set_members() {
        assert_eq!(FieldValue::set(["salary", "inheritance"]).to_string(), "inheritance, salary");
    }
}
