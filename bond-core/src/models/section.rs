use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::Field;

/// The seven tabs of the application form, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Purchaser,
    Section1,
    Section2,
    Section3,
    Section4,
    Section5,
    Section6,
}

impl Section {
    /// Every section, first tab to last.
    pub const ALL: [Section; 7] = [
        Self::Purchaser,
        Self::Section1,
        Self::Section2,
        Self::Section3,
        Self::Section4,
        Self::Section5,
        Self::Section6,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchaser => "purchaser",
            Self::Section1 => "section1",
            Self::Section2 => "section2",
            Self::Section3 => "section3",
            Self::Section4 => "section4",
            Self::Section5 => "section5",
            Self::Section6 => "section6",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchaser" => Some(Self::Purchaser),
            "section1" => Some(Self::Section1),
            "section2" => Some(Self::Section2),
            "section3" => Some(Self::Section3),
            "section4" => Some(Self::Section4),
            "section5" => Some(Self::Section5),
            "section6" => Some(Self::Section6),
            _ => None,
        }
    }

    /// Heading shown on the section's tab.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Purchaser => "Purchaser Details",
            Self::Section1 => "Bond Provider",
            Self::Section2 => "Bank Details",
            Self::Section3 => "Investment Selection",
            Self::Section4 => "Funding",
            Self::Section5 => "Personal Circumstances",
            Self::Section6 => "Financial Adviser",
        }
    }

    /// Zero-based position in [`Section::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Purchaser => 0,
            Self::Section1 => 1,
            Self::Section2 => 2,
            Self::Section3 => 3,
            Self::Section4 => 4,
            Self::Section5 => 5,
            Self::Section6 => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn first() -> Self {
        Self::Purchaser
    }

    pub fn last() -> Self {
        Self::Section6
    }

    /// Fields that belong to this section, in display order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| f.section() == self)
    }
}

impl fmt::Display for Section {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
