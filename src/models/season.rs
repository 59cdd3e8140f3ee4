use std::fmt;

/// Month tokens of observation dates, January first
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar season used as a one-hot feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
    PostMonsoon,
}

impl Season {
    /// Output column order of the one-hot block
    pub const COLUMN_ORDER: [Season; 4] = [
        Season::Monsoon,
        Season::PostMonsoon,
        Season::Summer,
        Season::Winter,
    ];

    /// Season for a calendar month (1 = January)
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 | 3 | 4 => Some(Season::Winter),
            5..=7 => Some(Season::Summer),
            8 | 9 => Some(Season::Monsoon),
            10 | 11 => Some(Season::PostMonsoon),
            _ => None,
        }
    }

    /// Season for an exact month token such as `"Aug"`; case matters
    pub fn from_abbreviation(token: &str) -> Option<Self> {
        MONTH_ABBREVIATIONS
            .iter()
            .position(|m| *m == token)
            .and_then(|idx| Self::from_month(idx as u32 + 1))
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::PostMonsoon => "Post-Monsoon",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
