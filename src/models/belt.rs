use serde::{Deserialize, Serialize};

/// Belt ranks in promotion order. The order is a strict total order:
/// promotions advance exactly one rank at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Belt {
    White,
    Blue,
    Purple,
    Brown,
    Black,
    Coral,
    Red,
}

/// Promotion requirements for advancing out of a given belt.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BeltRequirements {
    pub min_time_months: i64,
    pub min_classes: i64,
    pub min_attendance_rate: f64,
    pub next_belt: Belt,
}

impl Belt {
    /// All belts in promotion order
    pub const ORDER: [Belt; 7] = [
        Belt::White,
        Belt::Blue,
        Belt::Purple,
        Belt::Brown,
        Belt::Black,
        Belt::Coral,
        Belt::Red,
    ];

    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "white" => Ok(Belt::White),
            "blue" => Ok(Belt::Blue),
            "purple" => Ok(Belt::Purple),
            "brown" => Ok(Belt::Brown),
            "black" => Ok(Belt::Black),
            "coral" => Ok(Belt::Coral),
            "red" => Ok(Belt::Red),
            _ => Err(format!("Invalid belt: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Belt::White => "white",
            Belt::Blue => "blue",
            Belt::Purple => "purple",
            Belt::Brown => "brown",
            Belt::Black => "black",
            Belt::Coral => "coral",
            Belt::Red => "red",
        }
    }

    /// Position in the promotion order
    pub fn index(&self) -> usize {
        Self::ORDER.iter().position(|b| b == self).unwrap_or(0)
    }

    /// The belt one rank ahead, if any
    pub fn next(&self) -> Option<Belt> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Requirements for promotion out of this belt. Ranks past black have no
    /// defined requirement table.
    pub fn requirements(&self) -> Option<BeltRequirements> {
        match self {
            Belt::White => Some(BeltRequirements {
                min_time_months: 12,
                min_classes: 100,
                min_attendance_rate: 70.0,
                next_belt: Belt::Blue,
            }),
            Belt::Blue => Some(BeltRequirements {
                min_time_months: 24,
                min_classes: 200,
                min_attendance_rate: 75.0,
                next_belt: Belt::Purple,
            }),
            Belt::Purple => Some(BeltRequirements {
                min_time_months: 24,
                min_classes: 300,
                min_attendance_rate: 80.0,
                next_belt: Belt::Brown,
            }),
            Belt::Brown => Some(BeltRequirements {
                min_time_months: 12,
                min_classes: 200,
                min_attendance_rate: 85.0,
                next_belt: Belt::Black,
            }),
            Belt::Black => Some(BeltRequirements {
                min_time_months: 36,
                min_classes: 500,
                min_attendance_rate: 90.0,
                next_belt: Belt::Coral,
            }),
            Belt::Coral | Belt::Red => None,
        }
    }
}

impl From<String> for Belt {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(Belt::White)
    }
}

impl From<Belt> for String {
    fn from(belt: Belt) -> Self {
        belt.as_str().to_string()
    }
}

impl std::fmt::Display for Belt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
