use serde::{Deserialize, Serialize};

/// Budget tier for a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Cheap,
    Moderate,
    Expensive,
}

impl Budget {
    pub fn label(&self) -> &'static str {
        match self {
            Budget::Cheap => "cheap",
            Budget::Moderate => "moderate",
            Budget::Expensive => "expensive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiningTime {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

impl DiningTime {
    pub fn label(&self) -> &'static str {
        match self {
            DiningTime::Breakfast => "breakfast",
            DiningTime::Lunch => "lunch",
            DiningTime::Dinner => "dinner",
            DiningTime::LateNight => "late night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Casual,
    Special,
    Business,
}

impl Experience {
    pub fn label(&self) -> &'static str {
        match self {
            Experience::Casual => "casual",
            Experience::Special => "special occasion",
            Experience::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    Quiet,
    Moderate,
    Lively,
}

impl NoiseLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoiseLevel::Quiet => "quiet",
            NoiseLevel::Moderate => "moderate",
            NoiseLevel::Lively => "lively",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatingArea {
    Indoor,
    Outdoor,
    Bar,
}

impl SeatingArea {
    pub fn label(&self) -> &'static str {
        match self {
            SeatingArea::Indoor => "indoor",
            SeatingArea::Outdoor => "outdoor",
            SeatingArea::Bar => "bar",
        }
    }
}

/// Dining preferences collected from the question flow
///
/// Every field is independently optional or empty. Absence means "no
/// constraint", never "explicitly excluded". Immutable once handed to the
/// prompt builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub has_transport: Option<bool>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub ambiance: Vec<String>,
    #[serde(default)]
    pub dining_time: Option<DiningTime>,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub experience: Option<Experience>,
    #[serde(default)]
    pub noise: Option<NoiseLevel>,
    #[serde(default)]
    pub seating: Option<SeatingArea>,
}

impl UserPreferences {
    /// Whether no constraint has been expressed at all
    pub fn is_unconstrained(&self) -> bool {
        self.budget.is_none()
            && self.has_transport.is_none()
            && self.cuisines.is_empty()
            && self.ambiance.is_empty()
            && self.dining_time.is_none()
            && self.dietary.is_empty()
            && self.experience.is_none()
            && self.noise.is_none()
            && self.seating.is_none()
    }
}
