use polars::prelude::{DataType, Field, Schema};

use crate::error::{DashboardError, Result};

pub const AGE: &str = "Age";
pub const SEX: &str = "Sex";
pub const RESTING_BP: &str = "RestingBP";
pub const CHOLESTEROL: &str = "Cholesterol";
pub const CHEST_PAIN_TYPE: &str = "ChestPainType";
pub const HEART_DISEASE: &str = "HeartDisease";

pub const REQUIRED_COLUMNS: [&str; 6] = [AGE, SEX, RESTING_BP, CHOLESTEROL, CHEST_PAIN_TYPE, HEART_DISEASE];

pub struct HeartRecord {
}

impl HeartRecord {
    /// Dtypes forced on the required columns when reading `heart.csv`.
    /// Any other column in the file keeps its inferred dtype.
    pub fn raw_schema() -> Schema {
        Schema::from_iter(
            vec![
                Field::new(AGE, DataType::Int64),
                Field::new(SEX, DataType::Utf8),
                Field::new(RESTING_BP, DataType::Int64),
                Field::new(CHOLESTEROL, DataType::Int64),
                Field::new(CHEST_PAIN_TYPE, DataType::Utf8),
                Field::new(HEART_DISEASE, DataType::Int64),
            ])
    }
}

/// Patient sex with fixed integer codes: female is 0, male is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Sex::Male),
            "F" | "FEMALE" => Ok(Sex::Female),
            _ => Err(DashboardError::UnknownSexLabel { label: label.to_string() }),
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Sex::Female),
            1 => Some(Sex::Male),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Sex::Female => 0,
            Sex::Male => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChestPainType {
    Asy,
    Ata,
    Nap,
    Ta,
}

impl ChestPainType {
    /// Order the chest pain chart lays its wedges out in.
    pub const PIE_ORDER: [ChestPainType; 4] = [ChestPainType::Asy, ChestPainType::Ta, ChestPainType::Ata, ChestPainType::Nap];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ASY" => Some(ChestPainType::Asy),
            "ATA" => Some(ChestPainType::Ata),
            "NAP" => Some(ChestPainType::Nap),
            "TA" => Some(ChestPainType::Ta),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ChestPainType::Asy => "ASY",
            ChestPainType::Ata => "ATA",
            ChestPainType::Nap => "NAP",
            ChestPainType::Ta => "TA",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChestPainType::Asy => "Asymptomatic",
            ChestPainType::Ata => "Atypical Angina",
            ChestPainType::Nap => "Non-Anginal Pain",
            ChestPainType::Ta => "Typical Angina",
        }
    }
}
