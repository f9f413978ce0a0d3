//! Derived views over the loaded patient table.
//!
//! Each view is a fresh `DataFrame`; the loaded table is never modified.

use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::records::{ChestPainType, Sex, AGE, CHEST_PAIN_TYPE, CHOLESTEROL, HEART_DISEASE, RESTING_BP, SEX};

/// Patients diagnosed with heart disease whose cholesterol was recorded
/// (a reading of zero means missing).
pub fn diseased_with_cholesterol(df: &DataFrame) -> Result<DataFrame> {
    let view = df
        .clone()
        .lazy()
        .filter(col(HEART_DISEASE).eq(lit(1)).and(col(CHOLESTEROL).gt(lit(0))))
        .collect()?;
    Ok(view)
}

#[derive(Debug, Clone)]
pub struct SexSplit {
    pub male: DataFrame,
    pub female: DataFrame,
}

pub fn split_by_sex(view: &DataFrame) -> Result<SexSplit> {
    Ok(SexSplit {
        male: rows_with_sex(view, Sex::Male)?,
        female: rows_with_sex(view, Sex::Female)?,
    })
}

fn rows_with_sex(view: &DataFrame, sex: Sex) -> Result<DataFrame> {
    let rows = view
        .clone()
        .lazy()
        .filter(col(SEX).eq(lit(sex.code())))
        .collect()?;
    Ok(rows)
}

/// Every patient, projected to the columns the blood pressure chart plots.
pub fn age_resting_bp(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.select([AGE, RESTING_BP, SEX])?)
}

/// Row counts per chest pain category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChestPainCounts {
    #[serde(rename = "ASY")]
    pub asy: usize,
    #[serde(rename = "TA")]
    pub ta: usize,
    #[serde(rename = "ATA")]
    pub ata: usize,
    #[serde(rename = "NAP")]
    pub nap: usize,
}

impl ChestPainCounts {
    pub fn get(&self, kind: ChestPainType) -> usize {
        match kind {
            ChestPainType::Asy => self.asy,
            ChestPainType::Ata => self.ata,
            ChestPainType::Nap => self.nap,
            ChestPainType::Ta => self.ta,
        }
    }

    fn bump(&mut self, kind: ChestPainType) {
        match kind {
            ChestPainType::Asy => self.asy += 1,
            ChestPainType::Ata => self.ata += 1,
            ChestPainType::Nap => self.nap += 1,
            ChestPainType::Ta => self.ta += 1,
        }
    }

    /// Counts in pie order: ASY, TA, ATA, NAP.
    pub fn entries(&self) -> [(ChestPainType, usize); 4] {
        ChestPainType::PIE_ORDER.map(|kind| (kind, self.get(kind)))
    }

    pub fn total(&self) -> usize {
        self.asy + self.ta + self.ata + self.nap
    }

    /// Share of each category in pie order. All zero for an empty view.
    pub fn percentages(&self) -> [f64; 4] {
        let total = self.total();
        self.entries().map(|(_, n)| if total == 0 { 0.0 } else { n as f64 * 100.0 / total as f64 })
    }
}

/// Counts chest pain categories; codes outside the four known ones are skipped.
pub fn chest_pain_counts(view: &DataFrame) -> Result<ChestPainCounts> {
    let mut counts = ChestPainCounts::default();
    for code in view.column(CHEST_PAIN_TYPE)?.utf8()?.into_iter().flatten() {
        if let Some(kind) = ChestPainType::from_code(code) {
            counts.bump(kind);
        }
    }
    Ok(counts)
}

/// Rows of `columns` with a value in every one of them. Columns pulled out
/// of the result stay aligned row by row.
pub fn complete_rows(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    Ok(df.select(columns.iter().copied())?.drop_nulls(Some(columns))?)
}

/// Non-null values of an integer column.
pub fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    Ok(df.column(name)?.i64()?.into_iter().flatten().collect())
}

/// Row counts of every view, as printed by `summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub total_rows: usize,
    pub diseased_with_cholesterol: usize,
    pub male: usize,
    pub female: usize,
    pub chest_pain: ChestPainCounts,
}

impl ViewSummary {
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let diseased = diseased_with_cholesterol(df)?;
        let split = split_by_sex(&diseased)?;
        Ok(ViewSummary {
            total_rows: df.height(),
            diseased_with_cholesterol: diseased.height(),
            male: split.male.height(),
            female: split.female.height(),
            chest_pain: chest_pain_counts(&diseased)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_table;
    use pretty_assertions::assert_eq;

    #[test]
    fn diseased_view_only_keeps_flagged_rows_with_cholesterol() {
        let df = df!(
            AGE => &[50i64, 51, 52, 53],
            SEX => &[1i64, 0, 1, 0],
            RESTING_BP => &[120i64, 130, 140, 150],
            CHOLESTEROL => &[200i64, 0, 180, 210],
            CHEST_PAIN_TYPE => &["ASY", "ATA", "NAP", "TA"],
            HEART_DISEASE => &[1i64, 1, 0, 1]
        )
        .unwrap();
        let view = diseased_with_cholesterol(&df).unwrap();
        assert_eq!(view.height(), 2);
        assert!(int_column(&view, HEART_DISEASE).unwrap().iter().all(|&f| f == 1));
        assert!(int_column(&view, CHOLESTEROL).unwrap().iter().all(|&c| c > 0));
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn sex_split_partitions_the_view() {
        let view = diseased_with_cholesterol(&sample_table()).unwrap();
        let split = split_by_sex(&view).unwrap();
        assert_eq!(split.male.height(), 4);
        assert_eq!(split.female.height(), 2);
        assert_eq!(split.male.height() + split.female.height(), view.height());

        let mut ages = int_column(&split.male, AGE).unwrap();
        ages.extend(int_column(&split.female, AGE).unwrap());
        ages.sort_unstable();
        let mut expected = int_column(&view, AGE).unwrap();
        expected.sort_unstable();
        assert_eq!(ages, expected);
    }

    #[test]
    fn chest_pain_counts_sum_to_view_height() {
        let view = diseased_with_cholesterol(&sample_table()).unwrap();
        let counts = chest_pain_counts(&view).unwrap();
        assert_eq!(counts, ChestPainCounts { asy: 4, ta: 1, ata: 0, nap: 1 });
        assert_eq!(counts.total(), view.height());
        let pct: f64 = counts.percentages().iter().sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_chest_pain_codes_are_not_counted() {
        let df = df!(CHEST_PAIN_TYPE => &["ASY", "XYZ", "TA"]).unwrap();
        assert_eq!(chest_pain_counts(&df).unwrap().total(), 2);
    }

    #[test]
    fn projection_keeps_all_rows() {
        let df = sample_table();
        let projected = age_resting_bp(&df).unwrap();
        assert_eq!(projected.height(), df.height());
        assert_eq!(projected.get_column_names(), vec![AGE, RESTING_BP, SEX]);
    }

    #[test]
    fn complete_rows_skips_rows_with_any_gap() {
        let df = df!(
            AGE => &[Some(40i64), Some(49), Some(70), None],
            RESTING_BP => &[None, Some(160i64), Some(200), Some(120)],
            SEX => &[1i64, 0, 1, 0]
        )
        .unwrap();
        let rows = complete_rows(&df, &[AGE, RESTING_BP]).unwrap();
        assert_eq!(rows.get_column_names(), vec![AGE, RESTING_BP]);
        assert_eq!(int_column(&rows, AGE).unwrap(), vec![49, 70]);
        assert_eq!(int_column(&rows, RESTING_BP).unwrap(), vec![160, 200]);
    }

    #[test]
    fn summary_matches_views() {
        let summary = ViewSummary::from_table(&sample_table()).unwrap();
        assert_eq!(summary.total_rows, 10);
        assert_eq!(summary.diseased_with_cholesterol, 6);
        assert_eq!((summary.male, summary.female), (4, 2));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["chest_pain"]["ASY"], 4);
    }
}
