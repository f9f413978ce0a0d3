//! Page rendering for each menu entry.
//!
//! Every request renders its page from scratch against the loaded table;
//! the derived views are recomputed each time.

use plotters::style::RGBColor;
use polars::prelude::DataFrame;

use crate::charts::{escape, to_f64s, Histogram, HistogramSeries, Pie, PieSlice, Scatter, ScatterGroup, ScatterPoint};
use crate::error::Result;
use crate::menu::{MenuOption, Selection};
use crate::records::{Sex, AGE, CHOLESTEROL, RESTING_BP, SEX};
use crate::views::{
    age_resting_bp, chest_pain_counts, complete_rows, diseased_with_cholesterol, int_column, split_by_sex,
};

pub const TITLE: &str = "Heart Failure Prediction";
pub const DOWNLOAD_PATH: &str = "/download";

const MALE_COLOR: RGBColor = RGBColor(0x94, 0xD2, 0xF8);
const FEMALE_COLOR: RGBColor = RGBColor(0xFE, 0x93, 0xBA);
const CHOLESTEROL_COLOR: RGBColor = RGBColor(0xFE, 0xA2, 0x93);

const INTRO: [&str; 2] = [
    "Cardiovascular diseases (CVDs) are the number 1 cause of death globally, \
     taking an estimated 17.9 million lives each year, which accounts for 31% of all deaths worldwide.",
    "People with cardiovascular disease or who are at high cardiovascular risk (due to the presence of \
     one or more risk factors such as hypertension, diabetes, hyperlipidaemia or already established disease) \
     need early detection and management wherein a machine learning model can be of great help.",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Header(String),
    Chart(String),
    DownloadButton { label: String, href: String, file_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub option: MenuOption,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
        out.push_str(&format!("<title>{TITLE}</title>"));
        out.push_str(
            "<style>body{margin:0;font-family:sans-serif;display:flex}\
             aside{width:260px;min-height:100vh;background:#f0f2f6;padding:24px;box-sizing:border-box}\
             main{padding:24px 48px;max-width:760px}\
             a.button{display:inline-block;padding:8px 16px;border:1px solid #ccc;border-radius:6px;color:#262730;text-decoration:none}\
             </style></head><body>",
        );
        out.push_str("<aside><form method=\"get\" action=\"/\"><label for=\"option\">Menu:</label><br>");
        out.push_str("<select id=\"option\" name=\"option\" onchange=\"this.form.submit()\">");
        for option in MenuOption::ALL {
            let selected = if option == self.option { " selected" } else { "" };
            out.push_str(&format!(
                "<option value=\"{}\"{selected}>{}</option>",
                escape(option.label()),
                escape(option.label())
            ));
        }
        out.push_str("</select><noscript><button type=\"submit\">Show</button></noscript></form></aside>");
        out.push_str(&format!("<main><h1>{TITLE}</h1>"));
        for block in &self.blocks {
            match block {
                Block::Text(text) => out.push_str(&format!("<p>{}</p>", escape(text))),
                Block::Header(text) => out.push_str(&format!("<h2>{}</h2>", escape(text))),
                Block::Chart(svg) => out.push_str(&format!("<figure>{svg}</figure>")),
                Block::DownloadButton { label, href, file_name } => out.push_str(&format!(
                    "<a class=\"button\" href=\"{}\" download=\"{}\">{}</a>",
                    escape(href),
                    escape(file_name),
                    escape(label)
                )),
            }
        }
        out.push_str("</main></body></html>");
        out
    }

    #[cfg(test)]
    fn charts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Chart(svg) => Some(svg.as_str()),
            _ => None,
        })
    }
}

pub fn render_selection(df: &DataFrame, selection: &Selection) -> Result<Page> {
    render(df, selection.resolve())
}

pub fn render(df: &DataFrame, option: MenuOption) -> Result<Page> {
    let blocks = match option {
        MenuOption::Homepage => homepage(df)?,
        MenuOption::RestingBloodPressure => resting_blood_pressure(df)?,
        MenuOption::CholesterolSerum => cholesterol(df)?,
        MenuOption::ChestPainType => chest_pain(df)?,
        MenuOption::DownloadData => download(),
    };
    Ok(Page { option, blocks })
}

/// The overview histogram: ages of diagnosed patients, split by sex.
pub fn age_histogram(df: &DataFrame) -> Result<Histogram> {
    let split = split_by_sex(&diseased_with_cholesterol(df)?)?;
    Ok(Histogram {
        id: "age-histogram".to_string(),
        title: "Number of patients diagnosed with heart disease".to_string(),
        x_label: "Age".to_string(),
        y_label: "Number of patients".to_string(),
        bins: 10,
        series: vec![
            HistogramSeries {
                label: Sex::Male.display_name().to_string(),
                color: MALE_COLOR,
                values: to_f64s(&int_column(&split.male, AGE)?),
            },
            HistogramSeries {
                label: Sex::Female.display_name().to_string(),
                color: FEMALE_COLOR,
                values: to_f64s(&int_column(&split.female, AGE)?),
            },
        ],
    })
}

fn homepage(df: &DataFrame) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = INTRO.iter().map(|p| Block::Text(p.to_string())).collect();
    blocks.push(Block::Header("Overview".to_string()));
    blocks.push(Block::Chart(age_histogram(df)?.to_svg()?));
    Ok(blocks)
}

fn sex_group(sex: Sex) -> ScatterGroup {
    ScatterGroup {
        label: Some(format!("Sex {}", sex.code())),
        color: match sex {
            Sex::Male => MALE_COLOR,
            Sex::Female => FEMALE_COLOR,
        },
        points: Vec::new(),
    }
}

/// Age against resting blood pressure for every patient, one group per sex.
/// A row missing any plotted value is left out.
pub fn resting_bp_scatter(df: &DataFrame) -> Result<Scatter> {
    let rows = complete_rows(&age_resting_bp(df)?, &[AGE, RESTING_BP, SEX])?;
    let mut female = sex_group(Sex::Female);
    let mut male = sex_group(Sex::Male);
    let ages = int_column(&rows, AGE)?;
    let pressures = int_column(&rows, RESTING_BP)?;
    let sexes = int_column(&rows, SEX)?;
    for ((age, bp), sex) in ages.into_iter().zip(pressures).zip(sexes) {
        let group = match Sex::from_code(sex) {
            Some(Sex::Female) => &mut female,
            Some(Sex::Male) => &mut male,
            None => continue,
        };
        group.points.push(ScatterPoint {
            x: age as f64,
            y: bp as f64,
            tooltip: Some(format!("Age: {age}\nRestingBP: {bp}\nSex: {sex}")),
        });
    }
    Ok(Scatter {
        id: "resting-bp-scatter".to_string(),
        title: String::new(),
        x_label: "Age".to_string(),
        y_label: "RestingBP".to_string(),
        groups: vec![female, male],
        interactive: true,
    })
}

fn resting_blood_pressure(df: &DataFrame) -> Result<Vec<Block>> {
    Ok(vec![
        Block::Header("Resting Blood Pressure".to_string()),
        Block::Chart(resting_bp_scatter(df)?.to_svg()?),
    ])
}

pub fn cholesterol_scatter(df: &DataFrame) -> Result<Scatter> {
    let rows = complete_rows(&diseased_with_cholesterol(df)?, &[AGE, CHOLESTEROL])?;
    let points = int_column(&rows, AGE)?
        .into_iter()
        .zip(int_column(&rows, CHOLESTEROL)?)
        .map(|(age, level)| ScatterPoint { x: age as f64, y: level as f64, tooltip: None })
        .collect();
    Ok(Scatter {
        id: "cholesterol-scatter".to_string(),
        title: "Cholesterol serum and age".to_string(),
        x_label: "Age".to_string(),
        y_label: "Cholesterol".to_string(),
        groups: vec![ScatterGroup { label: None, color: CHOLESTEROL_COLOR, points }],
        interactive: false,
    })
}

fn cholesterol(df: &DataFrame) -> Result<Vec<Block>> {
    Ok(vec![
        Block::Header("Cholesterol Serum".to_string()),
        Block::Chart(cholesterol_scatter(df)?.to_svg()?),
    ])
}

/// First wedge sits in place, the rest are pulled out by a tenth of the radius.
const EXPLODE: [f64; 4] = [0.0, 0.1, 0.1, 0.1];

pub fn chest_pain_pie(df: &DataFrame) -> Result<Pie> {
    let counts = chest_pain_counts(&diseased_with_cholesterol(df)?)?;
    let slices = counts
        .entries()
        .iter()
        .zip(EXPLODE)
        .map(|(&(kind, value), explode)| PieSlice { label: kind.label().to_string(), value, explode })
        .collect();
    Ok(Pie {
        id: "chest-pain-pie".to_string(),
        title: "Percentage of patients with reported chest pain".to_string(),
        slices,
    })
}

fn chest_pain(df: &DataFrame) -> Result<Vec<Block>> {
    let pie = chest_pain_pie(df)?;
    let chart = if pie.total() == 0 {
        Block::Text("No patients with heart disease and a recorded cholesterol level.".to_string())
    } else {
        Block::Chart(pie.to_svg()?)
    };
    Ok(vec![Block::Header("Chest Pain Type".to_string()), chart])
}

fn download() -> Vec<Block> {
    vec![
        Block::Header("Download".to_string()),
        Block::Text("You can download the data used in this analysis.".to_string()),
        Block::DownloadButton {
            label: "Download data as CSV".to_string(),
            href: DOWNLOAD_PATH.to_string(),
            file_name: crate::export::EXPORT_FILE_NAME.to_string(),
        },
    ]
}
