//! End-to-end checks from a CSV on disk through rendering, export and HTTP.

use std::io::{Read, Write};
use std::net::TcpStream;

use heart_dashboard::export::to_csv_bytes;
use heart_dashboard::pages::{age_histogram, chest_pain_pie, resting_bp_scatter};
use heart_dashboard::{load_patients, render_selection, server, MenuOption, Selection};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use tempfile::NamedTempFile;

const HEART_CSV: &str = "\
Age,Sex,ChestPainType,RestingBP,Cholesterol,FastingBS,RestingECG,MaxHR,ExerciseAngina,Oldpeak,ST_Slope,HeartDisease
40,M,ATA,140,289,0,Normal,172,N,0,Up,0
49,F,NAP,160,180,0,Normal,156,N,1,Flat,1
37,M,ATA,130,283,0,ST,98,N,0,Up,0
48,F,ASY,138,214,0,Normal,108,Y,1.5,Flat,1
54,M,NAP,150,195,0,Normal,122,N,0,Up,0
58,M,ASY,136,164,0,ST,99,Y,2,Flat,1
65,M,TA,140,306,1,Normal,87,Y,1.5,Flat,1
60,M,ASY,100,248,0,Normal,125,N,1,Flat,1
63,M,ASY,150,223,0,Normal,115,N,0,Flat,1
45,F,ATA,130,0,0,Normal,170,N,0,Up,0
";

#[derive(Debug, Deserialize)]
struct ExportedRow {
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Sex")]
    sex: u8,
    #[serde(rename = "HeartDisease")]
    heart_disease: u8,
}

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn heart_csv() -> NamedTempFile {
    write_csv(HEART_CSV)
}

#[tokio::test]
async fn ten_patient_scenario() {
    let file = heart_csv();
    let df = load_patients(file.path()).await.unwrap();

    let hist = age_histogram(&df).unwrap();
    let lengths: Vec<usize> = hist.series.iter().map(|s| s.values.len()).collect();
    assert_eq!(lengths, vec![4, 2]);

    let pie = chest_pain_pie(&df).unwrap();
    assert_eq!(pie.total(), 6);
    let total: f64 = pie.percentages().iter().sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn blank_resting_bp_drops_only_that_patient() {
    let file = write_csv(
        "Age,Sex,ChestPainType,RestingBP,Cholesterol,HeartDisease\n\
         40,M,ATA,,289,0\n\
         49,F,NAP,160,180,1\n\
         70,M,ASY,200,250,1\n",
    );
    let df = load_patients(file.path()).await.unwrap();
    assert_eq!(df.height(), 3);

    let scatter = resting_bp_scatter(&df).unwrap();
    let mut points: Vec<(f64, f64)> = scatter.points().map(|p| (p.x, p.y)).collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    assert_eq!(points, vec![(49.0, 160.0), (70.0, 200.0)]);
}

#[tokio::test]
async fn unknown_selection_matches_download_page() {
    let file = heart_csv();
    let df = load_patients(file.path()).await.unwrap();
    let download = render_selection(&df, &Selection::Known(MenuOption::DownloadData)).unwrap();
    let other = render_selection(&df, &Selection::parse("Predict by Age")).unwrap();
    assert_eq!(other.to_html(), download.to_html());
}

#[tokio::test]
async fn export_keeps_every_row_with_binary_sex() {
    let file = heart_csv();
    let df = load_patients(file.path()).await.unwrap();
    let bytes = to_csv_bytes(&df).unwrap();
    assert_eq!(String::from_utf8_lossy(&bytes).lines().count(), df.height() + 1);

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let rows: Vec<ExportedRow> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.sex <= 1));
    assert_eq!(rows.iter().filter(|r| r.heart_disease == 1).count(), 6);
    assert_eq!(rows[0].age, 40);
}

fn get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[tokio::test]
async fn serves_pages_and_download() {
    let file = heart_csv();
    let df = load_patients(file.path()).await.unwrap();
    let listener = server::bind("127.0.0.1:0").unwrap();
    let addr = listener.server_addr().to_ip().unwrap();
    std::thread::spawn(move || server::serve(listener, df));

    let page = get(addr, "/?option=Predict+by+Cholesterol+Serum");
    assert!(page.starts_with("HTTP/1.1 200"));
    assert!(page.contains("<h2>Cholesterol Serum</h2>"));

    let download = get(addr, "/download");
    assert!(download.starts_with("HTTP/1.1 200"));
    assert!(download.contains("Content-Type: text/csv"));
    assert!(download.contains("attachment; filename=\"heartdiseasedata.csv\""));

    assert!(get(addr, "/missing").starts_with("HTTP/1.1 404"));
}
