//! Ten-patient table shared by the unit tests: six diagnosed with a
//! recorded cholesterol (four male, two female) and four healthy.

use std::io::Write;

use polars::prelude::*;
use tempfile::NamedTempFile;

use crate::loader::encode_sex;
use crate::records::{AGE, CHEST_PAIN_TYPE, CHOLESTEROL, HEART_DISEASE, RESTING_BP, SEX};

pub const SAMPLE_CSV: &str = "\
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

pub fn write_sample_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Same rows as `SAMPLE_CSV`, restricted to the required columns and encoded.
pub fn sample_table() -> DataFrame {
    let mut df = df!(
        AGE => &[40i64, 49, 37, 48, 54, 58, 65, 60, 63, 45],
        SEX => &["M", "F", "M", "F", "M", "M", "M", "M", "M", "F"],
        CHEST_PAIN_TYPE => &["ATA", "NAP", "ATA", "ASY", "NAP", "ASY", "TA", "ASY", "ASY", "ATA"],
        RESTING_BP => &[140i64, 160, 130, 138, 150, 136, 140, 100, 150, 130],
        CHOLESTEROL => &[289i64, 180, 283, 214, 195, 164, 306, 248, 223, 0],
        HEART_DISEASE => &[0i64, 1, 0, 1, 0, 1, 1, 1, 1, 0]
    )
    .unwrap();
    encode_sex(&mut df).unwrap();
    df
}
