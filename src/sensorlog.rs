// sensorlog.rs

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{DashError, DashResult, celsius_to_fahrenheit};

const TAIL_CHUNK: u64 = 4096;
const MIN_FIELDS: usize = 9;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorReading {
    pub timestamp: NaiveDateTime,
    pub temp_c: f64,
    pub humidity: f64,
    pub dewpoint_c: f64,
}

impl SensorReading {
    pub fn temp_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temp_c)
    }

    pub fn dewpoint_f(&self) -> f64 {
        celsius_to_fahrenheit(self.dewpoint_c)
    }
}

/// Append-only log written by the sensor daemon, one record per line:
/// `Y M D h m s temp_c humidity dewpoint_c<unit>` separated by single spaces.
#[derive(Clone, Debug)]
pub struct SensorLog {
    path: PathBuf,
}

impl SensorLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SensorLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn latest(&self) -> DashResult<SensorReading> {
        parse_record(&self.last_line()?)
    }

    pub fn last_timestamp(&self) -> DashResult<NaiveDateTime> {
        let line = self.last_line()?;
        let fields = split_fields(&line)?;
        parse_timestamp(&fields)
    }

    fn last_line(&self) -> DashResult<String> {
        let unreadable = |source| DashError::LogUnreadable {
            path: self.path.clone(),
            source,
        };
        let line = read_last_line(&self.path).map_err(unreadable)?;
        line.ok_or_else(|| DashError::MalformedLogRecord("sensor log is empty".into()))
    }
}

/// Last non-empty line of a file, read backwards from the end in fixed chunks.
pub fn read_last_line<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    let mut f = File::open(path)?;
    let mut pos = f.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();

    while pos > 0 {
        let n = TAIL_CHUNK.min(pos);
        pos -= n;
        f.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; n as usize];
        f.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;

        let end = content_end(&buf);
        if let Some(i) = buf[..end].iter().rposition(|&b| b == b'\n') {
            return Ok(Some(String::from_utf8_lossy(&buf[i + 1..end]).into_owned()));
        }
    }

    let end = content_end(&buf);
    if end == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf[..end]).into_owned()))
}

fn content_end(buf: &[u8]) -> usize {
    buf.iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1)
}

fn split_fields(line: &str) -> DashResult<Vec<&str>> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < MIN_FIELDS {
        return Err(DashError::MalformedLogRecord(format!(
            "expected {MIN_FIELDS} fields, got {n}: {line:?}",
            n = fields.len()
        )));
    }
    Ok(fields)
}

fn parse_timestamp(fields: &[&str]) -> DashResult<NaiveDateTime> {
    let num = |i: usize| -> DashResult<u32> {
        fields[i].parse().map_err(|_| {
            DashError::MalformedLogRecord(format!("bad timestamp field {i}: {:?}", fields[i]))
        })
    };
    let year: i32 = fields[0].parse().map_err(|_| {
        DashError::MalformedLogRecord(format!("bad timestamp year: {:?}", fields[0]))
    })?;

    NaiveDate::from_ymd_opt(year, num(1)?, num(2)?)
        .and_then(|d| d.and_hms_opt(num(3).ok()?, num(4).ok()?, num(5).ok()?))
        .ok_or_else(|| {
            DashError::MalformedLogRecord(format!("invalid timestamp: {:?}", &fields[..6]))
        })
}

fn parse_value(name: &str, s: &str) -> DashResult<f64> {
    s.parse()
        .map_err(|_| DashError::MalformedLogRecord(format!("non-numeric {name}: {s:?}")))
}

pub fn parse_record(line: &str) -> DashResult<SensorReading> {
    let fields = split_fields(line)?;

    // dew point carries the logger's unit suffix
    let mut dp = fields[8].chars();
    dp.next_back();

    Ok(SensorReading {
        timestamp: parse_timestamp(&fields)?,
        temp_c: parse_value("temperature", fields[6])?,
        humidity: parse_value("humidity", fields[7])?,
        dewpoint_c: parse_value("dew point", dp.as_str())?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const GOOD: &str = "2015 03 12 14 22 01 21.500 45 10.300C";

    #[test]
    fn parses_good_record() {
        let r = parse_record(GOOD).unwrap();
        assert_eq!(r.temp_c, 21.5);
        assert_eq!(r.temp_f(), 70.7);
        assert_eq!(r.humidity, 45.0);
        assert_eq!(r.dewpoint_c, 10.3);
        assert_eq!(r.dewpoint_f(), 50.5);
        assert_eq!(
            r.timestamp.format(crate::TS_FORMAT).to_string(),
            "2015-03-12 14:22:01"
        );
    }

    #[test]
    fn extra_fields_are_fine() {
        let r = parse_record("2015 03 12 14 22 01 -3.25 80.1 -6.0C 1 0 1").unwrap();
        assert_eq!(r.temp_c, -3.25);
        assert_eq!(r.dewpoint_c, -6.0);
    }

    #[test]
    fn too_few_fields() {
        let e = parse_record("2015 03 12 14 22").unwrap_err();
        assert!(matches!(e, DashError::MalformedLogRecord(_)));
    }

    #[test]
    fn non_numeric_values() {
        for line in [
            "2015 03 12 14 22 01 warm 45 10.3C",
            "2015 03 12 14 22 01 21.5 damp 10.3C",
            "2015 03 12 14 22 01 21.5 45 C",
            "2015 03 12 14 22 01 21.5 45 10.3CC",
        ] {
            assert!(
                matches!(parse_record(line), Err(DashError::MalformedLogRecord(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn bad_timestamp() {
        let e = parse_record("2015 13 12 14 22 01 21.5 45 10.3C").unwrap_err();
        assert!(matches!(e, DashError::MalformedLogRecord(_)));
    }

    #[test]
    fn double_space_shifts_fields() {
        assert!(parse_record("2015 03 12 14 22 01  21.5 45 10.3C").is_err());
    }

    #[test]
    fn tail_reads_only_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.log");

        // long enough to span several tail chunks
        let mut body = String::new();
        for i in 0..2000 {
            body.push_str(&format!("2015 03 11 10 00 00 {i}.000 50 5.000C\n"));
        }
        body.push_str(GOOD);
        body.push('\n');
        fs::write(&path, &body).unwrap();

        assert_eq!(read_last_line(&path).unwrap().as_deref(), Some(GOOD));

        let log = SensorLog::new(&path);
        assert_eq!(log.latest().unwrap().temp_c, 21.5);
        assert_eq!(
            log.last_timestamp().unwrap(),
            NaiveDate::from_ymd_opt(2015, 3, 12)
                .unwrap()
                .and_hms_opt(14, 22, 1)
                .unwrap()
        );
    }

    #[test]
    fn tail_edge_cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.log");

        fs::write(&path, "").unwrap();
        assert_eq!(read_last_line(&path).unwrap(), None);

        fs::write(&path, "\n\n").unwrap();
        assert_eq!(read_last_line(&path).unwrap(), None);

        fs::write(&path, "only line").unwrap();
        assert_eq!(read_last_line(&path).unwrap().as_deref(), Some("only line"));

        fs::write(&path, "first\r\nsecond\r\n\r\n").unwrap();
        assert_eq!(read_last_line(&path).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn torn_last_line_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.log");
        fs::write(&path, format!("{GOOD}\n2015 03 12 14 23")).unwrap();
        let e = SensorLog::new(&path).latest().unwrap_err();
        assert!(matches!(e, DashError::MalformedLogRecord(_)));
    }

    #[test]
    fn empty_and_missing_logs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.log");
        let log = SensorLog::new(&path);
        assert!(matches!(log.latest(), Err(DashError::LogUnreadable { .. })));

        fs::write(&path, "").unwrap();
        assert!(matches!(log.latest(), Err(DashError::MalformedLogRecord(_))));
    }
}

// EOF
