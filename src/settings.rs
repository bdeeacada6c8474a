// settings.rs
//
// The control daemon's settings file: a header line followed by `key = value` lines.

use std::{collections::HashMap, fs, path::Path};

use serde::Serialize;

use crate::{DashError, DashResult, celsius_to_fahrenheit};

const SEPARATOR: &str = " = ";

pub const KEY_SETTEMP: &str = "settemp";
pub const KEY_SETHUM: &str = "sethum";
pub const KEY_TEMPOR: &str = "tempor";
pub const KEY_HUMOR: &str = "humor";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DashError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let values = content
            .lines()
            // header line is never a setting
            .skip(1)
            .filter_map(|line| line.split_once(SEPARATOR))
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Lookup where a never-set key reads as the empty string.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.trim().parse().ok()
    }

    fn flag(&self, key: &str) -> bool {
        self.number(key) == Some(1.0)
    }

    pub fn setpoints(&self) -> Setpoints {
        Setpoints::from_settings(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Setpoints {
    /// Celsius
    pub settemp: Option<f64>,
    pub sethum: Option<f64>,
    pub temp_pid_disabled: bool,
    pub hum_pid_disabled: bool,
}

impl Setpoints {
    pub fn from_settings(s: &Settings) -> Self {
        Setpoints {
            settemp: s.number(KEY_SETTEMP),
            sethum: s.number(KEY_SETHUM),
            temp_pid_disabled: s.flag(KEY_TEMPOR),
            hum_pid_disabled: s.flag(KEY_HUMOR),
        }
    }

    pub fn settemp_f(&self) -> Option<f64> {
        self.settemp.map(celsius_to_fahrenheit)
    }
}


// EOF
