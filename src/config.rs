// config.rs

use std::{fs, net, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::*;

const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_INSTALL_PATH: &str = "/var/www/mycodo";
const DEFAULT_REFRESH_SECS: u32 = 90;
const DEFAULT_RENDER_TIMEOUT: u64 = 60;

const SENSOR_LOG: &str = "log/sensor.log";
const SETTINGS_FILE: &str = "config/mycodo.cfg";
const GRAPH_EXEC: &str = "cgi-bin/graph.sh";
const IMAGE_DIR: &str = "images";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MyConfig {
    pub port: u16,
    pub bind: net::IpAddr,

    pub install_path: PathBuf,
    pub sensor_log: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub graph_exec: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,

    pub refresh_secs: u32,
    pub render_timeout_secs: u64,
    pub render_wait: bool,

    pub auth_header: String,
    pub guest_user: String,
    pub trust_all: bool,
}

impl Default for MyConfig {
    fn default() -> Self {
        Self {
            port: option_env!("API_PORT")
                .unwrap_or("-")
                .parse()
                .unwrap_or(DEFAULT_API_PORT),
            bind: net::IpAddr::V4(net::Ipv4Addr::new(0, 0, 0, 0)),

            install_path: option_env!("INSTALL_PATH")
                .unwrap_or(DEFAULT_INSTALL_PATH)
                .into(),
            sensor_log: None,
            settings_file: None,
            graph_exec: None,
            image_dir: None,

            refresh_secs: DEFAULT_REFRESH_SECS,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT,
            render_wait: false,

            auth_header: "x-remote-user".into(),
            guest_user: "guest".into(),
            trust_all: false,
        }
    }
}

impl MyConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        info!("Reading config from {path:?}...");
        let s = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                error!("Config read error {e:?}");
                return None;
            }
        };

        match serde_json::from_str::<MyConfig>(&s) {
            Ok(c) => {
                info!("Successfully parsed config from {path:?}.");
                Some(c)
            }
            Err(e) => {
                error!("Cannot parse config from {path:?}: {e:?}");
                None
            }
        }
    }

    pub fn sensor_log(&self) -> PathBuf {
        self.sensor_log
            .clone()
            .unwrap_or_else(|| self.install_path.join(SENSOR_LOG))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_file
            .clone()
            .unwrap_or_else(|| self.install_path.join(SETTINGS_FILE))
    }

    pub fn graph_exec(&self) -> PathBuf {
        self.graph_exec
            .clone()
            .unwrap_or_else(|| self.install_path.join(GRAPH_EXEC))
    }

    pub fn image_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .unwrap_or_else(|| self.install_path.join(IMAGE_DIR))
    }

    pub fn listen_addr(&self) -> net::SocketAddr {
        net::SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_install_path() {
        let c = MyConfig {
            install_path: "/srv/mycodo".into(),
            ..Default::default()
        };
        assert_eq!(c.sensor_log(), PathBuf::from("/srv/mycodo/log/sensor.log"));
        assert_eq!(c.settings_file(), PathBuf::from("/srv/mycodo/config/mycodo.cfg"));
        assert_eq!(c.graph_exec(), PathBuf::from("/srv/mycodo/cgi-bin/graph.sh"));
        assert_eq!(c.image_dir(), PathBuf::from("/srv/mycodo/images"));
    }

    #[test]
    fn explicit_paths_win() {
        let c = MyConfig {
            sensor_log: Some("/tmp/s.log".into()),
            ..Default::default()
        };
        assert_eq!(c.sensor_log(), PathBuf::from("/tmp/s.log"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envdash.json");
        fs::write(&path, r#"{"port": 8123, "render_wait": true}"#).unwrap();

        let c = MyConfig::from_file(&path).unwrap();
        assert_eq!(c.port, 8123);
        assert!(c.render_wait);
        assert_eq!(c.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(c.guest_user, "guest");
    }

    #[test]
    fn broken_json_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envdash.json");
        fs::write(&path, "{ port: ").unwrap();
        assert!(MyConfig::from_file(&path).is_none());
        assert!(MyConfig::from_file(dir.path().join("missing.json")).is_none());
    }
}

// EOF
