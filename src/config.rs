use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Hostname or IP of the machine running Glances. Required; validated at
    /// setup rather than parse time so the missing-key diagnostic is ours.
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    /// Which of the known metric identifiers to instantiate, in order.
    pub resources: Option<Vec<String>>,
    #[serde(default = "default_collect_interval")]
    pub collect_interval: u64,
}

fn default_port() -> String {
    "61208".to_string()
}

fn default_collect_interval() -> u64 {
    60
}
