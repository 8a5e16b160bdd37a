// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, path::PathBuf, sync::LazyLock};
use url::Url;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "jmapgate",
    about = "A REST gateway that exposes mailbox operations of a JMAP server,
    so web clients can list, read, flag, move, delete, send and parse emails without speaking JMAP.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// jmapgate log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for jmapgate"
    )]
    pub jmapgate_log_level: String,

    /// jmapgate HTTP port (default: 15830)
    #[clap(
        long,
        default_value = "15830",
        env,
        help = "Set the HTTP port for jmapgate"
    )]
    pub jmapgate_http_port: u16,

    /// The IP address that the REST server binds to, in IPv4 format (e.g., 192.168.1.1).
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the REST server binds to, in IPv4 format (e.g., 192.168.1.1).",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub jmapgate_bind_ip: Option<String>,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub jmapgate_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub jmapgate_cors_max_age: i32,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub jmapgate_ansi_logs: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable JSON formatted logs"
    )]
    pub jmapgate_json_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub jmapgate_log_to_file: bool,

    #[clap(
        long,
        default_value = "./logs",
        env,
        help = "Directory for rolling log files, used when log file output is enabled"
    )]
    pub jmapgate_log_dir: PathBuf,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of server log files"
    )]
    pub jmapgate_max_server_log_files: usize,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable compression for the open api server"
    )]
    pub jmapgate_http_compression_enabled: bool,

    /// JMAP API endpoint that receives batched method calls (the session's `apiUrl`).
    #[clap(
        long,
        env,
        default_value = "http://localhost:8080/jmap/",
        help = "URL of the JMAP API endpoint that receives batched method calls",
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            let url = Url::parse(s).map_err(|_| format!("Invalid URL for jmap_api_url: {}", s))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!("jmap_api_url must use http or https, got '{}'", url.scheme()));
            }
            Ok(s.to_string())
        })
    )]
    pub jmapgate_jmap_api_url: String,

    #[clap(
        long,
        env,
        default_value = "10",
        help = "Connect timeout in seconds for the JMAP server",
        value_parser = clap::value_parser!(u64).range(1..=120)
    )]
    pub jmapgate_jmap_connect_timeout_secs: u64,

    #[clap(
        long,
        env,
        default_value = "30",
        help = "Request timeout in seconds for one JMAP batch round trip",
        value_parser = clap::value_parser!(u64).range(1..=600)
    )]
    pub jmapgate_jmap_request_timeout_secs: u64,

    /// Service account used when a request carries no Authorization header.
    #[clap(long, env, help = "Username of the fallback JMAP service account")]
    pub jmapgate_jmap_username: Option<String>,

    #[clap(long, env, help = "Password of the fallback JMAP service account")]
    pub jmapgate_jmap_password: Option<String>,

    #[clap(
        long,
        env,
        help = "JMAP account id used when a request carries no X-JMAP-Account-Id header"
    )]
    pub jmapgate_jmap_account_id: Option<String>,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            jmapgate_log_level: "info".to_string(),
            jmapgate_http_port: 15830,
            jmapgate_bind_ip: Default::default(),
            jmapgate_cors_origins: Default::default(),
            jmapgate_cors_max_age: 86400,
            jmapgate_ansi_logs: false,
            jmapgate_json_logs: false,
            jmapgate_log_to_file: false,
            jmapgate_log_dir: PathBuf::from("./logs"),
            jmapgate_max_server_log_files: 5,
            jmapgate_http_compression_enabled: true,
            jmapgate_jmap_api_url: "http://localhost:8080/jmap/".to_string(),
            jmapgate_jmap_connect_timeout_secs: 10,
            jmapgate_jmap_request_timeout_secs: 30,
            jmapgate_jmap_username: Some("alice".into()),
            jmapgate_jmap_password: Some("secret".into()),
            jmapgate_jmap_account_id: Some("acc-default".into()),
        }
    }
}
