use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

/// Typed configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Homework API
    pub practicum_token: String,
    pub endpoint: String,
    pub request_timeout: Option<Duration>,

    // Telegram
    pub telegram_token: String,
    pub telegram_chat_id: ChatId,

    pub retry_period: Duration,
}

impl Config {
    /// Load from the process environment, falling back to `./.env`.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing required keys are reported together.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let required = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];
        let (practicum_token, telegram_token, chat_id) = match required.map(get) {
            [Some(p), Some(t), Some(c)] => (p, t, c),
            values => {
                let missing = required
                    .iter()
                    .zip(values.iter())
                    .filter(|(_, v)| v.is_none())
                    .map(|(k, _)| *k)
                    .collect::<Vec<_>>();
                return Err(Error::Config(format!(
                    "missing required environment variables: {}",
                    missing.join(", ")
                )));
            }
        };

        let telegram_chat_id = chat_id.trim().parse::<i64>().map(ChatId).map_err(|_| {
            Error::Config(format!("TELEGRAM_CHAT_ID must be a numeric chat id, got {chat_id:?}"))
        })?;

        let endpoint = get("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let request_timeout = match get("PRACTICUM_REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(v) => {
                let secs = v.trim().parse::<u64>().map_err(|_| {
                    Error::Config(format!(
                        "PRACTICUM_REQUEST_TIMEOUT_SECS must be a number of seconds, got {v:?}"
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            practicum_token,
            endpoint,
            request_timeout,
            telegram_token,
            telegram_chat_id,
            retry_period: RETRY_PERIOD,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p-token"),
            ("TELEGRAM_TOKEN", "t-token"),
            ("TELEGRAM_CHAT_ID", "-100123"),
        ]))
        .unwrap();

        assert_eq!(cfg.practicum_token, "p-token");
        assert_eq!(cfg.telegram_token, "t-token");
        assert_eq!(cfg.telegram_chat_id, ChatId(-100123));
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.request_timeout, None);
        assert_eq!(cfg.retry_period, Duration::from_secs(600));
    }

    #[test]
    fn reports_every_missing_secret() {
        let err = Config::from_lookup(lookup(&[("TELEGRAM_TOKEN", "  ")])).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::Config(_)));
        assert!(msg.contains("PRACTICUM_TOKEN"));
        assert!(msg.contains("TELEGRAM_TOKEN"));
        assert!(msg.contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn rejects_non_numeric_chat_id() {
        let err = Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "@channel"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn optional_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "1"),
            ("PRACTICUM_ENDPOINT", "http://127.0.0.1:9/hw/"),
            ("PRACTICUM_REQUEST_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.endpoint, "http://127.0.0.1:9/hw/");
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));

        assert!(Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "1"),
            ("PRACTICUM_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
    }

    #[test]
    fn dotenv_parsing() {
        let parsed = parse_dotenv(
            "# secrets\n\
             PRACTICUM_TOKEN = \"abc\"\n\
             export TELEGRAM_TOKEN='x=y'\n\
             \n\
             garbage line\n\
             TELEGRAM_CHAT_ID=42\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("PRACTICUM_TOKEN".to_string(), "abc".to_string()),
                ("TELEGRAM_TOKEN".to_string(), "x=y".to_string()),
                ("TELEGRAM_CHAT_ID".to_string(), "42".to_string()),
            ]
        );
    }
}
