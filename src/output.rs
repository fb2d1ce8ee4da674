use serde::Serialize;

/// How the CLI renders results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Envelope for a command that completed
pub fn success_json<T: Serialize>(command: &str, data: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        ok: true,
        command,
        data: Some(data),
        error: None,
    })
}

/// Envelope for a command that failed
pub fn failure_json(command: &str, error: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope::<()> {
        ok: false,
        command,
        data: None,
        error: Some(error.to_string()),
    })
}

pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", success_json(command, data)?);
    }
    Ok(())
}

pub fn emit_failure(mode: OutputMode, command: &str, error: &str) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => println!("{}", failure_json(command, error)?),
        OutputMode::Human => crate::ui::error(error),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = success_json("delete", serde_json::json!({ "deleted": 1 })).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["command"], "delete");
        assert_eq!(value["data"]["deleted"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope() {
        let json = failure_json("add", "insert failed").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "insert failed");
        assert!(value.get("data").is_none());
    }
}
