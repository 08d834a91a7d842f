use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgTreeError {
    #[error("connection to {backend} store failed: {reason}")]
    Connection { backend: String, reason: String },

    #[error("query failed: {0}")]
    Query(String),

    #[error("invalid order sequence '{0}'")]
    InvalidOrderSequence(String),

    #[error("row {id} does not match its order sequence '{sequence}' at level {level}")]
    RowMismatch {
        id: i64,
        level: u32,
        sequence: String,
    },

    #[error("boss cycle detected: {}", format_cycle(.0))]
    Cycle(Vec<i64>),

    #[error("hierarchy deeper than {max_depth} levels at employee {id}")]
    DepthExceeded { id: i64, max_depth: u32 },

    #[error("employee {id} ('{sequence}') has no rendered ancestor")]
    OrphanRow { id: i64, sequence: String },

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_cycle(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, OrgTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = OrgTreeError::Cycle(vec![3, 10, 3]);
        assert_eq!(err.to_string(), "boss cycle detected: 3 -> 10 -> 3");
    }

    #[test]
    fn connection_message_names_backend() {
        let err = OrgTreeError::Connection {
            backend: "postgres".into(),
            reason: "refused".into(),
        };
        assert!(err.to_string().contains("postgres"));
        assert!(err.to_string().contains("refused"));
    }
}
