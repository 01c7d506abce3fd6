use serde::{Deserialize, Serialize};

/// Category of telemetry a pipeline stage handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Traces,
    Metrics,
    Logs,
}

impl DataType {
    /// Every signal kind, in pipeline declaration order.
    pub const ALL: [DataType; 3] = [DataType::Traces, DataType::Metrics, DataType::Logs];

    /// Get the string representation used in pipeline ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Traces => "traces",
            DataType::Metrics => "metrics",
            DataType::Logs => "logs",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Traces.as_str(), "traces");
        assert_eq!(DataType::Metrics.to_string(), "metrics");
        assert_eq!(DataType::Logs.to_string(), "logs");
    }

    #[test]
    fn test_data_type_serde() {
        let json = serde_json::to_string(&DataType::Traces).unwrap();
        assert_eq!(json, "\"traces\"");

        let parsed: DataType = serde_json::from_str("\"metrics\"").unwrap();
        assert_eq!(parsed, DataType::Metrics);
    }
}
