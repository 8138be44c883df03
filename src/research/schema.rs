//! 结构化输出格式与 JSON Schema（schemars 自动生成，拼入提示以减少格式错误）

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Deserializer};

/// 查询生成的输出格式
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryList {
    /// 检索查询列表
    pub queries: Vec<String>,
}

/// 规划阶段的输出格式
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlanOutput {
    /// 报告分节（按报告顺序）
    pub sections: Vec<PlannedSection>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlannedSection {
    /// 分节名称
    pub name: String,
    /// 本节要覆盖的主要内容简述
    pub description: String,
    /// 是否需要 Web 调研
    #[serde(deserialize_with = "research_flag")]
    #[schemars(with = "bool")]
    pub research: bool,
    /// 留空
    #[serde(default)]
    pub content: Option<String>,
}

/// 接受 true/false 以及 "yes"/"no"/"true"/"false"（大小写不敏感）
fn research_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "y" => Ok(true),
            "no" | "false" | "n" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid research flag: {}", other))),
        },
    }
}

pub fn query_list_schema_json() -> String {
    serde_json::to_string_pretty(&schema_for!(QueryList)).unwrap_or_default()
}

pub fn plan_schema_json() -> String {
    serde_json::to_string_pretty(&schema_for!(PlanOutput)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_flag_variants() {
        let raw = r#"{"sections": [
            {"name": "a", "description": "", "research": "Yes"},
            {"name": "b", "description": "", "research": false, "content": ""},
            {"name": "c", "description": "", "research": "no"}
        ]}"#;
        let plan: PlanOutput = serde_json::from_str(raw).unwrap();
        let flags: Vec<bool> = plan.sections.iter().map(|s| s.research).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_research_flag_rejects_garbage() {
        let raw = r#"{"sections": [{"name": "a", "description": "", "research": "maybe"}]}"#;
        assert!(serde_json::from_str::<PlanOutput>(raw).is_err());
    }

    #[test]
    fn test_schemas_name_their_fields() {
        assert!(query_list_schema_json().contains("\"queries\""));
        let plan = plan_schema_json();
        assert!(plan.contains("\"sections\""));
        assert!(plan.contains("\"research\""));
    }
}
