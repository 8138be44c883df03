//! Token 使用统计
//!
//! 单次调用返回 TokenCount；整个报告运行期间按模型名累加到 TokenUsage。
//! 累加只发生在各阶段的顺序合并步骤中，因此不需要原子计数或锁。

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// 单个模型的输入 / 输出 token 计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenCount {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: TokenCount) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// 每百万 token 的美元单价
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    #[serde(default)]
    pub input: f64,
    #[serde(default)]
    pub output: f64,
}

/// 按模型名累计的 token 使用（只增不减）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenUsage(BTreeMap<String, TokenCount>);

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为给定模型预置零计数
    pub fn with_models<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            models
                .into_iter()
                .map(|m| (m.into(), TokenCount::default()))
                .collect(),
        )
    }

    pub fn add(&mut self, model: &str, count: TokenCount) {
        self.0.entry(model.to_string()).or_default().add(count);
    }

    /// 合并另一份统计（加法，满足交换律与结合律）
    pub fn merge(&mut self, other: &TokenUsage) {
        for (model, count) in &other.0 {
            self.add(model, *count);
        }
    }

    pub fn get(&self, model: &str) -> TokenCount {
        self.0.get(model).copied().unwrap_or_default()
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenCount)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn total(&self) -> TokenCount {
        self.0.values().fold(TokenCount::default(), |mut acc, c| {
            acc.add(*c);
            acc
        })
    }

    /// 估算费用：返回 (模型 -> 美元, 总额)；未配置单价的模型不计费
    pub fn estimate_cost(&self, prices: &HashMap<String, TokenPrice>) -> (BTreeMap<String, f64>, f64) {
        let mut per_model = BTreeMap::new();
        let mut total = 0.0;
        for (model, count) in &self.0 {
            if let Some(price) = prices.get(model) {
                let cost = (price.input * count.input_tokens as f64
                    + price.output * count.output_tokens as f64)
                    / 1e6;
                total += cost;
                per_model.insert(model.clone(), cost);
            }
        }
        (per_model, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_models_starts_at_zero() {
        let usage = TokenUsage::with_models(["a", "b"]);
        assert_eq!(usage.models().count(), 2);
        assert_eq!(usage.get("a"), TokenCount::default());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let mut x = TokenUsage::new();
        x.add("m", TokenCount::new(3, 4));
        let mut y = TokenUsage::new();
        y.add("m", TokenCount::new(10, 1));
        y.add("n", TokenCount::new(1, 1));

        let mut left = TokenUsage::with_models(["m"]);
        left.merge(&x);
        left.merge(&y);
        let mut right = TokenUsage::with_models(["m"]);
        right.merge(&y);
        right.merge(&x);

        assert_eq!(left, right);
        assert_eq!(left.get("m"), TokenCount::new(13, 5));
        assert_eq!(left.total().total(), 20);
    }

    #[test]
    fn test_estimate_cost() {
        let mut usage = TokenUsage::new();
        usage.add("m", TokenCount::new(1_000_000, 500_000));
        usage.add("free", TokenCount::new(10, 10));
        let mut prices = HashMap::new();
        prices.insert("m".to_string(), TokenPrice { input: 1.0, output: 2.0 });

        let (per_model, total) = usage.estimate_cost(&prices);
        assert!((total - 2.0).abs() < 1e-9);
        assert!(!per_model.contains_key("free"));
    }
}
