//! 来源文档与按插入顺序去重的来源表
//!
//! SourceMap 以 URL 为键；重复插入同一键时原位覆盖值、保留首次插入的位置，
//! 因此引用编号只取决于插入顺序。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 单个来源文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    /// 摘要内容（检索返回的片段，或按主题总结后的文本）
    pub content: String,
    /// 原始页面正文（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            raw_content: None,
        }
    }
}

/// 有序来源表：URL -> Source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Source>", into = "Vec<Source>")]
pub struct SourceMap {
    entries: Vec<Source>,
    index: HashMap<String, usize>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入来源；键已存在时原位覆盖（后写者胜）
    pub fn insert(&mut self, source: Source) {
        match self.index.get(&source.url) {
            Some(&pos) => self.entries[pos] = source,
            None => {
                self.index.insert(source.url.clone(), self.entries.len());
                self.entries.push(source);
            }
        }
    }

    /// 依次插入另一张表的全部来源
    pub fn extend(&mut self, other: &SourceMap) {
        for source in other.iter() {
            self.insert(source.clone());
        }
    }

    pub fn get(&self, url: &str) -> Option<&Source> {
        self.index.get(url).map(|&pos| &self.entries[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Source> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl From<Vec<Source>> for SourceMap {
    fn from(sources: Vec<Source>) -> Self {
        sources.into_iter().collect()
    }
}

impl From<SourceMap> for Vec<Source> {
    fn from(map: SourceMap) -> Self {
        map.entries
    }
}

impl FromIterator<Source> for SourceMap {
    fn from_iter<T: IntoIterator<Item = Source>>(iter: T) -> Self {
        let mut map = SourceMap::new();
        for source in iter {
            map.insert(source);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position_and_last_value() {
        let mut map = SourceMap::new();
        map.insert(Source::new("A", "https://a", "old"));
        map.insert(Source::new("B", "https://b", "b"));
        map.insert(Source::new("A2", "https://a", "new"));

        let urls: Vec<_> = map.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b"]);
        assert_eq!(map.get("https://a").unwrap().title, "A2");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_serde_preserves_order() {
        let map: SourceMap = vec![
            Source::new("Z", "https://z", ""),
            Source::new("A", "https://a", ""),
        ]
        .into();
        let json = serde_json::to_string(&map).unwrap();
        let back: SourceMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.iter().next().unwrap().title, "Z");
    }
}
