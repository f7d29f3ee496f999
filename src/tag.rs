use crate::enums::{TagStatus, TagType};
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;

/// 画廊标签
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    #[serde(default)]
    pub count: i32,
    #[serde(skip)]
    pub status: TagStatus,
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Tag {
    pub fn new(id: i32, name: &str, tag_type: TagType) -> Self {
        Self {
            id,
            name: name.to_owned(),
            tag_type,
            count: 0,
            status: TagStatus::Default,
        }
    }

    /// 转换为搜索语句，屏蔽状态会加上 `-` 前缀
    ///
    /// 例如 `-tag:"full color"`
    pub fn to_query_tag(&self, status: TagStatus) -> String {
        let prefix = if status == TagStatus::Avoided { "-" } else { "" };
        format!("{}{}:\"{}\"", prefix, self.tag_type.name(), self.name)
    }
}

/// 保持顺序的标签集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tag: Tag) {
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// 是否包含全部给定的标签
    pub fn has_tags<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        tags.into_iter().all(|tag| self.has_tag(tag))
    }

    pub fn all_tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn retrieve_for_type(&self, tag_type: TagType) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |tag| tag.tag_type == tag_type)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl std::iter::FromIterator<Tag> for TagList {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        let mut list = TagList::new();
        for tag in iter {
            list.add(tag);
        }
        list
    }
}

/// 根据 id 查询标签，找不到的 id 会被跳过
pub trait TagResolver {
    fn tags_from_ids(&self, ids: &[i32]) -> Result<TagList>;
}

impl TagResolver for HashMap<i32, Tag> {
    fn tags_from_ids(&self, ids: &[i32]) -> Result<TagList> {
        Ok(ids.iter().filter_map(|id| self.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagList {
        vec![
            Tag::new(6346, "japanese", TagType::Language),
            Tag::new(8378, "full color", TagType::Tag),
            Tag::new(3981, "shindol", TagType::Artist),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn query_tag() {
        let tag = Tag::new(8378, "full color", TagType::Tag);
        assert_eq!(tag.to_query_tag(TagStatus::Avoided), r#"-tag:"full color""#);
        assert_eq!(tag.to_query_tag(TagStatus::Accepted), r#"tag:"full color""#);
    }

    #[test]
    fn membership() {
        let tags = sample();
        assert_eq!(tags.len(), 3);
        assert!(tags.has_tag(&Tag::new(3981, "whatever", TagType::Unknown)));
        assert!(!tags.has_tag(&Tag::new(1, "x", TagType::Tag)));

        let wanted = vec![
            Tag::new(6346, "japanese", TagType::Language),
            Tag::new(3981, "shindol", TagType::Artist),
        ];
        assert!(tags.has_tags(&wanted));
        let wanted = vec![
            Tag::new(6346, "japanese", TagType::Language),
            Tag::new(1, "x", TagType::Tag),
        ];
        assert!(!tags.has_tags(&wanted));
        assert!(tags.has_tags(std::iter::empty()));
    }

    #[test]
    fn by_type() {
        let tags = sample();
        let names = tags
            .retrieve_for_type(TagType::Artist)
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["shindol"]);
    }

    #[test]
    fn resolve_from_map() {
        let map = sample()
            .all_tags()
            .iter()
            .map(|t| (t.id, t.clone()))
            .collect::<HashMap<_, _>>();
        let tags = map.tags_from_ids(&[3981, 999, 6346]).unwrap();
        let ids = tags.all_tags().iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![3981, 6346]);
    }
}
