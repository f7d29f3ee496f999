use anyhow::{format_err, Result};
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;

macro_rules! ordinal_enum {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        impl $name {
            const VALUES: &'static [$name] = &[$($name::$variant),*];

            /// 在传输格式与数据库中使用的序号
            pub fn ordinal(self) -> u8 {
                self as u8
            }

            pub fn from_ordinal(ordinal: i32) -> Result<Self> {
                usize::try_from(ordinal)
                    .ok()
                    .and_then(|idx| Self::VALUES.get(idx).copied())
                    .ok_or_else(|| format_err!("{} 序号越界: {}", stringify!($name), ordinal))
            }
        }
    };
}

/// 缩略图格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExt {
    Jpg,
    Png,
    Gif,
    Unknown,
}

ordinal_enum!(ImageExt { Jpg, Png, Gif, Unknown });

impl ImageExt {
    /// 文件扩展名，未知格式没有扩展名
    pub fn name(self) -> Option<&'static str> {
        match self {
            ImageExt::Jpg => Some("jpg"),
            ImageExt::Png => Some("png"),
            ImageExt::Gif => Some("gif"),
            ImageExt::Unknown => None,
        }
    }

    /// 根据扩展名的首字母判断格式
    pub fn from_char(c: char) -> Self {
        match c {
            'j' => ImageExt::Jpg,
            'p' => ImageExt::Png,
            'g' => ImageExt::Gif,
            _ => ImageExt::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Chinese,
    Japanese,
    Unknown,
    All,
}

ordinal_enum!(Language {
    English,
    Chinese,
    Japanese,
    Unknown,
    All,
});

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Language::English => "english",
            Language::Chinese => "chinese",
            Language::Japanese => "japanese",
            Language::Unknown => "unknown",
            Language::All => "all",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Parody = 1,
    Character = 2,
    Tag = 3,
    Artist = 4,
    Group = 5,
    Language = 6,
    Category = 7,
    #[serde(other)]
    Unknown = 0,
}

ordinal_enum!(TagType {
    Unknown,
    Parody,
    Character,
    Tag,
    Artist,
    Group,
    Language,
    Category,
});

impl TagType {
    /// 搜索语句中使用的名字
    pub fn name(self) -> &'static str {
        match self {
            TagType::Unknown => "unknown",
            TagType::Parody => "parody",
            TagType::Character => "character",
            TagType::Tag => "tag",
            TagType::Artist => "artist",
            TagType::Group => "group",
            TagType::Language => "language",
            TagType::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagStatus {
    Default,
    Avoided,
    Accepted,
}

ordinal_enum!(TagStatus {
    Default,
    Avoided,
    Accepted,
});

impl Default for TagStatus {
    fn default() -> Self {
        TagStatus::Default
    }
}
