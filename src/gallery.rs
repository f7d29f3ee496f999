use crate::enums::{ImageExt, Language, TagType};
use crate::tag::{Tag, TagList};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

const LANGUAGE_JAPANESE: i32 = 6346;
const LANGUAGE_ENGLISH: i32 = 12227;
const LANGUAGE_CHINESE: i32 = 29963;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKind {
    /// 只有列表页中的摘要信息
    Simple,
    /// 通过接口获取的完整画廊
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// 各种画廊共有的接口
pub trait GenericGallery {
    fn id(&self) -> i32;

    fn kind(&self) -> GalleryKind;

    fn page_count(&self) -> i32;

    fn title(&self) -> &str;

    fn is_valid(&self) -> bool {
        self.id() > 0
    }

    fn max_size(&self) -> Option<Size> {
        None
    }

    fn min_size(&self) -> Option<Size> {
        None
    }
}

/// 根据语言标签判断画廊语言
pub fn load_language(tags: &TagList) -> Language {
    for tag in tags.retrieve_for_type(TagType::Language) {
        match tag.id {
            LANGUAGE_JAPANESE => return Language::Japanese,
            LANGUAGE_ENGLISH => return Language::English,
            LANGUAGE_CHINESE => return Language::Chinese,
            _ => (),
        }
    }
    Language::Unknown
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub ext: ImageExt,
    pub size: Size,
}

/// 完整的画廊信息
#[derive(Debug, Clone)]
pub struct Gallery {
    pub id: i32,
    pub media_id: i32,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub title_pretty: Option<String>,
    pub thumbnail: ImageExt,
    pub pages: Vec<Page>,
    pub tags: TagList,
    pub upload_date: DateTime<Utc>,
    pub favorite_count: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrInt {
    Int(i32),
    Str(String),
}

#[derive(Deserialize)]
struct ApiGallery {
    id: i32,
    media_id: StrOrInt,
    title: ApiTitle,
    images: ApiImages,
    #[serde(default)]
    tags: Vec<Tag>,
    upload_date: i64,
    #[serde(default)]
    num_favorites: i32,
}

#[derive(Deserialize)]
struct ApiTitle {
    english: Option<String>,
    japanese: Option<String>,
    pretty: Option<String>,
}

#[derive(Deserialize)]
struct ApiImages {
    pages: Vec<ApiImage>,
    thumbnail: ApiImage,
}

#[derive(Deserialize)]
struct ApiImage {
    t: String,
    #[serde(default)]
    w: i32,
    #[serde(default)]
    h: i32,
}

impl ApiImage {
    fn ext(&self) -> ImageExt {
        self.t
            .chars()
            .next()
            .map(ImageExt::from_char)
            .unwrap_or(ImageExt::Unknown)
    }
}

impl Gallery {
    /// 解析画廊接口返回的 JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let api: ApiGallery = serde_json::from_str(json).context("画廊 JSON 格式错误")?;
        let timestamp = api.upload_date;
        let media_id = match api.media_id {
            StrOrInt::Int(v) => v,
            StrOrInt::Str(s) => s
                .parse()
                .with_context(|| format!("无法解析 media id: {}", s))?,
        };
        let upload_date = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .with_context(|| format!("上传时间错误: {}", timestamp))?;
        let pages = api
            .images
            .pages
            .iter()
            .map(|p| Page {
                ext: p.ext(),
                size: Size {
                    width: p.w,
                    height: p.h,
                },
            })
            .collect();
        Ok(Self {
            id: api.id,
            media_id,
            title_english: api.title.english,
            title_japanese: api.title.japanese,
            title_pretty: api.title.pretty,
            thumbnail: api.images.thumbnail.ext(),
            pages,
            tags: api.tags.into_iter().collect(),
            upload_date,
            favorite_count: api.num_favorites,
        })
    }

    pub fn media_id(&self) -> i32 {
        self.media_id
    }

    pub fn thumb(&self) -> ImageExt {
        self.thumbnail
    }

    pub fn language(&self) -> Language {
        load_language(&self.tags)
    }

    pub fn tags(&self) -> &TagList {
        &self.tags
    }
}

impl GenericGallery for Gallery {
    fn id(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> GalleryKind {
        GalleryKind::Complete
    }

    fn page_count(&self) -> i32 {
        self.pages.len() as i32
    }

    /// 依次尝试英文、pretty、日文标题
    fn title(&self) -> &str {
        let titles = [&self.title_english, &self.title_pretty, &self.title_japanese];
        titles
            .iter()
            .copied()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.is_empty())
            .unwrap_or("")
    }

    fn max_size(&self) -> Option<Size> {
        let width = self.pages.iter().map(|p| p.size.width).max()?;
        let height = self.pages.iter().map(|p| p.size.height).max()?;
        Some(Size { width, height })
    }

    fn min_size(&self) -> Option<Size> {
        let width = self.pages.iter().map(|p| p.size.width).min()?;
        let height = self.pages.iter().map(|p| p.size.height).min()?;
        Some(Size { width, height })
    }
}
