use crate::config::Config;
use crate::database::HistoryRow;
use crate::enums::{ImageExt, Language, TagStatus};
use crate::gallery::{load_language, Gallery, GalleryKind, GenericGallery};
use crate::global;
use crate::parcel::{Parcel, Parcelable};
use crate::tag::{Tag, TagList, TagResolver};
use crate::utils::{get_ext_from_src, get_id_from_href, get_media_id_from_src};
use crate::xpath::{parse_html, Node};
use anyhow::{Context, Result};
use std::fmt;
use url::Url;

/// 列表页中的画廊摘要
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleGallery {
    id: i32,
    media_id: i32,
    title: String,
    thumbnail: ImageExt,
    language: Language,
    /// 只有从网页解析时才有标签
    tags: Option<TagList>,
}

impl SimpleGallery {
    /// 从历史记录中恢复，语言固定为未知
    pub fn from_history(row: &HistoryRow) -> Result<Self> {
        Ok(Self {
            title: row.title.clone(),
            id: row.id,
            media_id: row.media_id,
            thumbnail: ImageExt::from_ordinal(row.thumb_type)?,
            language: Language::Unknown,
            tags: None,
        })
    }

    /// 从列表页的 `<div class="gallery">` 元素中解析
    ///
    /// 传入 `context` 时会顺便更新全局的最大画廊 id
    pub fn from_html<R>(context: Option<&Config>, element: &Node, resolver: &R) -> Result<Self>
    where
        R: TagResolver + ?Sized,
    {
        let data_tags = element.attr("data-tags").unwrap_or_default().replace(' ', ",");
        let tag_ids = data_tags
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i32>()
                    .with_context(|| format!("无法解析标签 id: {}", s))
            })
            .collect::<Result<Vec<_>>>()?;
        let tags = resolver.tags_from_ids(&tag_ids)?;
        let language = load_language(&tags);

        let href = element
            .xpath_text("(descendant-or-self::a)[1]/@href")
            .context("找不到画廊链接")?
            .swap_remove(0);
        let id = get_id_from_href(&href)?;

        let img = element.first_by_tag("img")?;
        let src = if img.has_attr("data-src") {
            img.attr("data-src")
        } else {
            img.attr("src")
        }
        .context("缩略图缺少 src")?;
        let media_id = get_media_id_from_src(&src)?;
        let thumbnail = get_ext_from_src(&src);

        let title = element.first_by_tag("div")?.text();
        debug!("画廊 {}: {}", id, title);

        if let Some(config) = context {
            if id > global::max_id() {
                if let Err(e) = global::update_max_id(config, id) {
                    warn!("保存最大 id 失败: {}", e);
                }
            }
        }

        Ok(Self {
            id,
            media_id,
            title,
            thumbnail,
            language,
            tags: Some(tags),
        })
    }

    pub fn from_gallery(gallery: &Gallery) -> Self {
        Self {
            title: gallery.title().to_owned(),
            media_id: gallery.media_id(),
            id: gallery.id(),
            thumbnail: gallery.thumb(),
            language: gallery.language(),
            tags: None,
        }
    }

    pub fn media_id(&self) -> i32 {
        self.media_id
    }

    pub fn thumb(&self) -> ImageExt {
        self.thumbnail
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn tags(&self) -> Option<&TagList> {
        self.tags.as_ref()
    }

    /// 缩略图地址，GIF 使用第一帧
    pub fn thumbnail_url(&self, host: &str) -> Option<Url> {
        let url = match self.thumbnail {
            ImageExt::Gif => format!("https://i1.{}/galleries/{}/1.gif", host, self.media_id),
            ext => format!(
                "https://t1.{}/galleries/{}/thumb.{}",
                host,
                self.media_id,
                ext.name()?
            ),
        };
        match Url::parse(&url) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("缩略图地址错误 {}: {}", url, e);
                None
            }
        }
    }

    /// 没有标签时返回 false
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.as_ref().map_or(false, |tags| tags.has_tag(tag))
    }

    pub fn has_tags<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        self.tags.as_ref().map_or(false, |own| own.has_tags(tags))
    }

    /// 搜索语句中是否屏蔽了本画廊的某个标签
    pub fn has_ignored_tags(&self, s: &str) -> bool {
        let tags = match &self.tags {
            Some(tags) if !s.is_empty() => tags,
            _ => return false,
        };
        for tag in tags.all_tags() {
            let query = tag.to_query_tag(TagStatus::Avoided);
            if s.contains(&query) {
                debug!("搜索语句 {} 屏蔽了 {}", s, query);
                return true;
            }
        }
        false
    }
}

impl From<&Gallery> for SimpleGallery {
    fn from(gallery: &Gallery) -> Self {
        Self::from_gallery(gallery)
    }
}

/// 标签不会被写入
impl Parcelable for SimpleGallery {
    fn write_to_parcel(&self, dest: &mut Parcel) {
        dest.write_string(Some(&self.title));
        dest.write_i32(self.id);
        dest.write_i32(self.media_id);
        dest.write_byte(self.thumbnail.ordinal() as i8);
        dest.write_byte(self.language.ordinal() as i8);
    }

    fn from_parcel(src: &mut Parcel) -> Result<Self> {
        let title = src.read_string()?.context("标题为空")?;
        let id = src.read_i32()?;
        let media_id = src.read_i32()?;
        let thumbnail = ImageExt::from_ordinal(i32::from(src.read_byte()?))?;
        let language = Language::from_ordinal(i32::from(src.read_byte()?))?;
        Ok(Self {
            title,
            id,
            media_id,
            thumbnail,
            language,
            tags: None,
        })
    }
}

impl GenericGallery for SimpleGallery {
    fn id(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> GalleryKind {
        GalleryKind::Simple
    }

    fn page_count(&self) -> i32 {
        0
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for SimpleGallery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {} (media {}, {:?})",
            self.id, self.language, self.title, self.media_id, self.thumbnail
        )
    }
}

/// 解析整个列表页
pub fn parse_listing<R>(
    html: &str,
    context: Option<&Config>,
    resolver: &R,
) -> Result<Vec<SimpleGallery>>
where
    R: TagResolver + ?Sized,
{
    let root = parse_html(html)?;
    let elements = match root
        .xpath(r#"//div[contains(concat(" ", normalize-space(@class), " "), " gallery ")]"#)?
        .into_element()
    {
        Some(v) => v,
        None => return Ok(vec![]),
    };
    debug!("数量: {}", elements.len());
    elements
        .iter()
        .map(|element| SimpleGallery::from_html(context, element, resolver))
        .collect()
}
