use crate::enums::ImageExt;
use anyhow::{Context, Result};

/// 从形如 `/g/1234/` 的画廊链接中获取数字 id
///
/// 去掉固定的 3 字符前缀和 1 字符后缀
pub fn get_id_from_href(href: &str) -> Result<i32> {
    let id = href
        .len()
        .checked_sub(1)
        .and_then(|end| href.get(3..end))
        .with_context(|| format!("画廊链接过短: {}", href))?;
    id.parse::<i32>()
        .with_context(|| format!("无法解析画廊 id: {}", href))
}

/// 从缩略图地址中获取 media id，位于 `galleries/` 与最后一个 `/` 之间
pub fn get_media_id_from_src(src: &str) -> Result<i32> {
    let start = src
        .find("galleries")
        .with_context(|| format!("缩略图地址中找不到 galleries: {}", src))?
        + 10;
    let end = src.rfind('/').unwrap_or(0);
    let media_id = src
        .get(start..end)
        .with_context(|| format!("缩略图地址格式错误: {}", src))?;
    media_id
        .parse::<i32>()
        .with_context(|| format!("无法解析 media id: {}", src))
}

/// 根据文件扩展名首字母判断图片格式
pub fn get_ext_from_src(src: &str) -> ImageExt {
    let ext = src.rsplit('.').next().unwrap_or_default();
    ext.chars()
        .next()
        .map(ImageExt::from_char)
        .unwrap_or(ImageExt::Unknown)
}

/// 合并连续空白并去掉首尾空白
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
