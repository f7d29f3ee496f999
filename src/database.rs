use crate::enums::{TagStatus, TagType};
use crate::gallery::GenericGallery;
use crate::schema::*;
use crate::simple_gallery::SimpleGallery;
use crate::tag::{Tag, TagList, TagResolver};
use anyhow::Result;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::HashMap;

embed_migrations!("migrations");

/// 历史记录表中的一行
#[derive(Queryable, Insertable, PartialEq, Debug)]
#[table_name = "history"]
pub struct HistoryRow {
    pub id: i32,
    pub media_id: i32,
    pub title: String,
    /// 缩略图格式的序号
    pub thumb_type: i32,
    /// 浏览时间，unix 时间戳
    pub time: i64,
}

#[derive(Queryable, Insertable)]
#[table_name = "tags"]
struct TagRow {
    id: i32,
    name: String,
    tag_type: i32,
    count: i32,
    status: i32,
}

impl HistoryRow {
    pub fn new(gallery: &SimpleGallery, time: i64) -> Self {
        Self {
            id: gallery.id(),
            media_id: gallery.media_id(),
            title: gallery.title().to_owned(),
            thumb_type: i32::from(gallery.thumb().ordinal()),
            time,
        }
    }
}

impl TagRow {
    fn into_tag(self) -> Result<Tag> {
        Ok(Tag {
            id: self.id,
            name: self.name,
            tag_type: TagType::from_ordinal(self.tag_type)?,
            count: self.count,
            status: TagStatus::from_ordinal(self.status)?,
        })
    }
}

pub struct DataBase {
    pool: Pool<ConnectionManager<SqliteConnection>>,
    max_history: usize,
}

impl DataBase {
    /// 连接数据库并执行迁移
    pub fn open(url: &str, max_history: usize) -> Result<Self> {
        info!("数据库建立连接中……");
        // 内存数据库每个连接都是独立的，只能用一个连接
        let size = if url == ":memory:" { 1 } else { 16 };
        let manager = ConnectionManager::new(url);
        let pool = Pool::builder().max_size(size).build(manager)?;
        embedded_migrations::run(&pool.get()?)?;
        Ok(Self { pool, max_history })
    }

    /// 记录一次浏览，超出上限的旧记录会被删除
    pub fn add_history(&self, gallery: &SimpleGallery, time: i64) -> Result<()> {
        debug!("添加历史记录: {}", gallery.id());
        let conn = self.pool.get()?;
        diesel::replace_into(history::table)
            .values(&HistoryRow::new(gallery, time))
            .execute(&conn)?;

        let ids = history::table
            .select(history::id)
            .order((history::time.desc(), history::id.desc()))
            .load::<i32>(&conn)?;
        if ids.len() > self.max_history {
            let outdated = ids[self.max_history..].to_vec();
            debug!("清理历史记录: {:?}", outdated);
            diesel::delete(history::table.filter(history::id.eq_any(outdated))).execute(&conn)?;
        }
        Ok(())
    }

    /// 按时间倒序返回历史记录
    pub fn query_history(&self) -> Result<Vec<SimpleGallery>> {
        history::table
            .order((history::time.desc(), history::id.desc()))
            .load::<HistoryRow>(&self.pool.get()?)?
            .iter()
            .map(SimpleGallery::from_history)
            .collect()
    }

    pub fn clear_history(&self) -> Result<()> {
        diesel::delete(history::table).execute(&self.pool.get()?)?;
        Ok(())
    }

    pub fn insert_tag(&self, tag: &Tag) -> Result<()> {
        let row = TagRow {
            id: tag.id,
            name: tag.name.clone(),
            tag_type: i32::from(tag.tag_type.ordinal()),
            count: tag.count,
            status: i32::from(tag.status.ordinal()),
        };
        diesel::replace_into(tags::table)
            .values(&row)
            .execute(&self.pool.get()?)?;
        Ok(())
    }
}

impl TagResolver for DataBase {
    fn tags_from_ids(&self, ids: &[i32]) -> Result<TagList> {
        let mut found = tags::table
            .filter(tags::id.eq_any(ids.to_vec()))
            .load::<TagRow>(&self.pool.get()?)?
            .into_iter()
            .map(|row| Ok((row.id, row.into_tag()?)))
            .collect::<Result<HashMap<_, _>>>()?;
        // 保持 data-tags 中的顺序
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ImageExt, Language};

    fn gallery(id: i32, title: &str) -> SimpleGallery {
        let row = HistoryRow {
            id,
            media_id: id * 10,
            title: title.to_owned(),
            thumb_type: 1,
            time: 0,
        };
        SimpleGallery::from_history(&row).unwrap()
    }

    #[test]
    fn history() {
        let db = DataBase::open(":memory:", 2).unwrap();
        db.add_history(&gallery(1, "one"), 100).unwrap();
        db.add_history(&gallery(2, "two"), 200).unwrap();

        let history = db.query_history().unwrap();
        assert_eq!(
            history.iter().map(|g| g.id()).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(history[0].title(), "two");
        assert_eq!(history[0].media_id(), 20);
        assert_eq!(history[0].thumb(), ImageExt::Png);
        assert_eq!(history[0].language(), Language::Unknown);
        assert!(history[0].tags().is_none());

        // 再次浏览会刷新时间
        db.add_history(&gallery(1, "one"), 300).unwrap();
        // 超出上限，最旧的 2 被删除
        db.add_history(&gallery(3, "three"), 400).unwrap();
        let ids = db
            .query_history()
            .unwrap()
            .iter()
            .map(|g| g.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 1]);

        db.clear_history().unwrap();
        assert!(db.query_history().unwrap().is_empty());
    }

    #[test]
    fn bad_thumb_ordinal() {
        let db = DataBase::open(":memory:", 10).unwrap();
        let row = HistoryRow {
            id: 1,
            media_id: 1,
            title: "broken".to_owned(),
            thumb_type: 9,
            time: 0,
        };
        diesel::insert_into(history::table)
            .values(&row)
            .execute(&db.pool.get().unwrap())
            .unwrap();
        assert!(db.query_history().is_err());
    }

    #[test]
    fn resolve_tags() {
        let db = DataBase::open(":memory:", 10).unwrap();
        db.insert_tag(&Tag::new(6346, "japanese", TagType::Language))
            .unwrap();
        db.insert_tag(&Tag::new(8378, "full color", TagType::Tag))
            .unwrap();

        let tags = db.tags_from_ids(&[8378, 1, 6346]).unwrap();
        let names = tags
            .all_tags()
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["full color", "japanese"]);
        assert_eq!(tags.all_tags()[1].tag_type, TagType::Language);
    }
}
