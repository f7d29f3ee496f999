//! 全局最大画廊 id

use crate::config::Config;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::fs;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

static MAX_ID: AtomicI32 = AtomicI32::new(0);

// 写文件时持有，避免较小的值覆盖较大的值
static FILE_LOCK: Lazy<Mutex<()>> = Lazy::new(Default::default);

pub fn max_id() -> i32 {
    MAX_ID.load(Ordering::SeqCst)
}

/// 更新最大 id，如果配置了文件则同时写入
pub fn update_max_id(config: &Config, id: i32) -> Result<()> {
    let old = MAX_ID.fetch_max(id, Ordering::SeqCst);
    if old >= id {
        return Ok(());
    }
    debug!("最大 id 更新: {} -> {}", old, id);
    if let Some(path) = &config.max_id_file {
        let _guard = FILE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        fs::write(path, max_id().to_string())
            .with_context(|| format!("无法写入 {}", path.display()))?;
    }
    Ok(())
}

/// 从文件中读取上次保存的最大 id
pub fn load_max_id(config: &Config) -> Result<i32> {
    if let Some(path) = &config.max_id_file {
        if path.exists() {
            let id = fs::read_to_string(path)?
                .trim()
                .parse::<i32>()
                .with_context(|| format!("{} 内容不是数字", path.display()))?;
            MAX_ID.fetch_max(id, Ordering::SeqCst);
        }
    }
    Ok(max_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            max_id_file: Some(dir.path().join("MAX_ID")),
            ..Config::default()
        };

        update_max_id(&config, 300_000).unwrap();
        assert!(max_id() >= 300_000);
        let saved = fs::read_to_string(dir.path().join("MAX_ID")).unwrap();
        assert!(saved.parse::<i32>().unwrap() >= 300_000);

        // 更小的 id 不会降低最大值
        update_max_id(&config, 1).unwrap();
        assert!(max_id() >= 300_000);

        fs::write(dir.path().join("MAX_ID"), "400000\n").unwrap();
        assert!(load_max_id(&config).unwrap() >= 400_000);
    }
}
