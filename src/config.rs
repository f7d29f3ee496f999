use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs::File, io::Read, path::Path, path::PathBuf};

pub const DEFAULT_HOST: &str = "nhentai.net";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点域名，用于拼接缩略图地址
    pub host: String,
    /// 数据库地址，未设置时读取 DATABASE_URL
    pub database_url: Option<String>,
    /// 保存最大画廊 id 的文件
    pub max_id_file: Option<PathBuf>,
    /// 历史记录最多保留的条数
    pub max_history: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            database_url: None,
            max_id_file: None,
            max_history: 500,
        }
    }
}

impl Config {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut str = String::new();
        file.read_to_string(&mut str)?;
        Self::parse(&str)
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// 数据库地址，配置文件优先，其次是环境变量
    pub fn database_url(&self) -> Result<String> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => env::var("DATABASE_URL").context("请设置 DATABASE_URL 或 database_url"),
        }
    }
}
