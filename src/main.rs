#[macro_use]
extern crate log;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use getopts::Options;
use nclient::config::Config;
use nclient::database::DataBase;
use nclient::global;
use nclient::tag::{Tag, TagResolver};
use nclient::{parse_listing, GenericGallery};
use std::collections::HashMap;
use std::{env, fs, path::Path};

fn print_usage(program: &str, opts: &Options) {
    let brief = format!(
        "Usage: {} [options] parse FILE | history | clear-history",
        program
    );
    print!("{}", opts.usage(&brief));
}

fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::new(path).with_context(|| format!("无法读取配置文件 {}", path))
    } else {
        debug!("找不到 {}，使用默认配置", path);
        Ok(Config::default())
    }
}

fn open_database(config: &Config) -> Result<DataBase> {
    DataBase::open(&config.database_url()?, config.max_history)
}

fn run() -> Result<()> {
    let args = env::args().collect::<Vec<_>>();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("c", "config", "配置文件路径", "FILE");
    opts.optflag("r", "record", "将解析出的画廊加入历史记录");
    opts.optflag("h", "help", "显示帮助");
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") || matches.free.is_empty() {
        print_usage(&program, &opts);
        return Ok(());
    }

    let config = load_config(&matches.opt_str("c").unwrap_or_else(|| "config.toml".into()))?;
    execute(&matches.free, matches.opt_present("r"), &config)
}

fn execute(free: &[String], record: bool, config: &Config) -> Result<()> {
    match free[0].as_str() {
        "parse" => {
            let file = free.get(1).context("缺少要解析的文件")?;
            let html = fs::read_to_string(file)?;
            let max_id = global::load_max_id(config)?;
            debug!("当前最大 id: {}", max_id);

            // 没有数据库时无法查询标签
            let db = match open_database(config) {
                Ok(db) => Some(db),
                Err(e) => {
                    warn!("{}，标签将为空", e);
                    None
                }
            };
            let empty = HashMap::<i32, Tag>::new();
            let resolver: &dyn TagResolver = match &db {
                Some(db) => db,
                None => &empty,
            };

            let galleries = parse_listing(&html, Some(config), resolver)?;
            info!("找到 {} 本", galleries.len());
            for gallery in &galleries {
                println!("{}", gallery);
                if let Some(url) = gallery.thumbnail_url(&config.host) {
                    println!("    {}", url);
                }
            }

            if record {
                let db = db.context("记录历史需要数据库")?;
                let now = Utc::now().timestamp();
                for gallery in galleries.iter().filter(|g| g.is_valid()) {
                    db.add_history(gallery, now)?;
                }
            }
            if global::max_id() > max_id {
                info!("最大 id 更新为 {}", global::max_id());
            }
        }
        "history" => {
            for gallery in open_database(config)?.query_history()? {
                println!("{}", gallery);
            }
        }
        "clear-history" => {
            open_database(config)?.clear_history()?;
            info!("历史记录已清空");
        }
        other => bail!("未知命令: {}", other),
    }
    Ok(())
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();
    if let Err(e) = run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_max_id_only_breaks_parse() {
        let dir = tempfile::tempdir().unwrap();
        let max_id_file = dir.path().join("MAX_ID");
        fs::write(&max_id_file, "not a number").unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p>empty</p>").unwrap();
        let config = Config {
            database_url: Some(":memory:".to_owned()),
            max_id_file: Some(max_id_file),
            ..Config::default()
        };

        assert!(execute(&["history".to_owned()], false, &config).is_ok());
        assert!(execute(&["clear-history".to_owned()], false, &config).is_ok());
        let parse = ["parse".to_owned(), page.display().to_string()];
        assert!(execute(&parse, false, &config).is_err());
    }
}
