use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use console_models::Screen;
use list_view::json::parse_collection;
use list_view::{ListViewState, ViewConfig};

/// 命令行参数中与列表状态相关的部分
#[derive(Debug, Default)]
struct InspectOptions {
    search: Option<String>,
    filters: Vec<(String, String)>,
    sorts: Vec<String>,
    page: Option<usize>,
    page_size: Option<usize>,
    select_all: bool,
}

// 主函数
fn main() {
    let matches = Command::new("列表视图调试工具")
        .version(env!("CARGO_PKG_VERSION"))
        .about("对导出的 JSON 列表数据执行搜索、筛选、排序和分页，输出视图结果")
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .value_name("JSON_FILE")
            .help("JSON 数组或 {\"data\": [...]} 格式的数据文件")
            .required(true))
        .arg(Arg::new("screen")
            .short('s')
            .long("screen")
            .value_name("SCREEN")
            .help("页面预设: audit_logs, consents, dsar, users, webhooks, vas_services")
            .default_value("consents"))
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("CONFIG_FILE")
            .help("自定义 ViewConfig JSON 文件，覆盖页面预设"))
        .arg(Arg::new("search")
            .short('q')
            .long("search")
            .value_name("QUERY")
            .help("搜索词"))
        .arg(Arg::new("filter")
            .short('f')
            .long("filter")
            .value_name("KEY=VALUE")
            .help("筛选条件，可重复")
            .action(ArgAction::Append))
        .arg(Arg::new("sort")
            .long("sort")
            .value_name("FIELD")
            .help("点击表头，可重复（同一字段再次出现时切换方向）")
            .action(ArgAction::Append))
        .arg(Arg::new("page")
            .short('p')
            .long("page")
            .value_name("N")
            .value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("page_size")
            .long("page-size")
            .value_name("N")
            .value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("select_all")
            .long("select-all")
            .help("全选可见记录")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("错误: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<String> {
    let input = matches
        .get_one::<String>("input")
        .ok_or_else(|| anyhow!("缺少 --input"))?;
    let items_json =
        fs::read_to_string(input).with_context(|| format!("无法读取数据文件 '{}'", input))?;

    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件 '{}'", path))?;
            serde_json::from_str::<ViewConfig>(&raw)
                .with_context(|| format!("配置文件格式错误 '{}'", path))?
        }
        None => {
            let key = matches
                .get_one::<String>("screen")
                .map(String::as_str)
                .unwrap_or("consents");
            key.parse::<Screen>().map_err(|e| anyhow!(e))?.config()
        }
    };

    let options = parse_options(matches)?;
    render_view(config, &items_json, &options)
}

fn parse_options(matches: &ArgMatches) -> Result<InspectOptions> {
    let filters = matches
        .get_many::<String>("filter")
        .unwrap_or_default()
        .map(|raw| {
            raw.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| anyhow!("筛选条件格式应为 KEY=VALUE: '{}'", raw))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(InspectOptions {
        search: matches.get_one::<String>("search").cloned(),
        filters,
        sorts: matches
            .get_many::<String>("sort")
            .unwrap_or_default()
            .cloned()
            .collect(),
        page: matches.get_one::<usize>("page").copied(),
        page_size: matches.get_one::<usize>("page_size").copied(),
        select_all: matches.get_flag("select_all"),
    })
}

// 按界面上的操作顺序重放参数，输出视图 JSON
fn render_view(config: ViewConfig, items_json: &str, options: &InspectOptions) -> Result<String> {
    let items = parse_collection(items_json, &config.id_field).context("数据文件格式错误")?;
    info!(count = items.len(), "已加载记录");

    let mut state = ListViewState::with_collection(config, items);
    for (key, value) in &options.filters {
        state.set_filter(key, Some(value.as_str()));
    }
    if let Some(query) = &options.search {
        state.set_search_query(query.as_str());
    }
    for field in &options.sorts {
        state.set_sort(field);
    }
    if let Some(size) = options.page_size {
        state.set_page_size(size);
    }
    if let Some(page) = options.page {
        state.set_page(page);
    }
    if options.select_all {
        state.select_all_visible();
    }

    debug!(active_filters = state.active_filter_count(), "视图参数已应用");
    serde_json::to_string_pretty(&state.view()).context("序列化视图失败")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const ITEMS: &str = r#"{"data": [
        {"id": "c1", "user_name": "Bob", "email": "bob@x.io", "purpose": "marketing", "status": "active", "granted_at": "2024-01-10T09:00:00Z"},
        {"id": "c2", "user_name": "Alice", "email": "alice@x.io", "purpose": "analytics", "status": "active", "granted_at": "2024-02-10T09:00:00Z"},
        {"id": "c3", "user_name": "Carol", "email": "carol@x.io", "purpose": "marketing", "status": "withdrawn", "granted_at": "bad"}
    ]}"#;

    #[test]
    fn test_render_view_replays_options() {
        let options = InspectOptions {
            filters: vec![("status".to_string(), "active".to_string())],
            sorts: vec!["user_name".to_string(), "user_name".to_string()],
            page_size: Some(1),
            page: Some(2),
            select_all: true,
            ..InspectOptions::default()
        };

        let output = render_view(Screen::Consents.config(), ITEMS, &options).unwrap();
        let view: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(view["filtered_count"], 2);
        assert_eq!(view["total_pages"], 2);
        assert_eq!(view["page"]["index"], 2);
        assert_eq!(view["rows"][0]["user_name"], "Alice");
        assert_eq!(view["sort"]["direction"], "descending");
        assert_eq!(view["selection"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_render_view_rejects_bad_input() {
        let err = render_view(Screen::Consents.config(), "42", &InspectOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("数据文件格式错误"));
    }

    #[test]
    fn test_parse_options() {
        let matches = Command::new("t")
            .arg(Arg::new("search").long("search"))
            .arg(Arg::new("filter").long("filter").action(ArgAction::Append))
            .arg(Arg::new("sort").long("sort").action(ArgAction::Append))
            .arg(Arg::new("page").long("page").value_parser(clap::value_parser!(usize)))
            .arg(Arg::new("page_size").long("page-size").value_parser(clap::value_parser!(usize)))
            .arg(Arg::new("select_all").long("select-all").action(ArgAction::SetTrue))
            .get_matches_from(["t", "--filter", "status = active", "--sort", "email", "--page", "3"]);

        let options = parse_options(&matches).unwrap();
        assert_eq!(options.filters, vec![("status".to_string(), "active".to_string())]);
        assert_eq!(options.sorts, vec!["email"]);
        assert_eq!(options.page, Some(3));
        assert!(!options.select_all);
    }
}
