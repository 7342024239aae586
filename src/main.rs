// ==========================================
// 会议日程构建器 - 命令行入口
// ==========================================
// 用法:
//   program-builder [--settings <file>] [--log-json] <command> ...
//
//   sheets  <workbook>                               列出工作表与列映射猜测
//   preview <workbook|google-url> <config.json>       输出预览 JSON
//   build   <workbook|google-url> <config.json> [out] 写出导出文件
//   program <url>                                    获取远程日程 JSON
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use program_builder::api::{ApiError, ProgramApi};
use program_builder::config::{load_build_config, ConfigManager};
use program_builder::logging::{self, LogFormat};
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: program-builder [--settings <file>] [--log-json] \
<sheets <workbook> | preview <source> <config.json> | build <source> <config.json> [out.json] | program <url>>";

struct CliArgs {
    settings: Option<PathBuf>,
    log_format: LogFormat,
    command: Vec<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut settings = None;
    let mut log_format = LogFormat::Text;
    let mut command = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args.next().context("--settings requires a file path")?;
                settings = Some(PathBuf::from(path));
            }
            "--log-json" => log_format = LogFormat::Json,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => command.push(arg),
        }
    }

    Ok(CliArgs {
        settings,
        log_format,
        command,
    })
}

/// 工作簿来源: 以 http(s):// 开头视为 Google 表格链接
fn load_source(api: &mut ProgramApi, source: &str) -> Result<()> {
    if source.starts_with("http://") || source.starts_with("https://") {
        api.fetch_google(source)
            .with_context(|| format!("failed to fetch {}", source))?;
    } else {
        api.load_path(Path::new(source))
            .with_context(|| format!("failed to load {}", source))?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: CliArgs) -> Result<()> {
    let config = ConfigManager::load(cli.settings.as_deref()).context("failed to load settings")?;
    let mut api = ProgramApi::new(&config)?;

    let command: Vec<&str> = cli.command.iter().map(String::as_str).collect();
    match command.as_slice() {
        ["sheets", source] => {
            load_source(&mut api, source)?;
            print_json(&api.list_sheets())
        }
        ["preview", source, config_path] => {
            load_source(&mut api, source)?;
            let build_config = load_build_config(Path::new(config_path))?;
            print_json(&api.preview(&build_config)?)
        }
        ["build", source, config_path, rest @ ..] if rest.len() <= 1 => {
            load_source(&mut api, source)?;
            let build_config = load_build_config(Path::new(config_path))?;

            let artifact = match api.build(&build_config) {
                Ok(artifact) => artifact,
                Err(ApiError::ValidationBlocked { errors, warnings }) => {
                    for warning in &warnings {
                        eprintln!("warning: {}", warning);
                    }
                    for error in &errors {
                        eprintln!("error: {}", error);
                    }
                    bail!("build blocked by {} validation error(s)", errors.len());
                }
                Err(e) => return Err(e.into()),
            };

            for warning in &artifact.warnings {
                eprintln!("warning: {}", warning);
            }

            let out = rest
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            std::fs::write(&out, artifact.json.as_bytes())
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), "导出文件已写入");
            println!("{}", out.display());
            Ok(())
        }
        ["program", url] => print_json(&api.fetch_program(url)?),
        _ => Err(anyhow!(USAGE)),
    }
}

fn main() -> Result<()> {
    let cli = parse_args()?;
    logging::init_with_format(cli.log_format);

    tracing::debug!(version = program_builder::VERSION, "{} 启动", program_builder::APP_NAME);
    run(cli)
}
