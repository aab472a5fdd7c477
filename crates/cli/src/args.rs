use std::path::PathBuf;

use code_pair_check_core::{CompareOptions, Mode};

pub(crate) const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const HELP_TEXT_EN: &str = concat!(
    "code-pair-check (near-duplicate comparison of a base file against candidates)\n",
    "\n",
    "Usage:\n",
    "  code-pair-check [options] <base> <candidate ...>\n",
    "  code-pair-check --list-history <file>\n",
    "\n",
    "Options:\n",
    "  --localization <en|zh>  Set output language (default: en)\n",
    "  --mode <m>              syntax, lines, windows (3 lines) or lines:<n> (default: syntax)\n",
    "  --window <n>            Line mode with n lines per unit\n",
    "  --threshold <f>         Match threshold: 0..1 (default: 0.9)\n",
    "  --no-expand             Line mode: do not grow matches into regions\n",
    "  --fallback-lines        Retry pairs that fail to parse in line mode\n",
    "  --json                  Output JSON\n",
    "  --html                  Output HTML with highlighted lines\n",
    "  --color                 Highlight matched lines with ANSI colors\n",
    "  --summary               Only print one similarity line per pair\n",
    "  --strict                Exit non-zero if any pair could not be compared\n",
    "  --history <file>        Append one record per compared pair\n",
    "  --list-history <file>   Print recorded comparisons and exit\n",
    "  --max-file-size <n>     Skip files larger than n bytes (default: 10485760)\n",
    "  --ext <ext>             Candidate extension in directories (repeatable, default: py)\n",
    "  --no-gitignore          Do not respect .gitignore rules in directories\n",
    "  -V, --version           Show version\n",
    "  -h, --help              Show help\n",
    "\n",
    "Notes:\n",
    "  - Candidates may be directories; they are walked for files with a selected extension\n",
    "  - Logging is controlled by CODE_PAIR_CHECK_LOG (default: warn)\n",
    "\n",
    "Examples:\n",
    "  code-pair-check submission.py reference.py\n",
    "  code-pair-check --mode lines:1 --no-expand a.py b.py\n",
    "  code-pair-check --summary --history history.jsonl base.py submissions/\n",
    "\n"
);

const HELP_TEXT_ZH: &str = concat!(
    "code-pair-check（将基准文件与候选文件进行近似重复比较）\n",
    "\n",
    "用法:\n",
    "  code-pair-check [options] <base> <candidate ...>\n",
    "  code-pair-check --list-history <file>\n",
    "\n",
    "选项:\n",
    "  --localization <en|zh>  输出语言（默认: en）\n",
    "  --mode <m>              syntax、lines、windows（3 行）或 lines:<n>（默认: syntax）\n",
    "  --window <n>            行模式，每个单元 n 行\n",
    "  --threshold <f>         匹配阈值：0..1（默认: 0.9）\n",
    "  --no-expand             行模式：不将匹配扩展为连续区域\n",
    "  --fallback-lines        语法解析失败时改用行模式重试\n",
    "  --json                  输出 JSON\n",
    "  --html                  输出带高亮的 HTML\n",
    "  --color                 使用 ANSI 颜色高亮匹配行\n",
    "  --summary               每对文件只输出一行相似度\n",
    "  --strict                若有文件对无法比较则退出码非 0\n",
    "  --history <file>        为每对比较结果追加一条记录\n",
    "  --list-history <file>   输出历史记录后退出\n",
    "  --max-file-size <n>     跳过大于 n 字节的文件（默认: 10485760）\n",
    "  --ext <ext>             目录中的候选文件扩展名（可重复，默认: py）\n",
    "  --no-gitignore          遍历目录时不尊重 .gitignore 规则\n",
    "  -V, --version           显示版本\n",
    "  -h, --help              显示帮助\n",
    "\n",
    "说明:\n",
    "  - 候选可以是目录；会遍历其中扩展名匹配的文件\n",
    "  - 日志级别由 CODE_PAIR_CHECK_LOG 控制（默认: warn）\n",
    "\n",
    "示例:\n",
    "  code-pair-check submission.py reference.py\n",
    "  code-pair-check --mode lines:1 --no-expand a.py b.py\n",
    "  code-pair-check --summary --history history.jsonl base.py submissions/\n",
    "\n"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Localization {
    En,
    Zh,
}

impl Localization {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Some(Self::En),
            "zh" | "zh-cn" | "zh_cn" | "cn" => Some(Self::Zh),
            _ => None,
        }
    }
}

pub(crate) fn tr(localization: Localization, en: &'static str, zh: &'static str) -> &'static str {
    match localization {
        Localization::En => en,
        Localization::Zh => zh,
    }
}

pub(crate) fn print_help(localization: Localization) {
    print!(
        "{}",
        match localization {
            Localization::En => HELP_TEXT_EN,
            Localization::Zh => HELP_TEXT_ZH,
        }
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Compare {
        base: PathBuf,
        candidates: Vec<PathBuf>,
    },
    ListHistory(PathBuf),
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) localization: Localization,
    pub(crate) command: Command,
    pub(crate) options: CompareOptions,
    pub(crate) format: OutputFormat,
    pub(crate) color: bool,
    pub(crate) summary: bool,
    pub(crate) strict: bool,
    pub(crate) fallback_lines: bool,
    pub(crate) history: Option<PathBuf>,
    pub(crate) max_file_size: u64,
    pub(crate) extensions: Vec<String>,
    pub(crate) respect_gitignore: bool,
}

fn parse_u64(localization: Localization, name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>().map_err(|_| {
        format!(
            "{} {}",
            name,
            tr(localization, "must be an integer", "必须是整数")
        )
    })
}

fn parse_window(localization: Localization, raw: &str) -> Result<usize, String> {
    let value = parse_u64(localization, "--window", raw)?;
    if value == 0 {
        return Err(tr(
            localization,
            "--window must be at least 1",
            "--window 必须至少为 1",
        )
        .to_string());
    }
    usize::try_from(value).map_err(|_| {
        format!(
            "--window {} {max}",
            tr(localization, "must be <=", "必须 <= "),
            max = usize::MAX
        )
    })
}

fn parse_threshold(localization: Localization, raw: &str) -> Result<f64, String> {
    let value = raw.parse::<f64>().map_err(|_| {
        format!(
            "--threshold {}",
            tr(localization, "must be a number", "必须是数字")
        )
    })?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(tr(
            localization,
            "--threshold must be 0..1",
            "--threshold 必须在 0..1 范围内",
        )
        .to_string());
    }
    Ok(value)
}

fn parse_mode(localization: Localization, raw: &str) -> Result<Mode, String> {
    raw.parse::<Mode>().map_err(|_| {
        format!(
            "{} {raw}",
            tr(
                localization,
                "--mode must be one of: syntax, lines, windows, lines:<n>; got",
                "--mode 必须是 syntax、lines、windows 或 lines:<n>，实际为",
            ),
        )
    })
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

pub(crate) fn detect_localization(argv: &[String]) -> Result<Localization, String> {
    let mut localization = Localization::En;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            break;
        }

        if let Some(raw) = arg.strip_prefix("--localization=") {
            localization = Localization::parse(raw)
                .ok_or_else(|| "--localization must be one of: en, zh (or zh-CN)".to_string())?;
            i += 1;
            continue;
        }

        if arg == "--localization" {
            let raw = argv.get(i + 1).ok_or("--localization requires a value")?;
            localization = Localization::parse(raw)
                .ok_or_else(|| "--localization must be one of: en, zh (or zh-CN)".to_string())?;
            i += 2;
            continue;
        }

        i += 1;
    }

    Ok(localization)
}

fn value_of<'a>(
    argv: &'a [String],
    i: usize,
    localization: Localization,
    missing_en: &'static str,
    missing_zh: &'static str,
) -> Result<&'a str, String> {
    argv.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| tr(localization, missing_en, missing_zh).to_string())
}

pub(crate) fn parse_args(
    argv: &[String],
    localization: Localization,
) -> Result<ParsedArgs, String> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut mode: Option<Mode> = None;
    let mut window: Option<usize> = None;
    let mut threshold: Option<f64> = None;
    let mut expand_regions = true;
    let mut fallback_lines = false;
    let mut json = false;
    let mut html = false;
    let mut color = false;
    let mut summary = false;
    let mut strict = false;
    let mut history: Option<PathBuf> = None;
    let mut list_history: Option<PathBuf> = None;
    let mut max_file_size: Option<u64> = None;
    let mut extensions: Vec<String> = Vec::new();
    let mut respect_gitignore = true;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            paths.extend(argv[(i + 1)..].iter().map(PathBuf::from));
            break;
        }
        if arg.strip_prefix("--localization=").is_some() {
            i += 1;
            continue;
        }
        match arg.as_str() {
            "--localization" => {
                value_of(
                    argv,
                    i,
                    localization,
                    "--localization requires a value",
                    "--localization 需要一个值",
                )?;
                i += 2;
            }
            "--mode" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--mode requires a value",
                    "--mode 需要一个值",
                )?;
                mode = Some(parse_mode(localization, raw)?);
                i += 2;
            }
            "--window" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--window requires a value",
                    "--window 需要一个值",
                )?;
                window = Some(parse_window(localization, raw)?);
                i += 2;
            }
            "--threshold" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--threshold requires a value",
                    "--threshold 需要一个值",
                )?;
                threshold = Some(parse_threshold(localization, raw)?);
                i += 2;
            }
            "--history" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--history requires a value",
                    "--history 需要一个值",
                )?;
                history = Some(PathBuf::from(raw));
                i += 2;
            }
            "--list-history" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--list-history requires a value",
                    "--list-history 需要一个值",
                )?;
                list_history = Some(PathBuf::from(raw));
                i += 2;
            }
            "--max-file-size" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--max-file-size requires a value",
                    "--max-file-size 需要一个值",
                )?;
                max_file_size = Some(parse_u64(localization, "--max-file-size", raw)?);
                i += 2;
            }
            "--ext" => {
                let raw = value_of(
                    argv,
                    i,
                    localization,
                    "--ext requires a value",
                    "--ext 需要一个值",
                )?;
                let ext = normalize_extension(raw);
                if ext.is_empty() {
                    return Err(tr(
                        localization,
                        "--ext must not be empty",
                        "--ext 不能为空",
                    )
                    .to_string());
                }
                extensions.push(ext);
                i += 2;
            }
            "--no-expand" => {
                expand_regions = false;
                i += 1;
            }
            "--fallback-lines" => {
                fallback_lines = true;
                i += 1;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            "--html" => {
                html = true;
                i += 1;
            }
            "--color" => {
                color = true;
                i += 1;
            }
            "--summary" => {
                summary = true;
                i += 1;
            }
            "--strict" => {
                strict = true;
                i += 1;
            }
            "--no-gitignore" => {
                respect_gitignore = false;
                i += 1;
            }
            "-h" | "--help" | "-V" | "--version" => {
                i += 1;
            }
            other if other.starts_with('-') => {
                return Err(format!(
                    "{} {other}",
                    tr(localization, "Unknown option:", "未知参数:"),
                ));
            }
            _ => {
                paths.push(PathBuf::from(arg));
                i += 1;
            }
        }
    }

    if json && html {
        return Err(tr(
            localization,
            "--json conflicts with --html",
            "--json 与 --html 不能同时使用",
        )
        .to_string());
    }

    let mode = match (mode, window) {
        (Some(Mode::Syntax), Some(_)) => {
            return Err(tr(
                localization,
                "--window only applies to line mode",
                "--window 仅适用于行模式",
            )
            .to_string());
        }
        (Some(Mode::Lines { .. }) | None, Some(window)) => Mode::Lines { window },
        (Some(mode), None) => mode,
        (None, None) => Mode::Syntax,
    };
    let mut options = CompareOptions {
        mode,
        expand_regions,
        ..CompareOptions::default()
    };
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }

    let command = if let Some(file) = list_history {
        if !paths.is_empty() {
            return Err(tr(
                localization,
                "--list-history does not take input files",
                "--list-history 不接受输入文件",
            )
            .to_string());
        }
        Command::ListHistory(file)
    } else {
        if paths.len() < 2 {
            return Err(tr(
                localization,
                "expected a base file and at least one candidate",
                "需要一个基准文件和至少一个候选文件",
            )
            .to_string());
        }
        let base = paths.remove(0);
        Command::Compare {
            base,
            candidates: paths,
        }
    };

    if extensions.is_empty() {
        extensions.push("py".to_string());
    }

    let format = if json {
        OutputFormat::Json
    } else if html {
        OutputFormat::Html
    } else {
        OutputFormat::Text
    };

    Ok(ParsedArgs {
        localization,
        command,
        options,
        format,
        color,
        summary,
        strict,
        fallback_lines,
        history,
        max_file_size: max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES),
        extensions,
        respect_gitignore,
    })
}
