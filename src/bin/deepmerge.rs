//! deepmerge - merge YAML/JSON documents from the command line.
//!
//! Files are merged left to right; later files win on conflicts.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use deepmerge::value::{self, Value};
use deepmerge::{merge_slice, ArrayMergeKind, ConfigError, MergeConfig};

#[derive(Debug, Parser)]
#[command(name = "deepmerge", version, about = "Deep merge YAML/JSON documents")]
struct Cli {
    /// Files to merge, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Array merge strategy: concat or by-id
    #[arg(short, long, value_parser = parse_array_merge)]
    array_merge: Option<ArrayMergeKind>,

    /// Identity key used by the by-id strategy
    #[arg(long)]
    id_key: Option<String>,

    /// Merge config file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn parse_array_merge(s: &str) -> Result<ArrayMergeKind, String> {
    s.parse().map_err(|e: ConfigError| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;
    debug!(?config, "resolved merge config");

    let documents = cli
        .files
        .iter()
        .map(read_document)
        .collect::<Result<Vec<_>, _>>()?;

    let merged = merge_slice(&documents, &config.into_options());
    let rendered = render(&merged, cli.format)?;
    write_output(&cli.output, &rendered)
}

/// Flags override the config file, which overrides the defaults.
fn resolve_config(cli: &Cli) -> Result<MergeConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::from_path(path)?,
        None => MergeConfig::default(),
    };
    if let Some(kind) = cli.array_merge {
        config.array_merge = kind;
    }
    if let Some(key) = &cli.id_key {
        config.identity_key = key.clone();
    }
    Ok(config)
}

fn render(merged: &Value, format: Format) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = match format {
        Format::Json => {
            let mut json = value::to_json_pretty(merged)
                .map_err(|e| format!("Failed to serialize result: {}", e))?;
            json.push('\n');
            json
        }
        Format::Yaml => {
            value::to_yaml(merged).map_err(|e| format!("Failed to serialize result: {}", e))?
        }
    };
    Ok(rendered)
}

fn write_output(output: &str, rendered: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut output: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout())
    } else {
        let file = fs::File::create(output)
            .map_err(|e| format!("Failed to create output file {:?}: {}", output, e))?;
        Box::new(file)
    };
    write!(output, "{}", rendered)?;
    Ok(())
}

fn read_document(path: &PathBuf) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "read document");
    // YAML is a superset of JSON
    let document = value::from_yaml(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deepmerge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_resolve_config_defaults() {
        let cli = parse(&["a.yaml"]);
        assert_eq!(resolve_config(&cli).unwrap(), MergeConfig::default());
    }

    #[test]
    fn test_resolve_config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "merge.yaml", "arrayMerge: by-id\nidentityKey: name\n");
        let cli = parse(&["-c", &config, "a.yaml"]);

        let resolved = resolve_config(&cli).unwrap();
        assert_eq!(resolved.array_merge, ArrayMergeKind::ById);
        assert_eq!(resolved.identity_key, "name");
        assert!(resolved.clone);
    }

    #[test]
    fn test_resolve_config_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "merge.yaml", "arrayMerge: by-id\nidentityKey: name\n");
        let cli = parse(&["-c", &config, "-a", "concat", "--id-key", "uid", "a.yaml"]);

        let resolved = resolve_config(&cli).unwrap();
        assert_eq!(resolved.array_merge, ArrayMergeKind::Concat);
        assert_eq!(resolved.identity_key, "uid");
    }

    #[test]
    fn test_resolve_config_json_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "merge.json", r#"{"clone": false}"#);
        let cli = parse(&["--config", &config, "a.yaml"]);
        assert!(!resolve_config(&cli).unwrap().clone);
    }

    #[test]
    fn test_unknown_array_merge_flag_is_rejected() {
        let result = Cli::try_parse_from(["deepmerge", "-a", "zip", "a.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_json_and_yaml() {
        let merged = value::from_json(r#"{"b":1,"a":[true]}"#).unwrap();
        assert_eq!(
            render(&merged, Format::Json).unwrap(),
            "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}\n"
        );
        assert_eq!(render(&merged, Format::Yaml).unwrap(), "b: 1\na:\n- true\n");
    }

    #[test]
    fn test_run_writes_merged_output_file() {
        let dir = TempDir::new().unwrap();
        let base = write_file(&dir, "base.yaml", "items:\n- _id: 1\n  x: 1\nport: 80\n");
        let overlay = write_file(
            &dir,
            "overlay.json",
            r#"{"items":[{"_id":1,"y":2}],"port":8080}"#,
        );
        let output = dir.path().join("out.json").display().to_string();

        let cli = parse(&["-a", "by-id", "-f", "json", "-o", &output, &base, &overlay]);
        run(cli).unwrap();

        let written = value::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written,
            value::from_json(r#"{"items":[{"_id":1,"x":1,"y":2}],"port":8080}"#).unwrap()
        );
    }

    #[test]
    fn test_run_reports_missing_input() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml").display().to_string();
        let err = run(parse(&[&missing])).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
