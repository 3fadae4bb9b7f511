use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use playerlab_analysis::pipeline::PipelineConfig;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of a JSON document: stdout or a newly created file
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut output = match path {
            Some(path) => Self::create(path)?,
            None => Self::Stdout(io::stdout().lock()),
        };
        output.write_json(value)
    }

    fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {self}"))?;
        writeln!(self).with_context(|| format!("Failed to write to {self}"))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {self}"))?;
        Ok(())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(_) => f.write_str("stdout"),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File { writer, .. } => writer.flush(),
        }
    }
}

fn parse_json<T, R>(file_kind: &str, reader: R) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    R: io::Read,
{
    serde_json::from_reader(reader).with_context(|| format!("Failed to parse {file_kind} JSON"))
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    parse_json(file_kind, BufReader::new(file)).with_context(|| path.display().to_string())
}

/// Read pipeline settings from a JSON file
///
/// Missing fields keep their defaults; unknown fields are rejected.
pub fn read_config_file<P>(path: P) -> anyhow::Result<PipelineConfig>
where
    P: AsRef<Path>,
{
    read_json_file("config", path)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use playerlab_analysis::pipeline::Pipeline;

    use super::*;

    const CLUSTERS_CSV: &str = "\
age,playedHours,subscribed
17,12.0,TRUE
18,14.5,TRUE
19,13.0,TRUE
20,15.0,TRUE
33,0.0,FALSE
34,0.1,FALSE
32,0.2,FALSE
33,0.0,FALSE
";

    #[test]
    fn test_parse_partial_config() {
        let config: PipelineConfig =
            parse_json("config", r#"{ "k": 7, "max_age": 40 }"#.as_bytes()).unwrap();
        assert_eq!(config.k, 7);
        assert_eq!(config.max_age, 40.0);
        assert_eq!(config.seed, PipelineConfig::default().seed);
    }

    #[test]
    fn test_parse_config_rejects_typos() {
        let result = parse_json::<PipelineConfig, _>("config", r#"{ "sed": 1 }"#.as_bytes());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Failed to parse config JSON"));
    }

    #[test]
    fn test_save_json_to_file() {
        let config = PipelineConfig {
            k: 1,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let (dataset, cleaning) = pipeline.load_reader(CLUSTERS_CSV.as_bytes()).unwrap();
        let report = pipeline.run(&dataset, cleaning).unwrap();

        let path = env::temp_dir().join(format!("playerlab-report-{}.json", process::id()));
        Output::save_json(&report, Some(path.as_path())).unwrap();
        let saved: serde_json::Value = read_json_file("report", &path).unwrap();
        fs::remove_file(&path).unwrap();

        let accuracy = &saved["classification"]["evaluation"]["accuracy"];
        assert_eq!(accuracy["total"], 2);
        assert_eq!(accuracy["value"], 1.0);
        assert_eq!(saved["cleaning"]["retained"], 8);
    }

    #[test]
    fn test_save_json_to_missing_directory() {
        let path = Path::new("/nonexistent/playerlab/report.json");
        let result = Output::save_json(&PipelineConfig::default(), Some(path));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Failed to create output file"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = read_config_file("/nonexistent/playerlab-config.json");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Failed to open config file"));
    }
}
