use crate::classify::{ClassifierOptions, MorphologyClassifier};
use crate::orchestrator::{Orchestrator, OrchestratorParams};
use crate::preprocess::{ContrastStretch, PreprocessOptions};
use crate::quality::{IntensityQualityAnalyzer, QualityThresholds};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Sample images classified by `demo` mode, relative to `samples_dir`.
pub const DEMO_SAMPLES: [&str; 3] = ["spiral_00.png", "elliptical_00.png", "spiral_05.png"];

#[derive(Debug, Deserialize)]
pub struct ClassifyToolConfig {
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Classify the bundled sample set in addition to `inputs`.
    #[serde(default)]
    pub demo: bool,
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub quality: QualityThresholds,
    #[serde(default)]
    pub preprocess: PreprocessOptions,
    #[serde(default)]
    pub classifier: ClassifierOptions,
    #[serde(default)]
    pub output: ClassifyOutputConfig,
}

impl Default for ClassifyToolConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            demo: false,
            samples_dir: default_samples_dir(),
            orchestrator: OrchestratorConfig::default(),
            quality: QualityThresholds::default(),
            preprocess: PreprocessOptions::default(),
            classifier: ClassifierOptions::default(),
            output: ClassifyOutputConfig::default(),
        }
    }
}

impl ClassifyToolConfig {
    /// Explicit inputs followed by the demo samples when `demo` is set.
    pub fn resolve_inputs(&self) -> Vec<PathBuf> {
        let mut inputs = self.inputs.clone();
        if self.demo {
            inputs.extend(DEMO_SAMPLES.iter().map(|s| self.samples_dir.join(s)));
        }
        inputs
    }

    pub fn build_orchestrator(&self) -> Orchestrator {
        Orchestrator::with_collaborators(
            self.orchestrator.resolve(),
            IntensityQualityAnalyzer::new(self.quality),
            ContrastStretch::new(self.preprocess),
            MorphologyClassifier::new(self.classifier),
        )
    }
}

/// Optional overrides applied on top of [`OrchestratorParams::default`].
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub confidence_threshold: Option<f32>,
    pub max_iterations: Option<usize>,
    /// `[width, height]`; `[0, 0]` keeps the decoded size.
    pub working_size: Option<[usize; 2]>,
}

impl OrchestratorConfig {
    pub fn resolve(&self) -> OrchestratorParams {
        let mut params = OrchestratorParams::default();
        if let Some(v) = self.confidence_threshold {
            params.confidence_threshold = v;
        }
        if let Some(v) = self.max_iterations {
            params.max_iterations = v;
        }
        if let Some([w, h]) = self.working_size {
            params.working_size = (w > 0 && h > 0).then_some((w, h));
        }
        params
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ClassifyOutputConfig {
    /// Print the conversation transcript after each image.
    pub show_log: bool,
    /// Write all run results as a JSON array.
    pub json_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ClassifyToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Parse the command line of `classify_demo`.
///
/// Accepts either a single JSON config path, or flags:
/// `--image <path>` (repeatable), `--demo`, `--samples <dir>`, `--show-log`,
/// `--json <path>`.
pub fn parse_cli(program: &str) -> Result<ClassifyToolConfig, String> {
    parse_args(program, env::args().skip(1))
}

pub fn parse_args<I>(program: &str, args: I) -> Result<ClassifyToolConfig, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if let [single] = args.as_slice() {
        if !single.starts_with("--") {
            return load_config(Path::new(single));
        }
    }

    let mut config = ClassifyToolConfig::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--image" => {
                let path = it.next().ok_or_else(|| usage(program))?;
                config.inputs.push(PathBuf::from(path));
            }
            "--demo" => config.demo = true,
            "--samples" => {
                let dir = it.next().ok_or_else(|| usage(program))?;
                config.samples_dir = PathBuf::from(dir);
            }
            "--show-log" => config.output.show_log = true,
            "--json" => {
                let path = it.next().ok_or_else(|| usage(program))?;
                config.output.json_out = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(usage(program)),
            other => return Err(format!("Unknown argument '{other}'\n{}", usage(program))),
        }
    }

    if config.inputs.is_empty() && !config.demo {
        return Err(usage(program));
    }
    Ok(config)
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <config.json>\n       \
         {program} [--image <path>]... [--demo] [--samples <dir>] [--show-log] [--json <path>]"
    )
}

fn default_samples_dir() -> PathBuf {
    PathBuf::from("data/samples")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_build_config() {
        let cfg = parse_args(
            "classify_demo",
            args(&["--image", "a.png", "--show-log", "--json", "out.json"]),
        )
        .unwrap();
        assert_eq!(cfg.inputs, vec![PathBuf::from("a.png")]);
        assert!(cfg.output.show_log);
        assert_eq!(cfg.output.json_out, Some(PathBuf::from("out.json")));
        assert!(!cfg.demo);
    }

    #[test]
    fn demo_expands_sample_paths() {
        let cfg = parse_args("classify_demo", args(&["--demo", "--samples", "s"])).unwrap();
        let inputs = cfg.resolve_inputs();
        assert_eq!(inputs.len(), DEMO_SAMPLES.len());
        assert_eq!(inputs[0], PathBuf::from("s/spiral_00.png"));
    }

    #[test]
    fn empty_invocation_is_rejected() {
        assert!(parse_args("classify_demo", Vec::new()).is_err());
        assert!(parse_args("classify_demo", args(&["--bogus"])).is_err());
    }

    #[test]
    fn json_overrides_resolve_onto_defaults() {
        let cfg: ClassifyToolConfig = serde_json::from_str(
            r#"{
                "inputs": ["x.png"],
                "orchestrator": { "max_iterations": 5, "working_size": [0, 0] },
                "classifier": { "dark_penalty": 1.0 }
            }"#,
        )
        .unwrap();
        let params = cfg.orchestrator.resolve();
        assert_eq!(params.max_iterations, 5);
        assert_eq!(params.confidence_threshold, 0.75);
        assert_eq!(params.working_size, None);
        assert_eq!(cfg.classifier.dark_penalty, 1.0);
        assert_eq!(cfg.classifier.variance_split, 0.015);
        assert_eq!(cfg.samples_dir, PathBuf::from("data/samples"));
    }
}
