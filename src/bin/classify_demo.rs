use galaxy_pipeline::config::classify::{self, ClassifyToolConfig};
use galaxy_pipeline::conversation::render_transcript;
use galaxy_pipeline::image::io::write_json_file;
use galaxy_pipeline::{ConversationLog, PipelineError, RunResult};
use std::env;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "classify_demo".to_string());
    let config = classify::parse_cli(&program)?;
    let orchestrator = config.build_orchestrator();
    orchestrator
        .params()
        .validate()
        .map_err(|e| e.to_string())?;

    let mut log = ConversationLog::new();
    let mut results = Vec::new();

    for path in config.resolve_inputs() {
        if !path.exists() {
            eprintln!("Warning: image not found: {}", path.display());
            continue;
        }
        println!("\nClassifying {}", path.display());
        println!("{}", "=".repeat(60));

        match orchestrator.run(&path, &mut log) {
            Ok(result) => {
                print_text_summary(&result);
                if config.output.show_log {
                    println!("{}", render_transcript(&result.log));
                }
                results.push(result);
            }
            Err(err @ PipelineError::Load { .. }) => eprintln!("Skipping: {err}"),
            Err(err) => return Err(err.to_string()),
        }
        // Independent images get independent transcripts.
        log.clear();
    }

    write_results(&config, &results)
}

fn print_text_summary(result: &RunResult) {
    let trace = &result.trace;
    let q = &trace.initial_quality;
    println!(
        "  quality: {} (brightness={:.2}, contrast={:.2}) issues: {}",
        q.quality,
        q.brightness,
        q.contrast,
        q.issues_summary()
    );
    if let Some(pre) = &trace.preprocess {
        println!(
            "  preprocessed: brightness {:.2} -> {:.2}, contrast {:.2} -> {:.2}",
            pre.before.brightness, pre.after.brightness, pre.before.contrast, pre.after.contrast
        );
    }
    for pass in &trace.retries {
        println!(
            "  retry {}: confidence {:.2} -> {:.2}",
            pass.pass, pass.trigger_confidence, pass.confidence_after
        );
    }
    println!(
        "  result: {} confidence={:.2} iterations={} total_ms={:.3}",
        result.label, result.confidence, result.iterations, trace.timings.total_ms
    );
    if let Some(final_msg) = result.log.last() {
        println!("\n{}", final_msg.text);
    }
}

fn write_results(config: &ClassifyToolConfig, results: &[RunResult]) -> Result<(), String> {
    if let Some(path) = &config.output.json_out {
        write_json_file(path, &results)?;
        println!("\nJSON results written to {}", path.display());
    }
    Ok(())
}
