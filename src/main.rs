use galaxy_pipeline::conversation::render_transcript;
use galaxy_pipeline::dataset::{spiral_galaxy, DEFAULT_SIZE};
use galaxy_pipeline::{ConversationLog, Orchestrator, OrchestratorParams};

fn main() {
    // Demo stub: classifies an in-memory synthetic spiral and prints the log
    env_logger::init();
    let image = spiral_galaxy(DEFAULT_SIZE, 0).to_f32();

    let orchestrator = Orchestrator::new(OrchestratorParams::default());
    let mut log = ConversationLog::new();
    match orchestrator.run_image(image, &mut log) {
        Ok(res) => {
            println!(
                "label={} confidence={:.2} preprocessed={} iterations={}",
                res.label, res.confidence, res.preprocessed, res.iterations
            );
            println!("{}", render_transcript(&res.log));
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
