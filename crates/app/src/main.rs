use std::sync::Arc;

use log::info;
use services::QuizService;
use storage::{JsonDirSource, ModuleSource};

mod args;
mod render;
mod terminal;

use args::{Args, Command, EnvDefaults, print_usage};

async fn list_modules(service: &QuizService) -> Result<(), Box<dyn std::error::Error>> {
    let modules = service.modules().await?;
    if modules.is_empty() {
        println!("no modules found");
        return Ok(());
    }

    for module_id in modules {
        match service.bank(module_id).await {
            Ok(bank) => println!(
                "{:>3}  {}  ({} questions, {} per run)",
                module_id.value(),
                bank.title().unwrap_or("untitled"),
                bank.len(),
                bank.required_count()
            ),
            Err(err) => println!("{:>3}  unusable: {err}", module_id.value()),
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), EnvDefaults::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(parsed) = parsed else {
        return Ok(());
    };

    // Loading stays in the binary glue; the service only sees a `ModuleSource`.
    let source = JsonDirSource::new(&parsed.data_dir).with_file_name(parsed.file_name.clone());
    info!("reading modules from {}", source.root().display());
    let source: Arc<dyn ModuleSource> = Arc::new(source);
    let service = QuizService::new(source);

    match parsed.command {
        Command::List => list_modules(&service).await,
        Command::Play => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            terminal::run_quiz(
                &service,
                parsed.module,
                parsed.pass_mark,
                &mut stdin.lock(),
                &mut stdout.lock(),
            )
            .await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
