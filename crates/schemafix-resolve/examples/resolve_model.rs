use std::env;
use std::path::{Path, PathBuf};

use schemafix_core::{Model, build_relation_graph_report};
use schemafix_resolve::{ResolverSettings, StandardResolver, load_settings, resolve_checked};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut model_path: Option<PathBuf> = None;
    let mut settings_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                settings_path = args.next().map(PathBuf::from);
            }
            _ => {
                if model_path.is_none() {
                    model_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let model_path = model_path.ok_or("missing model path")?;
    let settings = match settings_path {
        Some(path) => load_settings(&path)?,
        None => ResolverSettings::default(),
    };

    let mut model = load_model(&model_path)?;
    let resolver = StandardResolver::new(settings);
    let report = resolve_checked(&resolver, &mut model)?;
    let graph = build_relation_graph_report(&model);

    let output = json!({
        "model": model,
        "report": report,
        "relation_graph": graph,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn load_model(path: &Path) -> Result<Model, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let model = serde_json::from_str(&contents)?;
    Ok(model)
}
