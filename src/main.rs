use anyhow::Result;
use trans_tree::config::Config;
use trans_tree::i18n::{TemplateValidator, TranslationStore};
use trans_tree::trans::{ContentNode, Element, LogReporter, RenderNode, Trans};
use tracing::{info, warn};

const ALERT_KEY: &str = "userMessagesUnread";

/// Resources used when `TRANS_RESOURCES` is not set.
const DEMO_RESOURCES: &str = r#"{
    "en": {
        "userMessagesUnread": "Hello <1>{{name}}</1>, you have {{count}} unread message. <5>Go to messages.</5>"
    },
    "es": {
        "userMessagesUnread": "Hola <1>{{name}}</1>, tienes {{count}} mensajes sin leer. <5>Ir a mensajes.</5>"
    }
}"#;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trans_tree=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting with language '{}'", config.language);

    let mut store = match config.load_store()? {
        Some(store) => store,
        None => {
            info!("TRANS_RESOURCES not set, using built-in demo resources");
            let mut store = TranslationStore::from_json(DEMO_RESOURCES)?;
            store.set_language(config.language.as_str());
            store
        }
    };

    let children = alert_children();
    let trans = Trans::new(ALERT_KEY)
        .keep_set(config.keep_set())
        .fallback_to_source();

    let canonical = trans.canonicalize(&children, &mut LogReporter);
    println!("Source template: {}", canonical.template);
    println!(
        "Interpolations:  {}",
        serde_json::to_string(&canonical.table)?
    );

    let languages: Vec<String> = store.languages().into_iter().map(String::from).collect();
    for language in languages {
        store.set_language(language.as_str());

        if let Some(translated) = store.get(ALERT_KEY) {
            let report = TemplateValidator::validate(&canonical.template, translated);
            for warning in &report.warnings {
                warn!("[{}] {}", language, warning);
            }
            for error in &report.errors {
                warn!("[{}] {}", language, error);
            }
        }

        let nodes = trans.render(&store, &children, &mut LogReporter);
        println!("[{}] {}", language, to_markup(&nodes));
    }

    info!(
        "Lookup metrics: {}",
        serde_json::to_string(&store.metrics().report())?
    );
    Ok(())
}

/// `Hello <strong>{name}</strong>, you have {count} unread message. <Link to="/msgs">Go to messages.</Link>`
fn alert_children() -> Vec<ContentNode> {
    vec![
        ContentNode::text("Hello "),
        Element::new("strong")
            .with_child(ContentNode::var("name", "Henry"))
            .into(),
        ContentNode::text(", you have "),
        ContentNode::var("count", 21),
        ContentNode::text(" unread message. "),
        Element::new("Link")
            .with_attr("to", "/msgs")
            .with_child("Go to messages.")
            .into(),
    ]
}

fn to_markup(nodes: &[RenderNode]) -> String {
    nodes.iter().map(ToString::to_string).collect()
}
