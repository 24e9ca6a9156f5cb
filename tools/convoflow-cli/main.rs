use clap::{Parser, Subcommand, ValueEnum};
use convoflow::prelude::*;
use convoflow::{schema, tools};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Validate conversation flows and run the flow tools against a directory of flow files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding `<flow id>.json` files; overrides `store.dir`
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Check ids and id-based links as well as shapes
    #[arg(long, global = true)]
    reference_checks: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a JSON document and print its normalized form
    Validate {
        path: PathBuf,
        /// What the document is
        #[arg(short, long, value_enum, default_value = "flow")]
        kind: DocumentKind,
        /// Treat `null` in optional fields as absent
        #[arg(long)]
        lenient: bool,
    },
    /// Print a stored flow
    Get {
        flow_id: String,
        #[arg(short, long)]
        version: Option<u32>,
    },
    /// Apply a partial update read from a JSON file
    Update {
        flow_id: String,
        body: PathBuf,
        #[arg(short, long)]
        version: Option<u32>,
    },
    /// Create a flow from a JSON file
    Create { body: PathBuf },
    /// Print the tool descriptors with their input schemas
    Tools,
    /// Print the JSON Schema of a flow or node document
    Schema {
        #[arg(value_enum, default_value = "flow")]
        kind: SchemaKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaKind {
    Flow,
    Node,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DocumentKind {
    Flow,
    Settings,
    Draft,
    Node,
    Tool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load settings: {}", e)));
    init_tracing(&settings);

    let validator = Validator::builder()
        .with_reference_checks(cli.reference_checks || settings.validation.reference_checks)
        .build();
    let store = cli.store.clone().unwrap_or_else(|| settings.store.dir.clone());

    match cli.command {
        Command::Validate { path, kind, lenient } => {
            let document = read_json(&path);
            let validator = if lenient {
                validator.with_null_policy(NullPolicy::TreatAsAbsent)
            } else {
                validator
            };
            run_validate(&validator, kind, &document);
        }
        Command::Tools => print_json(&tools::descriptors()),
        Command::Schema { kind } => match kind {
            SchemaKind::Flow => print_json(&schema::flow_json_schema()),
            SchemaKind::Node => print_json(&schema::node_json_schema()),
        },
        command => {
            let flow_tools = FlowTools::new(FilePlatform::new(store)).with_validator(validator);
            run_tool(&flow_tools, command).await;
        }
    }
}

fn run_validate(validator: &Validator, kind: DocumentKind, document: &Value) {
    let result = match kind {
        DocumentKind::Flow => validator.validate_flow(document).map(|v| to_json(&v)),
        DocumentKind::Settings => validator.validate_settings(document).map(|v| to_json(&v)),
        DocumentKind::Draft => validator.validate_draft(document).map(|v| to_json(&v)),
        DocumentKind::Node => validator.validate_node(document).map(|v| to_json(&v)),
        DocumentKind::Tool => validator.validate_tool(document).map(|v| to_json(&v)),
    };
    match result {
        Ok(normalized) => print_json(&normalized),
        Err(err) => {
            for violation in err.violations() {
                eprintln!("  {}", violation);
            }
            exit_with_error(&format!(
                "Document is invalid ({} violations)",
                err.violations().len()
            ));
        }
    }
}

async fn run_tool(flow_tools: &FlowTools<FilePlatform>, command: Command) {
    let result = match command {
        Command::Get { flow_id, version } => {
            let mut input = GetConversationFlowInput::new(flow_id);
            if let Some(v) = version {
                input = input.at_version(v);
            }
            flow_tools.get_conversation_flow(input).await
        }
        Command::Update {
            flow_id,
            body,
            version,
        } => {
            let changes = flow_tools
                .validator()
                .validate_settings(&read_json(&body))
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid update body: {}", e)));
            let mut input = UpdateConversationFlowInput::new(flow_id, changes);
            input.version = version.map(Into::into);
            flow_tools.update_conversation_flow(input).await
        }
        Command::Create { body } => {
            let draft = flow_tools
                .validator()
                .validate_draft(&read_json(&body))
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid flow body: {}", e)));
            flow_tools.create_conversation_flow(draft).await
        }
        Command::Validate { .. } | Command::Tools | Command::Schema { .. } => return,
    };

    match result {
        Ok(flow) => print_json(&flow),
        Err(e) => exit_with_error(&e.to_string()),
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.logging.level.clone().into());

    let fmt_layer = if settings.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn read_json(path: &PathBuf) -> Value {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to parse '{}': {}", path.display(), e))
    })
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode output: {}", e)))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => exit_with_error(&format!("Failed to encode output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
