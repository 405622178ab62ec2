use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swagir_core::config::{self, CONFIG_FILE_NAME, EnumMemberStyle, SwagirConfig};
use swagir_core::ir::{Definition, Definitions, Property, ResponseBody, Spec};
use swagir_core::parse::{self, spec::SwaggerDocument};
use swagir_core::transform::{self, TransformOptions};

#[derive(Parser)]
#[command(name = "swagir", about = "Swagger 2.0 to typed IR", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a Swagger document and build its IR
    Validate {
        /// Path to the Swagger document (JSON or YAML)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print a summary of the IR built from a Swagger document
    Inspect {
        /// Path to the Swagger document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Only keep services for these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Keep definitions no operation references
        #[arg(long)]
        include_unused: bool,

        /// How string enum members are named
        #[arg(long)]
        enum_members: Option<EnumMembersArg>,
    },

    /// Initialize a new swagir configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum EnumMembersArg {
    Verbatim,
    #[value(name = "class_name")]
    ClassName,
}

impl From<EnumMembersArg> for EnumMemberStyle {
    fn from(arg: EnumMembersArg) -> Self {
        match arg {
            EnumMembersArg::Verbatim => EnumMemberStyle::Verbatim,
            EnumMembersArg::ClassName => EnumMemberStyle::ClassName,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect {
            input,
            format,
            tags,
            include_unused,
            enum_members,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if !tags.is_empty() {
                cfg.tags = tags;
            }
            cfg.include_unused |= include_unused;
            if let Some(style) = enum_members {
                cfg.enum_members = style.into();
            }
            cmd_inspect(input, &cfg, format)
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagir", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwagirConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn read_document(path: &Path) -> Result<SwaggerDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let doc = match ext {
        "yaml" | "yml" => parse::from_yaml(&content),
        _ => parse::from_json(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(doc)
}

fn load_spec(path: &Path, cfg: &SwagirConfig) -> Result<Spec> {
    let doc = read_document(path)?;
    build_spec(&doc, path, cfg)
}

/// Build the IR for an already parsed document. `path` is only used in
/// messages.
fn build_spec(doc: &SwaggerDocument, path: &Path, cfg: &SwagirConfig) -> Result<Spec> {
    let options = TransformOptions {
        tags: cfg.tags.clone(),
        include_unused: cfg.include_unused,
    };

    let spec = transform::transform_with_options(doc, &options)
        .with_context(|| format!("failed to build IR for {}", path.display()))?;
    log::debug!(
        "{}: {} definitions, {} services",
        path.display(),
        spec.definitions.len(),
        spec.services.len()
    );
    Ok(spec)
}

fn cmd_validate(input: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));

    let doc = read_document(&input)?;
    let title = doc.info.as_ref().map(|i| i.title.as_str()).unwrap_or("");
    eprintln!("Valid Swagger 2.0 document: {title}");
    eprintln!("  Paths: {}", doc.paths.len());
    eprintln!("  Definitions: {}", doc.definitions.len());

    // Also validate that it transforms to IR successfully
    let spec = build_spec(&doc, &input, &cfg)?;
    let operations: usize = spec.services.iter().map(|s| s.operations.len()).sum();
    eprintln!("  Services: {}", spec.services.len());
    eprintln!("  Operations: {operations}");
    eprintln!("  IR Definitions: {}", spec.definitions.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: Option<PathBuf>, cfg: &SwagirConfig, format: InspectFormat) -> Result<()> {
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec = load_spec(&input, cfg)?;

    let summary = build_inspect_summary(&spec, cfg.enum_members);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn property_summary(definitions: &Definitions, prop: &Property) -> serde_json::Value {
    serde_json::json!({
        "name": prop.name(),
        "type": prop.type_name(definitions),
    })
}

fn definition_summary(
    definitions: &Definitions,
    def: &Definition,
    style: EnumMemberStyle,
) -> serde_json::Value {
    let mut summary = serde_json::json!({
        "name": def.name(),
        "type": def.type_name(),
        "kind": def.kind(),
    });

    let type_of = |id| {
        definitions
            .get(id)
            .map(|d| d.type_name())
            .unwrap_or_default()
    };

    let extra = match def {
        Definition::Object(obj) => {
            let properties: Vec<_> = obj
                .properties(definitions)
                .into_iter()
                .map(|p| property_summary(definitions, p))
                .collect();
            serde_json::json!({
                "properties": properties,
                "discriminator": obj.discriminator(),
                "composes": obj.composes().map(type_of),
                "inherits": obj.inherits().map(type_of),
                "children": obj.children().iter().map(|id| type_of(*id)).collect::<Vec<_>>(),
            })
        }
        Definition::StringEnum(e) => serde_json::json!({
            "values": e.values,
            "members": e.member_names(style),
        }),
        Definition::NumberEnum(e) => serde_json::json!({
            "values": e.values,
            "members": e.member_names(),
        }),
        Definition::Reference(r) => serde_json::json!({
            "target": definitions.resolve(r.target).map(|d| d.type_name()),
        }),
    };

    if let (Some(summary), serde_json::Value::Object(extra)) = (summary.as_object_mut(), extra) {
        summary.extend(extra);
    }
    summary
}

fn response_type(definitions: &Definitions, body: &ResponseBody) -> String {
    match body {
        ResponseBody::Definition(id) => definitions
            .resolve(*id)
            .map(|d| d.type_name())
            .unwrap_or_else(|| definitions.reference(*id).to_string()),
        ResponseBody::File => "file".to_string(),
        ResponseBody::Number => "number".to_string(),
        ResponseBody::Array(array) => format!("{}[]", array.items.type_name(definitions)),
        ResponseBody::Empty => "empty".to_string(),
    }
}

fn build_inspect_summary(spec: &Spec, style: EnumMemberStyle) -> serde_json::Value {
    let definitions: Vec<serde_json::Value> = spec
        .definitions
        .iter()
        .map(|(_, def)| definition_summary(&spec.definitions, def, style))
        .collect();

    let services: Vec<serde_json::Value> = spec
        .services
        .iter()
        .map(|service| {
            let operations: Vec<serde_json::Value> = service
                .operations
                .iter()
                .map(|op| {
                    let parameters: Vec<_> = op
                        .parameters
                        .iter()
                        .map(|p| {
                            serde_json::json!({
                                "name": p.name,
                                "in": p.location.as_str(),
                                "required": p.required,
                                "type": p.schema.type_name(&spec.definitions),
                            })
                        })
                        .collect();
                    let responses: serde_json::Map<String, serde_json::Value> = op
                        .responses
                        .iter()
                        .map(|(code, r)| {
                            (
                                code.clone(),
                                response_type(&spec.definitions, &r.body).into(),
                            )
                        })
                        .collect();
                    serde_json::json!({
                        "name": op.name.camel_case,
                        "method": op.method.as_str(),
                        "route": op.route,
                        "security": op.security,
                        "parameters": parameters,
                        "responses": responses,
                    })
                })
                .collect();
            serde_json::json!({
                "name": service.name.pascal_case,
                "operations": operations,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": spec.info.title,
            "version": spec.info.version,
        },
        "security": spec.security.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "definitions": definitions,
        "services": services,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
