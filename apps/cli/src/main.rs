use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use zunder_models::walk::{type_metadata, visit};
use zunder_models::{
    schema, schemas, CodeableConcept, CodedEnum, Coding, EnumParsing, Identifier, InventoryItem,
    InventoryItemName, InventoryItemStatus, ModelConfig, Quantity, Schema,
};

#[derive(Parser)]
#[command(
    name = "zunder",
    about = "Inspect the zunder FHIR model schemas",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print cardinality metadata for every known type as JSON.
    Metadata {
        /// Output file path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON output.
        #[arg(short, long, action = ArgAction::SetTrue)]
        pretty: bool,
    },

    /// Print the field table of one type (e.g. InventoryItem, InventoryItem.name).
    Schema {
        /// Type name.
        type_name: String,
    },

    /// Parse an InventoryItem status code.
    Status {
        /// Wire code (active, inactive, entered-in-error, unknown).
        code: String,
        /// Map unknown codes to the null value instead of failing.
        #[arg(long, action = ArgAction::SetTrue)]
        lenient: bool,
    },

    /// Build a sample InventoryItem and print every value with its path.
    Demo,

    /// Print version.
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Metadata { output, pretty } => {
            run_metadata(output.as_deref(), pretty)?;
        }
        Commands::Schema { type_name } => {
            let schema = schema(&type_name).ok_or_else(|| anyhow!("Unknown type '{type_name}'"))?;
            print_schema(schema);
        }
        Commands::Status { code, lenient } => {
            run_status(&code, lenient)?;
        }
        Commands::Demo => {
            run_demo()?;
        }
    }

    Ok(())
}

fn run_metadata(output: Option<&Path>, pretty: bool) -> Result<()> {
    tracing::debug!(types = schemas().len(), "building type metadata");
    let metadata = type_metadata(schemas());
    let json = if pretty {
        serde_json::to_string_pretty(&metadata)?
    } else {
        serde_json::to_string(&metadata)?
    };
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote metadata for {} types to {}", schemas().len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_schema(schema: &Schema) {
    println!("{} ({:?})", schema.type_name, schema.kind);
    if let Some(url) = schema.url {
        println!("  url: {url}");
    }
    let lineage = schema.lineage();
    if lineage.len() > 1 {
        println!("  lineage: {}", lineage.join(" -> "));
    }
    for field in schema.all_fields() {
        let types = if field.types.is_empty() {
            "BackboneElement".to_string()
        } else {
            field.types.join("|")
        };
        let mut flags = String::new();
        if field.summary {
            flags.push('Σ');
        }
        if field.modifier {
            flags.push_str("?!");
        }
        print!(
            "  {:<16} {:<5} {:<16} {:<3} key={}",
            field.name,
            field.cardinality(),
            types,
            flags,
            field.key
        );
        if let Some(binding) = field.binding {
            print!(" ({:?}: {})", binding.strength, binding.value_set);
        }
        println!();
    }
}

fn run_status(code: &str, lenient: bool) -> Result<()> {
    let config = ModelConfig::builder()
        .enums(if lenient {
            EnumParsing::Lenient
        } else {
            EnumParsing::Strict
        })
        .build();
    tracing::debug!(code, lenient, "parsing status code");
    match InventoryItemStatus::parse(Some(code), &config)? {
        Some(status) => {
            println!("code:       {}", status.code());
            println!("system:     {}", status.system());
            println!("display:    {}", status.display());
            println!("definition: {}", status.definition());
        }
        None => println!("null"),
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    let config = ModelConfig::default();
    let mut item = InventoryItem::with_status(InventoryItemStatus::Active);
    item.set_id("demo")
        .push_identifier(Identifier::new("http://example.org/sku", "SKU-0042"))
        .push_code(CodeableConcept::from_coding(Coding::new(
            "http://snomed.info/sct",
            "385055001",
            "Tablet",
        )))
        .push_name(InventoryItemName::new(
            Coding::new(
                "http://hl7.org/fhir/inventoryitem-nametype",
                "brand-name",
                "Brand name",
            ),
            "Acme Tabs 500",
        ))
        .set_net_content(Quantity::ucum(Decimal::new(500, 0), "mg"))
        .set_description_text("Film-coated tablets");
    if let Some(name) = item.name_first_rep().name_type_mut(&config)? {
        name.set_user_selected(true);
    }

    visit(&item, &mut |path, value| match value.primitive_value() {
        Some(text) => println!("{path} = {text}"),
        None => println!("{path} ({})", value.fhir_type()),
    });
    Ok(())
}
