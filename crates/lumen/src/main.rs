use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use lumen_core::descriptor::{Guid, ModuleVersion};
use lumen_core::host::{HostConfig, PluginHost};

/// Host version advertised to modules. Bump the major only on breaking
/// interface changes; older-major modules keep loading.
const HOST_VERSION: ModuleVersion = ModuleVersion::new(1, 0, 0);

/// Lumen: command-line host for imaging modules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Path to a host configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra directory to scan for module binaries
    #[arg(long)]
    modules_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect loaded modules
    Module {
        #[command(subcommand)]
        command: ModuleCommand,
    },
    /// Inspect registered plugins
    Plugin {
        #[command(subcommand)]
        command: PluginCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ModuleCommand {
    /// List loaded modules
    List,
}

#[derive(Subcommand, Debug)]
enum PluginCommand {
    /// List registered plugins
    List {
        /// Emit machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one plugin in full, including its property template
    Info {
        /// Plugin id, e.g. {4C554D45-4E000002-8F3A2B1C-5D6E7F81}
        guid: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => match HostConfig::from_toml_file(path).await {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => HostConfig::default(),
    };
    if let Some(dir) = args.modules_dir {
        config.module_dirs.push(dir);
    }

    let mut host = PluginHost::new(HOST_VERSION, config);

    // Built-in effects are always available, discovery or not.
    if let Err(e) = host.register_static(core_effects::static_module()) {
        eprintln!("Failed to register built-in effects module: {}", e);
        return ExitCode::FAILURE;
    }

    let loaded = host.load_all().await;
    info!("Discovery finished, {} module(s) loaded from disk", loaded);

    let status = run_command(&host, args.command);

    if let Err(e) = host.shutdown() {
        error!("Shutdown reported errors: {}", e);
    }
    status
}

fn run_command(host: &PluginHost, command: Commands) -> ExitCode {
    match command {
        Commands::Module {
            command: ModuleCommand::List,
        } => {
            for registry in host.modules() {
                let descriptor = registry.descriptor();
                println!(
                    "{}  {}  v{}  ({} plugin(s))",
                    descriptor.id,
                    descriptor.key,
                    descriptor.version,
                    registry.plugin_count()
                );
            }
            ExitCode::SUCCESS
        }
        Commands::Plugin {
            command: PluginCommand::List { json },
        } => {
            if json {
                let plugins: Vec<_> = host.plugins().collect();
                match serde_json::to_string_pretty(&plugins) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Failed to serialize plugin list: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for descriptor in host.plugins() {
                    println!(
                        "{}  {}  {:?}  {}",
                        descriptor.id, descriptor.key, descriptor.capability, descriptor.summary
                    );
                }
            }
            ExitCode::SUCCESS
        }
        Commands::Plugin {
            command: PluginCommand::Info { guid },
        } => {
            let id: Guid = match guid.parse() {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("Invalid plugin id '{}': {}", guid, e);
                    return ExitCode::FAILURE;
                }
            };
            let Some(descriptor) = host.plugin_descriptor(id) else {
                eprintln!("No plugin with id {}", id);
                return ExitCode::FAILURE;
            };

            println!("Id:         {}", descriptor.id);
            println!("Key:        {}", descriptor.key);
            println!("Name:       {}", descriptor.short_name);
            println!("Capability: {:?}", descriptor.capability);
            println!("Version:    {}", descriptor.version);
            if !descriptor.summary.is_empty() {
                println!("Summary:    {}", descriptor.summary);
            }
            if !descriptor.description.is_empty() {
                println!("Description:\n{}", descriptor.description);
            }
            if descriptor.properties.is_empty() {
                println!("Properties: none");
            } else {
                println!("Properties:");
                for (index, property) in descriptor.properties.iter().enumerate() {
                    let mut flags = Vec::new();
                    if property.read_only {
                        flags.push("read-only");
                    }
                    if property.dynamic {
                        flags.push("dynamic");
                    }
                    let flags = if flags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", flags.join(", "))
                    };
                    println!(
                        "  {:>3}  {}  {:?}  default {:?}{}",
                        index, property.key, property.kind, property.default, flags
                    );
                }
            }
            ExitCode::SUCCESS
        }
    }
}
