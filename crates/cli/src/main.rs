use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use swatchbook_engine::{
    LiveStateSource, LoadFlow, LoadFlowState, Notifier, OpenedFlow, PaletteCommand, PaletteController, SaveFlow, SaveFlowState,
    SceneFileSource, ToolOverride, run_command,
};
use swatchbook_types::ToolType;
use swatchbook_util::{JsonPaletteStore, resolve_palettes_path, resolve_scene_path};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Save and re-apply named drawing styles per tool.
#[derive(Parser, Debug)]
#[command(name = "swatchbook", version, about)]
struct Args {
    /// Palette store file (defaults to SWATCHBOOK_PALETTES_PATH, then the config dir)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Excalidraw scene whose app state is read and updated (or SWATCHBOOK_SCENE)
    #[arg(long, global = true)]
    scene: Option<String>,

    /// Treat this tool as active instead of the scene's own selection
    #[arg(long, global = true)]
    tool: Option<ToolType>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the current style of the active tool
    Save {
        /// Palette name; prompts on stdin when omitted
        name: Option<String>,
    },
    /// List, apply or remove styles of the active tool
    Load {
        /// Apply the named style to the scene
        #[arg(long, conflicts_with = "remove")]
        apply: Option<String>,

        /// Remove the named style from the store
        #[arg(long)]
        remove: Option<String>,
    },
    /// Print the available palette commands
    Commands,
}

/// Prints notices on stderr, keeping stdout for results.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notice(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if let Command::Commands = args.command {
        for command in PaletteCommand::ALL {
            println!("{}\t{}", command.id(), command.title());
        }
        return Ok(());
    }

    let controller = build_controller(&args)?;
    match args.command {
        Command::Save { name } => run_save(&controller, name),
        Command::Load { apply, remove } => run_load(&controller, apply, remove),
        Command::Commands => Ok(()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_controller(args: &Args) -> Result<PaletteController> {
    let store_path = resolve_palettes_path(args.store.as_deref());
    let store = JsonPaletteStore::load(store_path.clone())
        .with_context(|| format!("failed to load palettes from {}", store_path.display()))?;

    let scene_path: PathBuf = resolve_scene_path(args.scene.as_deref())
        .context("no scene file given; pass --scene or set SWATCHBOOK_SCENE")?;
    debug!(store = %store_path.display(), scene = %scene_path.display(), "Resolved paths");

    let scene = SceneFileSource::new(scene_path);
    let live_state: Arc<dyn LiveStateSource> = match args.tool {
        Some(tool) => Arc::new(ToolOverride::new(scene, tool)),
        None => Arc::new(scene),
    };
    Ok(PaletteController::new(Arc::new(store), live_state))
}

fn open(command: PaletteCommand, controller: &PaletteController) -> Result<Option<OpenedFlow>> {
    run_command(command, controller, &StderrNotifier).with_context(|| format!("failed to run {}", command.id()))
}

fn run_save(controller: &PaletteController, name: Option<String>) -> Result<()> {
    let Some(OpenedFlow::Save(mut flow)) = open(PaletteCommand::SaveStyle, controller)? else {
        return Ok(());
    };

    match name {
        Some(name) => {
            flow.submit(&name).context("failed to save style")?;
        }
        None => prompt_for_name(&mut flow)?,
    }

    match flow.state() {
        SaveFlowState::Saved { name } => println!("Saved style '{name}' for {} tool", flow.tool()),
        SaveFlowState::AwaitingName => bail!("style name must not be blank"),
        SaveFlowState::Cancelled => eprintln!("Cancelled"),
    }
    Ok(())
}

fn prompt_for_name(flow: &mut SaveFlow) -> Result<()> {
    let existing = flow.suggestions("");
    if !existing.is_empty() {
        eprintln!("Existing styles: {}", existing.join(", "));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while flow.is_open() {
        eprint!("{}: ", flow.placeholder());
        io::stderr().flush()?;
        match lines.next() {
            Some(line) => {
                flow.submit(&line?).context("failed to save style")?;
            }
            None => flow.cancel(),
        }
    }
    Ok(())
}

fn run_load(controller: &PaletteController, apply: Option<String>, remove: Option<String>) -> Result<()> {
    let Some(OpenedFlow::Load(mut flow)) = open(PaletteCommand::LoadStyle, controller)? else {
        return Ok(());
    };

    if let Some(name) = remove {
        ensure_listed(&flow, &name)?;
        flow.remove(&name).context("failed to remove style")?;
        println!("Removed style '{name}' from {} tool", flow.tool());
        return Ok(());
    }

    if let Some(name) = apply {
        ensure_listed(&flow, &name)?;
        flow.apply(&name).context("failed to apply style")?;
        if let LoadFlowState::Applied { name } = flow.state() {
            println!("Applied style '{name}' to {} tool", flow.tool());
        }
        return Ok(());
    }

    println!("{}", flow.heading());
    for item in flow.items() {
        println!("  {item}");
    }
    Ok(())
}

fn ensure_listed(flow: &LoadFlow, name: &str) -> Result<()> {
    if flow.items().iter().any(|item| item == name) {
        Ok(())
    } else {
        bail!("no style named '{name}' for {} tool", flow.tool())
    }
}
