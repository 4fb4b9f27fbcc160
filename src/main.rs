use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use multispace::analytics::format_hms;
use multispace::config::{self, Config, ConfigError};
use multispace::dashboard::Dashboard;
use multispace::dock::{Dock, DockError, default_apps};
use multispace::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use multispace::project::{
    EntryKind, FileStorage, PostgrestTable, ProjectError, ProjectStore, StoreError, SwitchOutcome,
};
use multispace::runner::run_dashboard;
use multispace::timer::ProductivityTimer;
use multispace::tracing_sub;
use multispace::window::{Viewport, WindowManager, WindowMode};
use multispace::workspace::{Workspace, WorkspaceEvent};

/// Viewport used when windows are opened outside the dashboard.
const CLI_VIEWPORT: Viewport = Viewport::new(1920, 1080);

#[derive(Parser, Debug)]
#[command(
    name = "multispace",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating app windows, projects with notes and goals, and a focus timer"
)]
struct Cli {
    /// Config file (defaults to $MULTISPACE_CONFIG or ~/.config/multispace/config.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Sync projects to the remote table as this user.
    #[arg(long, value_name = "ID", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full-screen terminal dashboard (default).
    Dashboard,
    /// List projects.
    Projects,
    /// Switch to a project, creating it if it does not exist.
    Switch { id: String },
    /// Create a project and switch to it.
    New { name: Option<String> },
    /// Rename the current project.
    Rename { name: String },
    /// Manage notes of the current project.
    Note {
        #[command(subcommand)]
        op: EntryOp,
    },
    /// Manage goals of the current project.
    Goal {
        #[command(subcommand)]
        op: EntryOp,
    },
    /// List or customize dock apps.
    Apps {
        #[command(subcommand)]
        op: Option<AppOp>,
    },
    /// Open a dock app by name.
    Open { app: String },
    /// Close a window by id.
    Close { id: String },
    /// Point a window at a new address or search.
    Navigate { id: String, address: String },
    /// List the current project's windows.
    Windows,
    /// Tracked time and focus statistics.
    Stats,
    /// Write a backup file of every project.
    Export {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Replace all projects with a backup file.
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum EntryOp {
    Add { text: String },
    /// Replace the entry at a 1-based position.
    Edit { index: usize, text: String },
    /// Remove the entry at a 1-based position.
    Rm { index: usize },
    List,
}

#[derive(Subcommand, Debug)]
enum AppOp {
    List,
    /// Add a custom app to the end of the dock.
    Add { name: String, url: String },
    /// Move the app at a 1-based position to another.
    Move { from: usize, to: usize },
    /// Change the address of the app at a 1-based position.
    SetUrl { index: usize, url: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Dock(#[from] DockError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("no dock app named {0:?}")]
    UnknownApp(String),
    #[error("no window with id {0:?}")]
    UnknownWindow(String),
    #[error("positions start at 1")]
    ZeroIndex,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("multispace: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = config::config_path(cli.config)?;
    let config = Config::load(&config_path)?;
    let command = cli.command.unwrap_or(Command::Dashboard);
    tracing_sub::init(&config.logging, matches!(command, Command::Dashboard));
    tracing::debug!(config = ?config_path, "configuration loaded");

    let mut workspace = build_workspace(&config, cli.user.as_deref())?;
    match command {
        Command::Dashboard => {
            let mut dashboard = Dashboard::new(workspace, config.dashboard.cell_scale());
            let mut output = ConsoleOutputDriver::new()?;
            run_dashboard(
                &mut output,
                ConsoleInputDriver::new(),
                &mut dashboard,
                config.dashboard.tick(),
            )?;
            return Ok(());
        }
        Command::Projects => {
            let store = workspace.store();
            for project in store.projects() {
                let marker = if project.id == store.current_id() { '*' } else { ' ' };
                let seconds = if project.id == store.current_id() {
                    store.time_spent()
                } else {
                    project.total_productivity_time
                };
                println!(
                    "{marker} {:<16} {:<24} {:>12}  {} notes, {} goals",
                    project.id,
                    project.name,
                    format_hms(seconds),
                    project.notes.len(),
                    project.goals.len()
                );
            }
        }
        Command::Switch { id } => {
            let outcome = workspace.switch_project(&id);
            let name = &workspace.current_project().name;
            match outcome {
                SwitchOutcome::Unchanged => println!("Already on {name}"),
                SwitchOutcome::Switched => println!("Now working on {name}"),
                SwitchOutcome::Created => println!("Created {name} ({id})"),
            }
        }
        Command::New { name } => {
            let id = workspace.create_project(name.as_deref().unwrap_or_default());
            println!("Created {} ({id})", workspace.current_project().name);
        }
        Command::Rename { name } => {
            workspace.rename_project(&name)?;
            println!("Renamed to {}", workspace.current_project().name);
        }
        Command::Note { op } => entry_command(&mut workspace, EntryKind::Note, op)?,
        Command::Goal { op } => entry_command(&mut workspace, EntryKind::Goal, op)?,
        Command::Apps { op } => app_command(&mut workspace, op.unwrap_or(AppOp::List))?,
        Command::Open { app } => {
            let id = workspace
                .open_app_named(&app)
                .ok_or_else(|| CliError::UnknownApp(app.clone()))?;
            println!("{id}");
        }
        Command::Close { id } => {
            if !workspace.close_window(&id) {
                return Err(CliError::UnknownWindow(id));
            }
        }
        Command::Navigate { id, address } => {
            if !workspace.navigate(&id, &address) {
                return Err(CliError::UnknownWindow(id));
            }
            if let Some(window) = workspace.windows().get(&id) {
                println!("{}", window.url);
            }
        }
        Command::Windows => {
            for window in workspace.windows().draw_order() {
                let mode = match window.mode {
                    WindowMode::Normal => "",
                    WindowMode::Minimized => " (minimized)",
                    WindowMode::Fullscreen { .. } => " (fullscreen)",
                };
                let g = window.geometry;
                println!(
                    "{}  z={:<3} {}x{}+{}+{}  {}{mode}  {}",
                    window.id, window.z_index, g.width, g.height, g.x, g.y, window.title, window.url
                );
            }
        }
        Command::Stats => {
            let summary = workspace.focus_summary();
            println!("Project:      {}", workspace.current_project().name);
            println!("Time spent:   {}", format_hms(workspace.store().time_spent()));
            println!("Sessions:     {}", summary.sessions);
            println!("Focus total:  {} min", summary.total_minutes);
            println!("Today:        {} min", summary.today_minutes);
            println!("Last 7 days:  {} min", summary.week_minutes);
            println!("Streak:       {} days", summary.streak_days);
        }
        Command::Export { dir } => {
            let path = workspace.export_backup(&dir)?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let count = workspace.import_backup(&file)?;
            println!("Imported {count} projects");
        }
    }
    report_failures(&mut workspace);
    workspace.save()?;
    Ok(())
}

fn entry_command(workspace: &mut Workspace, kind: EntryKind, op: EntryOp) -> Result<(), CliError> {
    match op {
        EntryOp::Add { text } => {
            let index = workspace.add_entry(kind, &text)?;
            println!("{}. {}", index + 1, text.trim());
        }
        EntryOp::Edit { index, text } => {
            workspace.update_entry(kind, position(index)?, &text)?;
        }
        EntryOp::Rm { index } => {
            let removed = workspace.remove_entry(kind, position(index)?)?;
            println!("Removed {removed:?}");
        }
        EntryOp::List => {
            let project = workspace.current_project();
            for (i, text) in project.entries(kind).iter().enumerate() {
                println!("{}. {text}", i + 1);
            }
        }
    }
    Ok(())
}

fn app_command(workspace: &mut Workspace, op: AppOp) -> Result<(), CliError> {
    match op {
        AppOp::List => {
            for (i, app) in workspace.dock().apps().iter().enumerate() {
                println!("{:>2}. {} {:<14} {}", i + 1, app.icon, app.name, app.url);
            }
        }
        AppOp::Add { name, url } => {
            let app = workspace.add_app(&name, &url)?;
            println!("{:>2}. {} {}", workspace.dock().apps().len(), app.name, app.url);
        }
        AppOp::Move { from, to } => workspace.move_app(position(from)?, position(to)?)?,
        AppOp::SetUrl { index, url } => {
            let index = position(index)?;
            workspace.set_app_url(index, &url)?;
            if let Some(app) = workspace.dock().get(index) {
                println!("{} {}", app.name, app.url);
            }
        }
    }
    Ok(())
}

fn position(index: usize) -> Result<usize, CliError> {
    index.checked_sub(1).ok_or(CliError::ZeroIndex)
}

fn report_failures(workspace: &mut Workspace) {
    for event in workspace.take_events() {
        if let WorkspaceEvent::PersistFailed { reason } = event {
            eprintln!("multispace: save failed: {reason}");
        }
    }
}

fn build_workspace(config: &Config, user: Option<&str>) -> Result<Workspace, CliError> {
    let data_dir = config.data_dir()?;
    let store = ProjectStore::open(FileStorage::open(&data_dir)?);
    let mut apps = default_apps();
    apps.extend(config.dock.apps.iter().cloned());
    let timer = ProductivityTimer::new(config.timer.work_minutes, config.timer.break_minutes);
    // A dock saved by `apps add/move/set-url` takes precedence over this one.
    let mut workspace = Workspace::new(store, WindowManager::new(CLI_VIEWPORT), timer, Dock::new(apps))
        .with_autosave(config.storage.autosave_interval());

    if let Some(user) = user {
        match remote_table(config)? {
            Some(table) => workspace.sign_in(Box::new(table), user)?,
            None => tracing::warn!(user, "--user given but [remote] is not configured"),
        }
    }
    Ok(workspace)
}

fn remote_table(config: &Config) -> Result<Option<PostgrestTable>, CliError> {
    let remote = &config.remote;
    let (Some(url), Some(key)) = (remote.url.as_deref(), remote.api_key.as_deref()) else {
        return Ok(None);
    };
    tracing::debug!(url, "using remote project table");
    let mut table = PostgrestTable::new(url, key, remote.timeout())?;
    if let Some(token) = remote.access_token.as_deref() {
        table = table.with_access_token(token);
    }
    Ok(Some(table))
}
