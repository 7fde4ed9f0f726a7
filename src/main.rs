use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use taskly::core::actions::{ActionResult, MutationActions};
use taskly::core::db::{
    BoundProjectRepository, BriefingRepository, ClientRepository, CommentRepository, NewBriefing,
    NewClient, NewComment, NewProject, NewTask, PageRequest, ProjectRepository, TaskRepository,
    TaskStatus, WorkspaceDb, WorkspaceRepository,
};
use taskly::core::selection::{
    CommentContentPatch, CommentSelection, TaskDetailsPatch, TaskSelection,
};

#[derive(Parser)]
#[command(name = "taskly")]
#[command(about = "Manage clients, projects and tasks stored in a workspace file")]
struct Cli {
    /// Workspace file (created if it does not exist)
    #[arg(short, long, global = true, env = "TASKLY_WORKSPACE", value_name = "FILE")]
    workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show workspace name and record counts
    Info,
    #[command(subcommand)]
    Client(ClientCommand),
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Comment(CommentCommand),
    #[command(subcommand)]
    Briefing(BriefingCommand),
    /// Open the desktop interface
    #[cfg(feature = "gui")]
    Gui,
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = PageRequest::DEFAULT_PER_PAGE)]
    per_page: u32,
}

impl From<&PageArgs> for PageRequest {
    fn from(args: &PageArgs) -> Self {
        PageRequest::new(args.page, args.per_page)
    }
}

#[derive(Subcommand)]
enum ClientCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
    List(PageArgs),
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ProjectCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        client: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    List(PageArgs),
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        #[arg(long)]
        project: i64,
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
    },
    Status {
        id: i64,
        #[arg(value_enum)]
        status: TaskStatus,
        #[arg(long)]
        project: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        project: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        project: i64,
    },
}

#[derive(Subcommand)]
enum CommentCommand {
    Add {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        user: i64,
        #[arg(long)]
        content: String,
    },
    List {
        #[arg(long)]
        project: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        project: i64,
        #[arg(long)]
        content: String,
    },
    Delete {
        id: i64,
        #[arg(long)]
        project: i64,
    },
}

#[derive(Subcommand)]
enum BriefingCommand {
    Add {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    List {
        #[arg(long)]
        project: i64,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "taskly=debug" } else { "taskly=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    #[cfg(feature = "gui")]
    if matches!(args.command, Command::Gui) {
        return taskly::gui::run();
    }

    let workspace = args
        .workspace
        .clone()
        .context("No workspace given (use --workspace or TASKLY_WORKSPACE)")?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(&workspace, args))
}

async fn run(workspace: &Path, args: Cli) -> anyhow::Result<()> {
    let db = WorkspaceDb::new(workspace).await?;
    let json = args.json;

    let mutated = match args.command {
        Command::Info => {
            print_info(&db, json).await?;
            false
        }
        Command::Client(command) => run_client(&db, command, json).await?,
        Command::Project(command) => run_project(&db, command, json).await?,
        Command::Task(command) => run_task(&db, command, json).await?,
        Command::Comment(command) => run_comment(&db, command, json).await?,
        Command::Briefing(command) => run_briefing(&db, command, json).await?,
        #[cfg(feature = "gui")]
        Command::Gui => anyhow::bail!("The desktop interface is started from main"),
    };

    if mutated {
        db.save_workspace().await?;
    }
    Ok(())
}

/// Print the envelope and turn a failure into a non-zero exit.
fn report(result: &ActionResult, json: bool) -> anyhow::Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        match result.id {
            Some(id) => println!("{} (id {})", result.message, id),
            None => println!("{}", result.message),
        }
        if let Some(errors) = &result.errors {
            for (field, messages) in errors.iter() {
                for message in messages {
                    println!("  {field}: {message}");
                }
            }
        }
    }
    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn print_info(db: &WorkspaceDb, json: bool) -> anyhow::Result<()> {
    let name = db.get_workspace_name().await?;
    let created_at = db.get_workspace_created_at().await?;
    let clients = db.get_clients(PageRequest::new(1, 1)).await?.total;
    let projects = db.get_projects(PageRequest::new(1, 1)).await?.total;

    if json {
        print_json(&serde_json::json!({
            "name": name,
            "file": db.workspace_file(),
            "created_at": created_at.to_string(),
            "clients": clients,
            "projects": projects,
        }))
    } else {
        println!("Workspace: {name}");
        println!("File: {:?}", db.workspace_file());
        println!("Created: {created_at}");
        println!("Clients: {clients}");
        println!("Projects: {projects}");
        Ok(())
    }
}

async fn run_client(db: &WorkspaceDb, command: ClientCommand, json: bool) -> anyhow::Result<bool> {
    match command {
        ClientCommand::Add {
            name,
            email,
            phone,
            company,
        } => {
            let result = db
                .create_client(NewClient {
                    name,
                    email,
                    phone,
                    company,
                })
                .await;
            report(&result, json)
        }
        ClientCommand::List(page) => {
            let clients = db.get_clients((&page).into()).await?;
            if json {
                print_json(&clients)?;
            } else {
                for client in &clients.items {
                    println!(
                        "{:>5}  {}  <{}>{}",
                        client.id,
                        client.name,
                        client.email,
                        client
                            .company
                            .as_deref()
                            .map(|c| format!("  ({c})"))
                            .unwrap_or_default()
                    );
                }
                println!(
                    "page {}/{} ({} clients)",
                    clients.page,
                    clients.total_pages(),
                    clients.total
                );
            }
            Ok(false)
        }
        ClientCommand::Delete { id } => report(&db.remove_client(id).await, json),
    }
}

async fn run_project(
    db: &WorkspaceDb,
    command: ProjectCommand,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        ProjectCommand::Add {
            name,
            client,
            description,
        } => {
            let result = db
                .create_project(NewProject {
                    client_id: client,
                    name,
                    description,
                })
                .await;
            report(&result, json)
        }
        ProjectCommand::List(page) => {
            let projects = db.get_projects((&page).into()).await?;
            if json {
                print_json(&projects)?;
            } else {
                for project in &projects.items {
                    let client = project
                        .client_id
                        .map(|id| format!("client {id}"))
                        .unwrap_or_else(|| "no client".to_string());
                    println!("{:>5}  {}  [{}]", project.id, project.name, client);
                }
                println!(
                    "page {}/{} ({} projects)",
                    projects.page,
                    projects.total_pages(),
                    projects.total
                );
            }
            Ok(false)
        }
        ProjectCommand::Delete { id } => report(&db.remove_project(id).await, json),
    }
}

async fn find_task(db: &WorkspaceDb, project: i64, id: i64) -> anyhow::Result<TaskSelection> {
    let task = db
        .get_project_repo(project)
        .await?
        .get_task_by_id(id)
        .await?
        .with_context(|| format!("Task {id} not found in project {project}"))?;
    Ok(task.into())
}

async fn find_comment(db: &WorkspaceDb, project: i64, id: i64) -> anyhow::Result<CommentSelection> {
    let comment = db
        .get_project_repo(project)
        .await?
        .get_comment_by_id(id)
        .await?
        .with_context(|| format!("Comment {id} not found in project {project}"))?;
    Ok(comment.into())
}

async fn run_task(db: &WorkspaceDb, command: TaskCommand, json: bool) -> anyhow::Result<bool> {
    match command {
        TaskCommand::Add {
            project,
            title,
            description,
        } => {
            let result = db
                .create_task(project, NewTask { title, description })
                .await;
            report(&result, json)
        }
        TaskCommand::List { project, status } => {
            let repo = db.get_project_repo(project).await?;
            let tasks = match status {
                Some(status) => repo.get_tasks_by_status(status).await?,
                None => repo.get_tasks().await?,
            };
            if json {
                print_json(&tasks)?;
            } else {
                let name = repo.get_project().await?.name;
                println!("{name}");
                for task in &tasks {
                    println!("{:>5}  [{:<11}]  {}", task.id, task.status.label(), task.title);
                }
            }
            Ok(false)
        }
        TaskCommand::Status {
            id,
            status,
            project,
        } => {
            let task = find_task(db, project, id).await?;
            report(&db.update_task_status(&task, status).await, json)
        }
        TaskCommand::Edit {
            id,
            project,
            title,
            description,
        } => {
            let task = find_task(db, project, id).await?;
            let details = TaskDetailsPatch { title, description };
            report(&db.edit_task(&task, details).await, json)
        }
        TaskCommand::Delete { id, project } => {
            let task = find_task(db, project, id).await?;
            report(&MutationActions::delete_task(db, &task).await, json)
        }
    }
}

async fn run_comment(
    db: &WorkspaceDb,
    command: CommentCommand,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        CommentCommand::Add {
            project,
            user,
            content,
        } => {
            let result = db
                .create_comment(
                    project,
                    NewComment {
                        user_id: user,
                        content,
                    },
                )
                .await;
            report(&result, json)
        }
        CommentCommand::List { project } => {
            let comments = db.get_project_repo(project).await?.get_comments().await?;
            if json {
                print_json(&comments)?;
            } else {
                for comment in &comments {
                    println!(
                        "{:>5}  user {}  {}  {}",
                        comment.id,
                        comment.user_id,
                        comment.created_at,
                        taskly::core::validation::plain_text(&comment.content)
                    );
                }
            }
            Ok(false)
        }
        CommentCommand::Edit {
            id,
            project,
            content,
        } => {
            let comment = find_comment(db, project, id).await?;
            report(
                &db.edit_comment(&comment, CommentContentPatch { content }).await,
                json,
            )
        }
        CommentCommand::Delete { id, project } => {
            let comment = find_comment(db, project, id).await?;
            report(&MutationActions::delete_comment(db, &comment).await, json)
        }
    }
}

async fn run_briefing(
    db: &WorkspaceDb,
    command: BriefingCommand,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        BriefingCommand::Add {
            project,
            title,
            content,
        } => {
            let result = db
                .create_briefing(project, NewBriefing { title, content })
                .await;
            report(&result, json)
        }
        BriefingCommand::List { project } => {
            let briefings = db.get_project_repo(project).await?.get_briefings().await?;
            if json {
                print_json(&briefings)?;
            } else {
                for briefing in &briefings {
                    println!("{:>5}  {}", briefing.id, briefing.title);
                }
            }
            Ok(false)
        }
    }
}
