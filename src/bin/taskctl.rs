//! taskctl - terminal front end for the task API.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use taskboard::client::{
    DeleteOutcome, Navigation, Notifications, StatusEdit, TaskBoard, TaskClient, TaskForm,
};
use taskboard::config::api_url_from_env;
use taskboard::task::{parse_task_id, Task, TaskStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// API base URL
    ///
    /// Defaults to `TASKBOARD_API_URL`, or `http://localhost:3000`.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tasks, newest first
    List,
    /// Show one task
    Show { id: String },
    /// Create a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Due date, `YYYY-MM-DD`
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
    },
    /// Edit a task; omitted fields keep their current value (a due time of
    /// day is kept unless `--due` names another day)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Change only the status of a task
    Status { id: String, status: TaskStatus },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn print_task(task: &Task) {
    println!(
        "{}  [{}]  {}  (due {})",
        task.id,
        task.status.label(),
        task.title,
        task.due_date.format("%Y-%m-%d")
    );
}

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

async fn run(args: Args, notifications: &Notifications) -> anyhow::Result<()> {
    let client = TaskClient::new(args.api_url.unwrap_or_else(api_url_from_env));

    match args.command {
        Command::List => {
            let board = TaskBoard::mount(client, notifications.clone()).await;
            if let Some(error) = board.error() {
                bail!("{}", error);
            }
            if board.tasks().is_empty() {
                println!("No tasks yet.");
            }
            for task in board.tasks() {
                print_task(task);
            }
        }
        Command::Show { id } => {
            let task = client.get(&id).await?;
            print_task(&task);
            println!();
            println!("{}", task.description);
        }
        Command::Add {
            title,
            description,
            due,
            status,
        } => {
            let mut form = TaskForm::create(title, description, due, status);
            submit(&mut form, &client, notifications).await?;
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            status,
        } => {
            let mut form = TaskForm::load(&client, &id).await?;
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(due) = due {
                form.due_date = due;
            }
            if let Some(status) = status {
                form.status = status;
            }
            submit(&mut form, &client, notifications).await?;
        }
        Command::Status { id, status } => {
            let id = parse_task_id(&id)?;
            let mut board = TaskBoard::mount(client, notifications.clone()).await;
            if let Some(error) = board.error() {
                bail!("{}", error);
            }
            match board.change_status(id, status).await {
                None => bail!("Task not found"),
                Some(StatusEdit::RolledBack { .. }) => {}
                Some(_) => {
                    if let Some(task) = board.task(id) {
                        print_task(task);
                    }
                }
            }
        }
        Command::Delete { id, yes } => {
            let id = parse_task_id(&id)?;
            let mut board = TaskBoard::mount(client, notifications.clone()).await;
            let confirm = |prompt: &str| yes || ask(prompt);
            if let DeleteOutcome::Cancelled = board.delete(id, &confirm).await {
                println!("Cancelled.");
            }
        }
    }

    Ok(())
}

async fn submit(
    form: &mut TaskForm,
    client: &TaskClient,
    notifications: &Notifications,
) -> anyhow::Result<()> {
    match form.submit(client).await {
        Navigation::ToList(flash) => {
            let board = TaskBoard::mount(client.clone(), notifications.clone()).await;
            board.consume_flash(Some(flash)).await;
            Ok(())
        }
        Navigation::Stay => Err(anyhow!(form
            .error
            .clone()
            .unwrap_or_else(|| "Failed to save task".to_string()))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let notifications = Notifications::session();
    let result = run(args, notifications).await;

    for notification in notifications.active().await {
        println!("[{}] {}", notification.kind, notification.message);
    }

    result
}
