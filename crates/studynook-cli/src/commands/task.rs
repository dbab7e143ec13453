use clap::Subcommand;
use studynook_core::{Config, Store, Task, TaskPatch};

use super::timer::CURRENT_TASK_KEY;
use super::{load_json, open_store, print_json, save_json, AppStore, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        title: String,
        /// Estimated pomodoros
        #[arg(long, default_value_t = 1)]
        estimate: u32,
        /// Tag (repeatable); the first tag is the task's category
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List tasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Edit a task's title, estimate or tags
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        estimate: Option<u32>,
        /// Replace all tags (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Mark a task completed
    Done { id: String },
    /// Mark a task not completed
    Undone { id: String },
    /// Delete a task
    Delete { id: String },
    /// Credit completed focus sessions to a task
    Select { id: String },
    /// Stop crediting sessions to any task
    Unselect,
}

fn not_found(id: &str) -> Box<dyn std::error::Error> {
    format!("task not found: {id}").into()
}

pub fn run(action: TaskAction) -> CmdResult {
    let config = Config::load()?;
    let store = open_store(&config)?;

    match action {
        TaskAction::Add {
            title,
            estimate,
            tags,
        } => {
            let mut task = Task::new(&title, estimate)?;
            if !tags.is_empty() {
                task = task.with_tags(tags);
            }
            store.save_task(task.clone())?;
            print_json(&task)?;
        }
        TaskAction::List { json } => {
            let tasks = store.get_tasks()?;
            if json {
                print_json(&tasks)?;
            } else {
                let current = load_json::<String>(&store, CURRENT_TASK_KEY);
                for task in &tasks {
                    let marker = if current.as_deref() == Some(task.id.as_str()) {
                        ">"
                    } else {
                        " "
                    };
                    let check = if task.completed { "x" } else { " " };
                    let tags = task
                        .tags
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .map(|t| format!(" #{t}"))
                        .collect::<String>();
                    println!(
                        "{marker}[{check}] {} ({}/{}){tags}  {}",
                        task.title, task.completed_pomodoros, task.estimated_pomodoros, task.id
                    );
                }
            }
        }
        TaskAction::Edit {
            id,
            title,
            estimate,
            tags,
        } => {
            let patch = TaskPatch {
                title,
                estimated_pomodoros: estimate,
                tags,
            };
            if !store.update_task(&id, &patch)? {
                return Err(not_found(&id));
            }
            if let Some(task) = store.get_task(&id)? {
                print_json(&task)?;
            }
        }
        TaskAction::Done { id } => set_completed(&store, &id, true)?,
        TaskAction::Undone { id } => set_completed(&store, &id, false)?,
        TaskAction::Delete { id } => {
            store.delete_task(&id)?;
            if load_json::<String>(&store, CURRENT_TASK_KEY).as_deref() == Some(id.as_str()) {
                store.inner().remove(CURRENT_TASK_KEY)?;
            }
            println!("ok");
        }
        TaskAction::Select { id } => {
            if store.get_task(&id)?.is_none() {
                return Err(not_found(&id));
            }
            save_json(&store, CURRENT_TASK_KEY, &id)?;
            println!("ok");
        }
        TaskAction::Unselect => {
            store.inner().remove(CURRENT_TASK_KEY)?;
            println!("ok");
        }
    }
    Ok(())
}

fn set_completed(store: &AppStore, id: &str, completed: bool) -> CmdResult {
    if !store.update_task_completion(id, completed)? {
        return Err(not_found(id));
    }
    println!("ok");
    Ok(())
}
